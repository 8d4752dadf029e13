use crate::bits::BitBuffer;
use crate::kanji;
use crate::segment_mode::Mode;
use crate::tables::ALPHANUMERIC_CHARSET;
use crate::version::Version;

/// A segment of character or binary data destined for one QR Code symbol.
///
/// Instances are immutable. The mid-level way to create one is a static
/// factory function such as [`Segment::make_numeric`]; the low-level way is
/// to build a [`BitBuffer`] directly and call [`Segment::new`].
///
/// This struct imposes no length limit of its own, but a QR Code symbol can
/// hold at most 7089 characters under the most favorable conditions, so any
/// longer segment is meaningless for that purpose.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Segment {
    mode: Mode,
    num_chars: usize,
    data: Vec<bool>,
}

impl Segment {
    /*---- Static factory functions (mid level) ----*/

    /// Returns a segment representing `data` encoded in byte mode.
    ///
    /// Any byte slice is acceptable; a UTF-8 string's bytes work as-is.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::with_capacity(data.len() * 8);
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        Self::new(Mode::Byte, data.len(), bb.0)
    }

    /// Returns a segment representing `text`, a string of decimal digits,
    /// encoded in numeric mode.
    ///
    /// Panics if `text` contains a non-digit character.
    pub fn make_numeric(text: &str) -> Self {
        let mut bb = BitBuffer::with_capacity(text.len() * 3 + (text.len() + 2) / 3);
        let mut accum_data: u32 = 0;
        let mut accum_count: u8 = 0;
        for b in text.bytes() {
            assert!(b.is_ascii_digit(), "string contains non-numeric characters");
            accum_data = accum_data * 10 + u32::from(b - b'0');
            accum_count += 1;
            if accum_count == 3 {
                bb.append_bits(accum_data, 10);
                accum_data = 0;
                accum_count = 0;
            }
        }
        if accum_count > 0 {
            // 1 or 2 digits remaining
            bb.append_bits(accum_data, accum_count * 3 + 1);
        }
        Self::new(Mode::Numeric, text.chars().count(), bb.0)
    }

    /// Returns a segment representing `text` encoded in alphanumeric mode.
    ///
    /// The allowed characters are `0`-`9`, `A`-`Z`, space, and
    /// `$%*+-./:`. Panics if `text` contains any other character.
    pub fn make_alphanumeric(text: &str) -> Self {
        let mut bb = BitBuffer::with_capacity(text.len() * 5 + (text.len() + 1) / 2);
        let mut accum_data: u32 = 0;
        let mut accum_count: u32 = 0;
        for c in text.chars() {
            let i = ALPHANUMERIC_CHARSET
                .find(c)
                .expect("string contains unencodable characters in alphanumeric mode");
            accum_data = accum_data * 45 + u32::try_from(i).unwrap();
            accum_count += 1;
            if accum_count == 2 {
                bb.append_bits(accum_data, 11);
                accum_data = 0;
                accum_count = 0;
            }
        }
        if accum_count > 0 {
            // 1 character remaining
            bb.append_bits(accum_data, 6);
        }
        Self::new(Mode::Alphanumeric, text.chars().count(), bb.0)
    }

    /// Returns a segment representing `text` encoded in kanji mode.
    ///
    /// Panics if `text` contains a character not representable as a 13-bit
    /// Shift-JIS pointer; see [`kanji::is_kanji`].
    pub fn make_kanji(text: &str) -> Self {
        let mut bb = BitBuffer::with_capacity(text.chars().count() * 13);
        let mut num_chars = 0;
        for c in text.chars() {
            let pointer = kanji::pointer_for(c)
                .expect("string contains non-kanji-mode characters");
            bb.append_bits(u32::from(pointer), 13);
            num_chars += 1;
        }
        Self::new(Mode::Kanji, num_chars, bb.0)
    }

    /// Returns a segment representing an Extended Channel Interpretation
    /// designator with the given assignment value.
    ///
    /// Panics if `assign_val` is not representable (`>= 1_000_000`).
    pub fn make_eci(assign_val: u32) -> Self {
        let mut bb = BitBuffer::with_capacity(24);
        if assign_val < (1 << 7) {
            bb.append_bits(assign_val, 8);
        } else if assign_val < (1 << 14) {
            bb.append_bits(0b10, 2);
            bb.append_bits(assign_val, 14);
        } else if assign_val < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(assign_val, 21);
        } else {
            panic!("ECI assignment value out of range: {assign_val}");
        }
        Self::new(Mode::Eci, 0, bb.0)
    }

    /// Returns a list of zero or more segments representing `text`.
    ///
    /// This picks a single mode for the whole string — numeric if possible,
    /// else alphanumeric, else byte — without attempting to minimize total
    /// size by switching modes partway through. See
    /// [`crate::planner::make_segments_optimally`] for that.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            Vec::new()
        } else if Self::is_numeric(text) {
            vec![Self::make_numeric(text)]
        } else if Self::is_alphanumeric(text) {
            vec![Self::make_alphanumeric(text)]
        } else {
            vec![Self::make_bytes(text.as_bytes())]
        }
    }

    /*---- Constructor (low level) ----*/

    /// Creates a new segment with the given attributes and data.
    ///
    /// The caller must ensure `num_chars` agrees with `mode` and `data`; this
    /// constraint isn't checked.
    pub fn new(mode: Mode, num_chars: usize, data: Vec<bool>) -> Self {
        Self { mode, num_chars, data }
    }

    /*---- Instance field getters ----*/

    /// The mode indicator of this segment.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The character count field of this segment.
    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    /// The data bits of this segment.
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /*---- Other static functions ----*/

    /// Returns the number of bits needed to encode `segs` at `version`, or
    /// `None` if a segment's character count overflows its length field or
    /// the total exceeds `usize::MAX`.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let cc_bits = seg.mode.num_char_count_bits(version);
            if let Some(limit) = 1usize.checked_shl(cc_bits.into()) {
                if seg.num_chars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(cc_bits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    /// Tests whether every character of `text` is an ASCII digit.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether every character of `text` is in the alphanumeric mode
    /// character set.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_packs_three_digits_per_ten_bits() {
        let seg = Segment::make_numeric("314159265");
        assert_eq!(seg.mode(), Mode::Numeric);
        assert_eq!(seg.num_chars(), 9);
        // 9 digits = 3 groups of 3 => 30 bits exactly, no partial group.
        assert_eq!(seg.data().len(), 30);
    }

    #[test]
    fn numeric_handles_leftover_digits() {
        // 7 digits = 2 full groups (20 bits) + 1 leftover digit (4 bits).
        let seg = Segment::make_numeric("1234567");
        assert_eq!(seg.data().len(), 24);
    }

    #[test]
    #[should_panic]
    fn numeric_rejects_non_digits() {
        Segment::make_numeric("12a4");
    }

    #[test]
    fn alphanumeric_packs_two_chars_per_eleven_bits() {
        let seg = Segment::make_alphanumeric("DOLLAR-AMOUNT");
        assert_eq!(seg.mode(), Mode::Alphanumeric);
        assert_eq!(seg.num_chars(), 13);
        // 13 chars = 6 pairs (66 bits) + 1 leftover char (6 bits) = 72 bits.
        assert_eq!(seg.data().len(), 72);
    }

    #[test]
    #[should_panic]
    fn alphanumeric_rejects_lowercase() {
        Segment::make_alphanumeric("lowercase");
    }

    #[test]
    fn bytes_packs_eight_bits_per_byte() {
        let seg = Segment::make_bytes(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(seg.mode(), Mode::Byte);
        assert_eq!(seg.num_chars(), 4);
        assert_eq!(seg.data().len(), 32);
    }

    #[test]
    fn make_segments_prefers_the_most_compact_applicable_mode() {
        assert_eq!(Segment::make_segments("")[..], []);
        assert_eq!(Segment::make_segments("0123")[0].mode(), Mode::Numeric);
        assert_eq!(Segment::make_segments("ABC123")[0].mode(), Mode::Alphanumeric);
        assert_eq!(Segment::make_segments("hello")[0].mode(), Mode::Byte);
    }

    #[test]
    fn eci_designator_chooses_indicator_width_from_assignment_value() {
        assert_eq!(Segment::make_eci(3).data().len(), 8);
        assert_eq!(Segment::make_eci(1000).data().len(), 16);
        assert_eq!(Segment::make_eci(999_999).data().len(), 24);
    }

    #[test]
    fn total_bits_accounts_for_mode_and_count_header() {
        let version = Version::new(1);
        let segs = vec![Segment::make_numeric("123")];
        // 4-bit mode + 10-bit count (v1 numeric) + 10 data bits = 24.
        assert_eq!(Segment::get_total_bits(&segs, version), Some(24));
    }

    #[test]
    fn total_bits_overflows_to_none_when_count_exceeds_field_width() {
        let version = Version::new(1);
        // Byte mode at v1-9 has an 8-bit count field, so 256 chars overflow it.
        let oversized = Segment::new(Mode::Byte, 256, vec![false; 256 * 8]);
        assert_eq!(Segment::get_total_bits(&[oversized], version), None);
    }

    /// Decodes a numeric-mode bit payload back into its digit string, the
    /// inverse of [`Segment::make_numeric`].
    fn decode_numeric(bits: &[bool], num_chars: usize) -> String {
        let mut out = String::with_capacity(num_chars);
        let mut remaining = num_chars;
        let mut pos = 0;
        while remaining > 0 {
            let group = remaining.min(3);
            let width = group * 3 + 1;
            let mut val: u32 = 0;
            for &b in &bits[pos..pos + width] {
                val = val << 1 | u32::from(b);
            }
            pos += width;
            let digits = format!("{val:0width$}", width = group);
            out.push_str(&digits);
            remaining -= group;
        }
        out
    }

    /// Decodes an alphanumeric-mode bit payload back into text, the inverse
    /// of [`Segment::make_alphanumeric`].
    fn decode_alphanumeric(bits: &[bool], num_chars: usize) -> String {
        let charset: Vec<char> = ALPHANUMERIC_CHARSET.chars().collect();
        let mut out = String::with_capacity(num_chars);
        let mut remaining = num_chars;
        let mut pos = 0;
        while remaining >= 2 {
            let mut val: u32 = 0;
            for &b in &bits[pos..pos + 11] {
                val = val << 1 | u32::from(b);
            }
            pos += 11;
            out.push(charset[(val / 45) as usize]);
            out.push(charset[(val % 45) as usize]);
            remaining -= 2;
        }
        if remaining == 1 {
            let mut val: u32 = 0;
            for &b in &bits[pos..pos + 6] {
                val = val << 1 | u32::from(b);
            }
            out.push(charset[val as usize]);
        }
        out
    }

    #[test]
    fn decode_numeric_inverts_make_numeric_for_a_sample() {
        let text = "90834523048230482093480234982093840923";
        let seg = Segment::make_numeric(text);
        assert_eq!(decode_numeric(seg.data(), seg.num_chars()), text);
    }

    #[test]
    fn decode_alphanumeric_inverts_make_alphanumeric_for_a_sample() {
        let text = "DOLLAR-AMOUNT:$39.87 PERCENT:100%";
        let seg = Segment::make_alphanumeric(text);
        assert_eq!(decode_alphanumeric(seg.data(), seg.num_chars()), text);
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(64))]

        #[test]
        fn numeric_strings_up_to_the_symbol_limit_round_trip(
            digits in proptest::collection::vec(proptest::prelude::any::<u8>().prop_map(|b| b'0' + b % 10), 0..=7089),
        ) {
            let text: String = digits.iter().map(|&b| b as char).collect();
            let seg = Segment::make_numeric(&text);
            proptest::prop_assert_eq!(decode_numeric(seg.data(), seg.num_chars()), text);
        }

        #[test]
        fn alphanumeric_strings_round_trip(
            indices in proptest::collection::vec(0usize..45, 0..=4296),
        ) {
            let charset: Vec<char> = ALPHANUMERIC_CHARSET.chars().collect();
            let text: String = indices.iter().map(|&i| charset[i]).collect();
            let seg = Segment::make_alphanumeric(&text);
            proptest::prop_assert_eq!(decode_alphanumeric(seg.data(), seg.num_chars()), text);
        }
    }
}
