//! The top-level `QrCode` type: version/ECC selection, codeword packing,
//! and the construction pipeline that turns codewords into a finished,
//! masked module grid.

use crate::canvas::{self, Canvas};
use crate::bits::BitBuffer;
use crate::ec_level::EcLevel;
use crate::error::QrError;
use crate::mask::Mask;
use crate::segment::Segment;
use crate::version::Version;

/// A finished QR Code (Model 2) symbol: an immutable square grid of dark
/// and light modules.
///
/// Build one with the high-level [`QrCode::encode_text`]/[`QrCode::encode_binary`],
/// the mid-level [`QrCode::encode_segments`]/[`QrCode::encode_segments_advanced`]
/// for custom segment sequences, or the low-level [`QrCode::encode_codewords`]
/// if you've already packed your own data codewords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    version: Version,
    size: i32,
    ecl: EcLevel,
    mask: Mask,
    modules: Vec<bool>,
}

impl QrCode {
    /*---- Static factory functions (high level) ----*/

    /// Encodes `text` at the given error correction level, picking the
    /// smallest version and an automatic segment mode for it.
    ///
    /// The resulting ECC level may end up stricter than requested if that
    /// costs no extra version; see [`QrCode::encode_segments_advanced`].
    pub fn encode_text(text: &str, ecl: EcLevel) -> Result<Self, QrError> {
        let segs = Segment::make_segments(text);
        Self::encode_segments(&segs, ecl)
    }

    /// Encodes `data` as a single byte-mode segment at the given error
    /// correction level.
    pub fn encode_binary(data: &[u8], ecl: EcLevel) -> Result<Self, QrError> {
        let segs = [Segment::make_bytes(data)];
        Self::encode_segments(&segs, ecl)
    }

    /*---- Static factory functions (mid level) ----*/

    /// Encodes a caller-built segment sequence at the given error
    /// correction level, across the full version range with automatic mask
    /// selection and ECC boosting.
    pub fn encode_segments(segs: &[Segment], ecl: EcLevel) -> Result<Self, QrError> {
        Self::encode_segments_advanced(segs, ecl, Version::MIN, Version::MAX, None, true)
    }

    /// Encodes a caller-built segment sequence with full control over the
    /// version range, mask choice, and ECC boosting.
    ///
    /// `mask` of `None` requests automatic mask selection (evaluates all
    /// eight and keeps the lowest-penalty one, smallest index breaking
    /// ties). If `boost_ecl` is set, `ecl` may be raised to a stricter level
    /// that still fits the chosen version; the version itself is never
    /// affected by boosting.
    ///
    /// Fails with [`QrError::DataTooLong`] if `segs` doesn't fit any version
    /// in `[min_version, max_version]` at `ecl`.
    pub fn encode_segments_advanced(
        segs: &[Segment],
        mut ecl: EcLevel,
        min_version: Version,
        max_version: Version,
        mask: Option<Mask>,
        boost_ecl: bool,
    ) -> Result<Self, QrError> {
        assert!(min_version.value() <= max_version.value(), "min_version exceeds max_version");

        let mut version = min_version;
        let data_used_bits = loop {
            let data_capacity_bits = canvas::num_data_codewords(version, ecl) * 8;
            let data_used = Segment::get_total_bits(segs, version);
            if let Some(used) = data_used {
                if used <= data_capacity_bits {
                    break used;
                }
            }
            if version.value() >= max_version.value() {
                let capacity_bits = canvas::num_data_codewords(max_version, ecl) * 8;
                let used_bits = data_used.unwrap_or(capacity_bits + 1);
                return Err(QrError::DataTooLong { used_bits, capacity_bits, version: max_version });
            }
            version = Version::new(version.value() + 1);
        };

        if boost_ecl {
            for &stricter in ecl.stricter_levels() {
                if data_used_bits <= canvas::num_data_codewords(version, stricter) * 8 {
                    ecl = stricter;
                }
            }
        }

        let mut bb = BitBuffer::with_capacity(data_used_bits);
        for seg in segs {
            bb.append_bits(seg.mode().mode_bits(), 4);
            bb.append_bits(u32::try_from(seg.num_chars()).unwrap(), seg.mode().num_char_count_bits(version));
            bb.0.extend_from_slice(seg.data());
        }
        debug_assert_eq!(bb.bit_length(), data_used_bits);

        let data_capacity_bits = canvas::num_data_codewords(version, ecl) * 8;
        debug_assert!(bb.bit_length() <= data_capacity_bits);
        let num_zero_bits = (data_capacity_bits - bb.bit_length()).min(4);
        bb.append_bits(0, u8::try_from(num_zero_bits).unwrap());
        let num_zero_bits = bb.bit_length().wrapping_neg() & 7;
        bb.append_bits(0, u8::try_from(num_zero_bits).unwrap());
        debug_assert_eq!(bb.bit_length() % 8, 0);

        for &pad_byte in [0xECu32, 0x11].iter().cycle() {
            if bb.bit_length() >= data_capacity_bits {
                break;
            }
            bb.append_bits(pad_byte, 8);
        }

        let data_codewords = bb.bytes();
        Ok(Self::encode_codewords(version, ecl, &data_codewords, mask))
    }

    /*---- Constructor (low level) ----*/

    /// Builds a `QrCode` directly from packed data codewords (segment
    /// headers, payloads, terminator, and padding already applied;
    /// error-correction codewords excluded).
    ///
    /// Most callers should reach this through [`QrCode::encode_segments`]
    /// instead. `data_codewords.len()` must equal the data codeword count
    /// for `(version, ecl)`.
    pub fn encode_codewords(version: Version, ecl: EcLevel, data_codewords: &[u8], mask: Option<Mask>) -> Self {
        let mut canvas = Canvas::new(version);
        canvas.draw_function_patterns(version, ecl);
        let all_codewords = Canvas::add_ecc_and_interleave(version, ecl, data_codewords);
        canvas.draw_codewords(&all_codewords);

        let chosen_mask = mask.unwrap_or_else(|| {
            let mut best = Mask::new(0);
            let mut min_penalty = i32::MAX;
            for i in 0..8 {
                let candidate = Mask::new(i);
                canvas.apply_mask(candidate);
                canvas.draw_format_bits(ecl, candidate);
                let penalty = canvas.penalty_score();
                if penalty < min_penalty {
                    best = candidate;
                    min_penalty = penalty;
                }
                canvas.apply_mask(candidate); // undo; XOR is its own inverse
            }
            best
        });
        canvas.apply_mask(chosen_mask);
        canvas.draw_format_bits(ecl, chosen_mask);

        let size = canvas.size();
        Self { version, size, ecl, mask: chosen_mask, modules: canvas.into_modules() }
    }

    /*---- Accessors ----*/

    /// This symbol's version, in `[1, 40]`.
    pub fn version(&self) -> Version {
        self.version
    }

    /// This symbol's side length in modules, `4 * version + 17`.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The error correction level actually used (may be stricter than
    /// requested if boosting applied).
    pub fn error_correction_level(&self) -> EcLevel {
        self.ecl
    }

    /// The mask pattern applied, in `[0, 7]`.
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// The color of the module at `(x, y)`: `true` for dark, `false` for
    /// light. Out-of-bounds coordinates return `false`.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x) && (0..self.size).contains(&y) && self.modules[(y * self.size + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_is_version_one() {
        let qr = QrCode::encode_text("Hello, world!", EcLevel::Medium).unwrap();
        assert_eq!(qr.version().value(), 1);
        assert_eq!(qr.size(), 21);
    }

    #[test]
    fn boost_never_increases_the_chosen_version() {
        let low = QrCode::encode_text("Hello, world!", EcLevel::Low).unwrap();
        let boosted = QrCode::encode_text("Hello, world!", EcLevel::Medium).unwrap();
        assert_eq!(low.version(), boosted.version());
    }

    #[test]
    fn all_numeric_text_fits_version_one_at_low() {
        let qr = QrCode::encode_text("314159265358979323846264338327950288419716939937510", EcLevel::Low).unwrap();
        assert_eq!(qr.version().value(), 1);
        assert_eq!(qr.size(), 21);
    }

    #[test]
    fn max_binary_payload_fits_version_forty_low() {
        let data = vec![0u8; 2953];
        let qr = QrCode::encode_binary(&data, EcLevel::Low).unwrap();
        assert_eq!(qr.version().value(), 40);
    }

    #[test]
    fn one_byte_over_max_binary_payload_fails() {
        let data = vec![0u8; 2954];
        let err = QrCode::encode_binary(&data, EcLevel::Low).unwrap_err();
        assert!(matches!(err, QrError::DataTooLong { .. }));
    }

    #[test]
    fn out_of_bounds_module_is_light() {
        let qr = QrCode::encode_text("A", EcLevel::Low).unwrap();
        assert!(!qr.get_module(-1, 0));
        assert!(!qr.get_module(qr.size(), 0));
    }

    #[test]
    fn explicit_mask_is_honored() {
        let qr = QrCode::encode_text(
            "3141592653589793238462643383",
            EcLevel::High,
        )
        .unwrap();
        let segs = Segment::make_segments("3141592653589793238462643383");
        let forced = QrCode::encode_segments_advanced(
            &segs,
            EcLevel::High,
            qr.version(),
            qr.version(),
            Some(Mask::new(2)),
            false,
        )
        .unwrap();
        assert_eq!(forced.mask().value(), 2);
    }
}
