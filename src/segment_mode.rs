use crate::version::Version;

/// Which character set a [`crate::segment::Segment`]'s payload is drawn from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Mode {
    /// Digits `0`–`9` only.
    Numeric,
    /// `0`–`9`, `A`–`Z`, space, and `$%*+-./:`.
    Alphanumeric,
    /// Arbitrary bytes.
    Byte,
    /// Shift-JIS-encodable double-byte text.
    Kanji,
    /// An Extended Channel Interpretation designator.
    Eci,
}

impl Mode {
    /// The 4-bit mode indicator written ahead of a segment's character count.
    pub(crate) fn mode_bits(self) -> u32 {
        match self {
            Self::Numeric => 0x1,
            Self::Alphanumeric => 0x2,
            Self::Byte => 0x4,
            Self::Kanji => 0x8,
            Self::Eci => 0x7,
        }
    }

    /// The bit width of the character count field for this mode at `version`.
    pub fn num_char_count_bits(self, version: Version) -> u8 {
        let widths: [u8; 3] = match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji => [8, 10, 12],
            Self::Eci => [0, 0, 0],
        };
        match version.value() {
            1..=9 => widths[0],
            10..=26 => widths[1],
            27..=40 => widths[2],
            v => unreachable!("version out of range: {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Mode;
    use crate::version::Version;

    #[test]
    fn char_count_bits_follow_version_buckets() {
        assert_eq!(Mode::Numeric.num_char_count_bits(Version::new(1)), 10);
        assert_eq!(Mode::Numeric.num_char_count_bits(Version::new(10)), 12);
        assert_eq!(Mode::Numeric.num_char_count_bits(Version::new(27)), 14);
        assert_eq!(Mode::Byte.num_char_count_bits(Version::new(9)), 8);
        assert_eq!(Mode::Byte.num_char_count_bits(Version::new(26)), 16);
        assert_eq!(Mode::Eci.num_char_count_bits(Version::new(40)), 0);
    }

    #[test]
    fn mode_bits_match_standard_indicators() {
        assert_eq!(Mode::Numeric.mode_bits(), 0x1);
        assert_eq!(Mode::Alphanumeric.mode_bits(), 0x2);
        assert_eq!(Mode::Byte.mode_bits(), 0x4);
        assert_eq!(Mode::Kanji.mode_bits(), 0x8);
        assert_eq!(Mode::Eci.mode_bits(), 0x7);
    }
}
