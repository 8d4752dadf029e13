/// The error correction level used in a QR Code symbol.
///
/// Higher levels can recover from more damage but leave less room for data.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum EcLevel {
    /// Can tolerate about 7% erroneous codewords.
    Low,
    /// Can tolerate about 15% erroneous codewords.
    Medium,
    /// Can tolerate about 25% erroneous codewords.
    Quartile,
    /// Can tolerate about 30% erroneous codewords.
    High,
}

impl EcLevel {
    /// Index of this level into the `[Low, Medium, Quartile, High]` capacity
    /// tables.
    pub(crate) fn ordinal(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::Quartile => 2,
            Self::High => 3,
        }
    }

    /// The 2-bit format code written into the format information word.
    pub(crate) fn format_bits(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 0,
            Self::Quartile => 3,
            Self::High => 2,
        }
    }

    /// The levels stricter than this one, in increasing order of strictness.
    pub(crate) fn stricter_levels(self) -> &'static [EcLevel] {
        match self {
            Self::Low => &[Self::Medium, Self::Quartile, Self::High],
            Self::Medium => &[Self::Quartile, Self::High],
            Self::Quartile => &[Self::High],
            Self::High => &[],
        }
    }
}
