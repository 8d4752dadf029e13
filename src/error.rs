use core::fmt;

use crate::version::Version;

/// The error produced when the requested data does not fit any QR Code
/// version in the requested range at the requested error correction level.
///
/// Ways to handle this exception include:
///
/// - Decrease the error correction level, if it was above `EcLevel::Low`.
/// - If `QrCode::encode_segments_advanced` was called directly, increase
///   `max_version` if it was below `Version::MAX`.
/// - Split the text into a custom, more efficient sequence of segments.
/// - Shorten the text or binary data.
/// - Propagate the error to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrError {
    /// The segments could not be packed into any version up to `max_version`.
    DataTooLong {
        /// Total bits the segments would occupy at `version`.
        used_bits: usize,
        /// Bits available for data at `version` and the requested ECC level.
        capacity_bits: usize,
        /// The largest version that was tried.
        version: Version,
    },
}

impl fmt::Display for QrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DataTooLong { used_bits, capacity_bits, version } => write!(
                f,
                "data too long: {used_bits} bits requested, but version {} only has capacity \
                 for {capacity_bits} bits",
                version.value(),
            ),
        }
    }
}

impl std::error::Error for QrError {}
