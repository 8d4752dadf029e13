//! A QR Code (Model 2) encoder: turns Unicode text or raw bytes into a
//! finished, masked module matrix per ISO/IEC 18004, versions 1–40, all
//! four error correction levels.
//!
//! This crate computes the symbol only — it does not render it. Given a
//! [`QrCode`], read [`QrCode::size`] and [`QrCode::get_module`] and draw the
//! modules yourself (as pixels, an SVG `<path>`, terminal glyphs, whatever
//! your output needs).
//!
//! # Examples
//!
//! High level — just encode some text:
//!
//! ```
//! use qr_matrix::{EcLevel, QrCode};
//!
//! let qr = QrCode::encode_text("Hello, world!", EcLevel::Medium).unwrap();
//! for y in 0..qr.size() {
//!     for x in 0..qr.size() {
//!         let _dark = qr.get_module(x, y);
//!     }
//! }
//! ```
//!
//! Mid level — build segments yourself to mix encoding modes, then pick the
//! version range and mask explicitly:
//!
//! ```
//! use qr_matrix::{EcLevel, Mask, QrCode, Segment, Version};
//!
//! let segs = Segment::make_segments("3141592653589793238462643383");
//! let qr = QrCode::encode_segments_advanced(
//!     &segs,
//!     EcLevel::High,
//!     Version::new(5),
//!     Version::new(5),
//!     Some(Mask::new(2)),
//!     false,
//! )
//! .unwrap();
//! assert_eq!(qr.mask().value(), 2);
//! ```

mod bits;
mod canvas;
mod ec_level;
mod error;
mod kanji;
mod mask;
mod penalty;
mod planner;
mod qr_code;
mod reed_solomon;
mod segment;
mod segment_mode;
mod tables;
mod version;

pub use crate::ec_level::EcLevel;
pub use crate::error::QrError;
pub use crate::mask::Mask;
pub use crate::planner::make_segments_optimally;
pub use crate::qr_code::QrCode;
pub use crate::segment::Segment;
pub use crate::segment_mode::Mode;
pub use crate::version::Version;

pub use crate::tables::ALPHANUMERIC_CHARSET;
