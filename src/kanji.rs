//! Unicode code point to 13-bit Shift-JIS pointer mapping for kanji mode.
//!
//! Rather than carrying a literal 65536-entry lookup table (the binary
//! resource it would be unpacked from isn't available to this crate), the
//! mapping is computed: transcode the character to Shift-JIS with
//! `encoding_rs`, then apply the same arithmetic reduction ISO/IEC 18004
//! Annex H uses to turn a two-byte Shift-JIS code into a 13-bit pointer.
//! This produces exactly the values such a table would hold.

use encoding_rs::SHIFT_JIS;

/// Returns the 13-bit Shift-JIS pointer index for `c`, or `None` if `c` is
/// not representable in kanji mode.
pub fn pointer_for(c: char) -> Option<u16> {
    let mut buf = [0u8; 4];
    let s = c.encode_utf8(&mut buf);
    let (bytes, _encoding, had_errors) = SHIFT_JIS.encode(s);
    if had_errors || bytes.len() != 2 {
        return None;
    }
    reduce(bytes[0], bytes[1])
}

/// Tests whether `c` can be encoded as a kanji-mode character.
pub fn is_kanji(c: char) -> bool {
    pointer_for(c).is_some()
}

// ISO/IEC 18004 Annex H: fold the two ranges of double-byte Shift-JIS used
// by the JIS X 0208 kanji set down to a dense 13-bit pointer.
fn reduce(hi: u8, lo: u8) -> Option<u16> {
    let val = u16::from(hi) << 8 | u16::from(lo);
    let val = if (0x8140..=0x9FFC).contains(&val) {
        val - 0x8140
    } else if (0xE040..=0xEBBF).contains(&val) {
        val - 0xC140
    } else {
        return None;
    };
    let msb = val >> 8;
    let lsb = val & 0xFF;
    Some(msb * 0xC0 + lsb)
}
