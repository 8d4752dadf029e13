//! Optimal segmentation: choose, per character, the mode that minimizes the
//! total encoded bit length, then coalesce runs of the same mode into
//! segments.
//!
//! This is a dynamic program over four candidate modes (byte, alphanumeric,
//! numeric, kanji) tracked in units of a sixth of a bit, so every quantity
//! stays an exact integer even though alphanumeric costs 5.5 bits/char and
//! numeric costs 10/3 bits/char.

use crate::ec_level::EcLevel;
use crate::error::QrError;
use crate::kanji;
use crate::segment::Segment;
use crate::segment_mode::Mode;
use crate::tables::ALPHANUMERIC_CHARSET;
use crate::version::Version;

const MODE_TYPES: [Mode; 4] = [Mode::Byte, Mode::Alphanumeric, Mode::Numeric, Mode::Kanji];
const NUM_MODES: usize = MODE_TYPES.len();

/// Returns a near-optimal list of segments representing `text`, re-planned
/// at each version threshold where header widths change, stopping at the
/// first version (in `[min_version, max_version]`) whose data capacity at
/// `ecl` fits the plan.
///
/// Returns [`QrError::DataTooLong`] if no version in the range fits even the
/// plan computed for `max_version`.
pub fn make_segments_optimally(
    text: &str,
    ecl: EcLevel,
    min_version: Version,
    max_version: Version,
) -> Result<Vec<Segment>, QrError> {
    make_segments_optimally_with(text, ecl, min_version, max_version, crate::canvas::num_data_codewords)
}

/// Same as [`make_segments_optimally`], but with the data-capacity function
/// injected so it can be tested without pulling in the whole matrix/masking
/// pipeline.
fn make_segments_optimally_with(
    text: &str,
    ecl: EcLevel,
    min_version: Version,
    max_version: Version,
    get_num_data_codewords: impl Fn(Version, EcLevel) -> usize,
) -> Result<Vec<Segment>, QrError> {
    assert!(min_version.value() <= max_version.value(), "min_version exceeds max_version");

    let code_points: Vec<char> = text.chars().collect();
    let mut segs = Vec::new();

    for ver in min_version.value()..=max_version.value() {
        let version = Version::new(ver);
        if ver == min_version.value() || ver == 10 || ver == 27 {
            segs = make_segments_optimally_at_version(&code_points, version);
        }

        let data_capacity_bits = get_num_data_codewords(version, ecl) * 8;
        if let Some(used_bits) = Segment::get_total_bits(&segs, version) {
            if used_bits <= data_capacity_bits {
                return Ok(segs);
            }
        }
    }

    let used_bits = Segment::get_total_bits(&segs, max_version).unwrap_or(usize::MAX);
    let capacity_bits = get_num_data_codewords(max_version, ecl) * 8;
    Err(QrError::DataTooLong { used_bits, capacity_bits, version: max_version })
}

fn make_segments_optimally_at_version(code_points: &[char], version: Version) -> Vec<Segment> {
    if code_points.is_empty() {
        return Vec::new();
    }
    let char_modes = compute_character_modes(code_points, version);
    split_into_segments(code_points, &char_modes)
}

/// Returns, for each code point, the mode it should be encoded in so the
/// whole string's total bit length is minimized.
fn compute_character_modes(code_points: &[char], version: Version) -> Vec<Mode> {
    // Segment header sizes (mode indicator + character count field), in
    // sixths of a bit.
    let mut head_costs = [0usize; NUM_MODES];
    for (i, mode) in MODE_TYPES.iter().enumerate() {
        head_costs[i] = (4 + usize::from(mode.num_char_count_bits(version))) * 6;
    }

    // char_modes[i][j] is the mode used for code point i when the segment
    // ending at i is forced to end in MODE_TYPES[j], chosen to minimize the
    // running total; None means MODE_TYPES[j] cannot end there.
    let mut char_modes: Vec<[Option<Mode>; NUM_MODES]> = vec![[None; NUM_MODES]; code_points.len()];

    // prev_costs[j] is the minimum cost, in sixths of a bit, to encode the
    // prefix ending just before the current character with the last segment
    // in mode MODE_TYPES[j] (or just the header if no character has used it
    // yet).
    let mut prev_costs = head_costs;

    for (i, &c) in code_points.iter().enumerate() {
        let mut cur_costs = [0usize; NUM_MODES];

        // Byte mode can always extend.
        cur_costs[0] = prev_costs[0] + c.len_utf8() * 8 * 6;
        char_modes[i][0] = Some(Mode::Byte);

        if ALPHANUMERIC_CHARSET.contains(c) {
            cur_costs[1] = prev_costs[1] + 33; // 5.5 bits/char
            char_modes[i][1] = Some(Mode::Alphanumeric);
        }
        if c.is_ascii_digit() {
            cur_costs[2] = prev_costs[2] + 20; // 10/3 bits/char
            char_modes[i][2] = Some(Mode::Numeric);
        }
        if kanji::is_kanji(c) {
            cur_costs[3] = prev_costs[3] + 78; // 13 bits/char
            char_modes[i][3] = Some(Mode::Kanji);
        }

        // Consider starting a new segment ending in mode j, switching from
        // whichever prior mode k minimizes the cost once k's partial byte is
        // rounded up to a whole number of bits.
        for j in 0..NUM_MODES {
            for k in 0..NUM_MODES {
                if char_modes[i][k].is_none() {
                    continue;
                }
                let new_cost = (cur_costs[k] + 5) / 6 * 6 + head_costs[j];
                if char_modes[i][j].is_none() || new_cost < cur_costs[j] {
                    cur_costs[j] = new_cost;
                    char_modes[i][j] = Some(MODE_TYPES[k]);
                }
            }
        }

        prev_costs = cur_costs;
    }

    // Pick the cheapest mode to end the whole string in, then trace
    // predecessors backwards to recover each character's mode.
    let mut cur_mode = MODE_TYPES[0];
    let mut min_cost = prev_costs[0];
    for j in 1..NUM_MODES {
        if prev_costs[j] < min_cost {
            min_cost = prev_costs[j];
            cur_mode = MODE_TYPES[j];
        }
    }

    let mut result = vec![Mode::Byte; char_modes.len()];
    for i in (0..char_modes.len()).rev() {
        let j = MODE_TYPES.iter().position(|&m| m == cur_mode).unwrap();
        cur_mode = char_modes[i][j].expect("chosen ending mode must have a predecessor");
        result[i] = cur_mode;
    }
    result
}

/// Coalesces consecutive code points sharing a mode into one segment each.
fn split_into_segments(code_points: &[char], char_modes: &[Mode]) -> Vec<Segment> {
    let mut result = Vec::new();
    let mut cur_mode = char_modes[0];
    let mut start = 0;
    let mut i = 0;

    loop {
        i += 1;
        if i < code_points.len() && char_modes[i] == cur_mode {
            continue;
        }

        let run: String = code_points[start..i].iter().collect();
        result.push(match cur_mode {
            Mode::Byte => Segment::make_bytes(run.as_bytes()),
            Mode::Numeric => Segment::make_numeric(&run),
            Mode::Alphanumeric => Segment::make_alphanumeric(&run),
            Mode::Kanji => Segment::make_kanji(&run),
            Mode::Eci => unreachable!("ECI is never chosen by the planner"),
        });

        if i >= code_points.len() {
            return result;
        }
        cur_mode = char_modes[i];
        start = i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_capacity(version: Version, _ecl: EcLevel) -> usize {
        // Generous stand-in capacity so every test string fits at any
        // version, letting these tests focus purely on mode selection.
        usize::from(version.value()) * 100 + 100
    }

    #[test]
    fn pure_numeric_text_becomes_one_numeric_segment() {
        let segs = make_segments_optimally_with(
            "0123456789",
            EcLevel::Medium,
            Version::new(1),
            Version::new(5),
            fake_capacity,
        )
        .unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].mode(), Mode::Numeric);
    }

    #[test]
    fn mixed_text_splits_into_runs_by_mode() {
        let segs = make_segments_optimally_with(
            "ABC123xyz",
            EcLevel::Medium,
            Version::new(1),
            Version::new(5),
            fake_capacity,
        )
        .unwrap();
        // Alphanumeric run "ABC123" then byte run "xyz" (lowercase isn't
        // alphanumeric-mode encodable).
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].mode(), Mode::Alphanumeric);
        assert_eq!(segs[1].mode(), Mode::Byte);
    }

    #[test]
    fn kanji_text_becomes_a_kanji_segment() {
        let segs = make_segments_optimally_with(
            "\u{4E9C}\u{3042}",
            EcLevel::Medium,
            Version::new(1),
            Version::new(5),
            fake_capacity,
        )
        .unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].mode(), Mode::Kanji);
    }

    #[test]
    fn empty_text_yields_no_segments() {
        let segs = make_segments_optimally_with(
            "",
            EcLevel::Medium,
            Version::new(1),
            Version::new(5),
            fake_capacity,
        )
        .unwrap();
        assert!(segs.is_empty());
    }

    #[test]
    fn data_too_long_when_nothing_fits() {
        let err = make_segments_optimally_with(
            "0123456789",
            EcLevel::Medium,
            Version::new(1),
            Version::new(1),
            |_, _| 0,
        )
        .unwrap_err();
        assert!(matches!(err, QrError::DataTooLong { .. }));
    }

    #[test]
    fn public_entry_uses_the_real_capacity_table() {
        let segs = make_segments_optimally("HELLO WORLD 123", EcLevel::Medium, Version::new(1), Version::new(40)).unwrap();
        assert!(!segs.is_empty());
    }
}
