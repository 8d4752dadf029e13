//! Run-history helper for the N3 (finder-like pattern) mask penalty term.
//!
//! A 1:1:3:1:1 run-length pattern preceded or followed by four modules of
//! the outer color looks like a finder pattern to a scanner and is
//! penalized. Tracking it requires remembering the last seven run lengths
//! seen along a row or column, including a virtual light run hanging off
//! each edge.

/// Tracks the last seven run lengths along one row or column.
pub(crate) struct FinderPenalty {
    size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    /// Creates a fresh tracker for a grid of side length `size`.
    pub(crate) fn new(size: i32) -> Self {
        Self { size, run_history: [0; 7] }
    }

    /// Records the end of a run and shifts the history back by one slot.
    ///
    /// The very first run (when the history is still all zero) is extended
    /// by `size`, standing in for the light border just off the edge.
    pub(crate) fn add_history(&mut self, mut current_run_length: i32) {
        if self.run_history[0] == 0 {
            current_run_length += self.size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = current_run_length;
    }

    /// Counts 1:1:3:1:1 finder-like patterns anchored on the run just
    /// pushed. Must be called only right after a light run is recorded.
    /// Returns 0, 1, or 2 (the pattern can match on both sides at once).
    pub(crate) fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    /// Terminates the final run at the end of a line (extending it by
    /// `size` for the virtual light border) and returns the finder-like
    /// pattern count for the whole line.
    pub(crate) fn terminate_and_count(mut self, current_run_color: bool, mut current_run_length: i32) -> i32 {
        if current_run_color {
            self.add_history(current_run_length);
            current_run_length = 0;
        }
        current_run_length += self.size;
        self.add_history(current_run_length);
        self.count_patterns()
    }
}

#[cfg(test)]
mod tests {
    use super::FinderPenalty;

    #[test]
    fn no_pattern_in_a_uniform_run() {
        let mut fp = FinderPenalty::new(21);
        fp.add_history(21);
        assert_eq!(fp.count_patterns(), 0);
    }

    #[test]
    fn recognizes_the_1_1_3_1_1_core_with_wide_flanks() {
        let mut fp = FinderPenalty::new(21);
        // Prime the history with an unrelated run so the next seven pushes
        // (the ones under test) aren't the "initial run" that gets bumped
        // by the virtual light border.
        fp.add_history(999);
        for len in [10, 1, 1, 3, 1, 1, 10] {
            fp.add_history(len);
        }
        assert_eq!(fp.count_patterns(), 2);
    }
}
