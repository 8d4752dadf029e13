//! The module grid: function patterns, codeword layout, masking, and
//! penalty scoring. `Canvas` is the mutable scratch space a [`crate::qr_code::QrCode`]
//! is built from; once construction finishes its function-module mask is
//! dropped and only the finished grid survives into the public type.

use crate::ec_level::EcLevel;
use crate::mask::Mask;
use crate::penalty::FinderPenalty;
use crate::reed_solomon::{compute_divisor, compute_remainder};
use crate::tables::{ECC_CODEWORDS_PER_BLOCK, NUM_ERROR_CORRECTION_BLOCKS};
use crate::version::Version;

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

pub(crate) struct Canvas {
    size: i32,
    modules: Vec<bool>,
    isfunction: Vec<bool>,
}

impl Canvas {
    pub(crate) fn new(version: Version) -> Self {
        let size = version.size();
        let area = (size * size) as usize;
        Self { size, modules: vec![false; area], isfunction: vec![false; area] }
    }

    pub(crate) fn size(&self) -> i32 {
        self.size
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    fn module(&self, x: i32, y: i32) -> bool {
        self.modules[self.index(x, y)]
    }

    fn module_mut(&mut self, x: i32, y: i32) -> &mut bool {
        let i = self.index(x, y);
        &mut self.modules[i]
    }

    /// Consumes the canvas and returns its finished module grid, discarding
    /// the construction-time function-module mask.
    pub(crate) fn into_modules(self) -> Vec<bool> {
        self.modules
    }

    /*---- Function patterns ----*/

    /// Draws every function pattern: timing, finders, alignment, and a
    /// placeholder format/version block (format bits use mask 0 until the
    /// real mask is chosen).
    pub(crate) fn draw_function_patterns(&mut self, version: Version, ecl: EcLevel) {
        let size = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        let align_pat_pos = Self::alignment_pattern_positions(version, size);
        let num_align = align_pat_pos.len();
        for i in 0..num_align {
            for j in 0..num_align {
                let is_finder_corner =
                    (i == 0 && j == 0) || (i == 0 && j == num_align - 1) || (i == num_align - 1 && j == 0);
                if !is_finder_corner {
                    self.draw_alignment_pattern(align_pat_pos[i], align_pat_pos[j]);
                }
            }
        }

        self.draw_format_bits(ecl, Mask::new(0));
        self.draw_version(version);
    }

    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx = x + dx;
                let yy = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn set_function_module(&mut self, x: i32, y: i32, is_dark: bool) {
        let i = self.index(x, y);
        self.modules[i] = is_dark;
        self.isfunction[i] = true;
    }

    /// Draws both copies of the format information (with its BCH error
    /// correction bits) for the given ECC level and mask.
    pub(crate) fn draw_format_bits(&mut self, ecl: EcLevel, mask: Mask) {
        let data = ecl.format_bits() << 3 | u32::from(mask.value());
        let mut rem = data;
        for _ in 0..10 {
            rem = (rem << 1) ^ ((rem >> 9) * 0x537);
        }
        let bits = (data << 10 | rem) ^ 0x5412;
        debug_assert_eq!(bits >> 15, 0);

        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        let size = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    fn draw_version(&mut self, version: Version) {
        if version.value() < 7 {
            return;
        }
        let data = u32::from(version.value());
        let mut rem = data;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
        }
        let bits = data << 12 | rem;
        debug_assert_eq!(bits >> 18, 0);

        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Ascending alignment-pattern center coordinates for `version`, shared
    /// on both axes. Empty for version 1.
    fn alignment_pattern_positions(version: Version, size: i32) -> Vec<i32> {
        let ver = version.value();
        if ver == 1 {
            return Vec::new();
        }
        let num_align = i32::from(ver) / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            (i32::from(ver) * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
        };
        let mut result: Vec<i32> = (0..num_align - 1).map(|i| size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    /*---- Codewords and masking ----*/

    /// Splits `data` into the standard short/long block layout, appends
    /// each block's Reed–Solomon codewords, and interleaves the result
    /// column-major, per ISO/IEC 18004 §6.6.
    pub(crate) fn add_ecc_and_interleave(version: Version, ecl: EcLevel, data: &[u8]) -> Vec<u8> {
        debug_assert_eq!(data.len(), num_data_codewords(version, ecl));

        let num_blocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, version, ecl);
        let block_ecc_len = table_get(&ECC_CODEWORDS_PER_BLOCK, version, ecl);
        let raw_codewords = num_raw_data_modules(version) / 8;
        let num_short_blocks = num_blocks - raw_codewords % num_blocks;
        let short_block_len = raw_codewords / num_blocks;

        let divisor = compute_divisor(block_ecc_len);
        let mut blocks = Vec::with_capacity(num_blocks);
        let mut k = 0;
        for i in 0..num_blocks {
            let dat_len = short_block_len - block_ecc_len + usize::from(i >= num_short_blocks);
            let dat = &data[k..k + dat_len];
            k += dat_len;
            let ecc = compute_remainder(dat, &divisor);
            let mut block = dat.to_vec();
            if i < num_short_blocks {
                block.push(0);
            }
            block.extend_from_slice(&ecc);
            blocks.push(block);
        }

        let mut result = Vec::with_capacity(raw_codewords);
        for i in 0..=short_block_len {
            for (j, block) in blocks.iter().enumerate() {
                if i != short_block_len - block_ecc_len || j >= num_short_blocks {
                    result.push(block[i]);
                }
            }
        }
        result
    }

    /// Lays `data` (an interleaved codeword stream) along the standard
    /// zig-zag data path, skipping function modules and the timing column.
    pub(crate) fn draw_codewords(&mut self, data: &[u8]) {
        let mut i = 0usize;
        let mut right = self.size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..self.size {
                for j in 0..2 {
                    let x = right - j;
                    let upward = (right + 1) & 2 == 0;
                    let y = if upward { self.size - 1 - vert } else { vert };
                    let idx = self.index(x, y);
                    if !self.isfunction[idx] && i < data.len() * 8 {
                        self.modules[idx] = get_bit(u32::from(data[i >> 3]), 7 - (i as i32 & 7));
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
    }

    /// XORs every non-function module with mask formula `mask`. Applying
    /// the same mask twice is the identity, since XOR is self-inverse.
    pub(crate) fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = self.index(x, y);
                if !self.isfunction[idx] {
                    self.modules[idx] ^= mask.invert(x, y);
                }
            }
        }
    }

    /// Sums the four ISO/IEC 18004 penalty terms over the current module
    /// state. Lower is better; used to pick among the eight mask patterns.
    pub(crate) fn penalty_score(&self) -> i32 {
        let mut result = 0;
        let size = self.size;

        for y in 0..size {
            let mut run_color = false;
            let mut run_x = 0;
            let mut history = FinderPenalty::new(size);
            for x in 0..size {
                if self.module(x, y) == run_color {
                    run_x += 1;
                    if run_x == 5 {
                        result += PENALTY_N1;
                    } else if run_x > 5 {
                        result += 1;
                    }
                } else {
                    history.add_history(run_x);
                    if !run_color {
                        result += history.count_patterns() * PENALTY_N3;
                    }
                    run_color = self.module(x, y);
                    run_x = 1;
                }
            }
            result += history.terminate_and_count(run_color, run_x) * PENALTY_N3;
        }

        for x in 0..size {
            let mut run_color = false;
            let mut run_y = 0;
            let mut history = FinderPenalty::new(size);
            for y in 0..size {
                if self.module(x, y) == run_color {
                    run_y += 1;
                    if run_y == 5 {
                        result += PENALTY_N1;
                    } else if run_y > 5 {
                        result += 1;
                    }
                } else {
                    history.add_history(run_y);
                    if !run_color {
                        result += history.count_patterns() * PENALTY_N3;
                    }
                    run_color = self.module(x, y);
                    run_y = 1;
                }
            }
            result += history.terminate_and_count(run_color, run_y) * PENALTY_N3;
        }

        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.module(x, y);
                if color == self.module(x + 1, y) && color == self.module(x, y + 1) && color == self.module(x + 1, y + 1) {
                    result += PENALTY_N2;
                }
            }
        }

        let dark: i32 = self.modules.iter().copied().map(i32::from).sum();
        let total = size * size;
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        debug_assert!((0..=9).contains(&k));
        result += k * PENALTY_N4;
        result
    }
}

fn get_bit(x: u32, i: i32) -> bool {
    (x >> i) & 1 != 0
}

fn table_get(table: &'static [[i16; 41]; 4], version: Version, ecl: EcLevel) -> usize {
    table[ecl.ordinal()][usize::from(version.value())] as usize
}

/// Total data bits a symbol of `version` can hold after subtracting all
/// function modules, remainder bits included (so not always a multiple of
/// 8). Range `[208, 29648]`.
pub(crate) fn num_raw_data_modules(version: Version) -> usize {
    let ver = usize::from(version.value());
    let mut result = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let num_align = ver / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    debug_assert!((208..=29648).contains(&result));
    result
}

/// Number of 8-bit *data* codewords (error correction excluded, remainder
/// bits discarded) a symbol of `(version, ecl)` can hold.
pub(crate) fn num_data_codewords(version: Version, ecl: EcLevel) -> usize {
    num_raw_data_modules(version) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, version, ecl) * table_get(&NUM_ERROR_CORRECTION_BLOCKS, version, ecl)
}
