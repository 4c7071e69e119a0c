//! Module grid construction.
//!
//! [`ModuleMatrix`] is the finished, read-only grid handed to the renderer.
//! [`Symbol`] is the mutable workspace the encoder draws into: it keeps a second
//! grid that marks function modules (finders, timing, alignment, format and
//! version areas) so that codeword placement and masking only ever touch data
//! modules.

use crate::qrcode::{ErrorCorrection, Mask, Version};

/// A square grid of dark (`true`) and light (`false`) modules.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleMatrix {
    side: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Creates an all-light matrix with the given side length.
    pub fn new(side: usize) -> Self {
        Self {
            side,
            modules: vec![false; side * side],
        }
    }

    /// Width and height of the matrix, in modules.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns the color of the module at column `x`, row `y`.
    ///
    /// Coordinates outside the grid read as light, which lets callers treat the
    /// quiet zone uniformly.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.side && y < self.side && self.modules[y * self.side + x]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, dark: bool) {
        assert!(x < self.side && y < self.side, "module out of range");
        self.modules[y * self.side + x] = dark;
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.modules.chunks(self.side.max(1))
    }

    /// Number of dark modules in the grid.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&dark| dark).count()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Drawing surface used while a symbol is being built.
pub(crate) struct Symbol {
    version: Version,
    modules: ModuleMatrix,
    function: ModuleMatrix,
}

impl Symbol {
    /// Creates a symbol for `version` with every function pattern drawn and the
    /// format areas reserved.
    pub(crate) fn new(version: Version) -> Self {
        let side = version.side();
        let mut symbol = Self {
            version,
            modules: ModuleMatrix::new(side),
            function: ModuleMatrix::new(side),
        };
        symbol.draw_function_patterns();
        symbol
    }

    pub(crate) fn side(&self) -> usize {
        self.modules.side()
    }

    pub(crate) fn is_function(&self, x: usize, y: usize) -> bool {
        self.function.get(x, y)
    }

    pub(crate) fn into_matrix(self) -> ModuleMatrix {
        self.modules
    }

    fn set_function(&mut self, x: i32, y: i32, dark: bool) {
        let range = 0..self.side() as i32;
        if range.contains(&x) && range.contains(&y) {
            self.modules.set(x as usize, y as usize, dark);
            self.function.set(x as usize, y as usize, true);
        }
    }

    fn draw_function_patterns(&mut self) {
        let size = self.side() as i32;
        for i in 0..size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        let positions = self.version.alignment_pattern_positions();
        let last = positions.len().saturating_sub(1);
        for (i, &px) in positions.iter().enumerate() {
            for (j, &py) in positions.iter().enumerate() {
                // the three corners already hold finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern(px as i32, py as i32);
            }
        }

        // placeholder bits so the format areas count as function modules
        self.draw_format_bits(ErrorCorrection::Low, Mask::new(0));
        self.draw_version_bits();
    }

    /// Draws a 9x9 finder pattern (including its separator) centered at `x`, `y`.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist = dx.abs().max(dy.abs());
                self.set_function(x + dx, y + dy, dist != 2 && dist != 4);
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let dist = dx.abs().max(dy.abs());
                self.set_function(x + dx, y + dy, dist != 1);
            }
        }
    }

    /// Draws both copies of the format information and the always-dark module.
    pub(crate) fn draw_format_bits(&mut self, correction: ErrorCorrection, mask: Mask) {
        let bits = format_bits(correction, mask);
        let size = self.side() as i32;

        // copy around the top-left finder
        for i in 0..=5 {
            self.set_function(8, i, get_bit(bits, i));
        }
        self.set_function(8, 7, get_bit(bits, 6));
        self.set_function(8, 8, get_bit(bits, 7));
        self.set_function(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function(14 - i, 8, get_bit(bits, i));
        }

        // copy split between the other two finders
        for i in 0..8 {
            self.set_function(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function(8, size - 8, true);
    }

    fn draw_version_bits(&mut self) {
        let ver = u32::from(self.version.value());
        if ver < 7 {
            return;
        }
        let mut rem = ver;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
        }
        let bits = (ver << 12) | rem;

        let size = self.side() as i32;
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = size - 11 + i % 3;
            let b = i / 3;
            self.set_function(a, b, bit);
            self.set_function(b, a, bit);
        }
    }

    /// Coordinates of every data module in placement order: two columns at a
    /// time, snaking upward and downward from the bottom-right corner and
    /// skipping the vertical timing column.
    pub(crate) fn data_positions(&self) -> Vec<(usize, usize)> {
        let size = self.side() as i32;
        let mut positions = Vec::with_capacity(self.version.raw_data_modules());
        let mut right = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = (if upward { size - 1 - vert } else { vert }) as usize;
                for x in [right as usize, (right - 1) as usize] {
                    if !self.is_function(x, y) {
                        positions.push((x, y));
                    }
                }
            }
            right -= 2;
        }
        positions
    }

    /// Places the final codeword sequence into the data modules. Remainder
    /// modules left over after the last codeword stay light.
    pub(crate) fn draw_codewords(&mut self, codewords: &[u8]) {
        debug_assert_eq!(codewords.len(), self.version.raw_data_modules() / 8);
        for (i, (x, y)) in self.data_positions().into_iter().enumerate().take(codewords.len() * 8) {
            let dark = (codewords[i >> 3] >> (7 - (i & 7))) & 1 != 0;
            self.modules.set(x, y, dark);
        }
    }

    /// XORs `mask` over every data module. Applying the same mask twice
    /// restores the original grid.
    pub(crate) fn apply_mask(&mut self, mask: Mask) {
        let side = self.side();
        for y in 0..side {
            for x in 0..side {
                if !self.is_function(x, y) && mask.inverts(x, y) {
                    let dark = self.modules.get(x, y);
                    self.modules.set(x, y, !dark);
                }
            }
        }
    }

    /// Scores the current grid; lower is better.
    pub(crate) fn penalty_score(&self) -> i32 {
        let side = self.side();
        let grid = &self.modules;
        let mut result = 0;

        for y in 0..side {
            result += line_penalty(side, |i| grid.get(i, y));
        }
        for x in 0..side {
            result += line_penalty(side, |i| grid.get(x, i));
        }

        for y in 0..side.saturating_sub(1) {
            for x in 0..side - 1 {
                let color = grid.get(x, y);
                if color == grid.get(x + 1, y)
                    && color == grid.get(x, y + 1)
                    && color == grid.get(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        let total = (side * side) as i32;
        let dark = grid.dark_count() as i32;
        // smallest k such that the dark share lies within (45 - 5k)% ..= (55 + 5k)%
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
        result
    }
}

/// Penalties N1 (long runs) and N3 (finder-like patterns) for one row or column.
fn line_penalty(side: usize, module: impl Fn(usize) -> bool) -> i32 {
    let mut result = 0;
    let mut run_color = false;
    let mut run_len = 0;
    let mut history = RunHistory::new(side as i32);
    for i in 0..side {
        if module(i) == run_color {
            run_len += 1;
            if run_len == 5 {
                result += PENALTY_N1;
            } else if run_len > 5 {
                result += 1;
            }
        } else {
            history.push(run_len);
            if !run_color {
                result += history.count_finder_patterns() * PENALTY_N3;
            }
            run_color = module(i);
            run_len = 1;
        }
    }
    result + history.terminate(run_color, run_len) * PENALTY_N3
}

/// Lengths of the most recent runs along a line, newest first.
///
/// The light border outside the symbol is folded into the first and last runs
/// so that finder-like patterns touching the edge are still detected.
struct RunHistory {
    side: i32,
    runs: [i32; 7],
}

impl RunHistory {
    fn new(side: i32) -> Self {
        Self { side, runs: [0; 7] }
    }

    fn push(&mut self, mut run_len: i32) {
        if self.runs[0] == 0 {
            run_len += self.side;
        }
        self.runs.copy_within(0..6, 1);
        self.runs[0] = run_len;
    }

    /// Counts 1:1:3:1:1 dark/light patterns with at least four light modules
    /// on either side, ending at the most recent light run.
    fn count_finder_patterns(&self) -> i32 {
        let r = &self.runs;
        let n = r[1];
        let core = n > 0 && r[2] == n && r[3] == n * 3 && r[4] == n && r[5] == n;
        i32::from(core && r[0] >= n * 4 && r[6] >= n) + i32::from(core && r[6] >= n * 4 && r[0] >= n)
    }

    fn terminate(mut self, run_color: bool, mut run_len: i32) -> i32 {
        if run_color {
            self.push(run_len);
            run_len = 0;
        }
        self.push(run_len + self.side);
        self.count_finder_patterns()
    }
}

/// The 15-bit BCH-protected format word for a level and mask, already XORed
/// with the fixed `0x5412` pattern.
pub(crate) fn format_bits(correction: ErrorCorrection, mask: Mask) -> u32 {
    let data = u32::from((correction.format_bits() << 3) | mask.value());
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

fn get_bit(x: u32, i: i32) -> bool {
    (x >> i) & 1 != 0
}
