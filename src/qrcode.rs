#![forbid(unsafe_code)]
//! QR code encoding.
//!
//! Turns text into a [`ModuleMatrix`] following QR Code Model 2: versions 1 to
//! 40, four error correction levels, and numeric, alphanumeric or byte mode.
//! The encoder always picks the smallest version that holds the content at the
//! requested level, and the mask with the lowest penalty score.
//!
//! # Example
//!
//! ```rust
//! use qrforge::qrcode::{ErrorCorrection, QrCode};
//!
//! let qr = QrCode::encode_text("Hello, World!", ErrorCorrection::Low).unwrap();
//! assert_eq!(qr.version().value(), 1);
//! assert_eq!(qr.matrix().side(), 21);
//! ```

use core::fmt;
use core::str::FromStr;

use tracing::debug;

use crate::error::{QrError, QrResult};
use crate::matrix::{ModuleMatrix, Symbol};

/// An encoded QR code symbol.
///
/// Instances are immutable; the grid is available through [`QrCode::matrix`]
/// or by value through [`QrCode::into_matrix`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,
    correction: ErrorCorrection,
    mask: Mask,
    matrix: ModuleMatrix,
}

impl QrCode {
    /// Encodes `text` at the given error correction level, choosing the mask
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::ContentTooLong`] if the text does not fit in a
    /// version 40 symbol at `correction`.
    pub fn encode_text(text: &str, correction: ErrorCorrection) -> QrResult<Self> {
        Self::encode_text_with_mask(text, correction, None)
    }

    /// Encodes `text` like [`QrCode::encode_text`], but uses `mask` instead of
    /// searching for the best one when it is `Some`.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to encode.
    /// * `correction` - Error correction level. It is never raised automatically.
    /// * `mask` - Forced mask pattern, or `None` for penalty-based selection.
    pub fn encode_text_with_mask(
        text: &str,
        correction: ErrorCorrection,
        mask: Option<Mask>,
    ) -> QrResult<Self> {
        let segment = Segment::from_text(text);
        let version = Version::fitting(&segment, correction)
            .ok_or(QrError::ContentTooLong { correction })?;

        let data = data_codewords(&segment, version, correction);
        let codewords = add_ecc_and_interleave(&data, version, correction);

        let mut symbol = Symbol::new(version);
        symbol.draw_codewords(&codewords);

        let mask = mask.unwrap_or_else(|| best_mask(&mut symbol, correction));
        symbol.apply_mask(mask);
        symbol.draw_format_bits(correction, mask);

        debug!(
            mode = ?segment.mode,
            chars = segment.num_chars,
            version = version.value(),
            mask = mask.value(),
            "encoded qr code"
        );
        Ok(Self {
            version,
            correction,
            mask,
            matrix: symbol.into_matrix(),
        })
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn error_correction(&self) -> ErrorCorrection {
        self.correction
    }

    /// Returns the mask that was applied, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn matrix(&self) -> &ModuleMatrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> ModuleMatrix {
        self.matrix
    }
}

/// Encodes `content` at `correction` and returns only the module grid.
pub fn encode(content: &str, correction: ErrorCorrection) -> QrResult<ModuleMatrix> {
    QrCode::encode_text(content, correction).map(QrCode::into_matrix)
}

/// Tries every mask on `symbol` and returns the one with the lowest penalty.
/// The symbol is left unmasked.
fn best_mask(symbol: &mut Symbol, correction: ErrorCorrection) -> Mask {
    let mut best = Mask::new(0);
    let mut min_penalty = i32::MAX;
    for mask in Mask::all() {
        symbol.apply_mask(mask);
        symbol.draw_format_bits(correction, mask);
        let penalty = symbol.penalty_score();
        if penalty < min_penalty {
            best = mask;
            min_penalty = penalty;
        }
        symbol.apply_mask(mask);
    }
    best
}

/// Builds the data codeword sequence: segment header and payload, terminator,
/// byte alignment, then alternating pad bytes up to the version's capacity.
fn data_codewords(segment: &Segment, version: Version, correction: ErrorCorrection) -> Vec<u8> {
    let capacity_bits = version.data_codewords(correction) * 8;
    let mut bb = BitBuffer::new();
    bb.append_bits(segment.mode.mode_bits(), 4);
    bb.append_bits(segment.num_chars as u32, segment.mode.char_count_bits(version));
    bb.append_buffer(&segment.data);
    debug_assert!(bb.len() <= capacity_bits);

    let terminator = (capacity_bits - bb.len()).min(4);
    bb.append_bits(0, terminator as u8);
    let alignment = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, alignment as u8);

    for &pad in [0xec, 0x11].iter().cycle() {
        if bb.len() >= capacity_bits {
            break;
        }
        bb.append_bits(pad, 8);
    }
    bb.into_bytes()
}

/// Splits `data` into blocks, appends Reed-Solomon ECC to each block and
/// interleaves the result column by column.
///
/// Short blocks come first; long blocks carry one extra data codeword.
fn add_ecc_and_interleave(data: &[u8], version: Version, correction: ErrorCorrection) -> Vec<u8> {
    debug_assert_eq!(data.len(), version.data_codewords(correction));
    let layout = BlockLayout::new(version, correction);
    let rs = ReedSolomon::new(layout.ecc_len);

    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(layout.num_blocks);
    let mut rest = data;
    for i in 0..layout.num_blocks {
        let (block_data, tail) = rest.split_at(layout.data_len(i));
        rest = tail;
        let mut block = block_data.to_vec();
        if i < layout.num_short {
            // filler so every block has the same length; skipped below
            block.push(0);
        }
        block.extend(rs.remainder(block_data));
        blocks.push(block);
    }

    let mut result = Vec::with_capacity(layout.raw_codewords);
    let block_len = layout.short_data_len + 1 + layout.ecc_len;
    for i in 0..block_len {
        for (j, block) in blocks.iter().enumerate() {
            if i != layout.short_data_len || j >= layout.num_short {
                result.push(block[i]);
            }
        }
    }
    debug_assert_eq!(result.len(), layout.raw_codewords);
    result
}

/// Block structure of one version and level.
struct BlockLayout {
    num_blocks: usize,
    num_short: usize,
    short_data_len: usize,
    ecc_len: usize,
    raw_codewords: usize,
}

impl BlockLayout {
    fn new(version: Version, correction: ErrorCorrection) -> Self {
        let num_blocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, version, correction);
        let ecc_len = table_get(&ECC_CODEWORDS_PER_BLOCK, version, correction);
        let raw_codewords = version.raw_data_modules() / 8;
        Self {
            num_blocks,
            num_short: num_blocks - raw_codewords % num_blocks,
            short_data_len: raw_codewords / num_blocks - ecc_len,
            ecc_len,
            raw_codewords,
        }
    }

    fn data_len(&self, block: usize) -> usize {
        self.short_data_len + usize::from(block >= self.num_short)
    }
}

/// Reed-Solomon ECC generator over GF(2^8/0x11D).
struct ReedSolomon {
    divisor: Vec<u8>,
}

impl ReedSolomon {
    /// Builds the generator polynomial `(x - a^0)(x - a^1)...(x - a^(degree-1))`,
    /// stored without its leading 1 coefficient.
    fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "degree out of range");
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = gf_multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = gf_multiply(root, 0x02);
        }
        Self { divisor }
    }

    /// Remainder of `data` (as a polynomial) divided by the generator.
    fn remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            let factor = b ^ result[0];
            result.rotate_left(1);
            if let Some(last) = result.last_mut() {
                *last = 0;
            }
            for (x, &y) in result.iter_mut().zip(&self.divisor) {
                *x ^= gf_multiply(y, factor);
            }
        }
        result
    }
}

/// Russian peasant multiplication in GF(2^8) modulo `x^8 + x^4 + x^3 + x^2 + 1`.
fn gf_multiply(x: u8, y: u8) -> u8 {
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1d);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

// Indexed by [level ordinal][version]; column 0 is unused.
static ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

fn table_get(table: &'static [[u8; 41]; 4], version: Version, correction: ErrorCorrection) -> usize {
    usize::from(table[correction.ordinal()][usize::from(version.value())])
}

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ErrorCorrection {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl ErrorCorrection {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::Quartile, Self::High];

    fn ordinal(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::Quartile => 2,
            Self::High => 3,
        }
    }

    /// The 2-bit value stored in the format information.
    pub(crate) fn format_bits(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 0,
            Self::Quartile => 3,
            Self::High => 2,
        }
    }

    /// Single-letter name used on the wire: `L`, `M`, `Q` or `H`.
    pub fn letter(self) -> char {
        match self {
            Self::Low => 'L',
            Self::Medium => 'M',
            Self::Quartile => 'Q',
            Self::High => 'H',
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for ErrorCorrection {
    type Err = QrError;

    /// Parses a level letter, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(Self::Low),
            "M" => Ok(Self::Medium),
            "Q" => Ok(Self::Quartile),
            "H" => Ok(Self::High),
            _ => Err(QrError::InvalidCorrectionLevel),
        }
    }
}

/// Encoding mode of a data segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl SegmentMode {
    /// Picks the most compact mode able to represent all of `text`.
    pub fn for_text(text: &str) -> Self {
        if text.bytes().all(|b| b.is_ascii_digit()) {
            Self::Numeric
        } else if text.bytes().all(|b| alphanumeric_value(b).is_some()) {
            Self::Alphanumeric
        } else {
            Self::Byte
        }
    }

    fn mode_bits(self) -> u32 {
        match self {
            Self::Numeric => 0x1,
            Self::Alphanumeric => 0x2,
            Self::Byte => 0x4,
        }
    }

    /// Width of the character count field for this mode at `version`.
    fn char_count_bits(self, version: Version) -> u8 {
        let widths = match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
        };
        widths[usize::from((version.value() + 7) / 17)]
    }
}

/// Characters of the alphanumeric mode, in code order.
static ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

fn alphanumeric_value(b: u8) -> Option<u32> {
    ALPHANUMERIC_CHARSET.iter().position(|&c| c == b).map(|i| i as u32)
}

/// A run of content encoded in a single mode.
struct Segment {
    mode: SegmentMode,
    num_chars: usize,
    data: BitBuffer,
}

impl Segment {
    fn from_text(text: &str) -> Self {
        match SegmentMode::for_text(text) {
            SegmentMode::Numeric => Self::numeric(text),
            SegmentMode::Alphanumeric => Self::alphanumeric(text),
            SegmentMode::Byte => Self::bytes(text.as_bytes()),
        }
    }

    /// Digits are packed three at a time into 10 bits; a trailing group of one
    /// or two digits takes 4 or 7 bits.
    fn numeric(text: &str) -> Self {
        let mut data = BitBuffer::new();
        for group in text.as_bytes().chunks(3) {
            let value = group.iter().fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'));
            data.append_bits(value, group.len() as u8 * 3 + 1);
        }
        Self {
            mode: SegmentMode::Numeric,
            num_chars: text.len(),
            data,
        }
    }

    /// Characters are packed in pairs into 11 bits; an odd trailing character
    /// takes 6 bits.
    fn alphanumeric(text: &str) -> Self {
        let mut data = BitBuffer::new();
        for pair in text.as_bytes().chunks(2) {
            let value = pair
                .iter()
                .filter_map(|&b| alphanumeric_value(b))
                .fold(0u32, |acc, v| acc * 45 + v);
            data.append_bits(value, if pair.len() == 2 { 11 } else { 6 });
        }
        Self {
            mode: SegmentMode::Alphanumeric,
            num_chars: text.len(),
            data,
        }
    }

    fn bytes(bytes: &[u8]) -> Self {
        let mut data = BitBuffer::new();
        for &b in bytes {
            data.append_bits(u32::from(b), 8);
        }
        Self {
            mode: SegmentMode::Byte,
            num_chars: bytes.len(),
            data,
        }
    }

    /// Header plus payload length at `version`, or `None` if the character
    /// count does not fit in the count field.
    fn total_bits(&self, version: Version) -> Option<usize> {
        let count_bits = self.mode.char_count_bits(version);
        if self.num_chars >= 1usize << count_bits {
            return None;
        }
        Some(4 + usize::from(count_bits) + self.data.len())
    }
}

/// An append-only sequence of bits, packed big-endian into bytes.
#[derive(Default)]
struct BitBuffer {
    bytes: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    fn new() -> Self {
        Self::default()
    }

    fn len(&self) -> usize {
        self.length
    }

    /// Appends the low `len` bits of `val`, most significant first.
    fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "value out of range");
        for i in (0..len).rev() {
            if self.length % 8 == 0 {
                self.bytes.push(0);
            }
            let bit = ((val >> i) & 1) as u8;
            if let Some(last) = self.bytes.last_mut() {
                *last |= bit << (7 - self.length % 8);
            }
            self.length += 1;
        }
    }

    fn append_buffer(&mut self, other: &BitBuffer) {
        for i in 0..other.length {
            let bit = (other.bytes[i >> 3] >> (7 - (i & 7))) & 1;
            self.append_bits(u32::from(bit), 1);
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of a symbol of this version, in modules.
    pub const fn side(self) -> usize {
        self.0 as usize * 4 + 17
    }

    /// Smallest version that holds `segment` at `correction`.
    fn fitting(segment: &Segment, correction: ErrorCorrection) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self).find(|&version| {
            segment
                .total_bits(version)
                .is_some_and(|used| used <= version.data_codewords(correction) * 8)
        })
    }

    /// Number of modules available for data and ECC after all function
    /// patterns are placed; includes remainder bits.
    pub(crate) fn raw_data_modules(self) -> usize {
        let ver = usize::from(self.0);
        let mut result = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let num_align = ver / 7 + 2;
            result -= (25 * num_align - 10) * num_align - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    /// Number of 8-bit data codewords (excluding ECC) at `correction`.
    pub(crate) fn data_codewords(self, correction: ErrorCorrection) -> usize {
        self.raw_data_modules() / 8
            - table_get(&ECC_CODEWORDS_PER_BLOCK, self, correction)
                * table_get(&NUM_ERROR_CORRECTION_BLOCKS, self, correction)
    }

    /// Center coordinates of the alignment patterns along each axis, ascending.
    pub(crate) fn alignment_pattern_positions(self) -> Vec<usize> {
        let ver = usize::from(self.0);
        if ver == 1 {
            return Vec::new();
        }
        let num_align = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            (ver * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
        };
        let mut positions = vec![6; num_align];
        let mut pos = self.side() - 7;
        for slot in positions.iter_mut().skip(1).rev() {
            *slot = pos;
            pos = pos.saturating_sub(step);
        }
        positions
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    fn all() -> impl Iterator<Item = Self> {
        (0..8).map(Self)
    }

    /// Whether this mask flips the module at column `x`, row `y`.
    pub(crate) fn inverts(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            _ => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::reader::read_text;
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert_eq!(SegmentMode::for_text("1234567890"), SegmentMode::Numeric);
        assert_eq!(SegmentMode::for_text("HELLO WORLD"), SegmentMode::Alphanumeric);
        assert_eq!(SegmentMode::for_text("Hello World"), SegmentMode::Byte);
        assert_eq!(SegmentMode::for_text("こんにちは"), SegmentMode::Byte);
    }

    #[test]
    fn test_reed_solomon_hello_world_1m() {
        // data and ECC codewords of "HELLO WORLD" at version 1-M
        let data = [32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17];
        let segment = Segment::from_text("HELLO WORLD");
        assert_eq!(data_codewords(&segment, Version::new(1), ErrorCorrection::Medium), data);
        let rs = ReedSolomon::new(10);
        assert_eq!(rs.remainder(&data), [196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
    }

    #[test]
    fn test_numeric_packing() {
        // 01234567 -> 012 | 345 | 67
        let segment = Segment::numeric("01234567");
        assert_eq!(segment.data.len(), 10 + 10 + 7);
        assert_eq!(segment.data.bytes[0], 0b0000_0011);
    }

    #[test]
    fn test_version_capacity_thresholds() {
        // 17 bytes fill 1-L; the 18th needs version 2
        let qr = QrCode::encode_text(&"a".repeat(17), ErrorCorrection::Low).unwrap();
        assert_eq!(qr.version().value(), 1);
        let qr = QrCode::encode_text(&"a".repeat(18), ErrorCorrection::Low).unwrap();
        assert_eq!(qr.version().value(), 2);
    }

    #[test]
    fn test_maximum_byte_capacity_per_level() {
        let limits = [
            (ErrorCorrection::Low, 2953),
            (ErrorCorrection::Medium, 2331),
            (ErrorCorrection::Quartile, 1663),
            (ErrorCorrection::High, 1273),
        ];
        for (correction, max) in limits {
            let qr = QrCode::encode_text(&"a".repeat(max), correction).unwrap();
            assert_eq!(qr.version(), Version::MAX);
            let err = QrCode::encode_text(&"a".repeat(max + 1), correction).unwrap_err();
            assert!(matches!(err, QrError::ContentTooLong { correction: c } if c == correction));
        }
    }

    #[test]
    fn test_correction_level_is_not_boosted() {
        let qr = QrCode::encode_text("content", ErrorCorrection::Low).unwrap();
        assert_eq!(qr.error_correction(), ErrorCorrection::Low);
    }

    #[test]
    fn test_round_trip_all_modes_and_levels() {
        let samples = [
            "content",
            "0123456789",
            "HTTPS://EXAMPLE.COM/A-B",
            "Hello! こんにちは! ❤️ #@$%",
            "https://example.com/path?param1=value1&param2=value2",
        ];
        for text in samples {
            for correction in ErrorCorrection::ALL {
                let qr = QrCode::encode_text(text, correction).unwrap();
                assert_eq!(read_text(qr.matrix()).as_deref(), Some(text), "{text} at {correction}");
            }
        }
    }

    #[test]
    fn test_round_trip_multi_block_versions() {
        for len in [1, 100, 500, 1000, 1273] {
            let text: String = (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
            let qr = QrCode::encode_text(&text, ErrorCorrection::High).unwrap();
            assert_eq!(read_text(qr.matrix()), Some(text));
        }
    }

    #[test]
    fn test_forced_mask_is_recorded() {
        for m in 0..8 {
            let qr = QrCode::encode_text_with_mask("mask", ErrorCorrection::Quartile, Some(Mask::new(m))).unwrap();
            assert_eq!(qr.mask().value(), m);
            assert_eq!(read_text(qr.matrix()).as_deref(), Some("mask"));
        }
    }

    #[test]
    fn test_automatic_mask_has_minimal_penalty() {
        let auto = QrCode::encode_text("penalty", ErrorCorrection::Medium).unwrap();
        let score = |qr: &QrCode| {
            let mut symbol = Symbol::new(qr.version());
            let data = data_codewords(&Segment::from_text("penalty"), qr.version(), ErrorCorrection::Medium);
            symbol.draw_codewords(&add_ecc_and_interleave(&data, qr.version(), ErrorCorrection::Medium));
            symbol.apply_mask(qr.mask());
            symbol.draw_format_bits(ErrorCorrection::Medium, qr.mask());
            symbol.penalty_score()
        };
        let best = score(&auto);
        for m in 0..8 {
            let forced =
                QrCode::encode_text_with_mask("penalty", ErrorCorrection::Medium, Some(Mask::new(m))).unwrap();
            let penalty = score(&forced);
            assert!(best <= penalty);
            if penalty == best {
                assert!(auto.mask().value() <= m, "ties go to the lowest mask");
            }
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = encode("same input", ErrorCorrection::Quartile).unwrap();
        let b = encode("same input", ErrorCorrection::Quartile).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_alignment_positions() {
        assert!(Version::new(1).alignment_pattern_positions().is_empty());
        assert_eq!(Version::new(2).alignment_pattern_positions(), [6, 18]);
        assert_eq!(Version::new(7).alignment_pattern_positions(), [6, 22, 38]);
        assert_eq!(Version::new(32).alignment_pattern_positions(), [6, 34, 60, 86, 112, 138]);
        assert_eq!(Version::new(40).alignment_pattern_positions(), [6, 30, 58, 86, 114, 142, 170]);
    }

    #[test]
    fn test_correction_parsing() {
        let levels = [
            ("l", ErrorCorrection::Low),
            ("M", ErrorCorrection::Medium),
            ("q", ErrorCorrection::Quartile),
            ("H", ErrorCorrection::High),
        ];
        for (text, level) in levels {
            assert_eq!(text.parse::<ErrorCorrection>().unwrap(), level);
        }
        for bad in ["", "X", "LOW", "MEDIUM", "1", " L"] {
            assert!(matches!(bad.parse::<ErrorCorrection>(), Err(QrError::InvalidCorrectionLevel)));
        }
    }
}
