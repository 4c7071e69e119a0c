//! Request validation.
//!
//! The boundary layer hands over raw strings and integers exactly as it parsed
//! them. [`validate`] checks them one by one, in a fixed order, and turns them
//! into a [`GenerationRequest`] whose fields can no longer be invalid.

use image::Rgb;
use tracing::debug;

use crate::codec::OutputFormat;
use crate::color::parse_color;
use crate::config::{
    GeneratorConfig, DEFAULT_BACKGROUND, DEFAULT_CORRECTION, DEFAULT_FOREGROUND, DEFAULT_FORMAT,
    DEFAULT_MARGIN, DEFAULT_SIZE,
};
use crate::error::{QrError, QrResult};
use crate::qrcode::ErrorCorrection;

/// Unvalidated request parameters.
///
/// `Default` yields the documented defaults with empty content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParams<'a> {
    pub content: &'a str,
    pub size: i32,
    pub correction: &'a str,
    pub format: &'a str,
    pub foreground: &'a str,
    pub background: &'a str,
    pub margin: i32,
}

impl Default for RequestParams<'_> {
    fn default() -> Self {
        Self {
            content: "",
            size: DEFAULT_SIZE,
            correction: DEFAULT_CORRECTION,
            format: DEFAULT_FORMAT,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl<'a> RequestParams<'a> {
    /// Default parameters for `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }
}

/// A fully validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content: String,
    pub size: u32,
    pub correction: ErrorCorrection,
    pub format: OutputFormat,
    pub foreground: Rgb<u8>,
    pub background: Rgb<u8>,
    pub margin: u32,
}

/// Validates `params` against `config`, reporting the first failure in the
/// order content, size, correction, format, colors, margin.
pub fn validate(params: &RequestParams<'_>, config: &GeneratorConfig) -> QrResult<GenerationRequest> {
    let result = check(params, config);
    if let Err(err) = &result {
        debug!(%err, "rejected request");
    }
    result
}

fn check(params: &RequestParams<'_>, config: &GeneratorConfig) -> QrResult<GenerationRequest> {
    if is_blank(params.content) {
        return Err(QrError::InvalidContent);
    }
    let size = validate_size(params.size, config)?;
    let correction = params.correction.parse::<ErrorCorrection>()?;
    let format = params.format.parse::<OutputFormat>()?;
    let foreground = parse_color(params.foreground)?;
    let background = parse_color(params.background)?;
    let margin = u32::try_from(params.margin)
        .ok()
        .filter(|&margin| margin <= config.max_margin)
        .ok_or(QrError::InvalidMargin { max: config.max_margin })?;

    Ok(GenerationRequest {
        content: params.content.to_owned(),
        size,
        correction,
        format,
        foreground,
        background,
        margin,
    })
}

/// Whether `content` holds nothing but whitespace.
///
/// No-break spaces and the C1 next-line control are not whitespace here, so
/// content made only of them is accepted and encoded.
fn is_blank(content: &str) -> bool {
    content.chars().all(|c| match c {
        '\u{1c}'..='\u{1f}' => true,
        '\u{85}' | '\u{a0}' | '\u{2007}' | '\u{202f}' => false,
        c => c.is_whitespace(),
    })
}

/// Checks an image side against the configured bounds.
pub(crate) fn validate_size(size: i32, config: &GeneratorConfig) -> QrResult<u32> {
    u32::try_from(size)
        .ok()
        .filter(|size| (config.min_size..=config.max_size).contains(size))
        .ok_or(QrError::InvalidSize {
            min: config.min_size,
            max: config.max_size,
        })
}
