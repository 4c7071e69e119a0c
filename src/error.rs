//! Error type shared by every stage of the generation pipeline.

use thiserror::Error;

use crate::qrcode::ErrorCorrection;

/// Result alias used throughout the crate.
pub type QrResult<T> = Result<T, QrError>;

/// Everything that can go wrong while turning a request into an image.
///
/// All variants except [`QrError::ImageProcessing`] describe a problem with the
/// caller's input and carry a fixed, user-presentable message. Retrying with the
/// same input always yields the same error.
#[derive(Debug, Error)]
pub enum QrError {
    /// The content is empty or consists only of whitespace.
    #[error("Contents cannot be null or blank")]
    InvalidContent,

    /// The content does not fit in a version 40 symbol at the requested level.
    #[error("Contents are too long to fit in a QR code with error correction level {correction}")]
    ContentTooLong {
        /// Level the content was encoded with.
        correction: ErrorCorrection,
    },

    /// The requested image size is outside the accepted range.
    #[error("Image size must be between {min} and {max} pixels")]
    InvalidSize { min: u32, max: u32 },

    #[error("Permitted error correction levels are L, M, Q, H")]
    InvalidCorrectionLevel,

    #[error("Only png, jpeg and gif image types are supported")]
    InvalidFormat,

    /// A foreground or background color is neither a known name nor `#RRGGBB`.
    #[error("Colors must be a named color or a #RRGGBB hex value")]
    InvalidColor,

    #[error("Margin must be between 0 and {max} modules")]
    InvalidMargin { max: u32 },

    /// The image codec failed to serialize the rendered raster.
    #[error("Failed to write the generated image")]
    ImageProcessing(#[source] image::ImageError),
}

impl QrError {
    /// Returns `true` when the error was caused by the request rather than by
    /// the server.
    ///
    /// Boundary layers map client errors to `400 Bad Request` and everything
    /// else to `500 Internal Server Error`.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::ImageProcessing(_))
    }
}

impl From<image::ImageError> for QrError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageProcessing(err)
    }
}
