//! The generation pipeline: validate, encode, render, serialize.

use image::Rgb;
use tracing::debug;

use crate::codec::{write_image, OutputFormat};
use crate::config::GeneratorConfig;
use crate::error::QrResult;
use crate::qrcode::QrCode;
use crate::render::{render, render_blank};
use crate::validate::{validate, validate_size, GenerationRequest, RequestParams};

/// An encoded image ready to be sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResponse {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
}

/// Runs requests through the pipeline under a fixed configuration.
///
/// A `Generator` holds no per-request state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Validates `params` and renders the QR code image they describe.
    ///
    /// Stages run strictly in order and the first failure is returned; nothing
    /// is encoded for a request that fails validation.
    pub fn generate(&self, params: &RequestParams<'_>) -> QrResult<ImageResponse> {
        let request = validate(params, &self.config)?;
        self.generate_validated(&request)
    }

    /// Encodes, renders and serializes an already validated request.
    pub fn generate_validated(&self, request: &GenerationRequest) -> QrResult<ImageResponse> {
        let qr = QrCode::encode_text(&request.content, request.correction)?;
        let image = render(qr.matrix(), request.size, request.foreground, request.background, request.margin);
        let bytes = write_image(&image, request.format, self.config.jpeg_quality)?;
        debug!(
            version = qr.version().value(),
            size = image.width(),
            format = %request.format,
            len = bytes.len(),
            "generated image"
        );
        Ok(ImageResponse {
            bytes,
            media_type: request.format.media_type(),
        })
    }

    /// Produces a white placeholder image of `size` pixels without encoding
    /// anything. Only `size` and `format` are validated.
    pub fn blank(&self, size: i32, format: &str) -> QrResult<ImageResponse> {
        let size = validate_size(size, &self.config)?;
        let format = format.parse::<OutputFormat>()?;
        let image = render_blank(size, Rgb([255, 255, 255]));
        let bytes = write_image(&image, format, self.config.jpeg_quality)?;
        Ok(ImageResponse {
            bytes,
            media_type: format.media_type(),
        })
    }
}

/// Generates a QR code image with the default configuration.
///
/// # Arguments
///
/// * `content` - Text to encode; must not be blank.
/// * `size` - Image side in pixels, 150 to 350.
/// * `correction` - `L`, `M`, `Q` or `H`, any case.
/// * `format` - `png`, `jpeg` or `gif`, any case.
/// * `fg_color`, `bg_color` - Color names or `#RRGGBB`.
/// * `margin` - Quiet zone width in modules, 0 to 50.
///
/// # Example
///
/// ```rust
/// let response = qrforge::generate("content", 250, "L", "png", "black", "white", 1).unwrap();
/// assert_eq!(response.media_type, "image/png");
/// assert!(!response.bytes.is_empty());
/// ```
pub fn generate(
    content: &str,
    size: i32,
    correction: &str,
    format: &str,
    fg_color: &str,
    bg_color: &str,
    margin: i32,
) -> QrResult<ImageResponse> {
    Generator::default().generate(&RequestParams {
        content,
        size,
        correction,
        format,
        foreground: fg_color,
        background: bg_color,
        margin,
    })
}
