//! Image serialization.

use core::fmt;
use core::str::FromStr;

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::{QrError, QrResult};

/// Raster container formats the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
}

impl OutputFormat {
    pub const ALL: [Self; 3] = [Self::Png, Self::Jpeg, Self::Gif];

    /// MIME type sent alongside the encoded bytes.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }

    /// Lower-case name, also the usual file extension.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = QrError;

    /// Parses a format name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or(QrError::InvalidFormat)
    }
}

/// Encodes `image` as `format`.
///
/// PNG is lossless, JPEG uses the fixed `jpeg_quality`, GIF quantizes to a
/// palette.
///
/// # Errors
///
/// Any encoder failure is returned as [`QrError::ImageProcessing`].
pub fn write_image(image: &RgbImage, format: OutputFormat, jpeg_quality: u8) -> QrResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        }
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut bytes, jpeg_quality).write_image(
                image.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Gif => {
            // the trailer is written when the encoder is dropped
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.encode(image.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checkerboard() -> RgbImage {
        RgbImage::from_fn(16, 16, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn test_format_parsing_ignores_case() {
        for (name, format) in [("png", OutputFormat::Png), ("JPEG", OutputFormat::Jpeg), ("Gif", OutputFormat::Gif)] {
            assert_eq!(name.parse::<OutputFormat>().unwrap(), format);
        }
        for bad in ["bmp", "tiff", "webp", "svg", "raw", "", "jpg"] {
            assert!(matches!(bad.parse::<OutputFormat>(), Err(QrError::InvalidFormat)), "{bad}");
        }
    }

    #[test]
    fn test_media_types() {
        assert_eq!(OutputFormat::Png.media_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.media_type(), "image/jpeg");
        assert_eq!(OutputFormat::Gif.media_type(), "image/gif");
    }

    #[test]
    fn test_written_bytes_carry_magic_numbers() {
        let image = checkerboard();
        let png = write_image(&image, OutputFormat::Png, 90).unwrap();
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
        let jpeg = write_image(&image, OutputFormat::Jpeg, 90).unwrap();
        assert!(jpeg.starts_with(&[0xff, 0xd8, 0xff]));
        let gif = write_image(&image, OutputFormat::Gif, 90).unwrap();
        assert!(gif.starts_with(b"GIF89a"));
        assert_eq!(gif.last(), Some(&0x3b));
    }

    #[test]
    fn test_png_is_lossless() {
        let image = checkerboard();
        let png = write_image(&image, OutputFormat::Png, 90).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_gif_keeps_two_colors() {
        let image = checkerboard();
        let gif = write_image(&image, OutputFormat::Gif, 90).unwrap();
        let decoded = image::load_from_memory(&gif).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(decoded.get_pixel(5, 0), &Rgb([255, 255, 255]));
    }
}
