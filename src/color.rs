//! Foreground and background color parsing.

use image::Rgb;

use crate::error::{QrError, QrResult};

/// Named colors accepted in requests, matched case-insensitively.
static NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("cyan", [0, 255, 255]),
    ("darkgray", [64, 64, 64]),
    ("dark_gray", [64, 64, 64]),
    ("gray", [128, 128, 128]),
    ("green", [0, 255, 0]),
    ("lightgray", [192, 192, 192]),
    ("light_gray", [192, 192, 192]),
    ("magenta", [255, 0, 255]),
    ("orange", [255, 200, 0]),
    ("pink", [255, 175, 175]),
    ("red", [255, 0, 0]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
];

/// Parses a color name from the table above or a `#RRGGBB` hex literal.
///
/// Surrounding whitespace is ignored. Short (`#RGB`) and alpha (`#RRGGBBAA`)
/// forms are rejected.
///
/// # Example
///
/// ```rust
/// use image::Rgb;
/// use qrforge::color::parse_color;
///
/// assert_eq!(parse_color("Orange").unwrap(), Rgb([255, 200, 0]));
/// assert_eq!(parse_color("#1e90FF").unwrap(), Rgb([30, 144, 255]));
/// assert!(parse_color("RANDOM").is_err());
/// ```
pub fn parse_color(value: &str) -> QrResult<Rgb<u8>> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).map(Rgb).ok_or(QrError::InvalidColor);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|&(_, rgb)| Rgb(rgb))
        .ok_or(QrError::InvalidColor)
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors_ignore_case() {
        assert_eq!(parse_color("black").unwrap(), Rgb([0, 0, 0]));
        assert_eq!(parse_color("RED").unwrap(), Rgb([255, 0, 0]));
        assert_eq!(parse_color(" White ").unwrap(), Rgb([255, 255, 255]));
        assert_eq!(parse_color("DARK_GRAY").unwrap(), parse_color("darkGray").unwrap());
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#000000").unwrap(), Rgb([0, 0, 0]));
        assert_eq!(parse_color("#FFFF00").unwrap(), Rgb([255, 255, 0]));
        assert_eq!(parse_color("#a0b1c2").unwrap(), Rgb([0xa0, 0xb1, 0xc2]));
    }

    #[test]
    fn test_rejects_malformed_values() {
        for bad in ["RANDOM", "", "#", "#FFF", "#FFFFFFFF", "#GGGGGG", "FFFFFF", "#+12345", "#ééé"] {
            assert!(matches!(parse_color(bad), Err(QrError::InvalidColor)), "{bad:?}");
        }
    }
}
