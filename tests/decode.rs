//! Decodes generated images with an independent QR reader.

use qrforge::{generate, ErrorCorrection, QrCode};

fn decode(bytes: &[u8]) -> Vec<String> {
    let img = image::load_from_memory(bytes).unwrap().to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(img);
    prepared
        .detect_grids()
        .iter()
        .filter_map(|grid| grid.decode().ok())
        .map(|(_, content)| content)
        .collect()
}

fn samples() -> Vec<String> {
    let long: String = (0..600).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    vec![
        "0123456789012345".to_owned(),
        "HTTPS://EXAMPLE.COM/QR-CODE".to_owned(),
        "Hello! こんにちは! ❤️ #@$%".to_owned(),
        "https://example.com/path?param1=value1&param2=value2".to_owned(),
        long,
    ]
}

#[test]
fn test_every_level_and_mode_decodes() {
    for content in samples() {
        for correction in ["L", "M", "Q", "H"] {
            for format in ["png", "gif"] {
                let response = generate(&content, 350, correction, format, "black", "white", 4).unwrap();
                assert_eq!(
                    decode(&response.bytes),
                    [content.clone()],
                    "{} chars at {correction} as {format}",
                    content.len()
                );
            }
        }
    }
}

#[test]
fn test_long_content_uses_multi_block_version() {
    let content = samples().pop().unwrap();
    for correction in ErrorCorrection::ALL {
        let qr = QrCode::encode_text(&content, correction).unwrap();
        assert!(qr.version().value() >= 7, "{correction}");
    }
}

#[test]
fn test_long_jpeg_decodes() {
    let content = "a".repeat(1000);
    let response = generate(&content, 250, "L", "jpeg", "black", "white", 1).unwrap();
    assert_eq!(decode(&response.bytes), [content]);
}

#[test]
fn test_default_request_decodes() {
    let response = generate("content", 250, "L", "png", "black", "white", 1).unwrap();
    assert_eq!(decode(&response.bytes), ["content"]);
}
