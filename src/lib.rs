//! # qrforge
//!
//! A Rust library for turning text into QR code images.
//!
//! `qrforge` validates loosely typed request parameters, encodes the content as a QR Code Model 2
//! symbol (versions 1 to 40, four error correction levels) and renders it onto a square canvas in
//! PNG, JPEG or GIF. Colors may be given by name or as `#RRGGBB`.
//!
//! ## Features
//!
//! - Encode text in numeric, alphanumeric or byte mode, picking the smallest version that fits.
//! - Choose the mask with the lowest penalty score.
//! - Validate size, correction level, format, colors and margin, reporting the first failure.
//! - Render with a configurable quiet zone, centered in the requested image size.
//! - Serialize as PNG, JPEG or GIF together with the matching media type.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! ```rust
//! let response = qrforge::generate("https://example.com", 250, "M", "png", "black", "white", 1).unwrap();
//! assert_eq!(response.media_type, "image/png");
//! ```
//!
//! Errors tell client mistakes apart from server failures:
//!
//! ```rust
//! let err = qrforge::generate("   ", 250, "L", "png", "black", "white", 1).unwrap_err();
//! assert!(err.is_client_error());
//! assert_eq!(err.to_string(), "Contents cannot be null or blank");
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: QR symbol encoding.
//! - [`validate`]: Request parameter checks.
//! - [`render`]: Rasterization of module grids.
//! - [`codec`]: PNG, JPEG and GIF serialization.
//! - [`pipeline`]: The end-to-end [`Generator`].

#![forbid(unsafe_code)]

pub mod codec;
pub mod color;
pub mod config;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod qrcode;
pub mod render;
pub mod validate;

pub use codec::OutputFormat;
pub use config::{ConfigError, GeneratorConfig};
pub use error::{QrError, QrResult};
pub use matrix::ModuleMatrix;
pub use pipeline::{generate, Generator, ImageResponse};
pub use qrcode::{ErrorCorrection, QrCode};
pub use validate::{GenerationRequest, RequestParams};
