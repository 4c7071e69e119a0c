//! Generator limits and codec settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default image side, in pixels.
pub const DEFAULT_SIZE: i32 = 250;
/// Default error correction letter.
pub const DEFAULT_CORRECTION: &str = "L";
/// Default output format name.
pub const DEFAULT_FORMAT: &str = "png";
pub const DEFAULT_FOREGROUND: &str = "black";
pub const DEFAULT_BACKGROUND: &str = "white";
/// Default quiet zone, in modules.
pub const DEFAULT_MARGIN: i32 = 1;

/// Largest image side any configuration may allow, in pixels.
pub const MAX_IMAGE_SIDE: u32 = 65_535;
/// Largest quiet zone any configuration may allow, in modules.
pub const MAX_MARGIN_LIMIT: u32 = 1_000;

/// Errors raised while loading a [`GeneratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Bounds enforced by the validator and settings used by the codec writer.
///
/// Missing fields in a configuration file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Smallest accepted image side, in pixels.
    pub min_size: u32,
    /// Largest accepted image side, in pixels.
    pub max_size: u32,
    /// Largest accepted quiet zone, in modules.
    pub max_margin: u32,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_size: 150,
            max_size: 350,
            max_margin: 50,
            jpeg_quality: 90,
        }
    }
}

impl GeneratorConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that the bounds are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size == 0 {
            return Err(ConfigError::invalid("min_size must be at least 1"));
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::invalid(format!(
                "min_size ({}) exceeds max_size ({})",
                self.min_size, self.max_size
            )));
        }
        if self.max_size > MAX_IMAGE_SIDE {
            return Err(ConfigError::invalid(format!("max_size must not exceed {MAX_IMAGE_SIDE}")));
        }
        if self.max_margin > MAX_MARGIN_LIMIT {
            return Err(ConfigError::invalid(format!("max_margin must not exceed {MAX_MARGIN_LIMIT}")));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::invalid("jpeg_quality must be between 1 and 100"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!((config.min_size, config.max_size), (150, 350));
        assert_eq!(config.max_margin, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GeneratorConfig::from_json_str(r#"{"max_size": 500, "jpeg_quality": 75}"#).unwrap();
        assert_eq!(config.max_size, 500);
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.min_size, 150);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = GeneratorConfig::from_json_str(r#"{"min_size": 400, "max_size": 300}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("exceeds max_size"));
    }

    #[test]
    fn test_rejects_bad_quality_and_syntax() {
        assert!(GeneratorConfig::from_json_str(r#"{"jpeg_quality": 0}"#).is_err());
        assert!(matches!(
            GeneratorConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_unbounded_limits() {
        let err = GeneratorConfig::from_json_str(r#"{"max_margin": 2147483647}"#).unwrap_err();
        assert!(err.to_string().contains("max_margin must not exceed 1000"));
        let err = GeneratorConfig::from_json_str(r#"{"max_size": 70000}"#).unwrap_err();
        assert!(err.to_string().contains("max_size must not exceed 65535"));

        let config = GeneratorConfig::from_json_str(r#"{"max_size": 65535, "max_margin": 1000}"#).unwrap();
        assert_eq!((config.max_size, config.max_margin), (MAX_IMAGE_SIDE, MAX_MARGIN_LIMIT));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeneratorConfig::load("/nonexistent/qrforge.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
