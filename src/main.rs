//! qrforge: generate QR code images from the command line
//!
//! ## Usage
//!
//! ```bash
//! qrforge "https://example.com" --output qr.png
//! qrforge hello --size 300 --correction H --type gif --fcolor blue > qr.gif
//! qrforge hello --preview --output qr.png
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qrforge::config::{
    DEFAULT_BACKGROUND, DEFAULT_CORRECTION, DEFAULT_FOREGROUND, DEFAULT_FORMAT, DEFAULT_MARGIN, DEFAULT_SIZE,
};
use qrforge::render::to_text;
use qrforge::validate::validate;
use qrforge::{ConfigError, Generator, GeneratorConfig, QrCode, QrError, RequestParams};

/// Generate a QR code image
#[derive(Parser, Debug)]
#[command(name = "qrforge", version, about, allow_negative_numbers = true)]
struct Cli {
    /// Text to encode
    content: String,

    /// Image side in pixels
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: i32,

    /// Error correction level: L, M, Q or H
    #[arg(short, long, default_value = DEFAULT_CORRECTION)]
    correction: String,

    /// Image format: png, jpeg or gif
    #[arg(short = 't', long = "type", default_value = DEFAULT_FORMAT)]
    format: String,

    /// Foreground color, by name or #RRGGBB
    #[arg(long, default_value = DEFAULT_FOREGROUND)]
    fcolor: String,

    /// Background color, by name or #RRGGBB
    #[arg(long, default_value = DEFAULT_BACKGROUND)]
    bcolor: String,

    /// Quiet zone width in modules
    #[arg(short, long, default_value_t = DEFAULT_MARGIN)]
    margin: i32,

    /// Output file; the image goes to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with generator limits
    #[arg(long, env = "QRFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the symbol to stderr as text
    #[arg(long)]
    preview: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Generate(#[from] QrError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let generator = Generator::new(config);

    let params = RequestParams {
        content: &cli.content,
        size: cli.size,
        correction: &cli.correction,
        format: &cli.format,
        foreground: &cli.fcolor,
        background: &cli.bcolor,
        margin: cli.margin,
    };
    let request = validate(&params, generator.config())?;

    if cli.preview {
        let qr = QrCode::encode_text(&request.content, request.correction)?;
        eprint!("{}", to_text(qr.matrix(), request.margin));
    }

    let response = generator.generate_validated(&request)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &response.bytes)?;
            info!(path = %path.display(), media_type = response.media_type, "wrote image");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&response.bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_mirror_library() {
        let cli = Cli::try_parse_from(["qrforge", "hello"]).unwrap();
        assert_eq!(cli.size, 250);
        assert_eq!(cli.correction, "L");
        assert_eq!(cli.format, "png");
        assert_eq!(cli.fcolor, "black");
        assert_eq!(cli.bcolor, "white");
        assert_eq!(cli.margin, 1);
        assert!(cli.output.is_none());
        assert!(!cli.preview);
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = Cli::try_parse_from(["qrforge", "hello", "--margin", "-1"]).unwrap();
        assert_eq!(cli.margin, -1);
        let err = run(cli).unwrap_err();
        assert!(matches!(err, CliError::Generate(QrError::InvalidMargin { max: 50 })));
        assert_eq!(err.to_string(), "Margin must be between 0 and 50 modules");
    }

    #[test]
    fn test_writes_output_file() {
        let path = std::env::temp_dir().join(format!("qrforge-cli-{}.gif", std::process::id()));
        let cli = Cli::try_parse_from([
            "qrforge",
            "hello",
            "--type",
            "GIF",
            "--output",
            path.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["qrforge", "hello", "--config", "/nonexistent/qrforge.json"]).unwrap();
        assert!(matches!(run(cli), Err(CliError::Config(ConfigError::Io(_)))));
    }
}
