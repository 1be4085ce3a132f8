//! # Configuration
//!
//! Optional TOML configuration shared by the CLI and the web server. Every
//! section and field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [codec]
//! framing = "terminator"        # or "length-prefixed"
//! parallel_threshold = 1048576  # channels
//! chunk_size = 65536            # channels
//!
//! [output]
//! format = "png"                # png | bmp | tiff
//!
//! [web]
//! address = "127.0.0.1:3000"
//! max_upload_bytes = 33554432
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::codec::{CodecOptions, FramingMode, Parallelism};
use crate::processing::CarrierFormat;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("stego.toml")?;
/// ```
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub codec: CodecConfig,
    pub output: OutputConfig,
    pub web: WebConfig,
}

impl StegoConfig {
    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// How the end of the hidden payload is marked
    pub framing: FramingMode,
    /// Carriers with at least this many channels are processed on the thread pool
    pub parallel_threshold: usize,
    /// Channels handled per work unit and per progress report
    pub chunk_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        let parallelism = Parallelism::default();
        Self {
            framing: FramingMode::default(),
            parallel_threshold: parallelism.threshold,
            chunk_size: parallelism.chunk_size,
        }
    }
}

impl CodecConfig {
    pub fn options(&self) -> CodecOptions {
        CodecOptions {
            framing: self.framing,
            parallelism: Parallelism {
                threshold: self.parallel_threshold,
                chunk_size: self.chunk_size,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when the output path has no recognised extension
    pub format: CarrierFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub address: String,
    pub max_upload_bytes: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: StegoConfig = toml::from_str(
            r#"
            [codec]
            framing = "length-prefixed"

            [web]
            address = "0.0.0.0:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.codec.framing, FramingMode::LengthPrefixed);
        assert_eq!(config.codec.chunk_size, Parallelism::default().chunk_size);
        assert_eq!(config.output.format, CarrierFormat::Png);
        assert_eq!(config.web.address, "0.0.0.0:8080");
        assert_eq!(config.web.max_upload_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"bmp\"\n[codec]\nparallel_threshold = 10").unwrap();

        let config = StegoConfig::load_or_default(Some(file.path())).unwrap();

        assert_eq!(config.output.format, CarrierFormat::Bmp);
        assert_eq!(config.codec.options().parallelism.threshold, 10);
    }

    #[test]
    fn test_invalid_framing_is_an_error() {
        let result: Result<StegoConfig, _> = toml::from_str("[codec]\nframing = \"magic\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(StegoConfig::load_or_default(Some(Path::new("/nonexistent/stego.toml"))).is_err());
        assert_eq!(StegoConfig::load_or_default(None).unwrap(), StegoConfig::default());
    }
}
