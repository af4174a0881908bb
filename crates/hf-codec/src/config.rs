//! Runtime configuration for file compression and decompression.

use crate::error::{HuffError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuffConfig {
    /// Inserted before the extension of a compressed artifact's name.
    pub compressed_suffix: String,
    /// Inserted before the extension of a decompressed file's name.
    pub decompressed_suffix: String,
    /// Capacity of the buffered readers and writers wrapping files.
    pub io_buffer_capacity: usize,
    /// Default log level for the command-line front end.
    pub log_level: String,
}

impl HuffConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let config: HuffConfig = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, suffix) in [
            ("compressed_suffix", &self.compressed_suffix),
            ("decompressed_suffix", &self.decompressed_suffix),
        ] {
            if suffix.is_empty() {
                return Err(HuffError::Config(format!("{name} must not be empty")));
            }
            if suffix.contains('/') || suffix.contains('\\') {
                return Err(HuffError::Config(format!(
                    "{name} must not contain a path separator: {suffix:?}"
                )));
            }
        }
        if self.io_buffer_capacity == 0 {
            return Err(HuffError::Config("io_buffer_capacity must be positive".into()));
        }
        Ok(())
    }
}

impl Default for HuffConfig {
    fn default() -> Self {
        Self {
            compressed_suffix: "_compressed".into(),
            decompressed_suffix: "_uncompressed".into(),
            io_buffer_capacity: 64 * 1024,
            log_level: "warn".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        assert!(HuffConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huff.json");
        std::fs::write(&path, r#"{"compressed_suffix":"_hc"}"#).unwrap();
        let config = HuffConfig::from_json_file(&path).unwrap();
        assert_eq!(config.compressed_suffix, "_hc");
        assert_eq!(config.decompressed_suffix, "_uncompressed");
        assert_eq!(config.io_buffer_capacity, 64 * 1024);
    }

    #[test]
    fn test_rejects_separator_in_suffix() {
        let config = HuffConfig {
            compressed_suffix: "a/b".into(),
            ..HuffConfig::default()
        };
        assert!(matches!(config.validate(), Err(HuffError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_buffer() {
        let config = HuffConfig {
            io_buffer_capacity: 0,
            ..HuffConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huff.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            HuffConfig::from_json_file(&path),
            Err(HuffError::Serialization(_))
        ));
    }
}
