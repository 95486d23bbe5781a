use serde::Deserialize;

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Load policy for [`BvhReader`](crate::BvhReader).
///
/// By default a broken `MOTION` block is only reported, so a caller still gets
/// the skeleton.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Treat any motion block error as a failed load.
    pub strict_motion: bool,
    /// Require the number of frame rows to match the `Frames:` header.
    pub enforce_frame_count: bool,
}

impl ReaderConfig {
    pub fn strict() -> Self {
        Self {
            strict_motion: true,
            enforce_frame_count: true,
        }
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_is_default() {
        let config = ReaderConfig::from_toml_str("").unwrap();
        assert_eq!(config, ReaderConfig::default());
        assert!(!config.strict_motion);
    }

    #[test]
    fn partial_table() {
        let config = ReaderConfig::from_toml_str("strict_motion = true").unwrap();
        assert!(config.strict_motion);
        assert!(!config.enforce_frame_count);
    }

    #[test]
    fn bad_value() {
        let err = ReaderConfig::from_toml_str("strict_motion = 3").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn missing_file() {
        let err = ReaderConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
