//! Unified error types for sbom-scorecard.
//!
//! Decoding has its own error types ([`ParseError`](crate::parsers::ParseError),
//! [`LoadError`]); a failed load is normally recorded on the report instead of
//! being returned. [`ScorecardError`] covers everything around scoring:
//! configuration, output, and callers that want a load failure as an error.

use crate::config::{ConfigError, ConfigFileError};
use crate::parsers::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-scorecard operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScorecardError {
    /// The document could not be loaded
    #[error("Failed to load SBOM: {0}")]
    Load(#[from] LoadError),

    /// Config file could not be read or parsed
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    /// Config values failed validation
    #[error("Invalid configuration: {}", format_config_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    /// IO errors with context
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON output could not be produced
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ScorecardError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, ScorecardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::ParseError;

    #[test]
    fn test_load_error_conversion() {
        fn load() -> Result<()> {
            Err(LoadError::Parse {
                decoder: "spdx-json",
                source: ParseError::JsonError("missing field `spdxVersion`".to_string()),
            })?;
            Ok(())
        }

        let err = load().unwrap_err();
        assert!(matches!(err, ScorecardError::Load(_)));
        assert_eq!(
            err.to_string(),
            "Failed to load SBOM: JSON parse error: missing field `spdxVersion`"
        );
    }

    #[test]
    fn test_invalid_config_display() {
        let err = ScorecardError::InvalidConfig(vec![
            ConfigError {
                field: "a".to_string(),
                message: "bad".to_string(),
            },
            ConfigError {
                field: "b".to_string(),
                message: "worse".to_string(),
            },
        ]);
        assert_eq!(err.to_string(), "Invalid configuration: a: bad; b: worse");
    }

    #[test]
    fn test_io_error_display() {
        let err = ScorecardError::io(
            "/tmp/out.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out.json"));
    }
}
