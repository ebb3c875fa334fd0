//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::ScorecardConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-scorecard.yaml",
    ".sbom-scorecard.yml",
    "sbom-scorecard.yaml",
    "sbom-scorecard.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/sbom-scorecard/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().ok();

    cwd.as_deref()
        .and_then(find_config_in_dir)
        .or_else(|| cwd.as_deref().and_then(find_git_root).and_then(|root| find_config_in_dir(&root)))
        .or_else(|| dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("sbom-scorecard"))))
        .or_else(|| dirs::home_dir().and_then(|home| find_config_in_dir(&home)))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up from `start`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load a `ScorecardConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<ScorecardConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(ScorecardConfig::default());
    }
    let config: ScorecardConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from the discovered file, or return the default.
///
/// An explicit path that does not exist, or a file that fails to parse, is
/// an error rather than a silent fallback.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(ScorecardConfig, Option<PathBuf>), ConfigFileError> {
    if let Some(path) = explicit_path {
        return load_config_file(path).map(|config| (config, Some(path.to_path_buf())));
    }

    match discover_config_file(None) {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let config = load_config_file(&path)?;
            Ok((config, Some(path)))
        }
        None => Ok((ScorecardConfig::default(), None)),
    }
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# sbom-scorecard configuration\n\
         # Place this file at .sbom-scorecard.yaml in your project root or ~/.config/sbom-scorecard/\n\n{}",
        serde_yaml::to_string(&ScorecardConfig::default()).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, SbomType};
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sbom-scorecard.yaml");
        std::fs::write(&config_path, "output:\n  format: json\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_find_git_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
output:
  format: json
  no_color: true
ingestion:
  sbom_type: spdx
scoring:
  min_score: 70
  weights:
    spec_compliance: 20
    creation_info: 20
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.no_color);
        assert_eq!(config.ingestion.sbom_type, SbomType::Spdx);
        assert_eq!(config.scoring.min_score, Some(70.0));
        assert_eq!(config.scoring.weights.spec_compliance, 20.0);
        assert_eq!(config.scoring.weights.package_versions, 20.0);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "output: [unterminated").unwrap();

        let result = load_or_default(Some(&config_path));
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }

    #[test]
    fn test_empty_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "").unwrap();

        let (config, loaded_from) = load_or_default(Some(&config_path)).unwrap();
        assert_eq!(config, ScorecardConfig::default());
        assert_eq!(loaded_from, Some(config_path));
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("ingestion:"));
        assert!(example.contains("spec_compliance"));
    }
}
