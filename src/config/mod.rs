//! Configuration module for sbom-scorecard.
//!
//! This module provides:
//! - Typed configuration structures with defaults
//! - Validation through the [`Validatable`] trait
//! - YAML config file loading and discovery
//! - JSON Schema generation for editor support
//!
//! # Configuration File
//!
//! Place a `.sbom-scorecard.yaml` file in your project root or
//! `~/.config/sbom-scorecard/`:
//!
//! ```yaml
//! output:
//!   format: json
//! ingestion:
//!   sbom_type: spdx
//!   max_file_size_mb: 256
//! scoring:
//!   min_score: 70
//!   weights:
//!     spec_compliance: 25
//!     package_identification: 20
//!     package_versions: 20
//!     package_licenses: 20
//!     creation_info: 15
//! ```
//!
//! CLI arguments override file settings.

pub mod file;
mod types;
mod validation;

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};
pub use types::{
    IngestionConfig, OutputConfig, OutputFormat, SbomType, ScorecardConfig, ScoringConfig,
};
pub use validation::{ConfigError, Validatable};

/// Generate a JSON Schema for the `.sbom-scorecard.yaml` format.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(ScorecardConfig);
    serde_json::to_string_pretty(&schema)
}
