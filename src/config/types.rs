//! Configuration types for sbom-scorecard.

use crate::model::SbomFormat;
use crate::parsers::{DecoderChain, DEFAULT_MAX_FILE_SIZE_MB};
use crate::scorecard::GradeWeights;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Top-level configuration
// ============================================================================

/// Application configuration, loaded from a config file and overridden by
/// CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScorecardConfig {
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// How input documents are read
    pub ingestion: IngestionConfig,
    /// Grade weights and threshold
    pub scoring: ScoringConfig,
}

impl ScorecardConfig {
    /// Decoder chain matching the ingestion settings
    #[must_use]
    pub fn decoder_chain(&self) -> DecoderChain {
        DecoderChain::for_format(self.ingestion.sbom_type.format())
            .with_max_file_size_mb(self.ingestion.max_file_size_mb)
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Output file path (stdout when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IngestionConfig {
    /// Largest accepted input in megabytes
    pub max_file_size_mb: u64,
    /// Restrict decoding to one SBOM family
    pub sbom_type: SbomType,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            sbom_type: SbomType::Auto,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points per criterion, summing to 100
    pub weights: GradeWeights,
    /// Fail (exit code 1) when the grade is below this score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
}

// ============================================================================
// Enumerations
// ============================================================================

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text report and grade table
    #[default]
    Text,
    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Which SBOM family to accept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SbomType {
    /// Try every decoder
    #[default]
    Auto,
    /// SPDX only
    Spdx,
    /// `CycloneDX` only
    #[value(alias = "cyclonedx")]
    #[serde(alias = "cyclonedx")]
    Cdx,
}

impl SbomType {
    /// Family restriction for the decoder chain
    #[must_use]
    pub const fn format(self) -> Option<SbomFormat> {
        match self {
            Self::Auto => None,
            Self::Spdx => Some(SbomFormat::Spdx),
            Self::Cdx => Some(SbomFormat::CycloneDx),
        }
    }
}
