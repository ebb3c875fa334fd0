//! Configuration validation.

use super::types::{IngestionConfig, OutputConfig, ScorecardConfig, ScoringConfig};
use crate::scorecard::GradeWeights;

/// Allowed difference between the weight total and 100
const WEIGHT_TOTAL_TOLERANCE: f32 = 0.01;

// ============================================================================
// Configuration Error
// ============================================================================

/// A single invalid configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for ScorecardConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.output.validate());
        errors.extend(self.ingestion.validate());
        errors.extend(self.scoring.validate());
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_deref().and_then(std::path::Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for IngestionConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_file_size_mb == 0 {
            errors.push(ConfigError::new(
                "ingestion.max_file_size_mb",
                "Maximum file size must be at least 1 MB",
            ));
        }
        errors
    }
}

impl Validatable for ScoringConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.weights.validate();
        if let Some(min_score) = self.min_score {
            if !(0.0..=100.0).contains(&min_score) {
                errors.push(ConfigError::new(
                    "scoring.min_score",
                    format!("Minimum score must be between 0 and 100, got {min_score}"),
                ));
            }
        }
        errors
    }
}

impl Validatable for GradeWeights {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (criterion, weight) in self.iter() {
            if weight < 0.0 || !weight.is_finite() {
                errors.push(ConfigError::new(
                    format!("scoring.weights.{}", criterion_key(criterion)),
                    format!("Weight must be a non-negative number, got {weight}"),
                ));
            }
        }

        let total = self.total();
        if (total - 100.0).abs() > WEIGHT_TOTAL_TOLERANCE {
            errors.push(ConfigError::new(
                "scoring.weights",
                format!("Weights must sum to 100, got {total}"),
            ));
        }

        errors
    }
}

fn criterion_key(criterion: crate::scorecard::Criterion) -> String {
    serde_json::to_value(criterion)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| criterion.label().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScorecardConfig::default().is_valid());
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let weights = GradeWeights {
            creation_info: 30.0,
            ..GradeWeights::default()
        };
        let errors = weights.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "scoring.weights");
    }

    #[test]
    fn test_negative_weight() {
        let weights = GradeWeights {
            spec_compliance: -5.0,
            package_versions: 50.0,
            ..GradeWeights::default()
        };
        let errors = weights.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "scoring.weights.spec_compliance"));
    }

    #[test]
    fn test_min_score_range() {
        let scoring = ScoringConfig {
            min_score: Some(120.0),
            ..ScoringConfig::default()
        };
        assert_eq!(scoring.validate()[0].field, "scoring.min_score");
    }

    #[test]
    fn test_output_file_parent_must_exist() {
        let output = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.json")),
            ..OutputConfig::default()
        };
        assert!(!output.is_valid());

        let output = OutputConfig {
            file: Some(PathBuf::from("report.json")),
            ..OutputConfig::default()
        };
        assert!(output.is_valid());
    }

    #[test]
    fn test_zero_file_size() {
        let ingestion = IngestionConfig {
            max_file_size_mb: 0,
            ..IngestionConfig::default()
        };
        assert!(!ingestion.is_valid());
    }
}
