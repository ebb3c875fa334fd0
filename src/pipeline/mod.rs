//! Pipeline orchestration shared by the CLI commands.
//!
//! config → load → score → render → write.

mod output;
mod report_stage;

pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::{render_comparison, render_score};

use crate::config::{load_or_default, ScorecardConfig, Validatable};
use crate::error::{Result, ScorecardError};
use std::path::{Path, PathBuf};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// The grade is below `--min-score`
    pub const BELOW_THRESHOLD: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Load and validate the configuration.
///
/// Returns the config and the file it came from, if any.
pub fn load_config(explicit_path: Option<&Path>) -> Result<(ScorecardConfig, Option<PathBuf>)> {
    let (config, loaded_from) = load_or_default(explicit_path)?;
    validate_config(&config)?;
    Ok((config, loaded_from))
}

/// Reject a config with any validation error
pub fn validate_config(config: &ScorecardConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ScorecardError::InvalidConfig(errors))
    }
}
