//! Score command handler.
//!
//! Implements the `score` subcommand for a single SBOM.

use crate::config::ScorecardConfig;
use crate::pipeline::{exit_codes, render_score, validate_config, write_output, OutputTarget};
use crate::scorecard::ScorecardReport;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Run the score command, returning the desired exit code.
///
/// A document that fails to load still produces a report (scoring zero);
/// only output failures are errors.
pub fn run_score(sbom_path: PathBuf, config: &ScorecardConfig, quiet: bool) -> Result<i32> {
    validate_config(config)?;
    let chain = config.decoder_chain();
    tracing::debug!(decoders = ?chain.names(), "scoring {}", sbom_path.display());

    let report = ScorecardReport::from_path(&sbom_path, &chain);
    let weights = &config.scoring.weights;

    let output = render_score(&report, weights, config.output.format)
        .context("failed to render scorecard")?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&output, &target, quiet)?;

    if let Some(threshold) = config.scoring.min_score {
        let grade = report.grade(weights);
        if grade.score < threshold {
            tracing::warn!(
                "Score {:.1} is below the minimum of {threshold:.1}",
                grade.score
            );
            return Ok(exit_codes::BELOW_THRESHOLD);
        }
    }

    Ok(exit_codes::SUCCESS)
}
