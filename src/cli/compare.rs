//! Compare command handler.

use crate::config::ScorecardConfig;
use crate::pipeline::{
    exit_codes, render_comparison, should_use_color, validate_config, write_output, OutputTarget,
};
use crate::scorecard::compare;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Score two SBOMs side by side
pub fn run_compare(
    left: PathBuf,
    right: PathBuf,
    config: &ScorecardConfig,
    quiet: bool,
) -> Result<i32> {
    validate_config(config)?;
    let chain = config.decoder_chain();
    let comparison = compare(&left, &right, &chain, &config.scoring.weights);

    let target = OutputTarget::from_option(config.output.file.clone());
    let use_colors = should_use_color(config.output.no_color, &target);
    let output = render_comparison(&comparison, config.output.format, use_colors)
        .context("failed to render comparison")?;
    write_output(&output, &target, quiet)?;

    Ok(exit_codes::SUCCESS)
}
