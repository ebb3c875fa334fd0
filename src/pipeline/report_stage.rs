//! Report rendering stage.
//!
//! Turns scorecards and comparisons into the text or JSON the CLI prints.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::scorecard::{Comparison, GradeWeights, ScorecardReport};

/// Render a single scorecard.
///
/// Text output is the plain report followed by the grade table; JSON output
/// is the serialized [`ScorecardSummary`](crate::scorecard::ScorecardSummary).
pub fn render_score(
    report: &ScorecardReport,
    weights: &GradeWeights,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.summary(weights))?),
        OutputFormat::Text => {
            let mut out = report.report();
            out.push('\n');
            out.push_str(&report.grade(weights).render());
            Ok(out)
        }
    }
}

/// Render a comparison
pub fn render_comparison(
    comparison: &Comparison,
    format: OutputFormat,
    use_colors: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(comparison.to_json()?),
        OutputFormat::Text => Ok(comparison.render(use_colors)),
    }
}
