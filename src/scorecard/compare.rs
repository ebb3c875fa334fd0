//! Side-by-side comparison of two documents.

use super::grade::{Grade, GradeWeights};
use super::report::{Criterion, ReportMetadata, ScorecardReport};
use super::value::ReportValue;
use crate::parsers::DecoderChain;
use serde::Serialize;
use std::path::Path;

/// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// One criterion scored on both sides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionDelta {
    pub criterion: Criterion,
    pub left: ReportValue,
    pub right: ReportValue,
    /// `|left.ratio - right.ratio|`
    pub delta: f32,
}

/// One input of a comparison
#[derive(Debug, Serialize)]
pub struct ComparisonSide {
    /// Path or label of the input
    pub label: String,
    pub metadata: ReportMetadata,
    pub grade: Grade,
    #[serde(skip_serializing)]
    pub report: ScorecardReport,
}

impl ComparisonSide {
    fn new(label: String, report: ScorecardReport, weights: &GradeWeights) -> Self {
        Self {
            label,
            metadata: report.metadata(),
            grade: report.grade(weights),
            report,
        }
    }
}

/// Two scorecards and their per-criterion differences
#[derive(Debug, Serialize)]
pub struct Comparison {
    pub left: ComparisonSide,
    pub right: ComparisonSide,
    pub criteria: Vec<CriterionDelta>,
}

/// Load and score two files in parallel and compare them.
///
/// The two sides share nothing; a load failure on one side only degrades
/// that side's scores.
#[must_use]
pub fn compare(left: &Path, right: &Path, chain: &DecoderChain, weights: &GradeWeights) -> Comparison {
    let (left_report, right_report) = rayon::join(
        || ScorecardReport::from_path(left, chain),
        || ScorecardReport::from_path(right, chain),
    );

    compare_reports(
        (left.display().to_string(), left_report),
        (right.display().to_string(), right_report),
        weights,
    )
}

/// Compare two already-built reports
#[must_use]
pub fn compare_reports(
    (left_label, left): (String, ScorecardReport),
    (right_label, right): (String, ScorecardReport),
    weights: &GradeWeights,
) -> Comparison {
    let criteria = Criterion::ALL
        .iter()
        .map(|&criterion| {
            let l = left.evaluate(criterion);
            let r = right.evaluate(criterion);
            CriterionDelta {
                criterion,
                delta: (l.ratio - r.ratio).abs(),
                left: l,
                right: r,
            }
        })
        .collect();

    Comparison {
        left: ComparisonSide::new(left_label, left, weights),
        right: ComparisonSide::new(right_label, right, weights),
        criteria,
    }
}

impl Comparison {
    /// Delta for one criterion
    #[must_use]
    pub fn delta(&self, criterion: Criterion) -> Option<&CriterionDelta> {
        self.criteria.iter().find(|c| c.criterion == criterion)
    }

    /// Fixed-width text table.
    ///
    /// The higher side of each differing row is highlighted when colors are
    /// enabled.
    #[must_use]
    pub fn render(&self, use_colors: bool) -> String {
        let paint = |code: &'static str| if use_colors { code } else { "" };
        let reset = paint(colors::RESET);

        let mut out = String::new();
        out.push_str(&format!(
            "{}{:<24} {:>12} {:>12} {:>8}{reset}\n",
            paint(colors::BOLD),
            "Criterion",
            "Left",
            "Right",
            "Delta"
        ));

        for row in &self.criteria {
            let (left_color, right_color) = if row.delta < f32::EPSILON {
                ("", "")
            } else if row.left.ratio > row.right.ratio {
                (paint(colors::GREEN), "")
            } else {
                ("", paint(colors::GREEN))
            };
            let delta_color = if row.delta < f32::EPSILON {
                paint(colors::DIM)
            } else {
                paint(colors::YELLOW)
            };

            out.push_str(&format!(
                "{:<24} {left_color}{:>11.1}%{reset} {right_color}{:>11.1}%{reset} {delta_color}{:>7.1}%{reset}\n",
                row.criterion.label(),
                row.left.ratio * 100.0,
                row.right.ratio * 100.0,
                row.delta * 100.0,
            ));
        }

        out.push_str(&format!(
            "{:<24} {:>12} {:>12}\n",
            "Grade",
            format!("{:.1} {}", self.left.grade.score, self.left.grade.letter),
            format!("{:.1} {}", self.right.grade.score, self.right.grade.letter),
        ));

        out.push('\n');
        for (side, name) in [(&self.left, "Left"), (&self.right, "Right")] {
            out.push_str(&format!(
                "{name}: {} ({} packages, {} files)\n",
                side.label, side.metadata.total_packages, side.metadata.total_files
            ));
            if let Some(e) = side.report.load_error() {
                out.push_str(&format!("  {}error:{reset} {e}\n", paint(colors::YELLOW)));
            }
        }

        out
    }

    /// JSON document of the comparison
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Package, SbomDocument, SbomFormat};
    use crate::parsers::{LoadError, ParseError};

    fn versions_report(versioned: usize, total: usize) -> ScorecardReport {
        let mut doc = SbomDocument::new(SbomFormat::Spdx);
        for i in 0..total {
            let pkg = Package::new(format!("p{i}"));
            doc.add_package(if i < versioned { pkg.with_version("1.0") } else { pkg });
        }
        ScorecardReport::from_document(&doc)
    }

    #[test]
    fn test_deltas() {
        let comparison = compare_reports(
            ("left".to_string(), versions_report(4, 4)),
            ("right".to_string(), versions_report(1, 4)),
            &GradeWeights::default(),
        );
        let versions = comparison.delta(Criterion::PackageVersions).unwrap();
        assert!((versions.delta - 0.75).abs() < 1e-6);
        assert_eq!(comparison.delta(Criterion::SpecCompliance).unwrap().delta, 0.0);
        assert_eq!(comparison.criteria.len(), Criterion::ALL.len());
    }

    #[test]
    fn test_one_side_failed() {
        let failed = ScorecardReport::from_load_error(LoadError::Parse {
            decoder: "spdx-rdf",
            source: ParseError::XmlError("bad".to_string()),
        });
        let comparison = compare_reports(
            ("good".to_string(), versions_report(2, 2)),
            ("bad".to_string(), failed),
            &GradeWeights::default(),
        );
        let spec = comparison.delta(Criterion::SpecCompliance).unwrap();
        assert_eq!(spec.left.ratio, 1.0);
        assert_eq!(spec.right.ratio, 0.0);
        assert_eq!(spec.right.reasoning, "XML parse error: bad");

        let text = comparison.render(false);
        assert!(text.contains("error: XML parse error: bad"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_json() {
        let comparison = compare_reports(
            ("a".to_string(), versions_report(1, 1)),
            ("b".to_string(), versions_report(0, 1)),
            &GradeWeights::default(),
        );
        let json: serde_json::Value = serde_json::from_str(&comparison.to_json().unwrap()).unwrap();
        assert_eq!(json["left"]["label"], "a");
        assert_eq!(json["criteria"][2]["criterion"], "package_versions");
        assert!(json["left"].get("report").is_none());
    }
}
