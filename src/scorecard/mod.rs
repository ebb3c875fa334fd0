//! SBOM quality scorecard.
//!
//! Scores a normalized document on how completely it identifies its
//! packages and its own provenance. Every criterion yields a
//! [`ReportValue`] with a ratio in `[0, 1]` and a short explanation.
//!
//! | Criterion | Hit condition |
//! |---|---|
//! | Spec compliance | document loaded without error |
//! | Package identification | package has a purl or a CPE |
//! | Package versions | package has a version |
//! | Package licenses | concluded license asserted, or else declared |
//! | Package digests | package has a checksum |
//! | File digests | file has a checksum |
//! | Creation info | tool creator with a version, plus a timestamp |
//!
//! # Usage
//!
//! ```no_run
//! use sbom_scorecard::parsers::DecoderChain;
//! use sbom_scorecard::scorecard::{GradeWeights, ScorecardReport};
//! use std::path::Path;
//!
//! let report = ScorecardReport::from_path(Path::new("sbom.json"), &DecoderChain::default());
//! print!("{}", report.report());
//! println!("Grade: {}", report.grade(&GradeWeights::default()).letter);
//! ```

mod compare;
mod counters;
mod grade;
mod report;
mod value;

pub use compare::{compare, compare_reports, Comparison, ComparisonSide, CriterionDelta};
pub use counters::ScoreCounters;
pub use grade::{Grade, GradeLetter, GradeWeights, GradedCriterion};
pub use report::{Criterion, CriterionScore, ReportMetadata, ScorecardReport, ScorecardSummary};
pub use value::{pretty_percent, ReportValue};
