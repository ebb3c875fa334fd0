//! # sbom-scorecard
//!
//! `sbom-scorecard` grades Software Bills of Materials on how useful they are
//! to a consumer: can each package be identified, versioned, and licensed,
//! and does the document say which tool produced it and when.
//!
//! ## Core Features
//!
//! - **Multi-syntax ingestion**: SPDX (JSON, tag-value, RDF/XML) and
//!   `CycloneDX` (JSON, XML) are decoded into one normalized
//!   [`SbomDocument`](model::SbomDocument). Decoders are tried in priority
//!   order; the file extension is never trusted.
//! - **Scorecard**: seven criteria, each a ratio in `[0, 1]` with a
//!   human-readable explanation, rendered as a fixed ten-line report.
//! - **Grading**: a weighted 0-100 score and an A-F letter grade.
//! - **Comparison**: two documents scored side by side, across families.
//!
//! ## Getting Started
//!
//! ### Scoring a file
//!
//! ```no_run
//! use sbom_scorecard::{DecoderChain, GradeWeights, ScorecardReport};
//! use std::path::Path;
//!
//! let chain = DecoderChain::default();
//! let report = ScorecardReport::from_path(Path::new("path/to/sbom.spdx.json"), &chain);
//!
//! print!("{}", report.report());
//!
//! let grade = report.grade(&GradeWeights::default());
//! println!("{:.1}/100 ({})", grade.score, grade.letter);
//! ```
//!
//! A document that fails to load still yields a report: every criterion
//! scores zero and the load error becomes the spec-compliance reasoning.
//!
//! ### Comparing two documents
//!
//! ```no_run
//! use sbom_scorecard::{compare, DecoderChain, GradeWeights};
//! use std::path::Path;
//!
//! let comparison = compare(
//!     Path::new("syft.spdx.json"),
//!     Path::new("trivy.cdx.json"),
//!     &DecoderChain::default(),
//!     &GradeWeights::default(),
//! );
//! print!("{}", comparison.render(false));
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the library crate. The `sbom-scorecard` binary
//! wraps it with `score`, `compare`, and configuration subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Counts are converted to f32/f64 ratios and rounded percentages
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod scorecard;

// Re-export main types for convenience
pub use config::{ConfigError, ScorecardConfig, Validatable};
pub use error::{Result, ScorecardError};
pub use model::{SbomDocument, SbomFormat};
pub use parsers::{DecodedDocument, DecoderChain, DocumentDecoder, LoadError, ParseError};
pub use scorecard::{
    compare, Comparison, Criterion, Grade, GradeLetter, GradeWeights, ReportValue,
    ScorecardReport,
};
