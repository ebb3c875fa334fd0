//! The scorecard for one document.

use super::counters::ScoreCounters;
use super::grade::{Grade, GradeWeights};
use super::value::{pretty_percent, ReportValue};
use crate::model::{CreationInfo, SbomDocument, SbomFormat};
use crate::parsers::{DecodedDocument, DecoderChain, LoadError};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static HAS_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("static regex"));

const NO_PACKAGES: &str = "No packages";
const NO_FILES: &str = "No files";

/// Deduction for each missing piece of creation info
const CREATION_INFO_PENALTY: f32 = 0.2;

/// A scored criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    SpecCompliance,
    PackageIdentification,
    PackageVersions,
    PackageLicenses,
    PackageDigests,
    FileDigests,
    CreationInfo,
}

impl Criterion {
    /// Every criterion, in display order
    pub const ALL: [Self; 7] = [
        Self::SpecCompliance,
        Self::PackageIdentification,
        Self::PackageVersions,
        Self::PackageLicenses,
        Self::PackageDigests,
        Self::FileDigests,
        Self::CreationInfo,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpecCompliance => "Spec compliance",
            Self::PackageIdentification => "Package identification",
            Self::PackageVersions => "Package versions",
            Self::PackageLicenses => "Package licenses",
            Self::PackageDigests => "Package digests",
            Self::FileDigests => "File digests",
            Self::CreationInfo => "Creation info",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Document-level facts reported next to the scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub total_packages: usize,
    pub total_files: usize,
    /// Family of the loaded document, `None` when loading failed
    pub format: Option<SbomFormat>,
    /// Decoder that read the document
    pub decoder: Option<String>,
    /// Creation timestamp, when present and RFC 3339
    pub created: Option<DateTime<Utc>>,
}

/// Quality scorecard of one SBOM document.
///
/// Holds only counters and creation info; every evaluator recomputes its
/// value from them, so repeated calls return identical results. A report
/// built from a failed load scores zero on every criterion.
#[derive(Debug)]
pub struct ScorecardReport {
    counters: ScoreCounters,
    creation_info: Option<CreationInfo>,
    load_error: Option<LoadError>,
    format: Option<SbomFormat>,
    decoder: Option<&'static str>,
}

impl ScorecardReport {
    /// Score a normalized document
    #[must_use]
    pub fn from_document(document: &SbomDocument) -> Self {
        Self {
            counters: ScoreCounters::collect(document),
            creation_info: document.creation_info.clone(),
            load_error: None,
            format: Some(document.format),
            decoder: None,
        }
    }

    /// Score the output of a [`DecoderChain`]
    #[must_use]
    pub fn from_decoded(decoded: &DecodedDocument) -> Self {
        let mut report = Self::from_document(&decoded.document);
        report.decoder = Some(decoded.decoder);
        report
    }

    /// A report for a document that could not be loaded
    #[must_use]
    pub fn from_load_error(error: LoadError) -> Self {
        Self {
            counters: ScoreCounters::default(),
            creation_info: None,
            load_error: Some(error),
            format: None,
            decoder: None,
        }
    }

    /// Load and score a file.
    ///
    /// Never fails: a load error is recorded on the report and surfaces as
    /// a failing spec-compliance score.
    #[must_use]
    pub fn from_path(path: &Path, chain: &DecoderChain) -> Self {
        match chain.load(path) {
            Ok(decoded) => Self::from_decoded(&decoded),
            Err(e) => {
                tracing::warn!(path = %path.display(), "loading document: {e}");
                Self::from_load_error(e)
            }
        }
    }

    /// Decode and score in-memory content
    #[must_use]
    pub fn from_bytes(content: &[u8], chain: &DecoderChain) -> Self {
        match chain.decode(content) {
            Ok(decoded) => Self::from_decoded(&decoded),
            Err(e) => Self::from_load_error(e),
        }
    }

    #[must_use]
    pub const fn counters(&self) -> &ScoreCounters {
        &self.counters
    }

    #[must_use]
    pub const fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    #[must_use]
    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata {
            total_packages: self.counters.total_packages,
            total_files: self.counters.total_files,
            format: self.format,
            decoder: self.decoder.map(str::to_string),
            created: self.creation_info.as_ref().and_then(CreationInfo::created_at),
        }
    }

    // ========================================================================
    // Criterion evaluators
    // ========================================================================

    /// Evaluate one criterion
    #[must_use]
    pub fn evaluate(&self, criterion: Criterion) -> ReportValue {
        match criterion {
            Criterion::SpecCompliance => self.is_spec_compliant(),
            Criterion::PackageIdentification => self.package_identification(),
            Criterion::PackageVersions => self.package_versions(),
            Criterion::PackageLicenses => self.package_licenses(),
            Criterion::PackageDigests => self.package_digests(),
            Criterion::FileDigests => self.file_digests(),
            Criterion::CreationInfo => self.creation_info(),
        }
    }

    /// 1 when the document loaded, 0 with the load error otherwise
    #[must_use]
    pub fn is_spec_compliant(&self) -> ReportValue {
        match &self.load_error {
            Some(e) => ReportValue::failing(e.to_string()),
            None => ReportValue::new(1.0, String::new()),
        }
    }

    /// Share of packages with a purl or a CPE
    #[must_use]
    pub fn package_identification(&self) -> ReportValue {
        let c = &self.counters;
        if c.total_packages == 0 {
            return ReportValue::failing(NO_PACKAGES);
        }

        let either = pretty_percent(c.has_purl_or_cpe, c.total_packages);
        let purl = pretty_percent(c.has_purl, c.total_packages);
        let cpe = pretty_percent(c.has_cpe, c.total_packages);
        ReportValue::new(
            super::value::ratio(c.has_purl_or_cpe, c.total_packages),
            format!("{either}% have either purls ({purl}%) or CPEs ({cpe}%)"),
        )
    }

    #[must_use]
    pub fn package_versions(&self) -> ReportValue {
        ReportValue::from_counts(
            self.counters.has_package_version,
            self.counters.total_packages,
            NO_PACKAGES,
        )
    }

    #[must_use]
    pub fn package_licenses(&self) -> ReportValue {
        ReportValue::from_counts(
            self.counters.has_license,
            self.counters.total_packages,
            NO_PACKAGES,
        )
    }

    #[must_use]
    pub fn package_digests(&self) -> ReportValue {
        ReportValue::from_counts(
            self.counters.has_package_digest,
            self.counters.total_packages,
            NO_PACKAGES,
        )
    }

    #[must_use]
    pub fn file_digests(&self) -> ReportValue {
        ReportValue::from_counts(
            self.counters.has_file_digest,
            self.counters.total_files,
            NO_FILES,
        )
    }

    /// Provenance score.
    ///
    /// Zero without creation info or without a tool creator. Otherwise
    /// starts at 1 and loses 0.2 when no tool carries a version-like digit
    /// and 0.2 when the creation timestamp is empty.
    #[must_use]
    pub fn creation_info(&self) -> ReportValue {
        let Some(info) = &self.creation_info else {
            return ReportValue::failing("No creation info found.");
        };

        if info.tools().next().is_none() {
            return ReportValue::failing("No tool was used to create the sbom.");
        }

        let mut score = 1.0_f32;
        let mut reasons = Vec::new();

        if !info.tools().any(|tool| HAS_DIGIT.is_match(&tool.identifier())) {
            score -= CREATION_INFO_PENALTY;
            reasons.push("The tool used to create the sbom does not have a version.");
        }

        if !info.has_timestamp() {
            score -= CREATION_INFO_PENALTY;
            reasons.push("There is no timestamp for when the sbom was created.");
        }

        ReportValue::new(score.max(0.0), reasons.join(", "))
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Plain-text summary, one metric per line
    #[must_use]
    pub fn report(&self) -> String {
        let c = &self.counters;
        let lines = [
            format!("{} total packages", c.total_packages),
            format!("{} total files", c.total_files),
            format!("{}% have licenses.", pretty_percent(c.has_license, c.total_packages)),
            format!(
                "{}% have package digest.",
                pretty_percent(c.has_package_digest, c.total_packages)
            ),
            format!(
                "{}% have package versions.",
                pretty_percent(c.has_package_version, c.total_packages)
            ),
            format!("{}% have purls.", pretty_percent(c.has_purl, c.total_packages)),
            format!("{}% have CPEs.", pretty_percent(c.has_cpe, c.total_packages)),
            format!(
                "{}% have file digest.",
                pretty_percent(c.has_file_digest, c.total_files)
            ),
            format!("Spec valid? {}", self.is_spec_compliant().is_perfect()),
            format!("Has creation info? {}", self.creation_info().is_perfect()),
        ];

        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Weighted score out of 100
    #[must_use]
    pub fn grade(&self, weights: &GradeWeights) -> Grade {
        Grade::compute(self, weights)
    }

    /// Everything needed for machine-readable output
    #[must_use]
    pub fn summary(&self, weights: &GradeWeights) -> ScorecardSummary {
        ScorecardSummary {
            metadata: self.metadata(),
            criteria: Criterion::ALL
                .iter()
                .map(|&criterion| CriterionScore {
                    criterion,
                    value: self.evaluate(criterion),
                })
                .collect(),
            grade: self.grade(weights),
        }
    }
}

/// One criterion's value in a [`ScorecardSummary`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    #[serde(flatten)]
    pub value: ReportValue,
}

/// Serializable snapshot of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardSummary {
    pub metadata: ReportMetadata,
    pub criteria: Vec<CriterionScore>,
    pub grade: Grade,
}
