//! Weighted grade out of 100.

use super::report::{Criterion, ScorecardReport};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Points each criterion is worth.
///
/// Criteria without a weight here (the digest criteria) are reported but
/// not graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GradeWeights {
    pub spec_compliance: f32,
    pub package_identification: f32,
    pub package_versions: f32,
    pub package_licenses: f32,
    pub creation_info: f32,
}

impl Default for GradeWeights {
    fn default() -> Self {
        Self {
            spec_compliance: 25.0,
            package_identification: 20.0,
            package_versions: 20.0,
            package_licenses: 20.0,
            creation_info: 15.0,
        }
    }
}

impl GradeWeights {
    /// Weight of a criterion, `None` for ungraded criteria
    #[must_use]
    pub const fn weight(&self, criterion: Criterion) -> Option<f32> {
        match criterion {
            Criterion::SpecCompliance => Some(self.spec_compliance),
            Criterion::PackageIdentification => Some(self.package_identification),
            Criterion::PackageVersions => Some(self.package_versions),
            Criterion::PackageLicenses => Some(self.package_licenses),
            Criterion::CreationInfo => Some(self.creation_info),
            Criterion::PackageDigests | Criterion::FileDigests => None,
        }
    }

    /// Graded criteria with their weights
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f32)> + '_ {
        Criterion::ALL
            .iter()
            .filter_map(|&c| self.weight(c).map(|w| (c, w)))
    }

    #[must_use]
    pub fn total(&self) -> f32 {
        self.iter().map(|(_, w)| w).sum()
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLetter {
    /// 90-100
    A,
    /// 80-89
    B,
    /// 70-79
    C,
    /// 60-69
    D,
    /// below 60
    F,
}

impl GradeLetter {
    /// Letter for a score, graded on the score as displayed (one decimal)
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_score(score: f32) -> Self {
        let shown = (score * 10.0).round() / 10.0;
        match shown as u32 {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl std::fmt::Display for GradeLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.letter())
    }
}

/// One criterion's contribution to the grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedCriterion {
    pub criterion: Criterion,
    pub ratio: f32,
    pub weight: f32,
    /// `ratio × weight`
    pub points: f32,
    pub reasoning: String,
}

/// Weighted score of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub score: f32,
    pub max_score: f32,
    pub letter: GradeLetter,
    pub criteria: Vec<GradedCriterion>,
}

impl Grade {
    pub(crate) fn compute(report: &ScorecardReport, weights: &GradeWeights) -> Self {
        let criteria: Vec<GradedCriterion> = weights
            .iter()
            .map(|(criterion, weight)| {
                let value = report.evaluate(criterion);
                GradedCriterion {
                    criterion,
                    ratio: value.ratio,
                    weight,
                    points: value.ratio * weight,
                    reasoning: value.reasoning,
                }
            })
            .collect();

        let score = criteria.iter().map(|c| c.points).sum();
        Self {
            score,
            max_score: weights.total(),
            letter: GradeLetter::from_score(score),
            criteria,
        }
    }

    /// Fixed-width table of the graded criteria
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for c in &self.criteria {
            out.push_str(&format!(
                "{:<24} {:>5.1}/{:<4} {}\n",
                c.criterion.label(),
                c.points,
                c.weight,
                c.reasoning
            ));
        }
        out.push_str(&format!(
            "{:<24} {:>5.1}/{:<4} {}\n",
            "Total", self.score, self.max_score, self.letter
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CreationInfo, Creator, ExternalId, LicenseAssertionState, Package, SbomDocument, SbomFormat,
    };

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_default_weights_sum_to_100() {
        assert!(approx(GradeWeights::default().total(), 100.0));
        assert!(GradeWeights::default().weight(Criterion::FileDigests).is_none());
    }

    #[test]
    fn test_perfect_document() {
        let mut doc = SbomDocument::new(SbomFormat::Spdx);
        doc.add_package(
            Package::new("a")
                .with_version("1.0")
                .with_declared_license(LicenseAssertionState::Present("MIT".into()))
                .with_external_id(ExternalId::Purl("pkg:npm/a@1.0".into())),
        );
        doc.creation_info =
            Some(CreationInfo::new("2024-01-01T00:00:00Z").with_creator(Creator::tool("syft-1.0")));

        let grade = ScorecardReport::from_document(&doc).grade(&GradeWeights::default());
        assert!(approx(grade.score, 100.0));
        assert_eq!(grade.letter, GradeLetter::A);
        assert_eq!(grade.criteria.len(), 5);
    }

    #[test]
    fn test_partial_document() {
        let mut doc = SbomDocument::new(SbomFormat::CycloneDx);
        doc.add_package(Package::new("a").with_version("1.0"));
        doc.add_package(Package::new("b"));

        // spec 25 + half of versions 20, nothing else scores
        let grade = ScorecardReport::from_document(&doc).grade(&GradeWeights::default());
        assert!(approx(grade.score, 35.0));
        assert_eq!(grade.letter, GradeLetter::F);
        assert!(grade.render().contains("Total"));
    }

    #[test]
    fn test_letters() {
        assert_eq!(GradeLetter::from_score(100.0), GradeLetter::A);
        assert_eq!(GradeLetter::from_score(89.9), GradeLetter::B);
        assert_eq!(GradeLetter::from_score(70.0), GradeLetter::C);
        assert_eq!(GradeLetter::from_score(60.5), GradeLetter::D);
        assert_eq!(GradeLetter::from_score(12.0), GradeLetter::F);
        // accumulated f32 error must not drop a grade
        assert_eq!(GradeLetter::from_score(79.999_98), GradeLetter::B);
    }
}
