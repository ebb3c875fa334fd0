//! Counter collection over a normalized document.

use crate::model::SbomDocument;
use serde::{Deserialize, Serialize};

/// Raw hit counts gathered in one pass over packages and files.
///
/// Every package counts at most once toward each counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCounters {
    pub total_packages: usize,
    pub total_files: usize,
    /// Packages with a concluded or (failing that) declared license
    pub has_license: usize,
    pub has_package_digest: usize,
    pub has_package_version: usize,
    pub has_purl: usize,
    pub has_cpe: usize,
    /// Packages with a purl, a CPE, or both
    pub has_purl_or_cpe: usize,
    pub has_file_digest: usize,
}

impl ScoreCounters {
    /// Count everything the evaluators need
    #[must_use]
    pub fn collect(document: &SbomDocument) -> Self {
        let mut counters = Self {
            total_packages: document.packages.len(),
            total_files: document.files.len(),
            ..Self::default()
        };

        for package in &document.packages {
            let purl = package.has_purl();
            let cpe = package.has_cpe();

            counters.has_license += usize::from(package.has_license());
            counters.has_package_digest += usize::from(package.has_checksum());
            counters.has_package_version += usize::from(package.has_version());
            counters.has_purl += usize::from(purl);
            counters.has_cpe += usize::from(cpe);
            counters.has_purl_or_cpe += usize::from(purl || cpe);
        }

        counters.has_file_digest = document.files.iter().filter(|f| f.has_checksum()).count();

        counters
    }
}
