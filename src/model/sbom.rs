//! Core SBOM document, package, and file structures.

use super::{CreationInfo, LicenseAssertionState, SbomFormat};
use serde::{Deserialize, Serialize};

/// Normalized SBOM document - the format-agnostic representation scored by
/// the scorecard.
///
/// Both SPDX and `CycloneDX` decoders produce this structure, so a single set
/// of evaluators covers both families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomDocument {
    /// Format family the document was decoded from
    pub format: SbomFormat,
    /// Packages (SPDX packages, `CycloneDX` non-file components)
    pub packages: Vec<Package>,
    /// Files (SPDX files, `CycloneDX` components of type `file`)
    pub files: Vec<SbomFile>,
    /// Creation metadata, when the document has any
    pub creation_info: Option<CreationInfo>,
}

impl SbomDocument {
    /// Create an empty document of the given family
    #[must_use]
    pub const fn new(format: SbomFormat) -> Self {
        Self {
            format,
            packages: Vec::new(),
            files: Vec::new(),
            creation_info: None,
        }
    }

    /// Add a package
    pub fn add_package(&mut self, package: Package) {
        self.packages.push(package);
    }

    /// Add a file
    pub fn add_file(&mut self, file: SbomFile) {
        self.files.push(file);
    }

    /// True when the document has no packages, no files, and no creation
    /// info. A decoder that returns such a document most likely accepted
    /// input that was not an SBOM at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.files.is_empty() && self.creation_info.is_none()
    }
}

/// A package entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// Version string (empty when not recorded)
    pub version: String,
    pub concluded_license: LicenseAssertionState,
    pub declared_license: LicenseAssertionState,
    pub checksums: Vec<Checksum>,
    pub external_ids: Vec<ExternalId>,
}

impl Package {
    /// Create a package with only a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the concluded license
    #[must_use]
    pub fn with_concluded_license(mut self, state: LicenseAssertionState) -> Self {
        self.concluded_license = state;
        self
    }

    /// Set the declared license
    #[must_use]
    pub fn with_declared_license(mut self, state: LicenseAssertionState) -> Self {
        self.declared_license = state;
        self
    }

    /// Add a checksum
    #[must_use]
    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksums.push(checksum);
        self
    }

    /// Add an external identifier
    #[must_use]
    pub fn with_external_id(mut self, id: ExternalId) -> Self {
        self.external_ids.push(id);
        self
    }

    #[must_use]
    pub fn has_version(&self) -> bool {
        !self.version.trim().is_empty()
    }

    /// The license that counts for this package: concluded if asserted,
    /// otherwise declared.
    #[must_use]
    pub const fn effective_license(&self) -> &LicenseAssertionState {
        if self.concluded_license.is_present() {
            &self.concluded_license
        } else {
            &self.declared_license
        }
    }

    #[must_use]
    pub const fn has_license(&self) -> bool {
        self.effective_license().is_present()
    }

    #[must_use]
    pub fn has_checksum(&self) -> bool {
        !self.checksums.is_empty()
    }

    #[must_use]
    pub fn has_purl(&self) -> bool {
        self.external_ids.iter().any(ExternalId::is_purl)
    }

    #[must_use]
    pub fn has_cpe(&self) -> bool {
        self.external_ids.iter().any(ExternalId::is_cpe)
    }
}

/// A file entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomFile {
    pub name: String,
    pub checksums: Vec<Checksum>,
}

impl SbomFile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checksums: Vec::new(),
        }
    }

    /// Add a checksum
    #[must_use]
    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksums.push(checksum);
        self
    }

    #[must_use]
    pub fn has_checksum(&self) -> bool {
        !self.checksums.is_empty()
    }
}

/// A checksum as written in the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    /// Algorithm name, upper-cased (e.g. `SHA256`, `SHA-256`)
    pub algorithm: String,
    pub value: String,
}

impl Checksum {
    #[must_use]
    pub fn new(algorithm: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into().to_uppercase(),
            value: value.into(),
        }
    }
}

/// External package identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExternalId {
    /// Package URL
    Purl(String),
    /// Common Platform Enumeration (2.2 or 2.3)
    Cpe(String),
    /// Any other reference
    Other { kind: String, locator: String },
}

impl ExternalId {
    /// Classify an SPDX external reference by its reference type.
    ///
    /// `purl` is a package URL; any type starting with `cpe` (`cpe22Type`,
    /// `cpe23Type`) is a CPE.
    #[must_use]
    pub fn from_spdx_ref(reference_type: &str, locator: &str) -> Self {
        let kind = reference_type.trim();
        if kind == "purl" {
            Self::Purl(locator.to_string())
        } else if kind.starts_with("cpe") {
            Self::Cpe(locator.to_string())
        } else {
            Self::Other {
                kind: kind.to_string(),
                locator: locator.to_string(),
            }
        }
    }

    #[must_use]
    pub const fn is_purl(&self) -> bool {
        matches!(self, Self::Purl(_))
    }

    #[must_use]
    pub const fn is_cpe(&self) -> bool {
        matches!(self, Self::Cpe(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let mut doc = SbomDocument::new(SbomFormat::Spdx);
        assert!(doc.is_empty());

        doc.creation_info = Some(CreationInfo::default());
        assert!(!doc.is_empty());

        let mut doc = SbomDocument::new(SbomFormat::CycloneDx);
        doc.add_file(SbomFile::new("a.txt"));
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_effective_license_prefers_concluded() {
        let pkg = Package::new("a")
            .with_concluded_license(LicenseAssertionState::Present("MIT".into()))
            .with_declared_license(LicenseAssertionState::Present("GPL-2.0-only".into()));
        assert_eq!(pkg.effective_license().expression(), Some("MIT"));
    }

    #[test]
    fn test_effective_license_falls_back_to_declared() {
        let pkg = Package::new("a")
            .with_concluded_license(LicenseAssertionState::NotAsserted)
            .with_declared_license(LicenseAssertionState::Present("MIT".into()));
        assert!(pkg.has_license());

        let pkg = Package::new("b")
            .with_concluded_license(LicenseAssertionState::from_field(Some("NONE")))
            .with_declared_license(LicenseAssertionState::from_field(Some("NONE")));
        assert!(!pkg.has_license());
    }

    #[test]
    fn test_spdx_ref_classification() {
        assert!(ExternalId::from_spdx_ref("purl", "pkg:npm/a@1").is_purl());
        assert!(ExternalId::from_spdx_ref("cpe23Type", "cpe:2.3:a:x:y:1:*:*:*:*:*:*:*").is_cpe());
        assert!(ExternalId::from_spdx_ref("cpe22Type", "cpe:/a:x:y:1").is_cpe());
        let other = ExternalId::from_spdx_ref("swh", "swh:1:cnt:abc");
        assert!(!other.is_purl() && !other.is_cpe());
    }

    #[test]
    fn test_version_presence() {
        assert!(Package::new("a").with_version("1.0").has_version());
        assert!(!Package::new("a").with_version(" ").has_version());
        assert!(!Package::new("a").has_version());
    }

    #[test]
    fn test_checksum_algorithm_uppercased() {
        assert_eq!(Checksum::new("sha256", "ab").algorithm, "SHA256");
    }
}
