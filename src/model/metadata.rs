//! Document provenance: format family, creators, and creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SBOM format family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SbomFormat {
    CycloneDx,
    Spdx,
}

impl std::fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycloneDx => write!(f, "CycloneDX"),
            Self::Spdx => write!(f, "SPDX"),
        }
    }
}

/// Creation metadata of an SBOM document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationInfo {
    /// Entities that produced the document
    pub creators: Vec<Creator>,
    /// Raw creation timestamp as written in the document (may be empty)
    pub created: String,
}

impl CreationInfo {
    /// Create creation info with a timestamp and no creators
    #[must_use]
    pub fn new(created: impl Into<String>) -> Self {
        Self {
            creators: Vec::new(),
            created: created.into(),
        }
    }

    /// Add a creator
    #[must_use]
    pub fn with_creator(mut self, creator: Creator) -> Self {
        self.creators.push(creator);
        self
    }

    /// Creators of kind [`CreatorKind::Tool`]
    pub fn tools(&self) -> impl Iterator<Item = &Creator> {
        self.creators
            .iter()
            .filter(|c| c.kind == CreatorKind::Tool)
    }

    /// Whether the creation timestamp is populated
    #[must_use]
    pub fn has_timestamp(&self) -> bool {
        !self.created.trim().is_empty()
    }

    /// Parse the creation timestamp as RFC 3339, if possible
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.created.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A document creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator type
    pub kind: CreatorKind,
    /// Creator name or identifier
    pub name: String,
    /// Separately recorded version, when the format has a field for it
    pub version: Option<String>,
}

impl Creator {
    /// Create a creator without a separate version
    #[must_use]
    pub fn new(kind: CreatorKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            version: None,
        }
    }

    /// Create a tool creator
    #[must_use]
    pub fn tool(name: impl Into<String>) -> Self {
        Self::new(CreatorKind::Tool, name)
    }

    /// Set the version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parse an SPDX creator string such as `Tool: syft-0.90.0`.
    ///
    /// Strings without a recognised `Type:` prefix are kept whole with kind
    /// [`CreatorKind::Other`].
    #[must_use]
    pub fn from_spdx(value: &str) -> Self {
        let value = value.trim();
        match value.split_once(':') {
            Some((kind, name)) => {
                let kind = match kind.trim() {
                    "Tool" => CreatorKind::Tool,
                    "Organization" => CreatorKind::Organization,
                    "Person" => CreatorKind::Person,
                    _ => return Self::new(CreatorKind::Other, value),
                };
                Self::new(kind, name.trim())
            }
            None => Self::new(CreatorKind::Other, value),
        }
    }

    /// Name and version joined by a space, as a single identifying string
    #[must_use]
    pub fn identifier(&self) -> String {
        match self.version.as_deref().map(str::trim) {
            Some(version) if !version.is_empty() => format!("{} {}", self.name, version),
            _ => self.name.clone(),
        }
    }
}

/// Type of creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatorKind {
    Tool,
    Organization,
    Person,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_from_spdx() {
        let tool = Creator::from_spdx("Tool: syft-0.90.0");
        assert_eq!(tool.kind, CreatorKind::Tool);
        assert_eq!(tool.name, "syft-0.90.0");

        let org = Creator::from_spdx("Organization: Acme Corp (ops@acme.test)");
        assert_eq!(org.kind, CreatorKind::Organization);

        let unknown = Creator::from_spdx("Robot: r2d2");
        assert_eq!(unknown.kind, CreatorKind::Other);
        assert_eq!(unknown.name, "Robot: r2d2");
    }

    #[test]
    fn test_identifier_joins_version() {
        assert_eq!(Creator::tool("trivy").with_version("0.50.1").identifier(), "trivy 0.50.1");
        assert_eq!(Creator::tool("trivy").with_version("  ").identifier(), "trivy");
        assert_eq!(Creator::tool("trivy").identifier(), "trivy");
    }

    #[test]
    fn test_created_at() {
        let info = CreationInfo::new("2024-03-01T12:00:00Z");
        assert!(info.has_timestamp());
        assert!(info.created_at().is_some());

        let info = CreationInfo::new("yesterday");
        assert!(info.has_timestamp());
        assert!(info.created_at().is_none());

        assert!(!CreationInfo::new("   ").has_timestamp());
    }

    #[test]
    fn test_tools_filter() {
        let info = CreationInfo::new("")
            .with_creator(Creator::new(CreatorKind::Person, "Jane"))
            .with_creator(Creator::tool("cdxgen"));
        let tools: Vec<_> = info.tools().map(|c| c.name.as_str()).collect();
        assert_eq!(tools, vec!["cdxgen"]);
    }
}
