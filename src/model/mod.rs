//! Normalized representation of an SBOM document.
//!
//! SPDX and `CycloneDX` documents are both converted to [`SbomDocument`]
//! before scoring, so the scorecard never looks at format-specific
//! structures. Only what the scorecard measures is kept: packages, files,
//! and creation metadata.

mod license;
mod metadata;
mod sbom;

pub use license::*;
pub use metadata::*;
pub use sbom::*;
