//! SBOM decoders and the ingestion dispatcher.
//!
//! Each supported syntax has a [`DocumentDecoder`] that converts raw bytes
//! into the normalized [`SbomDocument`](crate::model::SbomDocument):
//!
//! | Decoder | Family | Syntax |
//! |---|---|---|
//! | `spdx-json` | SPDX | JSON |
//! | `spdx-tag-value` | SPDX | tag-value |
//! | `spdx-rdf` | SPDX | RDF/XML |
//! | `cyclonedx-json` | `CycloneDX` | JSON |
//! | `cyclonedx-xml` | `CycloneDX` | XML |
//!
//! The format is never sniffed. [`DecoderChain`] tries decoders in priority
//! order and the first success wins.
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_scorecard::parsers::{load, DecoderChain};
//! use std::path::Path;
//!
//! let decoded = load(Path::new("sbom.json")).unwrap();
//! println!("{} packages via {}", decoded.document.packages.len(), decoded.decoder);
//!
//! // Only try SPDX syntaxes
//! let chain = DecoderChain::for_format(Some(sbom_scorecard::model::SbomFormat::Spdx));
//! let decoded = chain.load(Path::new("sbom.spdx")).unwrap();
//! ```

mod cyclonedx;
mod dispatch;
mod spdx;
mod traits;

pub use cyclonedx::{CycloneDxJsonDecoder, CycloneDxXmlDecoder};
pub use dispatch::{DecodedDocument, DecoderChain, LoadError, DEFAULT_MAX_FILE_SIZE_MB};
pub use spdx::{SpdxJsonDecoder, SpdxRdfDecoder, SpdxTagValueDecoder};
pub use traits::{DocumentDecoder, ParseError};

use std::path::Path;

/// Load a file with the default decoder chain
pub fn load(path: &Path) -> Result<DecodedDocument, LoadError> {
    DecoderChain::default().load(path)
}

/// Decode in-memory content with the default decoder chain
pub fn decode(content: &[u8]) -> Result<DecodedDocument, LoadError> {
    DecoderChain::default().decode(content)
}
