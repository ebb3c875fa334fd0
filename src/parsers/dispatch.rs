//! Format detection by fallback.
//!
//! Rather than sniffing content, [`DecoderChain`] tries each decoder in a
//! fixed priority order and keeps the first one that succeeds. When nothing
//! decodes, the error from the last decoder tried is reported.

use super::cyclonedx::{CycloneDxJsonDecoder, CycloneDxXmlDecoder};
use super::spdx::{SpdxJsonDecoder, SpdxRdfDecoder, SpdxTagValueDecoder};
use super::traits::{DocumentDecoder, ParseError};
use crate::model::{SbomDocument, SbomFormat};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default maximum input size (512 MB)
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 512;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Why a document could not be loaded
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SBOM file is {size_mb} MB, exceeding the {limit_mb} MB limit")]
    TooLarge { size_mb: u64, limit_mb: u64 },

    /// Every decoder failed; carries the last one's error
    #[error("{source}")]
    Parse {
        decoder: &'static str,
        #[source]
        source: ParseError,
    },

    /// A decoder accepted the input but found no packages, files, or
    /// creation info in it
    #[error("Parsed the file, but was unable to find an SBOM in it")]
    EmptyDocument { decoder: &'static str },

    #[error("no decoders configured")]
    NoDecoders,
}

impl LoadError {
    /// Name of the decoder the error came from, if any
    #[must_use]
    pub const fn decoder(&self) -> Option<&'static str> {
        match self {
            Self::Parse { decoder, .. } | Self::EmptyDocument { decoder } => Some(*decoder),
            _ => None,
        }
    }
}

/// A successfully decoded document and the decoder that produced it
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub document: SbomDocument,
    pub decoder: &'static str,
}

/// Priority-ordered list of decoders
pub struct DecoderChain {
    decoders: Vec<Box<dyn DocumentDecoder>>,
    max_file_size: u64,
}

impl DecoderChain {
    /// Create a chain with no decoders
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE_MB * BYTES_PER_MB,
        }
    }

    /// Every supported decoder, in default priority order
    #[must_use]
    pub fn all() -> Self {
        Self::for_format(None)
    }

    /// Decoders for one format family, or all of them for `None`.
    ///
    /// SPDX is tried JSON, then tag-value, then RDF/XML.
    #[must_use]
    pub fn for_format(format: Option<SbomFormat>) -> Self {
        let chain = Self::new();
        match format {
            Some(SbomFormat::Spdx) => chain
                .with_decoder(SpdxJsonDecoder)
                .with_decoder(SpdxTagValueDecoder)
                .with_decoder(SpdxRdfDecoder),
            Some(SbomFormat::CycloneDx) => chain
                .with_decoder(CycloneDxJsonDecoder)
                .with_decoder(CycloneDxXmlDecoder),
            None => chain
                .with_decoder(SpdxJsonDecoder)
                .with_decoder(CycloneDxJsonDecoder)
                .with_decoder(CycloneDxXmlDecoder)
                .with_decoder(SpdxTagValueDecoder)
                .with_decoder(SpdxRdfDecoder),
        }
    }

    /// Append a decoder at the lowest priority
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl DocumentDecoder + 'static) -> Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Set the maximum accepted input size in megabytes
    #[must_use]
    pub const fn with_max_file_size_mb(mut self, limit_mb: u64) -> Self {
        self.max_file_size = limit_mb.saturating_mul(BYTES_PER_MB);
        self
    }

    /// Decoder names in priority order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }

    /// Try each decoder in turn.
    ///
    /// The first structural success is final: if it yields an empty
    /// document the result is [`LoadError::EmptyDocument`] and later
    /// decoders are not consulted.
    pub fn decode(&self, content: &[u8]) -> Result<DecodedDocument, LoadError> {
        self.check_size(content.len() as u64)?;

        let mut last_error = None;
        for decoder in &self.decoders {
            match decoder.decode(content) {
                Ok(document) => {
                    if document.is_empty() {
                        tracing::debug!(decoder = decoder.name(), "decoded an empty document");
                        return Err(LoadError::EmptyDocument {
                            decoder: decoder.name(),
                        });
                    }
                    tracing::debug!(
                        decoder = decoder.name(),
                        packages = document.packages.len(),
                        files = document.files.len(),
                        "decoded document"
                    );
                    return Ok(DecodedDocument {
                        document,
                        decoder: decoder.name(),
                    });
                }
                Err(e) => {
                    tracing::debug!(decoder = decoder.name(), error = %e, "decoder failed");
                    last_error = Some((decoder.name(), e));
                }
            }
        }

        match last_error {
            Some((decoder, source)) => Err(LoadError::Parse { decoder, source }),
            None => Err(LoadError::NoDecoders),
        }
    }

    /// Read a file once and decode it
    pub fn load(&self, path: &Path) -> Result<DecodedDocument, LoadError> {
        let io_error = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(io_error)?;
        self.check_size(metadata.len())?;

        let content = std::fs::read(path).map_err(io_error)?;
        let decoded = self.decode(&content)?;
        tracing::info!(
            path = %path.display(),
            decoder = decoded.decoder,
            "loaded {} SBOM",
            decoded.document.format
        );
        Ok(decoded)
    }

    fn check_size(&self, size: u64) -> Result<(), LoadError> {
        if size > self.max_file_size {
            return Err(LoadError::TooLarge {
                size_mb: size / BYTES_PER_MB,
                limit_mb: self.max_file_size / BYTES_PER_MB,
            });
        }
        Ok(())
    }
}

impl Default for DecoderChain {
    fn default() -> Self {
        Self::all()
    }
}

impl std::fmt::Debug for DecoderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderChain")
            .field("decoders", &self.names())
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Package;

    /// Decoder with a canned outcome
    struct Fixed {
        name: &'static str,
        outcome: Option<usize>,
    }

    impl DocumentDecoder for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn format(&self) -> SbomFormat {
            SbomFormat::Spdx
        }

        fn decode(&self, _content: &[u8]) -> Result<SbomDocument, ParseError> {
            match self.outcome {
                Some(packages) => {
                    let mut doc = SbomDocument::new(SbomFormat::Spdx);
                    for i in 0..packages {
                        doc.add_package(Package::new(format!("{}-{i}", self.name)));
                    }
                    Ok(doc)
                }
                None => Err(ParseError::InvalidStructure(format!("{} failed", self.name))),
            }
        }
    }

    fn fails(name: &'static str) -> Fixed {
        Fixed { name, outcome: None }
    }

    fn succeeds(name: &'static str, packages: usize) -> Fixed {
        Fixed {
            name,
            outcome: Some(packages),
        }
    }

    #[test]
    fn test_first_success_wins() {
        let chain = DecoderChain::new()
            .with_decoder(fails("a"))
            .with_decoder(fails("b"))
            .with_decoder(succeeds("c", 1))
            .with_decoder(succeeds("d", 2));
        let decoded = chain.decode(b"").unwrap();
        assert_eq!(decoded.decoder, "c");
        assert_eq!(decoded.document.packages[0].name, "c-0");
    }

    #[test]
    fn test_last_error_is_reported() {
        let chain = DecoderChain::new()
            .with_decoder(fails("a"))
            .with_decoder(fails("b"))
            .with_decoder(fails("c"));
        let err = chain.decode(b"").unwrap_err();
        assert_eq!(err.decoder(), Some("c"));
        assert_eq!(err.to_string(), "Invalid SBOM structure: c failed");
    }

    #[test]
    fn test_empty_success_stops_the_chain() {
        let chain = DecoderChain::new()
            .with_decoder(succeeds("a", 0))
            .with_decoder(succeeds("b", 3));
        let err = chain.decode(b"").unwrap_err();
        assert!(matches!(err, LoadError::EmptyDocument { decoder: "a" }));
    }

    #[test]
    fn test_no_decoders() {
        let err = DecoderChain::new().decode(b"{}").unwrap_err();
        assert!(matches!(err, LoadError::NoDecoders));
    }

    #[test]
    fn test_size_limit() {
        let chain = DecoderChain::new()
            .with_decoder(succeeds("a", 1))
            .with_max_file_size_mb(0);
        let err = chain.decode(b"x").unwrap_err();
        assert!(matches!(err, LoadError::TooLarge { limit_mb: 0, .. }));
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            DecoderChain::all().names(),
            vec![
                "spdx-json",
                "cyclonedx-json",
                "cyclonedx-xml",
                "spdx-tag-value",
                "spdx-rdf"
            ]
        );
        assert_eq!(
            DecoderChain::for_format(Some(SbomFormat::CycloneDx)).names(),
            vec!["cyclonedx-json", "cyclonedx-xml"]
        );
    }

    #[test]
    fn test_missing_file() {
        let err = DecoderChain::all()
            .load(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
