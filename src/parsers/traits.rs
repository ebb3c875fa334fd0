//! Decoder trait definitions and error types.

use crate::model::{SbomDocument, SbomFormat};
use thiserror::Error;

/// Errors a single decoder can report
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    #[error("JSON parse error: {0}")]
    JsonError(String),

    #[error("XML parse error: {0}")]
    XmlError(String),

    #[error("tag-value parse error: {0}")]
    TagValueError(String),

    #[error("Invalid SBOM structure: {0}")]
    InvalidStructure(String),

    #[error("Unknown SBOM format: {0}")]
    UnknownFormat(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<quick_xml::de::DeError> for ParseError {
    fn from(err: quick_xml::de::DeError) -> Self {
        Self::XmlError(err.to_string())
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidEncoding(err.to_string())
    }
}

/// One concrete syntax of one SBOM family.
///
/// A decoder either turns the raw bytes into a normalized [`SbomDocument`]
/// or fails. Decoders are tried in order by
/// [`DecoderChain`](super::DecoderChain), so each one should reject input
/// that is clearly not its syntax rather than returning an empty document.
pub trait DocumentDecoder: Send + Sync {
    /// Short stable name, e.g. `spdx-json`
    fn name(&self) -> &'static str;

    /// Family this decoder produces
    fn format(&self) -> SbomFormat;

    /// Decode raw file content
    fn decode(&self, content: &[u8]) -> Result<SbomDocument, ParseError>;
}

/// Borrow content as UTF-8 text, skipping a leading byte order mark
pub(crate) fn as_text(content: &[u8]) -> Result<&str, ParseError> {
    let text = std::str::from_utf8(content)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_strips_bom() {
        assert_eq!(as_text("\u{feff}hello".as_bytes()).unwrap(), "hello");
        assert_eq!(as_text(b"plain").unwrap(), "plain");
    }

    #[test]
    fn test_as_text_rejects_invalid_utf8() {
        let err = as_text(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidEncoding(_)));
    }
}
