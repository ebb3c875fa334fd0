//! SPDX decoders.
//!
//! Supports SPDX 2.x documents in JSON, tag-value, and RDF/XML syntax. All
//! three syntaxes are read into the same raw [`SpdxDocument`] and converted to
//! the normalized model by one adapter.

use crate::model::{
    Checksum, CreationInfo, Creator, ExternalId, LicenseAssertionState, Package, SbomDocument,
    SbomFile, SbomFormat,
};
use crate::parsers::traits::{as_text, DocumentDecoder, ParseError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;

/// Decoder for SPDX JSON documents
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxJsonDecoder;

/// Decoder for SPDX tag-value documents
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxTagValueDecoder;

/// Decoder for SPDX RDF/XML documents
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxRdfDecoder;

impl DocumentDecoder for SpdxJsonDecoder {
    fn name(&self) -> &'static str {
        "spdx-json"
    }

    fn format(&self) -> SbomFormat {
        SbomFormat::Spdx
    }

    fn decode(&self, content: &[u8]) -> Result<SbomDocument, ParseError> {
        let text = as_text(content)?;
        let spdx: SpdxDocument = serde_json::from_str(text)?;
        Ok(spdx.into_document())
    }
}

impl DocumentDecoder for SpdxTagValueDecoder {
    fn name(&self) -> &'static str {
        "spdx-tag-value"
    }

    fn format(&self) -> SbomFormat {
        SbomFormat::Spdx
    }

    fn decode(&self, content: &[u8]) -> Result<SbomDocument, ParseError> {
        let spdx = parse_tag_value(as_text(content)?)?;
        Ok(spdx.into_document())
    }
}

impl DocumentDecoder for SpdxRdfDecoder {
    fn name(&self) -> &'static str {
        "spdx-rdf"
    }

    fn format(&self) -> SbomFormat {
        SbomFormat::Spdx
    }

    fn decode(&self, content: &[u8]) -> Result<SbomDocument, ParseError> {
        let spdx = parse_rdf_xml(as_text(content)?)?;
        Ok(spdx.into_document())
    }
}

// ============================================================================
// Tag-value
// ============================================================================

/// Which element subsequent tag-value lines belong to
enum TagSection {
    Document,
    Package,
    File,
}

fn parse_tag_value(content: &str) -> Result<SpdxDocument, ParseError> {
    let mut doc = SpdxDocument::default();
    let mut creation_info: Option<SpdxCreationInfo> = None;
    let mut section = TagSection::Document;
    let mut in_text_block = false;

    for (line_no, line) in content.lines().enumerate() {
        if in_text_block {
            if line.contains("</text>") {
                in_text_block = false;
            }
            continue;
        }

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(ParseError::TagValueError(format!(
                "line {}: expected 'Tag: value'",
                line_no + 1
            )));
        };
        let key = key.trim();
        let value = value.trim();

        // Multi-line values are wrapped in <text>...</text>; none of them are scored
        if value.starts_with("<text>") && !value.contains("</text>") {
            in_text_block = true;
            continue;
        }

        match key {
            "SPDXVersion" => doc.spdx_version = value.to_string(),
            "Creator" => creation_info
                .get_or_insert_with(SpdxCreationInfo::default)
                .creators
                .push(value.to_string()),
            "Created" => {
                creation_info.get_or_insert_with(SpdxCreationInfo::default).created =
                    Some(value.to_string());
            }
            "PackageName" => {
                doc.packages.push(SpdxPackage {
                    name: value.to_string(),
                    ..SpdxPackage::default()
                });
                section = TagSection::Package;
            }
            "FileName" => {
                doc.files.push(SpdxFile {
                    file_name: value.to_string(),
                    ..SpdxFile::default()
                });
                section = TagSection::File;
            }
            "PackageVersion" => {
                if let Some(pkg) = current_package(&mut doc, &section) {
                    pkg.version_info = Some(value.to_string());
                }
            }
            "PackageLicenseConcluded" => {
                if let Some(pkg) = current_package(&mut doc, &section) {
                    pkg.license_concluded = Some(value.to_string());
                }
            }
            "PackageLicenseDeclared" => {
                if let Some(pkg) = current_package(&mut doc, &section) {
                    pkg.license_declared = Some(value.to_string());
                }
            }
            "PackageChecksum" => {
                if let (Some(pkg), Some(checksum)) =
                    (current_package(&mut doc, &section), parse_checksum_line(value))
                {
                    pkg.checksums.push(checksum);
                }
            }
            "ExternalRef" => {
                if let (Some(pkg), Some(ext_ref)) =
                    (current_package(&mut doc, &section), parse_external_ref_line(value))
                {
                    pkg.external_refs.push(ext_ref);
                }
            }
            "FileChecksum" => {
                if let (TagSection::File, Some(checksum)) = (&section, parse_checksum_line(value)) {
                    if let Some(file) = doc.files.last_mut() {
                        file.checksums.push(checksum);
                    }
                }
            }
            _ => {}
        }
    }

    if doc.spdx_version.is_empty() {
        return Err(ParseError::TagValueError(
            "missing SPDXVersion tag".to_string(),
        ));
    }

    doc.creation_info = creation_info;
    Ok(doc)
}

fn current_package<'a>(doc: &'a mut SpdxDocument, section: &TagSection) -> Option<&'a mut SpdxPackage> {
    match section {
        TagSection::Package => doc.packages.last_mut(),
        _ => None,
    }
}

/// Parse `SHA256: abc123`
fn parse_checksum_line(value: &str) -> Option<SpdxChecksum> {
    let (algorithm, checksum_value) = value.split_once(':')?;
    Some(SpdxChecksum {
        algorithm: algorithm.trim().to_string(),
        checksum_value: checksum_value.trim().to_string(),
    })
}

/// Parse `PACKAGE-MANAGER purl pkg:npm/lodash@4.17.21`
fn parse_external_ref_line(value: &str) -> Option<SpdxExternalRef> {
    let mut parts = value.split_whitespace();
    Some(SpdxExternalRef {
        reference_category: parts.next()?.to_string(),
        reference_type: parts.next()?.to_string(),
        reference_locator: parts.next()?.to_string(),
    })
}

// ============================================================================
// RDF/XML
// ============================================================================

/// An RDF element currently open that properties attach to
enum RdfEntity {
    Package(SpdxPackage),
    File(SpdxFile),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LicenseField {
    Concluded,
    Declared,
}

fn parse_rdf_xml(content: &str) -> Result<SpdxDocument, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut doc = SpdxDocument::default();
    let mut found_document = false;
    let mut creation_info: Option<SpdxCreationInfo> = None;
    let mut in_creation_info = false;

    let mut entities: Vec<RdfEntity> = Vec::new();
    let mut current_checksum: Option<SpdxChecksum> = None;
    let mut current_external_ref: Option<SpdxExternalRef> = None;
    let mut pending_license: Option<(LicenseField, Option<String>)> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                text.clear();
                let name = local_name(e);
                match name.as_str() {
                    "SpdxDocument" => found_document = true,
                    "CreationInfo" => {
                        in_creation_info = true;
                        creation_info.get_or_insert_with(SpdxCreationInfo::default);
                    }
                    "Package" => entities.push(RdfEntity::Package(SpdxPackage::default())),
                    "File" => entities.push(RdfEntity::File(SpdxFile::default())),
                    "Checksum" => current_checksum = Some(SpdxChecksum::default()),
                    "ExternalRef" => current_external_ref = Some(SpdxExternalRef::default()),
                    "licenseConcluded" => pending_license = Some((LicenseField::Concluded, None)),
                    "licenseDeclared" => pending_license = Some((LicenseField::Declared, None)),
                    _ => capture_license_uri(&mut pending_license, e),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e);
                let resource = resource_attr(e);
                match name.as_str() {
                    "licenseConcluded" | "licenseDeclared" => {
                        if let (Some(RdfEntity::Package(pkg)), Some(uri)) =
                            (entities.last_mut(), resource)
                        {
                            let license = license_from_uri(&uri);
                            if name == "licenseConcluded" {
                                pkg.license_concluded = Some(license);
                            } else {
                                pkg.license_declared = Some(license);
                            }
                        }
                    }
                    "algorithm" => {
                        if let (Some(checksum), Some(uri)) = (current_checksum.as_mut(), resource) {
                            checksum.algorithm = algorithm_from_uri(&uri);
                        }
                    }
                    "referenceType" => {
                        if let (Some(ext_ref), Some(uri)) = (current_external_ref.as_mut(), resource)
                        {
                            ext_ref.reference_type = last_segment(&uri);
                        }
                    }
                    "referenceCategory" => {
                        if let (Some(ext_ref), Some(uri)) = (current_external_ref.as_mut(), resource)
                        {
                            ext_ref.reference_category = last_segment(&uri)
                                .trim_start_matches("referenceCategory_")
                                .to_uppercase()
                                .replace('_', "-");
                        }
                    }
                    _ => capture_license_uri(&mut pending_license, e),
                }
            }
            Ok(Event::Text(ref e)) => {
                let value = e
                    .unescape()
                    .map_err(|err| ParseError::XmlError(err.to_string()))?;
                text.push_str(&value);
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let value = text.trim().to_string();
                match name.as_str() {
                    "CreationInfo" => in_creation_info = false,
                    "creator" if in_creation_info => {
                        if let Some(info) = creation_info.as_mut() {
                            info.creators.push(value);
                        }
                    }
                    "created" if in_creation_info => {
                        if let Some(info) = creation_info.as_mut() {
                            info.created = Some(value);
                        }
                    }
                    "Package" | "File" => match entities.pop() {
                        Some(RdfEntity::Package(pkg)) => doc.packages.push(pkg),
                        Some(RdfEntity::File(file)) => doc.files.push(file),
                        None => {}
                    },
                    "name" => {
                        if let Some(RdfEntity::Package(pkg)) = entities.last_mut() {
                            if pkg.name.is_empty() {
                                pkg.name = value;
                            }
                        }
                    }
                    "fileName" => {
                        if let Some(RdfEntity::File(file)) = entities.last_mut() {
                            file.file_name = value;
                        }
                    }
                    "versionInfo" => {
                        if let Some(RdfEntity::Package(pkg)) = entities.last_mut() {
                            pkg.version_info = Some(value);
                        }
                    }
                    "licenseConcluded" | "licenseDeclared" => {
                        if let Some((field, uri)) = pending_license.take() {
                            let license = uri.or_else(|| (!value.is_empty()).then_some(value));
                            if let (Some(RdfEntity::Package(pkg)), Some(license)) =
                                (entities.last_mut(), license)
                            {
                                match field {
                                    LicenseField::Concluded => pkg.license_concluded = Some(license),
                                    LicenseField::Declared => pkg.license_declared = Some(license),
                                }
                            }
                        }
                    }
                    "checksumValue" => {
                        if let Some(checksum) = current_checksum.as_mut() {
                            checksum.checksum_value = value;
                        }
                    }
                    "Checksum" => {
                        if let Some(checksum) = current_checksum.take() {
                            match entities.last_mut() {
                                Some(RdfEntity::Package(pkg)) => pkg.checksums.push(checksum),
                                Some(RdfEntity::File(file)) => file.checksums.push(checksum),
                                None => {}
                            }
                        }
                    }
                    "referenceType" => {
                        if let Some(ext_ref) = current_external_ref.as_mut() {
                            if !value.is_empty() {
                                ext_ref.reference_type = last_segment(&value);
                            }
                        }
                    }
                    "referenceLocator" => {
                        if let Some(ext_ref) = current_external_ref.as_mut() {
                            ext_ref.reference_locator = value;
                        }
                    }
                    "ExternalRef" => {
                        if let (Some(ext_ref), Some(RdfEntity::Package(pkg))) =
                            (current_external_ref.take(), entities.last_mut())
                        {
                            pkg.external_refs.push(ext_ref);
                        }
                    }
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::XmlError(format!(
                    "error parsing RDF/XML at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    if !found_document {
        return Err(ParseError::InvalidStructure(
            "no SpdxDocument element found".to_string(),
        ));
    }

    doc.spdx_version = "SPDX-2".to_string();
    doc.creation_info = creation_info;
    Ok(doc)
}

/// Local (prefix-free) element name
fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Value of an `rdf:resource` or `rdf:about` attribute
fn resource_attr(e: &BytesStart<'_>) -> Option<String> {
    e.attributes().filter_map(Result::ok).find_map(|attr| {
        matches!(attr.key.local_name().as_ref(), b"resource" | b"about")
            .then(|| String::from_utf8_lossy(&attr.value).into_owned())
    })
}

/// Inside a license property, the first element carrying a URI names the license
fn capture_license_uri(pending: &mut Option<(LicenseField, Option<String>)>, e: &BytesStart<'_>) {
    if let Some((_, uri @ None)) = pending.as_mut() {
        *uri = resource_attr(e).map(|u| license_from_uri(&u));
    }
}

/// Text after the last `#` or `/`
fn last_segment(uri: &str) -> String {
    uri.rsplit(['#', '/']).next().unwrap_or(uri).to_string()
}

/// Map a license URI to a license id, keeping the SPDX sentinels recognisable
fn license_from_uri(uri: &str) -> String {
    let segment = last_segment(uri);
    match segment.to_ascii_lowercase().as_str() {
        "noassertion" => "NOASSERTION".to_string(),
        "none" => "NONE".to_string(),
        _ => segment,
    }
}

/// `http://spdx.org/rdf/terms#checksumAlgorithm_sha256` -> `SHA256`
fn algorithm_from_uri(uri: &str) -> String {
    let segment = last_segment(uri);
    segment
        .strip_prefix("checksumAlgorithm_")
        .unwrap_or(&segment)
        .to_uppercase()
}

// ============================================================================
// Raw SPDX structures and conversion to the normalized model
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    spdx_version: String,
    creation_info: Option<SpdxCreationInfo>,
    #[serde(default)]
    packages: Vec<SpdxPackage>,
    #[serde(default)]
    files: Vec<SpdxFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxCreationInfo {
    created: Option<String>,
    #[serde(default)]
    creators: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(default)]
    name: String,
    version_info: Option<String>,
    license_concluded: Option<String>,
    license_declared: Option<String>,
    #[serde(default)]
    checksums: Vec<SpdxChecksum>,
    #[serde(default)]
    external_refs: Vec<SpdxExternalRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxFile {
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    checksums: Vec<SpdxChecksum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: String,
    checksum_value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxExternalRef {
    #[serde(default)]
    reference_category: String,
    reference_type: String,
    reference_locator: String,
}

impl SpdxDocument {
    fn into_document(self) -> SbomDocument {
        let mut document = SbomDocument::new(SbomFormat::Spdx);

        document.creation_info = self.creation_info.map(|info| CreationInfo {
            creators: info.creators.iter().map(|c| Creator::from_spdx(c)).collect(),
            created: info.created.unwrap_or_default(),
        });

        for pkg in self.packages {
            document.add_package(pkg.into_package());
        }

        for file in self.files {
            document.add_file(SbomFile {
                name: file.file_name,
                checksums: file.checksums.into_iter().map(SpdxChecksum::into_checksum).collect(),
            });
        }

        document
    }
}

impl SpdxPackage {
    fn into_package(self) -> Package {
        Package {
            name: self.name,
            version: self.version_info.unwrap_or_default(),
            concluded_license: LicenseAssertionState::from_field(self.license_concluded.as_deref()),
            declared_license: LicenseAssertionState::from_field(self.license_declared.as_deref()),
            checksums: self.checksums.into_iter().map(SpdxChecksum::into_checksum).collect(),
            external_ids: self
                .external_refs
                .iter()
                .map(|r| ExternalId::from_spdx_ref(&r.reference_type, &r.reference_locator))
                .collect(),
        }
    }
}

impl SpdxChecksum {
    fn into_checksum(self) -> Checksum {
        Checksum::new(self.algorithm, self.checksum_value)
    }
}
