//! CycloneDX decoders.
//!
//! Supports CycloneDX versions 1.4, 1.5, and 1.6 in JSON and XML formats.
//! Components of type `file` become [`SbomFile`]s; every other component
//! becomes a [`Package`]. Nested components are flattened.

use crate::model::{
    Checksum, CreationInfo, Creator, CreatorKind, ExternalId, LicenseAssertionState, Package,
    SbomDocument, SbomFile, SbomFormat,
};
use crate::parsers::traits::{as_text, DocumentDecoder, ParseError};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

/// Decoder for CycloneDX JSON documents
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxJsonDecoder;

/// Decoder for CycloneDX XML documents
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxXmlDecoder;

impl DocumentDecoder for CycloneDxJsonDecoder {
    fn name(&self) -> &'static str {
        "cyclonedx-json"
    }

    fn format(&self) -> SbomFormat {
        SbomFormat::CycloneDx
    }

    fn decode(&self, content: &[u8]) -> Result<SbomDocument, ParseError> {
        let cdx: CycloneDxBom = serde_json::from_str(as_text(content)?)?;

        if let Some(bom_format) = cdx.bom_format.as_deref() {
            if bom_format != "CycloneDX" {
                return Err(ParseError::InvalidStructure(format!(
                    "bomFormat is '{bom_format}', expected 'CycloneDX'"
                )));
            }
        }

        Ok(cdx.into_document())
    }
}

impl DocumentDecoder for CycloneDxXmlDecoder {
    fn name(&self) -> &'static str {
        "cyclonedx-xml"
    }

    fn format(&self) -> SbomFormat {
        SbomFormat::CycloneDx
    }

    fn decode(&self, content: &[u8]) -> Result<SbomDocument, ParseError> {
        let text = as_text(content)?;

        // The serde reader accepts any root element, so check it here
        let root = root_element(text)?;
        if root != "bom" {
            return Err(ParseError::InvalidStructure(format!(
                "root element is <{root}>, expected <bom>"
            )));
        }

        let cdx: CycloneDxBomXml = quick_xml::de::from_str(text)?;

        let bom = CycloneDxBom {
            bom_format: Some("CycloneDX".to_string()),
            spec_version: cdx.version.unwrap_or_else(|| "1.4".to_string()),
            metadata: cdx.metadata.map(|m| CdxMetadata {
                timestamp: m.timestamp,
                tools: m.tools.map(CdxToolsXml::into_tools),
                authors: m.authors.map(|a| a.author),
            }),
            components: cdx
                .components
                .map(|c| c.component.into_iter().map(CdxComponentXml::into_component).collect()),
        };

        Ok(bom.into_document())
    }
}

/// Local name of the first element in an XML document
fn root_element(content: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => {
                return Err(ParseError::XmlError("no root element".to_string()));
            }
            Err(e) => return Err(ParseError::XmlError(e.to_string())),
            _ => {}
        }
    }
}

// ============================================================================
// Conversion to the normalized model
// ============================================================================

impl CycloneDxBom {
    fn into_document(self) -> SbomDocument {
        let mut document = SbomDocument::new(SbomFormat::CycloneDx);

        document.creation_info = self.metadata.map(|meta| {
            let mut info = CreationInfo::new(meta.timestamp.unwrap_or_default());
            for tool in meta.tools.unwrap_or_default() {
                let Some(name) = tool.name else { continue };
                let mut creator = Creator::tool(name);
                creator.version = tool.version;
                info.creators.push(creator);
            }
            for author in meta.authors.unwrap_or_default() {
                if let Some(name) = author.name {
                    info.creators.push(Creator::new(CreatorKind::Person, name));
                }
            }
            info
        });

        let mut pending = self.components.unwrap_or_default();
        pending.reverse();
        while let Some(mut component) = pending.pop() {
            let children = component.components.take().unwrap_or_default();
            pending.extend(children.into_iter().rev());

            if component.component_type == "file" {
                document.add_file(SbomFile {
                    name: component.name,
                    checksums: convert_hashes(component.hashes),
                });
            } else {
                document.add_package(component.into_package());
            }
        }

        document
    }
}

impl CdxComponent {
    fn into_package(self) -> Package {
        let license = LicenseAssertionState::first_present(
            self.licenses
                .unwrap_or_default()
                .into_iter()
                .map(CdxLicenseChoice::into_state),
        );

        let mut external_ids = Vec::new();
        if let Some(purl) = self.purl.filter(|p| !p.trim().is_empty()) {
            external_ids.push(ExternalId::Purl(purl));
        }
        if let Some(cpe) = self.cpe.filter(|c| !c.trim().is_empty()) {
            external_ids.push(ExternalId::Cpe(cpe));
        }

        Package {
            name: self.name,
            version: self.version.unwrap_or_default(),
            concluded_license: LicenseAssertionState::Absent,
            declared_license: license,
            checksums: convert_hashes(self.hashes),
            external_ids,
        }
    }
}

impl CdxLicenseChoice {
    fn into_state(self) -> LicenseAssertionState {
        let from_license = self
            .license
            .and_then(|l| l.id.or(l.name))
            .map(|value| LicenseAssertionState::from_field(Some(&value)));
        let from_expression = self
            .expression
            .map(|value| LicenseAssertionState::from_field(Some(&value)));
        LicenseAssertionState::first_present(from_license.into_iter().chain(from_expression))
    }
}

fn convert_hashes(hashes: Option<Vec<CdxHash>>) -> Vec<Checksum> {
    hashes
        .unwrap_or_default()
        .into_iter()
        .filter(|h| !h.content.trim().is_empty())
        .map(|h| Checksum::new(h.alg, h.content))
        .collect()
}

// ============================================================================
// CycloneDX JSON structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    bom_format: Option<String>,
    #[allow(dead_code)]
    spec_version: String,
    metadata: Option<CdxMetadata>,
    components: Option<Vec<CdxComponent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxMetadata {
    timestamp: Option<String>,
    /// Array of tools (1.4) or an object with components and services (1.5+)
    #[serde(default, deserialize_with = "deserialize_tools")]
    tools: Option<Vec<CdxTool>>,
    authors: Option<Vec<CdxAuthor>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxToolsObject {
    components: Option<Vec<CdxTool>>,
    services: Option<Vec<CdxTool>>,
}

#[derive(Debug, Deserialize)]
struct CdxAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxTool {
    name: Option<String>,
    version: Option<String>,
}

fn deserialize_tools<'de, D>(deserializer: D) -> Result<Option<Vec<CdxTool>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ToolsVisitor;

    impl<'de> Visitor<'de> for ToolsVisitor {
        type Value = Option<Vec<CdxTool>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of tools or an object with components/services")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            // CycloneDX 1.4: array of tools
            let mut tools = Vec::new();
            while let Some(tool) = seq.next_element::<CdxTool>()? {
                tools.push(tool);
            }
            Ok(Some(tools))
        }

        fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            // CycloneDX 1.5+: object with components/services
            let object: CdxToolsObject =
                Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;

            let tools: Vec<CdxTool> = object
                .components
                .into_iter()
                .chain(object.services)
                .flatten()
                .collect();

            Ok(Some(tools))
        }
    }

    deserializer.deserialize_any(ToolsVisitor)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(rename = "type", default)]
    component_type: String,
    #[serde(default)]
    name: String,
    version: Option<String>,
    purl: Option<String>,
    cpe: Option<String>,
    licenses: Option<Vec<CdxLicenseChoice>>,
    hashes: Option<Vec<CdxHash>>,
    components: Option<Vec<CdxComponent>>,
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxHash {
    alg: String,
    content: String,
}

// ============================================================================
// CycloneDX XML structures
// XML wraps collections in a parent element (<components><component>...)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename = "bom")]
struct CycloneDxBomXml {
    /// Schema version attribute, when present
    #[serde(rename = "@version")]
    version: Option<String>,
    metadata: Option<CdxMetadataXml>,
    components: Option<CdxComponentsXml>,
}

#[derive(Debug, Deserialize)]
struct CdxMetadataXml {
    timestamp: Option<String>,
    tools: Option<CdxToolsXml>,
    authors: Option<CdxAuthorsXml>,
}

/// `<tool>` children (1.4), or `<components>` and `<services>` (1.5+)
#[derive(Debug, Deserialize)]
struct CdxToolsXml {
    #[serde(default)]
    tool: Vec<CdxTool>,
    components: Option<CdxToolComponentsXml>,
    services: Option<CdxToolServicesXml>,
}

impl CdxToolsXml {
    fn into_tools(self) -> Vec<CdxTool> {
        let mut tools = self.tool;
        if let Some(components) = self.components {
            tools.extend(components.component);
        }
        if let Some(services) = self.services {
            tools.extend(services.service);
        }
        tools
    }
}

#[derive(Debug, Deserialize)]
struct CdxToolComponentsXml {
    #[serde(default)]
    component: Vec<CdxTool>,
}

#[derive(Debug, Deserialize)]
struct CdxToolServicesXml {
    #[serde(default)]
    service: Vec<CdxTool>,
}

#[derive(Debug, Deserialize)]
struct CdxAuthorsXml {
    #[serde(default)]
    author: Vec<CdxAuthor>,
}

#[derive(Debug, Deserialize)]
struct CdxComponentsXml {
    #[serde(default)]
    component: Vec<CdxComponentXml>,
}

#[derive(Debug, Deserialize)]
struct CdxComponentXml {
    #[serde(rename = "@type", default)]
    component_type: String,
    #[serde(default)]
    name: String,
    version: Option<String>,
    purl: Option<String>,
    cpe: Option<String>,
    licenses: Option<CdxLicensesXml>,
    hashes: Option<CdxHashesXml>,
    components: Option<CdxComponentsXml>,
}

impl CdxComponentXml {
    fn into_component(self) -> CdxComponent {
        let licenses = self.licenses.map(|l| {
            l.license
                .into_iter()
                .map(|license| CdxLicenseChoice {
                    license: Some(license),
                    expression: None,
                })
                .chain(l.expression.into_iter().map(|expression| CdxLicenseChoice {
                    license: None,
                    expression: Some(expression),
                }))
                .collect()
        });

        CdxComponent {
            component_type: self.component_type,
            name: self.name,
            version: self.version,
            purl: self.purl,
            cpe: self.cpe,
            licenses,
            hashes: self.hashes.map(|h| {
                h.hash
                    .into_iter()
                    .map(|hash| CdxHash {
                        alg: hash.alg,
                        content: hash.content,
                    })
                    .collect()
            }),
            components: self
                .components
                .map(|c| c.component.into_iter().map(Self::into_component).collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CdxLicensesXml {
    #[serde(default)]
    license: Vec<CdxLicense>,
    #[serde(default)]
    expression: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CdxHashesXml {
    #[serde(default)]
    hash: Vec<CdxHashXml>,
}

#[derive(Debug, Deserialize)]
struct CdxHashXml {
    #[serde(rename = "@alg")]
    alg: String,
    #[serde(rename = "$text", default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_BOM: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "version": 1,
        "metadata": {
            "timestamp": "2024-01-15T10:00:00Z",
            "tools": [ { "vendor": "CycloneDX", "name": "cdxgen", "version": "10.2.1" } ],
            "authors": [ { "name": "Jane Doe" } ]
        },
        "components": [
            {
                "type": "library",
                "name": "lodash",
                "version": "4.17.21",
                "purl": "pkg:npm/lodash@4.17.21",
                "licenses": [ { "license": { "id": "MIT" } } ],
                "hashes": [ { "alg": "SHA-256", "content": "abc" } ],
                "components": [
                    { "type": "library", "name": "lodash.get", "cpe": "cpe:2.3:a:lodash:get:*:*:*:*:*:*:*:*" }
                ]
            },
            { "type": "file", "name": "README.md", "hashes": [ { "alg": "SHA-1", "content": "def" } ] },
            { "type": "library", "name": "left-pad", "licenses": [ { "expression": "MIT OR Apache-2.0" } ] }
        ]
    }"#;

    #[test]
    fn test_json() {
        let doc = CycloneDxJsonDecoder.decode(JSON_BOM.as_bytes()).unwrap();
        assert_eq!(doc.format, SbomFormat::CycloneDx);

        let names: Vec<_> = doc.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["lodash", "lodash.get", "left-pad"]);
        assert_eq!(doc.files.len(), 1);
        assert!(doc.files[0].has_checksum());

        let lodash = &doc.packages[0];
        assert!(lodash.has_license() && lodash.has_purl() && lodash.has_checksum());
        assert!(doc.packages[1].has_cpe());
        assert_eq!(
            doc.packages[2].effective_license().expression(),
            Some("MIT OR Apache-2.0")
        );

        let info = doc.creation_info.unwrap();
        assert_eq!(info.created, "2024-01-15T10:00:00Z");
        let tool = info.tools().next().unwrap();
        assert_eq!(tool.identifier(), "cdxgen 10.2.1");
        assert_eq!(info.creators.len(), 2);
    }

    #[test]
    fn test_json_tools_object_form() {
        let json = r#"{
            "bomFormat": "CycloneDX",
            "specVersion": "1.6",
            "metadata": {
                "tools": { "components": [ { "type": "application", "name": "syft", "version": "1.0.0" } ] }
            }
        }"#;
        let doc = CycloneDxJsonDecoder.decode(json.as_bytes()).unwrap();
        let info = doc.creation_info.unwrap();
        assert_eq!(info.tools().count(), 1);
        assert!(!info.has_timestamp());
    }

    #[test]
    fn test_json_without_metadata_has_no_creation_info() {
        let json = r#"{ "bomFormat": "CycloneDX", "specVersion": "1.4", "components": [] }"#;
        let doc = CycloneDxJsonDecoder.decode(json.as_bytes()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_json_rejects_spdx() {
        let err = CycloneDxJsonDecoder
            .decode(br#"{ "spdxVersion": "SPDX-2.3", "packages": [] }"#)
            .unwrap_err();
        assert!(err.to_string().contains("specVersion"));

        let err = CycloneDxJsonDecoder
            .decode(br#"{ "bomFormat": "Other", "specVersion": "1.0" }"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure(_)));
    }

    #[test]
    fn test_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.4" version="1">
  <metadata>
    <timestamp>2024-01-15T10:00:00Z</timestamp>
    <tools>
      <tool><vendor>Anchore</vendor><name>syft</name><version>0.98.0</version></tool>
    </tools>
  </metadata>
  <components>
    <component type="library">
      <name>serde</name>
      <version>1.0.195</version>
      <licenses><license><id>MIT</id></license></licenses>
      <hashes><hash alg="SHA-256">0123abcd</hash></hashes>
      <purl>pkg:cargo/serde@1.0.195</purl>
    </component>
    <component type="file">
      <name>Cargo.lock</name>
    </component>
  </components>
</bom>"#;
        let doc = CycloneDxXmlDecoder.decode(xml.as_bytes()).unwrap();
        assert_eq!(doc.packages.len(), 1);
        assert_eq!(doc.files.len(), 1);

        let serde_pkg = &doc.packages[0];
        assert_eq!(serde_pkg.version, "1.0.195");
        assert!(serde_pkg.has_license());
        assert_eq!(serde_pkg.checksums[0].value, "0123abcd");
        assert!(serde_pkg.has_purl());
        assert!(!doc.files[0].has_checksum());

        let info = doc.creation_info.unwrap();
        assert_eq!(info.tools().next().unwrap().identifier(), "syft 0.98.0");
    }

    fn xml_with_tools(tools: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.5" version="1">
  <metadata>
    <timestamp>2024-03-01T08:30:00Z</timestamp>
    <tools>{tools}</tools>
  </metadata>
  <components>
    <component type="library"><name>tokio</name><version>1.36.0</version></component>
  </components>
</bom>"#
        )
    }

    #[test]
    fn test_xml_tools_components_form() {
        let xml = xml_with_tools(
            r#"<components>
        <component type="application"><name>cdxgen</name><version>10.2.1</version></component>
        <component type="application"><name>cargo-cyclonedx</name><version>0.5.0</version></component>
      </components>"#,
        );
        let doc = CycloneDxXmlDecoder.decode(xml.as_bytes()).unwrap();

        let info = doc.creation_info.unwrap();
        let ids: Vec<String> = info.tools().map(|t| t.identifier()).collect();
        assert_eq!(ids, ["cdxgen 10.2.1", "cargo-cyclonedx 0.5.0"]);
    }

    #[test]
    fn test_xml_tools_services_form() {
        let xml = xml_with_tools(
            r#"<services>
        <service bom-ref="svc-1"><name>scanner-svc</name><version>2.1</version></service>
      </services>"#,
        );
        let doc = CycloneDxXmlDecoder.decode(xml.as_bytes()).unwrap();

        let info = doc.creation_info.unwrap();
        assert_eq!(info.tools().count(), 1);
        assert_eq!(info.tools().next().unwrap().identifier(), "scanner-svc 2.1");
    }

    #[test]
    fn test_xml_rejects_other_roots() {
        let err = CycloneDxXmlDecoder
            .decode(br#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure(_)));

        let err = CycloneDxXmlDecoder.decode(b"{}").unwrap_err();
        assert!(matches!(err, ParseError::XmlError(_)));
    }
}
