//! In-memory OPC package: parts, content types and relationships

use super::constants::{content_type as ct, ns};
use crate::models::DeckError;
use crate::utils::xml::{attr_value, escape_xml};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// All parts of a zip package, kept in their original order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

/// Largest buffer reserved up front for one part.
const MAX_PREALLOC: usize = 1 << 20;

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file entry of a zip archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeckError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            // Declared sizes are untrusted; the buffer grows as data arrives
            let mut content = Vec::with_capacity((file.size() as usize).min(MAX_PREALLOC));
            file.read_to_end(&mut content)?;
            parts.push((name, content));
        }

        Ok(Self { parts })
    }

    /// Serialize to zip bytes. The content types part is written first and
    /// timestamps are fixed, so equal packages give equal bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DeckError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let ordered = self
            .parts
            .iter()
            .filter(|(name, _)| name == CONTENT_TYPES_PART)
            .chain(self.parts.iter().filter(|(name, _)| name != CONTENT_TYPES_PART));

        for (name, content) in ordered {
            debug!(part = %name, bytes = content.len(), "writing part");
            zip.start_file(name.as_str(), options)?;
            zip.write_all(content)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_slice())
    }

    /// A part decoded as UTF-8 XML text.
    pub fn xml(&self, name: &str) -> Result<&str, DeckError> {
        let bytes = self
            .part(name)
            .ok_or_else(|| DeckError::PartNotFound(name.to_string()))?;
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        std::str::from_utf8(bytes).map_err(|e| DeckError::xml(name, e))
    }

    /// Insert a part, replacing any existing part of the same name.
    pub fn set_part(&mut self, name: &str, content: Vec<u8>) {
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = content,
            None => self.parts.push((name.to_string(), content)),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// First free `prefix{N}suffix` part name, counting from 1.
    pub fn next_part_name(&self, prefix: &str, suffix: &str) -> (u32, String) {
        (1..)
            .map(|n| (n, format!("{}{}{}", prefix, n, suffix)))
            .find(|(_, name)| !self.contains(name))
            .unwrap_or_default()
    }

    /// Content type of a part: its override if present, else the default
    /// for its extension.
    pub fn content_type(&self, part: &str) -> Result<Option<String>, DeckError> {
        let xml = self.xml(CONTENT_TYPES_PART)?;
        let part_name = format!("/{}", part);
        let extension = part.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();

        let mut reader = Reader::from_str(xml);
        let mut default = None;
        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"Override" => {
                        let name = attr_value(&e, b"PartName").unwrap_or_default();
                        if name.eq_ignore_ascii_case(&part_name) {
                            return Ok(attr_value(&e, b"ContentType"));
                        }
                    }
                    b"Default" => {
                        let ext = attr_value(&e, b"Extension").unwrap_or_default();
                        if ext.eq_ignore_ascii_case(&extension) {
                            default = attr_value(&e, b"ContentType");
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(DeckError::xml(CONTENT_TYPES_PART, e)),
                _ => {}
            }
        }

        Ok(default)
    }

    pub fn add_override(&mut self, part: &str, content_type: &str) -> Result<(), DeckError> {
        let fragment = format!(
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            escape_xml(part),
            content_type
        );
        self.append_to_content_types(&fragment)
    }

    /// Register a default content type for an extension unless one exists.
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) -> Result<(), DeckError> {
        let has_default = {
            let xml = self.xml(CONTENT_TYPES_PART)?;
            let mut reader = Reader::from_str(xml);
            let mut found = false;
            loop {
                match reader.read_event() {
                    Ok(Event::Empty(e)) | Ok(Event::Start(e))
                        if e.local_name().as_ref() == b"Default" =>
                    {
                        let ext = attr_value(&e, b"Extension").unwrap_or_default();
                        if ext.eq_ignore_ascii_case(extension) {
                            found = true;
                            break;
                        }
                    }
                    Ok(Event::Eof) => break,
                    Err(e) => return Err(DeckError::xml(CONTENT_TYPES_PART, e)),
                    _ => {}
                }
            }
            found
        };
        if has_default {
            return Ok(());
        }

        // Defaults must precede overrides in the schema
        let fragment = format!(
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            extension, content_type
        );
        let xml = self.xml(CONTENT_TYPES_PART)?.to_string();
        let updated = match xml.find("<Override") {
            Some(pos) => format!("{}{}{}", &xml[..pos], fragment, &xml[pos..]),
            None => insert_before_close(&xml, "Types", &fragment)
                .ok_or_else(|| DeckError::xml(CONTENT_TYPES_PART, "no <Types> element"))?,
        };
        self.set_part(CONTENT_TYPES_PART, updated.into_bytes());
        Ok(())
    }

    fn append_to_content_types(&mut self, fragment: &str) -> Result<(), DeckError> {
        let xml = self.xml(CONTENT_TYPES_PART)?;
        let updated = insert_before_close(xml, "Types", fragment)
            .ok_or_else(|| DeckError::xml(CONTENT_TYPES_PART, "no <Types> element"))?;
        self.set_part(CONTENT_TYPES_PART, updated.into_bytes());
        Ok(())
    }

    /// Relationships whose source is `source` (`""` for the package itself).
    pub fn relationships(&self, source: &str) -> Result<Vec<Relationship>, DeckError> {
        let rels_name = rels_part_name(source);
        if !self.contains(&rels_name) {
            return Ok(Vec::new());
        }
        parse_relationships(&rels_name, self.xml(&rels_name)?)
    }

    /// Resolved part name of the first relationship of `rel_type`.
    pub fn related_part(&self, source: &str, rel_type: &str) -> Result<Option<String>, DeckError> {
        Ok(self
            .relationships(source)?
            .into_iter()
            .find(|rel| rel.rel_type == rel_type && !rel.external)
            .map(|rel| resolve_target(source, &rel.target)))
    }

    /// Add an internal relationship from `source` to the part `target_part`
    /// and return its new id.
    pub fn add_relationship(
        &mut self,
        source: &str,
        rel_type: &str,
        target_part: &str,
    ) -> Result<String, DeckError> {
        let rels_name = rels_part_name(source);
        let existing = self.relationships(source)?;
        let next = existing
            .iter()
            .filter_map(|rel| rel.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{}", next);

        let fragment = format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id,
            rel_type,
            escape_xml(&relative_target(source, target_part))
        );

        let updated = if self.contains(&rels_name) {
            let xml = self.xml(&rels_name)?;
            insert_before_close(xml, "Relationships", &fragment)
                .ok_or_else(|| DeckError::xml(&rels_name, "no <Relationships> element"))?
        } else {
            relationships_xml(&fragment)
        };

        self.set_part(&rels_name, updated.into_bytes());
        Ok(id)
    }
}

/// Parse the entries of a `.rels` part.
pub fn parse_relationships(part: &str, xml: &str) -> Result<Vec<Relationship>, DeckError> {
    let mut reader = Reader::from_str(xml);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                rels.push(Relationship {
                    id: attr_value(&e, b"Id").unwrap_or_default(),
                    rel_type: attr_value(&e, b"Type").unwrap_or_default(),
                    target: attr_value(&e, b"Target").unwrap_or_default(),
                    external: attr_value(&e, b"TargetMode").as_deref() == Some("External"),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DeckError::xml(part, e)),
            _ => {}
        }
    }

    Ok(rels)
}

/// A complete `.rels` document holding `entries`.
pub fn relationships_xml(entries: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">{}</Relationships>"#,
        ns::PACKAGE_REL,
        entries
    )
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_part_name(source: &str) -> String {
    match source.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None if source.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", source),
    }
}

/// Resolve a relationship target against the directory of its source part.
pub fn resolve_target(source: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Relative reference from `source` to `target_part`, both package part names.
pub fn relative_target(source: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = match source.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();
    // Never consume the file name itself
    let common = common.min(target.len().saturating_sub(1));

    let mut parts: Vec<&str> = vec![".."; source_dir.len() - common];
    parts.extend(&target[common..]);
    parts.join("/")
}

/// Insert `fragment` right before the closing tag of the root `element`,
/// expanding a self-closing root if needed.
pub fn insert_before_close(xml: &str, element: &str, fragment: &str) -> Option<String> {
    let closing = format!("</{}>", element);
    if let Some(pos) = xml.rfind(&closing) {
        return Some(format!("{}{}{}", &xml[..pos], fragment, &xml[pos..]));
    }

    let open = xml.rfind(&format!("<{}", element))?;
    let end = open + xml[open..].find("/>")?;
    Some(format!(
        "{}>{}{}{}",
        &xml[..end],
        fragment,
        closing,
        &xml[end + 2..]
    ))
}

/// Whether a content type marks a presentation main part.
pub fn is_presentation_type(content_type: &str) -> bool {
    content_type == ct::PRESENTATION_MAIN
        || content_type == ct::PRES_MACRO_MAIN
        || content_type == ct::TEMPLATE_MAIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::constants::rel_type;

    #[test]
    fn test_rels_part_name() {
        assert_eq!(rels_part_name(""), "_rels/.rels");
        assert_eq!(rels_part_name("ppt/presentation.xml"), "ppt/_rels/presentation.xml.rels");
        assert_eq!(
            rels_part_name("ppt/slides/slide3.xml"),
            "ppt/slides/_rels/slide3.xml.rels"
        );
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(resolve_target("ppt/presentation.xml", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
        assert_eq!(resolve_target("ppt/slides/slide1.xml", "/ppt/charts/chart1.xml"), "ppt/charts/chart1.xml");
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(
            relative_target("ppt/slides/slide1.xml", "ppt/slideLayouts/slideLayout2.xml"),
            "../slideLayouts/slideLayout2.xml"
        );
        assert_eq!(relative_target("ppt/presentation.xml", "ppt/slides/slide4.xml"), "slides/slide4.xml");
        assert_eq!(relative_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
        assert_eq!(
            relative_target("ppt/charts/chart1.xml", "ppt/embeddings/Microsoft_Excel_Sheet1.xlsx"),
            "../embeddings/Microsoft_Excel_Sheet1.xlsx"
        );
    }

    #[test]
    fn test_insert_before_close() {
        assert_eq!(
            insert_before_close("<a><b/></a>", "a", "<c/>").as_deref(),
            Some("<a><b/><c/></a>")
        );
        assert_eq!(
            insert_before_close(r#"<a x="1"/>"#, "a", "<c/>").as_deref(),
            Some(r#"<a x="1"><c/></a>"#)
        );
        assert_eq!(insert_before_close("<b/>", "a", "<c/>"), None);
    }

    #[test]
    fn test_relationships_roundtrip_through_package() {
        let mut pkg = Package::new();
        pkg.set_part(
            CONTENT_TYPES_PART,
            format!(
                r#"<?xml version="1.0"?><Types xmlns="{}"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
                ns::CONTENT_TYPES
            )
            .into_bytes(),
        );

        let first = pkg
            .add_relationship("ppt/slides/slide1.xml", rel_type::SLIDE_LAYOUT, "ppt/slideLayouts/slideLayout1.xml")
            .unwrap();
        let second = pkg
            .add_relationship("ppt/slides/slide1.xml", rel_type::CHART, "ppt/charts/chart1.xml")
            .unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("rId1", "rId2"));

        let rels = pkg.relationships("ppt/slides/slide1.xml").unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[1].target, "../charts/chart1.xml");
        assert_eq!(
            pkg.related_part("ppt/slides/slide1.xml", rel_type::CHART).unwrap().as_deref(),
            Some("ppt/charts/chart1.xml")
        );

        pkg.add_override("ppt/charts/chart1.xml", ct::CHART).unwrap();
        pkg.ensure_default("xlsx", ct::XLSX).unwrap();
        pkg.ensure_default("xlsx", ct::XLSX).unwrap();
        assert_eq!(
            pkg.content_type("ppt/charts/chart1.xml").unwrap().as_deref(),
            Some(ct::CHART)
        );
        assert_eq!(
            pkg.content_type("ppt/embeddings/Microsoft_Excel_Sheet1.xlsx").unwrap().as_deref(),
            Some(ct::XLSX)
        );
        assert_eq!(pkg.xml(CONTENT_TYPES_PART).unwrap().matches("Extension=\"xlsx\"").count(), 1);

        let bytes = pkg.to_bytes().unwrap();
        let reread = Package::from_bytes(&bytes).unwrap();
        assert_eq!(reread.part_names().next(), Some(CONTENT_TYPES_PART));
        assert_eq!(reread.len(), pkg.len());
    }

    #[test]
    fn test_next_part_name() {
        let mut pkg = Package::new();
        pkg.set_part("ppt/slides/slide1.xml", Vec::new());
        pkg.set_part("ppt/slides/slide2.xml", Vec::new());
        assert_eq!(
            pkg.next_part_name("ppt/slides/slide", ".xml"),
            (3, "ppt/slides/slide3.xml".to_string())
        );
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(Package::from_bytes(b"not a zip"), Err(DeckError::Zip(_))));
    }

    #[test]
    fn test_oversized_declared_length_is_not_trusted() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("a.xml", options).unwrap();
        zip.write_all(b"<a/>").unwrap();
        let mut bytes = zip.finish().unwrap().into_inner();

        // Claim a ~4 GiB uncompressed size in both headers
        let huge = 0xFFFF_FFF0u32.to_le_bytes();
        let mut i = 0;
        while i + 4 <= bytes.len() {
            let signature: [u8; 4] = bytes[i..i + 4].try_into().unwrap();
            match signature {
                [0x50, 0x4b, 0x03, 0x04] => bytes[i + 22..i + 26].copy_from_slice(&huge),
                [0x50, 0x4b, 0x01, 0x02] => bytes[i + 24..i + 28].copy_from_slice(&huge),
                _ => {}
            }
            i += 1;
        }

        match Package::from_bytes(&bytes) {
            Ok(pkg) => assert_eq!(pkg.part("a.xml"), Some(b"<a/>".as_slice())),
            Err(err) => assert!(matches!(err, DeckError::Zip(_) | DeckError::Io(_)), "got {err:?}"),
        }
    }
}
