//! Slide layouts and their placeholders, read from a template package

use super::constants::rel_type;
use super::package::{resolve_target, Package};
use crate::models::DeckError;
use crate::utils::xml::attr_value;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Placeholder kinds that are never copied onto new slides.
const SKIPPED_KINDS: &[&str] = &["dt", "ftr", "sldNum"];

/// Placeholder index of the body slot on a content layout.
pub const BODY_INDEX: u32 = 1;

/// One `<p:ph>` shape on a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlaceholder {
    pub id: u32,
    pub name: String,
    pub kind: Option<String>,
    pub idx: Option<u32>,
}

impl LayoutPlaceholder {
    pub fn is_title(&self) -> bool {
        matches!(self.kind.as_deref(), Some("title") | Some("ctrTitle"))
    }

    pub fn is_body(&self) -> bool {
        self.idx == Some(BODY_INDEX)
    }

    /// Whether new slides inherit this placeholder.
    pub fn is_inherited(&self) -> bool {
        !matches!(self.kind.as_deref(), Some(kind) if SKIPPED_KINDS.contains(&kind))
    }
}

#[derive(Debug, Clone)]
pub struct SlideLayout {
    pub part: String,
    pub name: Option<String>,
    pub placeholders: Vec<LayoutPlaceholder>,
}

impl SlideLayout {
    pub fn parse(part: &str, xml: &str) -> Result<Self, DeckError> {
        let mut reader = Reader::from_str(xml);
        let mut placeholders = Vec::new();
        let mut name = None;
        let mut current: Option<(Option<(u32, String)>, Option<LayoutPlaceholder>)> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"cSld" => name = attr_value(&e, b"name"),
                    b"sp" => current = Some((None, None)),
                    _ => visit_shape_child(&e, &mut current),
                },
                Ok(Event::Empty(e)) => visit_shape_child(&e, &mut current),
                Ok(Event::End(e)) if e.local_name().as_ref() == b"sp" => {
                    if let Some((Some((id, shape_name)), Some(mut ph))) = current.take() {
                        ph.id = id;
                        ph.name = shape_name;
                        placeholders.push(ph);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DeckError::xml(part, e)),
                _ => {}
            }
        }

        Ok(Self {
            part: part.to_string(),
            name,
            placeholders,
        })
    }

    pub fn title_placeholder(&self) -> Option<&LayoutPlaceholder> {
        self.placeholders.iter().find(|ph| ph.is_title())
    }

    pub fn body_placeholder(&self) -> Option<&LayoutPlaceholder> {
        self.placeholders.iter().find(|ph| ph.is_body())
    }

    pub fn inherited_placeholders(&self) -> impl Iterator<Item = &LayoutPlaceholder> {
        self.placeholders.iter().filter(|ph| ph.is_inherited())
    }

    /// Highest shape id used by inherited placeholders.
    pub fn max_shape_id(&self) -> u32 {
        self.inherited_placeholders().map(|ph| ph.id).max().unwrap_or(1)
    }

    pub(crate) fn require_title(&self) -> Result<&LayoutPlaceholder, DeckError> {
        self.title_placeholder()
            .ok_or_else(|| self.missing("title"))
    }

    pub(crate) fn require_body(&self) -> Result<&LayoutPlaceholder, DeckError> {
        self.body_placeholder()
            .ok_or_else(|| self.missing("body"))
    }

    fn missing(&self, placeholder: &str) -> DeckError {
        DeckError::MissingPlaceholder {
            layout: self.name.clone().unwrap_or_else(|| self.part.clone()),
            placeholder: placeholder.to_string(),
        }
    }
}

fn visit_shape_child(
    e: &BytesStart<'_>,
    current: &mut Option<(Option<(u32, String)>, Option<LayoutPlaceholder>)>,
) {
    let Some((shape, placeholder)) = current.as_mut() else {
        return;
    };
    match e.local_name().as_ref() {
        b"cNvPr" => {
            let id = attr_value(e, b"id")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default();
            *shape = Some((id, attr_value(e, b"name").unwrap_or_default()));
        }
        b"ph" => {
            *placeholder = Some(LayoutPlaceholder {
                id: 0,
                name: String::new(),
                kind: attr_value(e, b"type"),
                idx: attr_value(e, b"idx").and_then(|v| v.parse().ok()),
            });
        }
        _ => {}
    }
}

/// Value of the first `r:id`-style attribute (any prefix, local name `id`).
pub(crate) fn rel_id(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id")
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Relationship ids of every `element` in document order.
pub(crate) fn list_rel_ids(part: &str, xml: &str, element: &[u8]) -> Result<Vec<String>, DeckError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == element => {
                if let Some(id) = rel_id(&e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DeckError::xml(part, e)),
            _ => {}
        }
    }

    Ok(ids)
}

/// Map relationship id to resolved part name for `source`.
pub(crate) fn rel_targets(pkg: &Package, source: &str) -> Result<HashMap<String, String>, DeckError> {
    Ok(pkg
        .relationships(source)?
        .into_iter()
        .filter(|rel| !rel.external)
        .map(|rel| (rel.id, resolve_target(source, &rel.target)))
        .collect())
}

/// Layouts of the first slide master, in the master's layout-list order.
pub fn load_layouts(pkg: &Package, main_part: &str) -> Result<Vec<SlideLayout>, DeckError> {
    let presentation = pkg.xml(main_part)?;
    let master_ids = list_rel_ids(main_part, presentation, b"sldMasterId")?;
    let pres_targets = rel_targets(pkg, main_part)?;

    let master_part = match master_ids.first() {
        Some(id) => pres_targets
            .get(id)
            .cloned()
            .ok_or_else(|| DeckError::PartNotFound(format!("{} relationship {}", main_part, id)))?,
        None => pkg
            .related_part(main_part, rel_type::SLIDE_MASTER)?
            .ok_or_else(|| DeckError::PartNotFound("slide master".to_string()))?,
    };

    let master_xml = pkg.xml(&master_part)?;
    let layout_ids = list_rel_ids(&master_part, master_xml, b"sldLayoutId")?;
    let master_targets = rel_targets(pkg, &master_part)?;

    layout_ids
        .iter()
        .map(|id| {
            let part = master_targets.get(id).ok_or_else(|| {
                DeckError::PartNotFound(format!("{} relationship {}", master_part, id))
            })?;
            SlideLayout::parse(part, pkg.xml(part)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld name="Title and Content"><p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="4" name="Date Placeholder 3"/><p:cNvSpPr/><p:nvPr><p:ph type="dt" sz="half" idx="10"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="5" name="Footer Placeholder 4"/><p:cNvSpPr/><p:nvPr><p:ph type="ftr" sz="quarter" idx="11"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="7" name="Logo"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>
</p:spTree></p:cSld></p:sldLayout>"#;

    #[test]
    fn test_parse_layout_placeholders() {
        let layout = SlideLayout::parse("ppt/slideLayouts/slideLayout2.xml", LAYOUT).unwrap();
        assert_eq!(layout.name.as_deref(), Some("Title and Content"));
        assert_eq!(layout.placeholders.len(), 4);

        let title = layout.title_placeholder().unwrap();
        assert_eq!((title.id, title.name.as_str()), (2, "Title 1"));
        assert_eq!(layout.body_placeholder().unwrap().id, 3);

        let inherited: Vec<u32> = layout.inherited_placeholders().map(|ph| ph.id).collect();
        assert_eq!(inherited, vec![2, 3]);
        assert_eq!(layout.max_shape_id(), 3);
    }

    #[test]
    fn test_missing_body_placeholder() {
        let xml = LAYOUT.replace(r#"<p:ph idx="1"/>"#, r#"<p:ph type="pic" idx="2"/>"#);
        let layout = SlideLayout::parse("ppt/slideLayouts/slideLayout2.xml", &xml).unwrap();
        match layout.require_body() {
            Err(DeckError::MissingPlaceholder { layout, placeholder }) => {
                assert_eq!(layout, "Title and Content");
                assert_eq!(placeholder, "body");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_list_rel_ids() {
        let xml = r#"<p:sldMaster xmlns:p="p" xmlns:r="r"><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst></p:sldMaster>"#;
        assert_eq!(
            list_rel_ids("master", xml, b"sldLayoutId").unwrap(),
            vec!["rId1", "rId2"]
        );
    }

    #[test]
    fn test_malformed_layout() {
        let err = SlideLayout::parse("layout.xml", "<p:sp><p:nvSpPr></p:sp>").unwrap_err();
        assert!(matches!(err, DeckError::Xml { .. }));
    }
}
