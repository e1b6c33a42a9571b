//! Slide part XML

use super::constants::ns;
use super::template::{LayoutPlaceholder, SlideLayout};
use crate::utils::inches;
use crate::utils::xml::escape_xml;
use std::fmt::Write;

/// Chart frame position and size, in inches.
pub const CHART_LEFT: f64 = 0.5;
pub const CHART_TOP: f64 = 2.5;
pub const CHART_WIDTH: f64 = 8.0;
pub const CHART_HEIGHT: f64 = 3.5;

/// Text destined for a new slide's placeholders.
#[derive(Debug, Clone, Copy)]
pub struct SlideText<'a> {
    pub title: &'a str,
    pub body: Option<&'a [String]>,
}

/// Render a slide that inherits every placeholder of `layout`, filling the
/// title and body slots and optionally adding a chart frame bound to
/// `chart_rel`.
pub fn slide_xml(layout: &SlideLayout, text: SlideText<'_>, chart_rel: Option<&str>) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        ns::DML,
        ns::OFFICE_REL,
        ns::PML
    );
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(concat!(
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
        r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
    ));

    for placeholder in layout.inherited_placeholders() {
        let paragraphs: Vec<&str> = if placeholder.is_title() {
            vec![text.title]
        } else if placeholder.is_body() {
            text.body
                .map(|lines| lines.iter().map(String::as_str).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        write_placeholder(&mut xml, placeholder, &paragraphs);
    }

    if let Some(rel) = chart_rel {
        write_chart_frame(&mut xml, layout.max_shape_id() + 1, rel);
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

fn write_placeholder(xml: &mut String, placeholder: &LayoutPlaceholder, paragraphs: &[&str]) {
    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}"/>"#,
        placeholder.id,
        escape_xml(&placeholder.name)
    );
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#);
    if let Some(kind) = &placeholder.kind {
        let _ = write!(xml, r#" type="{}""#, escape_xml(kind));
    }
    if let Some(idx) = placeholder.idx {
        let _ = write!(xml, r#" idx="{}""#, idx);
    }
    xml.push_str("/></p:nvPr></p:nvSpPr><p:spPr/>");

    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    if paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for text in paragraphs {
        let _ = write!(
            xml,
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            escape_xml(text)
        );
    }
    xml.push_str("</p:txBody></p:sp>");
}

fn write_chart_frame(xml: &mut String, shape_id: u32, rel: &str) {
    xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
    let _ = write!(xml, r#"<p:cNvPr id="{shape_id}" name="Chart {shape_id}"/>"#);
    xml.push_str(r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/>"#);
    xml.push_str("</p:nvGraphicFramePr>");
    let _ = write!(
        xml,
        r#"<p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm>"#,
        inches(CHART_LEFT),
        inches(CHART_TOP),
        inches(CHART_WIDTH),
        inches(CHART_HEIGHT)
    );
    let _ = write!(
        xml,
        r#"<a:graphic><a:graphicData uri="{chart}"><c:chart xmlns:c="{chart}" r:id="{rel}"/></a:graphicData></a:graphic>"#,
        chart = ns::CHART
    );
    xml.push_str("</p:graphicFrame>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SlideLayout {
        SlideLayout {
            part: "ppt/slideLayouts/slideLayout2.xml".into(),
            name: Some("Title and Content".into()),
            placeholders: vec![
                LayoutPlaceholder {
                    id: 2,
                    name: "Title 1".into(),
                    kind: Some("title".into()),
                    idx: None,
                },
                LayoutPlaceholder {
                    id: 3,
                    name: "Content Placeholder 2".into(),
                    kind: None,
                    idx: Some(1),
                },
                LayoutPlaceholder {
                    id: 4,
                    name: "Slide Number Placeholder 3".into(),
                    kind: Some("sldNum".into()),
                    idx: Some(12),
                },
            ],
        }
    }

    #[test]
    fn test_fills_title_and_body() {
        let bullets = vec!["one".to_string(), "two & three".to_string()];
        let xml = slide_xml(
            &layout(),
            SlideText {
                title: "Headline",
                body: Some(&bullets),
            },
            None,
        );

        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains("<a:t>Headline</a:t>"));
        assert!(xml.contains("<a:t>two &amp; three</a:t>"));
        assert!(!xml.contains("sldNum"));
        assert!(!xml.contains("graphicFrame"));
    }

    #[test]
    fn test_chart_frame_geometry() {
        let xml = slide_xml(
            &layout(),
            SlideText {
                title: "Headline",
                body: None,
            },
            Some("rId2"),
        );

        assert!(xml.contains(r#"<a:off x="457200" y="2286000"/>"#));
        assert!(xml.contains(r#"<a:ext cx="7315200" cy="3200400"/>"#));
        assert!(xml.contains(r#"r:id="rId2""#));
        assert!(xml.contains(r#"<p:cNvPr id="4" name="Chart 4"/>"#));
        // Body without bullets still gets an empty paragraph
        assert!(xml.contains("<a:lstStyle/><a:p/></p:txBody>"));
    }
}
