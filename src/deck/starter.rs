//! Blank 10x7.5in presentation usable as a report template
//!
//! Layout 0 is a title layout (`ctrTitle` + `subTitle` idx 1), layout 1 is a
//! title-and-content layout (`title` + body idx 1).

use super::constants::{content_type as ct, ns, rel_type};
use super::package::{relationships_xml, Package, CONTENT_TYPES_PART};
use crate::models::DeckError;
use crate::utils::inches;
use std::fmt::Write;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const PRES_PROPS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";

/// Placeholder geometry in inches: left, top, width, height.
type Frame = (f64, f64, f64, f64);

struct Placeholder {
    name: &'static str,
    kind: Option<&'static str>,
    idx: Option<u32>,
    frame: Frame,
}

const MASTER_SHAPES: &[Placeholder] = &[
    Placeholder {
        name: "Title Placeholder 1",
        kind: Some("title"),
        idx: None,
        frame: (0.5, 0.3, 9.0, 1.25),
    },
    Placeholder {
        name: "Text Placeholder 2",
        kind: Some("body"),
        idx: Some(1),
        frame: (0.5, 1.75, 9.0, 4.95),
    },
];

const TITLE_SHAPES: &[Placeholder] = &[
    Placeholder {
        name: "Title 1",
        kind: Some("ctrTitle"),
        idx: None,
        frame: (0.75, 2.33, 8.5, 1.61),
    },
    Placeholder {
        name: "Subtitle 2",
        kind: Some("subTitle"),
        idx: Some(1),
        frame: (1.5, 4.25, 7.0, 1.92),
    },
];

const CONTENT_SHAPES: &[Placeholder] = &[
    Placeholder {
        name: "Title 1",
        kind: Some("title"),
        idx: None,
        frame: (0.5, 0.3, 9.0, 1.25),
    },
    Placeholder {
        name: "Content Placeholder 2",
        kind: None,
        idx: Some(1),
        frame: (0.5, 1.4, 9.0, 1.0),
    },
];

/// Build the starter template bytes.
pub fn starter_template() -> Result<Vec<u8>, DeckError> {
    let mut pkg = Package::new();

    pkg.set_part(CONTENT_TYPES_PART, content_types().into_bytes());
    pkg.set_part(
        "_rels/.rels",
        relationships_xml(&relationship("rId1", rel_type::OFFICE_DOCUMENT, "ppt/presentation.xml"))
            .into_bytes(),
    );

    pkg.set_part("ppt/presentation.xml", presentation().into_bytes());
    pkg.set_part(
        "ppt/_rels/presentation.xml.rels",
        relationships_xml(&[
            relationship("rId1", rel_type::SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            relationship("rId2", rel_type::THEME, "theme/theme1.xml"),
            relationship("rId3", PRES_PROPS_REL, "presProps.xml"),
        ]
        .concat())
        .into_bytes(),
    );
    pkg.set_part(
        "ppt/presProps.xml",
        format!(
            r#"{}<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"/>"#,
            XML_DECL,
            ns::DML,
            ns::OFFICE_REL,
            ns::PML
        )
        .into_bytes(),
    );

    pkg.set_part("ppt/slideMasters/slideMaster1.xml", master().into_bytes());
    pkg.set_part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        relationships_xml(&[
            relationship("rId1", rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            relationship("rId2", rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml"),
            relationship("rId3", rel_type::THEME, "../theme/theme1.xml"),
        ]
        .concat())
        .into_bytes(),
    );

    let layouts = [
        ("title", "Title Slide", TITLE_SHAPES),
        ("obj", "Title and Content", CONTENT_SHAPES),
    ];
    for (i, (kind, name, shapes)) in layouts.iter().enumerate() {
        let part = format!("ppt/slideLayouts/slideLayout{}.xml", i + 1);
        pkg.set_part(&part, layout(kind, name, shapes).into_bytes());
        pkg.set_part(
            &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
            relationships_xml(&relationship(
                "rId1",
                rel_type::SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            ))
            .into_bytes(),
        );
    }

    pkg.set_part("ppt/theme/theme1.xml", theme().into_bytes());

    pkg.to_bytes()
}

fn relationship(id: &str, rel_type: &str, target: &str) -> String {
    format!(r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#)
}

fn content_types() -> String {
    let mut xml = format!(
        r#"{}<Types xmlns="{}"><Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/>"#,
        XML_DECL,
        ns::CONTENT_TYPES,
        ct::RELATIONSHIPS,
        ct::XML
    );
    let overrides = [
        ("/ppt/presentation.xml", ct::PRESENTATION_MAIN),
        ("/ppt/presProps.xml", PRES_PROPS),
        ("/ppt/slideMasters/slideMaster1.xml", ct::SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", ct::SLIDE_LAYOUT),
        ("/ppt/slideLayouts/slideLayout2.xml", ct::SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", ct::THEME),
    ];
    for (part, content_type) in overrides {
        let _ = write!(xml, r#"<Override PartName="{part}" ContentType="{content_type}"/>"#);
    }
    xml.push_str("</Types>");
    xml
}

fn presentation() -> String {
    format!(
        concat!(
            r#"{}<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="{}" cy="{}"/>"#,
            r#"<p:defaultTextStyle/></p:presentation>"#
        ),
        XML_DECL,
        ns::DML,
        ns::OFFICE_REL,
        ns::PML,
        inches(10.0),
        inches(7.5),
        inches(7.5),
        inches(10.0)
    )
}

fn write_shapes(xml: &mut String, shapes: &[Placeholder]) {
    xml.push_str(concat!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
    ));

    for (i, shape) in shapes.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#,
            i + 2,
            shape.name
        );
        if let Some(kind) = shape.kind {
            let _ = write!(xml, r#" type="{kind}""#);
        }
        if let Some(idx) = shape.idx {
            let _ = write!(xml, r#" idx="{idx}""#);
        }
        let (left, top, width, height) = shape.frame;
        let _ = write!(
            xml,
            r#"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
            inches(left),
            inches(top),
            inches(width),
            inches(height)
        );
        xml.push_str(r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#);
    }

    xml.push_str("</p:spTree>");
}

fn master() -> String {
    let mut xml = format!(
        r#"{}<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
        XML_DECL,
        ns::DML,
        ns::OFFICE_REL,
        ns::PML
    );
    write_shapes(&mut xml, MASTER_SHAPES);
    xml.push_str(concat!(
        "</p:cSld>",
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
        r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst>"#,
        r#"<p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>"#,
        "</p:sldMaster>"
    ));
    xml
}

fn layout(kind: &str, name: &str, shapes: &[Placeholder]) -> String {
    let mut xml = format!(
        r#"{}<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="{}" preserve="1"><p:cSld name="{}">"#,
        XML_DECL,
        ns::DML,
        ns::OFFICE_REL,
        ns::PML,
        kind,
        name
    );
    write_shapes(&mut xml, shapes);
    xml.push_str("</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    xml
}

fn theme() -> String {
    let mut xml = format!(
        r#"{}<a:theme xmlns:a="{}" name="Report"><a:themeElements><a:clrScheme name="Report">"#,
        XML_DECL,
        ns::DML
    );
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    let colors = [
        ("dk2", "1F2937"),
        ("lt2", "E5E7EB"),
        ("accent1", "2563EB"),
        ("accent2", "F59E0B"),
        ("accent3", "10B981"),
        ("accent4", "EF4444"),
        ("accent5", "8B5CF6"),
        ("accent6", "14B8A6"),
        ("hlink", "1D4ED8"),
        ("folHlink", "7C3AED"),
    ];
    for (slot, rgb) in colors {
        let _ = write!(xml, r#"<a:{slot}><a:srgbClr val="{rgb}"/></a:{slot}>"#);
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(concat!(
        r#"<a:fontScheme name="Report">"#,
        r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
        r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
        "</a:fontScheme>",
        r#"<a:fmtScheme name="Report"><a:fillStyleLst>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        "</a:fillStyleLst><a:lnStyleLst>",
        r#"<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        "</a:lnStyleLst><a:effectStyleLst>",
        "<a:effectStyle><a:effectLst/></a:effectStyle>",
        "<a:effectStyle><a:effectLst/></a:effectStyle>",
        "<a:effectStyle><a:effectLst/></a:effectStyle>",
        "</a:effectStyleLst><a:bgFillStyleLst>",
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        "</a:bgFillStyleLst></a:fmtScheme>",
        "</a:themeElements></a:theme>"
    ));
    xml
}
