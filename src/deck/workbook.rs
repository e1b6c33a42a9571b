//! Minimal xlsx workbook holding a chart's data

use super::chart::ChartData;
use super::constants::{content_type as ct, ns, rel_type};
use super::package::{relationships_xml, Package, CONTENT_TYPES_PART};
use crate::models::DeckError;
use crate::utils::column_letter;
use crate::utils::xml::escape_xml;
use std::fmt::Write;

const SHEET_MAIN: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Build the workbook bytes.
///
/// ```text
///     |  A  |    B     |    C     |
///   1 |     | Series 1 | Series 2 |
///   2 | Cat | 10.0     | 15.0     |
/// ```
pub fn chart_workbook(data: &ChartData) -> Result<Vec<u8>, DeckError> {
    let mut pkg = Package::new();

    pkg.set_part(
        CONTENT_TYPES_PART,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="{}"><Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/><Override PartName="/xl/workbook.xml" ContentType="{}"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="{}"/></Types>"#,
            ns::CONTENT_TYPES,
            ct::RELATIONSHIPS,
            ct::XML,
            SHEET_MAIN,
            WORKSHEET
        )
        .into_bytes(),
    );
    pkg.set_part(
        "_rels/.rels",
        relationships_xml(&format!(
            r#"<Relationship Id="rId1" Type="{}" Target="xl/workbook.xml"/>"#,
            rel_type::OFFICE_DOCUMENT
        ))
        .into_bytes(),
    );
    pkg.set_part(
        "xl/workbook.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            SHEET_NS,
            ns::OFFICE_REL
        )
        .into_bytes(),
    );
    pkg.set_part(
        "xl/_rels/workbook.xml.rels",
        relationships_xml(&format!(
            r#"<Relationship Id="rId1" Type="{}" Target="worksheets/sheet1.xml"/>"#,
            WORKSHEET_REL
        ))
        .into_bytes(),
    );
    pkg.set_part("xl/worksheets/sheet1.xml", worksheet_xml(data).into_bytes());

    pkg.to_bytes()
}

fn worksheet_xml(data: &ChartData) -> String {
    let mut xml = String::with_capacity(1024);
    let _ = write!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{}"><sheetData>"#,
        SHEET_NS
    );

    xml.push_str(r#"<row r="1">"#);
    for (i, (name, _)) in data.series.iter().enumerate() {
        inline_string(&mut xml, &format!("{}1", column_letter(i + 1)), name);
    }
    xml.push_str("</row>");

    for (r, category) in data.categories.iter().enumerate() {
        let row = r + 2;
        let _ = write!(xml, r#"<row r="{row}">"#);
        inline_string(&mut xml, &format!("A{row}"), category);
        for (i, (_, values)) in data.series.iter().enumerate() {
            // Blank cell for NaN
            if let Some(value) = values.get(r).filter(|v| v.is_finite()) {
                let _ = write!(
                    xml,
                    r#"<c r="{}{row}"><v>{value}</v></c>"#,
                    column_letter(i + 1)
                );
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn inline_string(xml: &mut String, cell: &str, text: &str) {
    let _ = write!(
        xml,
        r#"<c r="{cell}" t="inlineStr"><is><t>{}</t></is></c>"#,
        escape_xml(text)
    );
}
