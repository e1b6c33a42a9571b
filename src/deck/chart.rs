//! Clustered-column chart parts

use super::constants::ns;
use crate::models::CrosstabTable;
use crate::utils::column_letter;
use crate::utils::xml::escape_xml;
use std::fmt::Write;

/// Category labels plus named value series, one value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub categories: Vec<String>,
    pub series: Vec<(String, Vec<f64>)>,
}

impl ChartData {
    pub fn new(categories: Vec<String>, series: Vec<(String, Vec<f64>)>) -> Self {
        Self { categories, series }
    }

    /// Rows become categories and each column becomes a series.
    pub fn from_percents(percents: &CrosstabTable<f64>) -> Self {
        Self::new(percents.index.clone(), percents.series())
    }

    /// Last worksheet row holding data (row 1 is the header).
    pub fn last_row(&self) -> usize {
        self.categories.len() + 1
    }
}

/// `Sheet1!$B$2:$B$4`-style reference for series `index` (0-based).
fn value_range(index: usize, last_row: usize) -> String {
    let col = column_letter(index + 1);
    format!("Sheet1!${col}$2:${col}${last_row}")
}

/// Render the chart part. `workbook_rel` is the relationship id of the
/// embedded workbook, if any.
pub fn chart_xml(data: &ChartData, workbook_rel: Option<&str>) -> String {
    let mut xml = String::with_capacity(2048 + data.categories.len() * data.series.len() * 64);
    let last_row = data.last_row();

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(
        xml,
        r#"<c:chartSpace xmlns:c="{}" xmlns:a="{}" xmlns:r="{}">"#,
        ns::CHART,
        ns::DML,
        ns::OFFICE_REL
    );
    xml.push_str(r#"<c:date1904 val="0"/><c:lang val="en-US"/><c:roundedCorners val="0"/>"#);
    xml.push_str(r#"<c:chart><c:autoTitleDeleted val="1"/><c:plotArea><c:layout/>"#);

    xml.push_str(r#"<c:barChart><c:barDir val="col"/><c:grouping val="clustered"/><c:varyColors val="0"/>"#);
    for (i, (name, values)) in data.series.iter().enumerate() {
        write_series(&mut xml, i, name, values, &data.categories, last_row);
    }
    xml.push_str(r#"<c:gapWidth val="150"/><c:axId val="1"/><c:axId val="2"/></c:barChart>"#);

    xml.push_str(concat!(
        r#"<c:catAx><c:axId val="1"/><c:scaling><c:orientation val="minMax"/></c:scaling>"#,
        r#"<c:delete val="0"/><c:axPos val="b"/><c:numFmt formatCode="General" sourceLinked="1"/>"#,
        r#"<c:tickLblPos val="nextTo"/><c:crossAx val="2"/><c:crosses val="autoZero"/>"#,
        r#"<c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/></c:catAx>"#,
        r#"<c:valAx><c:axId val="2"/><c:scaling><c:orientation val="minMax"/></c:scaling>"#,
        r#"<c:delete val="0"/><c:axPos val="l"/><c:majorGridlines/>"#,
        r#"<c:numFmt formatCode="General" sourceLinked="1"/><c:tickLblPos val="nextTo"/>"#,
        r#"<c:crossAx val="1"/><c:crosses val="autoZero"/><c:crossBetween val="between"/></c:valAx>"#,
    ));
    xml.push_str("</c:plotArea>");
    xml.push_str(r#"<c:legend><c:legendPos val="r"/><c:overlay val="0"/></c:legend>"#);
    xml.push_str(r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart>"#);

    if let Some(rel) = workbook_rel {
        let _ = write!(
            xml,
            r#"<c:externalData r:id="{}"><c:autoUpdate val="0"/></c:externalData>"#,
            rel
        );
    }
    xml.push_str("</c:chartSpace>");
    xml
}

fn write_series(
    xml: &mut String,
    index: usize,
    name: &str,
    values: &[f64],
    categories: &[String],
    last_row: usize,
) {
    let col = column_letter(index + 1);

    let _ = write!(xml, r#"<c:ser><c:idx val="{index}"/><c:order val="{index}"/>"#);
    let _ = write!(
        xml,
        r#"<c:tx><c:strRef><c:f>Sheet1!${col}$1</c:f><c:strCache><c:ptCount val="1"/><c:pt idx="0"><c:v>{}</c:v></c:pt></c:strCache></c:strRef></c:tx>"#,
        escape_xml(name)
    );
    xml.push_str(r#"<c:invertIfNegative val="0"/>"#);

    let _ = write!(
        xml,
        r#"<c:cat><c:strRef><c:f>Sheet1!$A$2:$A${last_row}</c:f><c:strCache><c:ptCount val="{}"/>"#,
        categories.len()
    );
    for (i, category) in categories.iter().enumerate() {
        let _ = write!(xml, r#"<c:pt idx="{i}"><c:v>{}</c:v></c:pt>"#, escape_xml(category));
    }
    xml.push_str("</c:strCache></c:strRef></c:cat>");

    let _ = write!(
        xml,
        r#"<c:val><c:numRef><c:f>{}</c:f><c:numCache><c:formatCode>General</c:formatCode><c:ptCount val="{}"/>"#,
        value_range(index, last_row),
        categories.len()
    );
    // NaN cells are left out, which charts render as gaps
    for (i, value) in values.iter().enumerate().filter(|(_, v)| v.is_finite()) {
        let _ = write!(xml, r#"<c:pt idx="{i}"><c:v>{value}</c:v></c:pt>"#);
    }
    xml.push_str("</c:numCache></c:numRef></c:val></c:ser>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ChartData {
        ChartData::new(
            vec!["F".into(), "M".into()],
            vec![
                ("A".into(), vec![50.0, 50.0]),
                ("B & C".into(), vec![f64::NAN, 66.7]),
            ],
        )
    }

    #[test]
    fn test_chart_is_clustered_column() {
        let xml = chart_xml(&data(), Some("rId1"));
        assert!(xml.contains(r#"<c:barDir val="col"/>"#));
        assert!(xml.contains(r#"<c:grouping val="clustered"/>"#));
        assert_eq!(xml.matches("<c:ser>").count(), 2);
        assert!(xml.contains(r#"<c:externalData r:id="rId1">"#));
    }

    #[test]
    fn test_series_references_and_caches() {
        let xml = chart_xml(&data(), None);
        assert!(xml.contains("<c:f>Sheet1!$B$1</c:f>"));
        assert!(xml.contains("<c:f>Sheet1!$C$2:$C$3</c:f>"));
        assert!(xml.contains("<c:f>Sheet1!$A$2:$A$3</c:f>"));
        assert!(xml.contains("<c:v>B &amp; C</c:v>"));
        assert!(xml.contains(r#"<c:pt idx="1"><c:v>66.7</c:v></c:pt>"#));
        assert!(!xml.contains("NaN"));
        assert!(!xml.contains("externalData"));
    }

    #[test]
    fn test_from_percents() {
        let table = CrosstabTable {
            index: vec!["North".into(), "South".into()],
            columns: vec!["A".into()],
            values: vec![vec![100.0], vec![0.0]],
        };
        let chart = ChartData::from_percents(&table);
        assert_eq!(chart.categories, vec!["North", "South"]);
        assert_eq!(chart.series, vec![("A".to_string(), vec![100.0, 0.0])]);
        assert_eq!(chart.last_row(), 3);
    }
}
