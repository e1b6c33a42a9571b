//! Editable report deck opened from a template

use super::chart::{chart_xml, ChartData};
use super::constants::{content_type as ct, ns, rel_type};
use super::package::{is_presentation_type, Package};
use super::slide::{slide_xml, SlideText};
use super::template::{list_rel_ids, load_layouts, SlideLayout};
use super::workbook::chart_workbook;
use crate::models::DeckError;
use crate::utils::xml::attr_value;
use lazy_static::lazy_static;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::debug;

/// Layout used for the title slide.
pub const TITLE_LAYOUT: usize = 0;
/// Layout used for insight slides.
pub const CONTENT_LAYOUT: usize = 1;

/// Slide ids below this value are reserved.
const MIN_SLIDE_ID: u32 = 256;

lazy_static! {
    static ref NS_PREFIX: Regex = Regex::new(r#"xmlns:(\w+)="([^"]+)""#).unwrap();
}

/// A presentation package plus the layouts of its first master.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    package: Package,
    main_part: String,
    layouts: Vec<SlideLayout>,
}

impl ReportDocument {
    /// Open a template. The main part must be a presentation (plain,
    /// macro-enabled or template).
    pub fn from_template(bytes: &[u8]) -> Result<Self, DeckError> {
        let package = Package::from_bytes(bytes)?;

        let main_part = package
            .related_part("", rel_type::OFFICE_DOCUMENT)?
            .ok_or_else(|| DeckError::PartNotFound("officeDocument relationship".to_string()))?;

        let content_type = package.content_type(&main_part)?.unwrap_or_default();
        if !is_presentation_type(&content_type) {
            return Err(DeckError::InvalidContentType {
                part: main_part,
                expected: ct::PRESENTATION_MAIN.to_string(),
                got: content_type,
            });
        }

        let layouts = load_layouts(&package, &main_part)?;
        debug!(
            main = %main_part,
            layouts = layouts.len(),
            parts = package.len(),
            "opened template"
        );

        Ok(Self {
            package,
            main_part,
            layouts,
        })
    }

    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Number of slides currently listed in the presentation.
    pub fn slide_count(&self) -> Result<usize, DeckError> {
        let xml = self.package.xml(&self.main_part)?;
        Ok(list_rel_ids(&self.main_part, xml, b"sldId")?.len())
    }

    /// Append a slide on the title layout carrying `text`.
    pub fn add_title_slide(&mut self, text: &str) -> Result<(), DeckError> {
        let layout = self.layout(TITLE_LAYOUT)?.clone();
        layout.require_title()?;

        let slide = SlideText {
            title: text,
            body: None,
        };
        self.append_slide(&layout, slide, None)
    }

    /// Append a slide on the content layout with a headline, one body
    /// paragraph per bullet and a clustered-column chart.
    pub fn add_insight_slide(
        &mut self,
        headline: &str,
        bullets: &[String],
        chart: &ChartData,
    ) -> Result<(), DeckError> {
        let layout = self.layout(CONTENT_LAYOUT)?.clone();
        layout.require_title()?;
        layout.require_body()?;

        let slide = SlideText {
            title: headline,
            body: Some(bullets),
        };
        self.append_slide(&layout, slide, Some(chart))
    }

    /// Serialize the deck to `.pptx` bytes.
    pub fn finalize(self) -> Result<Vec<u8>, DeckError> {
        self.package.to_bytes()
    }

    fn layout(&self, index: usize) -> Result<&SlideLayout, DeckError> {
        self.layouts.get(index).ok_or(DeckError::MissingLayout(index))
    }

    fn append_slide(
        &mut self,
        layout: &SlideLayout,
        text: SlideText<'_>,
        chart: Option<&ChartData>,
    ) -> Result<(), DeckError> {
        let (_, slide_part) = self.package.next_part_name("ppt/slides/slide", ".xml");
        self.package
            .add_relationship(&slide_part, rel_type::SLIDE_LAYOUT, &layout.part)?;

        let chart_rel = match chart {
            Some(data) => Some(self.add_chart(&slide_part, data)?),
            None => None,
        };

        self.package.set_part(
            &slide_part,
            slide_xml(layout, text, chart_rel.as_deref()).into_bytes(),
        );
        self.package.add_override(&slide_part, ct::SLIDE)?;

        let rel_id = self
            .package
            .add_relationship(&self.main_part, rel_type::SLIDE, &slide_part)?;
        self.register_slide(&rel_id)?;

        debug!(part = %slide_part, layout = %layout.part, "added slide");
        Ok(())
    }

    /// Write the chart part and its workbook; returns the slide's chart
    /// relationship id.
    fn add_chart(&mut self, slide_part: &str, data: &ChartData) -> Result<String, DeckError> {
        let (_, chart_part) = self.package.next_part_name("ppt/charts/chart", ".xml");
        let (_, workbook_part) = self
            .package
            .next_part_name("ppt/embeddings/Microsoft_Excel_Sheet", ".xlsx");

        self.package.set_part(&workbook_part, chart_workbook(data)?);
        self.package.ensure_default("xlsx", ct::XLSX)?;

        let workbook_rel = self
            .package
            .add_relationship(&chart_part, rel_type::PACKAGE, &workbook_part)?;
        self.package
            .set_part(&chart_part, chart_xml(data, Some(&workbook_rel)).into_bytes());
        self.package.add_override(&chart_part, ct::CHART)?;

        self.package
            .add_relationship(slide_part, rel_type::CHART, &chart_part)
    }

    /// Add a `<p:sldId>` for `rel_id` at the end of the slide list.
    fn register_slide(&mut self, rel_id: &str) -> Result<(), DeckError> {
        let xml = self.package.xml(&self.main_part)?.to_string();
        let p = prefix_for(&xml, ns::PML);
        let r = prefix_for(&xml, ns::OFFICE_REL).unwrap_or_else(|| "r".to_string());
        let tag = |name: &str| match &p {
            Some(p) => format!("{}:{}", p, name),
            None => name.to_string(),
        };

        let next_id = slide_ids(&self.main_part, &xml)?
            .into_iter()
            .max()
            .map_or(MIN_SLIDE_ID, |max| (max + 1).max(MIN_SLIDE_ID));
        let entry = format!(r#"<{} id="{}" {}:id="{}"/>"#, tag("sldId"), next_id, r, rel_id);

        let list = tag("sldIdLst");
        let closing = format!("</{}>", list);
        let empty = format!("<{}/>", list);

        let updated = if let Some(pos) = xml.find(&closing) {
            format!("{}{}{}", &xml[..pos], entry, &xml[pos..])
        } else if xml.contains(&empty) {
            xml.replacen(&empty, &format!("<{list}>{entry}</{list}>"), 1)
        } else {
            // The list must precede the slide size elements
            let anchor = [tag("sldSz"), tag("notesSz")]
                .iter()
                .find_map(|name| xml.find(&format!("<{}", name)))
                .ok_or_else(|| DeckError::xml(&self.main_part, "no place for a slide list"))?;
            format!("{}<{list}>{entry}</{list}>{}", &xml[..anchor], &xml[anchor..])
        };

        self.package.set_part(&self.main_part, updated.into_bytes());
        Ok(())
    }
}

/// Prefix bound to `namespace` in `xml`, or `None` for the default namespace.
fn prefix_for(xml: &str, namespace: &str) -> Option<String> {
    NS_PREFIX
        .captures_iter(xml)
        .find(|caps| &caps[2] == namespace)
        .map(|caps| caps[1].to_string())
}

/// Numeric ids of every `<sldId>` in a presentation part.
fn slide_ids(part: &str, xml: &str) -> Result<Vec<u32>, DeckError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = attr_value(&e, b"id").and_then(|v| v.parse().ok()) {
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
