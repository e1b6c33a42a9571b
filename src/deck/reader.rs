//! Read a finished deck back into a plain outline

use super::constants::rel_type;
use super::package::{resolve_target, Package};
use super::template::{list_rel_ids, rel_id, rel_targets, BODY_INDEX};
use crate::models::DeckError;
use crate::utils::xml::attr_value;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckOutline {
    pub slides: Vec<SlideOutline>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideOutline {
    pub part: String,
    pub title: Option<String>,
    /// Non-empty paragraphs of the body placeholder.
    pub paragraphs: Vec<String>,
    pub chart: Option<ChartOutline>,
}

/// Cached chart data. Missing points read back as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOutline {
    pub categories: Vec<String>,
    pub series: Vec<(String, Vec<Option<f64>>)>,
}

impl DeckOutline {
    pub fn titles(&self) -> Vec<&str> {
        self.slides
            .iter()
            .map(|s| s.title.as_deref().unwrap_or_default())
            .collect()
    }
}

impl fmt::Display for DeckOutline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slide) in self.slides.iter().enumerate() {
            writeln!(
                f,
                "{}. {}",
                i + 1,
                slide.title.as_deref().unwrap_or("(untitled)")
            )?;
            for paragraph in &slide.paragraphs {
                writeln!(f, "   - {}", paragraph)?;
            }
            if let Some(chart) = &slide.chart {
                writeln!(f, "   chart: {}", chart.categories.join(", "))?;
                for (name, values) in &chart.series {
                    let values: Vec<String> = values
                        .iter()
                        .map(|v| v.map_or_else(|| "-".to_string(), |v| v.to_string()))
                        .collect();
                    writeln!(f, "     {}: {}", name, values.join(", "))?;
                }
            }
        }
        Ok(())
    }
}

/// Outline of every slide, in presentation order.
pub fn read_outline(bytes: &[u8]) -> Result<DeckOutline, DeckError> {
    let package = Package::from_bytes(bytes)?;
    let main_part = package
        .related_part("", rel_type::OFFICE_DOCUMENT)?
        .ok_or_else(|| DeckError::PartNotFound("officeDocument relationship".to_string()))?;

    let slide_ids = list_rel_ids(&main_part, package.xml(&main_part)?, b"sldId")?;
    let targets = rel_targets(&package, &main_part)?;

    let mut slides = Vec::with_capacity(slide_ids.len());
    for id in slide_ids {
        let part = targets
            .get(&id)
            .ok_or_else(|| DeckError::PartNotFound(format!("{} relationship {}", main_part, id)))?;
        slides.push(read_slide(&package, part)?);
    }

    Ok(DeckOutline { slides })
}

#[derive(Default)]
struct ShapeText {
    kind: Option<String>,
    idx: Option<u32>,
    paragraphs: Vec<String>,
}

fn read_slide(package: &Package, part: &str) -> Result<SlideOutline, DeckError> {
    let xml = package.xml(part)?;
    let mut reader = Reader::from_str(xml);

    let mut outline = SlideOutline {
        part: part.to_string(),
        ..Default::default()
    };
    let mut shape: Option<ShapeText> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;
    let mut chart_rel = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => shape = Some(ShapeText::default()),
                b"p" => paragraph = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"ph" => {
                    if let Some(s) = shape.as_mut() {
                        s.kind = attr_value(&e, b"type");
                        s.idx = attr_value(&e, b"idx").and_then(|v| v.parse().ok());
                    }
                }
                b"p" => {
                    if let Some(s) = shape.as_mut() {
                        s.paragraphs.push(String::new());
                    }
                }
                b"chart" => chart_rel = rel_id(&e),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                if let Some(p) = paragraph.as_mut() {
                    p.push_str(&t.unescape().map_err(|e| DeckError::xml(part, e))?);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(s), Some(p)) = (shape.as_mut(), paragraph.take()) {
                        s.paragraphs.push(p);
                    }
                }
                b"sp" => {
                    if let Some(s) = shape.take() {
                        classify_shape(&mut outline, s);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DeckError::xml(part, e)),
            _ => {}
        }
    }

    if let Some(id) = chart_rel {
        let chart_part = package
            .relationships(part)?
            .into_iter()
            .find(|rel| rel.id == id)
            .map(|rel| resolve_target(part, &rel.target))
            .ok_or_else(|| DeckError::PartNotFound(format!("{} relationship {}", part, id)))?;
        outline.chart = Some(read_chart(&chart_part, package.xml(&chart_part)?)?);
    }

    Ok(outline)
}

fn classify_shape(outline: &mut SlideOutline, shape: ShapeText) {
    let is_title = matches!(shape.kind.as_deref(), Some("title") | Some("ctrTitle"));
    if is_title && outline.title.is_none() {
        outline.title = Some(shape.paragraphs.join(" ").trim().to_string());
    } else if shape.idx == Some(BODY_INDEX) {
        outline
            .paragraphs
            .extend(shape.paragraphs.into_iter().filter(|p| !p.is_empty()));
    }
}

#[derive(Clone, Copy, PartialEq)]
enum SeriesSection {
    Name,
    Categories,
    Values,
}

/// Categories and series from the caches of a chart part.
pub fn read_chart(part: &str, xml: &str) -> Result<ChartOutline, DeckError> {
    let mut reader = Reader::from_str(xml);
    let mut chart = ChartOutline::default();

    let mut series: Option<(String, Vec<Option<f64>>, Vec<String>)> = None;
    let mut section = None;
    let mut point = 0usize;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ser" => series = Some(Default::default()),
                b"tx" if series.is_some() => section = Some(SeriesSection::Name),
                b"cat" if series.is_some() => section = Some(SeriesSection::Categories),
                b"val" if series.is_some() => section = Some(SeriesSection::Values),
                b"pt" => {
                    point = attr_value(&e, b"idx")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or_default()
                }
                b"v" => in_value = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"ptCount" => {
                if let (Some(SeriesSection::Values), Some((_, values, _))) = (section, series.as_mut()) {
                    let count = attr_value(&e, b"val")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or_default();
                    values.resize(count, None);
                }
            }
            Ok(Event::Text(t)) if in_value => {
                let text = t.unescape().map_err(|e| DeckError::xml(part, e))?;
                if let Some((name, values, categories)) = series.as_mut() {
                    match section {
                        Some(SeriesSection::Name) => name.push_str(&text),
                        Some(SeriesSection::Categories) => categories.push(text.into_owned()),
                        Some(SeriesSection::Values) => {
                            if values.len() <= point {
                                values.resize(point + 1, None);
                            }
                            values[point] = text.trim().parse().ok();
                        }
                        None => {}
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"tx" | b"cat" | b"val" => section = None,
                b"ser" => {
                    if let Some((name, values, categories)) = series.take() {
                        if chart.categories.is_empty() {
                            chart.categories = categories;
                        }
                        chart.series.push((name, values));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DeckError::xml(part, e)),
            _ => {}
        }
    }

    Ok(chart)
}
