//! Structural validation of a finalized deck

use crate::deck::{read_outline, DeckOutline};
use crate::models::DeckError;

/// Check that `bytes` holds `existing` template slides followed by exactly
/// the slides titled `expected`, in order. Returns the outline read.
pub fn validate_deck(
    bytes: &[u8],
    existing: usize,
    expected: &[&str],
) -> Result<DeckOutline, DeckError> {
    let outline = read_outline(bytes)?;

    let want = existing + expected.len();
    if outline.slides.len() != want {
        return Err(DeckError::SlideCount {
            expected: want,
            actual: outline.slides.len(),
        });
    }

    for (offset, (slide, title)) in outline.slides[existing..].iter().zip(expected).enumerate() {
        let actual = slide.title.as_deref().unwrap_or_default();
        if normalize(actual) != normalize(title) {
            return Err(DeckError::SlideOrder {
                position: existing + offset + 1,
                expected: title.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(outline)
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{starter_template, ChartData, ReportDocument};

    fn deck() -> Vec<u8> {
        let mut doc = ReportDocument::from_template(&starter_template().unwrap()).unwrap();
        doc.add_title_slide("Report").unwrap();
        doc.add_insight_slide(
            "First",
            &["a".to_string()],
            &ChartData::new(vec!["x".into()], vec![("s".into(), vec![1.0])]),
        )
        .unwrap();
        doc.finalize().unwrap()
    }

    #[test]
    fn test_valid_deck() {
        let outline = validate_deck(&deck(), 0, &["Report", "First"]).unwrap();
        assert_eq!(outline.slides.len(), 2);
    }

    #[test]
    fn test_slide_count_mismatch() {
        let err = validate_deck(&deck(), 0, &["Report"]).unwrap_err();
        assert!(matches!(err, DeckError::SlideCount { expected: 1, actual: 2 }));
    }

    #[test]
    fn test_slide_order_mismatch() {
        let err = validate_deck(&deck(), 0, &["First", "Report"]).unwrap_err();
        match err {
            DeckError::SlideOrder { position, expected, actual } => {
                assert_eq!(position, 1);
                assert_eq!(expected, "First");
                assert_eq!(actual, "Report");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_existing_slides_are_skipped() {
        assert!(validate_deck(&deck(), 1, &["First"]).is_ok());
    }
}
