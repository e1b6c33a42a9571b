//! Offline insight text

use crate::models::{InsightText, POINTS_PER_INSIGHT};

/// Fixed insight for `label`. Does not look at the data.
pub fn mock_insight(label: &str) -> InsightText {
    let bullets = (1..=POINTS_PER_INSIGHT)
        .map(|n| format!("{} – point {} (mock)", label, n))
        .collect();

    InsightText::new(format!("Insights for {}", label), bullets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_insight() {
        let insight = mock_insight("Gender vs Preference");
        assert_eq!(insight.headline, "Insights for Gender vs Preference");
        assert_eq!(
            insight.bullets,
            vec![
                "Gender vs Preference – point 1 (mock)",
                "Gender vs Preference – point 2 (mock)",
                "Gender vs Preference – point 3 (mock)",
            ]
        );
    }

    #[test]
    fn test_mock_insight_depends_only_on_label() {
        assert_eq!(mock_insight("Region vs Preference"), mock_insight("Region vs Preference"));
        assert_ne!(mock_insight("Region vs Preference"), mock_insight("Gender vs Preference"));
    }
}
