//! Narrative insight attached to each chart slide

/// One headline plus its bullet points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightText {
    pub headline: String,
    pub bullets: Vec<String>,
}

impl InsightText {
    pub fn new(headline: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            headline: headline.into(),
            bullets,
        }
    }

    /// Placeholder insight used when live mode has no credential.
    pub fn credential_missing(label: &str) -> Self {
        Self::new(
            format!("{} (Error)", label),
            vec!["Please enter API key".to_string()],
        )
    }

    pub fn is_degraded(&self) -> bool {
        self.headline.ends_with(" (Error)")
    }
}

/// A service response split into its parts. Either part may be missing when
/// the service returns fewer lines than asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInsight {
    pub headline: Option<String>,
    pub points: Vec<String>,
}

/// Number of bullets every insight slide carries.
pub const POINTS_PER_INSIGHT: usize = 3;

impl ParsedInsight {
    /// Split free-form text into a headline and up to three points.
    /// Blank lines are ignored; anything past the third point is dropped.
    pub fn from_text(text: &str) -> Self {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string);

        let headline = lines.next();
        let points = lines.take(POINTS_PER_INSIGHT).collect();

        Self { headline, points }
    }

    pub fn is_complete(&self) -> bool {
        self.headline.is_some() && self.points.len() == POINTS_PER_INSIGHT
    }

    /// Fill whatever is missing with fixed fallbacks for `label`.
    pub fn into_insight(self, label: &str) -> InsightText {
        let headline = self
            .headline
            .unwrap_or_else(|| format!("Insights for {}", label));

        let mut bullets = self.points;
        for n in bullets.len() + 1..=POINTS_PER_INSIGHT {
            bullets.push(format!("{} – point {} unavailable", label, n));
        }

        InsightText { headline, bullets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let parsed = ParsedInsight::from_text("Headline\n- one\n- two\n- three\n- four");
        assert!(parsed.is_complete());
        assert_eq!(parsed.headline.as_deref(), Some("Headline"));
        assert_eq!(parsed.points, vec!["- one", "- two", "- three"]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let parsed = ParsedInsight::from_text("\r\nTitle\r\n\r\nfirst\r\n  \r\nsecond\r\nthird");
        assert_eq!(parsed.headline.as_deref(), Some("Title"));
        assert_eq!(parsed.points, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_short_response_gets_fallbacks() {
        let insight = ParsedInsight::from_text("Only a headline").into_insight("Gender vs Preference");
        assert_eq!(insight.headline, "Only a headline");
        assert_eq!(
            insight.bullets,
            vec![
                "Gender vs Preference – point 1 unavailable",
                "Gender vs Preference – point 2 unavailable",
                "Gender vs Preference – point 3 unavailable",
            ]
        );
    }

    #[test]
    fn test_empty_response_gets_fallback_headline() {
        let parsed = ParsedInsight::from_text("   \n");
        assert!(!parsed.is_complete());
        let insight = parsed.into_insight("Region vs Preference");
        assert_eq!(insight.headline, "Insights for Region vs Preference");
        assert_eq!(insight.bullets.len(), POINTS_PER_INSIGHT);
    }

    #[test]
    fn test_credential_missing() {
        let insight = InsightText::credential_missing("Region vs Preference");
        assert_eq!(insight.headline, "Region vs Preference (Error)");
        assert_eq!(insight.bullets, vec!["Please enter API key"]);
        assert!(insight.is_degraded());
    }
}
