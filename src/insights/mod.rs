//! Headline and bullet generation for each crosstab

pub mod client;
pub mod mock;
pub mod prompt;

pub use client::InsightClient;
pub use mock::mock_insight;
pub use prompt::{build_prompt, SYSTEM_PROMPT};

use crate::models::{
    CrosstabTable, InsightError, InsightMode, InsightSettings, InsightText, ParsedInsight,
};
use tracing::{info, warn};

/// Produces insight text in the configured mode.
#[derive(Debug, Clone)]
pub struct InsightGenerator {
    mode: InsightMode,
    client: Option<InsightClient>,
}

impl InsightGenerator {
    /// Live mode without a credential builds no client; every insight then
    /// degrades to the "enter API key" text instead of failing.
    pub fn new(settings: &InsightSettings) -> Result<Self, InsightError> {
        let client = match (settings.mode, settings.credential()) {
            (InsightMode::Live, Some(key)) => Some(InsightClient::new(settings, key)?),
            _ => None,
        };

        Ok(Self {
            mode: settings.mode,
            client,
        })
    }

    pub async fn generate(
        &self,
        label: &str,
        percents: &CrosstabTable<f64>,
    ) -> Result<InsightText, InsightError> {
        match (self.mode, &self.client) {
            (InsightMode::Mock, _) => Ok(mock_insight(label)),
            (InsightMode::Live, None) => {
                warn!(%label, "no API key supplied, using placeholder insight");
                Ok(InsightText::credential_missing(label))
            }
            (InsightMode::Live, Some(client)) => {
                let prompt = build_prompt(label, percents);
                let text = client.complete(SYSTEM_PROMPT, &prompt).await?;
                let parsed = ParsedInsight::from_text(&text);
                if !parsed.is_complete() {
                    warn!(
                        %label,
                        points = parsed.points.len(),
                        has_headline = parsed.headline.is_some(),
                        "insight response was short, filling in fallbacks"
                    );
                }
                info!(%label, "received live insight");
                Ok(parsed.into_insight(label))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CrosstabTable<f64> {
        CrosstabTable {
            index: vec!["F".into()],
            columns: vec!["A".into()],
            values: vec![vec![100.0]],
        }
    }

    #[tokio::test]
    async fn test_mock_mode_ignores_table() {
        let generator = InsightGenerator::new(&InsightSettings::mock()).unwrap();
        let empty = CrosstabTable {
            index: vec![],
            columns: vec![],
            values: vec![],
        };

        let a = generator.generate("Gender vs Preference", &table()).await.unwrap();
        let b = generator.generate("Gender vs Preference", &empty).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.bullets.len(), 3);
    }

    #[tokio::test]
    async fn test_live_without_key_degrades() {
        let generator = InsightGenerator::new(&InsightSettings::live(None)).unwrap();
        let insight = generator.generate("Region vs Preference", &table()).await.unwrap();
        assert_eq!(insight.headline, "Region vs Preference (Error)");
        assert_eq!(insight.bullets, vec!["Please enter API key"]);
    }
}
