//! Run configuration passed explicitly into every report run

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Market Research Report";
pub const DEFAULT_OUTPUT_NAME: &str = "insight_report.pptx";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightMode {
    /// Fixed offline text, no network.
    #[default]
    Mock,
    /// Chat-completion call per pair.
    Live,
}

/// What to do when a configured pair names a column the dataset lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumnPolicy {
    /// Fail the run before any slide is produced.
    #[default]
    Abort,
    /// Drop the pair and build a shorter deck.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    pub mode: InsightMode,
    /// Never read from or written to config files.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    pub max_concurrency: usize,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            mode: InsightMode::Mock,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            max_concurrency: 1,
        }
    }
}

impl InsightSettings {
    pub fn mock() -> Self {
        Self::default()
    }

    pub fn live(api_key: Option<String>) -> Self {
        Self {
            mode: InsightMode::Live,
            api_key,
            ..Self::default()
        }
    }

    /// The credential, if one was supplied and is non-empty. Whitespace
    /// is passed through to the service as given.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub title: String,
    pub output_name: String,
    pub insights: InsightSettings,
    pub missing_columns: MissingColumnPolicy,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            insights: InsightSettings::default(),
            missing_columns: MissingColumnPolicy::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReportOptions::default();
        assert_eq!(options.title, "Market Research Report");
        assert_eq!(options.output_name, "insight_report.pptx");
        assert_eq!(options.insights.mode, InsightMode::Mock);
        assert_eq!(options.insights.max_concurrency, 1);
        assert_eq!(options.missing_columns, MissingColumnPolicy::Abort);
    }

    #[test]
    fn test_only_empty_credential_is_absent() {
        assert_eq!(InsightSettings::live(Some(String::new())).credential(), None);
        assert_eq!(
            InsightSettings::live(Some("  ".into())).credential(),
            Some("  ")
        );
        assert_eq!(InsightSettings::live(None).credential(), None);
        assert_eq!(
            InsightSettings::live(Some("sk-test".into())).credential(),
            Some("sk-test")
        );
    }
}
