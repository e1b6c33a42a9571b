//! Report configuration file parsing

use crate::models::ReportOptions;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse report options from JSON5 text (comments and trailing commas allowed).
/// Missing fields keep their defaults.
pub fn parse_options(content: &str) -> Result<ReportOptions> {
    let options: ReportOptions = json5::from_str(content)
        .context("Failed to parse report configuration")?;

    if options.insights.max_concurrency == 0 {
        anyhow::bail!("insights.max_concurrency must be at least 1");
    }

    if options.title.trim().is_empty() {
        anyhow::bail!("title must not be empty");
    }

    Ok(options)
}

/// Parse report options from a file path.
pub fn parse_options_from_file(path: impl AsRef<Path>) -> Result<ReportOptions> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;
    parse_options(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InsightMode, MissingColumnPolicy};

    #[test]
    fn test_parse_partial_config() {
        let text = r#"{
            // deck settings
            title: "Q3 Brand Tracker",
            insights: { mode: "live", model: "gpt-4o", max_concurrency: 2, },
        }"#;

        let options = parse_options(text).unwrap();
        assert_eq!(options.title, "Q3 Brand Tracker");
        assert_eq!(options.output_name, "insight_report.pptx");
        assert_eq!(options.insights.mode, InsightMode::Live);
        assert_eq!(options.insights.model, "gpt-4o");
        assert_eq!(options.insights.max_concurrency, 2);
        assert_eq!(options.missing_columns, MissingColumnPolicy::Abort);
    }

    #[test]
    fn test_api_key_is_never_read_from_file() {
        let options = parse_options(r#"{ insights: { api_key: "sk-leaked" } }"#).unwrap();
        assert_eq!(options.insights.api_key, None);
    }

    #[test]
    fn test_skip_policy() {
        let options = parse_options(r#"{ missing_columns: "skip" }"#).unwrap();
        assert_eq!(options.missing_columns, MissingColumnPolicy::Skip);
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        assert!(parse_options(r#"{ insights: { max_concurrency: 0 } }"#).is_err());
    }
}
