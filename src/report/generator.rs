//! Markdown summary of a finished report run

use crate::models::{CrosstabTable, InsightReport};
use std::fmt::Display;

pub fn generate_summary(report: &InsightReport) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("# {}\n\n", report.title));

    summary.push_str("## Summary\n\n");
    summary.push_str(&format!("- **Deck**: {}\n", report.file_name));
    summary.push_str(&format!("- **Slides**: {}\n", report.slide_count));
    summary.push_str(&format!("- **Variable Pairs**: {}\n", report.pairs.len()));
    let degraded = report.pairs.iter().filter(|p| p.insight.is_degraded()).count();
    if degraded > 0 {
        summary.push_str(&format!(
            "- **⚠️ Placeholder Insights**: {} (no API key supplied)\n",
            degraded
        ));
    }
    summary.push('\n');

    for pair in &report.pairs {
        summary.push_str(&format!("## {}\n\n", pair.crosstab.label()));
        summary.push_str(&format!("**{}**\n\n", pair.insight.headline));
        for bullet in &pair.insight.bullets {
            summary.push_str(&format!("- {}\n", bullet));
        }
        summary.push('\n');

        summary.push_str("### Counts\n\n");
        summary.push_str(&markdown_table(&pair.crosstab.counts, |v| v.to_string()));
        summary.push('\n');

        summary.push_str("### Column %\n\n");
        summary.push_str(&markdown_table(&pair.crosstab.percents, |v| {
            if v.is_nan() {
                "n/a".to_string()
            } else {
                format!("{:.1}", v)
            }
        }));
        summary.push('\n');
    }

    summary
}

/// Render a crosstab as a markdown table, row categories down the side.
pub fn markdown_table<T: Copy + Display>(
    table: &CrosstabTable<T>,
    cell: impl Fn(T) -> String,
) -> String {
    if table.is_empty() {
        return "_No responses with both values._\n".to_string();
    }

    let mut out = String::new();

    out.push_str("| |");
    for column in &table.columns {
        out.push_str(&format!(" {} |", column));
    }
    out.push('\n');

    out.push_str("|---|");
    out.push_str(&"---:|".repeat(table.columns.len()));
    out.push('\n');

    for (row, values) in table.index.iter().zip(&table.values) {
        out.push_str(&format!("| {} |", row));
        for &value in values {
            out.push_str(&format!(" {} |", cell(value)));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrosstabResult, InsightText, PairReport, VariablePair};
    use pretty_assertions::assert_eq;

    fn report() -> InsightReport {
        let counts = CrosstabTable {
            index: vec!["F".into(), "M".into()],
            columns: vec!["A".into(), "B".into()],
            values: vec![vec![1, 0], vec![1, 0]],
        };
        let percents = CrosstabTable {
            index: counts.index.clone(),
            columns: counts.columns.clone(),
            values: vec![vec![50.0, f64::NAN], vec![50.0, f64::NAN]],
        };

        InsightReport {
            title: "Market Research Report".into(),
            file_name: "insight_report.pptx".into(),
            bytes: Vec::new(),
            slide_count: 2,
            pairs: vec![PairReport {
                crosstab: CrosstabResult {
                    pair: VariablePair::new("Gender", "Preference"),
                    counts,
                    percents,
                },
                insight: InsightText::credential_missing("Gender vs Preference"),
            }],
        }
    }

    #[test]
    fn test_markdown_table() {
        let report = report();
        let table = markdown_table(&report.pairs[0].crosstab.counts, |v| v.to_string());
        assert_eq!(table, "| | A | B |\n|---|---:|---:|\n| F | 1 | 0 |\n| M | 1 | 0 |\n");
    }

    #[test]
    fn test_markdown_table_without_observations() {
        let empty: CrosstabTable<u64> = CrosstabTable {
            index: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
        };
        assert_eq!(
            markdown_table(&empty, |v| v.to_string()),
            "_No responses with both values._\n"
        );
    }

    #[test]
    fn test_summary_sections() {
        let summary = generate_summary(&report());
        assert!(summary.starts_with("# Market Research Report\n"));
        assert!(summary.contains("- **Slides**: 2\n"));
        assert!(summary.contains("Placeholder Insights**: 1"));
        assert!(summary.contains("## Gender vs Preference\n"));
        assert!(summary.contains("- Please enter API key\n"));
        assert!(summary.contains("| F | 50.0 | n/a |"));
    }
}
