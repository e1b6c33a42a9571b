//! Survey CSV parsing

use crate::models::{Dataset, PipelineError};
use std::path::Path;

/// Field values a dataframe CSV reader treats as missing.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse comma-separated survey data with a header row.
pub fn parse_dataset(content: &[u8]) -> Result<Dataset, PipelineError> {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(PipelineError::Dataset("missing header row".to_string()));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(PipelineError::Dataset(format!(
                "row {} has {} fields, header has {}",
                line + 2,
                record.len(),
                columns.len()
            )));
        }

        let mut row: Vec<Option<String>> = record.iter().map(to_cell).collect();
        row.resize(columns.len(), None);
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}

/// Parse survey data from a file path.
pub fn parse_dataset_from_file(path: impl AsRef<Path>) -> Result<Dataset, PipelineError> {
    let content = std::fs::read(path.as_ref())
        .map_err(|e| PipelineError::Dataset(format!("{}: {}", path.as_ref().display(), e)))?;
    parse_dataset(&content)
}

fn to_cell(field: &str) -> Option<String> {
    if NA_VALUES.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_dataset() {
        let csv = "Gender,Preference,Region\nM,A,North\nF,B,South\n";
        let data = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(data.columns(), &["Gender", "Preference", "Region"]);
        assert_eq!(data.row_count(), 2);
        let regions: Vec<_> = data.column("Region").unwrap().collect();
        assert_eq!(regions, vec![Some("North"), Some("South")]);
    }

    #[test]
    fn test_missing_values_become_null() {
        let csv = "Gender,Preference\nM,\nNA,B\nF\n";
        let data = parse_dataset(csv.as_bytes()).unwrap();
        let gender: Vec<_> = data.column("Gender").unwrap().collect();
        let pref: Vec<_> = data.column("Preference").unwrap().collect();
        assert_eq!(gender, vec![Some("M"), None, Some("F")]);
        assert_eq!(pref, vec![None, Some("B"), None]);
    }

    #[test]
    fn test_bom_and_quotes() {
        let csv = "\u{feff}Gender,Preference\n\"M\",\"A, with comma\"\n";
        let data = parse_dataset(csv.as_bytes()).unwrap();
        assert!(data.has_column("Gender"));
        let pref: Vec<_> = data.column("Preference").unwrap().collect();
        assert_eq!(pref, vec![Some("A, with comma")]);
    }

    #[test]
    fn test_too_many_fields_is_error() {
        let csv = "Gender,Preference\nM,A,extra\n";
        let err = parse_dataset(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Dataset(_)));
        assert!(err.to_string().contains("row 2 has 3 fields"));
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(parse_dataset(b"").is_err());
    }
}
