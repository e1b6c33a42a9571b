//! Survey dataset and the variable pairs that get cross-tabulated

use std::fmt;

/// In-memory survey table. Cells are `None` when the source field was empty
/// or one of the usual NA markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Build a dataset from a header and rows already padded to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of the first column with this exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(index).and_then(|cell| cell.as_deref())),
        )
    }

    /// Paired values of two columns, row by row.
    pub fn column_pairs(
        &self,
        first: usize,
        second: usize,
    ) -> impl Iterator<Item = (Option<&str>, Option<&str>)> + '_ {
        self.rows.iter().map(move |row| {
            (
                row.get(first).and_then(|c| c.as_deref()),
                row.get(second).and_then(|c| c.as_deref()),
            )
        })
    }
}

/// An ordered (row variable, column variable) pair of dataset columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariablePair {
    pub row: &'static str,
    pub column: &'static str,
}

/// The pairs every report covers, in slide order.
pub const CROSSTAB_PAIRS: &[VariablePair] = &[
    VariablePair::new("Gender", "Preference"),
    VariablePair::new("Region", "Preference"),
];

impl VariablePair {
    pub const fn new(row: &'static str, column: &'static str) -> Self {
        Self { row, column }
    }

    /// Human label used for headlines and prompts, e.g. `Gender vs Preference`.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.row, self.column)
    }
}

impl fmt::Display for VariablePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["Gender".into(), "Preference".into()],
            vec![
                vec![Some("M".into()), Some("A".into())],
                vec![Some("F".into()), None],
            ],
        )
    }

    #[test]
    fn test_column_lookup() {
        let data = sample();
        assert_eq!(data.column_index("Preference"), Some(1));
        assert!(!data.has_column("Region"));

        let values: Vec<_> = data.column("Preference").unwrap().collect();
        assert_eq!(values, vec![Some("A"), None]);
    }

    #[test]
    fn test_pair_label() {
        assert_eq!(CROSSTAB_PAIRS[0].label(), "Gender vs Preference");
        assert_eq!(CROSSTAB_PAIRS[1].to_string(), "(Region, Preference)");
    }
}
