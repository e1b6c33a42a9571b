//! Contingency tables produced by the tabulator

use super::VariablePair;
use serde_json::{Map, Number, Value};

/// A row-category by column-category grid. `values[r][c]` belongs to
/// `index[r]` and `columns[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CrosstabTable<T> {
    pub index: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<T>>,
}

impl<T: Copy> CrosstabTable<T> {
    pub fn get(&self, row: &str, column: &str) -> Option<T> {
        let r = self.index.iter().position(|v| v == row)?;
        let c = self.columns.iter().position(|v| v == column)?;
        Some(self.values[r][c])
    }

    /// All values of one column category, in `index` order.
    pub fn column(&self, column: &str) -> Option<Vec<T>> {
        let c = self.columns.iter().position(|v| v == column)?;
        Some(self.values.iter().map(|row| row[c]).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }
}

impl CrosstabTable<u64> {
    pub fn total(&self) -> u64 {
        self.values.iter().flatten().sum()
    }

    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.columns.len())
            .map(|c| self.values.iter().map(|row| row[c]).sum())
            .collect()
    }
}

impl CrosstabTable<f64> {
    /// Nested `{column: {row: value}}` map; NaN cells become `null`.
    pub fn to_json(&self) -> Value {
        let mut outer = Map::new();
        for (c, column) in self.columns.iter().enumerate() {
            let mut inner = Map::new();
            for (r, row) in self.index.iter().enumerate() {
                let cell = Number::from_f64(self.values[r][c])
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                inner.insert(row.clone(), cell);
            }
            outer.insert(column.clone(), Value::Object(inner));
        }
        Value::Object(outer)
    }

    /// Chart series: one `(column name, values)` entry per column category.
    pub fn series(&self) -> Vec<(String, Vec<f64>)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(c, name)| (name.clone(), self.values.iter().map(|row| row[c]).collect()))
            .collect()
    }
}

/// Counts and column percentages for one variable pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CrosstabResult {
    pub pair: VariablePair,
    pub counts: CrosstabTable<u64>,
    pub percents: CrosstabTable<f64>,
}

impl CrosstabResult {
    pub fn label(&self) -> String {
        self.pair.label()
    }
}
