//! Cross-tabulation of survey variables

pub mod categories;

pub use categories::Categories;

use crate::models::{CrosstabResult, CrosstabTable, Dataset, PipelineError, VariablePair};
use crate::utils::round_one_decimal;
use tracing::warn;

/// Count and column-normalize one variable pair.
///
/// Rows where either variable is missing are left out. Only categories that
/// actually occur appear in the grid.
pub fn compute(dataset: &Dataset, pair: VariablePair) -> Result<CrosstabResult, PipelineError> {
    let row_idx = column_index(dataset, pair.row, pair)?;
    let col_idx = column_index(dataset, pair.column, pair)?;

    let observations: Vec<(&str, &str)> = dataset
        .column_pairs(row_idx, col_idx)
        .filter_map(|(r, c)| Some((r?, c?)))
        .collect();

    let rows = Categories::from_values(observations.iter().map(|(r, _)| *r));
    let cols = Categories::from_values(observations.iter().map(|(_, c)| *c));
    if rows.is_empty() || cols.is_empty() {
        warn!(%pair, "no rows have both values present");
    }

    let mut counts = vec![vec![0u64; cols.len()]; rows.len()];
    for (r, c) in &observations {
        if let (Some(ri), Some(ci)) = (rows.position(r), cols.position(c)) {
            counts[ri][ci] += 1;
        }
    }

    let counts = CrosstabTable {
        index: rows.into_labels(),
        columns: cols.into_labels(),
        values: counts,
    };
    let percents = normalize_columns(&counts);

    Ok(CrosstabResult {
        pair,
        counts,
        percents,
    })
}

/// Rescale every column to percentages of its total, one decimal.
/// A column with a zero total yields NaN cells.
pub fn normalize_columns(counts: &CrosstabTable<u64>) -> CrosstabTable<f64> {
    let totals = counts.column_totals();

    let values = counts
        .values
        .iter()
        .map(|row| {
            row.iter()
                .zip(&totals)
                .map(|(&count, &total)| {
                    if total == 0 {
                        f64::NAN
                    } else {
                        round_one_decimal(count as f64 / total as f64 * 100.0)
                    }
                })
                .collect()
        })
        .collect();

    CrosstabTable {
        index: counts.index.clone(),
        columns: counts.columns.clone(),
        values,
    }
}

fn column_index(dataset: &Dataset, name: &str, pair: VariablePair) -> Result<usize, PipelineError> {
    dataset
        .column_index(name)
        .ok_or_else(|| PipelineError::ColumnNotFound {
            column: name.to_string(),
            pair,
        })
}
