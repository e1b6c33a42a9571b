//! Dataset column checks, run before any slide is produced

use crate::models::{Dataset, MissingColumnPolicy, PipelineError, VariablePair};
use tracing::warn;

/// Pairs whose columns all exist in `dataset`.
///
/// Under [`MissingColumnPolicy::Abort`] the first missing column fails the
/// run; under [`MissingColumnPolicy::Skip`] the pair is dropped.
pub fn validate_dataset(
    dataset: &Dataset,
    pairs: &[VariablePair],
    policy: MissingColumnPolicy,
) -> Result<Vec<VariablePair>, PipelineError> {
    let mut usable = Vec::with_capacity(pairs.len());

    for &pair in pairs {
        let missing = [pair.row, pair.column]
            .into_iter()
            .find(|column| !dataset.has_column(column));

        match (missing, policy) {
            (None, _) => usable.push(pair),
            (Some(column), MissingColumnPolicy::Abort) => {
                return Err(PipelineError::ColumnNotFound {
                    column: column.to_string(),
                    pair,
                })
            }
            (Some(column), MissingColumnPolicy::Skip) => {
                warn!(%pair, %column, "column missing from dataset, skipping pair");
            }
        }
    }

    Ok(usable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CROSSTAB_PAIRS;
    use crate::parser::parse_dataset;

    #[test]
    fn test_all_columns_present() {
        let data = parse_dataset(b"Gender,Preference,Region\nM,A,North\n").unwrap();
        let pairs = validate_dataset(&data, CROSSTAB_PAIRS, MissingColumnPolicy::Abort).unwrap();
        assert_eq!(pairs, CROSSTAB_PAIRS.to_vec());
    }

    #[test]
    fn test_abort_on_missing_region() {
        let data = parse_dataset(b"Gender,Preference\nM,A\n").unwrap();
        let err = validate_dataset(&data, CROSSTAB_PAIRS, MissingColumnPolicy::Abort).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ColumnNotFound { ref column, .. } if column == "Region"
        ));
    }

    #[test]
    fn test_skip_drops_only_affected_pair() {
        let data = parse_dataset(b"Gender,Preference\nM,A\n").unwrap();
        let pairs = validate_dataset(&data, CROSSTAB_PAIRS, MissingColumnPolicy::Skip).unwrap();
        assert_eq!(pairs, vec![VariablePair::new("Gender", "Preference")]);
    }

    #[test]
    fn test_skip_can_leave_nothing() {
        let data = parse_dataset(b"Age\n31\n").unwrap();
        let pairs = validate_dataset(&data, CROSSTAB_PAIRS, MissingColumnPolicy::Skip).unwrap();
        assert!(pairs.is_empty());
    }
}
