//! Error types for each stage of a report run

use super::{Stage, VariablePair};
use thiserror::Error;

/// Failure that aborts a whole run. No deck is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset could not be read: {0}")]
    Dataset(String),

    #[error("column '{column}' required by pair {pair} is not in the dataset")]
    ColumnNotFound { column: String, pair: VariablePair },

    #[error("insight service failed for '{label}'")]
    ServiceFailure {
        label: String,
        #[source]
        source: InsightError,
    },

    #[error("template is not a usable presentation")]
    Template(#[source] DeckError),

    #[error("deck assembly failed")]
    Assembly(#[source] DeckError),

    #[error("finished deck failed verification")]
    Finalize(#[source] DeckError),

    #[error("async runtime could not start")]
    Runtime(#[source] std::io::Error),
}

impl PipelineError {
    /// The pipeline stage the failure belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Dataset(_) => Stage::Reading,
            PipelineError::ColumnNotFound { .. } => Stage::Tabulating,
            PipelineError::ServiceFailure { .. } => Stage::Generating,
            PipelineError::Template(_) => Stage::Reading,
            PipelineError::Assembly(_) => Stage::Slotting,
            PipelineError::Finalize(_) => Stage::Finalizing,
            PipelineError::Runtime(_) => Stage::Generating,
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Dataset(err.to_string())
    }
}

/// Failure talking to the text-generation service.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("service returned no choices")]
    EmptyResponse,
}

/// Failure reading, editing or writing a presentation package.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("invalid zip package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("package part not found: {0}")]
    PartNotFound(String),

    #[error("invalid content type for {part}: expected {expected}, got {got}")]
    InvalidContentType {
        part: String,
        expected: String,
        got: String,
    },

    #[error("template has no slide layout at index {0}")]
    MissingLayout(usize),

    #[error("layout {layout} has no {placeholder} placeholder")]
    MissingPlaceholder { layout: String, placeholder: String },

    #[error("deck has {actual} slides, expected {expected}")]
    SlideCount { expected: usize, actual: usize },

    #[error("slide {position} is titled '{actual}', expected '{expected}'")]
    SlideOrder {
        position: usize,
        expected: String,
        actual: String,
    },
}

impl DeckError {
    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        DeckError::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        let err = PipelineError::ColumnNotFound {
            column: "Region".into(),
            pair: VariablePair::new("Region", "Preference"),
        };
        assert_eq!(err.stage(), Stage::Tabulating);
        assert_eq!(
            err.to_string(),
            "column 'Region' required by pair (Region, Preference) is not in the dataset"
        );

        let err = PipelineError::Assembly(DeckError::MissingLayout(1));
        assert_eq!(err.stage(), Stage::Slotting);
        assert_eq!(
            PipelineError::Template(DeckError::PartNotFound("ppt/presentation.xml".into())).stage(),
            Stage::Reading
        );
        assert_eq!(
            PipelineError::Finalize(DeckError::SlideCount {
                expected: 3,
                actual: 2
            })
            .stage(),
            Stage::Finalizing
        );
    }
}
