//! Run states and results of the report pipeline

use super::{CrosstabResult, InsightText};
use std::fmt;

/// Coarse pipeline stage, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reading,
    Tabulating,
    Generating,
    Slotting,
    Finalizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reading => write!(f, "reading inputs"),
            Stage::Tabulating => write!(f, "tabulating"),
            Stage::Generating => write!(f, "generating insights"),
            Stage::Slotting => write!(f, "assembling slides"),
            Stage::Finalizing => write!(f, "finalizing deck"),
        }
    }
}

/// Where a run currently is. Pair indices refer to the run's pair list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    AwaitingInputs,
    Tabulating(usize),
    Generating(usize),
    Slotting(usize),
    Finalized,
}

impl PipelineState {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineState::AwaitingInputs => None,
            PipelineState::Tabulating(_) => Some(Stage::Tabulating),
            PipelineState::Generating(_) => Some(Stage::Generating),
            PipelineState::Slotting(_) => Some(Stage::Slotting),
            PipelineState::Finalized => Some(Stage::Finalizing),
        }
    }
}

/// Raw inputs as handed over by the caller. Either may still be missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportInputs<'a> {
    pub dataset: Option<&'a [u8]>,
    pub template: Option<&'a [u8]>,
}

impl<'a> ReportInputs<'a> {
    pub fn new(dataset: &'a [u8], template: &'a [u8]) -> Self {
        Self {
            dataset: Some(dataset),
            template: Some(template),
        }
    }
}

/// Per-pair record of what went onto a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct PairReport {
    pub crosstab: CrosstabResult,
    pub insight: InsightText,
}

/// A finished deck plus what was computed for it.
#[derive(Debug, Clone)]
pub struct InsightReport {
    pub title: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub slide_count: usize,
    pub pairs: Vec<PairReport>,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Dataset or template not supplied yet. Nothing was produced.
    AwaitingInputs,
    Finalized(InsightReport),
}

impl PipelineOutcome {
    pub fn report(&self) -> Option<&InsightReport> {
        match self {
            PipelineOutcome::Finalized(report) => Some(report),
            PipelineOutcome::AwaitingInputs => None,
        }
    }

    pub fn into_report(self) -> Option<InsightReport> {
        match self {
            PipelineOutcome::Finalized(report) => Some(report),
            PipelineOutcome::AwaitingInputs => None,
        }
    }
}
