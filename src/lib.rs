//! Survey Insight Deck Generator
//!
//! A library for turning a survey CSV and a PowerPoint template into a deck
//! with one cross-tab insight slide per variable pair. Handles tabulation,
//! insight text (mock or via a chat-completion service) and deck assembly.

pub mod models;
pub mod parser;
pub mod tabulator;
pub mod insights;
pub mod deck;
pub mod validator;
pub mod report;
pub mod utils;
pub mod logging;
#[cfg(feature = "cli")]
pub mod cli;

pub use models::{
    InsightReport, InsightSettings, InsightText, PipelineError, PipelineOutcome, PipelineState,
    ReportInputs, ReportOptions, VariablePair, CROSSTAB_PAIRS,
};
pub use deck::{read_outline, starter_template, ReportDocument};
pub use insights::InsightGenerator;

use deck::ChartData;
use futures::stream::{self, StreamExt};
use models::{CrosstabResult, Dataset, InsightError, PairReport, Stage};
use tracing::{debug, info};

/// Main entry point: build the insight deck for the fixed variable pairs.
///
/// Returns [`PipelineOutcome::AwaitingInputs`] without doing anything when
/// the dataset or template is missing.
pub async fn generate_report(
    inputs: ReportInputs<'_>,
    options: &ReportOptions,
) -> Result<PipelineOutcome, PipelineError> {
    generate_report_with_progress(inputs, options, |_| {}).await
}

/// Same as [`generate_report`], reporting each state transition to `progress`.
pub async fn generate_report_with_progress<F>(
    inputs: ReportInputs<'_>,
    options: &ReportOptions,
    mut progress: F,
) -> Result<PipelineOutcome, PipelineError>
where
    F: FnMut(PipelineState),
{
    let (Some(dataset), Some(template)) = (inputs.dataset, inputs.template) else {
        info!("dataset or template not supplied yet");
        progress(PipelineState::AwaitingInputs);
        return Ok(PipelineOutcome::AwaitingInputs);
    };

    // 1. Read inputs
    info!(stage = %Stage::Reading, bytes = dataset.len(), "reading dataset and template");
    let dataset = parser::parse_dataset(dataset)?;
    let mut document = ReportDocument::from_template(template).map_err(PipelineError::Template)?;
    let existing = document.slide_count().map_err(PipelineError::Template)?;

    // 2. Check every pair's columns before any slide is produced
    let pairs = validator::validate_dataset(&dataset, CROSSTAB_PAIRS, options.missing_columns)?;

    let mut progress = move |state: PipelineState| {
        if let Some(stage) = state.stage() {
            debug!(%stage, ?state, "pipeline state");
        }
        progress(state);
    };

    let generator = InsightGenerator::new(&options.insights).map_err(|source| {
        PipelineError::ServiceFailure {
            label: "insight client".to_string(),
            source,
        }
    })?;

    document
        .add_title_slide(&options.title)
        .map_err(PipelineError::Assembly)?;

    // 3. Tabulate, generate and slot each pair in order
    let concurrency = options.insights.max_concurrency.max(1);
    let mut reports = Vec::with_capacity(pairs.len());

    if concurrency == 1 {
        for (i, pair) in pairs.iter().enumerate() {
            let crosstab = tabulate(&dataset, i, *pair, &mut progress)?;
            let label = crosstab.label();
            let result = generator.generate(&label, &crosstab.percents).await;
            reports.push(slot(&mut document, i, crosstab, result, &mut progress)?);
        }
    } else {
        // Requests run ahead of slotting, so every table is needed up front
        let crosstabs = pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| tabulate(&dataset, i, *pair, &mut progress))
            .collect::<Result<Vec<_>, _>>()?;

        let generator = &generator;
        let mut insights = stream::iter(crosstabs.into_iter().enumerate())
            .map(|(i, crosstab)| async move {
                let result = generator
                    .generate(&crosstab.label(), &crosstab.percents)
                    .await;
                (i, crosstab, result)
            })
            .buffered(concurrency);

        while let Some((i, crosstab, result)) = insights.next().await {
            reports.push(slot(&mut document, i, crosstab, result, &mut progress)?);
        }
    }

    // 4. Finalize and verify
    let bytes = document.finalize().map_err(PipelineError::Finalize)?;
    let expected: Vec<&str> = std::iter::once(options.title.as_str())
        .chain(reports.iter().map(|r| r.insight.headline.as_str()))
        .collect();
    let outline = validator::validate_deck(&bytes, existing, &expected)
        .map_err(PipelineError::Finalize)?;

    progress(PipelineState::Finalized);
    info!(
        stage = %Stage::Finalizing,
        slides = outline.slides.len(),
        bytes = bytes.len(),
        file = %options.output_name,
        "deck finalized"
    );

    Ok(PipelineOutcome::Finalized(InsightReport {
        title: options.title.clone(),
        file_name: options.output_name.clone(),
        bytes,
        slide_count: outline.slides.len(),
        pairs: reports,
    }))
}

fn tabulate<F>(
    dataset: &Dataset,
    index: usize,
    pair: VariablePair,
    progress: &mut F,
) -> Result<CrosstabResult, PipelineError>
where
    F: FnMut(PipelineState),
{
    progress(PipelineState::Tabulating(index));
    info!(stage = %Stage::Tabulating, %pair, "tabulating");
    tabulator::compute(dataset, pair)
}

/// Record a finished insight and append its slide.
fn slot<F>(
    document: &mut ReportDocument,
    index: usize,
    crosstab: CrosstabResult,
    result: Result<InsightText, InsightError>,
    progress: &mut F,
) -> Result<PairReport, PipelineError>
where
    F: FnMut(PipelineState),
{
    let label = crosstab.label();
    progress(PipelineState::Generating(index));
    let insight = result.map_err(|source| PipelineError::ServiceFailure {
        label: label.clone(),
        source,
    })?;
    info!(stage = %Stage::Generating, %label, degraded = insight.is_degraded(), "insight ready");

    progress(PipelineState::Slotting(index));
    document
        .add_insight_slide(
            &insight.headline,
            &insight.bullets,
            &ChartData::from_percents(&crosstab.percents),
        )
        .map_err(PipelineError::Assembly)?;
    info!(stage = %Stage::Slotting, %label, "slide added");

    Ok(PairReport { crosstab, insight })
}

/// Run [`generate_report`] on a private current-thread runtime.
pub fn generate_report_blocking(
    inputs: ReportInputs<'_>,
    options: &ReportOptions,
) -> Result<PipelineOutcome, PipelineError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(PipelineError::Runtime)?
        .block_on(generate_report(inputs, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURVEY: &[u8] = b"Gender,Preference,Region\nM,A,North\nF,B,South\nM,B,North\nF,A,South\n";

    #[tokio::test]
    async fn test_awaiting_inputs() {
        let template = starter_template().unwrap();
        let options = ReportOptions::default();

        let outcome = generate_report(
            ReportInputs {
                dataset: None,
                template: Some(template.as_slice()),
            },
            &options,
        )
        .await
        .unwrap();
        assert!(matches!(outcome, PipelineOutcome::AwaitingInputs));
    }

    #[tokio::test]
    async fn test_progress_sequence() {
        let template = starter_template().unwrap();
        let mut states = Vec::new();

        let outcome = generate_report_with_progress(
            ReportInputs::new(SURVEY, &template),
            &ReportOptions::default(),
            |state| states.push(state),
        )
        .await
        .unwrap();

        assert_eq!(outcome.report().unwrap().slide_count, 3);
        assert_eq!(
            states,
            vec![
                PipelineState::Tabulating(0),
                PipelineState::Generating(0),
                PipelineState::Slotting(0),
                PipelineState::Tabulating(1),
                PipelineState::Generating(1),
                PipelineState::Slotting(1),
                PipelineState::Finalized,
            ]
        );
    }

    #[tokio::test]
    async fn test_progress_sequence_with_concurrent_requests() {
        let template = starter_template().unwrap();
        let mut options = ReportOptions::default();
        options.insights.max_concurrency = 2;
        let mut states = Vec::new();

        generate_report_with_progress(ReportInputs::new(SURVEY, &template), &options, |state| {
            states.push(state)
        })
        .await
        .unwrap();

        assert_eq!(
            states,
            vec![
                PipelineState::Tabulating(0),
                PipelineState::Tabulating(1),
                PipelineState::Generating(0),
                PipelineState::Slotting(0),
                PipelineState::Generating(1),
                PipelineState::Slotting(1),
                PipelineState::Finalized,
            ]
        );
    }

    #[test]
    fn test_blocking_wrapper() {
        let template = starter_template().unwrap();
        let outcome =
            generate_report_blocking(ReportInputs::new(SURVEY, &template), &ReportOptions::default())
                .unwrap();
        let report = outcome.into_report().unwrap();
        assert_eq!(report.file_name, "insight_report.pptx");
        assert_eq!(report.pairs.len(), 2);
    }
}
