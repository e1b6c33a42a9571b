//! Command implementations shared by the flag-driven and interactive front ends

use crate::deck::{read_outline, starter_template};
use crate::models::{
    InsightMode, InsightReport, MissingColumnPolicy, PipelineOutcome, PipelineState, ReportInputs,
    ReportOptions, CROSSTAB_PAIRS,
};
use crate::parser::{parse_dataset_from_file, parse_options_from_file};
use crate::report::{generate_summary, markdown_table};
use crate::{generate_report_with_progress, tabulator};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    /// The built-in blank template.
    Starter,
}

/// Command-line values that override the config file.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub title: Option<String>,
    pub live: bool,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub skip_missing_columns: bool,
}

impl OptionOverrides {
    pub fn apply(self, options: &mut ReportOptions) {
        if let Some(title) = self.title {
            options.title = title;
        }
        if self.live {
            options.insights.mode = InsightMode::Live;
        }
        if self.api_key.is_some() {
            options.insights.api_key = self.api_key;
        }
        if let Some(model) = self.model {
            options.insights.model = model;
        }
        if let Some(base_url) = self.base_url {
            options.insights.base_url = base_url;
        }
        if let Some(concurrency) = self.concurrency {
            options.insights.max_concurrency = concurrency.max(1);
        }
        if self.timeout_secs.is_some() {
            options.insights.timeout_secs = self.timeout_secs;
        }
        if self.skip_missing_columns {
            options.missing_columns = MissingColumnPolicy::Skip;
        }
    }
}

/// Load options from an optional JSON5 file, then apply overrides.
pub fn load_options(config: Option<&Path>, overrides: OptionOverrides) -> Result<ReportOptions> {
    let mut options = match config {
        Some(path) => parse_options_from_file(path)?,
        None => ReportOptions::default(),
    };
    overrides.apply(&mut options);
    Ok(options)
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub data: PathBuf,
    pub template: TemplateSource,
    pub output: PathBuf,
    pub options: ReportOptions,
    pub summary: bool,
}

/// Run the pipeline and write the deck (and optional summary) to disk.
pub fn run_generate(request: &GenerateRequest) -> Result<InsightReport> {
    let data = fs::read(&request.data)
        .with_context(|| format!("Failed to read dataset {}", request.data.display()))?;
    let template = match &request.template {
        TemplateSource::File(path) => fs::read(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?,
        TemplateSource::Starter => starter_template().context("Failed to build starter template")?,
    };

    let mut options = request.options.clone();
    if let Some(name) = request.output.file_name() {
        options.output_name = name.to_string_lossy().into_owned();
    }

    if options.insights.mode == InsightMode::Live && options.insights.credential().is_none() {
        println!(
            "{}",
            "⚠️  Live mode without an API key: insights will be placeholders".yellow()
        );
    }

    let bar = ProgressBar::new(CROSSTAB_PAIRS.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to initialize async runtime")?;
    let outcome = runtime.block_on(generate_report_with_progress(
        ReportInputs::new(&data, &template),
        &options,
        |state| match state {
            PipelineState::Tabulating(i) => bar.set_message(format!("tabulating pair {}", i + 1)),
            PipelineState::Generating(i) => bar.set_message(format!("insight {} ready", i + 1)),
            PipelineState::Slotting(_) => bar.inc(1),
            PipelineState::Finalized => bar.finish_with_message("deck finalized"),
            PipelineState::AwaitingInputs => {}
        },
    ));
    if outcome.is_err() {
        bar.abandon();
    }

    let report = match outcome? {
        PipelineOutcome::Finalized(report) => report,
        PipelineOutcome::AwaitingInputs => anyhow::bail!("Dataset and template are both required"),
    };

    fs::write(&request.output, &report.bytes)
        .with_context(|| format!("Failed to write deck {}", request.output.display()))?;

    if request.summary {
        let summary_path = request.output.with_extension("md");
        fs::write(&summary_path, generate_summary(&report))
            .with_context(|| format!("Failed to write summary {}", summary_path.display()))?;
    }

    Ok(report)
}

pub fn print_report(report: &InsightReport, request: &GenerateRequest) {
    println!("{}", "✅ Deck generated successfully!".green().bold());
    println!();
    println!("📊 Summary:");
    println!("  - Title: {}", report.title);
    println!("  - Slides: {}", report.slide_count);
    println!("  - Output: {}", request.output.display());
    if request.summary {
        println!("  - Summary: {}", request.output.with_extension("md").display());
    }
    println!();

    for pair in &report.pairs {
        let headline = if pair.insight.is_degraded() {
            pair.insight.headline.yellow()
        } else {
            pair.insight.headline.bold()
        };
        println!("{} {}", "▸".blue(), headline);
        for bullet in &pair.insight.bullets {
            println!("    • {}", bullet);
        }
    }
}

/// Print counts and column percentages for every pair.
pub fn run_crosstab(data: &Path) -> Result<()> {
    let dataset = parse_dataset_from_file(data)
        .with_context(|| format!("Failed to load dataset {}", data.display()))?;
    println!(
        "{}",
        format!("{} rows, columns: {}", dataset.row_count(), dataset.columns().join(", ")).dimmed()
    );
    println!();

    for &pair in CROSSTAB_PAIRS {
        println!("{}", pair.label().bold().blue());
        match tabulator::compute(&dataset, pair) {
            Ok(result) => {
                println!("{}", "Counts".bold());
                print!("{}", markdown_table(&result.counts, |v| v.to_string()));
                println!("{}", "Column %".bold());
                print!(
                    "{}",
                    markdown_table(&result.percents, |v| {
                        if v.is_nan() {
                            "n/a".to_string()
                        } else {
                            format!("{:.1}", v)
                        }
                    })
                );
            }
            Err(e) => println!("{}", format!("⚠️  {}", e).yellow()),
        }
        println!();
    }

    Ok(())
}

/// Print the outline of an existing deck.
pub fn run_inspect(input: &Path) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let outline = read_outline(&bytes).with_context(|| format!("{} is not a readable deck", input.display()))?;

    println!("{}", format!("{} slides", outline.slides.len()).bold());
    print!("{}", outline);
    Ok(())
}

pub fn run_starter_template(output: &Path) -> Result<()> {
    let bytes = starter_template().context("Failed to build starter template")?;
    fs::write(output, bytes).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("{} {}", "✅ Starter template written to".green(), output.display());
    Ok(())
}
