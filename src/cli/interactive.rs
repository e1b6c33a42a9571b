//! Interactive CLI mode for the insight deck generator

use super::commands::{
    print_report, run_crosstab, run_generate, run_inspect, run_starter_template, GenerateRequest,
    TemplateSource,
};
use crate::models::{InsightMode, ReportOptions, DEFAULT_OUTPUT_NAME, DEFAULT_TITLE};
use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use std::fs;
use std::path::PathBuf;

/// Files with `extension` in the current directory, sorted by name.
fn find_nearby_files(extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(entries) = fs::read_dir(".") {
        for entry in entries.flatten() {
            let path = entry.path();
            let matches = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false);
            if matches && path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Offer detected files plus a custom path entry. `extra` options are
/// listed after the detected files and returned as `Err(index)`.
fn prompt_for_file(
    prompt_text: &str,
    extension: &str,
    extra: &[&str],
) -> Result<std::result::Result<PathBuf, usize>> {
    let nearby = find_nearby_files(extension);

    let mut options: Vec<String> = nearby
        .iter()
        .map(|p| format!("📄 {} (detected)", p.display()))
        .collect();
    options.extend(extra.iter().map(|s| s.to_string()));
    options.push("✏️  Enter custom path".to_string());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt_text)
        .items(&options)
        .default(0)
        .interact()?;

    if selection < nearby.len() {
        Ok(Ok(nearby[selection].clone()))
    } else if selection < nearby.len() + extra.len() {
        Ok(Err(selection - nearby.len()))
    } else {
        let input_path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter path")
            .with_initial_text("./")
            .interact_text()?;
        Ok(Ok(PathBuf::from(input_path)))
    }
}

fn prompt_for_path(prompt_text: &str, extension: &str) -> Result<PathBuf> {
    Ok(prompt_for_file(prompt_text, extension, &[])?.unwrap_or_default())
}

/// Run the interactive CLI mode
pub fn run_interactive_mode() -> Result<()> {
    print_banner();

    loop {
        println!();
        let options = vec![
            "📊 Generate insight deck",
            "🧮 Show crosstabs for a dataset",
            "🔍 Inspect an existing deck",
            "📐 Write the starter template",
            "❌ Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        let result = match selection {
            0 => handle_generate(),
            1 => prompt_for_path("📁 Select survey CSV", "csv").and_then(|p| run_crosstab(&p)),
            2 => prompt_for_path("📁 Select deck", "pptx").and_then(|p| run_inspect(&p)),
            3 => handle_starter_template(),
            4 => {
                println!("\n{}", "Thanks for using Insight Deck! 👋".green().bold());
                break;
            }
            _ => unreachable!(),
        };

        if let Err(e) = result {
            println!("{}", "❌ Failed!".red().bold());
            println!("{}", format!("Error: {:#}", e).red());
        }
    }

    Ok(())
}

fn print_banner() {
    println!("{}", "╔═══════════════════════════════════════════════════════════════╗".blue());
    println!("{}", "║                                                               ║".blue());
    println!("{}", "║     📊 Survey Insight Deck Generator                          ║".blue().bold());
    println!("{}", "║                                                               ║".blue());
    println!("{}", "║     Cross-tab a survey CSV and build a PowerPoint deck        ║".blue());
    println!("{}", "║     with one insight and chart slide per variable pair        ║".blue());
    println!("{}", "║                                                               ║".blue());
    println!("{}", "╚═══════════════════════════════════════════════════════════════╝".blue());
}

fn handle_generate() -> Result<()> {
    println!("\n{}", "=== Generate Insight Deck ===".blue().bold());
    println!();

    let data = prompt_for_path("📁 Select survey CSV", "csv")?;
    if !data.exists() {
        println!("{}", "❌ Error: Dataset does not exist!".red().bold());
        return Ok(());
    }

    let template = match prompt_for_file(
        "📐 Select PowerPoint template",
        "pptx",
        &["✨ Use built-in starter template"],
    )? {
        Ok(path) => TemplateSource::File(path),
        Err(_) => TemplateSource::Starter,
    };

    let mut options = ReportOptions::default();
    options.title = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("🏷️  Deck title")
        .default(DEFAULT_TITLE.to_string())
        .interact_text()?;

    let modes = ["🧪 Mock insights (offline)", "🤖 Live insights (chat-completion API)"];
    let mode = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("💡 Insight mode")
        .items(&modes)
        .default(0)
        .interact()?;

    if mode == 1 {
        options.insights.mode = InsightMode::Live;
        options.insights.api_key = prompt_for_api_key()?;
    }

    let output: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("📂 Output file")
        .default(DEFAULT_OUTPUT_NAME.to_string())
        .interact_text()?;

    let summary = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("📄 Also write a markdown summary?")
        .default(true)
        .interact()?;

    println!();
    println!("{}", "🚀 Building deck...".yellow().bold());
    println!();

    let request = GenerateRequest {
        data,
        template,
        output: PathBuf::from(output),
        options,
        summary,
    };
    let report = run_generate(&request)?;
    println!();
    print_report(&report, &request);

    Ok(())
}

/// Environment key if the user accepts it, else a hidden prompt.
fn prompt_for_api_key() -> Result<Option<String>> {
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        let use_env = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("🔑 Use the API key from OPENAI_API_KEY?")
            .default(true)
            .interact()?;
        if use_env {
            return Ok(Some(key));
        }
    }

    let key = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("🔑 API key (leave blank for placeholder insights)")
        .allow_empty_password(true)
        .interact()?;

    Ok(Some(key).filter(|k| !k.trim().is_empty()))
}

fn handle_starter_template() -> Result<()> {
    let output: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("📂 Output file")
        .default("template.pptx".to_string())
        .interact_text()?;
    run_starter_template(&PathBuf::from(output))
}
