//! Survey Insight Deck Generator CLI

use clap::{Args, Parser, Subcommand};
use colored::*;
use insightdeck::cli::{
    load_options, print_report, run_crosstab, run_generate, run_inspect, run_interactive_mode,
    run_starter_template, GenerateRequest, OptionOverrides, TemplateSource,
};
use insightdeck::logging::init_tracing;
use insightdeck::models::DEFAULT_OUTPUT_NAME;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "insightdeck")]
#[command(about = "Turn survey data and a PowerPoint template into a cross-tab insight deck", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging (overridden by INSIGHTDECK_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the insight deck
    Generate(GenerateArgs),

    /// Print counts and column percentages for each variable pair
    Crosstab {
        /// Survey CSV
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Print the outline of a deck
    Inspect {
        /// Path to a .pptx file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write a blank template with title and title-and-content layouts
    StarterTemplate {
        #[arg(short, long, default_value = "template.pptx")]
        output: PathBuf,
    },

    /// Guided prompts for all of the above
    Interactive,
}

#[derive(Args)]
struct GenerateArgs {
    /// Survey CSV with Gender, Preference and Region columns
    #[arg(short, long)]
    data: PathBuf,

    /// PowerPoint template (layout 0 = title, layout 1 = title and content)
    #[arg(short, long)]
    template: PathBuf,

    /// Output path for the deck
    #[arg(short, long, default_value = DEFAULT_OUTPUT_NAME)]
    output: PathBuf,

    /// Report options file (JSON5)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deck title
    #[arg(long)]
    title: Option<String>,

    /// Ask the chat-completion service for insights instead of mock text
    #[arg(long)]
    live: bool,

    /// API key for live insights
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Concurrent insight requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Drop pairs whose columns are missing instead of failing
    #[arg(long)]
    skip_missing_columns: bool,

    /// Also write a markdown summary next to the deck
    #[arg(short, long)]
    summary: bool,
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let overrides = OptionOverrides {
        title: args.title,
        live: args.live,
        api_key: args.api_key,
        model: args.model,
        base_url: args.base_url,
        concurrency: args.concurrency,
        timeout_secs: args.timeout,
        skip_missing_columns: args.skip_missing_columns,
    };

    let request = GenerateRequest {
        data: args.data,
        template: TemplateSource::File(args.template),
        output: args.output,
        options: load_options(args.config.as_deref(), overrides)?,
        summary: args.summary,
    };

    println!("{}", "Survey Insight Deck Generator".bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!();

    let report = run_generate(&request)?;
    print_report(&report, &request);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Crosstab { data } => run_crosstab(&data),
        Commands::Inspect { input } => run_inspect(&input),
        Commands::StarterTemplate { output } => run_starter_template(&output),
        Commands::Interactive => run_interactive_mode(),
    };

    if let Err(e) = result {
        eprintln!("{}", "❌ Failed!".red().bold());
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
