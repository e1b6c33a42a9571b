//! Command-line front end

pub mod commands;
pub mod interactive;

pub use commands::{
    load_options, print_report, run_crosstab, run_generate, run_inspect, run_starter_template,
    GenerateRequest, OptionOverrides, TemplateSource,
};
pub use interactive::run_interactive_mode;
