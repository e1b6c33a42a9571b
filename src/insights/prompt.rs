//! Prompt text sent to the insight service

use crate::models::CrosstabTable;

pub const SYSTEM_PROMPT: &str = "You are a senior insights consultant.";

/// User prompt for one crosstab.
pub fn build_prompt(label: &str, percents: &CrosstabTable<f64>) -> String {
    format!(
        "You are a market research consultant.\n\
         Crosstab analysis: {}\n\
         {}\n\
         Write 1 headline + 3 key points.",
        label,
        percents.to_json()
    )
}
