//! Run summaries

pub mod generator;

pub use generator::{generate_summary, markdown_table};
