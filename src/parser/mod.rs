//! Parsing modules for survey data and report configuration

pub mod dataset;
pub mod config;

pub use dataset::{parse_dataset, parse_dataset_from_file};
pub use config::{parse_options, parse_options_from_file};
