//! Core data models for report generation

pub mod dataset;
pub mod crosstab;
pub mod insight;
pub mod options;
pub mod pipeline;
pub mod error;

pub use dataset::*;
pub use crosstab::*;
pub use insight::*;
pub use options::*;
pub use pipeline::*;
pub use error::*;
