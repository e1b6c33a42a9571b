//! Validation module

pub mod columns;
pub mod structure;

pub use columns::validate_dataset;
pub use structure::validate_deck;
