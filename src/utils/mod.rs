//! Shared helpers

pub mod helpers;
pub mod xml;

pub use helpers::*;
