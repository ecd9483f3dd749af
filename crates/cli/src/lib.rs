//! Terminal output helpers for the Streamlyne command-line client
//!
//! Provides shared CLI functionality:
//! - Text and JSON output selection
//! - Status messages and layer status rendering
//! - Distance formatting
//! - Spinners for layer loads and backend calls

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};
