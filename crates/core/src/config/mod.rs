//! Configuration loading and schema definitions
//!
//! Settings live in `streamlyne.toml`; every section is optional and falls
//! back to built-in defaults.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_FILE_NAME};
pub use schema::*;
