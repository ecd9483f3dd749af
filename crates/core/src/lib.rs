//! Shared foundations for the Streamlyne field-mapping tools
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: `streamlyne.toml` loading with validation
//! - **Validation**: fluent form and config validation
//! - **Retry**: backoff policy and circuit breaker for backend calls
//!
//! # Example
//!
//! ```rust,no_run
//! use streamlyne_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let borewells = config.resolve(&config.schema.layers.borewells);
//! println!("borewells from {}", borewells.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod retry;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
    pub use crate::retry::{CircuitBreaker, CircuitBreakerConfig, RetryConfig};
    pub use crate::validation::{ValidationError, ValidationResult, Validator};
}
