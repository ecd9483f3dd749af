//! Backend client for Streamlyne
//!
//! Talks to the Supabase project behind the field-mapping client:
//! password sign-in, review listing and submission, and outbreak reports.
//!
//! # Features
//!
//! - **Environment-based configuration**: project URL and anon key from environment variables
//! - **Retry with exponential backoff**: idempotent reads retry transient failures
//! - **Circuit breaker**: stop issuing requests while the backend is down
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//! - **Annotation sink**: [`StreamlyneClient`] implements
//!   [`streamlyne_engine::AnnotationSink`] so the selection controller can submit through it
//!
//! # Example
//!
//! ```rust,no_run
//! use streamlyne_api_client::StreamlyneClient;
//! use streamlyne_geo::Coordinate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StreamlyneClient::new()?;
//!
//!     let reviews = client
//!         .reviews()
//!         .for_coordinate(Coordinate::new(12.9716, 77.5946))
//!         .await?;
//!     println!("{} reviews", reviews.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::StreamlyneClient;
pub use config::{ClientConfig, Environment};
pub use endpoints::Review;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::StreamlyneClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{AuthApi, OutbreaksApi, Review, ReviewsApi};
    pub use crate::error::{ApiError, ApiResult};
}
