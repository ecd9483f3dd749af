//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a specific part of the backend.
//!
//! | Module | Backend path | Description |
//! |--------|--------------|-------------|
//! | `auth` | `/auth/v1/token` | Password sign-in |
//! | `reviews` | `/rest/v1/reviews` | Reviews attached to a coordinate |
//! | `outbreaks` | `/rest/v1/outbreaks` | Disease outbreak reports |

pub mod auth;
pub mod outbreaks;
pub mod reviews;

pub use auth::AuthApi;
pub use outbreaks::OutbreaksApi;
pub use reviews::{Review, ReviewsApi};
