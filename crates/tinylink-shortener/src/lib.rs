//! URL shortener service implementation.
//!
//! [`ShortenerService`] ties a [`Generator`](tinylink_generator::Generator)
//! to a [`Repository`](tinylink_core::Repository): it validates input, retries
//! on short code collisions within a fixed attempt budget, and resolves codes
//! with a single point lookup. Core types are re-exported from `tinylink_core`.

pub mod service;
pub mod settings;
pub mod validate;

pub use service::ShortenerService;
pub use settings::ServiceSettings;
pub use tinylink_core::{ShortCode, Shortener, ShortenerError};
