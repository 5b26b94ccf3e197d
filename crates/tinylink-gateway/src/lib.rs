//! HTTP boundary of the tinylink shortener.
//!
//! A thin axum adapter over any [`Shortener`](tinylink_core::Shortener):
//! `POST /` creates, `GET /{short_code}` redirects and `GET /health` reports
//! liveness. Domain errors are mapped to status codes in [`error`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
