mod error;
mod url;

pub use error::{ErrorBody, ErrorKind, ErrorResponse};
pub use url::{CreateUrlRequest, CreateUrlResponse};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
