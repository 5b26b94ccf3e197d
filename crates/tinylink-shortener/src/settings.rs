use std::time::Duration;
use tinylink_core::CodeFormat;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_MAX_URL_LENGTH: usize = 2048;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Static configuration of a [`ShortenerService`](crate::ShortenerService).
///
/// Fixed for the lifetime of the service.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceSettings {
    /// How many candidates a single create may try before giving up.
    /// Values below 1 are treated as 1.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Longest accepted URL, in characters.
    #[builder(default = DEFAULT_MAX_URL_LENGTH)]
    pub max_url_length: usize,
    /// Upper bound on every individual store call.
    #[builder(default = DEFAULT_STORE_TIMEOUT)]
    pub store_timeout: Duration,
    /// Shape of the codes accepted on resolve.
    #[builder(default)]
    pub code_format: CodeFormat,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
