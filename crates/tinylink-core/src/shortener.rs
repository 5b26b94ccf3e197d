use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

/// The operations a transport exposes to callers.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates `url`, assigns it a fresh short code and durably records
    /// the mapping. The returned code is always backed by a stored link.
    async fn create(&self, url: &str) -> Result<ShortCode>;

    /// Resolves `code` to the target URL recorded at creation time.
    ///
    /// Fails with [`ShortenerError::NotFound`] if nothing is stored under it.
    async fn resolve(&self, code: &str) -> Result<String>;
}
