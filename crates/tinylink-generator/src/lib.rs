//! Short code generation.
//!
//! Generators are pure: the same [`GenerateInput`] and attempt number always
//! yield the same candidate, and nothing here touches storage. Uniqueness is
//! settled later by the store's create-if-absent write.

pub mod encode;
pub mod hash;

pub use hash::HashGenerator;

use jiff::Timestamp;
use tinylink_core::ShortCode;

/// Everything a candidate is derived from, besides the attempt number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateInput<'a> {
    /// The long URL being shortened.
    pub url: &'a str,
    /// The creation instant stamped on the link being created.
    pub created_at: Timestamp,
}

impl<'a> GenerateInput<'a> {
    pub fn new(url: &'a str, created_at: Timestamp) -> Self {
        Self { url, created_at }
    }
}

/// Trait for generating candidate short codes.
///
/// `attempt` is the zero-based retry counter supplied by the caller after a
/// collision. Implementations must return different candidates for different
/// attempts on the same input, and must not fail.
pub trait Generator: Send + Sync + 'static {
    fn generate(&self, input: &GenerateInput<'_>, attempt: u32) -> ShortCode;
}
