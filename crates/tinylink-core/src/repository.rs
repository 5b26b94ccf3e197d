use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A persisted mapping from a short code to its target URL.
///
/// Records are written once through [`Repository::insert`] and never
/// updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    /// The short code, unique across the store.
    pub id: ShortCode,
    /// The original URL, stored exactly as accepted at creation time.
    pub target: String,
    /// When the link was created.
    pub created_at: Timestamp,
}

/// A read-only view of the mapping store.
///
/// Resolution only ever needs this half of the contract.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Looks up the link stored under `code`.
    /// Returns `None` if the code does not exist.
    ///
    /// Implementations must not serve stale reads: a code that was
    /// successfully inserted is visible to every subsequent `get`.
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new link if, and only if, no link holds its code yet.
    ///
    /// The check and the write must be a single atomic step. Returns
    /// `Err(StorageError::Conflict)` if the code is already taken; an existing
    /// link is never overwritten.
    async fn insert(&self, link: ShortLink) -> Result<()>;
}
