use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tinylink_core::error::{Result, StorageError};
use tinylink_core::{ReadRepository, Repository, ShortCode, ShortLink};

/// Process-local mapping store, lost on restart.
///
/// `insert` claims a code through `DashMap::entry`, which holds the owning
/// shard's lock from the vacancy check until the link is written, so two
/// racing inserts of one code always produce one success and one
/// [`StorageError::Conflict`].
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, ShortLink>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, link: ShortLink) -> Result<()> {
        match self.storage.entry(link.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(link.id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(link);
                Ok(())
            }
        }
    }
}
