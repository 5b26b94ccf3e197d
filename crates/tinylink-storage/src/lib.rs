//! Mapping store adapters.
//!
//! Every adapter implements [`Repository`] with an atomic create-if-absent
//! insert and a strongly consistent point lookup.

pub mod dynamodb;
pub mod memory;
pub mod mysql;

pub use dynamodb::{DynamoDbConfig, DynamoDbRepository};
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use tinylink_core::{ReadRepository, Repository, ShortLink, StorageError};
