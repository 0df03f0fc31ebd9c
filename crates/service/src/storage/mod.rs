//! Storage abstractions for service layer
//!
//! The ledger is persisted as one JSON object. Every operation reads the whole
//! mapping and, when mutating, writes the whole mapping back. Nothing is cached
//! in memory between calls and no locking is done: concurrent writers race and
//! the last `save` wins.

pub mod json_map_store;
pub mod memory_store;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::ledger::Ledger;

pub use json_map_store::JsonMapStore;
pub use memory_store::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed store file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Whole-mapping persistence for ledger records.
///
/// `load` fails when the backing is missing or unreadable; it never falls back
/// to an empty ledger. `save` replaces the backing with exactly `ledger`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn load(&self) -> Result<Ledger, StoreError>;
    async fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;
}
