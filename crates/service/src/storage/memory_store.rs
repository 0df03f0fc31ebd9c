use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RecordStore, StoreError};
use crate::ledger::Ledger;

/// In-memory [`RecordStore`] with the same whole-mapping semantics as the file store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Ledger>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed `save` calls.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<Ledger, StoreError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        *self.inner.write().await = ledger.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
