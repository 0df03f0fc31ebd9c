use std::{
    collections::BTreeMap,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, info};

use super::{RecordStore, StoreError};
use crate::ledger::{Ledger, Record};

/// Generic JSON file-backed key-value map store.
///
/// The file holds one pretty-printed JSON object. There is no in-memory copy:
/// [`read_map`](Self::read_map) parses the file on every call and
/// [`write_map`](Self::write_map) rewrites it in full.
pub struct JsonMapStore<K, V> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Open the store at `path`. Creates parent directories and an empty `{}` file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }

        let store = Self { file_path, _marker: PhantomData };
        if fs::metadata(&store.file_path).await.is_err() {
            store.write_map(&BTreeMap::new()).await?;
            info!(path = %store.file_path.display(), "initialized empty record file");
        }
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and parse the whole file.
    pub async fn read_map(&self) -> Result<BTreeMap<K, V>, StoreError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|source| StoreError::Io { path: self.file_path.clone(), source })?;
        serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Malformed { path: self.file_path.clone(), source })
    }

    /// Overwrite the whole file with `map`.
    ///
    /// Writes a sibling temp file and renames it into place, so readers see
    /// either the old or the new mapping. Racing writers are not serialized.
    pub async fn write_map(&self, map: &BTreeMap<K, V>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(map).map_err(StoreError::Serialize)?;
        let tmp = self.temp_path();
        let written = match fs::write(&tmp, data).await {
            Ok(()) => fs::rename(&tmp, &self.file_path)
                .await
                .map_err(|source| StoreError::Io { path: self.file_path.clone(), source }),
            Err(source) => Err(StoreError::Io { path: tmp.clone(), source }),
        };
        if written.is_err() {
            // a failed write can leave a partial temp file behind
            let _ = fs::remove_file(&tmp).await;
        }
        written?;
        debug!(path = %self.file_path.display(), entries = map.len(), "record file written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.file_path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl RecordStore for JsonMapStore<String, Record> {
    async fn load(&self) -> Result<Ledger, StoreError> {
        self.read_map().await
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        self.write_map(ledger).await
    }
}
