use crate::models::{AnalysisRecord, WeightRecord};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{fs, sync::Mutex};

pub const WEIGHT_DATA_KEY: &str = "all_weight_data";
pub const ANALYSIS_DATA_KEY: &str = "analysis_data";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("stored value under {key} is not valid: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

/// Minimal string key-value store. Values are whole blobs.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key under a directory.
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KvStore for FileKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).await.map_err(io_err)?;
        fs::rename(&tmp, &path).await.map_err(io_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-process store; contents vanish with the process.
#[derive(Default)]
pub struct MemoryKv {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

/// Typed view over a [`KvStore`]: each key holds a full JSON array.
#[derive(Clone)]
pub struct RecordStore {
    kv: Arc<dyn KvStore>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn records(&self) -> Result<Vec<WeightRecord>, StoreError> {
        self.load(WEIGHT_DATA_KEY).await
    }

    pub async fn put_records(&self, records: &[WeightRecord]) -> Result<(), StoreError> {
        self.save(WEIGHT_DATA_KEY, records).await
    }

    pub async fn analyses(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        self.load(ANALYSIS_DATA_KEY).await
    }

    pub async fn put_analyses(&self, analyses: &[AnalysisRecord]) -> Result<(), StoreError> {
        self.save(ANALYSIS_DATA_KEY, analyses).await
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.kv.get(key).await? {
            None => Ok(Vec::new()),
            Some(text) if text.trim().is_empty() => Ok(Vec::new()),
            Some(text) => serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// An empty list drops the key; `load` reads a missing key back as empty.
    async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        if items.is_empty() {
            return self.kv.delete(key).await;
        }
        let payload = serde_json::to_string(items).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.kv.put(key, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> WeightRecord {
        WeightRecord {
            date: date.to_string(),
            weight: "80.0".to_string(),
            exercise: Some("walk".to_string()),
            diet: None,
        }
    }

    #[tokio::test]
    async fn missing_key_reads_as_empty() {
        let store = RecordStore::new(Arc::new(MemoryKv::new()));
        assert!(store.records().await.unwrap().is_empty());
        assert!(store.analyses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_replaces_whole_value() {
        let store = RecordStore::new(Arc::new(MemoryKv::new()));
        store
            .put_records(&[record("2024-01-01"), record("2024-01-02")])
            .await
            .unwrap();
        store.put_records(&[record("2024-01-03")]).await.unwrap();

        let records = store.records().await.unwrap();
        assert_eq!(records, vec![record("2024-01-03")]);
    }

    #[tokio::test]
    async fn corrupt_value_is_an_error() {
        let kv = Arc::new(MemoryKv::new());
        kv.put(WEIGHT_DATA_KEY, "{\"not\":\"an array\"}".to_string())
            .await
            .unwrap();
        let store = RecordStore::new(kv);

        let err = store.records().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path().join("nested")).await.unwrap();
        RecordStore::new(Arc::new(kv))
            .put_records(&[record("2024-01-01")])
            .await
            .unwrap();

        let reopened = FileKv::open(dir.path().join("nested")).await.unwrap();
        assert!(reopened.dir().join("all_weight_data.json").exists());
        let records = RecordStore::new(Arc::new(reopened)).records().await.unwrap();
        assert_eq!(records, vec![record("2024-01-01")]);
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).await.unwrap();
        assert!(matches!(
            kv.get("../escape").await,
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn file_store_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).await.unwrap();
        kv.put(ANALYSIS_DATA_KEY, "[]".to_string()).await.unwrap();
        let path = kv.dir().join("analysis_data.json");
        assert!(path.exists());

        kv.delete(ANALYSIS_DATA_KEY).await.unwrap();
        assert!(!path.exists());
        assert_eq!(kv.get(ANALYSIS_DATA_KEY).await.unwrap(), None);
        kv.delete(ANALYSIS_DATA_KEY).await.unwrap();
        assert!(matches!(
            kv.delete("../escape").await,
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn memory_store_delete_removes_value() {
        let kv = MemoryKv::new();
        kv.put(WEIGHT_DATA_KEY, "[]".to_string()).await.unwrap();
        kv.delete(WEIGHT_DATA_KEY).await.unwrap();
        assert_eq!(kv.get(WEIGHT_DATA_KEY).await.unwrap(), None);
        kv.delete(WEIGHT_DATA_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn saving_an_empty_list_drops_the_key() {
        let kv = Arc::new(MemoryKv::new());
        let store = RecordStore::new(kv.clone());
        store.put_records(&[record("2024-01-01")]).await.unwrap();
        store.put_records(&[]).await.unwrap();

        assert_eq!(kv.get(WEIGHT_DATA_KEY).await.unwrap(), None);
        assert!(store.records().await.unwrap().is_empty());
    }
}
