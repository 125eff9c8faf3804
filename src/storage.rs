use crate::errors::StorageError;
use crate::models::StatsStore;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// The JSON documents kept in the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Weeks,
    /// Reserved for rating history; nothing reads or writes it yet.
    RpeLog,
}

impl Document {
    pub fn file_name(self) -> &'static str {
        match self {
            Document::Weeks => "settimane.json",
            Document::RpeLog => "rpe.json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path(&self, document: Document) -> PathBuf {
        self.data_dir.join(document.file_name())
    }

    pub async fn load<T>(&self, document: Document) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(document);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "document missing, starting empty");
                return Ok(T::default());
            }
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Parse { path, source })
    }

    pub async fn save<T: Serialize>(&self, document: Document, value: &T) -> Result<(), StorageError> {
        let path = self.path(document);
        let payload = serde_json::to_vec_pretty(value).map_err(StorageError::Serialize)?;
        fs::write(&path, payload)
            .await
            .map_err(|source| StorageError::Write { path, source })?;
        Ok(())
    }

    pub async fn load_stats(&self) -> Result<StatsStore, StorageError> {
        self.load(Document::Weeks).await
    }

    pub async fn save_stats(&self, stats: &StatsStore) -> Result<(), StorageError> {
        self.save(Document::Weeks, stats).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrainingTime, WeekId, WeeklyRecord};

    #[tokio::test]
    async fn missing_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let stats = storage.load_stats().await.unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let mut stats = StatsStore::default();
        stats.weeks.insert(
            WeekId(10),
            WeeklyRecord {
                km: 21.1,
                ore: TrainingTime::from_parts(2, 5),
            },
        );
        stats.weeks.insert(
            WeekId(2),
            WeeklyRecord {
                km: 5.5,
                ore: TrainingTime::from_parts(0, 50),
            },
        );

        storage.save_stats(&stats).await.unwrap();
        let reloaded = storage.load_stats().await.unwrap();
        assert_eq!(reloaded, stats);

        let raw = std::fs::read_to_string(storage.path(Document::Weeks)).unwrap();
        assert!(raw.contains('\n'), "document should be pretty-printed");
        assert!(raw.contains("\"ore\": \"02:05\""));
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        std::fs::write(storage.path(Document::Weeks), b"{ not json").unwrap();

        let err = storage.load_stats().await.unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
    }

    #[test]
    fn documents_live_in_data_dir() {
        let storage = Storage::new("/srv/bot");
        assert_eq!(storage.path(Document::Weeks), PathBuf::from("/srv/bot/settimane.json"));
        assert_eq!(storage.path(Document::RpeLog), PathBuf::from("/srv/bot/rpe.json"));
    }
}
