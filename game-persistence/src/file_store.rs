use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::stats_store::StatsStore;
use game_types::StatsRecord;

/// Daily statistics kept as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStatsStore {
    path: PathBuf,
}

impl JsonFileStatsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatsStore for JsonFileStatsStore {
    async fn load(&self) -> Result<Option<StatsRecord>, PersistenceError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| {
                PersistenceError::CorruptPersistedStats(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))
            })
    }

    async fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| PersistenceError::Storage(e.into()))?;

        // Write beside the target then rename so readers never see half a file.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        tracing::debug!("Saved stats to {}", self.path.display());
        Ok(())
    }
}
