use crate::domain::model::PackagingBox;
use crate::domain::ports::ResultCache;
use crate::utils::error::{PackingError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    expires_at: DateTime<Utc>,
    value: PackagingBox,
}

/// One JSON file per key under `base_path`.
#[derive(Debug, Clone)]
pub struct FilesystemCache {
    base_path: PathBuf,
}

impl FilesystemCache {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PackingError::data_source(format!(
                "invalid cache key: {}",
                key
            )));
        }
        Ok(Path::new(&self.base_path).join(format!("{}.json", key)))
    }
}

#[async_trait]
impl ResultCache for FilesystemCache {
    async fn get(&self, key: &str) -> Result<Option<PackagingBox>> {
        let path = self.entry_path(key)?;
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = serde_json::from_slice(&data)?;
        if entry.expires_at <= Utc::now() {
            tracing::debug!("Cache entry {} expired", key);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::debug!("Could not remove expired cache entry {}: {}", key, e);
            }
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: &PackagingBox, ttl: Duration) -> Result<()> {
        let path = self.entry_path(key)?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| PackingError::data_source(format!("invalid cache ttl: {}", e)))?;
        let entry = CacheEntry {
            expires_at: Utc::now() + ttl,
            value: value.clone(),
        };

        tokio::fs::create_dir_all(&self.base_path).await?;
        tokio::fs::write(path, serde_json::to_vec(&entry)?).await?;
        Ok(())
    }
}
