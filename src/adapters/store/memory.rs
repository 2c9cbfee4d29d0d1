use crate::domain::model::PackingRecord;
use crate::domain::ports::PackingResultStore;
use crate::utils::error::{PackingError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local result store with the same uniqueness rule as the database.
#[derive(Clone, Default)]
pub struct InMemoryPackingResultStore {
    records: Arc<Mutex<HashMap<String, PackingRecord>>>,
}

impl InMemoryPackingResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl PackingResultStore for InMemoryPackingResultStore {
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<PackingRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(fingerprint).cloned())
    }

    async fn save(&self, record: &PackingRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.fingerprint) {
            return Err(PackingError::DuplicateFingerprint {
                fingerprint: record.fingerprint.clone(),
            });
        }
        records.insert(record.fingerprint.clone(), record.clone());
        Ok(())
    }
}
