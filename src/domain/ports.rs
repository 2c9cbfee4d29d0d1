use crate::domain::model::{PackagingBox, PackingRecord, Product};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One way of choosing a box for a shipment.
#[async_trait]
pub trait PackStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn pack(&self, products: &[Product]) -> Result<PackagingBox>;
}

/// Source of candidate boxes.
///
/// A failing source must return an error, never an empty list.
#[async_trait]
pub trait BoxCatalog: Send + Sync {
    async fn list_boxes(&self) -> Result<Vec<PackagingBox>>;

    async fn find_by_id(&self, id: u64) -> Result<Option<PackagingBox>>;
}

/// Append-only store of resolved fingerprints.
#[async_trait]
pub trait PackingResultStore: Send + Sync {
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<PackingRecord>>;

    /// Fails with `DuplicateFingerprint` when the fingerprint is already recorded.
    async fn save(&self, record: &PackingRecord) -> Result<()>;
}

/// Short-lived key/value cache.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<PackagingBox>>;

    async fn set(&self, key: &str, value: &PackagingBox, ttl: Duration) -> Result<()>;
}
