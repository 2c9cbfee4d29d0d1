use crate::domain::fingerprint::FingerprintDeriver;
use crate::domain::model::{total_weight, PackagingBox, PackingRecord, Product};
use crate::domain::ports::{PackStrategy, PackingResultStore};
use crate::utils::error::{PackingError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Permanent memo in front of a strategy: a fingerprint, once resolved, is
/// answered from the store forever, as long as the recorded box can carry
/// the shipment's weight.
pub struct PersistingStrategy<S> {
    inner: S,
    store: Arc<dyn PackingResultStore>,
    deriver: FingerprintDeriver,
    name: String,
}

impl<S: PackStrategy> PersistingStrategy<S> {
    pub fn new(inner: S, store: Arc<dyn PackingResultStore>) -> Self {
        let name = format!("persisting({})", inner.name());
        Self {
            inner,
            store,
            deriver: FingerprintDeriver::new(),
            name,
        }
    }
}

#[async_trait]
impl<S: PackStrategy> PackStrategy for PersistingStrategy<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn pack(&self, products: &[Product]) -> Result<PackagingBox> {
        let fingerprint = self.deriver.derive(products);

        match self.store.find_by_fingerprint(&fingerprint).await {
            Ok(Some(record)) if record.packaging.can_carry(total_weight(products)) => {
                tracing::info!(fingerprint = %fingerprint, "Packing result found in database");
                return Ok(record.packaging);
            }
            Ok(Some(record)) => {
                // The fingerprint ignores weight, so a heavier shipment can match a weaker box.
                tracing::info!(
                    fingerprint = %fingerprint,
                    packaging_id = record.packaging.id,
                    "Recorded packaging too weak for this shipment, recomputing"
                );
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(fingerprint = %fingerprint, "Packing result lookup failed: {}", e);
                return Err(PackingError::strategy_failure("Packing result lookup failed"));
            }
        }

        let packaging = self.inner.pack(products).await?;

        let record = PackingRecord::new(fingerprint, packaging.clone());
        match self.store.save(&record).await {
            Ok(()) => {
                tracing::debug!(fingerprint = %record.fingerprint, "Packing result recorded");
            }
            Err(PackingError::DuplicateFingerprint { fingerprint }) => {
                tracing::info!(
                    severity = "notice",
                    fingerprint = %fingerprint,
                    "Unique constraint triggered, result already recorded"
                );
            }
            Err(e) => {
                tracing::warn!(
                    fingerprint = %record.fingerprint,
                    "Could not record packing result: {}",
                    e
                );
            }
        }

        Ok(packaging)
    }
}
