use crate::domain::fingerprint::FingerprintDeriver;
use crate::domain::model::{total_weight, PackagingBox, Product};
use crate::domain::ports::{PackStrategy, ResultCache};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Short-lived cache in front of a strategy. Cache errors never fail a call.
pub struct CacheableStrategy<S> {
    inner: S,
    cache: Arc<dyn ResultCache>,
    ttl: Duration,
    deriver: FingerprintDeriver,
    name: String,
}

impl<S: PackStrategy> CacheableStrategy<S> {
    pub fn new(inner: S, cache: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        let name = format!("cached({})", inner.name());
        Self {
            inner,
            cache,
            ttl,
            deriver: FingerprintDeriver::new(),
            name,
        }
    }
}

#[async_trait]
impl<S: PackStrategy> PackStrategy for CacheableStrategy<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn pack(&self, products: &[Product]) -> Result<PackagingBox> {
        let key = self.deriver.derive(products);

        match self.cache.get(&key).await {
            Ok(Some(packaging)) if packaging.can_carry(total_weight(products)) => {
                tracing::info!(fingerprint = %key, "cached");
                return Ok(packaging);
            }
            Ok(Some(packaging)) => {
                tracing::debug!(
                    fingerprint = %key,
                    packaging_id = packaging.id,
                    "Cached packaging too weak for this shipment, treating as miss"
                );
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(fingerprint = %key, "Cache read failed, treating as miss: {}", e),
        }

        let packaging = self.inner.pack(products).await?;

        if let Err(e) = self.cache.set(&key, &packaging, self.ttl).await {
            tracing::warn!(fingerprint = %key, "Cache write failed: {}", e);
        }

        Ok(packaging)
    }
}
