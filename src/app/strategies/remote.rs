use crate::adapters::bin_packing::{resolve_packed_bin, BinPackingClient, ShipmentPayload};
use crate::domain::model::{PackagingBox, Product};
use crate::domain::ports::{BoxCatalog, PackStrategy};
use crate::utils::error::{PackingError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Delegates the packing decision to the remote 3D bin-packing service.
pub struct RemotePackingStrategy {
    client: BinPackingClient,
    catalog: Arc<dyn BoxCatalog>,
}

impl RemotePackingStrategy {
    pub fn new(client: BinPackingClient, catalog: Arc<dyn BoxCatalog>) -> Self {
        Self { client, catalog }
    }

    async fn try_pack(&self, products: &[Product]) -> Result<PackagingBox> {
        let boxes = self.catalog.list_boxes().await?;
        if boxes.is_empty() {
            return Err(PackingError::not_found("No box available"));
        }

        let payload = ShipmentPayload::new(&boxes, products);
        let response = self.client.pack_shipment(payload).await?;
        let bin_id = resolve_packed_bin(&response)?;

        self.catalog.find_by_id(bin_id).await?.ok_or_else(|| {
            PackingError::not_found("No packaging found for the selected box dimensions")
        })
    }
}

fn log_http_failure(err: &reqwest::Error) {
    if let Some(status) = err.status() {
        tracing::warn!("Packing API answered HTTP {}: {}", status, err);
    } else if err.is_decode() {
        tracing::warn!("Packing API returned an unreadable response: {}", err);
    } else {
        tracing::error!("Transport error while calling packing API: {}", err);
    }
}

#[async_trait]
impl PackStrategy for RemotePackingStrategy {
    fn name(&self) -> &str {
        "bin-packing-3d"
    }

    async fn pack(&self, products: &[Product]) -> Result<PackagingBox> {
        match self.try_pack(products).await {
            Ok(packaging) => Ok(packaging),
            Err(e) if e.is_decisive() || e.is_strategy_failure() => Err(e),
            Err(PackingError::Http(e)) => {
                log_http_failure(&e);
                Err(PackingError::strategy_failure(
                    "Packing API communication error",
                ))
            }
            Err(e) => {
                tracing::error!("Unexpected packing failure: {}", e);
                Err(PackingError::strategy_failure("Unexpected packing failure"))
            }
        }
    }
}
