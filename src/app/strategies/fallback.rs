use crate::domain::model::{PackagingBox, Product};
use crate::domain::ports::{BoxCatalog, PackStrategy};
use crate::utils::error::{PackingError, Result};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;

/// Per-axis sums of the shipment. A linear upper bound, not a 3D placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShipmentExtent {
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub weight: f64,
}

impl ShipmentExtent {
    pub fn of(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |acc, p| Self {
            width: acc.width + p.width,
            height: acc.height + p.height,
            length: acc.length + p.length,
            weight: acc.weight + p.weight,
        })
    }

    pub fn fits_in(&self, packaging: &PackagingBox) -> bool {
        packaging.width >= self.width
            && packaging.height >= self.height
            && packaging.length >= self.length
            && packaging.max_weight >= self.weight
    }
}

/// Smallest volume first; equal volumes prefer the higher weight capacity.
fn rank(a: &PackagingBox, b: &PackagingBox) -> Ordering {
    a.volume()
        .total_cmp(&b.volume())
        .then_with(|| b.max_weight.total_cmp(&a.max_weight))
}

pub fn select_box(boxes: &[PackagingBox], products: &[Product]) -> Result<PackagingBox> {
    if boxes.is_empty() {
        return Err(PackingError::not_found("No box available"));
    }

    let extent = ShipmentExtent::of(products);
    boxes
        .iter()
        .filter(|b| extent.fits_in(b))
        .min_by(|a, b| rank(a, b))
        .cloned()
        .ok_or_else(PackingError::not_found_default)
}

/// Deterministic fallback over the local catalog.
pub struct LocalVolumetricStrategy {
    catalog: Arc<dyn BoxCatalog>,
}

impl LocalVolumetricStrategy {
    pub fn new(catalog: Arc<dyn BoxCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl PackStrategy for LocalVolumetricStrategy {
    fn name(&self) -> &str {
        "local-volumetric"
    }

    async fn pack(&self, products: &[Product]) -> Result<PackagingBox> {
        let boxes = self.catalog.list_boxes().await.map_err(|e| {
            tracing::error!("Box catalog lookup failed: {}", e);
            PackingError::strategy_failure("Box catalog unavailable")
        })?;
        let selected = select_box(&boxes, products)?;
        tracing::debug!(
            "Local fallback selected box {} out of {} candidates",
            selected.id,
            boxes.len()
        );
        Ok(selected)
    }
}
