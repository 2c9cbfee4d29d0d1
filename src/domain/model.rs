use crate::utils::error::{PackingError, Result};
use crate::utils::validation::{validate_positive_measure, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product to ship. Construct through [`Product::new`] to get a validated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub weight: f64,
}

impl Product {
    pub fn new(id: u64, width: f64, height: f64, length: f64, weight: f64) -> Result<Self> {
        let product = Self {
            id,
            width,
            height,
            length,
            weight,
        };
        product.validate()?;
        Ok(product)
    }

    pub fn dimensions(&self) -> [f64; 3] {
        [self.width, self.height, self.length]
    }
}

impl Validate for Product {
    fn validate(&self) -> Result<()> {
        if self.id == 0 {
            return Err(PackingError::ValidationError {
                field: "id".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        validate_positive_measure("width", self.width)?;
        validate_positive_measure("height", self.height)?;
        validate_positive_measure("length", self.length)?;
        validate_positive_measure("weight", self.weight)
    }
}

/// Inbound request body: `{"products": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    pub products: Vec<Product>,
}

impl PackRequest {
    pub fn from_json(raw: &str) -> Result<Self> {
        let request: PackRequest = serde_json::from_str(raw)?;
        request.validate()?;
        Ok(request)
    }
}

impl Validate for PackRequest {
    fn validate(&self) -> Result<()> {
        if self.products.is_empty() {
            return Err(PackingError::ValidationError {
                field: "products".to_string(),
                message: "at least one product is required".to_string(),
            });
        }
        for (index, product) in self.products.iter().enumerate() {
            product.validate().map_err(|e| match e {
                PackingError::ValidationError { field, message } => {
                    PackingError::ValidationError {
                        field: format!("products[{}].{}", index, field),
                        message,
                    }
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// A catalog box ("packaging").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagingBox {
    pub id: u64,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub max_weight: f64,
}

impl PackagingBox {
    pub fn new(id: u64, width: f64, height: f64, length: f64, max_weight: f64) -> Self {
        Self {
            id,
            width,
            height,
            length,
            max_weight,
        }
    }

    pub fn volume(&self) -> f64 {
        self.width * self.height * self.length
    }

    pub fn can_carry(&self, weight: f64) -> bool {
        self.max_weight >= weight
    }

    /// Boxes with the same geometry and capacity are interchangeable.
    pub fn same_geometry(&self, other: &PackagingBox) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.length == other.length
            && self.max_weight == other.max_weight
    }
}

/// The selected box dimensions plus the shipment's own weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedResult {
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub weight: f64,
}

impl PackedResult {
    pub fn from_packaging(packaging: &PackagingBox, products: &[Product]) -> Self {
        Self {
            width: packaging.width,
            height: packaging.height,
            length: packaging.length,
            weight: total_weight(products),
        }
    }
}

/// Durable memo of a resolved fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingRecord {
    pub fingerprint: String,
    pub packaging: PackagingBox,
    pub created_at: DateTime<Utc>,
}

impl PackingRecord {
    pub fn new(fingerprint: String, packaging: PackagingBox) -> Self {
        Self {
            fingerprint,
            packaging,
            created_at: Utc::now(),
        }
    }
}

pub fn total_weight(products: &[Product]) -> f64 {
    products.iter().map(|p| p.weight).sum()
}
