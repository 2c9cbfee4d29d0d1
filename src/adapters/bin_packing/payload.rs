use crate::domain::model::{PackagingBox, Product};
use serde::Serialize;
use serde_json::{Map, Value};

/// Each product is sent as its own line item.
const ITEM_QUANTITY: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ShipmentPayload {
    pub username: String,
    pub api_key: String,
    pub bins: Vec<BinPayload>,
    pub items: Vec<ItemPayload>,
    pub params: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinPayload {
    pub id: String,
    pub w: f64,
    pub h: f64,
    pub d: f64,
    pub max_wg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPayload {
    pub id: String,
    pub w: f64,
    pub h: f64,
    pub d: f64,
    pub wg: f64,
    pub q: u32,
}

impl ShipmentPayload {
    /// Credentials are filled in by the client right before sending.
    pub fn new(boxes: &[PackagingBox], products: &[Product]) -> Self {
        Self {
            username: String::new(),
            api_key: String::new(),
            bins: boxes.iter().map(BinPayload::from).collect(),
            items: products.iter().map(ItemPayload::from).collect(),
            params: Map::new(),
        }
    }

    pub fn with_auth(mut self, username: &str, api_key: &str) -> Self {
        self.username = username.to_string();
        self.api_key = api_key.to_string();
        self
    }
}

impl From<&PackagingBox> for BinPayload {
    fn from(packaging: &PackagingBox) -> Self {
        Self {
            id: packaging.id.to_string(),
            w: packaging.width,
            h: packaging.height,
            d: packaging.length,
            max_wg: packaging.max_weight,
        }
    }
}

impl From<&Product> for ItemPayload {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            w: product.width,
            h: product.height,
            d: product.length,
            wg: product.weight,
            q: ITEM_QUANTITY,
        }
    }
}
