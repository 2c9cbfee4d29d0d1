//! Order-independent key for a shipment's product dimensions.
//!
//! Each product's (width, height, length) is sorted ascending, the resulting
//! triples are sorted by their comma-joined text, joined with `;`, hashed with
//! SHA-256 and prefixed with [`FINGERPRINT_PREFIX`]. Reordering products or
//! rotating any product yields the same key. Weights are not part of it.

use crate::domain::model::Product;
use sha2::{Digest, Sha256};

pub const FINGERPRINT_PREFIX: &str = "packing_";

const TRIPLE_SEPARATOR: &str = ",";
const PRODUCT_SEPARATOR: &str = ";";

#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintDeriver;

impl FingerprintDeriver {
    pub fn new() -> Self {
        Self
    }

    pub fn derive(&self, products: &[Product]) -> String {
        let mut triples: Vec<String> = products.iter().map(canonical_triple).collect();
        triples.sort();

        let mut hasher = Sha256::new();
        hasher.update(triples.join(PRODUCT_SEPARATOR).as_bytes());
        format!("{}{:x}", FINGERPRINT_PREFIX, hasher.finalize())
    }
}

fn canonical_triple(product: &Product) -> String {
    let mut dims = product.dimensions();
    dims.sort_by(f64::total_cmp);
    dims.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(TRIPLE_SEPARATOR)
}
