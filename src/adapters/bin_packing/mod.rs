pub mod client;
pub mod payload;
pub mod response;

pub use client::BinPackingClient;
pub use payload::ShipmentPayload;
pub use response::{resolve_packed_bin, PackingResponse};
