pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{PackingComponents, PackingService};
pub use config::PackerConfig;
pub use crate::core::StrategyChain;
pub use domain::fingerprint::FingerprintDeriver;
pub use domain::model::{PackRequest, PackagingBox, PackedResult, Product};
pub use utils::error::{ErrorResponse, PackingError, Result};
