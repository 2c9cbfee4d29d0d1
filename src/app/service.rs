//! Wires adapters into the production strategy chain.
//!
//! Order: remote API (persisted, then cached) followed by the local
//! volumetric fallback (persisted). Both persistence layers share the store.

use crate::adapters::bin_packing::BinPackingClient;
use crate::adapters::cache::{FilesystemCache, InMemoryCache};
use crate::adapters::catalog::{SqliteBoxCatalog, StaticBoxCatalog};
use crate::adapters::store::SqlitePackingResultStore;
use crate::adapters::SqliteDatabase;
use crate::app::strategies::{LocalVolumetricStrategy, RemotePackingStrategy, StrategyExt};
use crate::config::{CatalogSource, PackerConfig};
use crate::core::StrategyChain;
use crate::domain::model::{PackRequest, PackedResult};
use crate::domain::ports::{BoxCatalog, PackingResultStore, ResultCache};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;
use std::time::Duration;

pub struct PackingComponents {
    pub catalog: Arc<dyn BoxCatalog>,
    pub store: Arc<dyn PackingResultStore>,
    pub cache: Arc<dyn ResultCache>,
    pub client: BinPackingClient,
    pub cache_ttl: Duration,
}

pub fn assemble_chain(components: PackingComponents) -> Result<StrategyChain> {
    let PackingComponents {
        catalog,
        store,
        cache,
        client,
        cache_ttl,
    } = components;

    let remote = RemotePackingStrategy::new(client, catalog.clone())
        .persisted(store.clone())
        .cached(cache, cache_ttl);
    let local = LocalVolumetricStrategy::new(catalog).persisted(store);

    StrategyChain::builder()
        .with_strategy(remote)
        .with_strategy(local)
        .build()
}

pub fn build_strategy_chain(config: &PackerConfig) -> Result<StrategyChain> {
    let db = match &config.storage.database_path {
        Some(path) => {
            tracing::info!("Opening packing database at {}", path);
            SqliteDatabase::open(path)?
        }
        None => {
            tracing::warn!("No storage.database_path configured, packing results will not survive restarts");
            SqliteDatabase::in_memory()?
        }
    };

    let catalog: Arc<dyn BoxCatalog> = match config.catalog.source {
        CatalogSource::Database => Arc::new(SqliteBoxCatalog::new(db.clone())),
        CatalogSource::Static => match config.static_boxes() {
            Some(boxes) => Arc::new(StaticBoxCatalog::new(boxes)),
            None => Arc::new(StaticBoxCatalog::default()),
        },
    };

    let cache: Arc<dyn ResultCache> = match &config.cache.directory {
        Some(dir) => Arc::new(FilesystemCache::new(dir)),
        None => Arc::new(InMemoryCache::with_capacity(config.cache.max_entries)),
    };

    let chain = assemble_chain(PackingComponents {
        catalog,
        store: Arc::new(SqlitePackingResultStore::new(db)),
        cache,
        client: BinPackingClient::new(&config.api)?,
        cache_ttl: config.cache_ttl(),
    })?;

    tracing::debug!("Strategy chain: {}", chain.strategy_names().join(" -> "));
    Ok(chain)
}

/// Validates the request and runs it through the chain.
pub struct PackingService {
    chain: StrategyChain,
}

impl PackingService {
    pub fn new(chain: StrategyChain) -> Self {
        Self { chain }
    }

    pub fn from_config(config: &PackerConfig) -> Result<Self> {
        Ok(Self::new(build_strategy_chain(config)?))
    }

    pub async fn handle(&self, request: &PackRequest) -> Result<PackedResult> {
        request.validate()?;
        tracing::info!("Packing {} product(s)", request.products.len());
        self.chain.calculate(&request.products).await
    }
}
