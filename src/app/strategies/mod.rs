pub mod cacheable;
pub mod fallback;
pub mod persisting;
pub mod remote;

pub use cacheable::CacheableStrategy;
pub use fallback::{select_box, LocalVolumetricStrategy, ShipmentExtent};
pub use persisting::PersistingStrategy;
pub use remote::RemotePackingStrategy;

use crate::domain::ports::{PackStrategy, PackingResultStore, ResultCache};
use std::sync::Arc;
use std::time::Duration;

/// Composition helpers so layering reads left to right:
/// `remote.persisted(store).cached(cache, ttl)`.
pub trait StrategyExt: PackStrategy + Sized {
    fn persisted(self, store: Arc<dyn PackingResultStore>) -> PersistingStrategy<Self> {
        PersistingStrategy::new(self, store)
    }

    fn cached(self, cache: Arc<dyn ResultCache>, ttl: Duration) -> CacheableStrategy<Self> {
        CacheableStrategy::new(self, cache, ttl)
    }
}

impl<S: PackStrategy + Sized> StrategyExt for S {}
