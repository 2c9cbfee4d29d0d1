pub mod chain;

pub use crate::domain::model::{PackedResult, Product};
pub use crate::domain::ports::PackStrategy;
pub use crate::utils::error::Result;
pub use chain::{StrategyChain, StrategyChainBuilder};
