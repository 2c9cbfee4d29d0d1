pub mod service;
pub mod strategies;

pub use service::{assemble_chain, build_strategy_chain, PackingComponents, PackingService};
