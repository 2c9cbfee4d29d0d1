//! Ordered fallback over packing strategies.
//!
//! A `StrategyFailure` moves on to the next strategy. Decisive errors and
//! anything unexpected stop the chain and reach the caller unchanged.

use crate::domain::model::{PackedResult, Product};
use crate::domain::ports::PackStrategy;
use crate::utils::error::{PackingError, Result};

pub struct StrategyChain {
    strategies: Vec<Box<dyn PackStrategy>>,
}

impl StrategyChain {
    pub fn builder() -> StrategyChainBuilder {
        StrategyChainBuilder::default()
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn calculate(&self, products: &[Product]) -> Result<PackedResult> {
        for (position, strategy) in self.strategies.iter().enumerate() {
            tracing::debug!(
                "Trying strategy {}/{}: {}",
                position + 1,
                self.strategies.len(),
                strategy.name()
            );

            match strategy.pack(products).await {
                Ok(packaging) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        packaging_id = packaging.id,
                        "Packaging selected"
                    );
                    return Ok(PackedResult::from_packaging(&packaging, products));
                }
                Err(PackingError::StrategyFailure { message }) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        "Strategy could not answer, trying next: {}",
                        message
                    );
                }
                Err(e) => {
                    if e.is_decisive() {
                        tracing::info!(strategy = strategy.name(), "Shipment cannot be packed: {}", e);
                    } else {
                        tracing::error!(strategy = strategy.name(), "Strategy aborted the chain: {}", e);
                    }
                    return Err(e);
                }
            }
        }

        tracing::warn!("All packing strategies exhausted");
        Err(PackingError::StrategyChainExhausted)
    }
}

#[derive(Default)]
pub struct StrategyChainBuilder {
    strategies: Vec<Box<dyn PackStrategy>>,
}

impl StrategyChainBuilder {
    /// Strategies are tried in the order they are added.
    pub fn with_strategy<S: PackStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn build(self) -> Result<StrategyChain> {
        if self.strategies.is_empty() {
            return Err(PackingError::ConfigError {
                message: "a strategy chain needs at least one strategy".to_string(),
            });
        }
        Ok(StrategyChain {
            strategies: self.strategies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PackagingBox;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Outcome {
        Box(PackagingBox),
        Fail,
        MultipleBins,
        NotFound,
        DataSource,
    }

    struct ScriptedStrategy {
        name: &'static str,
        outcome: Outcome,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedStrategy {
        fn new(name: &'static str, outcome: Outcome) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    outcome,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl PackStrategy for ScriptedStrategy {
        fn name(&self) -> &str {
            self.name
        }

        async fn pack(&self, _products: &[Product]) -> Result<PackagingBox> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Box(packaging) => Ok(packaging.clone()),
                Outcome::Fail => Err(PackingError::strategy_failure("api down")),
                Outcome::MultipleBins => Err(PackingError::multiple_bins(2)),
                Outcome::NotFound => Err(PackingError::not_found("Product ID: 1 - cannot be packed")),
                Outcome::DataSource => Err(PackingError::data_source("catalog offline")),
            }
        }
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new(1, 5.0, 5.0, 5.0, 12.0).unwrap(),
            Product::new(2, 5.0, 5.0, 5.0, 8.0).unwrap(),
        ]
    }

    fn large_box() -> PackagingBox {
        PackagingBox::new(4, 50.0, 50.0, 50.0, 200.0)
    }

    #[tokio::test]
    async fn test_first_success_is_returned_with_shipment_weight() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::Box(large_box()));
        let (second, second_calls) = ScriptedStrategy::new("second", Outcome::Fail);
        let chain = StrategyChain::builder()
            .with_strategy(first)
            .with_strategy(second)
            .build()
            .unwrap();

        let result = chain.calculate(&products()).await.unwrap();

        assert_eq!(
            result,
            PackedResult {
                width: 50.0,
                height: 50.0,
                length: 50.0,
                weight: 20.0
            }
        );
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_strategy_failure_falls_back() {
        let (first, first_calls) = ScriptedStrategy::new("first", Outcome::Fail);
        let (second, second_calls) = ScriptedStrategy::new("second", Outcome::Box(large_box()));
        let chain = StrategyChain::builder()
            .with_strategy(first)
            .with_strategy(second)
            .build()
            .unwrap();

        let result = chain.calculate(&products()).await.unwrap();

        assert_eq!(result.width, 50.0);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_multiple_bins_aborts_chain() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::MultipleBins);
        let (second, second_calls) = ScriptedStrategy::new("second", Outcome::Box(large_box()));
        let chain = StrategyChain::builder()
            .with_strategy(first)
            .with_strategy(second)
            .build()
            .unwrap();

        let err = chain.calculate(&products()).await.unwrap_err();

        assert!(matches!(err, PackingError::MultipleBinsNotSupported { .. }));
        assert_eq!(
            err.to_string(),
            "Multiple bins (2) were returned, but only one bin is supported at the moment"
        );
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_found_aborts_chain() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::NotFound);
        let (second, second_calls) = ScriptedStrategy::new("second", Outcome::Box(large_box()));
        let chain = StrategyChain::builder()
            .with_strategy(first)
            .with_strategy(second)
            .build()
            .unwrap();

        let err = chain.calculate(&products()).await.unwrap_err();

        assert_eq!(err.error_code(), "suitable-package-not-found");
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unexpected_error_aborts_chain() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::DataSource);
        let (second, second_calls) = ScriptedStrategy::new("second", Outcome::Box(large_box()));
        let chain = StrategyChain::builder()
            .with_strategy(first)
            .with_strategy(second)
            .build()
            .unwrap();

        let err = chain.calculate(&products()).await.unwrap_err();

        assert_eq!(err.error_code(), "unexpected-error");
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failures_exhaust_chain() {
        let (first, first_calls) = ScriptedStrategy::new("first", Outcome::Fail);
        let (second, second_calls) = ScriptedStrategy::new("second", Outcome::Fail);
        let chain = StrategyChain::builder()
            .with_strategy(first)
            .with_strategy(second)
            .build()
            .unwrap();

        let err = chain.calculate(&products()).await.unwrap_err();

        assert!(matches!(err, PackingError::StrategyChainExhausted));
        assert_eq!(err.error_code(), "packing-not-applicable");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_chain_order_and_empty_builder() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::Fail);
        let (second, _) = ScriptedStrategy::new("second", Outcome::Fail);
        let chain = StrategyChain::builder()
            .with_strategy(first)
            .with_strategy(second)
            .build()
            .unwrap();
        assert_eq!(chain.strategy_names(), vec!["first", "second"]);

        assert!(StrategyChain::builder().build().is_err());
    }

    #[test]
    fn test_calculate_blocking() {
        let (only, _) = ScriptedStrategy::new("only", Outcome::Box(large_box()));
        let chain = StrategyChain::builder().with_strategy(only).build().unwrap();

        let result = tokio_test::block_on(chain.calculate(&products())).unwrap();

        assert_eq!(result.weight, 20.0);
    }
}
