//! Sources of live system indicators.

use async_trait::async_trait;
use synth_types::SystemIndicators;

use crate::error::GenerationResult;

/// Supplies the current cache hit rate and load to the state-aware strategy
/// when the caller did not pass indicators explicitly.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn current(&self) -> GenerationResult<SystemIndicators>;
}

/// Fixed indicators, e.g. from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIndicators {
    indicators: SystemIndicators,
}

impl StaticIndicators {
    pub fn new(indicators: SystemIndicators) -> Self {
        Self {
            indicators: indicators.clamped(),
        }
    }
}

#[async_trait]
impl IndicatorSource for StaticIndicators {
    async fn current(&self) -> GenerationResult<SystemIndicators> {
        Ok(self.indicators)
    }
}
