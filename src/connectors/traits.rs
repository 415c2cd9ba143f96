// src/connectors/traits.rs
use crate::error::BrokerError;
use crate::types::{BarSeries, OrderIntent, OrderResponse, Position, Timeframe};
use async_trait::async_trait;

/// Account and market data capability the polling loop depends on.
///
/// Implementations report failures as errors; the engine turns them into safe
/// defaults (flat position, empty series, unsubmitted order).
#[async_trait]
pub trait Broker: Send + Sync {
    fn name(&self) -> &'static str;

    /// Current holdings. A missing position is `Ok` with zero quantity.
    async fn fetch_position(&self, symbol: &str) -> Result<Position, BrokerError>;

    /// Up to `lookback` most recent closed bars, oldest first.
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarSeries, BrokerError>;

    /// Submits a market order. Does not wait for a fill.
    async fn submit_order(&self, intent: &OrderIntent) -> Result<OrderResponse, BrokerError>;
}
