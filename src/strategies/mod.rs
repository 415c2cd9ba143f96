// src/strategies/mod.rs
pub mod crossover;
pub mod dual_ma;
pub mod price_ma;
pub mod traits;

use crate::config::{StrategyConfig, StrategyKind};
use crate::indicators::MovingAverage;
use dual_ma::DualMaCrossover;
use price_ma::PriceMaCrossover;
use traits::Strategy;

/// Builds the configured strategy. The config is expected to be validated.
pub fn from_config(config: &StrategyConfig) -> Box<dyn Strategy> {
    let average = |window| MovingAverage {
        kind: config.average,
        window,
    };

    match config.kind {
        StrategyKind::DualMa => Box::new(DualMaCrossover::new(
            average(config.short_window),
            average(config.long_window),
        )),
        StrategyKind::PriceMa => Box::new(PriceMaCrossover::new(average(config.long_window))),
    }
}
