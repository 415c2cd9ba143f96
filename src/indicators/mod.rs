// src/indicators/mod.rs
//! Moving averages over a [`BarSeries`].
//!
//! Every function returns one value per input bar. Indices where an average
//! is not yet defined hold `f64::NAN`.

use crate::types::BarSeries;
use serde::Deserialize;
use std::fmt;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AverageKind {
    Sma,
    Ema,
}

/// A configured moving average, e.g. `EMA(12)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverage {
    pub kind: AverageKind,
    pub window: usize,
}

impl MovingAverage {
    pub fn sma(window: usize) -> Self {
        Self {
            kind: AverageKind::Sma,
            window,
        }
    }

    pub fn ema(window: usize) -> Self {
        Self {
            kind: AverageKind::Ema,
            window,
        }
    }

    pub fn compute(&self, bars: &BarSeries) -> IndicatorSeries {
        match self.kind {
            AverageKind::Sma => sma(bars, self.window),
            AverageKind::Ema => ema(bars, self.window),
        }
    }
}

impl fmt::Display for MovingAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            AverageKind::Sma => "SMA",
            AverageKind::Ema => "EMA",
        };
        write!(f, "{}({})", name, self.window)
    }
}

/// Indicator values aligned 1:1 with the bars they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, `None` when out of range or not yet defined.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().filter(|v| !v.is_nan())
    }

    pub fn last(&self) -> Option<f64> {
        self.values.len().checked_sub(1).and_then(|i| self.get(i))
    }
}

/// Simple moving average: mean of the `window` closes ending at each index.
///
/// Each window is averaged from scratch as offsets from its newest close, so
/// a run of identical closes yields exactly that close and two averages over
/// the same flat run compare equal.
pub fn sma(bars: &BarSeries, window: usize) -> IndicatorSeries {
    if window == 0 {
        return IndicatorSeries::default();
    }

    let closes = bars.closes();
    let values = (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                return f64::NAN;
            }
            let anchor = closes[i];
            let offset: f64 = closes[i + 1 - window..=i].iter().map(|c| c - anchor).sum();
            anchor + offset / window as f64
        })
        .collect();

    IndicatorSeries { values }
}

/// Exponential moving average with `alpha = 2 / (window + 1)`.
///
/// Seeded with the first close rather than an initial SMA, so early values
/// lean toward the first observed price until enough history has passed.
/// Downstream signals depend on this seeding; do not switch it to the
/// SMA-seeded form.
pub fn ema(bars: &BarSeries, window: usize) -> IndicatorSeries {
    let mut indicator = match ExponentialMovingAverage::new(window) {
        Ok(indicator) => indicator,
        Err(_) => return IndicatorSeries::default(),
    };

    let values = bars.bars().iter().map(|bar| indicator.next(bar.close)).collect();

    IndicatorSeries { values }
}
