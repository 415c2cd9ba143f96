// src/strategies/dual_ma.rs
use crate::indicators::MovingAverage;
use crate::strategies::crossover::detect;
use crate::strategies::traits::{Evaluation, Strategy};
use crate::types::BarSeries;

/// Short moving average crossing a long one, e.g. EMA(12) over EMA(26).
pub struct DualMaCrossover {
    short: MovingAverage,
    long: MovingAverage,
}

impl DualMaCrossover {
    pub fn new(short: MovingAverage, long: MovingAverage) -> Self {
        Self { short, long }
    }
}

impl Strategy for DualMaCrossover {
    fn name(&self) -> String {
        format!("{} / {} crossover", self.short, self.long)
    }

    fn required_history(&self) -> usize {
        self.short.window.max(self.long.window)
    }

    fn evaluate(&self, bars: &BarSeries) -> Evaluation {
        let short = self.short.compute(bars);
        let long = self.long.compute(bars);

        Evaluation {
            crossover: detect(short.values(), long.values()),
            fast_label: self.short.to_string(),
            fast: short.last(),
            slow_label: self.long.to_string(),
            slow: long.last(),
        }
    }
}
