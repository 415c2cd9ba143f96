// src/strategies/price_ma.rs
use crate::indicators::MovingAverage;
use crate::strategies::crossover::detect;
use crate::strategies::traits::{Evaluation, Strategy};
use crate::types::BarSeries;

/// Close price crossing a single moving average.
pub struct PriceMaCrossover {
    average: MovingAverage,
}

impl PriceMaCrossover {
    pub fn new(average: MovingAverage) -> Self {
        Self { average }
    }
}

impl Strategy for PriceMaCrossover {
    fn name(&self) -> String {
        format!("price / {} crossover", self.average)
    }

    fn required_history(&self) -> usize {
        self.average.window
    }

    fn evaluate(&self, bars: &BarSeries) -> Evaluation {
        let closes = bars.closes();
        let average = self.average.compute(bars);

        Evaluation {
            crossover: detect(&closes, average.values()),
            fast_label: "price".to_string(),
            fast: closes.last().copied(),
            slow_label: self.average.to_string(),
            slow: average.last(),
        }
    }
}
