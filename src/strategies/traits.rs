// src/strategies/traits.rs
use crate::strategies::crossover::Crossover;
use crate::types::BarSeries;

/// Latest indicator readings plus the crossover they produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub crossover: Crossover,
    pub fast_label: String,
    pub fast: Option<f64>,
    pub slow_label: String,
    pub slow: Option<f64>,
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> String;

    // Bars needed before any reading is trusted
    fn required_history(&self) -> usize;

    // Pure function of the bars; no state carried between cycles
    fn evaluate(&self, bars: &BarSeries) -> Evaluation;
}
