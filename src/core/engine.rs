// src/core/engine.rs
use crate::config::AppConfig;
use crate::connectors::traits::Broker;
use crate::core::clock::Clock;
use crate::core::executor::{Action, PositionGatedExecutor, PositionState};
use crate::error::SkipReason;
use crate::strategies::crossover::Crossover;
use crate::strategies::traits::Strategy;
use crate::types::{BarSeries, OrderIntent, OrderResponse, Timeframe};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Skipped(SkipReason),
    NoAction {
        state: PositionState,
        signal: Crossover,
        reason: String,
    },
    Submitted {
        action: Action,
        intent: OrderIntent,
        response: OrderResponse,
        next_state: PositionState,
    },
    SubmitFailed {
        action: Action,
        intent: OrderIntent,
        reason: String,
    },
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            CycleOutcome::NoAction {
                state,
                signal,
                reason,
            } => write!(f, "no action ({} / {}): {}", state, signal, reason),
            CycleOutcome::Submitted {
                action,
                intent,
                response,
                next_state,
            } => write!(
                f,
                "{:?}: submitted {} as order {} [{}], expecting {}",
                action, intent, response.id, response.status, next_state
            ),
            CycleOutcome::SubmitFailed {
                action,
                intent,
                reason,
            } => write!(f, "{:?}: order {} failed: {}", action, intent, reason),
        }
    }
}

/// What one polling cycle saw and did.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub at: DateTime<Utc>,
    pub symbol: String,
    pub position: Decimal,
    pub bars: usize,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub fn action(&self) -> Action {
        match &self.outcome {
            CycleOutcome::Submitted { action, .. } | CycleOutcome::SubmitFailed { action, .. } => {
                *action
            }
            _ => Action::NoAction,
        }
    }

    pub fn intent(&self) -> Option<&OrderIntent> {
        match &self.outcome {
            CycleOutcome::Submitted { intent, .. } | CycleOutcome::SubmitFailed { intent, .. } => {
                Some(intent)
            }
            _ => None,
        }
    }
}

/// Single-threaded polling loop: fetch, compute, decide, act, sleep.
pub struct TradingEngine {
    symbol: String,
    timeframe: Timeframe,
    lookback: usize,
    poll_interval: Duration,
    broker: Box<dyn Broker>,
    strategy: Box<dyn Strategy>,
    executor: PositionGatedExecutor,
    clock: Box<dyn Clock>,
}

impl TradingEngine {
    pub fn new(
        config: &AppConfig,
        broker: Box<dyn Broker>,
        strategy: Box<dyn Strategy>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            symbol: config.symbol.clone(),
            timeframe: config.timeframe,
            lookback: config.lookback,
            poll_interval: config.poll_interval(),
            broker,
            strategy,
            executor: PositionGatedExecutor::new(
                config.symbol.clone(),
                config.order.quantity,
                config.order.step_size,
            ),
            clock,
        }
    }

    /// Runs cycles until `shutdown` resolves, returning how many ran.
    ///
    /// Shutdown is only observed between cycles, so an order submission is
    /// never interrupted.
    pub async fn run<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            "Engine starting: {} on {} via {} (order size {}, every {:?})",
            self.strategy.name(),
            self.symbol,
            self.broker.name(),
            self.executor.order_quantity(),
            self.poll_interval
        );

        let mut cycles = 0;
        loop {
            self.run_cycle().await;
            cycles += 1;

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Trading bot stopped manually after {} cycles.", cycles);
                    break;
                }
                _ = self.clock.sleep(self.poll_interval) => {}
            }
        }

        cycles
    }

    pub async fn run_cycle(&self) -> CycleReport {
        let at = self.clock.now();

        let position = match self.broker.fetch_position(&self.symbol).await {
            Ok(pos) => pos.quantity,
            Err(e) => {
                warn!(
                    "Error fetching position for {}: {} (assuming flat)",
                    self.symbol, e
                );
                Decimal::ZERO
            }
        };
        info!("Current position for {}: {}", self.symbol, position);

        let bars = match self
            .broker
            .fetch_bars(&self.symbol, self.timeframe, self.lookback)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                warn!("Error fetching historical data for {}: {}", self.symbol, e);
                BarSeries::empty()
            }
        };

        let outcome = self.decide_and_act(position, &bars).await;

        match &outcome {
            CycleOutcome::Skipped(_) => warn!("{}: {}", self.symbol, outcome),
            CycleOutcome::SubmitFailed { .. } => error!("⚠️ {}: {}", self.symbol, outcome),
            _ => info!("{}: {}", self.symbol, outcome),
        }

        CycleReport {
            at,
            symbol: self.symbol.clone(),
            position,
            bars: bars.len(),
            outcome,
        }
    }

    async fn decide_and_act(&self, position: Decimal, bars: &BarSeries) -> CycleOutcome {
        if bars.is_empty() {
            return CycleOutcome::Skipped(SkipReason::DataUnavailable);
        }

        let need = self.strategy.required_history();
        if bars.len() < need {
            return CycleOutcome::Skipped(SkipReason::InsufficientHistory {
                have: bars.len(),
                need,
            });
        }

        let eval = self.strategy.evaluate(bars);
        info!(
            "Current {}: {} | Current {}: {} | signal {}",
            eval.fast_label,
            fmt_reading(eval.fast),
            eval.slow_label,
            fmt_reading(eval.slow),
            eval.crossover
        );

        let decision = self.executor.decide(position, eval.crossover);
        let Some(intent) = decision.intent else {
            return CycleOutcome::NoAction {
                state: PositionState::from_quantity(position),
                signal: eval.crossover,
                reason: decision.reason,
            };
        };

        info!("Placing {} ({})", intent, decision.reason);
        match self.broker.submit_order(&intent).await {
            Ok(response) => CycleOutcome::Submitted {
                action: decision.action,
                intent,
                response,
                next_state: decision.next_state,
            },
            Err(e) => CycleOutcome::SubmitFailed {
                action: decision.action,
                intent,
                reason: e.to_string(),
            },
        }
    }
}

fn fmt_reading(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}
