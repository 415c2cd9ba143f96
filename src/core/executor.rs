// src/core/executor.rs
//! Position-gated order decisions.
//!
//! Holdings are re-read from the broker every cycle and the state below is
//! inferred from them, so the executor itself keeps nothing between cycles.

use crate::strategies::crossover::Crossover;
use crate::types::{OrderIntent, Side};
use crate::utils::precision::normalize_quantity;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
    /// Negative holdings. Never opened by this bot and never acted upon.
    Short,
}

impl PositionState {
    pub fn from_quantity(quantity: Decimal) -> Self {
        if quantity.is_zero() {
            PositionState::Flat
        } else if quantity.is_sign_positive() {
            PositionState::Long
        } else {
            PositionState::Short
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PositionState::Flat => "FLAT",
            PositionState::Long => "LONG",
            PositionState::Short => "SHORT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EnterLong,
    ExitLong,
    NoAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub intent: Option<OrderIntent>,
    /// State the account should be in once the intent, if any, is filled.
    pub next_state: PositionState,
    pub reason: String,
}

impl Decision {
    fn hold(state: PositionState, reason: impl Into<String>) -> Self {
        Self {
            action: Action::NoAction,
            intent: None,
            next_state: state,
            reason: reason.into(),
        }
    }
}

/// Maps a crossover plus current holdings to at most one order.
#[derive(Debug, Clone)]
pub struct PositionGatedExecutor {
    symbol: String,
    quantity: Decimal,
    step_size: Decimal,
}

impl PositionGatedExecutor {
    pub fn new(symbol: impl Into<String>, quantity: Decimal, step_size: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            step_size,
        }
    }

    /// The fixed order size after rounding down to the step size.
    pub fn order_quantity(&self) -> Decimal {
        normalize_quantity(self.quantity, self.step_size)
    }

    pub fn decide(&self, held: Decimal, signal: Crossover) -> Decision {
        let state = PositionState::from_quantity(held);

        let (action, side, next_state) = match (state, signal) {
            (PositionState::Flat, Crossover::Bullish) => {
                (Action::EnterLong, Side::Buy, PositionState::Long)
            }
            (PositionState::Long, Crossover::Bearish) => {
                (Action::ExitLong, Side::Sell, PositionState::Flat)
            }
            (PositionState::Short, _) => {
                return Decision::hold(state, "short position is not managed by this bot")
            }
            (_, Crossover::None) => return Decision::hold(state, "no crossover"),
            (PositionState::Flat, Crossover::Bearish) => {
                return Decision::hold(state, "bearish crossover while flat")
            }
            (PositionState::Long, Crossover::Bullish) => {
                return Decision::hold(state, "bullish crossover while already long")
            }
        };

        let quantity = self.order_quantity();
        if quantity <= Decimal::ZERO {
            return Decision::hold(
                state,
                format!(
                    "order quantity {} rounds to zero at step {}",
                    self.quantity, self.step_size
                ),
            );
        }

        Decision {
            action,
            intent: Some(OrderIntent {
                symbol: self.symbol.clone(),
                quantity,
                side,
            }),
            next_state,
            reason: format!("{} crossover while {}", signal, state),
        }
    }
}
