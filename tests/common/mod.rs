#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use crossover_bot::config::AppConfig;
use crossover_bot::connectors::traits::Broker;
use crossover_bot::core::clock::Clock;
use crossover_bot::error::BrokerError;
use crossover_bot::types::{Bar, BarSeries, OrderIntent, OrderResponse, Position, Timeframe};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

pub fn make_bars(prices: &[f64]) -> BarSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
    BarSeries::new(
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar::new(start + ChronoDuration::hours(i as i64), close))
            .collect(),
    )
}

/// Settings for a dual SMA(2)/SMA(4) bot trading one share of AAPL.
pub fn sma_config() -> AppConfig {
    AppConfig::from_toml_str(
        r#"
        symbol = "AAPL"
        lookback = 10
        poll_interval_secs = 60

        [strategy]
        kind = "dual_ma"
        average = "sma"
        short_window = 2
        long_window = 4

        [broker]
        api_key = "test-key"
        secret_key = "test-secret"
        "#,
    )
    .unwrap()
}

#[derive(Default)]
struct FakeState {
    position: Option<Decimal>,
    bars: VecDeque<BarSeries>,
    fail_position: bool,
    fail_bars: bool,
    fail_orders: bool,
    fills_update_position: bool,
    orders: Vec<OrderIntent>,
    bar_requests: Vec<(String, Timeframe, usize)>,
}

/// In-memory broker. Clones share state so tests can inspect it after the
/// engine takes ownership of one handle.
#[derive(Clone, Default)]
pub struct FakeBroker {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(self, quantity: Decimal) -> Self {
        self.state.lock().unwrap().position = Some(quantity);
        self
    }

    /// Queues a series to return; the last queued series is repeated.
    pub fn push_bars(self, bars: BarSeries) -> Self {
        self.state.lock().unwrap().bars.push_back(bars);
        self
    }

    pub fn failing_position(self) -> Self {
        self.state.lock().unwrap().fail_position = true;
        self
    }

    pub fn failing_bars(self) -> Self {
        self.state.lock().unwrap().fail_bars = true;
        self
    }

    pub fn failing_orders(self) -> Self {
        self.state.lock().unwrap().fail_orders = true;
        self
    }

    /// Accepted orders immediately change the held quantity.
    pub fn instant_fills(self) -> Self {
        self.state.lock().unwrap().fills_update_position = true;
        self
    }

    pub fn orders(&self) -> Vec<OrderIntent> {
        self.state.lock().unwrap().orders.clone()
    }

    pub fn position(&self) -> Decimal {
        self.state.lock().unwrap().position.unwrap_or_default()
    }

    pub fn bar_requests(&self) -> Vec<(String, Timeframe, usize)> {
        self.state.lock().unwrap().bar_requests.clone()
    }
}

#[async_trait]
impl Broker for FakeBroker {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_position(&self, symbol: &str) -> Result<Position, BrokerError> {
        let state = self.state.lock().unwrap();
        if state.fail_position {
            return Err(BrokerError::Api {
                status: 500,
                body: "position service down".into(),
            });
        }
        Ok(Position {
            symbol: symbol.to_string(),
            quantity: state.position.unwrap_or_default(),
        })
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarSeries, BrokerError> {
        let mut state = self.state.lock().unwrap();
        state
            .bar_requests
            .push((symbol.to_string(), timeframe, lookback));
        if state.fail_bars {
            return Err(BrokerError::InvalidResponse("garbled bars".into()));
        }
        let bars = if state.bars.len() > 1 {
            state.bars.pop_front().unwrap_or_default()
        } else {
            state.bars.front().cloned().unwrap_or_default()
        };
        Ok(bars)
    }

    async fn submit_order(&self, intent: &OrderIntent) -> Result<OrderResponse, BrokerError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_orders {
            return Err(BrokerError::Api {
                status: 403,
                body: "insufficient buying power".into(),
            });
        }
        state.orders.push(intent.clone());
        if state.fills_update_position {
            let held = state.position.unwrap_or_default();
            state.position = Some(match intent.side {
                crossover_bot::types::Side::Buy => held + intent.quantity,
                crossover_bot::types::Side::Sell => held - intent.quantity,
            });
        }
        Ok(OrderResponse {
            id: format!("order-{}", state.orders.len()),
            client_order_id: None,
            symbol: intent.symbol.clone(),
            status: "accepted".into(),
        })
    }
}

/// Clock whose sleeps return immediately. Fires `stop` once `stop_after`
/// sleeps have happened.
pub struct InstantClock {
    now: DateTime<Utc>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
    stop_after: usize,
    stop: Mutex<Option<oneshot::Sender<()>>>,
}

impl InstantClock {
    pub fn new(stop_after: usize) -> (Self, oneshot::Receiver<()>, Arc<Mutex<Vec<Duration>>>) {
        let (tx, rx) = oneshot::channel();
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        let clock = Self {
            now: Utc.with_ymd_and_hms(2024, 1, 3, 15, 0, 0).unwrap(),
            sleeps: sleeps.clone(),
            stop_after,
            stop: Mutex::new(Some(tx)),
        };
        (clock, rx, sleeps)
    }
}

#[async_trait]
impl Clock for InstantClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            sleeps.len()
        };
        if count >= self.stop_after {
            if let Some(tx) = self.stop.lock().unwrap().take() {
                let _ = tx.send(());
            }
        }
    }
}
