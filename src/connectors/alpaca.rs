// src/connectors/alpaca.rs
use crate::config::BrokerConfig;
use crate::connectors::messages::{
    AlpacaApiError, AlpacaBarsResponse, AlpacaOrder, AlpacaOrderRequest, AlpacaPosition,
};
use crate::connectors::traits::Broker;
use crate::core::clock::{Clock, SystemClock};
use crate::error::BrokerError;
use crate::types::{Bar, BarSeries, OrderIntent, OrderResponse, Position, Timeframe};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const PAPER_URL: &str = "https://paper-api.alpaca.markets";
const LIVE_URL: &str = "https://api.alpaca.markets";
const DATA_URL: &str = "https://data.alpaca.markets";

pub struct AlpacaClient {
    api_key: String,
    secret_key: String,
    http_client: Client,
    trading_url: String,
    data_url: String,
    data_delay: Duration,
    feed: Option<String>,
    clock: Arc<dyn Clock>,
}

impl AlpacaClient {
    pub fn from_config(config: &BrokerConfig) -> Self {
        let default_trading = if config.live_trading { LIVE_URL } else { PAPER_URL };
        Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            secret_key: config.secret_key.clone().unwrap_or_default(),
            http_client: Client::new(),
            trading_url: config
                .trading_url
                .clone()
                .unwrap_or_else(|| default_trading.to_string()),
            data_url: config
                .data_url
                .clone()
                .unwrap_or_else(|| DATA_URL.to_string()),
            data_delay: Duration::minutes(config.data_delay_minutes),
            feed: config.feed.clone(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the wall clock used to place the bars request window.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn trading_url(&self) -> &str {
        &self.trading_url
    }

    /// `(start, end)` of the next bars request, as RFC 3339 strings.
    fn request_window(&self, lookback: usize) -> (String, String) {
        bars_window(self.clock.now(), self.data_delay, lookback)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BrokerError> {
        let response = self.authed(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        Ok(response.json::<T>().await?)
    }
}

fn api_error(status: StatusCode, body: String) -> BrokerError {
    let body = serde_json::from_str::<AlpacaApiError>(&body)
        .map(|e| match e.code {
            Some(code) => format!("{} ({})", e.message, code),
            None => e.message,
        })
        .unwrap_or(body);

    BrokerError::Api {
        status: status.as_u16(),
        body,
    }
}

fn timeframe_param(timeframe: Timeframe) -> &'static str {
    match timeframe {
        Timeframe::Minute => "1Min",
        Timeframe::FiveMinutes => "5Min",
        Timeframe::FifteenMinutes => "15Min",
        Timeframe::Hour => "1Hour",
        Timeframe::Day => "1Day",
    }
}

/// Request window ending `delay` before `now` and spanning `lookback` days.
fn bars_window(now: DateTime<Utc>, delay: Duration, lookback: usize) -> (String, String) {
    let end = now - delay;
    let start = end - Duration::days(lookback as i64);
    (
        start.to_rfc3339_opts(SecondsFormat::Secs, true),
        end.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

#[async_trait]
impl Broker for AlpacaClient {
    fn name(&self) -> &'static str {
        "alpaca"
    }

    async fn fetch_position(&self, symbol: &str) -> Result<Position, BrokerError> {
        let url = format!("{}/v2/positions/{}", self.trading_url, symbol);

        match self.send::<AlpacaPosition>(self.http_client.get(&url)).await {
            Ok(pos) => Ok(Position {
                symbol: pos.symbol,
                quantity: pos.qty,
            }),
            Err(BrokerError::Api { status: 404, .. }) => Ok(Position::flat(symbol)),
            Err(e) => Err(e),
        }
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarSeries, BrokerError> {
        let url = format!("{}/v2/stocks/{}/bars", self.data_url, symbol);
        let (start, end) = self.request_window(lookback);

        let mut query = vec![
            ("timeframe", timeframe_param(timeframe).to_string()),
            ("start", start),
            ("end", end),
            ("limit", lookback.to_string()),
            // newest first so the limit keeps the most recent bars
            ("sort", "desc".to_string()),
        ];
        if let Some(feed) = &self.feed {
            query.push(("feed", feed.clone()));
        }

        let resp: AlpacaBarsResponse = self.send(self.http_client.get(&url).query(&query)).await?;

        let bars: Vec<Bar> = resp
            .bars
            .unwrap_or_default()
            .into_iter()
            .map(|b| Bar::new(b.timestamp, b.close))
            .collect();
        let received = bars.len();
        let series = BarSeries::new(bars);

        if series.len() != received {
            debug!(
                "Dropped {} invalid or duplicate bars for {}",
                received - series.len(),
                symbol
            );
        }
        if let (Some(first), Some(last)) = (series.bars().first(), series.last()) {
            debug!(
                "Retrieved {} bars for {}: {} {:.4} .. {} {:.4}",
                series.len(),
                symbol,
                first.timestamp,
                first.close,
                last.timestamp,
                last.close
            );
        }

        Ok(series)
    }

    async fn submit_order(&self, intent: &OrderIntent) -> Result<OrderResponse, BrokerError> {
        if intent.quantity <= Decimal::ZERO {
            return Err(BrokerError::InvalidResponse(format!(
                "refusing to send non-positive quantity {}",
                intent.quantity
            )));
        }

        let url = format!("{}/v2/orders", self.trading_url);
        let body = AlpacaOrderRequest {
            symbol: &intent.symbol,
            qty: intent.quantity.normalize().to_string(),
            side: intent.side.as_str(),
            order_type: "market",
            time_in_force: "gtc",
            client_order_id: Uuid::new_v4().to_string(),
        };

        info!("🚀 Sending Order: {} (client id {})", intent, body.client_order_id);

        let order: AlpacaOrder = self.send(self.http_client.post(&url).json(&body)).await?;

        Ok(OrderResponse {
            id: order.id,
            client_order_id: order.client_order_id,
            symbol: order.symbol,
            status: order.status,
        })
    }
}
