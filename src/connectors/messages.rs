// src/connectors/messages.rs
//! Alpaca REST payloads. Short field names follow the market data API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `GET /v2/positions/{symbol}`
#[derive(Debug, Deserialize)]
pub struct AlpacaPosition {
    pub symbol: String,
    pub qty: Decimal,
}

/// One bar from `GET /v2/stocks/{symbol}/bars`.
#[derive(Debug, Deserialize)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "c")]
    pub close: f64,
}

#[derive(Debug, Deserialize)]
pub struct AlpacaBarsResponse {
    // null when the window holds no bars
    #[serde(default)]
    pub bars: Option<Vec<AlpacaBar>>,
}

/// `POST /v2/orders`
#[derive(Debug, Serialize)]
pub struct AlpacaOrderRequest<'a> {
    pub symbol: &'a str,
    pub qty: String,
    pub side: &'a str,
    #[serde(rename = "type")]
    pub order_type: &'a str,
    pub time_in_force: &'a str,
    pub client_order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AlpacaOrder {
    pub id: String,
    pub client_order_id: Option<String>,
    pub symbol: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AlpacaApiError {
    pub code: Option<u64>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bars_payload() {
        let json = r#"{
            "bars": [
                {"t": "2024-03-01T15:00:00Z", "o": 180.1, "h": 181.0, "l": 179.5, "c": 180.7, "v": 12345, "n": 90, "vw": 180.4}
            ],
            "symbol": "AAPL",
            "next_page_token": null
        }"#;
        let resp: AlpacaBarsResponse = serde_json::from_str(json).unwrap();
        let bars = resp.bars.unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 180.7);
        assert_eq!(bars[0].timestamp.to_rfc3339(), "2024-03-01T15:00:00+00:00");
    }

    #[test]
    fn null_bars_is_none() {
        let json = r#"{"bars": null, "symbol": "AAPL", "next_page_token": null}"#;
        let resp: AlpacaBarsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.bars.is_none());
    }

    #[test]
    fn parses_position_quantity_string() {
        let json = r#"{"symbol": "AAPL", "qty": "3", "side": "long", "market_value": "540.0"}"#;
        let pos: AlpacaPosition = serde_json::from_str(json).unwrap();
        assert_eq!(pos.qty, Decimal::from(3));
    }

    #[test]
    fn serializes_order_request() {
        let req = AlpacaOrderRequest {
            symbol: "AAPL",
            qty: "1".to_string(),
            side: "buy",
            order_type: "market",
            time_in_force: "gtc",
            client_order_id: "abc".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "market");
        assert_eq!(value["qty"], "1");
        assert_eq!(value["time_in_force"], "gtc");
    }
}
