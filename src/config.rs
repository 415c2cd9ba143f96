// src/config.rs

use crate::error::ConfigError;
use crate::indicators::AverageKind;
use crate::types::Timeframe;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Short moving average against a long one.
    DualMa,
    /// Close price against a single moving average of `long_window`.
    PriceMa,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    pub average: AverageKind,
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::DualMa,
            average: AverageKind::Ema,
            short_window: 12,
            long_window: 26,
        }
    }
}

impl StrategyConfig {
    pub fn longest_window(&self) -> usize {
        match self.kind {
            StrategyKind::DualMa => self.short_window.max(self.long_window),
            StrategyKind::PriceMa => self.long_window,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OrderConfig {
    /// Fixed size of every entry and exit.
    pub quantity: Decimal,
    /// Quantities are rounded down to this step; zero disables rounding.
    pub step_size: Decimal,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            quantity: Decimal::ONE,
            step_size: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrokerConfig {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    /// Selects the live trading endpoint instead of the paper one.
    pub live_trading: bool,
    pub trading_url: Option<String>,
    pub data_url: Option<String>,
    /// Bars newer than this are not requested.
    pub data_delay_minutes: i64,
    pub feed: Option<String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            secret_key: None,
            live_trading: false,
            trading_url: None,
            data_url: None,
            data_delay_minutes: 120,
            feed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "crossover-bot.log".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub lookback: usize,
    pub poll_interval_secs: u64,
    pub order: OrderConfig,
    pub strategy: StrategyConfig,
    pub broker: BrokerConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            timeframe: Timeframe::Hour,
            lookback: 100,
            poll_interval_secs: 5,
            order: OrderConfig::default(),
            strategy: StrategyConfig::default(),
            broker: BrokerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `Settings.toml` (or the file named by `BOT_CONFIG`) if present,
    /// overlays `APP_*` environment variables and fills credentials from the
    /// usual Alpaca variables when the file does not carry them.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("BOT_CONFIG").unwrap_or_else(|_| "Settings".to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(env_source());

        let mut config = Self::from_builder(builder)?;
        config.fill_credentials_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document on top of the defaults and validates it.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        let config = Self::from_builder(builder)?;
        config.validate()?;
        Ok(config)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    fn fill_credentials_from_env(&mut self) {
        if self.broker.api_key.is_none() {
            self.broker.api_key = first_env(&["APCA_API_KEY_ID", "KEY_ID"]);
        }
        if self.broker.secret_key.is_none() {
            self.broker.secret_key = first_env(&["APCA_API_SECRET_KEY", "SECRET_KEY"]);
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key, reason: &str| {
            Err(ConfigError::Invalid {
                key,
                reason: reason.to_string(),
            })
        };

        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !has(&self.broker.api_key) || !has(&self.broker.secret_key) {
            return Err(ConfigError::MissingCredentials);
        }

        if self.symbol.trim().is_empty() {
            return invalid("symbol", "must not be empty");
        }

        let strategy = &self.strategy;
        if strategy.long_window == 0 {
            return invalid("strategy.long_window", "must be at least 1");
        }
        if strategy.kind == StrategyKind::DualMa {
            if strategy.short_window == 0 {
                return invalid("strategy.short_window", "must be at least 1");
            }
            if strategy.short_window >= strategy.long_window {
                return invalid(
                    "strategy.short_window",
                    "must be smaller than strategy.long_window",
                );
            }
        }

        if self.lookback < strategy.longest_window() {
            return invalid("lookback", "must cover the longest moving average window");
        }
        if self.order.quantity <= Decimal::ZERO {
            return invalid("order.quantity", "must be positive");
        }
        if self.order.step_size < Decimal::ZERO {
            return invalid("order.step_size", "must not be negative");
        }
        if self.poll_interval_secs == 0 {
            return invalid("poll_interval_secs", "must be at least 1");
        }
        if self.broker.data_delay_minutes < 0 {
            return invalid("broker.data_delay_minutes", "must not be negative");
        }

        Ok(())
    }
}

/// `APP_SYMBOL`, `APP_STRATEGY__SHORT_WINDOW`: one underscore after the
/// prefix, double underscores between nested keys.
fn env_source() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}
