// src/main.rs
use crossover_bot::config::AppConfig;
use crossover_bot::connectors::alpaca::AlpacaClient;
use crossover_bot::core::clock::SystemClock;
use crossover_bot::core::engine::TradingEngine;
use crossover_bot::core::shutdown;
use crossover_bot::{logging, strategies};
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Load Configuration (fatal on failure, before anything trades)
    let config = AppConfig::load()?;
    let _log_guard = logging::init(&config.logging);

    println!("========================================");
    println!("       CROSSOVER BOT - v0.1.0");
    println!("========================================");
    println!("Target: {}", config.symbol);
    println!(
        "Mode:   {}",
        if config.broker.live_trading {
            "🚨 LIVE TRADING"
        } else {
            "📝 PAPER TRADING"
        }
    );
    println!("========================================");

    // 2. Initialize Components
    let broker = AlpacaClient::from_config(&config.broker);
    let strategy = strategies::from_config(&config.strategy);
    let engine = TradingEngine::new(
        &config,
        Box::new(broker),
        strategy,
        Box::new(SystemClock),
    );

    // 3. Run until Ctrl+C (handler installed before the first cycle)
    let ctrl_c = shutdown::ctrl_c().await;
    let shutdown = async {
        if let Err(e) = ctrl_c.await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let cycles = engine.run(shutdown).await;
    info!("Shut down after {} cycles", cycles);

    Ok(())
}
