/*
 * Swap Quoter - debounced swap quoting service
 * Main entry point for the application
 */

use anyhow::anyhow;
use swap_quoter::{api, config::Config, service::QuoteService};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()
        .map_err(|e| {
            eprintln!("Failed to load configuration: {e}");
            e
        })?;

    init_tracing(&config.server.log_level);

    info!("Starting Swap Quoter service");

    let service = QuoteService::new(&config)
        .await
        .map_err(|e| {
            error!("Failed to initialize quote service: {}", e);
            e
        })?;

    let api_state = api::ApiState {
        engine: service.engine,
        tokens: service.tokens,
        metrics: service.metrics,
    };

    info!("Starting API server on {}:{}", config.server.host, config.server.port);

    let figment = rocket::Config::figment()
        .merge(("address", config.server.host.clone()))
        .merge(("port", config.server.port));

    api::create_rocket(api_state)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow!("API server failed: {e}"))?;

    Ok(())
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("swap_quoter={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
