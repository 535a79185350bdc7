//! Multi-table blackjack server.
//!
//! Each table runs as its own actor inside a shared session registry;
//! cards come from per-table shoes and balances from an in-memory ledger.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Error;
use bj_server::{api, config::ServerConfig, logging, metrics};
use blackjack_table::{InMemoryLedger, SessionRegistry, ShoeSupplier};
use pico_args::Arguments;
use tracing::{info, warn};

const HELP: &str = "\
Run a multi-table blackjack server

USAGE:
  bj_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --decks      N           Decks per table shoe        [default: env SHOE_DECKS or 6]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  SHOE_DECKS               Decks per table shoe
  DEALER_STANDS_ON         Dealer stands at or above this total [default: 17]
  TIE_POLICY               player_wins or push [default: player_wins]
  TABLE_MIN_BET            Minimum bet [default: 1]
  TABLE_MAX_BET            Maximum bet [default: 10000]
  STARTING_BALANCE         Balance a player starts with at each table [default: 1000]
  RUST_LOG                 Log filter [default: info]
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let decks: Option<usize> = pargs.opt_value_from_str("--decks")?;

    logging::init();

    let config = ServerConfig::from_env(bind, decks)?;
    config.validate()?;

    if let Some(metrics_bind) = config.metrics_bind {
        match metrics::init_metrics(metrics_bind) {
            Ok(()) => info!("Metrics exporter listening on {}", metrics_bind),
            Err(e) => warn!("{}", e),
        }
    }

    info!(
        "Tables use {} deck shoe(s), dealer stands on {}, ties: {}",
        config.shoe_decks, config.table.rules.dealer_stands_on, config.table.rules.tie_policy
    );

    let registry = Arc::new(SessionRegistry::new(
        config.table.clone(),
        Arc::new(ShoeSupplier::new(config.shoe_decks)),
        Arc::new(InMemoryLedger::new(config.starting_balance)),
    ));

    let app = api::create_router(api::AppState {
        registry: registry.clone(),
    });

    info!("Starting HTTP/WebSocket server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    for table_id in registry.table_ids().await {
        registry.close_table(table_id).await?;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
