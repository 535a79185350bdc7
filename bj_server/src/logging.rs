//! Structured logging configuration.
//!
//! The engine logs through the `log` facade; the subscriber installed here
//! picks those records up alongside the server's own `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info`.
///
/// # Example
///
/// ```no_run
/// use bj_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a player action against a table
///
/// # Arguments
///
/// * `table_id` - Table the action targeted
/// * `player_id` - Acting player
/// * `action` - Action name (bet, hit, stay, play_again)
/// * `outcome` - `"ok"` or the error that rejected the action
///
/// # Example
///
/// ```
/// use bj_server::logging::log_table_action;
///
/// log_table_action(1, 42, "hit", "ok");
/// ```
pub fn log_table_action(table_id: i64, player_id: i64, action: &str, outcome: &str) {
    tracing::info!(
        table_id = table_id,
        player_id = player_id,
        action = action,
        outcome = outcome,
        "Table action"
    );
}

/// Log API request/response
///
/// Requests slower than a second are logged at warn level.
pub fn log_api_request(method: &str, path: &str, status_code: u16, duration_ms: u64) {
    if duration_ms > 1000 {
        tracing::warn!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "Slow API request"
        );
    } else {
        tracing::info!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "API request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_table_action() {
        // Just ensure it doesn't panic
        log_table_action(1, 2, "bet", "ok");
        log_table_action(1, 2, "hit", "not your turn, waiting on player 1");
    }

    #[test]
    fn test_log_api_request() {
        log_api_request("GET", "/api/game/1/hit/2", 200, 45);
        log_api_request("POST", "/api/game/1/bet/2", 409, 1200);
    }
}
