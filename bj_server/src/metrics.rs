//! Prometheus metrics for monitoring table server health.
//!
//! Metrics are exposed in Prometheus text format on a separate listener
//! when `METRICS_BIND` is set. Without an installed recorder every call here
//! is a no-op.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts and duration
//! - **WebSocket Metrics**: Connections and events pushed
//! - **Game Metrics**: Active tables, player actions, resolved rounds

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// WebSocket Metrics
// ============================================================================

pub fn websocket_connections_total() {
    metrics::counter!("websocket_connections_total").increment(1);
}

/// Increment WebSocket messages sent counter.
pub fn websocket_messages_sent() {
    metrics::counter!("websocket_messages_sent").increment(1);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Set current active tables count.
pub fn active_tables(count: usize) {
    metrics::gauge!("active_tables").set(count as f64);
}

/// Count a player action and whether it was accepted.
pub fn table_actions_total(action: &str, accepted: bool) {
    metrics::counter!("table_actions_total",
        "action" => action.to_string(),
        "accepted" => accepted.to_string()
    )
    .increment(1);
}

/// Increment resolved rounds counter.
pub fn rounds_resolved_total() {
    metrics::counter!("rounds_resolved_total").increment(1);
}

/// Record wager size distribution.
pub fn bet_size(amount: u64) {
    metrics::histogram!("bet_size").record(amount as f64);
}
