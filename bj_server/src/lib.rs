//! HTTP/WebSocket front end for the blackjack table engine.
//!
//! - [`api`]: Axum router, handlers and websocket event stream
//! - [`config`]: Environment-driven server configuration
//! - [`logging`]: Tracing subscriber setup and structured log helpers
//! - [`metrics`]: Prometheus counters and gauges

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
