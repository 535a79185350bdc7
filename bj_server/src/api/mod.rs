//! HTTP/WebSocket API for the blackjack table server.
//!
//! Handlers are thin: they translate paths and bodies into
//! [`SessionRegistry`] calls and map [`GameError`](blackjack_table::GameError)
//! to status codes.
//!
//! # Modules
//!
//! - [`game`]: Bet, hit, stay, play-again, state and balance endpoints
//! - [`websocket`]: Live stream of table events
//! - [`request_id`]: Request ID propagation, request logging and metrics
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bj_server::api::{AppState, create_router};
//! use blackjack_table::{InMemoryLedger, SessionRegistry, ShoeSupplier, TableConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SessionRegistry::new(
//!     TableConfig::default(),
//!     Arc::new(ShoeSupplier::new(6)),
//!     Arc::new(InMemoryLedger::new(1_000)),
//! );
//! let app = create_router(AppState {
//!     registry: Arc::new(registry),
//! });
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development.

pub mod game;
pub mod request_id;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use blackjack_table::SessionRegistry;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET  /health                                - Health check
/// GET  /api/game/{id}                         - Table snapshot
/// POST /api/game/{id}/bet/{player_id}         - Place a bet, body {"bet": n}
/// GET  /api/game/{id}/hit/{player_id}         - Take a card
/// GET  /api/game/{id}/stay/{player_id}        - Stand
/// GET  /api/game/{id}/playAgain/{player_id}   - Start the next round
/// GET  /api/game/{id}/balance/{player_id}     - Displayed bank balance
/// GET  /ws/{id}                               - Table event stream
/// ```
pub fn create_router(state: AppState) -> Router {
    let game_routes = Router::new()
        .route("/{table_id}", get(game::get_state))
        .route("/{table_id}/bet/{player_id}", post(game::bet))
        .route("/{table_id}/hit/{player_id}", get(game::hit))
        .route("/{table_id}/stay/{player_id}", get(game::stay))
        .route("/{table_id}/playAgain/{player_id}", get(game::play_again))
        .route("/{table_id}/balance/{player_id}", get(game::balance));

    Router::new()
        .route("/health", get(health_check))
        .route("/ws/{table_id}", get(websocket::websocket_handler))
        .nest("/api/game", game_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","version":"0.1.0","tables":{"active_count":2},"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let table_count = state.registry.active_table_count().await;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "tables": {
            "active_count": table_count
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
