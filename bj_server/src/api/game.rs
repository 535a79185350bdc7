//! Table action API handlers.
//!
//! The paths mirror the browser client's game routes: a bet is a `POST`
//! with the amount in the body, every other action is a plain `GET`.
//!
//! # Examples
//!
//! Place a bet:
//! ```bash
//! curl -X POST http://localhost:6969/api/game/1/bet/42 \
//!   -H "Content-Type: application/json" \
//!   -d '{"bet": 25}'
//! ```
//!
//! Take a card:
//! ```bash
//! curl http://localhost:6969/api/game/1/hit/42
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use blackjack_table::{Balance, GameError, GameResult, Phase, PlayerId, TableId, TableSnapshot};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct BetRequest {
    pub bet: u64,
}

/// Table state after a bet, with the bettor's balance when available.
#[derive(Debug, Serialize)]
pub struct BetResponse {
    #[serde(flatten)]
    pub snapshot: TableSnapshot,
    pub balance: Option<Balance>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a game error.
pub fn error_status(err: &GameError) -> StatusCode {
    match err {
        GameError::UnknownTable(_) | GameError::UnknownPlayer { .. } => StatusCode::NOT_FOUND,
        GameError::InvalidPhase { .. }
        | GameError::AlreadyInRound(_)
        | GameError::NotInRound(_)
        | GameError::AlreadyStood(_)
        | GameError::NotYourTurn { .. } => StatusCode::CONFLICT,
        GameError::InvalidBet { .. } => StatusCode::BAD_REQUEST,
        GameError::DeckExhausted(_) | GameError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        GameError::InvalidCard(_) | GameError::Ledger(_) | GameError::TableClosed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn api_error(err: GameError) -> ApiError {
    let status = error_status(&err);
    if status.is_server_error() {
        log::error!("Request failed: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Log and count an action, then convert its result into a response.
fn finish<T>(
    action: &str,
    table_id: TableId,
    player_id: PlayerId,
    result: GameResult<T>,
) -> Result<T, ApiError> {
    match &result {
        Ok(_) => logging::log_table_action(table_id, player_id, action, "ok"),
        Err(e) => logging::log_table_action(table_id, player_id, action, &e.to_string()),
    }
    metrics::table_actions_total(action, result.is_ok());
    result.map_err(api_error)
}

/// Place a bet and get dealt into the current round.
///
/// The first bet on an unknown table opens it.
///
/// # Request Body
///
/// ```json
/// { "bet": 25 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Bet outside the table limits
/// - `409 Conflict`: Round already resolved, or player already dealt in
/// - `503 Service Unavailable`: No cards could be dealt
pub async fn bet(
    State(state): State<AppState>,
    Path((table_id, player_id)): Path<(TableId, PlayerId)>,
    Json(request): Json<BetRequest>,
) -> Result<Json<BetResponse>, ApiError> {
    let result = state.registry.bet(table_id, player_id, request.bet).await;
    let snapshot = finish("bet", table_id, player_id, result)?;
    metrics::bet_size(request.bet);
    metrics::active_tables(state.registry.active_table_count().await);

    let balance = state.registry.balance(table_id, player_id).await.ok();
    Ok(Json(BetResponse { snapshot, balance }))
}

/// Deal one card to the acting player.
///
/// # Errors
///
/// - `404 Not Found`: Unknown table or player
/// - `409 Conflict`: Not this player's turn, or no round in progress
pub async fn hit(
    State(state): State<AppState>,
    Path((table_id, player_id)): Path<(TableId, PlayerId)>,
) -> Result<Json<TableSnapshot>, ApiError> {
    let result = state.registry.hit(table_id, player_id).await;
    finish("hit", table_id, player_id, result).map(Json)
}

/// Stand. The last player to stand triggers the dealer's turn and the
/// returned snapshot is already resolved.
pub async fn stay(
    State(state): State<AppState>,
    Path((table_id, player_id)): Path<(TableId, PlayerId)>,
) -> Result<Json<TableSnapshot>, ApiError> {
    let result = state.registry.stay(table_id, player_id).await;
    let snapshot = finish("stay", table_id, player_id, result)?;
    if snapshot.phase == Phase::Resolved {
        metrics::rounds_resolved_total();
    }
    Ok(Json(snapshot))
}

/// Reset a resolved table for the next round.
pub async fn play_again(
    State(state): State<AppState>,
    Path((table_id, player_id)): Path<(TableId, PlayerId)>,
) -> Result<Json<TableSnapshot>, ApiError> {
    let result = state.registry.play_again(table_id, player_id).await;
    finish("play_again", table_id, player_id, result).map(Json)
}

/// Current table snapshot, face-down cards masked.
pub async fn get_state(
    State(state): State<AppState>,
    Path(table_id): Path<TableId>,
) -> Result<Json<TableSnapshot>, ApiError> {
    state
        .registry
        .state(table_id)
        .await
        .map(Json)
        .map_err(api_error)
}

/// A player's displayed bank balance at a table.
pub async fn balance(
    State(state): State<AppState>,
    Path((table_id, player_id)): Path<(TableId, PlayerId)>,
) -> Result<Json<Balance>, ApiError> {
    state
        .registry
        .balance(table_id, player_id)
        .await
        .map(Json)
        .map_err(api_error)
}
