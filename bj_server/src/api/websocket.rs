//! WebSocket handler streaming table events.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/{table_id}`
//! 2. Server subscribes to the table (404 if the table is not open)
//! 3. Every [`TableEvent`] is pushed as a JSON text frame
//! 4. On disconnect the subscription is dropped
//!
//! The stream is read-only; actions go through the HTTP endpoints.
//!
//! # Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:6969/ws/1');
//!
//! ws.onmessage = (msg) => {
//!   const data = JSON.parse(msg.data);
//!   if (data.event === 'ROUND_RESOLVED') {
//!     showResults(data.summary);
//!   } else {
//!     render(data.snapshot);
//!   }
//! };
//! ```

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::{IntoResponse, Response},
};
use blackjack_table::{TableEvent, TableId, table::Subscription};
use futures_util::{SinkExt, StreamExt};
use log::{error, info};

use super::{AppState, game};
use crate::metrics;

/// Upgrade HTTP connection to a WebSocket carrying the table's events.
///
/// # Path Parameters
///
/// - `table_id`: Table ID to follow
///
/// # Response
///
/// On success, upgrades connection to WebSocket protocol (101 Switching Protocols).
/// Returns `404 Not Found` when the table is not open.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(table_id): Path<TableId>,
    State(state): State<AppState>,
) -> Response {
    let subscription = match state.registry.subscribe(table_id).await {
        Ok(subscription) => subscription,
        Err(e) => {
            return (game::error_status(&e), e.client_message()).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, subscription, state))
}

fn encode(event: &TableEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize {} event: {}", event.name(), e);
            None
        }
    }
}

/// Handle an established WebSocket connection.
///
/// A send task forwards table events to the socket while this task drains
/// incoming frames, so a client close or a dropped table both end the
/// connection.
async fn handle_socket(socket: WebSocket, subscription: Subscription, state: AppState) {
    let Subscription {
        table_id,
        subscriber_id,
        mut events,
    } = subscription;
    let (mut sender, mut receiver) = socket.split();

    info!(
        "WebSocket connected: table={}, subscriber={}",
        table_id, subscriber_id
    );
    metrics::websocket_connections_total();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Some(json) = encode(&event) else {
                continue;
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
            metrics::websocket_messages_sent();
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    if let Err(e) = state.registry.unsubscribe(table_id, subscriber_id).await {
        error!(
            "Failed to unsubscribe {} from table {}: {}",
            subscriber_id, table_id, e
        );
    }

    info!(
        "WebSocket disconnected: table={}, subscriber={}",
        table_id, subscriber_id
    );
}
