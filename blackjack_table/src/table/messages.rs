//! Table actor message types.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::{
    game::{GameResult, PlayerId, RoundSummary, TableSnapshot},
    ledger::Balance,
};

/// Reply carrying the table state after a successful action.
pub type ActionReply = oneshot::Sender<GameResult<TableSnapshot>>;

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Place a bet and get dealt into the round
    Bet {
        player_id: PlayerId,
        amount: u64,
        response: ActionReply,
    },

    Hit {
        player_id: PlayerId,
        response: ActionReply,
    },

    Stay {
        player_id: PlayerId,
        response: ActionReply,
    },

    /// Start the next round once the current one is resolved
    PlayAgain {
        player_id: PlayerId,
        response: ActionReply,
    },

    /// Get current table state
    GetState {
        response: oneshot::Sender<TableSnapshot>,
    },

    /// Get a player's displayed bank balance
    GetBalance {
        player_id: PlayerId,
        response: oneshot::Sender<GameResult<Balance>>,
    },

    /// Subscribe to table events
    Subscribe {
        subscriber_id: u64,
        sender: mpsc::Sender<TableEvent>,
    },

    /// Unsubscribe from table events
    Unsubscribe { subscriber_id: u64 },

    /// Stop the actor
    Close { response: oneshot::Sender<()> },
}

/// State change notifications broadcast to subscribers.
///
/// Serialized with an `event` tag, e.g. `{"event":"PLAYER_BET", ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableEvent {
    PlayerBet {
        player_id: PlayerId,
        snapshot: TableSnapshot,
        balance: Option<Balance>,
    },
    PlayerHit {
        player_id: PlayerId,
        snapshot: TableSnapshot,
    },
    PlayerStay {
        player_id: PlayerId,
        snapshot: TableSnapshot,
    },
    PlayerPlayAgain {
        player_id: PlayerId,
        snapshot: TableSnapshot,
    },
    RoundResolved {
        summary: RoundSummary,
    },
}

impl TableEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::PlayerBet { .. } => "PLAYER_BET",
            TableEvent::PlayerHit { .. } => "PLAYER_HIT",
            TableEvent::PlayerStay { .. } => "PLAYER_STAY",
            TableEvent::PlayerPlayAgain { .. } => "PLAYER_PLAY_AGAIN",
            TableEvent::RoundResolved { .. } => "ROUND_RESOLVED",
        }
    }

    /// Table state carried by the event, if any
    pub fn snapshot(&self) -> Option<&TableSnapshot> {
        match self {
            TableEvent::PlayerBet { snapshot, .. }
            | TableEvent::PlayerHit { snapshot, .. }
            | TableEvent::PlayerStay { snapshot, .. }
            | TableEvent::PlayerPlayAgain { snapshot, .. } => Some(snapshot),
            TableEvent::RoundResolved { .. } => None,
        }
    }
}
