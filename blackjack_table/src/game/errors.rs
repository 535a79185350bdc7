//! Game error types.

use thiserror::Error;

use super::{hand::PlayerId, session::{Phase, TableId}};
use crate::{ledger::LedgerError, supplier::SupplyError};

/// Errors surfaced by table operations.
///
/// Every variant leaves the table exactly as it was before the failed call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Raw card data that does not name a real card
    #[error("invalid card: {0}")]
    InvalidCard(String),

    #[error("table {0} not found")]
    UnknownTable(TableId),

    #[error("player {player_id} is not seated at table {table_id}")]
    UnknownPlayer { table_id: TableId, player_id: PlayerId },

    #[error("deck exhausted at table {0}")]
    DeckExhausted(TableId),

    #[error("card storage error: {0}")]
    Storage(String),

    #[error("can't {action} during {phase}")]
    InvalidPhase { phase: Phase, action: &'static str },

    #[error("player {0} is already dealt into this round")]
    AlreadyInRound(PlayerId),

    #[error("player {0} has not bet this round")]
    NotInRound(PlayerId),

    #[error("player {0} already stayed")]
    AlreadyStood(PlayerId),

    #[error("not your turn, waiting on player {expected}")]
    NotYourTurn { expected: PlayerId },

    #[error("bet must be between {min} and {max}, got {amount}")]
    InvalidBet { amount: u64, min: u64, max: u64 },

    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("table {0} is closed")]
    TableClosed(TableId),
}

impl GameError {
    /// Client-safe message that doesn't leak collaborator internals.
    pub fn client_message(&self) -> String {
        match self {
            GameError::Storage(_) => "Card storage unavailable".to_string(),
            GameError::Ledger(_) => "Ledger unavailable".to_string(),
            GameError::InvalidCard(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<SupplyError> for GameError {
    fn from(err: SupplyError) -> Self {
        match err {
            SupplyError::DeckExhausted(table_id) => GameError::DeckExhausted(table_id),
            SupplyError::Storage(msg) => GameError::Storage(msg),
        }
    }
}

impl From<LedgerError> for GameError {
    fn from(err: LedgerError) -> Self {
        GameError::Ledger(err.to_string())
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
