//! Bank/ledger abstraction.
//!
//! The engine reads balances for display and forwards wagers; settling a
//! round is left to the ledger, which receives the [`RoundSummary`].
//!
//! ## Example
//!
//! ```
//! use blackjack_table::ledger::{InMemoryLedger, Ledger};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ledger = InMemoryLedger::new(100);
//! ledger.apply_bet(25, 1, 7).await.unwrap();
//!
//! let balance = ledger.get_balance(1, 7).await.unwrap();
//! assert_eq!(balance.amount, 75);
//! assert!(!balance.in_debt);
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{PlayerId, RoundSummary, TableId};

pub mod memory;

pub use memory::InMemoryLedger;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(u64),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Displayed bank value. `amount` is the magnitude, `in_debt` its sign.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Balance {
    pub amount: u64,
    pub in_debt: bool,
}

impl Balance {
    pub fn from_signed(value: i64) -> Self {
        Self {
            amount: value.unsigned_abs(),
            in_debt: value < 0,
        }
    }
}

#[async_trait]
pub trait Ledger: Send + Sync {
    async fn get_balance(&self, player_id: PlayerId, table_id: TableId) -> LedgerResult<Balance>;

    async fn apply_bet(&self, amount: u64, player_id: PlayerId, table_id: TableId)
    -> LedgerResult<()>;

    /// Settle a resolved round. Must be idempotent per `summary.round_id`.
    async fn record_round(&self, summary: &RoundSummary) -> LedgerResult<()>;
}
