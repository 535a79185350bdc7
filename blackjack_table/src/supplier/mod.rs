//! Card supplier abstraction.
//!
//! The engine never owns a deck. Cards come from a [`CardSupplier`], which
//! may be backed by storage or by the in-memory shoes provided here:
//! - [`ShoeSupplier`]: a shuffled multi-deck shoe per table
//! - [`StackedSupplier`]: deals a fixed sequence, for replays and tests

use async_trait::async_trait;
use thiserror::Error;

use crate::game::{Card, Seat, TableId};

pub mod shoe;
pub mod stacked;

pub use shoe::{Shoe, ShoeSupplier};
pub use stacked::StackedSupplier;

/// Supplier errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SupplyError {
    #[error("no cards left for table {0}")]
    DeckExhausted(TableId),

    #[error("{0}")]
    Storage(String),
}

/// Result type for supplier operations
pub type SupplyResult<T> = Result<T, SupplyError>;

#[async_trait]
pub trait CardSupplier: Send + Sync {
    /// Deal `count` face-up cards to `seat` at `table_id`, in deal order.
    ///
    /// Either all `count` cards are returned or none are consumed.
    async fn deal_cards(&self, table_id: TableId, seat: Seat, count: usize)
    -> SupplyResult<Vec<Card>>;

    /// Return every dealt card to the table's deck before a new round.
    async fn reset_table(&self, table_id: TableId) -> SupplyResult<()>;
}
