//! # Blackjack Table
//!
//! A multiplayer blackjack engine: many tables, each with any number of
//! players playing against a house dealer.
//!
//! ## Round flow
//!
//! - **Betting**: the first bet deals the dealer's opening (one card face
//!   down) and every bet deals the player two cards
//! - **PlayerTurns**: players hit or stay in the order they first bet
//! - **DealerTurn**: once everyone dealt in has stood, the dealer reveals
//!   and draws to the stand threshold
//! - **Resolved**: every player is marked win, lose or push; play-again
//!   resets the table for the next round
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, hands, round state, turn sequencing and resolution
//! - [`supplier`]: Where cards come from
//! - [`ledger`]: Where balances live
//! - [`table`]: Per-table actors and the session registry
//!
//! ## Example
//!
//! ```
//! use blackjack_table::{Card, score};
//!
//! let cards = [Card::parse("A", "S").unwrap(), Card::parse("K", "H").unwrap()];
//! assert_eq!(score(&cards), (21, true));
//! ```

/// Core game logic: cards, hands, turn sequencing and resolution.
pub mod game;
pub use game::{
    BLACKJACK, Card, GameError, GameResult, Hand, HouseRules, Outcome, Phase, PlayerId, Rank,
    RoundSummary, Seat, Suit, TableId, TableSession, TableSnapshot, TiePolicy, TurnSequencer,
    score, value_of,
};

/// Card supplier trait and in-memory shoes.
pub mod supplier;
pub use supplier::{CardSupplier, ShoeSupplier, StackedSupplier, SupplyError};

/// Bank/ledger trait and in-memory ledger.
pub mod ledger;
pub use ledger::{Balance, InMemoryLedger, Ledger, LedgerError};

/// Per-table actors and the session registry.
pub mod table;
pub use table::{SessionRegistry, TableConfig, TableEvent};
