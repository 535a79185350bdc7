//! Blackjack game engine - hands, scoring and the round state machine.
//!
//! This module provides:
//! - Card parsing and the soft/hard ace scoring rule
//! - Per-participant hands with derived total and bust state
//! - The per-table session (hands, turn order, phase)
//! - The turn sequencer driving bet/hit/stay/play-again
//! - Round resolution of dealer versus players

pub mod card;
pub mod errors;
pub mod hand;
pub mod resolver;
pub mod sequencer;
pub mod session;

pub use card::{BLACKJACK, Card, Rank, Suit, score, value_of};
pub use errors::{GameError, GameResult};
pub use hand::{Hand, Outcome, PlayerId, Seat};
pub use resolver::{PlayerResult, RoundSummary, TiePolicy, resolve_outcome, resolve_round};
pub use sequencer::{HitResult, HouseRules, OPENING_CARDS, TurnSequencer};
pub use session::{HandView, Phase, TableId, TableSession, TableSnapshot};
