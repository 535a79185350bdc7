//! Round resolution: dealer versus each player.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{
    card::BLACKJACK,
    hand::{Outcome, PlayerId, Seat},
    session::{TableId, TableSession},
};

/// How a tie between dealer and player is settled.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// A tie goes to the player.
    #[default]
    PlayerWins,
    /// A tie is a push and the wager is returned.
    Push,
}

impl fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiePolicy::PlayerWins => write!(f, "player_wins"),
            TiePolicy::Push => write!(f, "push"),
        }
    }
}

/// Outcome for one player given both final scores.
pub fn resolve_outcome(
    dealer_total: u32,
    dealer_bust: bool,
    player_total: u32,
    player_bust: bool,
    tie_policy: TiePolicy,
) -> Outcome {
    if player_bust || player_total > BLACKJACK {
        return Outcome::Lose;
    }
    if dealer_bust || dealer_total > BLACKJACK {
        return Outcome::Win;
    }
    match dealer_total.cmp(&player_total) {
        std::cmp::Ordering::Less => Outcome::Win,
        std::cmp::Ordering::Equal => match tie_policy {
            TiePolicy::PlayerWins => Outcome::Win,
            TiePolicy::Push => Outcome::Push,
        },
        std::cmp::Ordering::Greater => Outcome::Lose,
    }
}

/// Result for a single player in a resolved round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerResult {
    pub player_id: PlayerId,
    pub total: u32,
    pub bust: bool,
    pub wager: u64,
    pub outcome: Outcome,
}

/// Emitted once per round for the ledger to settle. `round_id` doubles
/// as the idempotency key.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round_id: Uuid,
    pub table_id: TableId,
    pub round: u32,
    pub dealer_total: u32,
    pub dealer_bust: bool,
    pub results: Vec<PlayerResult>,
    pub resolved_at: DateTime<Utc>,
}

/// Assigns an outcome to every pending, dealt-in player hand. Balances
/// are untouched.
pub fn resolve_round(session: &mut TableSession, tie_policy: TiePolicy) -> RoundSummary {
    let (dealer_total, dealer_bust) = session
        .dealer_hand()
        .map_or((0, false), |hand| (hand.total(), hand.is_bust()));

    let pending: Vec<(PlayerId, u32, bool, u64)> = session
        .player_hands()
        .filter(|hand| !hand.is_empty() && hand.outcome() == Outcome::Pending)
        .filter_map(|hand| match hand.owner() {
            Seat::Player(id) => Some((id, hand.total(), hand.is_bust(), hand.wager())),
            Seat::Dealer => None,
        })
        .collect();

    let mut results = Vec::with_capacity(pending.len());
    for (player_id, total, bust, wager) in pending {
        let outcome = resolve_outcome(dealer_total, dealer_bust, total, bust, tie_policy);
        session.set_outcome(player_id, outcome);
        results.push(PlayerResult {
            player_id,
            total,
            bust,
            wager,
            outcome,
        });
    }

    RoundSummary {
        round_id: Uuid::new_v4(),
        table_id: session.table_id(),
        round: session.round(),
        dealer_total,
        dealer_bust,
        results,
        resolved_at: Utc::now(),
    }
}
