use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::{BLACKJACK, Card, score};

/// Opaque player identifier supplied by the identity layer.
pub type PlayerId = i64;

/// Owner of a hand. The dealer gets its own variant so it can never
/// collide with a real player id.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Seat {
    Player(PlayerId),
    Dealer,
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "player {id}"),
            Self::Dealer => write!(f, "dealer"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Win,
    Lose,
    Push,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Pending => "pending",
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Push => "push",
        };
        write!(f, "{repr}")
    }
}

/// Cards and derived score for one participant in one round.
///
/// `total`, `soft` and `bust` are recomputed from `cards` on every change,
/// so they can never drift from the cards actually held.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hand {
    owner: Seat,
    cards: Vec<Card>,
    total: u32,
    soft: bool,
    bust: bool,
    stood: bool,
    wager: u64,
    outcome: Outcome,
}

impl Hand {
    pub fn new(owner: Seat) -> Self {
        Self {
            owner,
            cards: Vec::new(),
            total: 0,
            soft: false,
            bust: false,
            stood: false,
            wager: 0,
            outcome: Outcome::Pending,
        }
    }

    pub fn owner(&self) -> Seat {
        self.owner
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Sum of revealed cards under the ace rule.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Whether an ace is still counted as 11.
    pub fn is_soft(&self) -> bool {
        self.soft
    }

    pub fn is_bust(&self) -> bool {
        self.bust
    }

    pub fn is_stood(&self) -> bool {
        self.stood
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn wager(&self) -> u64 {
        self.wager
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn hidden_count(&self) -> usize {
        self.cards.iter().filter(|card| card.face_down).count()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        self.recompute();
    }

    /// Turns the card at `index` face up. Returns `false` when there was
    /// nothing to reveal.
    pub fn reveal(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) if card.face_down => {
                card.face_down = false;
                self.recompute();
                true
            }
            _ => false,
        }
    }

    pub fn reveal_all(&mut self) {
        for idx in 0..self.cards.len() {
            self.reveal(idx);
        }
    }

    pub fn reset(&mut self) {
        self.cards.clear();
        self.total = 0;
        self.soft = false;
        self.bust = false;
        self.stood = false;
        self.wager = 0;
        self.outcome = Outcome::Pending;
    }

    pub(crate) fn stand(&mut self) {
        self.stood = true;
    }

    pub(crate) fn set_wager(&mut self, wager: u64) {
        self.wager = wager;
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    fn recompute(&mut self) {
        let (total, soft) = score(&self.cards);
        self.total = total;
        self.soft = soft;
        self.bust = total > BLACKJACK;
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.owner)?;
        for card in &self.cards {
            write!(f, " {}", card.to_string().trim_start())?;
        }
        write!(f, " = {}", self.total)?;
        if self.bust {
            write!(f, " (bust)")?;
        }
        Ok(())
    }
}
