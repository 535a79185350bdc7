use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::errors::{GameError, GameResult};

/// Blackjack never scores above this without busting.
pub const BLACKJACK: u32 = 21;

/// Difference between a soft (11) and a hard (1) ace.
const ACE_DEMOTION: u32 = 10;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Heart,
    Diamond,
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Heart, Suit::Diamond, Suit::Spade];

    /// Single-letter code used by card storage (`C`, `H`, `D`, `S`).
    pub fn code(self) -> char {
        match self {
            Self::Club => 'C',
            Self::Heart => 'H',
            Self::Diamond => 'D',
            Self::Spade => 'S',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for Suit {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Self::Club),
            "H" => Ok(Self::Heart),
            "D" => Ok(Self::Diamond),
            "S" => Ok(Self::Spade),
            _ => Err(GameError::InvalidCard(format!("unknown suit {s:?}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Point value with aces counted soft.
    pub fn value(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
            Self::Ace => 11,
        }
    }

    pub fn is_ace(self) -> bool {
        self == Self::Ace
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Rank {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        let code = s.trim().to_ascii_uppercase();
        Rank::ALL
            .into_iter()
            .find(|rank| rank.code() == code)
            .ok_or_else(|| GameError::InvalidCard(format!("unknown rank {s:?}")))
    }
}

/// A dealt card. Only `face_down` ever changes after dealing, and only
/// from `true` to `false`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub face_down: bool,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            face_down: false,
        }
    }

    /// Parse the `(value, suit)` pair card storage hands out, e.g. `("10", "H")`.
    pub fn parse(rank: &str, suit: &str) -> GameResult<Self> {
        Ok(Self::new(rank.parse()?, suit.parse()?))
    }

    pub fn value(&self) -> u32 {
        value_of(self)
    }

    pub fn hidden(mut self) -> Self {
        self.face_down = true;
        self
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.face_down {
            return write!(f, "{:>3}", "??");
        }
        let repr = format!("{}{}", self.rank, self.suit);
        write!(f, "{repr:>3}")
    }
}

/// Parses compact codes such as `"AS"`, `"10H"` or `"qd"`.
impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(idx, _)| idx)
            .filter(|idx| *idx > 0)
            .ok_or_else(|| GameError::InvalidCard(format!("malformed card {s:?}")))?;
        let (rank, suit) = s.split_at(split);
        Self::parse(rank, suit)
    }
}

/// Point value of a single card, aces counted as 11.
pub fn value_of(card: &Card) -> u32 {
    card.rank.value()
}

/// Scores revealed cards with the soft/hard ace rule.
///
/// Every ace starts at 11 and is demoted to 1 while the total is over 21.
/// Returns the total and whether an ace is still counted as 11.
pub fn score<'a>(cards: impl IntoIterator<Item = &'a Card>) -> (u32, bool) {
    let mut total = 0;
    let mut soft_aces = 0;

    for card in cards.into_iter().filter(|card| !card.face_down) {
        total += value_of(card);
        if card.rank.is_ace() {
            soft_aces += 1;
        }
    }

    while total > BLACKJACK && soft_aces > 0 {
        total -= ACE_DEMOTION;
        soft_aces -= 1;
    }

    (total, soft_aces > 0)
}
