//! Turn sequencer: validates actions and drives a session through a round.
//!
//! Every operation requests its cards before touching the session, and the
//! dealer turn runs against a draft that is committed only once the round
//! is resolved. A failed call therefore leaves the session as it was.

use serde::{Deserialize, Serialize};

use super::{
    card::Card,
    errors::{GameError, GameResult},
    hand::{PlayerId, Seat},
    resolver::{RoundSummary, TiePolicy, resolve_round},
    session::{Phase, TableId, TableSession},
};
use crate::supplier::CardSupplier;

/// Cards dealt to each participant when they enter a round.
pub const OPENING_CARDS: usize = 2;

/// Table rules the sequencer enforces.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct HouseRules {
    /// Dealer draws below this total and stands at or above it
    pub dealer_stands_on: u32,

    /// How dealer/player ties are settled
    pub tie_policy: TiePolicy,

    pub min_bet: u64,

    pub max_bet: u64,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            dealer_stands_on: 17,
            tie_policy: TiePolicy::PlayerWins,
            min_bet: 1,
            max_bet: 10_000,
        }
    }
}

impl HouseRules {
    pub fn validate(&self) -> Result<(), String> {
        if self.dealer_stands_on == 0 || self.dealer_stands_on > 21 {
            return Err("Dealer must stand on a total between 1 and 21".to_string());
        }
        if self.min_bet == 0 {
            return Err("Minimum bet must be greater than 0".to_string());
        }
        if self.max_bet < self.min_bet {
            return Err("Maximum bet must be at least the minimum bet".to_string());
        }
        Ok(())
    }

    pub fn check_bet(&self, amount: u64) -> GameResult<()> {
        if amount < self.min_bet || amount > self.max_bet {
            return Err(GameError::InvalidBet {
                amount,
                min: self.min_bet,
                max: self.max_bet,
            });
        }
        Ok(())
    }
}

/// What a hit did to the acting player's hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HitResult {
    pub card: Card,
    pub total: u32,
    pub bust: bool,
}

/// Applies player actions to a [`TableSession`], pulling cards from a
/// [`CardSupplier`].
pub struct TurnSequencer<'a> {
    supplier: &'a dyn CardSupplier,
    rules: &'a HouseRules,
}

impl<'a> TurnSequencer<'a> {
    pub fn new(supplier: &'a dyn CardSupplier, rules: &'a HouseRules) -> Self {
        Self { supplier, rules }
    }

    /// Deals the player into the round. The first bet of a round also deals
    /// the dealer's opening cards, requested after the player's.
    pub async fn bet(
        &self,
        session: &mut TableSession,
        player_id: PlayerId,
        amount: u64,
    ) -> GameResult<()> {
        self.rules.check_bet(amount)?;
        match session.phase() {
            Phase::Betting | Phase::PlayerTurns => {}
            phase => {
                return Err(GameError::InvalidPhase {
                    phase,
                    action: "bet",
                });
            }
        }
        if session.is_dealt_in(player_id) {
            return Err(GameError::AlreadyInRound(player_id));
        }

        let table_id = session.table_id();
        let player_cards = self
            .draw(table_id, Seat::Player(player_id), OPENING_CARDS)
            .await?;
        let dealer_cards = if session.needs_dealer_opening() {
            Some(self.draw(table_id, Seat::Dealer, OPENING_CARDS).await?)
        } else {
            None
        };

        session.seat_player(player_id, player_cards, amount);
        if let Some(cards) = dealer_cards {
            session.deal_dealer_opening(cards);
        }
        Ok(())
    }

    /// Deals one card to the acting player. A bust reveals the dealer's
    /// hole card but does not end the player's turn.
    pub async fn hit(&self, session: &mut TableSession, player_id: PlayerId) -> GameResult<HitResult> {
        self.check_turn(session, player_id, "hit")?;

        let card = self
            .draw(session.table_id(), Seat::Player(player_id), 1)
            .await?
            .remove(0);
        let hand = session.deal_to(Seat::Player(player_id), card);
        let result = HitResult {
            card,
            total: hand.total(),
            bust: hand.is_bust(),
        };

        if result.bust {
            session.reveal_dealer();
        }
        Ok(result)
    }

    /// Stands the player. When it was the last player still acting, the
    /// dealer plays out and the round is resolved.
    pub async fn stay(
        &self,
        session: &mut TableSession,
        player_id: PlayerId,
    ) -> GameResult<Option<RoundSummary>> {
        self.check_turn(session, player_id, "stay")?;

        let mut draft = session.clone();
        draft.stand(player_id);
        let summary = if draft.all_players_finished() {
            Some(self.play_dealer(&mut draft).await?)
        } else {
            None
        };

        *session = draft;
        Ok(summary)
    }

    /// Starts the next round: the supplier takes its cards back, hands are
    /// cleared and turn order is kept.
    pub async fn play_again(&self, session: &mut TableSession, player_id: PlayerId) -> GameResult<()> {
        if !session.is_seated(player_id) {
            return Err(GameError::UnknownPlayer {
                table_id: session.table_id(),
                player_id,
            });
        }
        if session.phase() != Phase::Resolved {
            return Err(GameError::InvalidPhase {
                phase: session.phase(),
                action: "play again",
            });
        }

        self.supplier.reset_table(session.table_id()).await?;
        session.reset_round();
        Ok(())
    }

    /// Reveals the hole card and draws until the dealer reaches
    /// `dealer_stands_on`, then resolves every pending hand.
    async fn play_dealer(&self, session: &mut TableSession) -> GameResult<RoundSummary> {
        let table_id = session.table_id();
        session.set_phase(Phase::DealerTurn);
        session.reveal_dealer();

        // Each card raises the total or hardens a soft ace, so this terminates.
        while session.dealer_total() < self.rules.dealer_stands_on {
            let card = self.draw(table_id, Seat::Dealer, 1).await?.remove(0);
            let hand = session.deal_to(Seat::Dealer, card);
            log::debug!("Table {}: dealer draws {}, total {}", table_id, card, hand.total());
        }

        let summary = resolve_round(session, self.rules.tie_policy);
        session.set_phase(Phase::Resolved);
        Ok(summary)
    }

    fn check_turn(
        &self,
        session: &TableSession,
        player_id: PlayerId,
        action: &'static str,
    ) -> GameResult<()> {
        if !session.is_seated(player_id) {
            return Err(GameError::UnknownPlayer {
                table_id: session.table_id(),
                player_id,
            });
        }
        if session.phase() != Phase::PlayerTurns {
            return Err(GameError::InvalidPhase {
                phase: session.phase(),
                action,
            });
        }
        let hand = session
            .player_hand(player_id)
            .filter(|hand| !hand.is_empty())
            .ok_or(GameError::NotInRound(player_id))?;
        if hand.is_stood() {
            return Err(GameError::AlreadyStood(player_id));
        }
        match session.current_turn() {
            Some(expected) if expected != player_id => Err(GameError::NotYourTurn { expected }),
            _ => Ok(()),
        }
    }

    async fn draw(&self, table_id: TableId, seat: Seat, count: usize) -> GameResult<Vec<Card>> {
        let cards = self.supplier.deal_cards(table_id, seat, count).await?;
        if cards.len() != count {
            return Err(GameError::Storage(format!(
                "supplier returned {} of {} cards",
                cards.len(),
                count
            )));
        }
        Ok(cards)
    }
}
