//! Per-table round state: hands, turn order and phase.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

use super::{
    card::Card,
    hand::{Hand, Outcome, PlayerId, Seat},
};

/// Table identifier
pub type TableId = i64;

/// Round phase. Moves `Betting -> PlayerTurns -> DealerTurn -> Resolved`
/// and back to `Betting` on play-again.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Betting,
    PlayerTurns,
    DealerTurn,
    Resolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Betting => "betting",
            Self::PlayerTurns => "player turns",
            Self::DealerTurn => "dealer turn",
            Self::Resolved => "resolved",
        };
        write!(f, "{repr}")
    }
}

/// Full state of one table for the current round.
///
/// Mutators are crate-private; outside callers go through the turn
/// sequencer so phase rules are always enforced.
#[derive(Clone, Debug)]
pub struct TableSession {
    table_id: TableId,
    round: u32,
    hands: HashMap<Seat, Hand>,
    /// Seated players in the order they first bet. Survives play-again.
    turn_order: Vec<PlayerId>,
    /// Number of `turn_order` members dealt into this round. Equal to
    /// `turn_order.len()` once every seated player has bet.
    turn_index: usize,
    phase: Phase,
}

impl TableSession {
    pub fn new(table_id: TableId) -> Self {
        Self {
            table_id,
            round: 1,
            hands: HashMap::new(),
            turn_order: Vec::new(),
            turn_index: 0,
            phase: Phase::Betting,
        }
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn hand(&self, seat: Seat) -> Option<&Hand> {
        self.hands.get(&seat)
    }

    pub fn dealer_hand(&self) -> Option<&Hand> {
        self.hand(Seat::Dealer)
    }

    pub fn dealer_total(&self) -> u32 {
        self.dealer_hand().map_or(0, Hand::total)
    }

    pub fn player_hand(&self, player_id: PlayerId) -> Option<&Hand> {
        self.hand(Seat::Player(player_id))
    }

    /// Player hands in turn order.
    pub fn player_hands(&self) -> impl Iterator<Item = &Hand> {
        self.turn_order
            .iter()
            .filter_map(|id| self.hands.get(&Seat::Player(*id)))
    }

    pub fn is_seated(&self, player_id: PlayerId) -> bool {
        self.turn_order.contains(&player_id)
    }

    /// Whether the player holds cards this round.
    pub fn is_dealt_in(&self, player_id: PlayerId) -> bool {
        self.player_hand(player_id).is_some_and(|hand| !hand.is_empty())
    }

    /// True until the dealer's opening cards are out for this round.
    pub fn needs_dealer_opening(&self) -> bool {
        self.dealer_hand().is_none_or(Hand::is_empty)
    }

    /// The dealt-in player expected to act next, or `None` when every one
    /// of them has stayed.
    pub fn current_turn(&self) -> Option<PlayerId> {
        self.player_hands()
            .find(|hand| !hand.is_empty() && !hand.is_stood())
            .and_then(|hand| match hand.owner() {
                Seat::Player(id) => Some(id),
                Seat::Dealer => None,
            })
    }

    /// True once at least one player is dealt in and all of them stayed.
    pub fn all_players_finished(&self) -> bool {
        let mut dealt = self.player_hands().filter(|hand| !hand.is_empty()).peekable();
        dealt.peek().is_some() && dealt.all(Hand::is_stood)
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Deals a player into the round with their opening cards.
    pub(crate) fn seat_player(&mut self, player_id: PlayerId, cards: Vec<Card>, wager: u64) {
        let seat = Seat::Player(player_id);
        let hand = self.hands.entry(seat).or_insert_with(|| Hand::new(seat));
        hand.reset();
        hand.set_wager(wager);
        for card in cards {
            hand.add_card(card);
        }

        if !self.turn_order.contains(&player_id) {
            self.turn_order.push(player_id);
        }
        self.turn_index = (self.turn_index + 1).min(self.turn_order.len());
        self.phase = Phase::PlayerTurns;
    }

    /// Deals the dealer's opening cards; every card after the first is
    /// dealt face down.
    pub(crate) fn deal_dealer_opening(&mut self, cards: Vec<Card>) {
        let hand = self
            .hands
            .entry(Seat::Dealer)
            .or_insert_with(|| Hand::new(Seat::Dealer));
        for (idx, card) in cards.into_iter().enumerate() {
            if idx == 0 {
                hand.add_card(card);
            } else {
                hand.add_card(card.hidden());
            }
        }
    }

    pub(crate) fn deal_to(&mut self, seat: Seat, card: Card) -> &Hand {
        let hand = self.hands.entry(seat).or_insert_with(|| Hand::new(seat));
        hand.add_card(card);
        hand
    }

    pub(crate) fn stand(&mut self, player_id: PlayerId) {
        if let Some(hand) = self.hands.get_mut(&Seat::Player(player_id)) {
            hand.stand();
        }
    }

    pub(crate) fn reveal_dealer(&mut self) {
        if let Some(hand) = self.hands.get_mut(&Seat::Dealer) {
            hand.reveal_all();
        }
    }

    pub(crate) fn set_outcome(&mut self, player_id: PlayerId, outcome: Outcome) {
        if let Some(hand) = self.hands.get_mut(&Seat::Player(player_id)) {
            hand.set_outcome(outcome);
        }
    }

    /// Clears every hand for the next round. Turn order membership and
    /// ordering are kept.
    pub(crate) fn reset_round(&mut self) {
        for hand in self.hands.values_mut() {
            hand.reset();
        }
        self.turn_index = 0;
        self.phase = Phase::Betting;
        self.round += 1;
    }

    /// Client view with face-down cards masked.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            table_id: self.table_id,
            round: self.round,
            phase: self.phase,
            turn_order: self.turn_order.clone(),
            turn_index: self.turn_index,
            current_turn: self.current_turn(),
            dealer: self.dealer_hand().map(HandView::from),
            players: self.player_hands().map(HandView::from).collect(),
        }
    }
}

/// Serializable view of a table, safe to broadcast to every seat.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub round: u32,
    pub phase: Phase,
    pub turn_order: Vec<PlayerId>,
    pub turn_index: usize,
    pub current_turn: Option<PlayerId>,
    pub dealer: Option<HandView>,
    pub players: Vec<HandView>,
}

impl TableSnapshot {
    pub fn player(&self, player_id: PlayerId) -> Option<&HandView> {
        self.players
            .iter()
            .find(|view| view.seat == Seat::Player(player_id))
    }
}

/// Hand as clients see it. Face-down cards are `None`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandView {
    pub seat: Seat,
    pub cards: Vec<Option<Card>>,
    pub total: u32,
    pub soft: bool,
    pub bust: bool,
    pub stood: bool,
    pub wager: u64,
    pub outcome: Outcome,
}

impl From<&Hand> for HandView {
    fn from(hand: &Hand) -> Self {
        Self {
            seat: hand.owner(),
            cards: hand
                .cards()
                .iter()
                .map(|card| (!card.face_down).then_some(*card))
                .collect(),
            total: hand.total(),
            soft: hand.is_soft(),
            bust: hand.is_bust(),
            stood: hand.is_stood(),
            wager: hand.wager(),
            outcome: hand.outcome(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|code| code.parse().unwrap()).collect()
    }

    // === Seating Tests ===

    #[test]
    fn test_new_session() {
        let session = TableSession::new(1);
        assert_eq!(session.phase(), Phase::Betting);
        assert_eq!(session.round(), 1);
        assert!(session.turn_order().is_empty());
        assert_eq!(session.turn_index(), 0);
        assert!(session.needs_dealer_opening());
        assert!(!session.all_players_finished());
    }

    #[test]
    fn test_seat_player_appends_once() {
        let mut session = TableSession::new(1);
        session.seat_player(3, cards(&["10H", "7C"]), 10);
        assert_eq!(session.turn_order(), &[3]);
        assert_eq!(session.turn_index(), 1);
        assert_eq!(session.phase(), Phase::PlayerTurns);
        assert_eq!(session.player_hand(3).unwrap().total(), 17);

        session.seat_player(3, cards(&["2H", "3C"]), 10);
        assert_eq!(session.turn_order(), &[3]);
        assert_eq!(session.turn_index(), 1);
    }

    #[test]
    fn test_dealer_opening_hides_second_card() {
        let mut session = TableSession::new(1);
        session.deal_dealer_opening(cards(&["6C", "9D"]));
        let dealer = session.dealer_hand().unwrap();
        assert!(!dealer.cards()[0].face_down);
        assert!(dealer.cards()[1].face_down);
        assert_eq!(dealer.total(), 6);
        assert!(!session.needs_dealer_opening());

        session.reveal_dealer();
        assert_eq!(session.dealer_total(), 15);
    }

    // === Turn Tests ===

    #[test]
    fn test_current_turn_follows_turn_order() {
        let mut session = TableSession::new(1);
        session.seat_player(1, cards(&["10H", "7C"]), 10);
        session.seat_player(3, cards(&["9H", "8C"]), 10);
        assert_eq!(session.current_turn(), Some(1));

        session.stand(1);
        assert_eq!(session.current_turn(), Some(3));
        assert!(!session.all_players_finished());

        session.stand(3);
        assert_eq!(session.current_turn(), None);
        assert!(session.all_players_finished());
    }

    #[test]
    fn test_reset_round_keeps_turn_order() {
        let mut session = TableSession::new(1);
        session.seat_player(1, cards(&["10H", "7C"]), 10);
        session.seat_player(3, cards(&["9H", "8C"]), 10);
        session.deal_dealer_opening(cards(&["6C", "9D"]));
        session.set_outcome(1, Outcome::Win);
        session.set_phase(Phase::Resolved);

        session.reset_round();
        assert_eq!(session.turn_order(), &[1, 3]);
        assert_eq!(session.turn_index(), 0);
        assert_eq!(session.phase(), Phase::Betting);
        assert_eq!(session.round(), 2);
        for hand in session.player_hands() {
            assert!(hand.is_empty());
            assert_eq!(hand.total(), 0);
            assert_eq!(hand.outcome(), Outcome::Pending);
        }
        assert!(session.needs_dealer_opening());
        assert!(!session.is_dealt_in(1));
        assert!(session.is_seated(1));
    }

    // === Snapshot Tests ===

    #[test]
    fn test_snapshot_masks_hole_card() {
        let mut session = TableSession::new(9);
        session.seat_player(1, cards(&["10H", "7C"]), 25);
        session.deal_dealer_opening(cards(&["6C", "9D"]));

        let snapshot = session.snapshot();
        let dealer = snapshot.dealer.unwrap();
        assert!(dealer.cards[0].is_some());
        assert!(dealer.cards[1].is_none());
        assert_eq!(dealer.total, 6);

        let player = snapshot.players.first().unwrap();
        assert_eq!(player.seat, Seat::Player(1));
        assert_eq!(player.wager, 25);
        assert_eq!(snapshot.current_turn, Some(1));
    }
}
