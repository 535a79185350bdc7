/// Property-based tests for hand scoring and round resolution
///
/// These tests check the ace rule, bust detection and the dealer draw
/// rule across randomly generated hands.
use blackjack_table::{
    BLACKJACK, Card, HouseRules, InMemoryLedger, Outcome, Phase, Rank, SessionRegistry,
    StackedSupplier, Suit, TableConfig, TiePolicy, game::resolve_outcome, score, value_of,
};
use proptest::prelude::*;
use std::sync::Arc;

// Strategy to generate any face-up card
fn card_strategy() -> impl Strategy<Value = Card> {
    (0usize..13, 0usize..4).prop_map(|(rank_idx, suit_idx)| {
        Card::new(Rank::ALL[rank_idx], Suit::ALL[suit_idx])
    })
}

fn hand_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), min..=max)
}

// Total with every ace counted as 1
fn hard_total(cards: &[Card]) -> u32 {
    cards
        .iter()
        .map(|card| if card.rank.is_ace() { 1 } else { value_of(card) })
        .sum()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn test_total_is_best_ace_assignment(cards in hand_strategy(0, 12)) {
        let (total, soft) = score(&cards);
        let hard = hard_total(&cards);
        let has_ace = cards.iter().any(|card| card.rank.is_ace());

        // At most one ace can count as 11 without busting
        if has_ace && hard + 10 <= BLACKJACK {
            prop_assert_eq!(total, hard + 10);
            prop_assert!(soft);
        } else {
            prop_assert_eq!(total, hard);
            prop_assert!(!soft);
        }
    }

    #[test]
    fn test_soft_total_never_busts(cards in hand_strategy(1, 12)) {
        let (total, soft) = score(&cards);
        if soft {
            prop_assert!(total <= BLACKJACK);
        }
    }

    #[test]
    fn test_face_down_cards_are_not_scored(
        cards in hand_strategy(1, 6),
        hidden in card_strategy(),
    ) {
        let mut with_hidden = cards.clone();
        with_hidden.push(hidden.hidden());
        prop_assert_eq!(score(&with_hidden), score(&cards));
    }

    #[test]
    fn test_order_does_not_matter(cards in hand_strategy(0, 8)) {
        let mut reversed = cards.clone();
        reversed.reverse();
        prop_assert_eq!(score(&reversed), score(&cards));
    }

    #[test]
    fn test_resolution_is_deterministic(
        dealer in 4u32..=30,
        player in 4u32..=30,
        push_ties in any::<bool>(),
    ) {
        let policy = if push_ties { TiePolicy::Push } else { TiePolicy::PlayerWins };
        let dealer_bust = dealer > BLACKJACK;
        let player_bust = player > BLACKJACK;
        let outcome = resolve_outcome(dealer, dealer_bust, player, player_bust, policy);

        prop_assert_eq!(
            outcome,
            resolve_outcome(dealer, dealer_bust, player, player_bust, policy)
        );
        prop_assert_ne!(outcome, Outcome::Pending);
        if player_bust {
            prop_assert_eq!(outcome, Outcome::Lose);
        } else if dealer_bust || dealer < player {
            prop_assert_eq!(outcome, Outcome::Win);
        } else if dealer > player {
            prop_assert_eq!(outcome, Outcome::Lose);
        }
    }

    #[test]
    fn test_dealer_stops_at_threshold(
        opening in hand_strategy(2, 2),
        draws in hand_strategy(12, 12),
        player in hand_strategy(2, 2),
    ) {
        let rules = HouseRules::default();
        let mut codes: Vec<Card> = player.clone();
        codes.extend(&opening);
        codes.extend(&draws);

        let registry = SessionRegistry::new(
            TableConfig::default(),
            Arc::new(StackedSupplier::new(codes)),
            Arc::new(InMemoryLedger::new(100)),
        );

        let snapshot = runtime().block_on(async {
            registry.bet(1, 1, 10).await.unwrap();
            registry.stay(1, 1).await.unwrap()
        });

        prop_assert_eq!(snapshot.phase, Phase::Resolved);
        let dealer = snapshot.dealer.unwrap();
        let dealer_cards: Vec<Card> = dealer.cards.iter().flatten().copied().collect();
        prop_assert_eq!(dealer_cards.len(), dealer.cards.len());
        prop_assert!(dealer.total >= rules.dealer_stands_on);

        // Without its last card the dealer was still under the threshold
        if dealer_cards.len() > 2 {
            let (before_last, _) = score(&dealer_cards[..dealer_cards.len() - 1]);
            prop_assert!(before_last < rules.dealer_stands_on);
        }
    }
}
