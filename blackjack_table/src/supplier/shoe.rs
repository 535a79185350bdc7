use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{CardSupplier, SupplyError, SupplyResult};
use crate::game::{Card, Rank, Seat, Suit, TableId};

/// Cards in one standard deck.
pub const DECK_SIZE: usize = 52;

/// One or more standard decks shuffled together.
#[derive(Debug)]
pub struct Shoe {
    cards: Vec<Card>,
    pub shoe_idx: usize,
}

impl Shoe {
    pub fn new(decks: usize) -> Self {
        let mut cards = Vec::with_capacity(decks * DECK_SIZE);
        for _ in 0..decks {
            for rank in Rank::ALL {
                for suit in Suit::ALL {
                    cards.push(Card::new(rank, suit));
                }
            }
        }
        Self { cards, shoe_idx: 0 }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.shoe_idx
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.cards.get(self.shoe_idx).copied()?;
        self.shoe_idx += 1;
        Some(card)
    }

    pub fn shuffle(&mut self, rng: &mut StdRng) {
        self.cards.shuffle(rng);
        self.shoe_idx = 0;
    }
}

struct ShoeState {
    rng: StdRng,
    shoes: HashMap<TableId, Shoe>,
}

/// In-memory supplier keeping one shuffled shoe per table.
pub struct ShoeSupplier {
    decks: usize,
    state: Mutex<ShoeState>,
}

impl ShoeSupplier {
    pub fn new(decks: usize) -> Self {
        Self::with_rng(decks, StdRng::from_os_rng())
    }

    /// Deterministic shuffles for reproducible games.
    pub fn with_seed(decks: usize, seed: u64) -> Self {
        Self::with_rng(decks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(decks: usize, rng: StdRng) -> Self {
        Self {
            decks: decks.max(1),
            state: Mutex::new(ShoeState {
                rng,
                shoes: HashMap::new(),
            }),
        }
    }

    pub fn decks(&self) -> usize {
        self.decks
    }

    /// Cards left in a table's shoe. Tables that never dealt report a full shoe.
    pub async fn remaining(&self, table_id: TableId) -> usize {
        let state = self.state.lock().await;
        state
            .shoes
            .get(&table_id)
            .map_or(self.decks * DECK_SIZE, Shoe::remaining)
    }
}

#[async_trait]
impl CardSupplier for ShoeSupplier {
    async fn deal_cards(
        &self,
        table_id: TableId,
        seat: Seat,
        count: usize,
    ) -> SupplyResult<Vec<Card>> {
        let mut state = self.state.lock().await;
        let ShoeState { rng, shoes } = &mut *state;
        let shoe = shoes.entry(table_id).or_insert_with(|| {
            let mut shoe = Shoe::new(self.decks);
            shoe.shuffle(rng);
            shoe
        });

        if count > shoe.len() {
            log::warn!(
                "Table {}: {} cards requested for {}, shoe holds {}",
                table_id,
                count,
                seat,
                shoe.len()
            );
            return Err(SupplyError::DeckExhausted(table_id));
        }

        // A dry shoe is rebuilt mid-round so the table can always finish.
        if shoe.remaining() < count {
            log::info!(
                "Table {}: {} cards left, reshuffling the shoe",
                table_id,
                shoe.remaining()
            );
            *shoe = Shoe::new(self.decks);
            shoe.shuffle(rng);
        }

        let cards: Vec<Card> = (0..count).filter_map(|_| shoe.deal_card()).collect();
        log::debug!("Table {}: dealt {} card(s) to {}", table_id, cards.len(), seat);
        Ok(cards)
    }

    async fn reset_table(&self, table_id: TableId) -> SupplyResult<()> {
        let mut state = self.state.lock().await;
        let ShoeState { rng, shoes } = &mut *state;
        let shoe = shoes
            .entry(table_id)
            .or_insert_with(|| Shoe::new(self.decks));
        shoe.shuffle(rng);
        log::debug!("Table {}: shoe reshuffled", table_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // === Shoe Tests ===

    #[test]
    fn test_shoe_initialization() {
        let shoe = Shoe::new(1);
        assert_eq!(shoe.len(), DECK_SIZE);
        assert_eq!(shoe.remaining(), DECK_SIZE);

        let unique: HashSet<_> = shoe.cards.iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_multi_deck_shoe() {
        let shoe = Shoe::new(6);
        assert_eq!(shoe.len(), 6 * DECK_SIZE);
    }

    #[test]
    fn test_shoe_deal_card() {
        let mut shoe = Shoe::new(1);
        for i in 1..=5 {
            let card = shoe.deal_card().unwrap();
            assert!(!card.face_down);
            assert_eq!(shoe.shoe_idx, i);
        }
    }

    #[test]
    fn test_shoe_runs_dry() {
        let mut shoe = Shoe::new(1);
        for _ in 0..DECK_SIZE {
            assert!(shoe.deal_card().is_some());
        }
        assert!(shoe.deal_card().is_none());
        assert_eq!(shoe.remaining(), 0);
    }

    #[test]
    fn test_shoe_shuffle_resets_index() {
        let mut shoe = Shoe::new(1);
        shoe.deal_card();
        shoe.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(shoe.shoe_idx, 0);
        assert_eq!(shoe.len(), DECK_SIZE);
    }

    // === Supplier Tests ===

    #[tokio::test]
    async fn test_supplier_deals_requested_count() {
        let supplier = ShoeSupplier::with_seed(1, 42);
        let cards = supplier.deal_cards(1, Seat::Player(1), 2).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(supplier.remaining(1).await, DECK_SIZE - 2);
        assert_eq!(supplier.remaining(2).await, DECK_SIZE);
    }

    #[tokio::test]
    async fn test_supplier_reshuffles_dry_shoe() {
        let supplier = ShoeSupplier::with_seed(1, 42);
        supplier.deal_cards(1, Seat::Dealer, 51).await.unwrap();

        let cards = supplier.deal_cards(1, Seat::Dealer, 2).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(supplier.remaining(1).await, DECK_SIZE - 2);
    }

    #[tokio::test]
    async fn test_supplier_never_runs_out() {
        let supplier = ShoeSupplier::with_seed(1, 3);
        for _ in 0..200 {
            supplier.deal_cards(1, Seat::Player(1), 1).await.unwrap();
        }
        assert!(supplier.remaining(1).await <= DECK_SIZE);
    }

    #[tokio::test]
    async fn test_supplier_rejects_request_larger_than_shoe() {
        let supplier = ShoeSupplier::with_seed(1, 42);
        let err = supplier
            .deal_cards(1, Seat::Dealer, DECK_SIZE + 1)
            .await
            .unwrap_err();
        assert_eq!(err, SupplyError::DeckExhausted(1));
        assert_eq!(supplier.remaining(1).await, DECK_SIZE);
    }

    #[tokio::test]
    async fn test_supplier_reset_refills() {
        let supplier = ShoeSupplier::with_seed(2, 42);
        supplier.deal_cards(5, Seat::Player(1), 30).await.unwrap();
        supplier.reset_table(5).await.unwrap();
        assert_eq!(supplier.remaining(5).await, 2 * DECK_SIZE);
    }

    #[tokio::test]
    async fn test_seeded_suppliers_agree() {
        let a = ShoeSupplier::with_seed(1, 9);
        let b = ShoeSupplier::with_seed(1, 9);
        assert_eq!(
            a.deal_cards(1, Seat::Dealer, 10).await.unwrap(),
            b.deal_cards(1, Seat::Dealer, 10).await.unwrap()
        );
    }
}
