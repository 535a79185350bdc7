use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use super::{CardSupplier, SupplyError, SupplyResult};
use crate::game::{Card, GameResult, Seat, TableId};

#[derive(Default)]
struct Stack {
    cards: VecDeque<Card>,
    fail_next: Option<SupplyError>,
    resets: usize,
}

/// Deals a fixed sequence of cards to every table in request order.
///
/// Useful for replaying a recorded game or scripting a scenario.
#[derive(Default)]
pub struct StackedSupplier {
    stack: Mutex<Stack>,
}

impl StackedSupplier {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            stack: Mutex::new(Stack {
                cards: cards.into_iter().collect(),
                ..Stack::default()
            }),
        }
    }

    /// Builds a stack from compact codes such as `["10H", "7C", "AS"]`.
    pub fn from_codes(codes: &[&str]) -> GameResult<Self> {
        let cards = codes
            .iter()
            .map(|code| code.parse())
            .collect::<GameResult<Vec<Card>>>()?;
        Ok(Self::new(cards))
    }

    pub async fn push(&self, cards: impl IntoIterator<Item = Card>) {
        self.stack.lock().await.cards.extend(cards);
    }

    /// Makes the next `deal_cards` call fail with `err`.
    pub async fn fail_next(&self, err: SupplyError) {
        self.stack.lock().await.fail_next = Some(err);
    }

    pub async fn remaining(&self) -> usize {
        self.stack.lock().await.cards.len()
    }

    pub async fn resets(&self) -> usize {
        self.stack.lock().await.resets
    }
}

#[async_trait]
impl CardSupplier for StackedSupplier {
    async fn deal_cards(
        &self,
        table_id: TableId,
        _seat: Seat,
        count: usize,
    ) -> SupplyResult<Vec<Card>> {
        let mut stack = self.stack.lock().await;
        if let Some(err) = stack.fail_next.take() {
            return Err(err);
        }
        if stack.cards.len() < count {
            return Err(SupplyError::DeckExhausted(table_id));
        }
        Ok(stack.cards.drain(..count).collect())
    }

    async fn reset_table(&self, _table_id: TableId) -> SupplyResult<()> {
        let mut stack = self.stack.lock().await;
        if let Some(err) = stack.fail_next.take() {
            return Err(err);
        }
        stack.resets += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deals_in_order() {
        let supplier = StackedSupplier::from_codes(&["10H", "7C", "6C"]).unwrap();
        let cards = supplier.deal_cards(1, Seat::Player(1), 2).await.unwrap();
        let expected: Vec<Card> = vec!["10H".parse().unwrap(), "7C".parse().unwrap()];
        assert_eq!(cards, expected);
        assert_eq!(supplier.remaining().await, 1);
    }

    #[tokio::test]
    async fn test_short_stack_is_exhausted() {
        let supplier = StackedSupplier::from_codes(&["10H"]).unwrap();
        let err = supplier.deal_cards(4, Seat::Dealer, 2).await.unwrap_err();
        assert_eq!(err, SupplyError::DeckExhausted(4));
        assert_eq!(supplier.remaining().await, 1);
    }

    #[tokio::test]
    async fn test_fail_next_fires_once() {
        let supplier = StackedSupplier::from_codes(&["10H", "7C"]).unwrap();
        supplier
            .fail_next(SupplyError::Storage("offline".to_string()))
            .await;
        assert!(supplier.deal_cards(1, Seat::Dealer, 1).await.is_err());
        assert_eq!(supplier.remaining().await, 2);
        assert!(supplier.deal_cards(1, Seat::Dealer, 1).await.is_ok());
    }

    #[test]
    fn test_from_codes_rejects_bad_card() {
        assert!(StackedSupplier::from_codes(&["10H", "1X"]).is_err());
    }
}
