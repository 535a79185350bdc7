//! Session registry for spawning and addressing table actors.

use super::{
    actor::{TableActor, TableHandle},
    config::TableConfig,
    messages::{TableEvent, TableMessage},
};
use crate::{
    game::{GameError, GameResult, PlayerId, TableId, TableSnapshot},
    ledger::{Balance, Ledger},
    supplier::CardSupplier,
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::{RwLock, mpsc};

/// Event stream handed out by [`SessionRegistry::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    pub table_id: TableId,
    pub subscriber_id: u64,
    pub events: mpsc::Receiver<TableEvent>,
}

/// Registry of live tables keyed by table id.
///
/// Tables are created lazily by the first bet (or an explicit
/// [`open_table`](Self::open_table)); every other action on an unknown
/// table fails with [`GameError::UnknownTable`].
pub struct SessionRegistry {
    /// Configuration applied to newly opened tables
    config: TableConfig,

    /// Shared card source
    supplier: Arc<dyn CardSupplier>,

    /// Shared bank collaborator
    ledger: Arc<dyn Ledger>,

    /// Active table handles
    tables: Arc<RwLock<HashMap<TableId, TableHandle>>>,

    next_subscriber_id: AtomicU64,
}

impl SessionRegistry {
    /// Create a new registry
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for every table this registry opens
    /// * `supplier` - Card supplier shared by all tables
    /// * `ledger` - Ledger shared by all tables
    pub fn new(
        config: TableConfig,
        supplier: Arc<dyn CardSupplier>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            config,
            supplier,
            ledger,
            tables: Arc::new(RwLock::new(HashMap::new())),
            next_subscriber_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Get the handle for a table, spawning its actor if absent.
    ///
    /// Two concurrent callers for the same id always end up with the same
    /// actor.
    pub async fn open_table(&self, table_id: TableId) -> TableHandle {
        if let Some(handle) = self.get_table(table_id).await {
            return handle;
        }

        let mut tables = self.tables.write().await;
        if let Some(handle) = tables.get(&table_id)
            && !handle.is_closed()
        {
            return handle.clone();
        }

        let (actor, handle) = TableActor::new(
            table_id,
            self.config.clone(),
            self.supplier.clone(),
            self.ledger.clone(),
        );
        tokio::spawn(actor.run());
        tables.insert(table_id, handle.clone());
        drop(tables);

        log::info!("Opened table {}", table_id);

        handle
    }

    /// Get a live table handle
    pub async fn get_table(&self, table_id: TableId) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables
            .get(&table_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    fn require_table(
        handle: Option<TableHandle>,
        table_id: TableId,
    ) -> GameResult<TableHandle> {
        handle.ok_or(GameError::UnknownTable(table_id))
    }

    /// Ids of all live tables, ascending
    pub async fn table_ids(&self) -> Vec<TableId> {
        let tables = self.tables.read().await;
        let mut ids: Vec<TableId> = tables
            .iter()
            .filter(|(_, handle)| !handle.is_closed())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub async fn active_table_count(&self) -> usize {
        self.table_ids().await.len()
    }

    /// Stop a table's actor and forget it. Unknown ids are a no-op.
    pub async fn close_table(&self, table_id: TableId) -> GameResult<()> {
        let handle = self.tables.write().await.remove(&table_id);

        if let Some(handle) = handle {
            // An actor that already stopped has nothing left to close.
            if let Err(e) = handle
                .request(|response| TableMessage::Close { response })
                .await
            {
                log::debug!("Table {} was already stopped: {}", table_id, e);
            }
            log::info!("Closed table {}", table_id);
        }

        Ok(())
    }

    /// Place a bet, opening the table if needed.
    ///
    /// Amounts outside the table limits are rejected before any table is
    /// opened.
    pub async fn bet(
        &self,
        table_id: TableId,
        player_id: PlayerId,
        amount: u64,
    ) -> GameResult<TableSnapshot> {
        self.config.rules.check_bet(amount)?;
        let handle = self.open_table(table_id).await;
        handle
            .request(|response| TableMessage::Bet {
                player_id,
                amount,
                response,
            })
            .await?
    }

    pub async fn hit(&self, table_id: TableId, player_id: PlayerId) -> GameResult<TableSnapshot> {
        let handle = Self::require_table(self.get_table(table_id).await, table_id)?;
        handle
            .request(|response| TableMessage::Hit {
                player_id,
                response,
            })
            .await?
    }

    pub async fn stay(&self, table_id: TableId, player_id: PlayerId) -> GameResult<TableSnapshot> {
        let handle = Self::require_table(self.get_table(table_id).await, table_id)?;
        handle
            .request(|response| TableMessage::Stay {
                player_id,
                response,
            })
            .await?
    }

    pub async fn play_again(
        &self,
        table_id: TableId,
        player_id: PlayerId,
    ) -> GameResult<TableSnapshot> {
        let handle = Self::require_table(self.get_table(table_id).await, table_id)?;
        handle
            .request(|response| TableMessage::PlayAgain {
                player_id,
                response,
            })
            .await?
    }

    /// Current table state
    pub async fn state(&self, table_id: TableId) -> GameResult<TableSnapshot> {
        let handle = Self::require_table(self.get_table(table_id).await, table_id)?;
        handle
            .request(|response| TableMessage::GetState { response })
            .await
    }

    /// A player's balance at a table
    pub async fn balance(&self, table_id: TableId, player_id: PlayerId) -> GameResult<Balance> {
        let handle = Self::require_table(self.get_table(table_id).await, table_id)?;
        handle
            .request(|response| TableMessage::GetBalance {
                player_id,
                response,
            })
            .await?
    }

    /// Subscribe to a table's events
    pub async fn subscribe(&self, table_id: TableId) -> GameResult<Subscription> {
        let handle = Self::require_table(self.get_table(table_id).await, table_id)?;
        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (sender, events) = mpsc::channel(self.config.subscriber_capacity.max(1));

        handle
            .send(TableMessage::Subscribe {
                subscriber_id,
                sender,
            })
            .await?;

        Ok(Subscription {
            table_id,
            subscriber_id,
            events,
        })
    }

    pub async fn unsubscribe(&self, table_id: TableId, subscriber_id: u64) -> GameResult<()> {
        match self.get_table(table_id).await {
            Some(handle) => {
                handle
                    .send(TableMessage::Unsubscribe { subscriber_id })
                    .await
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::Phase,
        ledger::InMemoryLedger,
        supplier::{ShoeSupplier, StackedSupplier},
    };

    fn registry_with(supplier: Arc<dyn CardSupplier>) -> SessionRegistry {
        SessionRegistry::new(
            TableConfig::default(),
            supplier,
            Arc::new(InMemoryLedger::new(100)),
        )
    }

    // === Table lifecycle ===

    #[tokio::test]
    async fn test_open_table_is_idempotent() {
        let registry = registry_with(Arc::new(ShoeSupplier::with_seed(1, 7)));
        let first = registry.open_table(3).await;
        let second = registry.open_table(3).await;

        assert_eq!(first.table_id(), second.table_id());
        assert_eq!(registry.active_table_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_open_spawns_one_actor() {
        let registry = Arc::new(registry_with(Arc::new(ShoeSupplier::with_seed(1, 7))));
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move { registry.open_table(9).await }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(registry.table_ids().await, vec![9]);
    }

    #[tokio::test]
    async fn test_close_table() {
        let registry = registry_with(Arc::new(ShoeSupplier::with_seed(1, 7)));
        registry.open_table(1).await;
        registry.open_table(2).await;

        registry.close_table(1).await.unwrap();
        assert_eq!(registry.table_ids().await, vec![2]);
        assert_eq!(
            registry.state(1).await.unwrap_err(),
            GameError::UnknownTable(1)
        );

        // Closing twice is fine
        registry.close_table(1).await.unwrap();
    }

    // === Routing ===

    #[tokio::test]
    async fn test_actions_on_unknown_table() {
        let registry = registry_with(Arc::new(StackedSupplier::default()));

        assert_eq!(
            registry.hit(4, 1).await.unwrap_err(),
            GameError::UnknownTable(4)
        );
        assert_eq!(
            registry.stay(4, 1).await.unwrap_err(),
            GameError::UnknownTable(4)
        );
        assert_eq!(
            registry.play_again(4, 1).await.unwrap_err(),
            GameError::UnknownTable(4)
        );
        assert!(registry.subscribe(4).await.is_err());
        assert_eq!(registry.active_table_count().await, 0);
    }

    #[tokio::test]
    async fn test_bet_opens_table() {
        let supplier = StackedSupplier::from_codes(&["10H", "7C", "6C", "9D"]).unwrap();
        let registry = registry_with(Arc::new(supplier));

        let snapshot = registry.bet(12, 1, 5).await.unwrap();
        assert_eq!(snapshot.table_id, 12);
        assert_eq!(snapshot.phase, Phase::PlayerTurns);
        assert_eq!(registry.table_ids().await, vec![12]);

        let balance = registry.balance(12, 1).await.unwrap();
        assert_eq!(balance.amount, 95);
    }

    #[tokio::test]
    async fn test_invalid_bet_does_not_open_table() {
        let registry = registry_with(Arc::new(StackedSupplier::default()));

        assert!(matches!(
            registry.bet(6, 1, 0).await.unwrap_err(),
            GameError::InvalidBet { amount: 0, .. }
        ));
        assert_eq!(registry.active_table_count().await, 0);
        assert_eq!(
            registry.state(6).await.unwrap_err(),
            GameError::UnknownTable(6)
        );
    }

    #[tokio::test]
    async fn test_subscription_receives_events() {
        let supplier = StackedSupplier::from_codes(&["10H", "7C", "6C", "9D"]).unwrap();
        let registry = registry_with(Arc::new(supplier));
        registry.open_table(1).await;

        let mut subscription = registry.subscribe(1).await.unwrap();
        registry.bet(1, 1, 5).await.unwrap();

        let event = subscription.events.recv().await.unwrap();
        assert_eq!(event.name(), "PLAYER_BET");

        registry
            .unsubscribe(1, subscription.subscriber_id)
            .await
            .unwrap();
    }
}
