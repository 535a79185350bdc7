//! Table actor implementation with async message handling.

use super::{
    config::TableConfig,
    messages::{TableEvent, TableMessage},
};
use crate::{
    game::{GameError, GameResult, PlayerId, TableId, TableSession, TableSnapshot, TurnSequencer},
    ledger::Ledger,
    supplier::CardSupplier,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, oneshot};

/// Table actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    table_id: TableId,
}

impl TableHandle {
    /// Create a new table handle
    pub fn new(sender: mpsc::Sender<TableMessage>, table_id: TableId) -> Self {
        Self { sender, table_id }
    }

    /// Get table ID
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the table
    pub async fn send(&self, message: TableMessage) -> GameResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| GameError::TableClosed(self.table_id))
    }

    /// Send a message built around a reply channel and wait for the reply.
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TableMessage,
    ) -> GameResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| GameError::TableClosed(self.table_id))
    }
}

/// Table actor owning a single table session.
///
/// Messages are handled one at a time, including the awaits on the card
/// supplier, so no two actions on the same table ever interleave.
pub struct TableActor {
    /// Table ID
    id: TableId,

    /// Table configuration
    config: TableConfig,

    /// Round state
    session: TableSession,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Card source
    supplier: Arc<dyn CardSupplier>,

    /// Bank collaborator for bets, balances and settlement
    ledger: Arc<dyn Ledger>,

    /// Event subscribers
    subscribers: HashMap<u64, mpsc::Sender<TableEvent>>,

    /// Is table closed
    is_closed: bool,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Arguments
    ///
    /// * `id` - Table ID
    /// * `config` - Table configuration
    /// * `supplier` - Card supplier
    /// * `ledger` - Bank/ledger collaborator
    ///
    /// # Returns
    ///
    /// * `(TableActor, TableHandle)` - Actor and handle for sending messages
    pub fn new(
        id: TableId,
        config: TableConfig,
        supplier: Arc<dyn CardSupplier>,
        ledger: Arc<dyn Ledger>,
    ) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity.max(1));

        let actor = Self {
            id,
            config,
            session: TableSession::new(id),
            inbox,
            supplier,
            ledger,
            subscribers: HashMap::new(),
            is_closed: false,
        };

        let handle = TableHandle::new(sender, id);

        (actor, handle)
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        log::info!("Table {} starting", self.id);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;

            if self.is_closed {
                break;
            }
        }

        log::info!("Table {} closed", self.id);
    }

    /// Handle a table message
    async fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Bet {
                player_id,
                amount,
                response,
            } => {
                let result = self.handle_bet(player_id, amount).await;
                self.log_result("bet", player_id, &result);
                let _ = response.send(result);
            }

            TableMessage::Hit {
                player_id,
                response,
            } => {
                let result = self.handle_hit(player_id).await;
                self.log_result("hit", player_id, &result);
                let _ = response.send(result);
            }

            TableMessage::Stay {
                player_id,
                response,
            } => {
                let result = self.handle_stay(player_id).await;
                self.log_result("stay", player_id, &result);
                let _ = response.send(result);
            }

            TableMessage::PlayAgain {
                player_id,
                response,
            } => {
                let result = self.handle_play_again(player_id).await;
                self.log_result("play again", player_id, &result);
                let _ = response.send(result);
            }

            TableMessage::GetState { response } => {
                let _ = response.send(self.session.snapshot());
            }

            TableMessage::GetBalance {
                player_id,
                response,
            } => {
                let result = self
                    .ledger
                    .get_balance(player_id, self.id)
                    .await
                    .map_err(GameError::from);
                let _ = response.send(result);
            }

            TableMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                self.subscribers.insert(subscriber_id, sender);
                log::debug!(
                    "Subscriber {} subscribed to table {} events",
                    subscriber_id,
                    self.id
                );
            }

            TableMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!(
                    "Subscriber {} unsubscribed from table {} events",
                    subscriber_id,
                    self.id
                );
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    fn sequencer(&self) -> TurnSequencer<'_> {
        TurnSequencer::new(self.supplier.as_ref(), &self.config.rules)
    }

    /// Handle a bet. The wager is booked with the ledger before the new
    /// hands are committed.
    async fn handle_bet(&mut self, player_id: PlayerId, amount: u64) -> GameResult<TableSnapshot> {
        let mut draft = self.session.clone();
        self.sequencer().bet(&mut draft, player_id, amount).await?;
        self.ledger.apply_bet(amount, player_id, self.id).await?;
        self.session = draft;

        let balance = match self.ledger.get_balance(player_id, self.id).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                log::warn!(
                    "Table {}: balance lookup failed for player {}: {}",
                    self.id,
                    player_id,
                    e
                );
                None
            }
        };

        let snapshot = self.session.snapshot();
        self.notify(TableEvent::PlayerBet {
            player_id,
            snapshot: snapshot.clone(),
            balance,
        });
        Ok(snapshot)
    }

    async fn handle_hit(&mut self, player_id: PlayerId) -> GameResult<TableSnapshot> {
        let mut draft = self.session.clone();
        let hit = self.sequencer().hit(&mut draft, player_id).await?;
        self.session = draft;

        if hit.bust {
            log::debug!(
                "Table {}: player {} busts with {}",
                self.id,
                player_id,
                hit.total
            );
        }

        let snapshot = self.session.snapshot();
        self.notify(TableEvent::PlayerHit {
            player_id,
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }

    async fn handle_stay(&mut self, player_id: PlayerId) -> GameResult<TableSnapshot> {
        let mut draft = self.session.clone();
        let summary = self.sequencer().stay(&mut draft, player_id).await?;
        self.session = draft;

        let snapshot = self.session.snapshot();
        self.notify(TableEvent::PlayerStay {
            player_id,
            snapshot: snapshot.clone(),
        });

        if let Some(summary) = summary {
            log::info!(
                "Table {} round {} resolved, dealer {}",
                self.id,
                summary.round,
                summary.dealer_total
            );
            if let Err(e) = self.ledger.record_round(&summary).await {
                log::error!(
                    "Table {}: ledger failed to record round {}: {}",
                    self.id,
                    summary.round_id,
                    e
                );
            }
            self.notify(TableEvent::RoundResolved { summary });
        }

        Ok(snapshot)
    }

    async fn handle_play_again(&mut self, player_id: PlayerId) -> GameResult<TableSnapshot> {
        let mut draft = self.session.clone();
        self.sequencer().play_again(&mut draft, player_id).await?;
        self.session = draft;

        let snapshot = self.session.snapshot();
        self.notify(TableEvent::PlayerPlayAgain {
            player_id,
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }

    fn log_result<T>(&self, action: &str, player_id: PlayerId, result: &GameResult<T>) {
        match result {
            Ok(_) => log::debug!("Table {}: player {} {}", self.id, player_id, action),
            Err(e @ (GameError::DeckExhausted(_) | GameError::Storage(_) | GameError::Ledger(_))) => {
                log::error!(
                    "Table {}: {} by player {} failed: {}",
                    self.id,
                    action,
                    player_id,
                    e
                )
            }
            Err(e) => log::debug!(
                "Table {}: {} by player {} rejected: {}",
                self.id,
                action,
                player_id,
                e
            ),
        }
    }

    /// Broadcast an event to all subscribers
    fn notify(&mut self, event: TableEvent) {
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(event.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} channel full, dropping {}",
                        subscriber_id,
                        event.name()
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber_id);
                    false
                }
            }
        });
    }
}
