use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Balance, Ledger, LedgerError, LedgerResult};
use crate::game::{Outcome, PlayerId, RoundSummary, TableId};

#[derive(Default)]
struct Accounts {
    balances: HashMap<(PlayerId, TableId), i64>,
    settled_rounds: HashSet<Uuid>,
}

/// Process-local ledger. Balances may go negative; the table shows debt
/// rather than refusing the bet.
pub struct InMemoryLedger {
    starting_balance: i64,
    accounts: Mutex<Accounts>,
}

impl InMemoryLedger {
    pub fn new(starting_balance: i64) -> Self {
        Self {
            starting_balance,
            accounts: Mutex::new(Accounts::default()),
        }
    }

    pub fn starting_balance(&self) -> i64 {
        self.starting_balance
    }
}

fn to_signed(amount: u64) -> LedgerResult<i64> {
    i64::try_from(amount).map_err(|_| LedgerError::InvalidAmount(amount))
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn get_balance(&self, player_id: PlayerId, table_id: TableId) -> LedgerResult<Balance> {
        let accounts = self.accounts.lock().await;
        let value = accounts
            .balances
            .get(&(player_id, table_id))
            .copied()
            .unwrap_or(self.starting_balance);
        Ok(Balance::from_signed(value))
    }

    async fn apply_bet(
        &self,
        amount: u64,
        player_id: PlayerId,
        table_id: TableId,
    ) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let amount = to_signed(amount)?;

        let mut accounts = self.accounts.lock().await;
        let balance = accounts
            .balances
            .entry((player_id, table_id))
            .or_insert(self.starting_balance);
        *balance = balance.saturating_sub(amount);
        log::debug!(
            "Player {} bet {} at table {}, balance {}",
            player_id,
            amount,
            table_id,
            balance
        );
        Ok(())
    }

    async fn record_round(&self, summary: &RoundSummary) -> LedgerResult<()> {
        let mut accounts = self.accounts.lock().await;
        if !accounts.settled_rounds.insert(summary.round_id) {
            log::debug!("Round {} already settled", summary.round_id);
            return Ok(());
        }

        for result in &summary.results {
            let wager = to_signed(result.wager)?;
            let payout = match result.outcome {
                Outcome::Win => wager.saturating_mul(2),
                Outcome::Push => wager,
                Outcome::Lose | Outcome::Pending => 0,
            };
            let balance = accounts
                .balances
                .entry((result.player_id, summary.table_id))
                .or_insert(self.starting_balance);
            *balance = balance.saturating_add(payout);
        }
        Ok(())
    }
}
