//! In-memory ledger implementation: transactions, balances, knowledge.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::ports::{
    BalanceStore, KnowledgeStore, LedgerCascade, StorageResult, TransactionLedger,
};
use crate::domain::{
    CurrencyId, PlayerBalance, PlayerCurrencyKnowledge, PlayerId, PoolId, Transaction,
};

/// Thread-safe ledger storage
///
/// Transactions live in an append-only vector (commit order is the paging
/// order); balances and knowledge rows are keyed maps.
pub struct InMemoryLedgerRepository {
    transactions: Arc<RwLock<Vec<Transaction>>>,
    balances: Arc<DashMap<(PlayerId, PoolId, CurrencyId), PlayerBalance>>,
    knowledge: Arc<DashMap<(PlayerId, PoolId), PlayerCurrencyKnowledge>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self {
            transactions: Arc::new(RwLock::new(Vec::new())),
            balances: Arc::new(DashMap::new()),
            knowledge: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryLedgerRepository {
    fn clone(&self) -> Self {
        Self {
            transactions: Arc::clone(&self.transactions),
            balances: Arc::clone(&self.balances),
            knowledge: Arc::clone(&self.knowledge),
        }
    }
}

fn paginate(matching: Vec<Transaction>, skip: usize, limit: usize) -> (Vec<Transaction>, usize) {
    let total = matching.len();
    (matching.into_iter().skip(skip).take(limit).collect(), total)
}

#[async_trait]
impl TransactionLedger for InMemoryLedgerRepository {
    async fn append(&self, transaction: Transaction) -> StorageResult<()> {
        self.transactions.write().await.push(transaction);
        Ok(())
    }

    async fn by_pool(
        &self,
        pool_id: &PoolId,
        skip: usize,
        limit: usize,
    ) -> StorageResult<(Vec<Transaction>, usize)> {
        let matching: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .iter()
            .filter(|t| &t.pool_id == pool_id)
            .cloned()
            .collect();
        Ok(paginate(matching, skip, limit))
    }

    async fn by_player(
        &self,
        player_id: &PlayerId,
        skip: usize,
        limit: usize,
    ) -> StorageResult<(Vec<Transaction>, usize)> {
        let matching: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .iter()
            .filter(|t| &t.player_id == player_id)
            .cloned()
            .collect();
        Ok(paginate(matching, skip, limit))
    }
}

#[async_trait]
impl BalanceStore for InMemoryLedgerRepository {
    async fn get_balance(
        &self,
        player_id: &PlayerId,
        pool_id: &PoolId,
        currency_id: &CurrencyId,
    ) -> StorageResult<Option<PlayerBalance>> {
        Ok(self
            .balances
            .get(&(*player_id, *pool_id, *currency_id))
            .map(|b| b.value().clone()))
    }

    async fn save_balance(&self, balance: PlayerBalance) -> StorageResult<()> {
        self.balances.insert(
            (balance.player_id, balance.pool_id, balance.currency_id),
            balance,
        );
        Ok(())
    }

    async fn balances_by_pool(&self, pool_id: &PoolId) -> StorageResult<Vec<PlayerBalance>> {
        Ok(self
            .balances
            .iter()
            .filter(|b| &b.pool_id == pool_id)
            .map(|b| b.value().clone())
            .collect())
    }

    async fn balances_by_player(&self, player_id: &PlayerId) -> StorageResult<Vec<PlayerBalance>> {
        Ok(self
            .balances
            .iter()
            .filter(|b| &b.player_id == player_id)
            .map(|b| b.value().clone())
            .collect())
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryLedgerRepository {
    async fn get_knowledge(
        &self,
        player_id: &PlayerId,
        pool_id: &PoolId,
    ) -> StorageResult<Option<PlayerCurrencyKnowledge>> {
        Ok(self
            .knowledge
            .get(&(*player_id, *pool_id))
            .map(|k| k.value().clone()))
    }

    async fn save_knowledge(&self, knowledge: PlayerCurrencyKnowledge) -> StorageResult<()> {
        // Write-once: the first assignment of a round stays
        self.knowledge
            .entry((knowledge.player_id, knowledge.pool_id))
            .or_insert(knowledge);
        Ok(())
    }

    async fn knowledge_by_pool(
        &self,
        pool_id: &PoolId,
    ) -> StorageResult<Vec<PlayerCurrencyKnowledge>> {
        Ok(self
            .knowledge
            .iter()
            .filter(|k| &k.pool_id == pool_id)
            .map(|k| k.value().clone())
            .collect())
    }
}

#[async_trait]
impl LedgerCascade for InMemoryLedgerRepository {
    async fn remove_by_pools(&self, pool_ids: &[PoolId]) -> StorageResult<()> {
        self.transactions
            .write()
            .await
            .retain(|t| !pool_ids.contains(&t.pool_id));
        self.balances.retain(|_, b| !pool_ids.contains(&b.pool_id));
        self.knowledge.retain(|_, k| !pool_ids.contains(&k.pool_id));
        Ok(())
    }
}
