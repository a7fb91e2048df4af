//! Port for the swap ledger: transactions, balances, knowledge rows.

use async_trait::async_trait;

use crate::application::ports::StorageResult;
use crate::domain::{
    CurrencyId, PlayerBalance, PlayerCurrencyKnowledge, PlayerId, PoolId, Transaction,
};

/// Append and read the immutable transaction log
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Append one transaction; records are never mutated afterward
    async fn append(&self, transaction: Transaction) -> StorageResult<()>;

    /// Transactions of a pool in commit order, with pagination
    async fn by_pool(
        &self,
        pool_id: &PoolId,
        skip: usize,
        limit: usize,
    ) -> StorageResult<(Vec<Transaction>, usize)>;

    /// Transactions of a player in commit order, with pagination
    async fn by_player(
        &self,
        player_id: &PlayerId,
        skip: usize,
        limit: usize,
    ) -> StorageResult<(Vec<Transaction>, usize)>;
}

/// Player balance rows, keyed by (player, pool, currency)
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn get_balance(
        &self,
        player_id: &PlayerId,
        pool_id: &PoolId,
        currency_id: &CurrencyId,
    ) -> StorageResult<Option<PlayerBalance>>;

    async fn save_balance(&self, balance: PlayerBalance) -> StorageResult<()>;

    /// All balance rows of one pool
    async fn balances_by_pool(&self, pool_id: &PoolId) -> StorageResult<Vec<PlayerBalance>>;

    /// All balance rows of one player across pools
    async fn balances_by_player(&self, player_id: &PlayerId) -> StorageResult<Vec<PlayerBalance>>;
}

/// Currency knowledge rows, keyed by (player, pool), write-once
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn get_knowledge(
        &self,
        player_id: &PlayerId,
        pool_id: &PoolId,
    ) -> StorageResult<Option<PlayerCurrencyKnowledge>>;

    async fn save_knowledge(&self, knowledge: PlayerCurrencyKnowledge) -> StorageResult<()>;

    async fn knowledge_by_pool(
        &self,
        pool_id: &PoolId,
    ) -> StorageResult<Vec<PlayerCurrencyKnowledge>>;
}

/// Cascade removal of everything a set of pools owns
#[async_trait]
pub trait LedgerCascade: Send + Sync {
    /// Remove transactions, balances, and knowledge for the given pools
    async fn remove_by_pools(&self, pool_ids: &[PoolId]) -> StorageResult<()>;
}

/// Combined ledger repository trait
#[async_trait]
pub trait LedgerRepository: TransactionLedger + BalanceStore + KnowledgeStore + LedgerCascade {}

impl<T: TransactionLedger + BalanceStore + KnowledgeStore + LedgerCascade> LedgerRepository for T {}
