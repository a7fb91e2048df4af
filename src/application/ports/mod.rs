mod directories;
mod event_publisher;
mod experiment_repository;
mod ledger_repository;
mod pool_repository;
mod round_repository;
mod storage;

pub use directories::{CurrencyDirectory, IdentityDirectory};
pub use event_publisher::EventPublisher;
pub use experiment_repository::{ExperimentReader, ExperimentRepository, ExperimentWriter};
pub use ledger_repository::{
    BalanceStore, KnowledgeStore, LedgerCascade, LedgerRepository, TransactionLedger,
};
pub use pool_repository::{PoolReader, PoolRepository, PoolWriter};
pub use round_repository::{RoundReader, RoundRepository, RoundWriter};
pub use storage::{StorageError, StorageResult};
