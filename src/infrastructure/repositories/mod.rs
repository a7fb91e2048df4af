mod in_memory_directories;
mod in_memory_experiment;
mod in_memory_ledger;
mod in_memory_pool;
mod in_memory_round;

pub use in_memory_directories::{InMemoryCurrencyDirectory, InMemoryIdentityDirectory};
pub use in_memory_experiment::InMemoryExperimentRepository;
pub use in_memory_ledger::InMemoryLedgerRepository;
pub use in_memory_pool::InMemoryPoolRepository;
pub use in_memory_round::InMemoryRoundRepository;
