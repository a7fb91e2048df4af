//! Experiment Simulator
//!
//! Core engine for controlled trading experiments: an administrator defines
//! an experiment with groups and rounds; each round instantiates one isolated
//! constant-product pool per group; players swap against their group's pool
//! while the engine guards the x * y = K invariant and records every trade.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: entities and rules (Pool invariant engine, Experiment,
//!   Round, Transaction, balances, knowledge assignment)
//! - **Application**: use cases and port interfaces (CreateExperiment,
//!   RoundLifecycle, Swap, queries) plus per-pool serialization
//! - **Infrastructure**: in-memory adapters (DashMap repositories, broadcast
//!   event publisher, clocks, scenario configuration)
//!
//! Authentication, HTTP transport, and durable persistence are external
//! collaborators reached only through the application ports.

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use domain::{
    Amount, Clock, Currency, CurrencyId, Experiment, ExperimentEvent, ExperimentId, Group,
    GroupId, KnowledgeAssigner, KnowledgePolicy, PlayerBalance, PlayerCurrencyKnowledge, PlayerId,
    Pool, PoolError, PoolId, Price, Round, RoundId, SwapDirection, Timestamp, Transaction,
    TransactionId, TransitionError, User, UserId, UserRole,
};

pub use application::{
    CreateExperimentCommand, CreateExperimentError, CreateExperimentUseCase, CreateRoundCommand,
    CreateRoundError, CreateRoundUseCase, ExperimentLifecycleError, ExperimentLifecycleUseCase,
    Page, PoolLocks, QueryUseCase, RoundLifecycleError, RoundLifecycleUseCase, SwapCommand,
    SwapError, SwapQuote, SwapReceipt, SwapUseCase,
};

pub use infrastructure::{
    BroadcastEventPublisher, InMemoryCurrencyDirectory, InMemoryExperimentRepository,
    InMemoryIdentityDirectory, InMemoryLedgerRepository, InMemoryPoolRepository,
    InMemoryRoundRepository, ScenarioConfig, SimulationClock, SystemClock,
};

// Re-export port traits for integration tests
pub use application::ports::{
    BalanceStore, CurrencyDirectory, EventPublisher, ExperimentRepository, IdentityDirectory,
    KnowledgeStore, LedgerRepository, PoolRepository, RoundRepository, StorageError,
    TransactionLedger,
};
