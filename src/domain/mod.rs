pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;

// Re-export entity types
pub use entities::{
    BalanceError, Currency, Experiment, ExperimentError, Group, PlayerBalance,
    PlayerCurrencyKnowledge, Pool, PoolError, Round, RoundConfig, RoundError, RoundPatch,
    SwapDirection, SwapOutcome, Transaction, User, UserRole,
};

// Re-export events
pub use events::{
    ExperimentDeletedEvent, ExperimentEvent, ExperimentLifecycleEvent, PoolsInitializedEvent,
    RoundLifecycleEvent, SwapExecutedEvent,
};

// Re-export services
pub use services::{Clock, KnowledgeAssigner, KnowledgePolicy};

// Re-export value objects
pub use value_objects::{
    AMOUNT_SCALE, Amount, CurrencyId, ExperimentId, GroupId, K_SCALE, Lifespan, PlayerId, PoolId,
    Price, RoundId, Timestamp, TransactionId, TransitionError, UserId,
};
