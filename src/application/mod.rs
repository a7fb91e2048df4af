pub mod pool_locks;
pub mod ports;
pub mod use_cases;

pub use pool_locks::PoolLocks;
pub use use_cases::{
    CreateExperimentCommand, CreateExperimentError, CreateExperimentUseCase, CreateRoundCommand,
    CreateRoundError, CreateRoundUseCase, ExperimentLifecycleError, ExperimentLifecycleUseCase,
    Page, QueryUseCase, RoundLifecycleError, RoundLifecycleUseCase, SwapCommand, SwapError,
    SwapQuote, SwapReceipt, SwapUseCase,
};
