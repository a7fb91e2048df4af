mod create_experiment;
mod create_round;
mod experiment_lifecycle;
mod queries;
mod round_lifecycle;
mod swap;

pub use create_experiment::{
    CreateExperimentCommand, CreateExperimentError, CreateExperimentUseCase,
};
pub use create_round::{CreateRoundCommand, CreateRoundError, CreateRoundUseCase};
pub use experiment_lifecycle::{ExperimentLifecycleError, ExperimentLifecycleUseCase};
pub use queries::{Page, QueryUseCase};
pub use round_lifecycle::{RoundLifecycleError, RoundLifecycleUseCase};
pub use swap::{SwapCommand, SwapError, SwapQuote, SwapReceipt, SwapUseCase};
