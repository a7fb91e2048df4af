pub mod clock;
pub mod config;
pub mod event_publisher;
pub mod repositories;

pub use clock::{SimulationClock, SystemClock};
pub use config::{
    CurrencyConfig, ExperimentConfig, RoundTemplateConfig, ScenarioConfig, ScenarioConfigError,
};
pub use event_publisher::BroadcastEventPublisher;
pub use repositories::{
    InMemoryCurrencyDirectory, InMemoryExperimentRepository, InMemoryIdentityDirectory,
    InMemoryLedgerRepository, InMemoryPoolRepository, InMemoryRoundRepository,
};
