//! Scenario configuration for the simulation binary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::KnowledgePolicy;

/// A currency to register before the experiment starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub symbol: String,
    pub name_en: String,
    pub name_he: String,
}

/// Experiment-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    pub num_rounds: u32,
    pub num_training_rounds: u32,
    pub num_rounds_for_payment: u32,
    pub num_groups: u32,
    pub players_per_group: u32,
}

/// One round template; currencies are referenced by symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundTemplateConfig {
    pub round_number: u32,
    pub is_training_round: bool,
    pub counts_for_payment: bool,
    pub duration_minutes: u32,
    pub currency_x: String,
    pub currency_y: String,
    pub external_price_x: Decimal,
    pub external_price_y: Decimal,
    pub initial_reserve_x: Decimal,
    pub initial_reserve_y: Decimal,
    #[serde(default)]
    pub endowment_x: Decimal,
    #[serde(default)]
    pub endowment_y: Decimal,
}

/// Full scenario: currencies, experiment, rounds, trading pressure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub currencies: Vec<CurrencyConfig>,
    pub experiment: ExperimentConfig,
    pub rounds: Vec<RoundTemplateConfig>,
    /// Swaps each simulated player attempts per round
    #[serde(default = "default_swaps_per_player")]
    pub swaps_per_player: u32,
    /// RNG seed for the simulated traders
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub knowledge_policy: KnowledgePolicy,
}

fn default_swaps_per_player() -> u32 {
    5
}

fn default_seed() -> u64 {
    7
}

impl ScenarioConfig {
    /// Load a scenario from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Default for ScenarioConfig {
    /// Built-in two-round scenario: three groups of four players trading
    /// gold against silver
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            currencies: vec![
                CurrencyConfig {
                    symbol: "GLD".to_string(),
                    name_en: "Gold".to_string(),
                    name_he: "זהב".to_string(),
                },
                CurrencyConfig {
                    symbol: "SLV".to_string(),
                    name_en: "Silver".to_string(),
                    name_he: "כסף".to_string(),
                },
            ],
            experiment: ExperimentConfig {
                name: "pilot".to_string(),
                num_rounds: 2,
                num_training_rounds: 1,
                num_rounds_for_payment: 1,
                num_groups: 3,
                players_per_group: 4,
            },
            rounds: (1..=2)
                .map(|n| RoundTemplateConfig {
                    round_number: n,
                    is_training_round: n == 1,
                    counts_for_payment: n == 2,
                    duration_minutes: 10,
                    currency_x: "GLD".to_string(),
                    currency_y: "SLV".to_string(),
                    external_price_x: dec!(1.25),
                    external_price_y: dec!(0.80),
                    initial_reserve_x: dec!(1000),
                    initial_reserve_y: dec!(1000),
                    endowment_x: dec!(500),
                    endowment_y: dec!(500),
                })
                .collect(),
            swaps_per_player: 5,
            seed: 7,
            knowledge_policy: KnowledgePolicy::default(),
        }
    }
}

/// Errors while loading a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioConfigError {
    #[error("cannot read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
