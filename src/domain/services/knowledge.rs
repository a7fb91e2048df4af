//! Information-asymmetry assignment.
//!
//! Each player sees the external reference price of exactly one of the two
//! pool currencies for the duration of a round. The mapping is total over
//! the group's players and never reassigned.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CurrencyId, PlayerId};

/// How revealed currencies are distributed across a group's players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum KnowledgePolicy {
    /// Alternate X/Y in player order: even split up to one player
    #[default]
    BalancedSplit,
    /// Independent coin flip per player, reproducible from the seed
    UniformRandom { seed: u64 },
}

/// Assigns revealed currencies for one pool
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeAssigner {
    policy: KnowledgePolicy,
}

impl KnowledgeAssigner {
    pub fn new(policy: KnowledgePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> KnowledgePolicy {
        self.policy
    }

    /// Produce one (player, revealed currency) pair per player
    pub fn assign(
        &self,
        players: &[PlayerId],
        currency_x: CurrencyId,
        currency_y: CurrencyId,
    ) -> Vec<(PlayerId, CurrencyId)> {
        match self.policy {
            KnowledgePolicy::BalancedSplit => players
                .iter()
                .enumerate()
                .map(|(i, player)| {
                    let revealed = if i % 2 == 0 { currency_x } else { currency_y };
                    (*player, revealed)
                })
                .collect(),
            KnowledgePolicy::UniformRandom { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                players
                    .iter()
                    .map(|player| {
                        let revealed = if rng.gen_bool(0.5) {
                            currency_x
                        } else {
                            currency_y
                        };
                        (*player, revealed)
                    })
                    .collect()
            }
        }
    }
}

impl Default for KnowledgeAssigner {
    fn default() -> Self {
        Self::new(KnowledgePolicy::default())
    }
}
