//! Users: administrators and players over a common identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{GroupId, Timestamp, UserId};

/// Role-specific data attached to a user identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum UserRole {
    /// Creates and manages experiments
    Admin,
    /// Participates in experiments as part of a group
    Player {
        group_id: Option<GroupId>,
        /// Final payout, set after the experiment is evaluated
        payment_amount: Option<Decimal>,
    },
}

/// A user of the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(flatten)]
    pub role: UserRole,
    pub created_at: Timestamp,
}

impl User {
    pub fn admin(username: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            username: username.into(),
            role: UserRole::Admin,
            created_at: now,
        }
    }

    pub fn player(username: impl Into<String>, group_id: Option<GroupId>, now: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            username: username.into(),
            role: UserRole::Player {
                group_id,
                payment_amount: None,
            },
            created_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, UserRole::Player { .. })
    }

    /// The player's group, if the user is a player assigned to one
    pub fn group_id(&self) -> Option<GroupId> {
        match self.role {
            UserRole::Player { group_id, .. } => group_id,
            UserRole::Admin => None,
        }
    }
}
