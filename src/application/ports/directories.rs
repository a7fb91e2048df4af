//! Lookup ports into collaborator-owned data.
//!
//! Currency catalog CRUD and user registration live outside this core; the
//! use cases only resolve identities and check existence.

use async_trait::async_trait;

use crate::application::ports::StorageResult;
use crate::domain::{Currency, CurrencyId, GroupId, User, UserId};

/// Existence/identity checks against the currency catalog
#[async_trait]
pub trait CurrencyDirectory: Send + Sync {
    async fn get(&self, id: &CurrencyId) -> StorageResult<Option<Currency>>;

    async fn exists(&self, id: &CurrencyId) -> StorageResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

/// Existence/role checks against the user registry
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn get(&self, id: &UserId) -> StorageResult<Option<User>>;

    /// All players currently assigned to a group, in registration order
    async fn players_in_group(&self, group_id: &GroupId) -> StorageResult<Vec<User>>;
}
