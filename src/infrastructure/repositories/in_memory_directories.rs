//! In-memory currency catalog and user registry.
//!
//! These collaborators are owned by other services in production; the
//! in-memory versions back tests and the simulation binary.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{CurrencyDirectory, IdentityDirectory, StorageResult};
use crate::domain::{Currency, CurrencyId, GroupId, User, UserId};

/// Thread-safe currency catalog backed by DashMap
pub struct InMemoryCurrencyDirectory {
    currencies: Arc<DashMap<CurrencyId, Currency>>,
}

impl InMemoryCurrencyDirectory {
    pub fn new() -> Self {
        Self {
            currencies: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, currency: Currency) -> CurrencyId {
        let id = currency.id;
        self.currencies.insert(id, currency);
        id
    }
}

impl Default for InMemoryCurrencyDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CurrencyDirectory for InMemoryCurrencyDirectory {
    async fn get(&self, id: &CurrencyId) -> StorageResult<Option<Currency>> {
        Ok(self.currencies.get(id).map(|c| c.value().clone()))
    }
}

/// Thread-safe user registry backed by DashMap
///
/// Registration order is preserved so group rosters are stable across calls.
pub struct InMemoryIdentityDirectory {
    users: Arc<DashMap<UserId, (usize, User)>>,
    counter: Arc<std::sync::atomic::AtomicUsize>,
}

impl InMemoryIdentityDirectory {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            counter: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }

    pub fn insert(&self, user: User) -> UserId {
        let id = user.id;
        let seq = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.users.insert(id, (seq, user));
        id
    }
}

impl Default for InMemoryIdentityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn get(&self, id: &UserId) -> StorageResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().1.clone()))
    }

    async fn players_in_group(&self, group_id: &GroupId) -> StorageResult<Vec<User>> {
        let mut players: Vec<(usize, User)> = self
            .users
            .iter()
            .filter(|u| u.value().1.group_id() == Some(*group_id))
            .map(|u| u.value().clone())
            .collect();
        players.sort_by_key(|(seq, _)| *seq);
        Ok(players.into_iter().map(|(_, user)| user).collect())
    }
}
