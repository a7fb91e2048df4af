//! Port for publishing domain events.

use async_trait::async_trait;

use crate::domain::ExperimentEvent;

/// Publishes domain events to whoever is listening
///
/// Publishing is fire-and-forget: a missing subscriber is not an error.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: ExperimentEvent);
}
