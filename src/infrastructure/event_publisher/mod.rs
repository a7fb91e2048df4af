//! Broadcast-based event publisher.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

use crate::application::ports::EventPublisher;
use crate::domain::ExperimentEvent;

/// Publishes domain events over a tokio broadcast channel
///
/// Subscribers come and go freely; publishing to an empty channel is a no-op.
pub struct BroadcastEventPublisher {
    tx: broadcast::Sender<ExperimentEvent>,
    subscriber_count: Arc<AtomicUsize>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<ExperimentEvent> {
        self.subscriber_count.fetch_add(1, Ordering::SeqCst);
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl Clone for BroadcastEventPublisher {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            subscriber_count: Arc::clone(&self.subscriber_count),
        }
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: ExperimentEvent) {
        // No subscribers is fine; drop the event
        let _ = self.tx.send(event);
    }
}
