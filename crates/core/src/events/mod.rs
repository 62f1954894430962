//! Identity change events
//!
//! The cache publishes an [`IdentityEvent`] after every mutation it applies.
//! Each call to [`EventBus::subscribe`] registers its own unbounded queue, so
//! a slow consumer never loses events and never blocks the cache.

use crate::types::ServiceIdentity;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

/// Changes to the set of cached identities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityEvent {
    /// A targeted refresh stored a new or changed identity
    ServiceIdentityUpdated(ServiceIdentity),
    /// An identity is no longer known to the directory
    ServiceIdentityRemoved(String),
    /// A full refresh finished; carries every id it saw
    ServiceIdentitiesUpdated(Vec<String>),
}

impl IdentityEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityEvent::ServiceIdentityUpdated(_) => "service_identity_updated",
            IdentityEvent::ServiceIdentityRemoved(_) => "service_identity_removed",
            IdentityEvent::ServiceIdentitiesUpdated(_) => "service_identities_updated",
        }
    }
}

/// Fan-out of [`IdentityEvent`]s to registered subscribers
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<IdentityEvent>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver to every live subscriber; returns how many were reached.
    /// Subscribers whose receiver was dropped are unregistered.
    pub fn publish(&self, event: IdentityEvent) -> usize {
        let kind = event.kind();
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        let reached = subscribers.len();
        trace!(event = kind, receivers = reached, "Identity event published");
        reached
    }

    /// Register a subscriber that receives every event published from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.len()
    }
}
