//! The chat service: registry, broadcast bus and dispatcher task as one object.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::bus::Broadcaster;
use super::dispatcher::{DispatchStats, Dispatcher};
use super::registry::{Participant, Registry};
use crate::config::ChatConfig;

/// Running chat service.
///
/// Constructed explicitly with [`ChatService::start`], which spawns the
/// dispatcher on the current tokio runtime, and shared with collaborators
/// (usually behind an `Arc`). [`ChatService::shutdown`] closes the bus.
pub struct ChatService {
    registry: Arc<Registry>,
    bus: Broadcaster,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    dispatcher: Mutex<Option<JoinHandle<DispatchStats>>>,
}

impl ChatService {
    /// Start the service and its dispatcher task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &ChatConfig) -> Self {
        let (bus, inbound) = Broadcaster::channel(config.bus_capacity);
        let registry = Arc::new(Registry::new(bus.clone(), config.inbox_capacity));
        let (dispatcher, shutdown) = Dispatcher::new(Arc::clone(&registry), inbound);
        let handle = tokio::spawn(dispatcher.run());

        log::debug!(
            "Chat service started (bus capacity {}, inbox capacity {})",
            config.bus_capacity,
            config.inbox_capacity
        );

        Self {
            registry,
            bus,
            shutdown: Mutex::new(Some(shutdown)),
            dispatcher: Mutex::new(Some(handle)),
        }
    }

    /// See [`Registry::register`].
    pub async fn register(&self, candidate: &str) -> Participant {
        self.registry.register(candidate).await
    }

    /// See [`Registry::unregister`].
    pub async fn unregister(&self, participant: &mut Participant) {
        self.registry.unregister(participant).await
    }

    /// See [`Registry::rename`].
    pub async fn rename(&self, participant: &mut Participant, requested: &str) -> String {
        self.registry.rename(participant, requested).await
    }

    /// Sorted snapshot of participant names.
    pub fn list_names(&self) -> Vec<String> {
        self.registry.list_names()
    }

    /// Number of registered participants.
    pub fn online(&self) -> usize {
        self.registry.len()
    }

    /// Queue `message` for delivery to every participant.
    ///
    /// Returns false if the service has been shut down.
    pub async fn broadcast(&self, message: impl Into<String>) -> bool {
        self.bus.send(message).await
    }

    /// A producer handle onto the bus, for spawned work such as renders.
    pub fn broadcaster(&self) -> Broadcaster {
        self.bus.clone()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Close the bus and wait for the dispatcher to drain it.
    ///
    /// Returns the dispatcher's counters the first time; later calls return
    /// `None`.
    pub async fn shutdown(&self) -> Option<DispatchStats> {
        if let Some(signal) = self
            .shutdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            let _ = signal.send(());
        }

        let handle = self
            .dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;

        match handle.await {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::error!("Broadcast dispatcher task failed: {}", e);
                None
            }
        }
    }
}
