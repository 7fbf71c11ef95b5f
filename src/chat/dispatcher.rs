//! Broadcast dispatcher: drains the bus and fans messages out to every inbox.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use super::registry::Registry;

/// Counters reported when the dispatcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Messages taken off the bus.
    pub messages: u64,
    /// Successful per-inbox deliveries.
    pub delivered: u64,
    /// Per-inbox deliveries dropped because the inbox was full.
    pub dropped: u64,
}

/// Single consumer of the broadcast bus.
///
/// Delivery is best-effort: each inbox gets a non-blocking `try_send`, and a
/// full inbox loses that message. A stalled reader therefore never holds up
/// the dispatcher or any sender. A closed inbox belongs to a participant that
/// was dropped without leaving; the registry is pruned when one is seen.
pub struct Dispatcher {
    registry: Arc<Registry>,
    inbound: mpsc::Receiver<String>,
    shutdown: oneshot::Receiver<()>,
    stats: DispatchStats,
}

impl Dispatcher {
    /// Create a dispatcher over `inbound`.
    ///
    /// Firing (or dropping) the returned sender closes the bus; messages
    /// already queued are still delivered before [`Dispatcher::run`] returns.
    pub fn new(
        registry: Arc<Registry>,
        inbound: mpsc::Receiver<String>,
    ) -> (Self, oneshot::Sender<()>) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let dispatcher = Self {
            registry,
            inbound,
            shutdown: shutdown_rx,
            stats: DispatchStats::default(),
        };
        (dispatcher, shutdown_tx)
    }

    /// Run until the bus is closed and drained.
    pub async fn run(mut self) -> DispatchStats {
        log::debug!("Broadcast dispatcher started");
        let mut closing = false;

        loop {
            tokio::select! {
                _ = &mut self.shutdown, if !closing => {
                    log::debug!("Broadcast bus closing");
                    closing = true;
                    self.inbound.close();
                }
                message = self.inbound.recv() => match message {
                    Some(message) => self.fan_out(&message),
                    None => break,
                },
            }
        }

        log::debug!(
            "Broadcast dispatcher stopped: {} messages, {} delivered, {} dropped",
            self.stats.messages,
            self.stats.delivered,
            self.stats.dropped
        );
        self.stats
    }

    /// Deliver one message to the current registry snapshot.
    fn fan_out(&mut self, message: &str) {
        self.stats.messages += 1;
        let mut found_closed = false;

        for inbox in self.registry.inboxes() {
            match inbox.try_send(message.to_string()) {
                Ok(()) => self.stats.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    self.stats.dropped += 1;
                    log::trace!("Inbox full, message dropped for one participant");
                }
                Err(TrySendError::Closed(_)) => found_closed = true,
            }
        }

        if found_closed {
            self.registry.prune();
        }
    }
}
