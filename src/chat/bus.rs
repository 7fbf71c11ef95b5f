//! The shared inbound queue feeding the dispatcher, and system announcements.

use tokio::sync::mpsc;

/// Default capacity of the inbound broadcast queue.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Prefix marking system lines (announcements, render notices).
pub const SYSTEM_PREFIX: &str = "* ";

/// Producer handle for the broadcast bus.
///
/// Cheap to clone; every chat sender, registry announcement and render job
/// posts through one of these so there is a single delivery path.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: mpsc::Sender<String>,
}

impl Broadcaster {
    /// Create a bounded bus, returning the producer and the dispatcher's end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queue a message, waiting for bus capacity if needed.
    ///
    /// Returns false once the bus has been shut down.
    pub async fn send(&self, message: impl Into<String>) -> bool {
        match self.tx.send(message.into()).await {
            Ok(()) => true,
            Err(_) => {
                log::debug!("Broadcast bus closed, message discarded");
                false
            }
        }
    }

    /// Queue a message without waiting. Returns false if the bus is full or closed.
    pub fn try_send(&self, message: impl Into<String>) -> bool {
        self.tx.try_send(message.into()).is_ok()
    }

    /// Whether the dispatcher side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// `* <name> joined (<count> online)`
pub fn joined(name: &str, online: usize) -> String {
    format!("{}{} joined ({} online)", SYSTEM_PREFIX, name, online)
}

/// `* <name> left (<count> online)`
pub fn left(name: &str, online: usize) -> String {
    format!("{}{} left ({} online)", SYSTEM_PREFIX, name, online)
}

/// `* <old> is now known as <new>`
pub fn renamed(old: &str, new: &str) -> String {
    format!("{}{} is now known as {}", SYSTEM_PREFIX, old, new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_formats() {
        assert_eq!(joined("bob", 3), "* bob joined (3 online)");
        assert_eq!(left("bob", 2), "* bob left (2 online)");
        assert_eq!(renamed("bob", "robert"), "* bob is now known as robert");
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_returns_false() {
        let (bus, rx) = Broadcaster::channel(4);
        assert!(bus.send("hello").await);
        drop(rx);
        assert!(bus.is_closed());
        assert!(!bus.send("late").await);
        assert!(!bus.try_send("late"));
    }

    #[test]
    fn test_try_send_reports_full_bus() {
        let (bus, _rx) = Broadcaster::channel(1);
        assert!(bus.try_send("first"));
        assert!(!bus.try_send("second"));
    }
}
