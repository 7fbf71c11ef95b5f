//! Multi-user chat core.
//!
//! Participants register under unique names and receive every broadcast in
//! a private bounded inbox:
//!
//! 1. **Names** - unique name allocation with numeric suffixes
//! 2. **Registry** - membership, renames and inbox ownership
//! 3. **Bus** - the shared inbound queue and system announcements
//! 4. **Dispatcher** - single task fanning bus messages out to inboxes
//! 5. **Service** - the above wired together with a start/shutdown lifecycle
//!
//! Delivery is best-effort: a participant whose inbox is full misses the
//! message, and nobody else is slowed down by it.

mod bus;
mod dispatcher;
mod names;
mod registry;
mod service;

pub use bus::{joined, left, renamed, Broadcaster, DEFAULT_BUS_CAPACITY, SYSTEM_PREFIX};
pub use dispatcher::{DispatchStats, Dispatcher};
pub use names::{allocate, normalize_base, ANONYMOUS_NAME};
pub use registry::{Inbox, Participant, Registry, DEFAULT_INBOX_CAPACITY};
pub use service::ChatService;
