//! Client registry: the set of active participants and their inboxes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use super::bus::{self, Broadcaster};
use super::names::allocate;

/// Default capacity of each participant's inbox.
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Sending half of a participant inbox, as held by the registry.
pub type Inbox = mpsc::Sender<String>;

/// A registered chat participant.
///
/// Returned by [`Registry::register`] and owned by whoever serves the
/// participant (a terminal session, a test). It carries the receiving half of
/// the participant's private inbox; the registry only keeps the sending half.
#[derive(Debug)]
pub struct Participant {
    id: u64,
    name: String,
    inbox: mpsc::Receiver<String>,
    active: bool,
}

impl Participant {
    /// Current unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry-assigned identity, stable across renames.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// False once the participant has been unregistered.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Wait for the next delivered message.
    ///
    /// Returns `None` once the inbox is closed and drained.
    pub async fn recv(&mut self) -> Option<String> {
        self.inbox.recv().await
    }

    /// Take the next delivered message if one is queued.
    pub fn try_recv(&mut self) -> Option<String> {
        self.inbox.try_recv().ok()
    }

    /// Drain everything currently queued.
    pub fn drain(&mut self) -> Vec<String> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

#[derive(Debug)]
struct Member {
    id: u64,
    inbox: Inbox,
}

/// Registry of active participants.
///
/// A single mutex guards the name map. It is held only for membership
/// bookkeeping: allocation + insertion, removal, and snapshots. Announcements
/// are posted to the bus after the guard is released.
///
/// A participant dropped without [`Registry::unregister`] is removed the next
/// time the map is locked, with the usual `left` announcement.
#[derive(Debug)]
pub struct Registry {
    members: Mutex<HashMap<String, Member>>,
    bus: Broadcaster,
    inbox_capacity: usize,
    next_id: AtomicU64,
}

impl Registry {
    /// Create an empty registry posting announcements to `bus`.
    pub fn new(bus: Broadcaster, inbox_capacity: usize) -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
            bus,
            inbox_capacity: inbox_capacity.max(1),
            next_id: AtomicU64::new(1),
        }
    }

    /// Capacity given to every new inbox.
    pub fn inbox_capacity(&self) -> usize {
        self.inbox_capacity
    }

    // The map is left consistent by every critical section, so a panic in
    // another holder does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Member>> {
        let mut members = self.members.lock().unwrap_or_else(PoisonError::into_inner);
        self.remove_departed(&mut members);
        members
    }

    /// Drop members whose receiving half is gone and announce each one.
    fn remove_departed(&self, members: &mut HashMap<String, Member>) {
        let departed: Vec<String> = members
            .iter()
            .filter(|(_, member)| member.inbox.is_closed())
            .map(|(name, _)| name.clone())
            .collect();

        for name in departed {
            members.remove(&name);
            let online = members.len();
            log::info!("{} dropped without leaving ({} online)", name, online);
            // Non-blocking: the dispatcher itself locks the map.
            if !self.bus.try_send(bus::left(&name, online)) {
                log::debug!("Departure of {} not announced, bus full or closed", name);
            }
        }
    }

    /// Remove participants that were dropped without unregistering.
    ///
    /// Every other operation does this as well; the dispatcher calls it
    /// when a delivery finds a closed inbox.
    pub fn prune(&self) {
        drop(self.lock());
    }

    /// Register a participant under a unique variant of `candidate`.
    ///
    /// Announces `* <name> joined (<count> online)`.
    pub async fn register(&self, candidate: &str) -> Participant {
        let (tx, rx) = mpsc::channel(self.inbox_capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let (name, online) = {
            let mut members = self.lock();
            let name = allocate(candidate, |n| members.contains_key(n));
            members.insert(name.clone(), Member { id, inbox: tx });
            (name, members.len())
        };

        log::info!("{} joined ({} online)", name, online);
        self.bus.send(bus::joined(&name, online)).await;

        Participant {
            id,
            name,
            inbox: rx,
            active: true,
        }
    }

    /// Remove a participant and close its inbox.
    ///
    /// Messages already queued stay readable; nothing new is delivered.
    /// Announces `* <name> left (<count> online)` the first time only.
    pub async fn unregister(&self, participant: &mut Participant) {
        if !participant.active {
            return;
        }
        participant.active = false;

        let online = {
            let mut members = self.lock();
            if members
                .get(&participant.name)
                .is_some_and(|m| m.id == participant.id)
            {
                members.remove(&participant.name);
            }
            members.len()
        };
        participant.inbox.close();

        log::info!("{} left ({} online)", participant.name, online);
        self.bus.send(bus::left(&participant.name, online)).await;
    }

    /// Move a participant to a unique variant of `requested`.
    ///
    /// The old mapping is removed and the new one inserted under a single
    /// lock acquisition. Returns the new name. Renaming an unregistered
    /// participant does nothing and returns its last name.
    pub async fn rename(&self, participant: &mut Participant, requested: &str) -> String {
        if !participant.active {
            return participant.name.clone();
        }

        let new_name = {
            let mut members = self.lock();
            let member = match members.remove(&participant.name) {
                Some(member) if member.id == participant.id => member,
                other => {
                    if let Some(foreign) = other {
                        members.insert(participant.name.clone(), foreign);
                    }
                    log::error!(
                        "registry invariant violated: active participant '{}' is not registered",
                        participant.name
                    );
                    debug_assert!(false, "active participant missing from registry");
                    return participant.name.clone();
                }
            };
            let new_name = allocate(requested, |n| members.contains_key(n));
            members.insert(new_name.clone(), member);
            new_name
        };

        let old_name = std::mem::replace(&mut participant.name, new_name.clone());
        log::info!("{} is now known as {}", old_name, new_name);
        self.bus.send(bus::renamed(&old_name, &new_name)).await;
        new_name
    }

    /// Sorted snapshot of registered names.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether `name` is currently registered.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of every inbox for one fan-out pass.
    pub fn inboxes(&self) -> Vec<Inbox> {
        self.lock().values().map(|m| m.inbox.clone()).collect()
    }
}
