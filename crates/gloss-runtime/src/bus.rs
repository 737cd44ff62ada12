#![forbid(unsafe_code)]

//! Document-level pointer listeners.
//!
//! The [`EventBus`] is where outside-interaction detectors register for
//! pointer-down and touch-start. Listeners are kept alive by a
//! [`Subscription`] guard: dropping the guard removes the listener
//! immediately, so a listener is never invoked after its owner is gone.
//!
//! # Dispatch
//!
//! `dispatch` snapshots the registry, then checks before each call that the
//! listener is still registered. A listener removed by an earlier listener
//! during the same dispatch is skipped. A listener that re-enters `dispatch`
//! does not receive the nested event.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use gloss_core::event::{PointerEvent, PointerKind};
use gloss_render::Document;

/// Identifier of a registered listener, unique per bus.
pub type SubId = u64;

bitflags! {
    /// Set of pointer kinds a listener wants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointerKinds: u8 {
        /// Primary-button mouse down.
        const MOUSE_DOWN = 1 << 0;
        /// Touch start.
        const TOUCH_START = 1 << 1;
    }
}

impl PointerKinds {
    /// Whether `kind` is in this set.
    #[must_use]
    pub fn matches(self, kind: PointerKind) -> bool {
        self.contains(Self::from(kind))
    }
}

impl From<PointerKind> for PointerKinds {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::MouseDown => Self::MOUSE_DOWN,
            PointerKind::TouchStart => Self::TOUCH_START,
        }
    }
}

type Listener = Rc<RefCell<dyn FnMut(&mut Document, &PointerEvent)>>;

struct Entry {
    kinds: PointerKinds,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: SubId,
    entries: BTreeMap<SubId, Entry>,
}

/// Registry of document-level pointer listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for the pointer kinds in `kinds`.
    ///
    /// The listener stays registered until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, kinds: PointerKinds, listener: F) -> Subscription
    where
        F: FnMut(&mut Document, &PointerEvent) + 'static,
    {
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.subscribe_shared(kinds, listener)
    }

    /// Register a listener that is shared with other registrations.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe_shared(
        &self,
        kinds: PointerKinds,
        listener: Rc<RefCell<dyn FnMut(&mut Document, &PointerEvent)>>,
    ) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.insert(id, Entry { kinds, listener });
        tracing::trace!(id, kinds = ?kinds, "pointer listener registered");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }

    /// Deliver `event` to every listener registered for its kind.
    ///
    /// Returns how many listeners were invoked.
    pub fn dispatch(&self, doc: &mut Document, event: &PointerEvent) -> usize {
        let snapshot: Vec<(SubId, Listener)> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|(_, entry)| entry.kinds.matches(event.kind))
            .map(|(&id, entry)| (id, Rc::clone(&entry.listener)))
            .collect();

        let mut invoked = 0;
        for (id, listener) in snapshot {
            if !self.registry.borrow().entries.contains_key(&id) {
                continue;
            }
            let Ok(mut callback) = listener.try_borrow_mut() else {
                tracing::trace!(id, "skipping re-entrant pointer listener");
                continue;
            };
            (&mut *callback)(doc, event);
            invoked += 1;
        }
        tracing::trace!(kind = ?event.kind, invoked, "pointer event dispatched");
        invoked
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// RAII guard for a bus listener.
///
/// Dropping it unregisters the listener. Outliving the bus is harmless.
pub struct Subscription {
    id: SubId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().entries.contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        // The entry is taken out first so its listener (and anything it
        // captures) is dropped after the registry borrow ends.
        let removed = registry.borrow_mut().entries.remove(&self.id);
        if removed.is_some() {
            tracing::trace!(id = self.id, "pointer listener removed");
        }
        drop(removed);
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
