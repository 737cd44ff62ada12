#![forbid(unsafe_code)]

//! Next-paint callbacks.
//!
//! A [`FrameScheduler`] queues work that must run after the host has laid out
//! the current tree but before the user sees it. The host drains one frame
//! per [`Host::commit`](crate::host::Host::commit).
//!
//! Only callbacks queued before `run` starts belong to that frame. Anything
//! requested from inside a callback waits for the next one.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use gloss_render::Document;

type FrameCallback = Box<dyn FnOnce(&mut Document)>;

#[derive(Default)]
struct Queue {
    next_id: u64,
    pending: BTreeMap<u64, FrameCallback>,
}

/// Queue of callbacks for the next paint opportunity.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` at the next frame.
    ///
    /// Dropping the returned handle cancels the callback if it has not run.
    #[must_use = "dropping the handle cancels the frame callback"]
    pub fn request<F>(&self, callback: F) -> FrameHandle
    where
        F: FnOnce(&mut Document) + 'static,
    {
        let mut queue = self.queue.borrow_mut();
        queue.next_id += 1;
        let id = queue.next_id;
        queue.pending.insert(id, Box::new(callback));
        FrameHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        }
    }

    /// Number of callbacks waiting for a frame.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Run every callback queued before this call. Returns how many ran.
    ///
    /// A callback cancelled by an earlier callback in the same frame does
    /// not run.
    pub fn run(&self, doc: &mut Document) -> usize {
        let due: Vec<u64> = self.queue.borrow().pending.keys().copied().collect();
        let mut ran = 0;
        for id in due {
            let callback = self.queue.borrow_mut().pending.remove(&id);
            if let Some(callback) = callback {
                callback(doc);
                ran += 1;
            }
        }
        if ran > 0 {
            tracing::trace!(ran, "frame callbacks ran");
        }
        ran
    }
}

impl core::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Cancellation guard for a requested frame callback.
pub struct FrameHandle {
    id: u64,
    queue: Weak<RefCell<Queue>>,
}

impl FrameHandle {
    /// Whether the callback is still waiting to run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|queue| queue.borrow().pending.contains_key(&self.id))
    }

    /// Cancel now. Same as dropping.
    pub fn cancel(self) {}
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            let cancelled = queue.borrow_mut().pending.remove(&self.id);
            drop(cancelled);
        }
    }
}

impl core::fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameHandle")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}
