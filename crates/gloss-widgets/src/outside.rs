#![forbid(unsafe_code)]

//! Outside-interaction detection.
//!
//! An [`OutsideDetector`] watches document-level mouse-down and touch-start
//! and calls back when the event target is not inside a given region. The
//! two streams are registered as separate listeners sharing one handler, so
//! a device that emits both reports both.
//!
//! The detector never changes anything itself. Whatever the callback does is
//! up to its owner.

use std::cell::RefCell;
use std::rc::Rc;

use gloss_core::event::PointerEvent;
use gloss_render::{Document, NodeRef};
use gloss_runtime::{EventBus, PointerKinds, Subscription};

/// Watches for pointer activity outside a region.
///
/// Dropping the detector (or calling [`release`](Self::release)) removes both
/// listeners at once.
#[derive(Debug, Default)]
pub struct OutsideDetector {
    subscriptions: Vec<Subscription>,
}

impl OutsideDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `on_outside` for every pointer-down or touch-start whose target
    /// is not inside `region`.
    ///
    /// Replaces any previous watch. Events are ignored while `region` is
    /// unset or not attached to the document. An event with no target
    /// (outside the document) counts as outside.
    pub fn watch<F>(&mut self, bus: &EventBus, region: NodeRef, mut on_outside: F)
    where
        F: FnMut(&mut Document, &PointerEvent) + 'static,
    {
        self.release();

        let handler: Rc<RefCell<dyn FnMut(&mut Document, &PointerEvent)>> =
            Rc::new(RefCell::new(move |doc: &mut Document, event: &PointerEvent| {
                let Some(region) = region.get() else {
                    return;
                };
                if !doc.is_attached(region) {
                    return;
                }
                if event.target.is_some_and(|target| doc.contains(region, target)) {
                    return;
                }
                gloss_core::trace!(region = %region, kind = ?event.kind, "outside interaction");
                on_outside(doc, event);
            }));

        self.subscriptions = vec![
            bus.subscribe_shared(PointerKinds::MOUSE_DOWN, Rc::clone(&handler)),
            bus.subscribe_shared(PointerKinds::TOUCH_START, handler),
        ];
    }

    /// Stop watching. Safe to call when not watching.
    pub fn release(&mut self) {
        self.subscriptions.clear();
    }

    /// Whether a watch is registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }
}
