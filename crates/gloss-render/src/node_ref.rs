#![forbid(unsafe_code)]

//! Shared, settable handles to rendered elements.
//!
//! A [`NodeRef`] is how a widget hands "the element I rendered" to a
//! collaborator that outlives a single call, such as an outside-click
//! listener. Clones share the same slot; an unset ref means the element is
//! not mounted.

use std::cell::Cell;
use std::rc::Rc;

use gloss_core::event::NodeId;

/// Shared handle to an optional element.
#[derive(Clone, Default)]
pub struct NodeRef {
    slot: Rc<Cell<Option<NodeId>>>,
}

impl NodeRef {
    /// Create an unset ref.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current element, if mounted.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<NodeId> {
        self.slot.get()
    }

    /// Point the ref at `node`.
    pub fn set(&self, node: NodeId) {
        self.slot.set(Some(node));
    }

    /// Unset the ref, returning what it pointed at.
    pub fn take(&self) -> Option<NodeId> {
        self.slot.take()
    }

    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NodeRef").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_slot() {
        let a = NodeRef::new();
        let b = a.clone();
        assert!(!b.is_set());

        let node = NodeId::from_parts(3, 0);
        a.set(node);
        assert_eq!(b.get(), Some(node));

        assert_eq!(b.take(), Some(node));
        assert!(!a.is_set());
    }

    #[test]
    fn independent_refs_do_not_alias() {
        let a = NodeRef::new();
        let b = NodeRef::new();
        a.set(NodeId::from_parts(1, 0));
        assert!(!b.is_set());
    }

    #[test]
    fn debug_shows_target() {
        let r = NodeRef::new();
        assert_eq!(format!("{r:?}"), "NodeRef(None)");
    }
}
