#![forbid(unsafe_code)]

//! Headless render tree for Gloss.
//!
//! The [`Document`] stands in for the host page: an arena of elements with
//! generational [`NodeId`] handles, containment queries for outside-click
//! detection, measured boxes for placement, and markup output for snapshots.

pub mod document;
pub mod layout;
pub mod markup;
pub mod node_ref;

pub use document::{Document, DocumentError, DocumentKey, Element, Tag};
pub use gloss_core::event::NodeId;
pub use layout::{Layout, TextWidthLayout};
pub use node_ref::NodeRef;
