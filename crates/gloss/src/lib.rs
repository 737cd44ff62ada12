#![forbid(unsafe_code)]

//! Gloss public facade crate.
//!
//! Re-exports the types an embedding needs to mount inline annotations into
//! a headless host and drive them with events, plus a small prelude.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use gloss_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, NodeId, PointerEvent, PointerKind,
};
pub use gloss_core::geometry::{Extent, Rect, Viewport};

// --- Render re-exports -----------------------------------------------------

pub use gloss_render::{
    Document, DocumentError, DocumentKey, Element, Layout, NodeRef, Tag, TextWidthLayout,
};

// --- Runtime re-exports ----------------------------------------------------

pub use gloss_runtime::{
    EventBus, EventOutcome, FrameHandle, FrameScheduler, Host, HostConfig, Interactive,
    PointerKinds, SubId, Subscription,
};

// --- Widget re-exports -----------------------------------------------------

pub use gloss_widgets::{
    Annotation, AnnotationState, DEFAULT_MARGIN, OutsideDetector, PlacementConfig, RevealBlock,
    Variant, compute_offset,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gloss embeddings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A document edit referred to a missing node or broke the tree shape.
    Document(DocumentError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(err) => write!(f, "document: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
        }
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

/// Standard result type for gloss APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Annotation, AnnotationState, Error, Event, EventOutcome, Host, HostConfig, Interactive,
        KeyCode, NodeId, PlacementConfig, PointerEvent, Result, RevealBlock, Variant,
    };
}
