#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The embedding host translates its native input (DOM events, test
//! scripts) into these types. All events derive `Clone` and `PartialEq`
//! for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Every event that originates from an element carries the element's
//!   [`NodeId`] as `target`. `None` means the event hit no element
//!   (the page background or outside the document).
//! - Pointer-down and touch-start are distinct [`PointerKind`]s; listeners
//!   choose which ones they want.
//! - `KeyEventKind` defaults to `Press` when not available from the host.

use bitflags::bitflags;

/// Handle to an element in a render tree.
///
/// Ids are generational: once an element is removed its id never resolves
/// again, even if the slot is reused for a new element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Build an id from its raw parts. Only render trees should need this.
    #[inline]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot this id was allocated in.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Activation by pointer (the DOM `click`).
    Click {
        /// Element that received the click.
        target: Option<NodeId>,
    },

    /// A keyboard event delivered to the focused element.
    Key {
        /// Focused element.
        target: Option<NodeId>,
        /// Key details.
        key: KeyEvent,
    },

    /// Pointer-down or touch-start anywhere in the document.
    Pointer(PointerEvent),

    /// Viewport was resized.
    Resize {
        /// New viewport width.
        width: f64,
        /// New viewport height.
        height: f64,
    },
}

impl Event {
    /// Convenience constructor for a click on `target`.
    #[must_use]
    pub const fn click(target: NodeId) -> Self {
        Self::Click {
            target: Some(target),
        }
    }

    /// Convenience constructor for a key press on `target`.
    #[must_use]
    pub const fn key(target: NodeId, code: KeyCode) -> Self {
        Self::Key {
            target: Some(target),
            key: KeyEvent::new(code),
        }
    }

    /// Element the event was delivered to, if any.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::Click { target } | Self::Key { target, .. } => *target,
            Self::Pointer(pointer) => pointer.target,
            Self::Resize { .. } => None,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Enter or Space going down (press or auto-repeat).
    ///
    /// These are the keys that activate button-like elements.
    #[must_use]
    pub fn is_activation(&self) -> bool {
        self.kind != KeyEventKind::Release && (self.code == KeyCode::Enter || self.is_char(' '))
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key. Space is `Char(' ')`.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Tab key.
    Tab,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Which global pointer stream an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse button pressed down.
    MouseDown,
    /// Finger touched the screen.
    TouchStart,
}

/// A pointer-down or touch-start event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which stream produced the event.
    pub kind: PointerKind,
    /// Viewport x coordinate.
    pub x: f64,
    /// Viewport y coordinate.
    pub y: f64,
    /// Deepest element under the pointer, if any.
    pub target: Option<NodeId>,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            target: None,
        }
    }

    /// Mouse-down on `target`.
    #[must_use]
    pub const fn mouse_down(target: NodeId) -> Self {
        Self::new(PointerKind::MouseDown, 0.0, 0.0).with_target(Some(target))
    }

    /// Touch-start on `target`.
    #[must_use]
    pub const fn touch_start(target: NodeId) -> Self {
        Self::new(PointerKind::TouchStart, 0.0, 0.0).with_target(Some(target))
    }

    /// Set the target element.
    #[must_use]
    pub const fn with_target(mut self, target: Option<NodeId>) -> Self {
        self.target = target;
        self
    }

    /// Get the position as a tuple.
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}
