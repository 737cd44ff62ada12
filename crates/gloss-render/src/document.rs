#![forbid(unsafe_code)]

//! Element arena standing in for the host page.
//!
//! # Invariants
//!
//! 1. The root element always exists and can never be removed.
//! 2. Removing an element removes its whole subtree; every removed id stops
//!    resolving, even after its slot is reused (generation bump).
//! 3. The parent/children links are always mutually consistent and acyclic.
//! 4. A rect set through [`Document::set_rect`] is pinned: layout passes
//!    never overwrite it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use gloss_core::event::NodeId;
use gloss_core::geometry::{Rect, Viewport};

/// Document error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The id was never allocated or its element has been removed.
    UnknownNode(NodeId),
    /// Appending would make an element its own ancestor.
    Cycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
    /// The root element cannot be removed or re-parented.
    RootImmovable,
    /// The id was issued by another document.
    ForeignNode(NodeId),
}

impl core::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::Cycle { parent, child } => {
                write!(f, "appending {child} under {parent} would create a cycle")
            }
            Self::RootImmovable => write!(f, "the root element cannot be moved or removed"),
            Self::ForeignNode(id) => write!(f, "node {id} belongs to another document"),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Element kinds the widgets emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Span,
    Div,
    P,
}

impl Tag {
    /// Markup tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Span => "span",
            Self::Div => "div",
            Self::P => "p",
        }
    }
}

/// A single element.
#[derive(Debug, Clone)]
pub struct Element {
    tag: Tag,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Option<Rect>,
    pinned: bool,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            rect: None,
            pinned: false,
        }
    }

    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attributes in name order.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Inline style declarations in property order.
    #[must_use]
    pub fn style(&self) -> &BTreeMap<String, String> {
        &self.style
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Last measured box, if layout has run since the element was created.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Whether the rect was set by the host and is exempt from layout.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(1);

/// Identity of one [`Document`].
///
/// [`NodeId`]s only mean something to the document that issued them; keep
/// the key next to ids that may outlive a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentKey(u64);

/// The render tree.
///
/// A clone keeps its source's [`DocumentKey`].
#[derive(Debug, Clone)]
pub struct Document {
    key: DocumentKey,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    viewport: Viewport,
    id_counter: u64,
}

impl Document {
    /// Create a document whose root `div` spans the viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let mut root = Element::new(Tag::Div);
        root.rect = Some(Rect::new(0.0, 0.0, viewport.width, viewport.height));
        root.pinned = true;
        Self {
            key: DocumentKey(NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed)),
            slots: vec![Slot {
                generation: 0,
                element: Some(root),
            }],
            free: Vec::new(),
            root: NodeId::from_parts(0, 0),
            viewport,
            id_counter: 0,
        }
    }

    /// This document's identity.
    #[inline]
    #[must_use]
    pub fn key(&self) -> DocumentKey {
        self.key
    }

    /// The root element.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current viewport. Read it fresh; it changes on resize.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the viewport size. The root box follows it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(root) = self.slot_mut(self.root) {
            root.rect = Some(Rect::new(0.0, 0.0, viewport.width, viewport.height));
        }
    }

    /// Number of live elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.element.is_some()).count()
    }

    /// A document always has its root, so it is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Produce a document-unique identifier such as `tooltip-3`.
    pub fn next_unique_id(&mut self, prefix: &str) -> String {
        self.id_counter += 1;
        format!("{prefix}-{}", self.id_counter)
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        let element = Some(Element::new(tag));
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.element = element;
            NodeId::from_parts(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                element,
            });
            NodeId::from_parts(index, 0)
        }
    }

    /// Look up an element.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.slots
            .get(node.index() as usize)
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.element.as_ref())
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(node.index() as usize)
            .filter(|slot| slot.generation == node.generation())
            .and_then(|slot| slot.element.as_mut())
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, DocumentError> {
        self.slot_mut(node).ok_or(DocumentError::UnknownNode(node))
    }

    /// Whether `node` resolves to a live element.
    #[must_use]
    pub fn exists(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Whether `node` is live and connected to the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.exists(node) && self.contains(self.root, node)
    }

    /// Inclusive descendant test: `node` is `ancestor` or lies inside it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.exists(ancestor) {
            return false;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        if child == self.root {
            return Err(DocumentError::RootImmovable);
        }
        if !self.exists(parent) {
            return Err(DocumentError::UnknownNode(parent));
        }
        if !self.exists(child) {
            return Err(DocumentError::UnknownNode(child));
        }
        if self.contains(child, parent) {
            return Err(DocumentError::Cycle { parent, child });
        }
        self.detach(child);
        self.element_mut(child)?.parent = Some(parent);
        self.element_mut(parent)?.children.push(child);
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.get(child).and_then(Element::parent) else {
            return;
        };
        if let Some(parent) = self.slot_mut(old_parent) {
            parent.children.retain(|&c| c != child);
        }
        if let Some(child) = self.slot_mut(child) {
            child.parent = None;
        }
    }

    /// Remove `node` and its subtree. All removed ids stop resolving.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DocumentError> {
        if node == self.root {
            return Err(DocumentError::RootImmovable);
        }
        if !self.exists(node) {
            return Err(DocumentError::UnknownNode(node));
        }
        let subtree = self.descendants(node);
        self.detach(node);
        for current in subtree {
            let slot = &mut self.slots[current.index() as usize];
            slot.element = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index());
        }
        Ok(())
    }

    /// Children of `node`, empty for unknown ids.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(Element::children).unwrap_or(&[])
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<(), DocumentError> {
        self.element_mut(node)?.text = Some(text.into());
        Ok(())
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DocumentError> {
        let element = self.element_mut(node)?;
        if !element.has_class(class) {
            element.classes.push(class.to_owned());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DocumentError> {
        self.element_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.element_mut(node)?
            .attributes
            .insert(name.to_owned(), value.into());
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DocumentError> {
        self.element_mut(node)?.attributes.remove(name);
        Ok(())
    }

    /// Attribute value, `None` for unknown nodes or missing attributes.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node).and_then(|e| e.attribute(name))
    }

    pub fn set_style(
        &mut self,
        node: NodeId,
        property: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.element_mut(node)?
            .style
            .insert(property.to_owned(), value.into());
        Ok(())
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.get(node)
            .and_then(|e| e.style.get(property))
            .map(String::as_str)
    }

    /// Numeric value of a `<number>px` style declaration.
    #[must_use]
    pub fn style_px(&self, node: NodeId, property: &str) -> Option<f64> {
        self.style(node, property)
            .and_then(|v| v.strip_suffix("px"))
            .and_then(|v| v.trim().parse().ok())
    }

    /// Set a host-measured box. Pinned: layout passes keep it.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> Result<(), DocumentError> {
        let element = self.element_mut(node)?;
        element.rect = Some(rect);
        element.pinned = true;
        Ok(())
    }

    /// Record a box computed by a layout pass. Pinned elements are skipped.
    pub(crate) fn record_layout(&mut self, node: NodeId, rect: Rect) {
        if let Some(element) = self.slot_mut(node)
            && !element.pinned
        {
            element.rect = Some(rect);
        }
    }

    /// Last measured box of `node`.
    #[must_use]
    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.get(node).and_then(Element::rect)
    }

    /// Pre-order list of `node` and everything below it.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.exists(node) {
            return out;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Deepest measured element under the point.
    ///
    /// Later siblings paint over earlier ones, so they win ties.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        self.hit_node(self.root, x, y)
    }

    fn hit_node(&self, node: NodeId, x: f64, y: f64) -> Option<NodeId> {
        // Absolutely positioned children may sit outside their parent's box,
        // so children are searched even when the parent itself misses.
        for &child in self.children(node).iter().rev() {
            if let Some(hit) = self.hit_node(child, x, y) {
                return Some(hit);
            }
        }
        self.rect(node)
            .filter(|rect| rect.contains(x, y))
            .map(|_| node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::new(1024.0, 768.0))
    }
}
