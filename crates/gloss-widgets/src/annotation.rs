#![forbid(unsafe_code)]

//! Inline annotation: a word that reveals its translation on demand.
//!
//! # States
//!
//! An interactive annotation is either [`Closed`](AnnotationState::Closed)
//! or [`Open`](AnnotationState::Open). Click, Enter or Space on the anchor
//! toggles; pointer activity outside the wrapper closes. The tooltip element
//! exists exactly while the state is `Open`.
//!
//! Opening mounts the tooltip and requests a frame. By then the host has
//! laid the tooltip out, so the frame callback measures wrapper and tooltip
//! and writes the placement offset as the tooltip's `left` before anything
//! is painted. If either box is missing at that point the tooltip keeps
//! its previous offset.
//!
//! An annotation built without tooltip text (or with only whitespace) is
//! static: a plain span that never opens and never listens for pointers.
//!
//! # Markup
//!
//! ```text
//! span.wrapper
//! ├── span.arabicWord[role=button][tabindex=0][aria-describedby][aria-expanded]
//! └── span#tooltip-N.tooltip[role=tooltip]      (only while open)
//! ```
//!
//! Dropping an annotation releases its pointer listeners and cancels any
//! pending placement, mounted or not.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloss_core::event::{Event, NodeId};
use gloss_render::{Document, DocumentError, DocumentKey, NodeRef, Tag};
use gloss_runtime::{EventOutcome, FrameHandle, FrameScheduler, Host, Interactive};

use crate::outside::OutsideDetector;
use crate::placement::PlacementConfig;
use crate::variant::Variant;

/// Visibility state of an interactive annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationState {
    #[default]
    Closed,
    Open,
}

/// An inline word with an optional tooltip.
#[derive(Debug)]
pub struct Annotation {
    variant: Variant,
    content: String,
    root: NodeRef,
    owner: Option<DocumentKey>,
    mode: Mode,
}

#[derive(Debug)]
enum Mode {
    Static,
    Interactive(Rc<RefCell<Tooltip>>),
}

#[derive(Debug)]
struct Tooltip {
    state: AnnotationState,
    variant: Variant,
    text: String,
    id: Option<String>,
    placement: PlacementConfig,
    wrapper: NodeRef,
    anchor: NodeRef,
    element: NodeRef,
    offset: Option<f64>,
    pending: Option<FrameHandle>,
    detector: OutsideDetector,
}

impl Annotation {
    /// Build an annotation. Blank or missing `tooltip` makes it static.
    #[must_use]
    pub fn new(variant: Variant, content: impl Into<String>, tooltip: Option<&str>) -> Self {
        let mode = match tooltip {
            Some(text) if !text.trim().is_empty() => {
                Mode::Interactive(Rc::new(RefCell::new(Tooltip {
                    state: AnnotationState::Closed,
                    variant,
                    text: text.to_owned(),
                    id: None,
                    placement: PlacementConfig::default(),
                    wrapper: NodeRef::new(),
                    anchor: NodeRef::new(),
                    element: NodeRef::new(),
                    offset: None,
                    pending: None,
                    detector: OutsideDetector::new(),
                })))
            }
            _ => Mode::Static,
        };
        Self {
            variant,
            content: content.into(),
            root: NodeRef::new(),
            owner: None,
            mode,
        }
    }

    /// Arabic word, optionally glossed in Indonesian.
    #[must_use]
    pub fn arabic(content: impl Into<String>, tooltip: Option<&str>) -> Self {
        Self::new(Variant::Arabic, content, tooltip)
    }

    /// Indonesian word, optionally glossed with its Arabic original.
    #[must_use]
    pub fn indonesian(content: impl Into<String>, tooltip: Option<&str>) -> Self {
        Self::new(Variant::Indonesian, content, tooltip)
    }

    /// Set the placement configuration. No effect on static annotations.
    #[must_use]
    pub fn placement(self, config: PlacementConfig) -> Self {
        if let Mode::Interactive(tooltip) = &self.mode {
            tooltip.borrow_mut().placement = config;
        }
        self
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self.mode, Mode::Interactive(_))
    }

    /// Current state. Static annotations are always closed.
    #[must_use]
    pub fn state(&self) -> AnnotationState {
        self.with_tooltip(|t| t.state).unwrap_or_default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == AnnotationState::Open
    }

    /// Tooltip text, if interactive.
    #[must_use]
    pub fn tooltip_text(&self) -> Option<String> {
        self.with_tooltip(|t| t.text.clone())
    }

    /// Stable tooltip id, assigned on first mount.
    #[must_use]
    pub fn tooltip_id(&self) -> Option<String> {
        self.with_tooltip(|t| t.id.clone()).flatten()
    }

    /// Outermost mounted element.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root.get()
    }

    /// The button-like element, if interactive and mounted.
    #[must_use]
    pub fn anchor(&self) -> Option<NodeId> {
        self.with_tooltip(|t| t.anchor.get()).flatten()
    }

    /// The tooltip element, present only while open.
    #[must_use]
    pub fn tooltip(&self) -> Option<NodeId> {
        self.with_tooltip(|t| t.element.get()).flatten()
    }

    /// Last applied placement offset.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.with_tooltip(|t| t.offset).flatten()
    }

    /// Whether a placement frame is waiting to run.
    #[must_use]
    pub fn is_placement_pending(&self) -> bool {
        self.with_tooltip(|t| t.pending.as_ref().is_some_and(FrameHandle::is_pending))
            .unwrap_or(false)
    }

    /// Whether the outside-interaction listeners are registered.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.with_tooltip(|t| t.detector.is_active())
            .unwrap_or(false)
    }

    /// Render under `parent` and start watching for outside interaction.
    ///
    /// Mounting again into the same host first unmounts. A tree still
    /// mounted in another host is left alone and
    /// [`DocumentError::ForeignNode`] is returned; unmount it from its own
    /// host first. Returns the outermost element.
    pub fn mount(&mut self, host: &mut Host, parent: NodeId) -> Result<NodeId, DocumentError> {
        if self.root.is_set() {
            self.unmount(host)?;
        }
        let root = match &self.mode {
            Mode::Static => {
                let doc = host.document_mut();
                let span = doc.create_element(Tag::Span);
                if let Some(class) = self.variant.static_class() {
                    doc.add_class(span, class)?;
                }
                doc.set_attribute(span, "lang", self.variant.lang())?;
                doc.set_attribute(span, "dir", self.variant.dir())?;
                doc.set_text(span, self.content.as_str())?;
                doc.append_child(parent, span)?;
                span
            }
            Mode::Interactive(shared) => {
                let bus = host.bus().clone();
                let weak = Rc::downgrade(shared);
                let mut tooltip = shared.borrow_mut();
                let wrapper = tooltip.render_anchor(host.document_mut(), &self.content, parent)?;
                let region = tooltip.wrapper.clone();
                tooltip.detector.watch(&bus, region, move |doc, _| {
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    let Ok(mut tooltip) = shared.try_borrow_mut() else {
                        return;
                    };
                    if let Err(err) = tooltip.close(doc) {
                        gloss_core::warn!(%err, "outside close failed");
                    }
                });
                wrapper
            }
        };
        self.root.set(root);
        self.owner = Some(host.document().key());
        gloss_core::debug!(
            root = %root,
            interactive = self.is_interactive(),
            "annotation mounted"
        );
        Ok(root)
    }

    /// Remove from the document, release listeners, cancel placement.
    ///
    /// Safe to call when not mounted. Fails with
    /// [`DocumentError::ForeignNode`], changing nothing, when `host` is not
    /// the one it was mounted in.
    pub fn unmount(&mut self, host: &mut Host) -> Result<(), DocumentError> {
        self.ensure_owner(host)?;
        self.owner = None;
        if let Mode::Interactive(shared) = &self.mode {
            let mut tooltip = shared.borrow_mut();
            tooltip.detector.release();
            tooltip.pending = None;
            tooltip.state = AnnotationState::Closed;
            tooltip.element.take();
            tooltip.anchor.take();
            tooltip.wrapper.take();
        }
        if let Some(root) = self.root.take() {
            let doc = host.document_mut();
            if doc.exists(root) {
                doc.remove(root)?;
            }
            gloss_core::debug!(root = %root, "annotation unmounted");
        }
        Ok(())
    }

    /// Open the tooltip. No-op when static, unmounted, or already open.
    pub fn open(&mut self, host: &mut Host) -> Result<(), DocumentError> {
        let Mode::Interactive(shared) = &self.mode else {
            return Ok(());
        };
        self.ensure_owner(host)?;
        let frames = host.frames().clone();
        let weak = Rc::downgrade(shared);
        shared
            .borrow_mut()
            .open(host.document_mut(), &frames, weak)
    }

    /// Close the tooltip. No-op when static or already closed.
    pub fn close(&mut self, host: &mut Host) -> Result<(), DocumentError> {
        let Mode::Interactive(shared) = &self.mode else {
            return Ok(());
        };
        self.ensure_owner(host)?;
        shared.borrow_mut().close(host.document_mut())
    }

    /// Open if closed, close if open.
    pub fn toggle(&mut self, host: &mut Host) -> Result<(), DocumentError> {
        if self.is_open() {
            self.close(host)
        } else {
            self.open(host)
        }
    }

    fn with_tooltip<R>(&self, f: impl FnOnce(&Tooltip) -> R) -> Option<R> {
        match &self.mode {
            Mode::Static => None,
            Mode::Interactive(shared) => Some(f(&shared.borrow())),
        }
    }

    fn ensure_owner(&self, host: &Host) -> Result<(), DocumentError> {
        match (self.owner, self.root.get()) {
            (Some(owner), Some(root)) if owner != host.document().key() => {
                Err(DocumentError::ForeignNode(root))
            }
            _ => Ok(()),
        }
    }
}

impl Interactive for Annotation {
    fn handle(&mut self, host: &mut Host, event: &Event) -> EventOutcome {
        let Some(anchor) = self.anchor() else {
            return EventOutcome::IGNORED;
        };
        if self.owner != Some(host.document().key()) {
            return EventOutcome::IGNORED;
        }
        let outcome = match event {
            Event::Click {
                target: Some(target),
            } if host.document().contains(anchor, *target) => EventOutcome::CONSUMED,
            Event::Key {
                target: Some(target),
                key,
            } if *target == anchor && key.is_activation() => EventOutcome::PREVENTED,
            _ => return EventOutcome::IGNORED,
        };
        if let Err(err) = self.toggle(host) {
            gloss_core::warn!(%err, "annotation toggle failed");
        }
        outcome
    }
}

impl Tooltip {
    fn render_anchor(
        &mut self,
        doc: &mut Document,
        content: &str,
        parent: NodeId,
    ) -> Result<NodeId, DocumentError> {
        let id = self
            .id
            .get_or_insert_with(|| doc.next_unique_id("tooltip"))
            .clone();

        let wrapper = doc.create_element(Tag::Span);
        doc.add_class(wrapper, "wrapper")?;

        let anchor = doc.create_element(Tag::Span);
        doc.add_class(anchor, self.variant.anchor_class())?;
        doc.set_attribute(anchor, "role", "button")?;
        doc.set_attribute(anchor, "tabindex", "0")?;
        doc.set_attribute(anchor, "aria-describedby", id)?;
        doc.set_attribute(anchor, "aria-expanded", "false")?;
        doc.set_attribute(anchor, "lang", self.variant.lang())?;
        doc.set_attribute(anchor, "dir", self.variant.dir())?;
        doc.set_text(anchor, content)?;

        doc.append_child(wrapper, anchor)?;
        doc.append_child(parent, wrapper)?;

        self.state = AnnotationState::Closed;
        self.wrapper.set(wrapper);
        self.anchor.set(anchor);
        Ok(wrapper)
    }

    fn open(
        &mut self,
        doc: &mut Document,
        frames: &FrameScheduler,
        this: Weak<RefCell<Tooltip>>,
    ) -> Result<(), DocumentError> {
        if self.state == AnnotationState::Open {
            return Ok(());
        }
        let (Some(wrapper), Some(anchor)) = (self.wrapper.get(), self.anchor.get()) else {
            return Ok(());
        };
        let Some(id) = self.id.clone() else {
            return Ok(());
        };

        let lang = self.variant.counterpart();
        let element = doc.create_element(Tag::Span);
        doc.set_attribute(element, "id", id)?;
        doc.add_class(element, "tooltip")?;
        doc.set_attribute(element, "role", "tooltip")?;
        doc.set_attribute(element, "lang", lang.lang())?;
        doc.set_attribute(element, "dir", lang.dir())?;
        doc.set_text(element, self.text.as_str())?;
        if let Some(offset) = self.offset {
            doc.set_style(element, "left", format!("{offset}px"))?;
        }
        doc.append_child(wrapper, element)?;
        doc.set_attribute(anchor, "aria-expanded", "true")?;

        self.element.set(element);
        self.state = AnnotationState::Open;
        self.pending = Some(frames.request(move |doc| {
            let Some(shared) = this.upgrade() else {
                return;
            };
            if let Ok(mut tooltip) = shared.try_borrow_mut() {
                tooltip.place(doc);
            }
        }));
        gloss_core::debug!(tooltip = %element, "annotation opened");
        Ok(())
    }

    fn close(&mut self, doc: &mut Document) -> Result<(), DocumentError> {
        if self.state == AnnotationState::Closed {
            return Ok(());
        }
        self.state = AnnotationState::Closed;
        self.pending = None;
        if let Some(anchor) = self.anchor.get()
            && doc.exists(anchor)
        {
            doc.set_attribute(anchor, "aria-expanded", "false")?;
        }
        if let Some(element) = self.element.take()
            && doc.exists(element)
        {
            doc.remove(element)?;
        }
        gloss_core::debug!("annotation closed");
        Ok(())
    }

    fn place(&mut self, doc: &mut Document) {
        self.pending = None;
        if self.state != AnnotationState::Open {
            return;
        }
        let (Some(wrapper), Some(element)) = (self.wrapper.get(), self.element.get()) else {
            gloss_core::trace!("placement skipped: tooltip not mounted");
            return;
        };
        let (Some(anchor_box), Some(tooltip_box)) = (doc.rect(wrapper), doc.rect(element)) else {
            gloss_core::trace!("placement skipped: geometry not measured");
            return;
        };
        let offset = self.placement.offset(
            anchor_box.extent(),
            tooltip_box.extent(),
            doc.viewport().width,
        );
        if doc.set_style(element, "left", format!("{offset}px")).is_ok() {
            self.offset = Some(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_core::event::{KeyCode, KeyEvent, KeyEventKind, PointerEvent};
    use gloss_runtime::HostConfig;

    fn host() -> Host {
        Host::new(HostConfig::default().viewport(1000.0, 600.0))
    }

    fn mounted(annotation: &mut Annotation) -> Host {
        let mut host = host();
        let root = host.document().root();
        annotation.mount(&mut host, root).unwrap();
        host.commit();
        host
    }

    #[test]
    fn blank_tooltip_is_static() {
        assert!(!Annotation::arabic("كتاب", None).is_interactive());
        assert!(!Annotation::arabic("كتاب", Some("")).is_interactive());
        assert!(!Annotation::arabic("كتاب", Some("  \t")).is_interactive());
        assert!(Annotation::arabic("كتاب", Some("buku")).is_interactive());
    }

    #[test]
    fn static_mount_renders_plain_span() {
        let mut word = Annotation::arabic("كتاب", None);
        let host = mounted(&mut word);
        let root = word.root().unwrap();

        assert_eq!(
            host.document().to_markup(root),
            "<span class=\"arabicTextOnly\" dir=\"rtl\" lang=\"ar\">كتاب</span>"
        );
        assert!(host.bus().is_empty());
        assert!(!word.is_watching());
    }

    #[test]
    fn indonesian_static_has_no_class() {
        let mut word = Annotation::indonesian("buku", Some(" "));
        let host = mounted(&mut word);
        assert_eq!(
            host.document().to_markup(word.root().unwrap()),
            "<span dir=\"ltr\" lang=\"id\">buku</span>"
        );
    }

    #[test]
    fn open_and_close_keep_tooltip_and_aria_in_sync() {
        let mut word = Annotation::arabic("كتاب", Some("buku"));
        let mut host = mounted(&mut word);
        let anchor = word.anchor().unwrap();
        let id = word.tooltip_id().unwrap();
        assert_eq!(host.document().attribute(anchor, "aria-describedby"), Some(id.as_str()));

        word.open(&mut host).unwrap();
        assert!(word.is_open());
        let tip = word.tooltip().unwrap();
        assert_eq!(host.document().attribute(tip, "id"), Some(id.as_str()));
        assert_eq!(host.document().attribute(tip, "lang"), Some("id"));
        assert_eq!(host.document().attribute(anchor, "aria-expanded"), Some("true"));
        assert!(word.is_placement_pending());

        word.close(&mut host).unwrap();
        assert!(!word.is_open());
        assert!(!host.document().exists(tip));
        assert_eq!(word.tooltip(), None);
        assert_eq!(host.document().attribute(anchor, "aria-expanded"), Some("false"));
        assert!(!word.is_placement_pending());

        word.close(&mut host).unwrap();
        assert_eq!(word.state(), AnnotationState::Closed);
    }

    #[test]
    fn commit_applies_offset() {
        // wrapper: 4 cols * 8 = 32 wide at x=0; tooltip: "buku" 32 wide.
        // centred offset is 0, then left clamp moves it to the margin.
        let mut word = Annotation::arabic("kata", Some("buku"));
        let mut host = mounted(&mut word);
        word.open(&mut host).unwrap();
        assert_eq!(host.commit(), 1);

        let tip = word.tooltip().unwrap();
        assert_eq!(word.offset(), Some(16.0));
        assert_eq!(host.document().style(tip, "left"), Some("16px"));
    }

    #[test]
    fn closing_before_frame_cancels_placement() {
        let mut word = Annotation::arabic("kata", Some("buku"));
        let mut host = mounted(&mut word);
        word.open(&mut host).unwrap();
        word.close(&mut host).unwrap();

        assert_eq!(host.commit(), 0);
        assert_eq!(word.offset(), None);
    }

    #[test]
    fn keyboard_activation_prevents_default() {
        let mut word = Annotation::indonesian("buku", Some("كتاب"));
        let mut host = mounted(&mut word);
        let anchor = word.anchor().unwrap();

        let outcome = word.handle(&mut host, &Event::key(anchor, KeyCode::Char(' ')));
        assert_eq!(outcome, EventOutcome::PREVENTED);
        assert!(word.is_open());

        let outcome = word.handle(&mut host, &Event::key(anchor, KeyCode::Enter));
        assert_eq!(outcome, EventOutcome::PREVENTED);
        assert!(!word.is_open());

        let release = Event::Key {
            target: Some(anchor),
            key: KeyEvent::new(KeyCode::Enter).with_kind(KeyEventKind::Release),
        };
        assert_eq!(word.handle(&mut host, &release), EventOutcome::IGNORED);
        assert_eq!(word.handle(&mut host, &Event::key(anchor, KeyCode::Tab)), EventOutcome::IGNORED);
        assert!(!word.is_open());
    }

    #[test]
    fn outside_pointer_closes_through_host() {
        let mut word = Annotation::arabic("kata", Some("buku"));
        let mut host = mounted(&mut word);
        word.open(&mut host).unwrap();
        host.commit();

        let root = host.document().root();
        host.dispatch(&Event::Pointer(PointerEvent::mouse_down(root)), &mut []);
        assert!(!word.is_open());
    }

    #[test]
    fn remount_keeps_tooltip_id() {
        let mut word = Annotation::arabic("kata", Some("buku"));
        let mut host = mounted(&mut word);
        let id = word.tooltip_id();
        let first_root = word.root().unwrap();
        let parent = host.document().root();

        word.mount(&mut host, parent).unwrap();
        assert_eq!(word.tooltip_id(), id);
        assert!(!host.document().exists(first_root));
        assert_eq!(host.bus().listener_count(), 2);
    }
}
