#![forbid(unsafe_code)]

//! Click-to-reveal translation block.
//!
//! A quoted Arabic passage whose translation is hidden until the passage is
//! activated. Visibility is only a class toggle: the translation stays in
//! the tree and the styling layer animates it in and out.

use gloss_core::event::{Event, NodeId};
use gloss_render::{Document, DocumentError, DocumentKey, NodeRef, Tag};
use gloss_runtime::{EventOutcome, Host, Interactive};

/// Hint shown on hover over the passage.
pub const DEFAULT_REVEAL_TITLE: &str = "Klik untuk melihat terjemahan";

/// Arabic passage with a collapsible translation and optional source.
#[derive(Debug)]
pub struct RevealBlock {
    arabic_text: String,
    translation: String,
    source: Option<String>,
    title: String,
    visible: bool,
    owner: Option<DocumentKey>,
    container: NodeRef,
    content: NodeRef,
    icon: NodeRef,
    translation_wrapper: NodeRef,
}

impl RevealBlock {
    #[must_use]
    pub fn new(arabic_text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            arabic_text: arabic_text.into(),
            translation: translation.into(),
            source: None,
            title: DEFAULT_REVEAL_TITLE.to_owned(),
            visible: false,
            owner: None,
            container: NodeRef::new(),
            content: NodeRef::new(),
            icon: NodeRef::new(),
            translation_wrapper: NodeRef::new(),
        }
    }

    /// Where the passage is quoted from.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.source = (!source.trim().is_empty()).then_some(source);
        self
    }

    /// Hover hint on the passage.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.container.get()
    }

    /// The activatable passage element.
    #[must_use]
    pub fn content(&self) -> Option<NodeId> {
        self.content.get()
    }

    /// Render under `parent`, replacing an earlier mount in the same
    /// document. Fails with [`DocumentError::ForeignNode`] while still
    /// mounted in another document.
    pub fn mount(&mut self, doc: &mut Document, parent: NodeId) -> Result<NodeId, DocumentError> {
        self.unmount(doc)?;

        let container = doc.create_element(Tag::Div);
        doc.add_class(container, "container")?;

        let content = doc.create_element(Tag::Div);
        doc.add_class(content, "arabicContent")?;
        doc.set_attribute(content, "role", "button")?;
        doc.set_attribute(content, "tabindex", "0")?;
        doc.set_attribute(content, "title", self.title.as_str())?;
        doc.set_attribute(content, "lang", "ar")?;
        doc.set_attribute(content, "dir", "rtl")?;
        doc.append_child(container, content)?;

        let icon = doc.create_element(Tag::Span);
        doc.add_class(icon, "toggleIcon")?;
        doc.set_attribute(icon, "aria-hidden", "true")?;
        doc.append_child(content, icon)?;

        let passage = doc.create_element(Tag::P);
        doc.set_text(passage, self.arabic_text.as_str())?;
        doc.append_child(content, passage)?;

        let wrapper = doc.create_element(Tag::Div);
        doc.add_class(wrapper, "translationWrapper")?;
        doc.append_child(container, wrapper)?;

        let inner = doc.create_element(Tag::Div);
        doc.add_class(inner, "translationContent")?;
        doc.append_child(wrapper, inner)?;

        let translation = doc.create_element(Tag::P);
        doc.add_class(translation, "translationText")?;
        doc.set_text(translation, self.translation.as_str())?;
        doc.append_child(inner, translation)?;

        if let Some(source) = &self.source {
            let info = doc.create_element(Tag::Div);
            doc.add_class(info, "sourceInfo")?;
            let label = doc.create_element(Tag::Span);
            doc.set_text(label, source.as_str())?;
            doc.append_child(info, label)?;
            doc.append_child(inner, info)?;
        }

        doc.append_child(parent, container)?;

        self.container.set(container);
        self.content.set(content);
        self.icon.set(icon);
        self.translation_wrapper.set(wrapper);
        self.owner = Some(doc.key());
        self.sync(doc)?;
        Ok(container)
    }

    /// Show or hide the translation.
    pub fn toggle(&mut self, doc: &mut Document) -> Result<(), DocumentError> {
        self.ensure_owner(doc)?;
        self.visible = !self.visible;
        self.sync(doc)
    }

    pub fn unmount(&mut self, doc: &mut Document) -> Result<(), DocumentError> {
        self.ensure_owner(doc)?;
        self.owner = None;
        self.content.take();
        self.icon.take();
        self.translation_wrapper.take();
        if let Some(container) = self.container.take()
            && doc.exists(container)
        {
            doc.remove(container)?;
        }
        Ok(())
    }

    fn ensure_owner(&self, doc: &Document) -> Result<(), DocumentError> {
        match (self.owner, self.container.get()) {
            (Some(owner), Some(container)) if owner != doc.key() => {
                Err(DocumentError::ForeignNode(container))
            }
            _ => Ok(()),
        }
    }

    fn sync(&self, doc: &mut Document) -> Result<(), DocumentError> {
        let expanded = if self.visible { "true" } else { "false" };
        if let Some(content) = self.content.get() {
            doc.set_attribute(content, "aria-expanded", expanded)?;
        }
        for (node, class) in [
            (self.icon.get(), "iconVisible"),
            (self.translation_wrapper.get(), "visible"),
        ] {
            let Some(node) = node else { continue };
            if self.visible {
                doc.add_class(node, class)?;
            } else {
                doc.remove_class(node, class)?;
            }
        }
        Ok(())
    }
}

impl Interactive for RevealBlock {
    fn handle(&mut self, host: &mut Host, event: &Event) -> EventOutcome {
        let Some(content) = self.content.get() else {
            return EventOutcome::IGNORED;
        };
        if self.owner != Some(host.document().key()) {
            return EventOutcome::IGNORED;
        }
        let hit = match event {
            Event::Click {
                target: Some(target),
            } => host.document().contains(content, *target),
            Event::Key {
                target: Some(target),
                key,
            } => *target == content && key.is_activation(),
            _ => false,
        };
        if !hit {
            return EventOutcome::IGNORED;
        }
        if let Err(err) = self.toggle(host.document_mut()) {
            gloss_core::warn!(%err, "reveal toggle failed");
        }
        EventOutcome::CONSUMED
    }
}
