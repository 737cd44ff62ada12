#![forbid(unsafe_code)]

//! Layout passes that give elements measured boxes.
//!
//! The host runs a [`Layout`] after committing tree changes and before any
//! next-paint callbacks, so measurement always sees a laid-out tree.
//!
//! [`TextWidthLayout`] is a deliberately small single-line inline flow:
//!
//! - Text elements are `display_width(text) * cell_width + 2 * padding` wide.
//! - Elements without text are as wide as their in-flow children.
//! - In-flow children are placed left to right from the parent's left edge.
//! - Out-of-flow children (by class, `tooltip` by default) hang below the
//!   parent and are shifted by their inline `left` style, the way an
//!   absolutely positioned box would be.
//! - Pinned rects (set by the host) are kept as-is.

use std::collections::HashMap;

use gloss_core::event::NodeId;
use gloss_core::geometry::Rect;
use unicode_width::UnicodeWidthStr;

use crate::document::Document;

/// A layout pass over the whole document.
pub trait Layout {
    fn layout(&mut self, doc: &mut Document);
}

impl<F: FnMut(&mut Document)> Layout for F {
    fn layout(&mut self, doc: &mut Document) {
        self(doc)
    }
}

/// Single-line inline flow measuring text by Unicode display width.
#[derive(Debug, Clone)]
pub struct TextWidthLayout {
    /// Width of one display column.
    pub cell_width: f64,
    /// Height of every line box.
    pub line_height: f64,
    /// Horizontal padding on each side of text elements.
    pub padding: f64,
    /// Classes that take an element out of the inline flow.
    pub out_of_flow_classes: Vec<String>,
}

impl Default for TextWidthLayout {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 20.0,
            padding: 0.0,
            out_of_flow_classes: vec!["tooltip".to_owned()],
        }
    }
}

impl TextWidthLayout {
    /// Set the width of one display column.
    #[must_use]
    pub fn cell_width(mut self, width: f64) -> Self {
        self.cell_width = width;
        self
    }

    /// Set the line box height.
    #[must_use]
    pub fn line_height(mut self, height: f64) -> Self {
        self.line_height = height;
        self
    }

    /// Set text padding.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Measure a text run.
    #[must_use]
    pub fn text_width(&self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.cell_width + 2.0 * self.padding
    }

    fn is_out_of_flow(&self, doc: &Document, node: NodeId) -> bool {
        doc.get(node).is_some_and(|element| {
            self.out_of_flow_classes
                .iter()
                .any(|class| element.has_class(class))
        })
    }

    fn measure(&self, doc: &Document, node: NodeId, widths: &mut HashMap<NodeId, f64>) -> f64 {
        let Some(element) = doc.get(node) else {
            return 0.0;
        };
        let mut in_flow = 0.0;
        for &child in element.children() {
            let width = self.measure(doc, child, widths);
            if !self.is_out_of_flow(doc, child) {
                in_flow += width;
            }
        }
        let width = match (element.is_pinned(), element.rect(), element.text()) {
            (true, Some(rect), _) => rect.width,
            (_, _, Some(text)) => self.text_width(text),
            _ => in_flow,
        };
        widths.insert(node, width);
        width
    }

    fn place(&self, doc: &mut Document, node: NodeId, widths: &HashMap<NodeId, f64>) {
        let Some(parent) = doc.rect(node) else {
            return;
        };
        let children = doc.children(node).to_vec();
        let mut cursor = parent.left();
        for child in children {
            let width = widths.get(&child).copied().unwrap_or(0.0);
            let rect = if self.is_out_of_flow(doc, child) {
                let shift = doc.style_px(child, "left").unwrap_or(0.0);
                Rect::new(parent.left() + shift, parent.bottom(), width, self.line_height)
            } else {
                let rect = Rect::new(cursor, parent.top(), width, self.line_height);
                cursor += width;
                rect
            };
            doc.record_layout(child, rect);
            self.place(doc, child, widths);
        }
    }
}

impl Layout for TextWidthLayout {
    fn layout(&mut self, doc: &mut Document) {
        let mut widths = HashMap::new();
        let root = doc.root();
        self.measure(doc, root, &mut widths);
        self.place(doc, root, &widths);
        gloss_core::trace!(nodes = widths.len(), "text-width layout pass");
    }
}
