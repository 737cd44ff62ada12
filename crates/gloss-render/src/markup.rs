#![forbid(unsafe_code)]

//! Markup snapshots of a document subtree.
//!
//! Output is deterministic: `id` first, then `class`, then the remaining
//! attributes in name order, then `style`. Text and attribute values are
//! HTML-escaped.

use std::fmt::Write;

use gloss_core::event::NodeId;

use crate::document::Document;

impl Document {
    /// Render `node` and its subtree as compact markup.
    ///
    /// Returns an empty string for a stale id.
    #[must_use]
    pub fn to_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.get(node) else {
            return;
        };
        let tag = element.tag().as_str();
        out.push('<');
        out.push_str(tag);
        if let Some(id) = element.attribute("id") {
            push_attr(out, "id", id);
        }
        if !element.classes().is_empty() {
            push_attr(out, "class", &element.classes().join(" "));
        }
        for (name, value) in element.attributes() {
            if name != "id" {
                push_attr(out, name, value);
            }
        }
        if !element.style().is_empty() {
            let style = element
                .style()
                .iter()
                .map(|(property, value)| format!("{property}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            push_attr(out, "style", &style);
        }
        out.push('>');
        if let Some(text) = element.text() {
            out.push_str(&html_escape::encode_text(text));
        }
        for &child in element.children() {
            self.write_markup(child, out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(
        out,
        " {name}=\"{}\"",
        html_escape::encode_double_quoted_attribute(value)
    );
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, Tag};

    #[test]
    fn attribute_order_is_stable() {
        let mut doc = Document::default();
        let root = doc.root();
        let span = doc.create_element(Tag::Span);
        doc.append_child(root, span).unwrap();
        doc.set_attribute(span, "role", "button").unwrap();
        doc.set_attribute(span, "id", "w").unwrap();
        doc.set_attribute(span, "aria-expanded", "false").unwrap();
        doc.add_class(span, "arabicWord").unwrap();
        doc.set_style(span, "left", "4px").unwrap();
        doc.set_text(span, "كتاب").unwrap();

        assert_eq!(
            doc.to_markup(span),
            "<span id=\"w\" class=\"arabicWord\" aria-expanded=\"false\" role=\"button\" \
             style=\"left: 4px\">كتاب</span>"
        );
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut doc = Document::default();
        let span = doc.create_element(Tag::Span);
        doc.set_text(span, "a < b & c").unwrap();
        doc.set_attribute(span, "title", "say \"hi\"").unwrap();
        assert_eq!(
            doc.to_markup(span),
            "<span title=\"say &quot;hi&quot;\">a &lt; b &amp; c</span>"
        );
    }

    #[test]
    fn stale_node_renders_nothing() {
        let mut doc = Document::default();
        let root = doc.root();
        let span = doc.create_element(Tag::Span);
        doc.append_child(root, span).unwrap();
        doc.remove(span).unwrap();
        assert_eq!(doc.to_markup(span), "");
    }
}
