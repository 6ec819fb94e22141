//! A small typed UI tree.
//!
//! Widgets are built as [`Element`] values instead of HTML strings. Text and
//! attribute values are escaped only when the tree is rendered, so user data
//! can never inject markup, and update functions change typed attributes
//! rather than rewriting class strings.

use std::collections::BTreeMap;
use std::fmt;

/// Attribute naming the structural role of a sub-element inside a widget.
pub const ROLE_ATTR: &str = "data-role";
/// Attribute naming the widget kind on a widget's root element.
pub const WIDGET_ATTR: &str = "data-widget";
/// Class that carries the CSS transition hook; updates never remove it.
pub const TRANSITION_CLASS: &str = "transition";

const SELF_CLOSING: [&str; 6] = ["circle", "path", "line", "rect", "polyline", "br"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    // ── Builder ─────────────────────────────────────────────────────

    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn role(self, role: &str) -> Self {
        self.attr(ROLE_ATTR, role)
    }

    pub fn style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.styles.insert(property.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn role_name(&self) -> Option<&str> {
        self.get_attr(ROLE_ATTR)
    }

    pub fn widget_name(&self) -> Option<&str> {
        self.get_attr(WIDGET_ATTR)
    }

    // ── Mutation: each setter reports whether anything changed ───────

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.attrs.get(name) == Some(&value) {
            return false;
        }
        self.attrs.insert(name.to_string(), value);
        true
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.styles.get(property) == Some(&value) {
            return false;
        }
        self.styles.insert(property.to_string(), value);
        true
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.text.as_deref() == Some(text.as_str()) {
            return false;
        }
        self.text = Some(text);
        true
    }

    pub fn add_class(&mut self, class: &str) -> bool {
        if class.is_empty() || self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }

    /// Replaces every class starting with `prefix` by `class`, keeping all others.
    pub fn swap_class_with_prefix(&mut self, prefix: &str, class: &str) -> bool {
        let before = self.classes.clone();
        self.classes.retain(|c| c == class || !c.starts_with(prefix));
        self.add_class(class);
        before != self.classes
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Removes direct children matching `pred`, returning how many were removed.
    pub fn remove_children_where(&mut self, pred: impl Fn(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|c| !pred(c));
        before - self.children.len()
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    // ── Queries (depth-first, self included) ────────────────────────

    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let Some(found) = child.find_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_role(&self, role: &str) -> Option<&Element> {
        self.find(&|e: &Element| e.role_name() == Some(role))
    }

    pub fn find_role_mut(&mut self, role: &str) -> Option<&mut Element> {
        self.find_mut(&|e: &Element| e.role_name() == Some(role))
    }

    pub fn find_widget_mut(&mut self, widget: &str) -> Option<&mut Element> {
        self.find_mut(&|e: &Element| e.widget_name() == Some(widget))
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape_attr(&self.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if !self.styles.is_empty() {
            let style = self
                .styles
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            out.push_str(" style=\"");
            out.push_str(&escape_attr(&style));
            out.push('"');
        }

        if self.text.is_none() && self.children.is_empty() && SELF_CLOSING.contains(&self.tag.as_str()) {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
