//! Escape-by-default markup builder.
//!
//! Every text node and attribute value passes through [`escape`] when
//! rendered. Pre-rendered, trusted markup can only be inserted through the
//! explicit [`Node::Raw`] variant.

use std::borrow::Cow;
use std::fmt::{self, Write as _};

/// Escape for safe insertion into text or a quoted attribute.
///
/// Covers `& < > " ' /`; clean input is borrowed as-is.
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'', '/']) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(v_htmlescape::escape(input).to_string())
}

/// Rendered markup. Only produced by rendering nodes or by explicit trust.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Mark a string as already-safe markup. This is the opt-out from escaping.
    pub fn trusted(html: impl Into<String>) -> Self {
        Markup(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node in a markup tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Text, escaped on render
    Text(String),
    /// Trusted markup, inserted verbatim
    Raw(Markup),
    Element(Element),
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Elements rendered without a closing tag
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// An HTML element with attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, Some(value.to_string())));
        self
    }

    /// Boolean attribute, present only when `on`
    pub fn flag(mut self, name: &'static str, on: bool) -> Self {
        if on {
            self.attrs.push((name, None));
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn render(&self) -> Markup {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = write_element(self, &mut out);
        Markup(out)
    }
}

#[cfg(test)]
impl Element {
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated text of this subtree (unescaped)
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

#[cfg(test)]
fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Raw(_) => {}
            Node::Element(e) => collect_text(&e.children, out),
        }
    }
}

fn write_element(el: &Element, out: &mut String) -> fmt::Result {
    write!(out, "<{}", el.tag)?;
    for (name, value) in &el.attrs {
        match value {
            Some(v) => write!(out, " {}=\"{}\"", name, escape(v))?,
            None => write!(out, " {}", name)?,
        }
    }
    out.push('>');

    if VOID_TAGS.contains(&el.tag) {
        return Ok(());
    }

    write_nodes(&el.children, out)?;
    write!(out, "</{}>", el.tag)
}

fn write_nodes(nodes: &[Node], out: &mut String) -> fmt::Result {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(&escape(t)),
            Node::Raw(m) => out.push_str(m.as_str()),
            Node::Element(e) => write_element(e, out)?,
        }
    }
    Ok(())
}

/// Shorthand for `Element::new`
pub fn el(tag: &'static str) -> Element {
    Element::new(tag)
}
