//! HTML document wrapper and DOM helpers.
//!
//! Parsing and serialization go through html5ever; the tree is an
//! `markup5ever_rcdom::RcDom`, mutated in place.

use codeslide_core::{Error, Result};
use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, serialize, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A parsed HTML document or fragment.
pub struct HtmlDocument {
    dom: RcDom,

    /// Serialize only the body's children (the input had no document shell).
    fragment: bool,
}

impl HtmlDocument {
    /// Parse HTML.
    ///
    /// Input starting with a doctype or `<html>` is treated as a full
    /// document; anything else as a fragment that serializes back without
    /// the implied `<html>`/`<body>` shell.
    pub fn parse(html: &str) -> Self {
        let fragment = !looks_like_document(html);
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
        Self { dom, fragment }
    }

    /// Whether this was parsed as a fragment.
    pub fn is_fragment(&self) -> bool {
        self.fragment
    }

    /// The document node.
    pub fn document(&self) -> Handle {
        self.dom.document.clone()
    }

    /// The `<body>` element.
    pub fn body(&self) -> Option<Handle> {
        let html = child_element(&self.dom.document, "html")?;
        child_element(&html, "body")
    }

    /// Serialize the document (or the fragment) back to HTML.
    pub fn to_html(&self) -> Result<String> {
        let node = if self.fragment {
            self.body().unwrap_or_else(|| self.document())
        } else {
            self.document()
        };
        serialize_node(&node, TraversalScope::ChildrenOnly(None))
    }
}

fn looks_like_document(html: &str) -> bool {
    let head: String = html
        .trim_start()
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Serialize a node, with or without the node itself.
pub(crate) fn serialize_node(node: &Handle, scope: TraversalScope) -> Result<String> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };

    serialize(&mut output, &SerializableHandle::from(node.clone()), opts)
        .map_err(|e| Error::DomError(format!("HTML serialization failed: {}", e)))?;

    String::from_utf8(output)
        .map_err(|e| Error::DomError(format!("UTF-8 conversion failed: {}", e)))
}

/// Parse an HTML snippet into detached nodes, as if it were the content of a
/// `<code>` element.
pub(crate) fn parse_children(markup: &str) -> Result<Vec<Handle>> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .one(format!("<code>{}</code>", markup));

    let code = find_first(&dom.document, "code")
        .ok_or_else(|| Error::DomError("Highlighted markup did not parse".to_string()))?;

    // Take the children out before `dom` is dropped; dropping a node empties
    // its descendants.
    let children = std::mem::take(&mut *code.children.borrow_mut());
    for child in &children {
        child.parent.set(None);
    }

    Ok(children)
}

/// Create an HTML element with attributes.
pub(crate) fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| new_attribute(name, value))
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub(crate) fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

fn new_attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.to_string().into(),
    }
}

/// Local name of an element node.
pub(crate) fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// All attributes of an element, in source order.
pub(crate) fn attributes(node: &Handle) -> Vec<(String, String)> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn get_attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Set an attribute, replacing an existing value.
pub(crate) fn set_attr(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            Some(attr) => attr.value = value.to_string().into(),
            None => attrs.push(new_attribute(name, value)),
        }
    }
}

pub(crate) fn remove_attr(node: &Handle, name: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        attrs.borrow_mut().retain(|attr| &*attr.name.local != name);
    }
}

pub(crate) fn has_class(node: &Handle, class: &str) -> bool {
    get_attr(node, "class").is_some_and(|value| value.split_whitespace().any(|c| c == class))
}

pub(crate) fn add_class(node: &Handle, class: &str) {
    let current = get_attr(node, "class").unwrap_or_default();
    if current.split_whitespace().any(|c| c == class) {
        return;
    }

    let updated = if current.trim().is_empty() {
        class.to_string()
    } else {
        format!("{} {}", current.trim_end(), class)
    };
    set_attr(node, "class", &updated);
}

pub(crate) fn remove_class(node: &Handle, class: &str) {
    let Some(current) = get_attr(node, "class") else {
        return;
    };

    let remaining: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
    if remaining.is_empty() {
        remove_attr(node, "class");
    } else {
        set_attr(node, "class", &remaining.join(" "));
    }
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, text: &mut String) {
    match &node.data {
        NodeData::Text { contents } => text.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, text);
            }
        }
    }
}

/// Whether any child is an element.
pub(crate) fn has_element_children(node: &Handle) -> bool {
    node.children
        .borrow()
        .iter()
        .any(|child| matches!(child.data, NodeData::Element { .. }))
}

pub(crate) fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

pub(crate) fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Replace all children of `parent`.
pub(crate) fn replace_children(parent: &Handle, children: Vec<Handle>) {
    let old = std::mem::take(&mut *parent.children.borrow_mut());
    for child in &old {
        child.parent.set(None);
    }
    for child in children {
        append_child(parent, child);
    }
}

/// Put `new` where `old` is in the tree. `old` ends up detached.
pub(crate) fn replace_node(old: &Handle, new: Handle) -> Result<()> {
    let parent = parent_of(old)
        .ok_or_else(|| Error::DomError("Element is no longer attached".to_string()))?;

    let mut children = parent.children.borrow_mut();
    let position = children
        .iter()
        .position(|child| Rc::ptr_eq(child, old))
        .ok_or_else(|| Error::DomError("Element not found under its parent".to_string()))?;

    new.parent.set(Some(Rc::downgrade(&parent)));
    old.parent.set(None);
    children[position] = new;
    Ok(())
}

/// How a tree walk treats a node.
pub(crate) enum Visit {
    /// Collect the node and do not look inside it.
    Take,
    /// Ignore the node and its subtree.
    Skip,
    /// Look at the node's children.
    Descend,
}

/// Collect nodes in document order.
pub(crate) fn select<F>(root: &Handle, visit: &mut F) -> Vec<Handle>
where
    F: FnMut(&Handle) -> Visit,
{
    let mut found = Vec::new();
    select_into(root, visit, &mut found);
    found
}

fn select_into<F>(node: &Handle, visit: &mut F, found: &mut Vec<Handle>)
where
    F: FnMut(&Handle) -> Visit,
{
    for child in node.children.borrow().iter() {
        match visit(child) {
            Visit::Take => found.push(child.clone()),
            Visit::Skip => {}
            Visit::Descend => select_into(child, visit, found),
        }
    }
}

fn child_element(node: &Handle, name: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| element_name(child) == Some(name))
        .cloned()
}

fn find_first(root: &Handle, name: &str) -> Option<Handle> {
    select(root, &mut |node| {
        if element_name(node) == Some(name) {
            Visit::Take
        } else {
            Visit::Descend
        }
    })
    .into_iter()
    .next()
}
