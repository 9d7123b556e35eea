//! # Element Tree
//!
//! A page is a tree of [`Element`]s rooted at a single `__body` element.
//!
//! Child lists hold `Arc<Element>` so that history snapshots share every
//! subtree an edit did not touch. Writers go through [`Element::get_path_mut`],
//! which only copies the nodes along the path to the edited node.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Id of the root body element
pub const BODY_ID: &str = "__body";

/// Opaque, tree-unique element identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn body() -> Self {
        Self(BODY_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Closed set of element kinds the canvas knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    #[serde(rename = "__body")]
    Body,
    #[serde(rename = "container")]
    Container,
    #[serde(rename = "section")]
    Section,
    #[serde(rename = "2Col", alias = "twocolumns")]
    TwoColumns,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "contactForm")]
    ContactForm,
    #[serde(rename = "paymentForm")]
    PaymentForm,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Body,
        ElementKind::Container,
        ElementKind::Section,
        ElementKind::TwoColumns,
        ElementKind::Text,
        ElementKind::Link,
        ElementKind::Image,
        ElementKind::Video,
        ElementKind::ContactForm,
        ElementKind::PaymentForm,
    ];

    /// Wire tag, as stored in the page content blob
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Body => "__body",
            ElementKind::Container => "container",
            ElementKind::Section => "section",
            ElementKind::TwoColumns => "2Col",
            ElementKind::Text => "text",
            ElementKind::Link => "link",
            ElementKind::Image => "image",
            ElementKind::Video => "video",
            ElementKind::ContactForm => "contactForm",
            ElementKind::PaymentForm => "paymentForm",
        }
    }

    /// Whether `content` is a child list rather than a leaf payload
    pub fn holds_children(self) -> bool {
        matches!(
            self,
            ElementKind::Body
                | ElementKind::Container
                | ElementKind::Section
                | ElementKind::TwoColumns
        )
    }

    /// Number of fixed column slots, for kinds whose children are slots
    pub fn column_slots(self) -> Option<usize> {
        match self {
            ElementKind::TwoColumns => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form style properties (CSS property name -> value)
pub type Styles = BTreeMap<String, Value>;

/// Payload of a non-container element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// Keys this engine does not interpret, kept so a load/save cycle is lossless
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LeafContent {
    pub fn text(inner_text: impl Into<String>) -> Self {
        Self {
            inner_text: Some(inner_text.into()),
            ..Self::default()
        }
    }
}

/// Element content: child list for containers, payload for leaves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "RawContent")]
pub enum Content {
    Children(Vec<Arc<Element>>),
    Leaf(LeafContent),
}

/// Accepted wire shapes for `content`. A bare string is shorthand for text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Children(Vec<Arc<Element>>),
    Leaf(LeafContent),
    Text(String),
}

impl From<RawContent> for Content {
    fn from(raw: RawContent) -> Self {
        match raw {
            RawContent::Children(children) => Content::Children(children),
            RawContent::Leaf(leaf) => Content::Leaf(leaf),
            RawContent::Text(text) => Content::Leaf(LeafContent::text(text)),
        }
    }
}

impl Content {
    pub fn is_children(&self) -> bool {
        matches!(self, Content::Children(_))
    }
}

/// A node in the page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub styles: Styles,

    pub content: Content,
}

impl Element {
    /// Empty page root
    pub fn body() -> Self {
        Self {
            id: ElementId::body(),
            kind: ElementKind::Body,
            name: Some("Body".to_string()),
            styles: Styles::new(),
            content: Content::Children(Vec::new()),
        }
    }

    /// New element of `kind` with empty content of the matching shape
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        let content = if kind.holds_children() {
            Content::Children(Vec::new())
        } else {
            Content::Leaf(LeafContent::default())
        };

        Self {
            id: id.into(),
            kind,
            name: None,
            styles: Styles::new(),
            content,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    pub fn with_leaf(mut self, leaf: LeafContent) -> Self {
        self.content = Content::Leaf(leaf);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        if let Content::Children(children) = &mut self.content {
            children.push(Arc::new(child));
        }
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind.holds_children()
    }

    /// Hidden through the layers panel visibility toggle
    pub fn is_hidden(&self) -> bool {
        self.styles
            .get("display")
            .and_then(Value::as_str)
            .is_some_and(|display| display == "none")
    }

    pub fn children(&self) -> Option<&[Arc<Element>]> {
        match &self.content {
            Content::Children(children) => Some(children),
            Content::Leaf(_) => None,
        }
    }

    /// Mutable child list. Shared children stay shared until written through.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Arc<Element>>> {
        match &mut self.content {
            Content::Children(children) => Some(children),
            Content::Leaf(_) => None,
        }
    }

    pub fn leaf(&self) -> Option<&LeafContent> {
        match &self.content {
            Content::Leaf(leaf) => Some(leaf),
            Content::Children(_) => None,
        }
    }

    /// Find an element by id anywhere in this subtree (including `self`).
    ///
    /// Column slots of two-column containers are ordinary children, so they
    /// are searched like any other child list.
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_str() == id {
            return Some(self);
        }

        self.children()?
            .iter()
            .find_map(|child| child.find(id))
    }

    /// Find the container holding `id`, with the index of `id` in its child list
    pub fn find_parent(&self, id: &str) -> Option<(&Element, usize)> {
        let children = self.children()?;

        if let Some(index) = children.iter().position(|c| c.id.as_str() == id) {
            return Some((self, index));
        }

        children.iter().find_map(|child| child.find_parent(id))
    }

    /// Whether `id` names a strict descendant of this element
    pub fn has_descendant(&self, id: &str) -> bool {
        self.children()
            .is_some_and(|children| children.iter().any(|c| c.find(id).is_some()))
    }

    /// Child-index path from `self` to the element with `id`.
    /// The path to `self` is empty.
    pub fn path_to(&self, id: &str) -> Option<Vec<usize>> {
        if self.id.as_str() == id {
            return Some(Vec::new());
        }

        for (index, child) in self.children()?.iter().enumerate() {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, index);
                return Some(path);
            }
        }

        None
    }

    /// Mutable access to the node at `path`, copying shared nodes on the way down
    pub fn get_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut node = self;
        for &index in path {
            let child = node.children_mut()?.get_mut(index)?;
            node = Arc::make_mut(child);
        }
        Some(node)
    }

    /// Mutable access to the element with `id`, copying only its ancestors
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        let path = self.path_to(id)?;
        self.get_path_mut(&path)
    }

    /// Number of elements in this subtree, `self` included
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.iter().map(|c| c.node_count()).sum::<usize>())
            .unwrap_or(0)
    }
}

/// Find an element by id in a page tree
pub fn find_by_id<'a>(tree: &'a Element, id: &str) -> Option<&'a Element> {
    tree.find(id)
}

/// Find the container owning `id` and its position there
pub fn find_parent_of<'a>(tree: &'a Element, id: &str) -> Option<(&'a Element, usize)> {
    tree.find_parent(id)
}
