//! Mutable HTML documents
//!
//! Pages are parsed into a scraper [`Html`], whose `ego_tree` arena is
//! mutated in place: selections are collected as [`NodeId`]s first, then
//! each node is detached, rewritten or given new siblings through the tree.

pub mod extract;
pub mod transform;

use ego_tree::NodeId;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Comment, Element};
use scraper::{ElementRef, Html, Node, Selector};

pub use extract::IndexExtractor;
pub use transform::DomTransformer;

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// An HTML page open for rewriting
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document
    ///
    /// html5ever recovers from any malformed input, so parsing cannot fail.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Elements still reachable from the document root, in document order
    ///
    /// `Html::select` also visits detached nodes.
    fn attached_elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Returns the ids of all elements matching `selector`, in document order
    pub fn select_ids(&self, selector: &Selector) -> Vec<NodeId> {
        self.attached_elements()
            .filter(|element| selector.matches(element))
            .map(|element| element.id())
            .collect()
    }

    /// Returns the id of the first element matching `selector`
    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.attached_elements()
            .find(|element| selector.matches(element))
            .map(|element| element.id())
    }

    /// Returns the ids of all elements carrying attribute `name`
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.attached_elements()
            .filter(|element| element.value().attr(name).is_some())
            .map(|element| element.id())
            .collect()
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Returns the lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.value().name())
    }

    /// Returns the value of an attribute of an element
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.value().attr(name))
    }

    /// Returns the trimmed concatenation of all descendant text
    pub fn text(&self, id: NodeId) -> String {
        self.element(id)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Returns false once a node has been detached from the document
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.html.tree.root().id();
        let Some(node) = self.html.tree.get(id) else {
            return false;
        };
        node.ancestors().any(|ancestor| ancestor.id() == root)
    }

    /// Detaches a node (and its subtree) from the document
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Sets an attribute, overwriting an existing value in place or
    /// appending a new attribute
    ///
    /// The element is rebuilt so its cached `id` and `class` stay in sync
    /// with the attribute list.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return;
        };
        let Node::Element(element) = node.value() else {
            return;
        };

        let mut found = false;
        let mut attrs: Vec<Attribute> = element
            .attrs
            .iter()
            .map(|(qual, current)| {
                if &*qual.local == name {
                    found = true;
                    Attribute {
                        name: qual.clone(),
                        value: value.into(),
                    }
                } else {
                    Attribute {
                        name: qual.clone(),
                        value: current.clone(),
                    }
                }
            })
            .collect();
        if !found {
            attrs.push(Attribute {
                name: attr_name(name),
                value: value.into(),
            });
        }

        let rebuilt = Element::new(element.name.clone(), attrs);
        *node.value() = Node::Element(rebuilt);
    }

    /// Inserts a new node as the previous sibling of `id`
    pub fn insert_before(&mut self, id: NodeId, new: Node) -> Option<NodeId> {
        let mut node = self.html.tree.get_mut(id)?;
        Some(node.insert_before(new).id())
    }

    /// Inserts a new node as the first child of `id`
    pub fn prepend_child(&mut self, id: NodeId, new: Node) -> Option<NodeId> {
        let mut node = self.html.tree.get_mut(id)?;
        Some(node.prepend(new).id())
    }

    /// Inserts a new node as the last child of `id`
    pub fn append_child(&mut self, id: NodeId, new: Node) -> Option<NodeId> {
        let mut node = self.html.tree.get_mut(id)?;
        Some(node.append(new).id())
    }

    /// Serializes the document back to HTML
    pub fn html(&self) -> String {
        self.html.html()
    }
}

/// Builds an HTML element node with the given attributes
pub fn new_element(tag: &str, attrs: &[(&str, &str)]) -> Node {
    let name = QualName::new(
        None,
        Namespace::from(XHTML_NAMESPACE),
        LocalName::from(tag),
    );
    let attrs = attrs
        .iter()
        .map(|(key, value)| Attribute {
            name: attr_name(key),
            value: (*value).into(),
        })
        .collect();
    Node::Element(Element::new(name, attrs))
}

/// Builds a comment node
pub fn new_comment(text: &str) -> Node {
    Node::Comment(Comment {
        comment: text.into(),
    })
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}
