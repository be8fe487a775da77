pub mod walk;

use std::fmt;
use std::ops::Range;

use crate::document::walk::Walk;

/// Index of a node inside its owning [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// The kind of a document node.
///
/// Container types own children; every other type is a leaf whose content
/// lives in [`Node::literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    BlockQuote,
    List,
    Item,
    Paragraph,
    Heading,
    HorizontalRule,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    Text,
    HtmlBlock,
    CodeBlock,
    SoftBreak,
    HardBreak,
    Code,
    HtmlSpan,
    Table,
    TableHead,
    TableRow,
    TableCell,
    /// Any other tagged container (footnotes, definition lists, metadata).
    Other,
}

impl NodeType {
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeType::Document
                | NodeType::BlockQuote
                | NodeType::List
                | NodeType::Item
                | NodeType::Paragraph
                | NodeType::Heading
                | NodeType::Emphasis
                | NodeType::Strong
                | NodeType::Strikethrough
                | NodeType::Link
                | NodeType::Image
                | NodeType::Table
                | NodeType::TableHead
                | NodeType::TableRow
                | NodeType::TableCell
                | NodeType::Other
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single node of the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: NodeType,
    /// Raw text payload. Empty for containers.
    pub literal: String,
    /// Heading level (1-6); zero for every other node type.
    pub level: u8,
    /// Info string of a fenced code block.
    pub info: Option<String>,
    /// Byte span in the source text.
    pub span: Range<usize>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Index of this node within its parent's children.
    position: usize,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        !self.node_type.is_container()
    }
}

/// An immutable document tree stored as an arena.
///
/// Children are kept in order on their parent, so sibling navigation is
/// position arithmetic rather than stored back-links.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// A document holding only its root node.
    pub fn empty(source_len: usize) -> Self {
        Document {
            nodes: vec![Node {
                node_type: NodeType::Document,
                literal: String::new(),
                level: 0,
                info: None,
                span: 0..source_len,
                parent: None,
                children: Vec::new(),
                position: 0,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id.0].node_type
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id.0];
        let parent = node.parent?;
        let position = node.position.checked_sub(1)?;
        self.children(parent).get(position).copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id.0];
        let parent = node.parent?;
        self.children(parent).get(node.position + 1).copied()
    }

    /// Preceding siblings of `id`, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.prev_sibling(id), move |&sibling| {
            self.prev_sibling(sibling)
        })
    }

    /// Pre-order walk over the subtree rooted at `id`.
    pub fn walk(&self, id: NodeId) -> Walk<'_> {
        Walk::new(self, id)
    }

    /// Append a new node as the last child of `parent`.
    pub(crate) fn push(
        &mut self,
        parent: NodeId,
        node_type: NodeType,
        literal: String,
        span: Range<usize>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let position = self.nodes[parent.0].children.len();
        self.nodes.push(Node {
            node_type,
            literal,
            level: 0,
            info: None,
            span,
            parent: Some(parent),
            children: Vec::new(),
            position,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::empty(10);
        let root = doc.root();
        let heading = doc.push(root, NodeType::Heading, String::new(), 0..3);
        let text = doc.push(heading, NodeType::Text, "a:".to_string(), 2..3);
        let code = doc.push(root, NodeType::CodeBlock, "x\n".to_string(), 4..10);
        (doc, heading, text, code)
    }

    #[test]
    fn sibling_navigation() {
        let (doc, heading, _, code) = sample();
        assert_eq!(doc.prev_sibling(code), Some(heading));
        assert_eq!(doc.next_sibling(heading), Some(code));
        assert_eq!(doc.prev_sibling(heading), None);
        assert_eq!(doc.next_sibling(code), None);
        assert_eq!(doc.prev_sibling(doc.root()), None);
    }

    #[test]
    fn child_navigation() {
        let (doc, heading, text, code) = sample();
        assert_eq!(doc.first_child(doc.root()), Some(heading));
        assert_eq!(doc.last_child(doc.root()), Some(code));
        assert_eq!(doc.last_child(heading), Some(text));
        assert_eq!(doc.parent(text), Some(heading));
        assert_eq!(doc.first_child(code), None);
    }

    #[test]
    fn preceding_siblings_nearest_first() {
        let mut doc = Document::empty(0);
        let root = doc.root();
        let a = doc.push(root, NodeType::Paragraph, String::new(), 0..0);
        let b = doc.push(root, NodeType::Heading, String::new(), 0..0);
        let c = doc.push(root, NodeType::CodeBlock, String::new(), 0..0);
        let found: Vec<NodeId> = doc.preceding_siblings(c).collect();
        assert_eq!(found, vec![b, a]);
    }

    #[test]
    fn empty_document_still_has_its_root() {
        let doc = Document::empty(0);
        assert!(doc.is_empty());
        assert_eq!(doc.node_count(), 1);

        let (doc, ..) = sample();
        assert!(!doc.is_empty());
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn leaf_classification() {
        let (doc, heading, text, code) = sample();
        assert!(!doc.node(heading).is_leaf());
        assert!(doc.node(text).is_leaf());
        assert!(doc.node(code).is_leaf());
        assert!(!doc.node(doc.root()).is_leaf());
    }
}
