use crate::document::{Document, NodeId};

/// Pre-order traversal yielding `(node, entering)` pairs.
///
/// Containers are reported on entry and on exit, leaves only on entry.
/// The walk ends after leaving the node it was started from.
pub struct Walk<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<(NodeId, bool)>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(doc: &'a Document, root: NodeId) -> Self {
        Walk {
            doc,
            root,
            next: Some((root, true)),
        }
    }

    fn advance(&self, node: NodeId, entering: bool) -> Option<(NodeId, bool)> {
        if entering && !self.doc.node(node).is_leaf() {
            return Some(match self.doc.first_child(node) {
                Some(child) => (child, true),
                None => (node, false),
            });
        }
        if node == self.root {
            return None;
        }
        match self.doc.next_sibling(node) {
            Some(sibling) => Some((sibling, true)),
            None => self.doc.parent(node).map(|parent| (parent, false)),
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = (NodeId, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, entering) = self.next.take()?;
        self.next = self.advance(node, entering);
        Some((node, entering))
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, NodeType};

    #[test]
    fn visits_containers_twice_and_leaves_once() {
        let mut doc = Document::empty(0);
        let root = doc.root();
        let quote = doc.push(root, NodeType::BlockQuote, String::new(), 0..0);
        let para = doc.push(quote, NodeType::Paragraph, String::new(), 0..0);
        let text = doc.push(para, NodeType::Text, ": a".to_string(), 0..0);
        let rule = doc.push(root, NodeType::HorizontalRule, String::new(), 0..0);

        let steps: Vec<_> = doc.walk(root).collect();
        assert_eq!(
            steps,
            vec![
                (root, true),
                (quote, true),
                (para, true),
                (text, true),
                (para, false),
                (quote, false),
                (rule, true),
                (root, false),
            ]
        );
    }

    #[test]
    fn subtree_walk_stops_at_its_root() {
        let mut doc = Document::empty(0);
        let root = doc.root();
        let quote = doc.push(root, NodeType::BlockQuote, String::new(), 0..0);
        let para = doc.push(quote, NodeType::Paragraph, String::new(), 0..0);
        doc.push(root, NodeType::Paragraph, String::new(), 0..0);

        let steps: Vec<_> = doc.walk(quote).collect();
        assert_eq!(
            steps,
            vec![(quote, true), (para, true), (para, false), (quote, false)]
        );
    }

    #[test]
    fn leaf_root_yields_once() {
        let mut doc = Document::empty(0);
        let root = doc.root();
        let code = doc.push(root, NodeType::CodeBlock, "x".to_string(), 0..0);
        doc.push(root, NodeType::CodeBlock, "y".to_string(), 0..0);

        let steps: Vec<_> = doc.walk(code).collect();
        assert_eq!(steps, vec![(code, true)]);
    }

    #[test]
    fn empty_document() {
        let doc = Document::empty(0);
        let steps: Vec<_> = doc.walk(doc.root()).collect();
        assert_eq!(steps, vec![(doc.root(), true), (doc.root(), false)]);
    }
}
