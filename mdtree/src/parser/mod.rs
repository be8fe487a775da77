mod structural;

use crate::document::Document;

/// Parse Markdown source text into a document tree.
///
/// Parsing never fails: any input yields a tree, possibly holding only
/// paragraphs of text.
pub fn parse(source: &str) -> Document {
    Parser::new(source).parse()
}

/// Parser entry point.
pub struct Parser<'a> {
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser { source }
    }

    pub fn parse(&self) -> Document {
        let doc = structural::build_tree(self.source);
        tracing::trace!(nodes = doc.node_count(), "parsed document tree");
        doc
    }
}
