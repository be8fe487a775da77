use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag};

use crate::document::{Document, NodeId, NodeType};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build a document tree from Markdown source text.
pub fn build_tree(source: &str) -> Document {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = CmarkParser::new_ext(source, options);

    let mut state = TreeState::new(source.len());
    for (event, range) in parser.into_offset_iter() {
        state.process_event(event, range);
    }
    state.finalize()
}

// ---------------------------------------------------------------------------
// Tree state
// ---------------------------------------------------------------------------

struct TreeState {
    doc: Document,
    /// Open containers. Innermost = current parent.
    open: Vec<NodeId>,
    /// The Text node the previous event produced, if any. Adjacent text
    /// events are merged into it.
    last_text: Option<NodeId>,
}

impl TreeState {
    fn new(source_len: usize) -> Self {
        let doc = Document::empty(source_len);
        let root = doc.root();
        TreeState {
            doc,
            open: vec![root],
            last_text: None,
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    /// Whether text events should be folded into the current node's literal
    /// rather than becoming children (code blocks, HTML blocks).
    fn in_literal_block(&self) -> bool {
        matches!(
            self.doc.node_type(self.current()),
            NodeType::CodeBlock | NodeType::HtmlBlock
        )
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        let is_text = matches!(event, Event::Text(_));

        match event {
            Event::Start(tag) => self.open_tag(tag, range),

            Event::End(_) => {
                // The root stays open until finalize.
                if self.open.len() > 1 {
                    self.open.pop();
                }
            }

            Event::Text(text) => {
                if self.in_literal_block() {
                    self.append_literal(self.current(), &text, range);
                } else if let Some(id) = self.last_text {
                    self.append_literal(id, &text, range);
                } else {
                    let id = self.leaf(NodeType::Text, text.to_string(), range);
                    self.last_text = Some(id);
                }
            }

            Event::Html(html) => {
                if self.in_literal_block() {
                    self.append_literal(self.current(), &html, range);
                } else {
                    self.leaf(NodeType::HtmlSpan, html.to_string(), range);
                }
            }

            Event::InlineHtml(html) => {
                self.leaf(NodeType::HtmlSpan, html.to_string(), range);
            }

            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.leaf(NodeType::Code, code.to_string(), range);
            }

            Event::SoftBreak => {
                self.leaf(NodeType::SoftBreak, "\n".to_string(), range);
            }

            Event::HardBreak => {
                self.leaf(NodeType::HardBreak, "\n".to_string(), range);
            }

            Event::Rule => {
                self.leaf(NodeType::HorizontalRule, String::new(), range);
            }

            // Footnote references and task markers carry no build semantics.
            _ => {}
        }

        if !is_text {
            self.last_text = None;
        }
    }

    fn open_tag(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let parent = self.current();

        let id = match tag {
            Tag::Heading { level, .. } => {
                let id = self.doc.push(parent, NodeType::Heading, String::new(), range);
                self.doc.node_mut(id).level = heading_level_to_u8(level);
                id
            }
            Tag::CodeBlock(kind) => {
                let id = self.doc.push(parent, NodeType::CodeBlock, String::new(), range);
                if let CodeBlockKind::Fenced(info) = kind {
                    if !info.is_empty() {
                        self.doc.node_mut(id).info = Some(info.to_string());
                    }
                }
                id
            }
            other => self.doc.push(parent, tag_node_type(&other), String::new(), range),
        };

        self.open.push(id);
    }

    fn leaf(&mut self, node_type: NodeType, literal: String, range: Range<usize>) -> NodeId {
        let parent = self.current();
        self.doc.push(parent, node_type, literal, range)
    }

    fn append_literal(&mut self, id: NodeId, text: &str, range: Range<usize>) {
        let node = self.doc.node_mut(id);
        node.literal.push_str(text);
        node.span.end = node.span.end.max(range.end);
    }

    fn finalize(self) -> Document {
        self.doc
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn tag_node_type(tag: &Tag<'_>) -> NodeType {
    match tag {
        Tag::Paragraph => NodeType::Paragraph,
        Tag::Heading { .. } => NodeType::Heading,
        Tag::BlockQuote(_) => NodeType::BlockQuote,
        Tag::CodeBlock(_) => NodeType::CodeBlock,
        Tag::HtmlBlock => NodeType::HtmlBlock,
        Tag::List(_) => NodeType::List,
        Tag::Item => NodeType::Item,
        Tag::Table(_) => NodeType::Table,
        Tag::TableHead => NodeType::TableHead,
        Tag::TableRow => NodeType::TableRow,
        Tag::TableCell => NodeType::TableCell,
        Tag::Emphasis => NodeType::Emphasis,
        Tag::Strong => NodeType::Strong,
        Tag::Strikethrough => NodeType::Strikethrough,
        Tag::Link { .. } => NodeType::Link,
        Tag::Image { .. } => NodeType::Image,
        _ => NodeType::Other,
    }
}
