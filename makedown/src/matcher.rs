//! Structural matchers over a document tree.
//!
//! Each matcher inspects one node, plus its preceding siblings where needed,
//! and reports whether the node carries build semantics:
//!
//! - a heading whose last text run ends in `:` names a target,
//! - a block quote whose text starts with `:` lists that target's
//!   prerequisites,
//! - a code block after such a heading holds recipe lines.

use std::fmt::{self, Write};

use mdtree::{Document, NodeId, NodeType};
use tracing::debug;

use crate::error::GenerateError;

/// A block quote that lists prerequisites for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisites<'a> {
    /// The governing target, colon included.
    pub target: &'a str,
    /// Quote text with its leading colon removed.
    pub text: String,
}

/// A code block holding recipe lines for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeBlock<'a> {
    /// The governing target, colon included.
    pub target: &'a str,
    /// Whether no other code block sits between this one and its heading.
    pub first: bool,
    /// Raw code block payload.
    pub recipe: &'a str,
}

/// Return the target name if `id` is a heading whose last child ends in `:`.
pub fn target_heading(doc: &Document, id: NodeId) -> Option<&str> {
    if doc.node_type(id) != NodeType::Heading {
        return None;
    }
    let last = doc.last_child(id)?;
    let literal = doc.node(last).literal.as_str();
    literal.ends_with(':').then_some(literal)
}

/// Find the nearest preceding sibling of the given type.
pub fn find_prev_sibling(doc: &Document, id: NodeId, node_type: NodeType) -> Option<NodeId> {
    doc.preceding_siblings(id)
        .find(|&sibling| doc.node_type(sibling) == node_type)
}

/// Find the nearest preceding sibling of the given type, giving up as soon as
/// a sibling of type `stop` is met.
pub fn find_prev_sibling_before(
    doc: &Document,
    id: NodeId,
    node_type: NodeType,
    stop: NodeType,
) -> Option<NodeId> {
    for sibling in doc.preceding_siblings(id) {
        let sibling_type = doc.node_type(sibling);
        if sibling_type == stop {
            return None;
        }
        if sibling_type == node_type {
            return Some(sibling);
        }
    }
    None
}

/// Resolve the target named by the nearest preceding heading.
///
/// Returns `None` when there is no preceding heading or when the nearest one
/// does not end in `:`; the node is then ordinary prose.
pub fn governing_target(doc: &Document, id: NodeId) -> Option<&str> {
    let heading = find_prev_sibling(doc, id, NodeType::Heading)?;
    target_heading(doc, heading)
}

/// Write the literals of every leaf under `id`, in document order.
pub fn concat_leaf_text<W: Write>(doc: &Document, id: NodeId, out: &mut W) -> fmt::Result {
    for (node, entering) in doc.walk(id) {
        if entering && doc.node(node).is_leaf() {
            out.write_str(&doc.node(node).literal)?;
        }
    }
    Ok(())
}

/// Match a block quote of the form `> : prerequisites` under a target heading.
pub fn prerequisite_block(
    doc: &Document,
    id: NodeId,
) -> Result<Option<Prerequisites<'_>>, GenerateError> {
    prerequisite_block_with::<String>(doc, id)
}

/// [`prerequisite_block`], collecting the quote text in a fresh `S`.
pub fn prerequisite_block_with<S>(
    doc: &Document,
    id: NodeId,
) -> Result<Option<Prerequisites<'_>>, GenerateError>
where
    S: Write + AsRef<str> + Default,
{
    if doc.node_type(id) != NodeType::BlockQuote {
        return Ok(None);
    }

    let mut buffer = S::default();
    concat_leaf_text(doc, id, &mut buffer).map_err(|source| GenerateError::LeafText {
        span: doc.node(id).span.clone(),
        source,
    })?;
    let quoted = buffer.as_ref();
    debug!(text = %quoted, "block quote");

    let Some(text) = quoted.strip_prefix(':') else {
        return Ok(None);
    };
    let Some(target) = governing_target(doc, id) else {
        return Ok(None);
    };
    debug!(rule = target, prerequisites = %text, "prerequisites");

    Ok(Some(Prerequisites {
        target,
        text: text.to_string(),
    }))
}

/// Match a code block under a target heading.
pub fn recipe_block(doc: &Document, id: NodeId) -> Option<RecipeBlock<'_>> {
    if doc.node_type(id) != NodeType::CodeBlock {
        return None;
    }
    let target = governing_target(doc, id)?;
    let first =
        find_prev_sibling_before(doc, id, NodeType::CodeBlock, NodeType::Heading).is_none();
    Some(RecipeBlock {
        target,
        first,
        recipe: &doc.node(id).literal,
    })
}
