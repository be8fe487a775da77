use std::fmt::Write;

use mdtree::{Document, NodeId};
use tracing::debug;

use crate::error::GenerateError;
use crate::format::{indent_recipe, write_footer};
use crate::matcher::{prerequisite_block_with, recipe_block};
use crate::reserved::ReservedSection;

/// A generated Makefile together with the targets it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Makefile {
    pub text: String,
    /// Declared targets, colon included, in document order.
    pub targets: Vec<String>,
}

/// Generate a Makefile from raw Markdown bytes.
///
/// `source_name` only appears in the trailing comment. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn generate_from_markdown(source_name: &str, input: &[u8]) -> Result<Makefile, GenerateError> {
    let source = String::from_utf8_lossy(input);
    let doc = mdtree::parse(&source);

    let mut text = String::new();
    let targets = emit(&doc, &mut text)?;
    write_footer(&mut text, source_name)?;

    Ok(Makefile { text, targets })
}

/// Walk the whole document once, writing Makefile text to `out`.
///
/// Returns the targets declared along the way. The first failing node stops
/// the walk.
pub fn emit<W: Write>(doc: &Document, out: &mut W) -> Result<Vec<String>, GenerateError> {
    emit_with::<String, W>(doc, out)
}

/// [`emit`], concatenating block quote text into buffers of type `S`.
pub fn emit_with<S, W>(doc: &Document, out: &mut W) -> Result<Vec<String>, GenerateError>
where
    S: Write + AsRef<str> + Default,
    W: Write,
{
    let mut targets = Vec::new();
    for (node, entering) in doc.walk(doc.root()) {
        if entering {
            visit::<S, W>(doc, node, out, &mut targets)?;
        }
    }
    Ok(targets)
}

fn visit<S, W>(
    doc: &Document,
    node: NodeId,
    out: &mut W,
    targets: &mut Vec<String>,
) -> Result<(), GenerateError>
where
    S: Write + AsRef<str> + Default,
    W: Write,
{
    // target: prerequisites
    if let Some(prerequisites) = prerequisite_block_with::<S>(doc, node)? {
        writeln!(out, "{}{}", prerequisites.target, prerequisites.text)?;
    }

    // target:
    // <tab>recipe
    if let Some(block) = recipe_block(doc, node) {
        if let Some(section) = ReservedSection::from_target(block.target) {
            debug!(?section, "pass-through section");
            writeln!(out, "{}", block.recipe)?;
        } else {
            if block.first {
                debug!(rule = block.target, "target");
                targets.push(block.target.to_string());
                writeln!(out, "{}", block.target)?;
            }
            out.write_str(&indent_recipe(block.recipe))?;
        }
    }

    Ok(())
}
