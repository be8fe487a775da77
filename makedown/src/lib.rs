//! Turn Markdown documents into Makefiles.
//!
//! A heading ending in `:` names a target, a block quote starting with `:`
//! lists its prerequisites, and the fenced code blocks under the heading are
//! its recipe.

pub mod emit;
pub mod error;
pub mod format;
pub mod matcher;
pub mod reserved;

pub use emit::{Makefile, emit, emit_with, generate_from_markdown};
pub use error::GenerateError;
pub use reserved::ReservedSection;
