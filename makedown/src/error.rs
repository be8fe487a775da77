use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// Errors raised while generating a Makefile from a document.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Concatenating the text of a block quote's leaves failed.
    #[error("error during concatenating leaf nodes of block quote")]
    LeafText {
        /// Byte span of the block quote in the source.
        span: Range<usize>,
        #[source]
        source: fmt::Error,
    },

    /// The output sink rejected a write.
    #[error("failed to write Makefile output")]
    Write(#[from] fmt::Error),
}

impl GenerateError {
    /// Source span the error points at, when it has one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            GenerateError::LeafText { span, .. } => Some(span.clone()),
            GenerateError::Write(_) => None,
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(self.to_string());
        match self.span() {
            Some(span) => diagnostic
                .with_labels(vec![Label::primary(file_id, span)
                    .with_message("prerequisite block starts here")]),
            None => diagnostic,
        }
    }
}
