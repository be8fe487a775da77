pub mod document;
pub mod parser;

pub use document::walk::Walk;
pub use document::{Document, Node, NodeId, NodeType};
pub use parser::parse;
