//! Lowering from the tree-sitter concrete syntax tree into the owned `ast`.

pub mod common;
pub mod generics;
pub mod items;
pub mod types;

use tree_sitter::Node;

use crate::ast::Item;
use crate::error::SyntaxError;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Lower a `source_file` node into items, collecting recoverable errors.
pub fn parse_source_file(root: &Node, source: &str) -> (Vec<Item>, Vec<SyntaxError>) {
    let mut errors = Vec::new();
    common::collect_ts_errors(root, source, &mut errors);
    let items = items::parse_items(root, source, &mut errors);
    (items, errors)
}
