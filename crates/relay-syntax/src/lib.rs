//! Syntax layer: parses Rust source files with tree-sitter and lowers the item
//! subset relay needs into an owned AST.
//!
//! Parsing is exposed as a salsa query (`SyntaxDatabase::parse_file`) so that a file
//! is re-parsed only when its text changes. Parse failures never abort the query:
//! tree-sitter recovers, the recovered items are lowered, and the problems are
//! reported alongside them in `ParsedFile::errors`.

pub mod ast;
pub mod error;
pub mod lookup;
pub mod parser;

pub use error::SyntaxError;
pub use lookup::{FieldLocation, StructLocation};

use ast::Item;
use relay_source::{SourceDatabase, SourceFile};
use tree_sitter::{Parser, Tree};

/// Database trait for syntax analysis
#[salsa::db]
pub trait SyntaxDatabase: SourceDatabase {
    /// Parse a source file into its items, capturing any parse errors.
    fn parse_file(&self, file: SourceFile) -> triomphe::Arc<ParsedFile>
    where
        Self: Sized,
    {
        parse_file_query(self, file)
    }
}

/// The lowered items of one file together with the errors met while parsing it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFile {
    pub items: Vec<Item>,
    pub errors: Vec<SyntaxError>,
}

/// Parse a source file to produce a ParsedFile
#[salsa::tracked]
pub fn parse_file_query(db: &dyn SyntaxDatabase, file: SourceFile) -> triomphe::Arc<ParsedFile> {
    let text = file.text(db);
    log::trace!("parsing {}", file.path(db));
    let parsed = match RustParser::new() {
        Ok(mut parser) => {
            let (items, errors) = parser.parse_ast(text);
            ParsedFile { items, errors }
        }
        Err(err) => ParsedFile {
            items: Vec::new(),
            errors: vec![err],
        },
    };
    if !parsed.errors.is_empty() {
        log::debug!("{}: {} syntax error(s)", file.path(db), parsed.errors.len());
    }
    triomphe::Arc::new(parsed)
}

pub struct RustParser {
    parser: Parser,
}

impl RustParser {
    /// Create a parser for Rust source
    pub fn new() -> Result<Self, SyntaxError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|e| SyntaxError::ParserInitError(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse Rust source code and return the concrete syntax tree
    pub fn parse(&mut self, source: &str) -> Result<Tree, SyntaxError> {
        self.parser.parse(source, None).ok_or_else(|| SyntaxError::ParseError {
            message: "Failed to parse source code".to_string(),
            span: None,
        })
    }

    /// Parse source into AST
    pub fn parse_ast(&mut self, source: &str) -> (Vec<Item>, Vec<SyntaxError>) {
        match self.parse(source) {
            Ok(tree) => parser::parse_source_file(&tree.root_node(), source),
            Err(e) => (Vec::new(), vec![e]),
        }
    }
}

/// Test utilities for the syntax layer.
#[cfg(test)]
pub mod testing {
    use relay_source::SourceDatabase;

    use super::SyntaxDatabase;

    #[salsa::db]
    #[derive(Default, Clone)]
    pub struct TestDatabase {
        storage: salsa::Storage<Self>,
    }

    #[salsa::db]
    impl salsa::Database for TestDatabase {
        fn salsa_event(&self, event: &dyn Fn() -> salsa::Event) {
            event();
        }
    }

    #[salsa::db]
    impl SourceDatabase for TestDatabase {}

    #[salsa::db]
    impl SyntaxDatabase for TestDatabase {}
}

#[cfg(test)]
mod tests {
    use super::testing::TestDatabase;
    use super::*;
    use salsa::Setter;

    #[test]
    fn parse_file_recomputes_after_edit() {
        let mut db = TestDatabase::default();
        let file = SourceFile::new(&db, "lib.rs".to_string(), "struct A;".to_string());
        let first = db.parse_file(file);
        assert_eq!(first.items.len(), 1);

        file.set_text(&mut db).to("struct A; struct B;".to_string());
        let second = db.parse_file(file);
        assert_eq!(second.items.len(), 2);
    }

    #[test]
    fn broken_source_still_yields_items() {
        let db = TestDatabase::default();
        let file = SourceFile::new(
            &db,
            "lib.rs".to_string(),
            "struct A { x: u8 }\nfn broken( {\nstruct B;".to_string(),
        );
        let parsed = db.parse_file(file);
        assert!(!parsed.errors.is_empty());
        assert!(parsed
            .items
            .iter()
            .any(|item| matches!(&item.kind, ast::ItemKind::Struct(s) if s.name.text == "A")));
    }
}
