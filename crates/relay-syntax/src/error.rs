use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq, Hash)]
pub enum SyntaxError {
    #[error("Parser initialization error: {0}")]
    #[diagnostic(code(relay_syntax::parser_init))]
    ParserInitError(String),

    #[error("Parse error: {message}")]
    #[diagnostic(code(relay_syntax::parse_error))]
    ParseError {
        message: String,
        #[label("error occurred here")]
        span: Option<SourceSpan>,
    },

    #[error("Node error in {node_type}: {message}")]
    #[diagnostic(code(relay_syntax::node_error))]
    NodeError {
        message: String,
        #[label("in this node")]
        span: Option<SourceSpan>,
        node_type: String,
    },

    #[error("Syntax error: {message}")]
    #[diagnostic(
        code(relay_syntax::syntax_error),
        help("The surrounding item is still analyzed; fix the marked code for precise results")
    )]
    SyntaxError {
        message: String,
        #[label("error occurred here")]
        span: Option<SourceSpan>,
    },
}
