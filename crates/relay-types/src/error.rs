use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Problems met while lowering items into the def map. None of them stop lowering;
/// the offending type becomes opaque or the offending impl is dropped.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq, Hash)]
pub enum LowerError {
    #[error("Unresolved path `{path}` in {module}")]
    #[diagnostic(
        code(relay_types::unresolved_path),
        help("Check the `use` declarations of the module, or qualify the path")
    )]
    UnresolvedPath {
        path: String,
        module: String,
        #[label("not found in scope")]
        span: Option<SourceSpan>,
    },

    #[error("`{path}` names a {found}, expected a {expected}")]
    #[diagnostic(code(relay_types::wrong_namespace))]
    WrongKind {
        path: String,
        found: String,
        expected: String,
    },

    #[error("`{text}` is not a concrete type")]
    #[diagnostic(
        code(relay_types::not_a_type),
        help("Placeholders and unsupported type syntax cannot be resolved")
    )]
    NotAType { text: String },

    #[error("Impl of unresolved trait `{path}` is ignored")]
    #[diagnostic(code(relay_types::unresolved_trait_impl))]
    UnresolvedImplTrait { path: String, module: String },

    #[error("Duplicate definition of `{name}` in {module}")]
    #[diagnostic(code(relay_types::duplicate_definition))]
    DuplicateDefinition { name: String, module: String },
}

pub type LowerResult<T> = Result<T, LowerError>;
