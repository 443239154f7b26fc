use miette::Diagnostic;
use relay_source::Stale;
use thiserror::Error;

/// Reasons a delegate run stops without emitting anything.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum AbortReason {
    #[error("No struct field at the requested position")]
    #[diagnostic(
        code("ASSIST-ABORT-001"),
        help("Put the cursor on a field declaration, or name it as `Struct.field`")
    )]
    NoFieldUnderCursor,

    #[error("Type `{ty}` of field `{field}` could not be resolved")]
    #[diagnostic(
        code("ASSIST-ABORT-002"),
        help("Only fields with a fully named type can be delegated to; check imports and placeholders")
    )]
    UnresolvedFieldType { field: String, ty: String },

    #[error("Nothing to delegate from `{composite}` to `{ty}`")]
    #[diagnostic(code("ASSIST-ABORT-003"))]
    NoDelegatableInterfaces {
        composite: String,
        ty: String,
        #[related]
        exclusions: Vec<ExclusionReason>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    SnapshotStale(#[from] Stale),
}

/// Why one candidate trait was left out of an otherwise successful run.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum ExclusionReason {
    #[error("`{trait_name}` is already implemented for `{composite}`")]
    #[diagnostic(code("ASSIST-EXCL-001"), severity(Advice))]
    AlreadyImplemented { trait_name: String, composite: String },

    #[error("`{trait_name}::{method}` takes `self` by value, which cannot move the field out of `{composite}`")]
    #[diagnostic(
        code("ASSIST-EXCL-002"),
        severity(Warning),
        help("A struct implementing `Drop`, or a method that also borrows `Self`, prevents moving a field out")
    )]
    PartialMoveError {
        trait_name: String,
        method: String,
        composite: String,
    },

    #[error("`{trait_name}` has {count} direct implementations with the same arguments")]
    #[diagnostic(code("ASSIST-EXCL-003"), severity(Warning))]
    AmbiguousImplementationError { trait_name: String, count: usize },

    #[error("`{trait_name}::{method}` cannot be forwarded")]
    #[diagnostic(
        code("ASSIST-EXCL-004"),
        severity(Warning),
        help("Methods without a receiver, or mentioning `Self` outside the receiver, have no field to forward to")
    )]
    UndelegatableMethod { trait_name: String, method: String },

    #[error("`{trait_name}` requires `{supertrait}`, which `{composite}` does not implement")]
    #[diagnostic(
        code("ASSIST-EXCL-005"),
        severity(Warning),
        help("Generate or write the supertrait impl as well")
    )]
    UnsatisfiedSupertrait {
        trait_name: String,
        supertrait: String,
        composite: String,
    },

    #[error("`{ty}` does not implement `{trait_name}`")]
    #[diagnostic(code("ASSIST-EXCL-006"), severity(Warning))]
    NotImplementedByField { trait_name: String, ty: String },

    #[error("`{trait_name}` borrows `{field}` as `{assoc}`, but `{assoc}` is `{bound}` and the field is `{field_ty}`")]
    #[diagnostic(
        code("ASSIST-EXCL-008"),
        severity(Warning),
        help("Bind `{assoc}` to the field type, or to the field type's own `Deref::Target`")
    )]
    BorrowMismatch {
        trait_name: String,
        assoc: String,
        bound: String,
        field: String,
        field_ty: String,
    },

    #[error("`{trait_name}` is listed in `assist.skip_traits`")]
    #[diagnostic(code("ASSIST-EXCL-007"), severity(Advice))]
    Skipped { trait_name: String },
}

impl ExclusionReason {
    pub fn trait_name(&self) -> &str {
        match self {
            ExclusionReason::AlreadyImplemented { trait_name, .. }
            | ExclusionReason::PartialMoveError { trait_name, .. }
            | ExclusionReason::AmbiguousImplementationError { trait_name, .. }
            | ExclusionReason::UndelegatableMethod { trait_name, .. }
            | ExclusionReason::UnsatisfiedSupertrait { trait_name, .. }
            | ExclusionReason::NotImplementedByField { trait_name, .. }
            | ExclusionReason::BorrowMismatch { trait_name, .. }
            | ExclusionReason::Skipped { trait_name } => trait_name,
        }
    }
}

/// Reasons `expand_struct_field` does not apply.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum ExpandError {
    #[error("No named struct field at the requested position")]
    #[diagnostic(code("ASSIST-EXPAND-001"))]
    NoFieldUnderCursor,

    #[error("`{ty}` is not a struct")]
    #[diagnostic(code("ASSIST-EXPAND-002"))]
    NotAStruct { ty: String },

    #[error("`{ty}` is a unit struct and has no fields to expand")]
    #[diagnostic(code("ASSIST-EXPAND-003"))]
    UnitStruct { ty: String },

    #[error("`{ty}` is not visible from `{composite}`")]
    #[diagnostic(code("ASSIST-EXPAND-004"))]
    NotVisible { ty: String, composite: String },

    #[error("None of the fields of `{ty}` are visible from `{composite}`")]
    #[diagnostic(code("ASSIST-EXPAND-005"))]
    NoVisibleFields { ty: String, composite: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    SnapshotStale(#[from] Stale),
}

pub type AssistResult<T> = Result<T, AbortReason>;
