//! Assists that work on a single field without the delegate pipeline.

pub mod expand_struct_field;

pub use expand_struct_field::{expand_struct_field, ExpandOutcome};
