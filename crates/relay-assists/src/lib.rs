//! Code generating assists.
//!
//! The main assist generates trait impls on a struct that delegate to one of its
//! fields. It runs as a pipeline over one snapshot:
//!
//! 1. `resolver`: the field's written type becomes a `Ty`
//! 2. `discovery`: traits the field type implements directly, sorted
//! 3. `conflicts`: drops traits the struct already implements
//! 4. `planner`: one `DelegationPlan` per trait, or an exclusion
//! 5. `synth`: impl blocks rendered in the struct's module and placed after it
//!
//! [`delegate_field`] ties the stages together. The `handlers` module holds smaller
//! assists that work on one field directly.

mod conflicts;
mod context;
mod discovery;
mod edit;
mod error;
pub mod handlers;
mod pipeline;
mod planner;
mod resolver;
mod synth;

pub use context::{AssistContext, FieldSelection, FieldTarget};
pub use edit::{EditPlan, TextEdit};
pub use error::{AbortReason, AssistResult, ExclusionReason, ExpandError};
pub use handlers::{expand_struct_field, ExpandOutcome};
pub use pipeline::{delegate_field, list_traits, DelegateOutcome, DelegateRequest, Stage, TraitReport};
pub use planner::{DelegationPlan, Strategy};
pub use resolver::TypeDescriptor;
pub use synth::GeneratedImplementation;

/// Fixtures for assist tests. A fixture is one file of source text with `$0`
/// marking the cursor.
#[cfg(test)]
pub mod testing {
    use std::ops::Deref;

    use relay_source::{AssistConfig, CrateRoot, Generation, SourceDatabase, SourceFile, Workspace, LOCAL_CRATE};
    use relay_syntax::SyntaxDatabase;
    use relay_types::{ModuleId, TypeDatabase};

    use crate::context::{AssistContext, FieldSelection, FieldTarget};
    use crate::resolver::{resolve_field_type, TypeDescriptor};

    pub const CURSOR_MARKER: &str = "$0";

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

    #[salsa::db]
    impl TypeDatabase for TestDatabase {}

    pub struct Fixture {
        ctx: AssistContext,
        pub offset: usize,
        pub generation: Generation,
    }

    impl Deref for Fixture {
        type Target = AssistContext;

        fn deref(&self) -> &AssistContext {
            &self.ctx
        }
    }

    impl Fixture {
        /// The field under the cursor.
        pub fn selection(&self) -> FieldSelection {
            self.select_field(&FieldTarget::Offset(self.offset))
                .expect("no field under the cursor")
        }
    }

    /// Splits `$0` out of `text`.
    pub fn extract_offset(text: &str) -> (usize, String) {
        let offset = text.find(CURSOR_MARKER).expect("fixture has no `$0` marker");
        let mut clean = text[..offset].to_string();
        clean.push_str(&text[offset + CURSOR_MARKER.len()..]);
        (offset, clean)
    }

    pub fn analyze(fixture: &str) -> Fixture {
        analyze_with_config(fixture, AssistConfig::default())
    }

    pub fn analyze_with_config(fixture: &str, config: AssistConfig) -> Fixture {
        let (offset, text) = extract_offset(fixture);
        let db = TestDatabase::default();
        let file = SourceFile::new(&db, "lib.rs".to_string(), text);
        let std = relay_stdlib::load_stdlib(&db);
        let workspace = Workspace::new(&db, vec![CrateRoot::new(LOCAL_CRATE, vec![file]), std]);
        let generation = Generation::new();
        let ctx = AssistContext::new(&db, workspace, file, config, generation.token());
        Fixture {
            ctx,
            offset,
            generation,
        }
    }

    /// The resolved type of the field under the cursor and the module it is declared in.
    pub fn descriptor(fixture: &Fixture) -> (TypeDescriptor, ModuleId) {
        let selection = fixture.selection();
        let desc = resolve_field_type(fixture.sema(), &selection).expect("field type does not resolve");
        (desc, selection.module)
    }
}
