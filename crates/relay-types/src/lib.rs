//! Type and trait database for relay.
//!
//! The `def_map` query lowers the parsed items of every crate in a workspace into a
//! [`DefMap`]: modules with their scopes and imports, ADTs with lowered field types,
//! traits with lowered signatures and trait impls with lowered headers. Everything
//! downstream asks questions through [`Semantics`], a facade over one def map:
//!
//! - `resolve_type`: written type syntax to a [`Ty`], or `None`
//! - `list_direct_interfaces`: the trait impls that apply to a type itself
//! - `interface_already_implemented`: whether an ADT already has a given impl
//!
//! Rendering a `Ty` back into source text as a given module would write it lives in
//! the `render` module as methods on `DefMap`.

mod collect;
mod def_map;
mod error;
mod ids;
mod render;
mod resolve;
mod semantics;
mod ty;
mod unify;

pub use def_map::{
    fresh_name, AdtData, AdtKind, AssocConstData, AssocTypeData, Bound, DefMap, FieldData, FnData, GenericParamData,
    GenericParamKind, GenericParams, ImplData, ModuleData, Receiver, ReceiverKind, TraitData, TraitItem,
    WherePredicate, WhereTarget,
};
pub use error::{LowerError, LowerResult};
pub use ids::{AdtId, ImplId, ModuleDef, ModuleId, TraitId};
pub use resolve::TypeScope;
pub use semantics::{GenericContext, InterfaceImplementation, MethodSignature, Semantics};
pub use ty::{BuiltinType, GenericArg, Substitution, TraitRef, Ty};
pub use unify::{unify, unify_args};

use relay_source::Workspace;
use relay_syntax::SyntaxDatabase;
use triomphe::Arc;

/// Database trait for item lowering and trait queries.
#[salsa::db]
pub trait TypeDatabase: SyntaxDatabase {
    /// The def map of every crate in `workspace`.
    fn def_map(&self, workspace: Workspace) -> Arc<DefMap>
    where
        Self: Sized,
    {
        def_map_query(self, workspace)
    }

    /// A query facade over the def map of `workspace`.
    fn semantics(&self, workspace: Workspace) -> Semantics
    where
        Self: Sized,
    {
        Semantics::new(def_map_query(self, workspace))
    }
}

/// Lower a workspace into its def map
#[salsa::tracked]
pub fn def_map_query(db: &dyn TypeDatabase, workspace: Workspace) -> Arc<DefMap> {
    Arc::new(collect::collect_def_map(db, workspace))
}

/// Test utilities for the type layer.
#[cfg(test)]
pub mod testing {
    use relay_source::{CrateRoot, SourceDatabase, SourceFile, Workspace, LOCAL_CRATE};
    use relay_syntax::SyntaxDatabase;

    use super::TypeDatabase;

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

    /// A workspace of one local file plus the embedded standard library.
    pub fn workspace(db: &TestDatabase, text: &str) -> Workspace {
        let file = SourceFile::new(db, "lib.rs".to_string(), text.to_string());
        let std = relay_stdlib::load_stdlib(db);
        Workspace::new(db, vec![CrateRoot::new(LOCAL_CRATE, vec![file]), std])
    }
}

#[cfg(test)]
mod tests {
    use relay_source::LOCAL_CRATE;
    use salsa::Setter;
    use relay_syntax::ast::{PathSegment, PathType, TypeRef};

    use super::testing::{workspace, TestDatabase};
    use super::*;

    fn path(text: &str) -> TypeRef {
        TypeRef::Path(PathType {
            segments: text
                .split("::")
                .map(|name| PathSegment {
                    name: name.to_string(),
                    args: Vec::new(),
                })
                .collect(),
        })
    }

    #[test]
    fn embedded_std_lowers_without_diagnostics() {
        let db = TestDatabase::default();
        let ws = workspace(&db, "");
        let def_map = db.def_map(ws);
        assert!(def_map.diagnostics().is_empty(), "{:#?}", def_map.diagnostics());
    }

    #[test]
    fn prelude_and_imports_resolve() {
        let db = TestDatabase::default();
        let ws = workspace(
            &db,
            "use std::fmt::Display as Show;\nmod inner { pub struct A; }\nuse inner::A;\n",
        );
        let sema = db.semantics(ws);
        let def_map = sema.def_map();
        let root = def_map.crate_root(LOCAL_CRATE).unwrap();

        assert!(matches!(def_map.resolve_name(root, "Vec"), Some(ModuleDef::Adt(_))));
        assert!(matches!(def_map.resolve_name(root, "Show"), Some(ModuleDef::Trait(_))));
        assert!(matches!(def_map.resolve_name(root, "A"), Some(ModuleDef::Adt(_))));
        assert_eq!(def_map.resolve_name(root, "Missing"), None);

        let ctx = GenericContext::new(root);
        assert!(sema.resolve_type(&path("std::string::String"), &ctx).is_some());
        assert!(sema.resolve_type(&path("core::string::String"), &ctx).is_some());
        assert!(sema.resolve_type(&path("Nope"), &ctx).is_none());
        assert!(sema.resolve_type(&TypeRef::Infer, &ctx).is_none());
    }

    #[test]
    fn def_map_is_recomputed_after_edit() {
        let mut db = TestDatabase::default();
        let ws = workspace(&db, "struct A;");
        assert!(db.def_map(ws).adts().any(|(_, adt)| adt.name == "A"));

        let file = ws.crates(&db)[0].files[0];
        file.set_text(&mut db).to("struct B;".to_string());
        let def_map = db.def_map(ws);
        assert!(def_map.adts().any(|(_, adt)| adt.name == "B"));
        assert!(!def_map.adts().any(|(_, adt)| adt.name == "A"));
    }
}
