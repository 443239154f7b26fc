use expect_test::{expect, Expect};
use relay_source::{CrateRoot, SourceDatabase, SourceFile, Workspace, LOCAL_CRATE};
use relay_syntax::ast::{GenericArgRef, PathSegment, PathType, TypeRef};
use relay_syntax::SyntaxDatabase;
use relay_types::{GenericContext, InterfaceImplementation, ModuleId, Semantics, TraitRef, Ty, TypeDatabase};

#[salsa::db]
#[derive(Default, Clone)]
struct TestDatabase {
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

fn setup(text: &str) -> (Semantics, ModuleId) {
    let db = TestDatabase::default();
    let file = SourceFile::new(&db, "lib.rs".to_string(), text.to_string());
    let std = relay_stdlib::load_stdlib(&db);
    let ws = Workspace::new(&db, vec![CrateRoot::new(LOCAL_CRATE, vec![file]), std]);
    let sema = db.semantics(ws);
    let root = sema.def_map().crate_root(LOCAL_CRATE).expect("local crate is registered");
    (sema, root)
}

fn ty(name: &str, args: &[&str]) -> TypeRef {
    let mut segments: Vec<PathSegment> = name
        .split("::")
        .map(|s| PathSegment {
            name: s.to_string(),
            args: Vec::new(),
        })
        .collect();
    if let Some(last) = segments.last_mut() {
        last.args = args.iter().map(|a| GenericArgRef::Type(ty(a, &[]))).collect();
    }
    TypeRef::Path(PathType { segments })
}

fn resolve(sema: &Semantics, root: ModuleId, name: &str, args: &[&str]) -> Ty {
    let ctx = GenericContext {
        module: root,
        params: vec!["T".to_string()],
    };
    sema.resolve_type(&ty(name, args), &ctx).expect("type resolves")
}

fn trait_names(sema: &Semantics, ty: &Ty, blanket: bool) -> Vec<String> {
    sema.list_direct_interfaces(ty)
        .iter()
        .filter(|iface| iface.blanket == blanket)
        .map(|iface| sema.def_map().trait_(iface.trait_id()).name.clone())
        .collect()
}

fn plain_trait(sema: &Semantics, root: ModuleId, name: &str) -> TraitRef {
    TraitRef {
        trait_id: sema.find_trait(name, root).expect("trait exists"),
        args: Vec::new(),
    }
}

/// The impl header, open parameters, predicates and associated types of the
/// interface `ty` has for `trait_name`, one per line.
fn check_interface(sema: &Semantics, root: ModuleId, ty: &Ty, trait_name: &str, expect: Expect) {
    let iface: InterfaceImplementation = sema
        .list_direct_interfaces(ty)
        .into_iter()
        .find(|iface| sema.def_map().trait_(iface.trait_id()).name == trait_name)
        .unwrap_or_else(|| panic!("{trait_name} is not implemented"));
    let def_map = sema.def_map();
    let mut lines = vec![format!(
        "{} for {}",
        def_map.render_trait_ref(&iface.trait_ref, root),
        def_map.render_ty(ty, root)
    )];
    for param in &iface.unbound_params {
        lines.push(format!("param {}", def_map.render_generic_param(param, root)));
    }
    for pred in &iface.where_predicates {
        lines.push(format!("where {}", def_map.render_where_predicate(pred, root)));
    }
    for (name, bound) in &iface.assoc_types {
        lines.push(format!("type {name} = {}", def_map.render_ty(bound, root)));
    }
    expect.assert_eq(&lines.join("\n"));
}

#[test]
fn impl_bounds_decide_which_impls_apply() {
    let (sema, root) = setup("");
    let vec_u8 = resolve(&sema, root, "Vec", &["u8"]);
    let names = trait_names(&sema, &vec_u8, false);
    for expected in ["Deref", "DerefMut", "Clone", "Debug", "IntoIterator", "Extend"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected} in {names:?}");
    }
    // u8 has no Hash or Eq impl in scope
    assert!(!names.iter().any(|n| n == "Hash" || n == "Eq"), "{names:?}");
    // Vec is not an Iterator, so the blanket IntoIterator impl does not apply twice
    assert_eq!(names.iter().filter(|n| *n == "IntoIterator").count(), 1);
}

#[test]
fn generic_arguments_satisfy_bounds_by_assumption() {
    let (sema, root) = setup("");
    let vec_t = resolve(&sema, root, "Vec", &["T"]);
    let names = trait_names(&sema, &vec_t, false);
    assert!(names.iter().any(|n| n == "Hash"), "{names:?}");
    assert!(names.iter().any(|n| n == "Clone"), "{names:?}");
}

#[test]
fn blanket_impls_are_flagged() {
    let (sema, root) = setup("");
    let string = resolve(&sema, root, "String", &[]);
    assert!(trait_names(&sema, &string, true).iter().any(|n| n == "ToString"));
    assert!(!trait_names(&sema, &string, false).iter().any(|n| n == "ToString"));
}

#[test]
fn associated_types_are_substituted() {
    let (sema, root) = setup("");
    let vec_u8 = resolve(&sema, root, "Vec", &["u8"]);
    let into_iter = sema
        .list_direct_interfaces(&vec_u8)
        .into_iter()
        .find(|iface| sema.def_map().trait_(iface.trait_id()).name == "IntoIterator")
        .expect("Vec implements IntoIterator");
    let rendered: Vec<String> = into_iter
        .assoc_types
        .iter()
        .map(|(name, ty)| format!("{name} = {}", sema.def_map().render_ty(ty, root)))
        .collect();
    assert_eq!(rendered, ["Item = u8", "IntoIter = std::vec::IntoIter<u8>"]);
}

#[test]
fn parameters_not_fixed_by_the_self_type_stay_open() {
    let (sema, root) = setup("");
    let vec_u8 = resolve(&sema, root, "Vec", &["u8"]);
    let eq = sema
        .list_direct_interfaces(&vec_u8)
        .into_iter()
        .find(|iface| sema.def_map().trait_(iface.trait_id()).name == "PartialEq")
        .expect("Vec implements PartialEq");
    let def_map = sema.def_map();
    assert_eq!(def_map.render_trait_ref(&eq.trait_ref, root), "PartialEq<Vec<U>>");
    let open: Vec<&str> = eq.unbound_params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(open, ["U"]);
    let preds: Vec<String> = eq
        .where_predicates
        .iter()
        .map(|p| def_map.render_where_predicate(p, root))
        .collect();
    assert_eq!(preds, ["u8: PartialEq<U>"]);
}

#[test]
fn negative_impls_rule_out_auto_traits() {
    let (sema, root) = setup("use std::rc::Rc;");
    let rc = resolve(&sema, root, "Rc", &["u8"]);
    let send = plain_trait(&sema, root, "Send");
    assert!(!sema.implements(&rc, &send));
    assert!(!trait_names(&sema, &rc, false).iter().any(|n| n == "Send"));
}

#[test]
fn existing_impls_are_detected() {
    let (sema, root) = setup(
        r#"
struct W<T> { items: Vec<T> }
impl<T: Clone> Clone for W<T> {
    fn clone(&self) -> Self { loop {} }
}
"#,
    );
    let adt = match sema.def_map().resolve_name(root, "W") {
        Some(relay_types::ModuleDef::Adt(id)) => id,
        other => panic!("W resolved to {other:?}"),
    };
    assert!(sema.interface_already_implemented(adt, &plain_trait(&sema, root, "Clone")));
    assert!(!sema.interface_already_implemented(adt, &plain_trait(&sema, root, "Default")));
    // the blanket impl only applies to iterators
    let into_iter = plain_trait(&sema, root, "IntoIterator");
    assert!(!sema.interface_already_implemented(adt, &into_iter));
}

#[test]
fn paths_render_as_the_module_would_write_them() {
    let (sema, root) = setup(
        r#"
use std::collections::HashMap as Map;
mod inner {
    pub struct Local;
}
"#,
    );
    let def_map = sema.def_map();
    let map = resolve(&sema, root, "std::collections::HashMap", &["String", "u8"]);
    assert_eq!(def_map.render_ty(&map, root), "Map<String, u8>");

    let local = resolve(&sema, root, "inner::Local", &[]);
    assert_eq!(def_map.render_ty(&local, root), "crate::inner::Local");

    let inner = def_map.module_by_path(LOCAL_CRATE, &["inner".to_string()]).expect("inner module");
    assert_eq!(def_map.render_ty(&local, inner), "Local");
    assert_eq!(def_map.render_ty(&map, inner), "std::collections::HashMap<String, u8>");
}

#[test]
fn assoc_types_are_found_through_supertraits() {
    let (sema, root) = setup("");
    let deref_mut = sema.find_trait("std::ops::DerefMut", root).expect("DerefMut");
    let deref = sema.find_trait("std::ops::Deref", root).expect("Deref");
    assert_eq!(sema.assoc_type_owner(deref_mut, "Target"), Some(deref));
    assert_eq!(sema.assoc_type_owner(deref_mut, "Item"), None);
}

#[test]
fn open_parameters_never_capture_names_of_the_queried_type() {
    let (sema, root) = setup("");
    let ctx = GenericContext {
        module: root,
        params: vec!["U".to_string()],
    };
    let vec_u = sema.resolve_type(&ty("Vec", &["U"]), &ctx).expect("type resolves");
    check_interface(
        &sema,
        root,
        &vec_u,
        "PartialEq",
        expect![[r#"
            PartialEq<Vec<U1>> for Vec<U>
            param U1
            where U: PartialEq<U1>"#]],
    );
}

#[test]
fn interfaces_render_with_their_bindings() {
    let (sema, root) = setup("");
    let vec_t = resolve(&sema, root, "Vec", &["T"]);
    check_interface(
        &sema,
        root,
        &vec_t,
        "IntoIterator",
        expect![[r#"
            IntoIterator for Vec<T>
            type Item = T
            type IntoIter = std::vec::IntoIter<T>"#]],
    );
    check_interface(
        &sema,
        root,
        &vec_t,
        "Deref",
        expect![[r#"
            std::ops::Deref for Vec<T>
            type Target = [T]"#]],
    );
}
