use expect_test::expect;
use relay_syntax::ast::*;
use relay_syntax::RustParser;

fn parse_ok(source: &str) -> Vec<Item> {
    let mut parser = RustParser::new().expect("Failed to create parser");
    let (items, errors) = parser.parse_ast(source);
    if !errors.is_empty() {
        panic!("Expected successful parse, but got errors: {:?}", errors);
    }
    items
}

fn only_struct(items: &[Item]) -> &StructDef {
    items
        .iter()
        .find_map(|item| match &item.kind {
            ItemKind::Struct(def) => Some(def),
            _ => None,
        })
        .expect("no struct parsed")
}

fn only_trait(items: &[Item]) -> &TraitDef {
    items
        .iter()
        .find_map(|item| match &item.kind {
            ItemKind::Trait(def) => Some(def),
            _ => None,
        })
        .expect("no trait parsed")
}

#[test]
fn record_struct_with_generics() {
    let items = parse_ok(
        "pub struct Wrapper<'a, T: Clone + 'a, const N: usize> where T: Default {\n    pub inner: &'a mut Vec<T>,\n    arr: [u8; N],\n}",
    );
    let def = only_struct(&items);
    assert_eq!(def.name.text, "Wrapper");
    assert_eq!(def.shape, StructShape::Record);
    assert_eq!(items[0].visibility, Visibility::Public);

    let names: Vec<_> = def.generics.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["'a", "T", "N"]);
    assert!(matches!(def.generics.params[2].kind, GenericParamKind::Const { .. }));
    let t_bounds: Vec<_> = def.generics.params[1].bounds.iter().map(|b| b.to_string()).collect();
    assert_eq!(t_bounds, ["Clone", "'a"]);
    assert_eq!(def.generics.where_predicates.len(), 1);

    let rendered: Vec<_> = def
        .fields
        .iter()
        .map(|f| format!("{} {}: {}", f.visibility, f.name, f.ty))
        .collect();
    expect![[r#"
        [
            "pub inner: &'a mut Vec<T>",
            " arr: [u8; N]",
        ]
    "#]]
    .assert_debug_eq(&rendered);
}

#[test]
fn tuple_struct_fields_keep_their_visibility() {
    let items = parse_ok("struct Pair(pub(crate) String, u32);");
    let def = only_struct(&items);
    assert_eq!(def.shape, StructShape::Tuple);
    assert_eq!(def.fields.len(), 2);
    assert_eq!(def.fields[0].name, FieldName::Index(0));
    assert_eq!(def.fields[0].visibility, Visibility::Crate);
    assert_eq!(def.fields[1].visibility, Visibility::Private);
    assert_eq!(def.fields[1].ty.to_string(), "u32");
}

#[test]
fn unit_struct_has_no_fields() {
    let items = parse_ok("struct Marker;");
    let def = only_struct(&items);
    assert_eq!(def.shape, StructShape::Unit);
    assert!(def.fields.is_empty());
}

#[test]
fn trait_items_and_signatures() {
    let items = parse_ok(
        r#"
pub trait Store<K = Self>: Clone + Sized {
    type Item;
    type Iter: Iterator;
    const LIMIT: usize;
    fn get(&self, key: &K) -> Option<&Self::Item>;
    fn put(&mut self, key: K, value: Self::Item);
    fn into_items(self) -> Vec<Self::Item>;
    fn describe(&self) -> String { String::new() }
    fn create() -> Self;
}
"#,
    );
    let def = only_trait(&items);
    assert_eq!(def.name.text, "Store");
    let supers: Vec<_> = def.supertraits.iter().map(|b| b.to_string()).collect();
    assert_eq!(supers, ["Clone", "Sized"]);
    match &def.generics.params[0].kind {
        GenericParamKind::Type { default: Some(ty) } => assert_eq!(ty.to_string(), "Self"),
        other => panic!("unexpected param kind {other:?}"),
    }

    let mut fns = Vec::new();
    let mut types = Vec::new();
    let mut consts = Vec::new();
    for item in &def.items {
        match item {
            AssocItem::Fn(sig) => fns.push(sig),
            AssocItem::Type(ty) => types.push(ty.name.text.clone()),
            AssocItem::Const(c) => consts.push(c.name.text.clone()),
        }
    }
    assert_eq!(types, ["Item", "Iter"]);
    assert_eq!(consts, ["LIMIT"]);
    assert_eq!(fns.len(), 5);

    assert_eq!(fns[0].self_param, Some(SelfParam::Ref { lifetime: None, mutable: false }));
    assert_eq!(fns[0].params[0].pattern, "key");
    assert_eq!(fns[0].params[0].ty.to_string(), "&K");
    assert_eq!(fns[0].ret.as_ref().map(|t| t.to_string()).as_deref(), Some("Option<&Self::Item>"));
    assert!(!fns[0].has_body);
    assert_eq!(fns[1].self_param, Some(SelfParam::Ref { lifetime: None, mutable: true }));
    assert_eq!(fns[2].self_param, Some(SelfParam::Value { mutable: false }));
    assert!(fns[3].has_body);
    assert_eq!(fns[4].self_param, None);
}

#[test]
fn impls_record_trait_self_type_and_polarity() {
    let items = parse_ok(
        r#"
impl<T: Clone> Store for Vec<T> {
    type Item = T;
    const LIMIT: usize = 4;
    fn get(&self, key: &Self) -> Option<&T> { None }
}
impl !Send for Marker {}
impl Marker { fn new() -> Self { Marker } }
"#,
    );
    let impls: Vec<_> = items
        .iter()
        .filter_map(|item| match &item.kind {
            ItemKind::Impl(def) => Some(def),
            _ => None,
        })
        .collect();
    assert_eq!(impls.len(), 3);

    assert_eq!(impls[0].trait_ref.as_ref().map(|t| t.to_string()).as_deref(), Some("Store"));
    assert_eq!(impls[0].self_ty.to_string(), "Vec<T>");
    assert!(!impls[0].negative);
    assert_eq!(impls[0].items.len(), 3);
    match &impls[0].items[0] {
        AssocItem::Type(ty) => assert_eq!(ty.ty.as_ref().map(|t| t.to_string()).as_deref(), Some("T")),
        other => panic!("expected associated type, got {other:?}"),
    }

    assert!(impls[1].negative);
    assert!(impls[2].trait_ref.is_none());
}

#[test]
fn use_trees_are_flattened() {
    let items = parse_ok(
        "use std::collections::{HashMap as Map, hash_map::{self, Entry}};\nuse crate::inner::*;\npub use self::a::B;",
    );
    let imports: Vec<_> = items
        .iter()
        .flat_map(|item| match &item.kind {
            ItemKind::Use(imports) => imports.clone(),
            _ => Vec::new(),
        })
        .map(|import| {
            format!(
                "{}{} -> {:?}",
                import.path.join("::"),
                if import.glob { "::*" } else { "" },
                import.binding()
            )
        })
        .collect();
    expect![[r#"
        [
            "std::collections::HashMap -> Some(\"Map\")",
            "std::collections::hash_map -> Some(\"hash_map\")",
            "std::collections::hash_map::Entry -> Some(\"Entry\")",
            "crate::inner::* -> None",
            "self::a::B -> Some(\"B\")",
        ]
    "#]]
    .assert_debug_eq(&imports);
}

#[test]
fn inline_modules_nest_items() {
    let items = parse_ok("mod outer { pub mod inner { pub struct Deep { x: u8 } } }\nmod external;");
    assert_eq!(items.len(), 1, "out-of-line module declarations are skipped");
    let ItemKind::Module(outer) = &items[0].kind else {
        panic!("expected module");
    };
    assert_eq!(outer.name.text, "outer");
    let ItemKind::Module(inner) = &outer.items[0].kind else {
        panic!("expected nested module");
    };
    assert_eq!(inner.name.text, "inner");
    assert_eq!(only_struct(&inner.items).name.text, "Deep");
}

#[test]
fn type_forms_render_back() {
    let items = parse_ok(
        "struct All<'a, T> { a: *const T, b: (u8, T), c: (), d: &'a [T], e: Box<dyn Fn(u8) -> u8>, f: std::rc::Rc<T>, g: Option<Vec<(T,)>>, h: <T as Iterator>::Item }",
    );
    let def = only_struct(&items);
    let rendered: Vec<_> = def.fields.iter().map(|f| f.ty.to_string()).collect();
    assert_eq!(rendered[..7], [
        "*const T",
        "(u8, T)",
        "()",
        "&'a [T]",
        "Box<dyn Fn(u8) -> u8>",
        "std::rc::Rc<T>",
        "Option<Vec<(T,)>>",
    ]);
    // Qualified paths are not modelled.
    assert!(matches!(def.fields[7].ty, TypeRef::Error(_)));
}

#[test]
fn field_lookup_by_offset_and_name() {
    let source = "struct A { x: u8 }\nmod m {\n    pub struct B(u8, String);\n}\n";
    let mut parser = RustParser::new().expect("Failed to create parser");
    let (items, errors) = parser.parse_ast(source);
    let parsed = relay_syntax::ParsedFile { items, errors };

    let x_offset = source.find("x:").unwrap();
    let hit = parsed.field_at(x_offset).expect("field under cursor");
    assert_eq!(hit.owner.def.name.text, "A");
    assert_eq!(hit.field.name.to_string(), "x");
    assert!(hit.owner.module_path.is_empty());

    let string_offset = source.find("String").unwrap() + 2;
    let hit = parsed.field_at(string_offset).expect("tuple field under cursor");
    assert_eq!(hit.owner.module_path, ["m"]);
    assert_eq!(hit.index, 1);

    assert!(parsed.field_at(source.find("mod").unwrap()).is_none());

    let by_name = parsed.find_field("m::B", "0").expect("field by name");
    assert_eq!(by_name.field.ty.to_string(), "u8");
    assert!(parsed.find_field("B", "0").is_none());
}
