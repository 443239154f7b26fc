//! Owned syntax tree for the item subset relay analyzes.
//!
//! The tree keeps only what the semantic layer needs: item headers, field and
//! signature types, generic parameters with their bounds, and text ranges for
//! cursor lookup and edit placement. Function bodies are never lowered.

use std::fmt;

use relay_source::TextRange;

/// An identifier together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub text: String,
    pub range: TextRange,
}

impl Name {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Declared visibility of an item or field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
    /// `pub(crate)`
    Crate,
    /// `pub(super)`
    Super,
    /// `pub(self)`
    SelfModule,
    /// `pub(in path)`
    InPath(Vec<String>),
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Private => Ok(()),
            Visibility::Public => f.write_str("pub"),
            Visibility::Crate => f.write_str("pub(crate)"),
            Visibility::Super => f.write_str("pub(super)"),
            Visibility::SelfModule => f.write_str("pub(self)"),
            Visibility::InPath(path) => write!(f, "pub(in {})", path.join("::")),
        }
    }
}

/// An item in a file or inline module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub kind: ItemKind,
    pub visibility: Visibility,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Struct(StructDef),
    Enum(EnumDef),
    Trait(TraitDef),
    Impl(ImplDef),
    Module(ModuleDef),
    Use(Vec<UseImport>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructShape {
    Record,
    Tuple,
    Unit,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructDef {
    pub name: Name,
    pub generics: Generics,
    pub shape: StructShape,
    pub fields: Vec<FieldDef>,
}

/// How a field is addressed: by name in record structs, by position in tuple structs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldName {
    Named(Name),
    Index(usize),
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldName::Named(name) => f.write_str(&name.text),
            FieldName::Index(idx) => write!(f, "{idx}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: FieldName,
    pub ty: TypeRef,
    pub visibility: Visibility,
    pub range: TextRange,
}

/// Enums only matter as nameable types; variants are not lowered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDef {
    pub name: Name,
    pub generics: Generics,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitDef {
    pub name: Name,
    pub generics: Generics,
    pub supertraits: Vec<Bound>,
    pub items: Vec<AssocItem>,
    pub is_unsafe: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImplDef {
    pub generics: Generics,
    pub trait_ref: Option<PathType>,
    /// `impl !Trait for T`
    pub negative: bool,
    pub self_ty: TypeRef,
    pub items: Vec<AssocItem>,
    pub is_unsafe: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssocItem {
    Fn(FnSig),
    Type(AssocTypeDef),
    Const(AssocConstDef),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FnSig {
    pub name: Name,
    pub generics: Generics,
    pub self_param: Option<SelfParam>,
    pub params: Vec<Param>,
    pub ret: Option<TypeRef>,
    pub has_body: bool,
    pub is_unsafe: bool,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelfParam {
    /// `self` / `mut self`
    Value { mutable: bool },
    /// `&self`, `&'a mut self`
    Ref { lifetime: Option<String>, mutable: bool },
    /// `self: Box<Self>`
    Typed(TypeRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// The pattern as written, e.g. `other` or `(a, b)`
    pub pattern: String,
    pub ty: TypeRef,
}

/// `type Item;` in a trait, `type Item = T;` in an impl.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssocTypeDef {
    pub name: Name,
    pub bounds: Vec<Bound>,
    pub ty: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssocConstDef {
    pub name: Name,
    pub ty: Option<TypeRef>,
    pub has_value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleDef {
    pub name: Name,
    pub items: Vec<Item>,
}

/// One imported name from a `use` declaration, already flattened out of `{}` groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UseImport {
    pub path: Vec<String>,
    pub alias: Option<String>,
    pub glob: bool,
}

impl UseImport {
    /// Name the import binds in the importing module, if any.
    pub fn binding(&self) -> Option<&str> {
        if self.glob {
            return None;
        }
        self.alias
            .as_deref()
            .or_else(|| self.path.last().map(String::as_str))
    }
}

/// Generic parameters plus the where clause of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Generics {
    pub params: Vec<GenericParam>,
    pub where_predicates: Vec<WherePredicate>,
}

impl Generics {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.where_predicates.is_empty()
    }

    pub fn param(&self, name: &str) -> Option<&GenericParam> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParam {
    /// Parameter name; lifetimes keep their leading `'`
    pub name: String,
    pub kind: GenericParamKind,
    pub bounds: Vec<Bound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericParamKind {
    Lifetime,
    Type { default: Option<TypeRef> },
    Const { ty: TypeRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bound {
    Trait(PathType),
    /// `?Sized`
    Maybe(PathType),
    Lifetime(String),
    /// Anything not modelled (higher-ranked bounds, ...), kept verbatim
    Verbatim(String),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Trait(path) => write!(f, "{path}"),
            Bound::Maybe(path) => write!(f, "?{path}"),
            Bound::Lifetime(lt) | Bound::Verbatim(lt) => f.write_str(lt),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WhereTarget {
    Type(TypeRef),
    Lifetime(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WherePredicate {
    pub target: WhereTarget,
    pub bounds: Vec<Bound>,
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Path(PathType),
    Ref {
        lifetime: Option<String>,
        mutable: bool,
        inner: Box<TypeRef>,
    },
    Ptr {
        mutable: bool,
        inner: Box<TypeRef>,
    },
    /// `()` is the empty tuple
    Tuple(Vec<TypeRef>),
    Slice(Box<TypeRef>),
    Array(Box<TypeRef>, String),
    Never,
    /// `_`
    Infer,
    /// Types that are only carried around as text (`dyn Fn()`, `impl Trait`, `fn()`)
    Opaque(String),
    /// Syntax the parser could not make sense of
    Error(String),
}

impl TypeRef {
    pub fn as_path(&self) -> Option<&PathType> {
        match self {
            TypeRef::Path(path) => Some(path),
            _ => None,
        }
    }
}

/// A possibly qualified path with generic arguments on any segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathType {
    pub segments: Vec<PathSegment>,
}

impl PathType {
    pub fn single(name: impl Into<String>) -> Self {
        PathType {
            segments: vec![PathSegment {
                name: name.into(),
                args: Vec::new(),
            }],
        }
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The segment names without generic arguments.
    pub fn names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub name: String,
    pub args: Vec<GenericArgRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericArgRef {
    Type(TypeRef),
    Lifetime(String),
    /// `Item = T` inside angle brackets
    Binding { name: String, ty: TypeRef },
    Const(String),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Path(path) => write!(f, "{path}"),
            TypeRef::Ref {
                lifetime,
                mutable,
                inner,
            } => {
                f.write_str("&")?;
                if let Some(lt) = lifetime {
                    write!(f, "{lt} ")?;
                }
                if *mutable {
                    f.write_str("mut ")?;
                }
                write!(f, "{inner}")
            }
            TypeRef::Ptr { mutable, inner } => {
                let kw = if *mutable { "mut" } else { "const" };
                write!(f, "*{kw} {inner}")
            }
            TypeRef::Tuple(elems) if elems.len() == 1 => write!(f, "({},)", elems[0]),
            TypeRef::Tuple(elems) => {
                f.write_str("(")?;
                write_joined(f, elems, ", ")?;
                f.write_str(")")
            }
            TypeRef::Slice(inner) => write!(f, "[{inner}]"),
            TypeRef::Array(inner, len) => write!(f, "[{inner}; {len}]"),
            TypeRef::Never => f.write_str("!"),
            TypeRef::Infer => f.write_str("_"),
            TypeRef::Opaque(text) | TypeRef::Error(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            f.write_str(&segment.name)?;
            if !segment.args.is_empty() {
                f.write_str("<")?;
                write_joined(f, &segment.args, ", ")?;
                f.write_str(">")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for GenericArgRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericArgRef::Type(ty) => write!(f, "{ty}"),
            GenericArgRef::Lifetime(lt) | GenericArgRef::Const(lt) => f.write_str(lt),
            GenericArgRef::Binding { name, ty } => write!(f, "{name} = {ty}"),
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
