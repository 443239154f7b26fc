//! Semantic types.
//!
//! `Ty` is what a `TypeRef` becomes once every path in it has been resolved. Paths are
//! replaced by arena ids, generic parameters by `Ty::Param`, `Self` by `Ty::SelfTy`.
//! Rendering back to source text needs a module scope and lives in `render`.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::ids::{AdtId, TraitId};

macro_rules! builtin_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Primitive types, `str` included.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum BuiltinType {
            $($variant),*
        }

        impl BuiltinType {
            pub fn from_name(name: &str) -> Option<BuiltinType> {
                match name {
                    $($name => Some(BuiltinType::$variant),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(BuiltinType::$variant => $name),*
                }
            }
        }
    };
}

builtin_types!(
    Bool => "bool", Char => "char", Str => "str",
    I8 => "i8", I16 => "i16", I32 => "i32", I64 => "i64", I128 => "i128", Isize => "isize",
    U8 => "u8", U16 => "u16", U32 => "u32", U64 => "u64", U128 => "u128", Usize => "usize",
    F32 => "f32", F64 => "f64",
);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// A struct or enum applied to arguments aligned with its generic parameters
    Adt { id: AdtId, args: Vec<GenericArg> },
    Builtin(BuiltinType),
    /// A generic type parameter in scope
    Param(String),
    Ref {
        lifetime: Option<String>,
        mutable: bool,
        inner: Box<Ty>,
    },
    Ptr {
        mutable: bool,
        inner: Box<Ty>,
    },
    Tuple(Vec<Ty>),
    Slice(Box<Ty>),
    Array(Box<Ty>, String),
    Never,
    /// `Self` inside a trait or impl
    SelfTy,
    /// `Self::Item`, `T::Item` or `<T as Trait>::Item`
    Projection {
        self_ty: Box<Ty>,
        trait_ref: Option<Box<TraitRef>>,
        name: String,
    },
    /// Carried as text (`dyn Fn()`, `impl Trait`, unmodelled syntax)
    Opaque(String),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericArg {
    Type(Ty),
    /// Lifetimes keep their leading `'`; an elided lifetime is `'_`
    Lifetime(String),
    Const(String),
}

impl GenericArg {
    pub fn as_type(&self) -> Option<&Ty> {
        match self {
            GenericArg::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

/// A trait applied to arguments aligned with the trait's own generic parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraitRef {
    pub trait_id: TraitId,
    pub args: Vec<GenericArg>,
}

impl TraitRef {
    pub fn subst(&self, subst: &Substitution) -> TraitRef {
        TraitRef {
            trait_id: self.trait_id,
            args: self.args.iter().map(|arg| arg.subst(subst)).collect(),
        }
    }

    pub fn replace_self(&self, with: &Ty) -> TraitRef {
        TraitRef {
            trait_id: self.trait_id,
            args: self.args.iter().map(|arg| arg.replace_self(with)).collect(),
        }
    }
}

/// Maps generic parameter names (lifetimes with their `'`) to arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    map: FxHashMap<String, GenericArg>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, arg: GenericArg) {
        self.map.insert(name.into(), arg);
    }

    pub fn get(&self, name: &str) -> Option<&GenericArg> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Pairs parameter names with arguments positionally.
    pub fn from_pairs<'a>(names: impl IntoIterator<Item = &'a str>, args: &[GenericArg]) -> Self {
        let mut subst = Substitution::new();
        for (name, arg) in names.into_iter().zip(args) {
            subst.insert(name, arg.clone());
        }
        subst
    }

    fn lifetime(&self, name: &str) -> Option<String> {
        match self.map.get(name)? {
            GenericArg::Lifetime(lt) => Some(lt.clone()),
            _ => None,
        }
    }
}

impl GenericArg {
    pub fn subst(&self, subst: &Substitution) -> GenericArg {
        match self {
            GenericArg::Type(ty) => GenericArg::Type(ty.subst(subst)),
            GenericArg::Lifetime(lt) => GenericArg::Lifetime(subst.lifetime(lt).unwrap_or_else(|| lt.clone())),
            GenericArg::Const(text) => match subst.get(text) {
                Some(GenericArg::Const(value)) => GenericArg::Const(value.clone()),
                Some(GenericArg::Type(Ty::Param(name))) => GenericArg::Const(name.clone()),
                _ => GenericArg::Const(text.clone()),
            },
        }
    }

    pub fn replace_self(&self, with: &Ty) -> GenericArg {
        match self {
            GenericArg::Type(ty) => GenericArg::Type(ty.replace_self(with)),
            other => other.clone(),
        }
    }
}

impl Ty {
    pub fn unit() -> Ty {
        Ty::Tuple(Vec::new())
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Ty::Param(_))
    }

    /// Visits this type and every type nested in it, parents first.
    pub fn walk(&self, f: &mut dyn FnMut(&Ty)) {
        f(self);
        match self {
            Ty::Adt { args, .. } => walk_args(args, f),
            Ty::Ref { inner, .. } | Ty::Ptr { inner, .. } | Ty::Slice(inner) | Ty::Array(inner, _) => inner.walk(f),
            Ty::Tuple(elems) => elems.iter().for_each(|elem| elem.walk(f)),
            Ty::Projection { self_ty, trait_ref, .. } => {
                self_ty.walk(f);
                if let Some(trait_ref) = trait_ref {
                    walk_args(&trait_ref.args, f);
                }
            }
            Ty::Builtin(_) | Ty::Param(_) | Ty::Never | Ty::SelfTy | Ty::Opaque(_) | Ty::Unknown => {}
        }
    }

    pub fn contains_unknown(&self) -> bool {
        let mut found = false;
        self.walk(&mut |ty| found |= matches!(ty, Ty::Unknown));
        found
    }

    /// Whether `Self` appears other than as the base of an associated type projection.
    pub fn mentions_bare_self(&self) -> bool {
        match self {
            Ty::SelfTy => true,
            Ty::Projection { self_ty, trait_ref, .. } => {
                let base = match self_ty.as_ref() {
                    Ty::SelfTy => false,
                    other => other.mentions_bare_self(),
                };
                base || trait_ref
                    .as_ref()
                    .is_some_and(|t| t.args.iter().any(|a| a.as_type().is_some_and(Ty::mentions_bare_self)))
            }
            Ty::Adt { args, .. } => args.iter().any(|a| a.as_type().is_some_and(Ty::mentions_bare_self)),
            Ty::Ref { inner, .. } | Ty::Ptr { inner, .. } | Ty::Slice(inner) | Ty::Array(inner, _) => {
                inner.mentions_bare_self()
            }
            Ty::Tuple(elems) => elems.iter().any(Ty::mentions_bare_self),
            Ty::Builtin(_) | Ty::Param(_) | Ty::Never | Ty::Opaque(_) | Ty::Unknown => false,
        }
    }

    /// Generic parameters (types, lifetimes and const names) this type refers to, in
    /// first-occurrence order. `'_`, `'static` and literal lengths are not parameters.
    pub fn free_vars(&self) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            let is_var = match name.strip_prefix('\'') {
                Some(lt) => lt != "_" && lt != "static",
                None => name.starts_with(|c: char| c.is_alphabetic() || c == '_') && name != "_",
            };
            if is_var && !vars.iter().any(|v| v == name) {
                vars.push(name.to_string());
            }
        };
        self.walk(&mut |ty| match ty {
            Ty::Param(name) => push(name),
            Ty::Ref {
                lifetime: Some(lt), ..
            } => push(lt),
            Ty::Array(_, len) => push(len),
            Ty::Adt { args, .. } => {
                for arg in args {
                    match arg {
                        GenericArg::Lifetime(lt) | GenericArg::Const(lt) => push(lt),
                        GenericArg::Type(_) => {}
                    }
                }
            }
            _ => {}
        });
        vars
    }

    pub fn mentions_any(&self, names: &[&str]) -> bool {
        self.free_vars().iter().any(|v| names.contains(&v.as_str()))
    }

    pub fn subst(&self, subst: &Substitution) -> Ty {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            Ty::Param(name) => match subst.get(name) {
                Some(GenericArg::Type(ty)) => ty.clone(),
                _ => self.clone(),
            },
            Ty::Adt { id, args } => Ty::Adt {
                id: *id,
                args: args.iter().map(|arg| arg.subst(subst)).collect(),
            },
            Ty::Ref {
                lifetime,
                mutable,
                inner,
            } => Ty::Ref {
                lifetime: lifetime
                    .as_ref()
                    .map(|lt| subst.lifetime(lt).unwrap_or_else(|| lt.clone())),
                mutable: *mutable,
                inner: Box::new(inner.subst(subst)),
            },
            Ty::Ptr { mutable, inner } => Ty::Ptr {
                mutable: *mutable,
                inner: Box::new(inner.subst(subst)),
            },
            Ty::Tuple(elems) => Ty::Tuple(elems.iter().map(|elem| elem.subst(subst)).collect()),
            Ty::Slice(inner) => Ty::Slice(Box::new(inner.subst(subst))),
            Ty::Array(inner, len) => {
                let len = match subst.get(len) {
                    Some(GenericArg::Const(value)) => value.clone(),
                    Some(GenericArg::Type(Ty::Param(name))) => name.clone(),
                    _ => len.clone(),
                };
                Ty::Array(Box::new(inner.subst(subst)), len)
            }
            Ty::Projection {
                self_ty,
                trait_ref,
                name,
            } => Ty::Projection {
                self_ty: Box::new(self_ty.subst(subst)),
                trait_ref: trait_ref.as_ref().map(|t| Box::new(t.subst(subst))),
                name: name.clone(),
            },
            Ty::Builtin(_) | Ty::Never | Ty::SelfTy | Ty::Opaque(_) | Ty::Unknown => self.clone(),
        }
    }

    /// Replaces `Self`, projections based on `Self` included.
    pub fn replace_self(&self, with: &Ty) -> Ty {
        match self {
            Ty::SelfTy => with.clone(),
            Ty::Adt { id, args } => Ty::Adt {
                id: *id,
                args: args.iter().map(|arg| arg.replace_self(with)).collect(),
            },
            Ty::Ref {
                lifetime,
                mutable,
                inner,
            } => Ty::Ref {
                lifetime: lifetime.clone(),
                mutable: *mutable,
                inner: Box::new(inner.replace_self(with)),
            },
            Ty::Ptr { mutable, inner } => Ty::Ptr {
                mutable: *mutable,
                inner: Box::new(inner.replace_self(with)),
            },
            Ty::Tuple(elems) => Ty::Tuple(elems.iter().map(|elem| elem.replace_self(with)).collect()),
            Ty::Slice(inner) => Ty::Slice(Box::new(inner.replace_self(with))),
            Ty::Array(inner, len) => Ty::Array(Box::new(inner.replace_self(with)), len.clone()),
            Ty::Projection {
                self_ty,
                trait_ref,
                name,
            } => Ty::Projection {
                self_ty: Box::new(self_ty.replace_self(with)),
                trait_ref: trait_ref.as_ref().map(|t| Box::new(t.replace_self(with))),
                name: name.clone(),
            },
            Ty::Builtin(_) | Ty::Param(_) | Ty::Never | Ty::Opaque(_) | Ty::Unknown => self.clone(),
        }
    }
}

fn walk_args(args: &[GenericArg], f: &mut dyn FnMut(&Ty)) {
    for arg in args {
        if let GenericArg::Type(ty) = arg {
            ty.walk(f);
        }
    }
}

// Scope-free rendering for logs and test failure messages; ids stay ids.
impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Adt { id, args } => {
                write!(f, "{id}")?;
                write_args(f, args)
            }
            Ty::Builtin(builtin) => f.write_str(builtin.name()),
            Ty::Param(name) => f.write_str(name),
            Ty::Ref {
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
            Ty::Ptr { mutable, inner } => write!(f, "*{} {inner}", if *mutable { "mut" } else { "const" }),
            Ty::Tuple(elems) => {
                f.write_str("(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                if elems.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Ty::Slice(inner) => write!(f, "[{inner}]"),
            Ty::Array(inner, len) => write!(f, "[{inner}; {len}]"),
            Ty::Never => f.write_str("!"),
            Ty::SelfTy => f.write_str("Self"),
            Ty::Projection {
                self_ty,
                trait_ref: Some(trait_ref),
                name,
            } => {
                write!(f, "<{self_ty} as {}", trait_ref.trait_id)?;
                write_args(f, &trait_ref.args)?;
                write!(f, ">::{name}")
            }
            Ty::Projection { self_ty, name, .. } => write!(f, "{self_ty}::{name}"),
            Ty::Opaque(text) => f.write_str(text),
            Ty::Unknown => f.write_str("{unknown}"),
        }
    }
}

impl fmt::Display for GenericArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericArg::Type(ty) => write!(f, "{ty}"),
            GenericArg::Lifetime(text) | GenericArg::Const(text) => f.write_str(text),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[GenericArg]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str(">")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(ty: Ty) -> Ty {
        Ty::Adt {
            id: AdtId(0),
            args: vec![GenericArg::Type(ty)],
        }
    }

    #[test]
    fn subst_replaces_params_and_lifetimes() {
        let ty = Ty::Ref {
            lifetime: Some("'a".into()),
            mutable: false,
            inner: Box::new(vec_of(Ty::Param("T".into()))),
        };
        let mut subst = Substitution::new();
        subst.insert("T", GenericArg::Type(Ty::Builtin(BuiltinType::U8)));
        subst.insert("'a", GenericArg::Lifetime("'x".into()));
        assert_eq!(ty.subst(&subst).to_string(), "&'x AdtId#0<u8>");
    }

    #[test]
    fn free_vars_in_first_occurrence_order() {
        let ty = Ty::Tuple(vec![
            Ty::Ref {
                lifetime: Some("'a".into()),
                mutable: true,
                inner: Box::new(Ty::Param("U".into())),
            },
            vec_of(Ty::Param("T".into())),
            Ty::Param("U".into()),
            Ty::Ref {
                lifetime: Some("'static".into()),
                mutable: false,
                inner: Box::new(Ty::Builtin(BuiltinType::Str)),
            },
        ]);
        assert_eq!(ty.free_vars(), ["'a", "U", "T"]);
    }

    #[test]
    fn self_projections_are_not_bare_self() {
        let item = Ty::Projection {
            self_ty: Box::new(Ty::SelfTy),
            trait_ref: None,
            name: "Item".into(),
        };
        assert!(!vec_of(item.clone()).mentions_bare_self());
        assert!(vec_of(Ty::SelfTy).mentions_bare_self());
        assert_eq!(
            item.replace_self(&Ty::Builtin(BuiltinType::I32)).to_string(),
            "i32::Item"
        );
    }
}
