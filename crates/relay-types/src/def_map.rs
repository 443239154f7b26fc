//! The lowered item tree of a whole workspace.

use indexmap::IndexMap;
use relay_source::{SourceFile, TextRange};
use relay_syntax::ast::{FieldName, StructShape, TypeRef, UseImport, Visibility};

use crate::error::LowerError;
use crate::ids::{AdtId, ImplId, ModuleDef, ModuleId, TraitId};
use crate::ty::{GenericArg, TraitRef, Ty};

/// Every module, ADT, trait and impl of the workspace, indexed by arena ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DefMap {
    pub(crate) crate_roots: IndexMap<String, ModuleId>,
    pub(crate) modules: Vec<ModuleData>,
    pub(crate) adts: Vec<AdtData>,
    pub(crate) traits: Vec<TraitData>,
    pub(crate) impls: Vec<ImplData>,
    pub(crate) diagnostics: Vec<LowerError>,
}

impl DefMap {
    pub fn crate_root(&self, name: &str) -> Option<ModuleId> {
        self.crate_roots.get(name).copied()
    }

    pub fn module(&self, id: ModuleId) -> &ModuleData {
        &self.modules[id.index()]
    }

    pub fn adt(&self, id: AdtId) -> &AdtData {
        &self.adts[id.index()]
    }

    pub fn trait_(&self, id: TraitId) -> &TraitData {
        &self.traits[id.index()]
    }

    pub fn impl_(&self, id: ImplId) -> &ImplData {
        &self.impls[id.index()]
    }

    pub fn impls(&self) -> impl Iterator<Item = (ImplId, &ImplData)> + '_ {
        self.impls.iter().enumerate().map(|(i, data)| (ImplId::from_index(i), data))
    }

    pub fn traits(&self) -> impl Iterator<Item = (TraitId, &TraitData)> + '_ {
        self.traits.iter().enumerate().map(|(i, data)| (TraitId::from_index(i), data))
    }

    pub fn adts(&self) -> impl Iterator<Item = (AdtId, &AdtData)> + '_ {
        self.adts.iter().enumerate().map(|(i, data)| (AdtId::from_index(i), data))
    }

    pub fn diagnostics(&self) -> &[LowerError] {
        &self.diagnostics
    }

    /// Walks `path` (module names) down from the root of `krate`.
    pub fn module_by_path(&self, krate: &str, path: &[String]) -> Option<ModuleId> {
        let mut module = self.crate_root(krate)?;
        for name in path {
            match self.module(module).scope.get(name.as_str()) {
                Some(ModuleDef::Module(child)) => module = *child,
                _ => return None,
            }
        }
        Some(module)
    }

    /// Module names from the crate root down to `module`, the root itself excluded.
    pub fn module_path(&self, module: ModuleId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = module;
        while let Some(parent) = self.module(current).parent {
            path.push(self.module(current).name.clone());
            current = parent;
        }
        path.reverse();
        path
    }

    /// `true` if `module` is `ancestor` or nested inside it.
    pub fn is_within(&self, module: ModuleId, ancestor: ModuleId) -> bool {
        let mut current = Some(module);
        while let Some(m) = current {
            if m == ancestor {
                return true;
            }
            current = self.module(m).parent;
        }
        false
    }

    /// Whether an item declared in `owner` with `vis` can be named from `from`.
    pub fn is_visible_from(&self, vis: &Visibility, owner: ModuleId, from: ModuleId) -> bool {
        let owner_data = self.module(owner);
        if owner_data.krate != self.module(from).krate {
            return *vis == Visibility::Public;
        }
        match vis {
            Visibility::Public | Visibility::Crate => true,
            Visibility::Private | Visibility::SelfModule => self.is_within(from, owner),
            Visibility::Super => match owner_data.parent {
                Some(parent) => self.is_within(from, parent),
                None => true,
            },
            Visibility::InPath(path) => {
                let segments: Vec<String> = path
                    .iter()
                    .skip_while(|s| s.as_str() == "crate")
                    .cloned()
                    .collect();
                match self.module_by_path(&owner_data.krate, &segments) {
                    Some(target) => self.is_within(from, target),
                    None => false,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleData {
    /// Name of the crate the module belongs to
    pub krate: String,
    /// Empty for crate roots
    pub name: String,
    pub parent: Option<ModuleId>,
    /// Type namespace: child modules, ADTs and traits declared here
    pub scope: IndexMap<String, ModuleDef>,
    pub imports: Vec<UseImport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdtKind {
    Struct(StructShape),
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdtData {
    pub name: String,
    pub module: ModuleId,
    pub visibility: Visibility,
    pub kind: AdtKind,
    pub generics: GenericParams,
    pub fields: Vec<FieldData>,
    pub file: SourceFile,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldData {
    pub name: FieldName,
    pub type_ref: TypeRef,
    /// `Ty::Opaque` when the declared type does not resolve
    pub ty: Ty,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenericParams {
    pub params: Vec<GenericParamData>,
    pub where_predicates: Vec<WherePredicate>,
}

impl GenericParams {
    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn type_param_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| !matches!(p.kind, GenericParamKind::Lifetime))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Each parameter as an argument naming itself.
    pub fn identity_args(&self) -> Vec<GenericArg> {
        self.params.iter().map(GenericParamData::as_arg).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.where_predicates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParamData {
    pub name: String,
    pub kind: GenericParamKind,
    pub bounds: Vec<Bound>,
}

impl GenericParamData {
    pub fn as_arg(&self) -> GenericArg {
        match self.kind {
            GenericParamKind::Lifetime => GenericArg::Lifetime(self.name.clone()),
            GenericParamKind::Type { .. } => GenericArg::Type(Ty::Param(self.name.clone())),
            GenericParamKind::Const { .. } => GenericArg::Const(self.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericParamKind {
    Lifetime,
    Type { default: Option<Ty> },
    Const { ty: Ty },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Trait {
        trait_ref: TraitRef,
        /// `Iterator<Item = T>`
        bindings: Vec<(String, Ty)>,
    },
    /// `?Sized`
    Maybe(TraitRef),
    Lifetime(String),
    /// Bounds that did not lower, kept as written
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereTarget {
    Type(Ty),
    Lifetime(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WherePredicate {
    pub target: WhereTarget,
    pub bounds: Vec<Bound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitData {
    pub name: String,
    pub module: ModuleId,
    pub visibility: Visibility,
    pub generics: GenericParams,
    pub supertraits: Vec<TraitRef>,
    pub items: Vec<TraitItem>,
    pub is_unsafe: bool,
}

impl TraitData {
    pub fn methods(&self) -> impl Iterator<Item = &FnData> + '_ {
        self.items.iter().filter_map(|item| match item {
            TraitItem::Fn(f) => Some(f),
            _ => None,
        })
    }

    pub fn assoc_types(&self) -> impl Iterator<Item = &AssocTypeData> + '_ {
        self.items.iter().filter_map(|item| match item {
            TraitItem::Type(t) => Some(t),
            _ => None,
        })
    }

    pub fn assoc_consts(&self) -> impl Iterator<Item = &AssocConstData> + '_ {
        self.items.iter().filter_map(|item| match item {
            TraitItem::Const(c) => Some(c),
            _ => None,
        })
    }

    pub fn has_assoc_type(&self, name: &str) -> bool {
        self.assoc_types().any(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitItem {
    Fn(FnData),
    Type(AssocTypeData),
    Const(AssocConstData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssocTypeData {
    pub name: String,
    pub bounds: Vec<Bound>,
    pub default: Option<Ty>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssocConstData {
    pub name: String,
    pub ty: Ty,
    pub has_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    ByRef,
    ByMutRef,
    ByValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    Value { mutable: bool },
    Ref { lifetime: Option<String>, mutable: bool },
    /// `self: Box<Self>` and friends
    Typed(Ty),
}

impl Receiver {
    pub fn kind(&self) -> ReceiverKind {
        match self {
            Receiver::Value { .. } => ReceiverKind::ByValue,
            Receiver::Ref { mutable: false, .. } => ReceiverKind::ByRef,
            Receiver::Ref { mutable: true, .. } => ReceiverKind::ByMutRef,
            Receiver::Typed(Ty::Ref { mutable: false, .. }) => ReceiverKind::ByRef,
            Receiver::Typed(Ty::Ref { mutable: true, .. }) => ReceiverKind::ByMutRef,
            Receiver::Typed(_) => ReceiverKind::ByValue,
        }
    }
}

/// A lowered function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnData {
    pub name: String,
    pub generics: GenericParams,
    pub receiver: Option<Receiver>,
    pub params: Vec<(String, Ty)>,
    pub ret: Option<Ty>,
    pub has_body: bool,
    pub is_unsafe: bool,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplData {
    pub module: ModuleId,
    pub generics: GenericParams,
    /// `None` for inherent impls and for trait impls whose trait did not resolve
    pub trait_ref: Option<TraitRef>,
    pub negative: bool,
    pub self_ty: Ty,
    pub assoc_types: Vec<(String, Ty)>,
    pub assoc_consts: Vec<String>,
    pub methods: Vec<String>,
}

impl ImplData {
    /// Blanket impls cover a bare type parameter or a reference to one.
    pub fn is_blanket(&self) -> bool {
        let names = self.generics.type_param_names();
        let covers_param = |ty: &Ty| matches!(ty, Ty::Param(name) if names.contains(&name.as_str()));
        match &self.self_ty {
            Ty::Ref { inner, .. } => covers_param(inner),
            other => covers_param(other),
        }
    }
}

impl Bound {
    pub fn subst(&self, subst: &crate::ty::Substitution) -> Bound {
        match self {
            Bound::Trait { trait_ref, bindings } => Bound::Trait {
                trait_ref: trait_ref.subst(subst),
                bindings: bindings.iter().map(|(n, ty)| (n.clone(), ty.subst(subst))).collect(),
            },
            Bound::Maybe(trait_ref) => Bound::Maybe(trait_ref.subst(subst)),
            Bound::Lifetime(_) | Bound::Verbatim(_) => self.clone(),
        }
    }

    /// Type parameters mentioned by the bound's arguments.
    pub fn free_vars(&self) -> Vec<String> {
        match self {
            Bound::Trait { trait_ref, bindings } => {
                let mut vars = Vec::new();
                let tys = trait_ref
                    .args
                    .iter()
                    .filter_map(GenericArg::as_type)
                    .chain(bindings.iter().map(|(_, ty)| ty));
                for ty in tys {
                    for var in ty.free_vars() {
                        if !vars.contains(&var) {
                            vars.push(var);
                        }
                    }
                }
                vars
            }
            _ => Vec::new(),
        }
    }
}

impl WherePredicate {
    pub fn subst(&self, subst: &crate::ty::Substitution) -> WherePredicate {
        WherePredicate {
            target: match &self.target {
                WhereTarget::Type(ty) => WhereTarget::Type(ty.subst(subst)),
                WhereTarget::Lifetime(lt) => WhereTarget::Lifetime(lt.clone()),
            },
            bounds: self.bounds.iter().map(|b| b.subst(subst)).collect(),
        }
    }

    pub fn mentions_any(&self, names: &[&str]) -> bool {
        let in_target = match &self.target {
            WhereTarget::Type(ty) => ty.mentions_any(names),
            WhereTarget::Lifetime(lt) => names.contains(&lt.as_str()),
        };
        in_target
            || self
                .bounds
                .iter()
                .any(|b| b.free_vars().iter().any(|v| names.contains(&v.as_str())))
    }
}

impl GenericParams {
    pub fn subst(&self, subst: &crate::ty::Substitution) -> GenericParams {
        GenericParams {
            params: self
                .params
                .iter()
                .map(|p| GenericParamData {
                    name: p.name.clone(),
                    kind: match &p.kind {
                        GenericParamKind::Type { default } => GenericParamKind::Type {
                            default: default.as_ref().map(|d| d.subst(subst)),
                        },
                        other => other.clone(),
                    },
                    bounds: p.bounds.iter().map(|b| b.subst(subst)).collect(),
                })
                .collect(),
            where_predicates: self.where_predicates.iter().map(|w| w.subst(subst)).collect(),
        }
    }
}

impl FnData {
    pub fn subst(&self, subst: &crate::ty::Substitution) -> FnData {
        FnData {
            name: self.name.clone(),
            generics: self.generics.subst(subst),
            receiver: self.receiver.as_ref().map(|r| match r {
                Receiver::Typed(ty) => Receiver::Typed(ty.subst(subst)),
                other => other.clone(),
            }),
            params: self.params.iter().map(|(p, ty)| (p.clone(), ty.subst(subst))).collect(),
            ret: self.ret.as_ref().map(|ty| ty.subst(subst)),
            has_body: self.has_body,
            is_unsafe: self.is_unsafe,
            is_async: self.is_async,
        }
    }

    /// Every type in the signature outside the receiver.
    pub fn signature_types(&self) -> impl Iterator<Item = &Ty> + '_ {
        self.params.iter().map(|(_, ty)| ty).chain(self.ret.iter())
    }
}

impl FnData {
    /// Renames the method's own generic parameters whose names are in `taken`, so the
    /// signature can sit inside an impl that already declares those names.
    pub fn rename_generics<S: AsRef<str>>(&self, taken: &[S]) -> FnData {
        let mut used: Vec<String> = taken.iter().map(|s| s.as_ref().to_string()).collect();
        used.extend(self.generics.params.iter().map(|p| p.name.clone()));
        let mut subst = crate::ty::Substitution::new();
        let mut renamed_params = Vec::new();
        for param in &self.generics.params {
            if !taken.iter().any(|t| t.as_ref() == param.name) {
                continue;
            }
            let fresh = fresh_name(&param.name, &used);
            used.push(fresh.clone());
            let arg = GenericParamData {
                name: fresh.clone(),
                kind: param.kind.clone(),
                bounds: Vec::new(),
            }
            .as_arg();
            subst.insert(param.name.clone(), arg);
            renamed_params.push((param.name.clone(), fresh));
        }
        if renamed_params.is_empty() {
            return self.clone();
        }
        let mut renamed = self.subst(&subst);
        for param in &mut renamed.generics.params {
            if let Some((_, fresh)) = renamed_params.iter().find(|(old, _)| *old == param.name) {
                param.name = fresh.clone();
            }
        }
        renamed
    }
}

/// `base` followed by the smallest number that makes it unused.
pub fn fresh_name<S: AsRef<str>>(base: &str, taken: &[S]) -> String {
    (1..)
        .map(|i| format!("{base}{i}"))
        .find(|candidate| !taken.iter().any(|t| t.as_ref() == candidate))
        .unwrap_or_else(|| base.to_string())
}
