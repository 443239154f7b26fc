//! Query facade over one `DefMap`.
//!
//! `Semantics` answers the questions the delegate assists ask: what a field type
//! resolves to, which trait impls apply to it directly, whether a type already
//! implements a trait. Impl selection is a small solver: impl headers are unified
//! against the query and the impl's bounds are checked recursively up to
//! `MAX_SOLVER_DEPTH`.

use relay_stdlib::STD_CRATE;
use relay_syntax::ast::TypeRef;
use triomphe::Arc;

use crate::def_map::{fresh_name, Bound, DefMap, FnData, GenericParamData, GenericParamKind, ImplData, WherePredicate, WhereTarget};
use crate::ids::{AdtId, ImplId, ModuleDef, ModuleId, TraitId};
use crate::resolve::TypeScope;
use crate::ty::{GenericArg, Substitution, TraitRef, Ty};
use crate::unify::{unify, unify_args};

/// Bound checking gives up (answers "no") below this many nested obligations.
const MAX_SOLVER_DEPTH: usize = 6;

/// Where a type is being resolved: the module that wrote it and the generic
/// parameters in scope there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericContext {
    pub module: ModuleId,
    pub params: Vec<String>,
}

impl GenericContext {
    pub fn new(module: ModuleId) -> Self {
        GenericContext {
            module,
            params: Vec::new(),
        }
    }

    /// The context of an ADT's own fields.
    pub fn for_adt(def_map: &DefMap, adt: AdtId) -> Self {
        let data = def_map.adt(adt);
        GenericContext {
            module: data.module,
            params: data.generics.names().into_iter().map(str::to_string).collect(),
        }
    }
}

/// A trait method as the implementing type sees it: trait parameters are substituted,
/// `Self` is left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub sig: FnData,
    /// The trait declares no default body
    pub required: bool,
    /// The impl provides its own body for a method with a default
    pub overridden: bool,
}

/// One trait implementation that applies to a queried type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceImplementation {
    /// `None` when synthesized from the trait declaration alone
    pub impl_id: Option<ImplId>,
    pub trait_ref: TraitRef,
    pub self_ty: Ty,
    /// Associated types as the impl binds them, in impl order
    pub assoc_types: Vec<(String, Ty)>,
    pub methods: Vec<MethodSignature>,
    /// Impl parameters the self type does not determine, e.g. `U` in
    /// `impl<T, U> PartialEq<Vec<U>> for Vec<T>`
    pub unbound_params: Vec<GenericParamData>,
    /// Impl predicates that mention unbound parameters, substituted
    pub where_predicates: Vec<WherePredicate>,
    pub blanket: bool,
}

impl InterfaceImplementation {
    pub fn trait_id(&self) -> TraitId {
        self.trait_ref.trait_id
    }
}

#[derive(Debug, Clone)]
pub struct Semantics {
    def_map: Arc<DefMap>,
}

impl Semantics {
    pub fn new(def_map: Arc<DefMap>) -> Self {
        Semantics { def_map }
    }

    pub fn def_map(&self) -> &DefMap {
        &self.def_map
    }

    /// Strict resolution of written type syntax; `None` if any part of it does not resolve.
    pub fn resolve_type(&self, ty: &TypeRef, ctx: &GenericContext) -> Option<Ty> {
        let scope = TypeScope::new(&self.def_map, ctx.module).with_params(&ctx.params);
        match scope.lower_type(ty) {
            Ok(ty) => Some(ty),
            Err(err) => {
                log::debug!("cannot resolve `{ty}`: {err}");
                None
            }
        }
    }

    /// The ADT applied to its own parameters, as its impls see it.
    pub fn adt_identity(&self, adt: AdtId) -> Ty {
        Ty::Adt {
            id: adt,
            args: self.def_map.adt(adt).generics.identity_args(),
        }
    }

    /// Finds a trait by path as code in `from` would write it. Falls back to the first
    /// trait with the same simple name anywhere in the workspace.
    pub fn find_trait(&self, name: &str, from: ModuleId) -> Option<TraitId> {
        let segments: Vec<&str> = name.split("::").map(str::trim).collect();
        if let Some(ModuleDef::Trait(id)) = self.def_map.resolve_path(from, &segments) {
            return Some(id);
        }
        let simple = segments.last()?;
        self.def_map
            .traits()
            .find(|(_, data)| data.name == *simple)
            .map(|(id, _)| id)
    }

    /// A standard library trait by its path inside `std`.
    pub fn std_trait(&self, path: &[&str]) -> Option<TraitId> {
        let root = self.def_map.crate_root(STD_CRATE)?;
        match self.def_map.resolve_path(root, path) {
            Some(ModuleDef::Trait(id)) => Some(id),
            _ => None,
        }
    }

    pub fn adt_implements_drop(&self, adt: AdtId) -> bool {
        let Some(drop) = self.std_trait(&["ops", "Drop"]) else {
            return false;
        };
        let trait_ref = TraitRef {
            trait_id: drop,
            args: Vec::new(),
        };
        self.implements(&self.adt_identity(adt), &trait_ref)
    }

    /// Whether `ty: trait_ref` holds. Generic parameters and other types the solver
    /// cannot see into are assumed to satisfy any bound; the generated where clause
    /// carries the obligation instead.
    pub fn implements(&self, ty: &Ty, trait_ref: &TraitRef) -> bool {
        self.implements_at(ty, trait_ref, 0)
    }

    fn implements_at(&self, ty: &Ty, trait_ref: &TraitRef, depth: usize) -> bool {
        if depth > MAX_SOLVER_DEPTH {
            log::trace!("solver depth exceeded for {ty}: {}", trait_ref.trait_id);
            return false;
        }
        match ty {
            Ty::Param(_) | Ty::Projection { .. } | Ty::Opaque(_) | Ty::Unknown | Ty::SelfTy => return true,
            _ => {}
        }
        if self.is_sized_trait(trait_ref.trait_id) {
            return !matches!(ty, Ty::Slice(_) | Ty::Builtin(crate::ty::BuiltinType::Str));
        }
        let mut found = false;
        for (_, data) in self.impls_of(trait_ref.trait_id) {
            if self.match_impl(data, ty, Some(trait_ref), depth).is_none() {
                continue;
            }
            if data.negative {
                log::trace!("negative impl rules out {ty}");
                return false;
            }
            found = true;
        }
        found
    }

    fn is_sized_trait(&self, id: TraitId) -> bool {
        self.std_trait(&["marker", "Sized"]) == Some(id)
    }

    fn impls_of(&self, trait_id: TraitId) -> impl Iterator<Item = (ImplId, &ImplData)> + '_ {
        self.def_map
            .impls()
            .filter(move |(_, data)| data.trait_ref.as_ref().is_some_and(|t| t.trait_id == trait_id))
    }

    /// Unifies the impl header with `ty` (and the trait arguments, when given) and
    /// checks the impl's bounds. Bounds mentioning parameters left unbound are not
    /// checked here.
    fn match_impl(&self, data: &ImplData, ty: &Ty, trait_ref: Option<&TraitRef>, depth: usize) -> Option<Substitution> {
        let vars = data.generics.names();
        let mut subst = Substitution::new();
        if !unify(&data.self_ty, ty, &vars, &mut subst) {
            return None;
        }
        if let (Some(query), Some(header)) = (trait_ref, &data.trait_ref) {
            if !unify_args(&header.args, &query.args, &vars, &mut subst) {
                return None;
            }
        }
        if !self.bounds_hold(data, &subst, depth + 1) {
            return None;
        }
        Some(subst)
    }

    fn bounds_hold(&self, data: &ImplData, subst: &Substitution, depth: usize) -> bool {
        let unbound = unbound_names(data, subst);
        let check = |target: &Ty, bounds: &[Bound]| {
            bounds.iter().all(|bound| match bound {
                Bound::Trait { trait_ref, .. } => {
                    if trait_ref.args.iter().any(|arg| arg_mentions(arg, &unbound)) {
                        return true;
                    }
                    self.implements_at(target, &trait_ref.subst(subst), depth)
                }
                _ => true,
            })
        };
        for param in &data.generics.params {
            if !matches!(param.kind, GenericParamKind::Type { .. }) {
                continue;
            }
            let Some(GenericArg::Type(target)) = subst.get(&param.name) else {
                continue;
            };
            if !check(target, &param.bounds) {
                return false;
            }
        }
        for pred in &data.generics.where_predicates {
            let WhereTarget::Type(target) = &pred.target else {
                continue;
            };
            if target.mentions_any(&unbound) {
                continue;
            }
            if !check(&target.subst(subst), &pred.bounds) {
                return false;
            }
        }
        true
    }

    /// Every trait impl that applies to `ty` itself, in declaration order. Impls
    /// reachable only through `Deref` are not included.
    pub fn list_direct_interfaces(&self, ty: &Ty) -> Vec<InterfaceImplementation> {
        let mut found = Vec::new();
        for (impl_id, data) in self.def_map.impls() {
            if data.negative {
                continue;
            }
            let Some(header) = &data.trait_ref else {
                continue;
            };
            let Some(mut subst) = self.match_impl(data, ty, None, 0) else {
                continue;
            };
            let unbound = rename_unbound_apart(data, ty, &mut subst);
            let trait_ref = header.subst(&subst).replace_self(ty);
            log::trace!("{ty} implements {} via {impl_id}", trait_ref.trait_id);
            found.push(self.interface_from_impl(impl_id, data, trait_ref, ty, &subst, &unbound));
        }
        found
    }

    fn interface_from_impl(
        &self,
        impl_id: ImplId,
        data: &ImplData,
        trait_ref: TraitRef,
        ty: &Ty,
        subst: &Substitution,
        unbound: &[(String, String)],
    ) -> InterfaceImplementation {
        let unbound_params = unbound
            .iter()
            .filter_map(|(original, name)| {
                let param = data.generics.params.iter().find(|p| p.name == *original)?;
                Some(GenericParamData {
                    name: name.clone(),
                    kind: param.kind.clone(),
                    bounds: param.bounds.iter().map(|b| b.subst(subst)).collect(),
                })
            })
            .collect();
        let unbound: Vec<&str> = unbound.iter().map(|(original, _)| original.as_str()).collect();
        let where_predicates = data
            .generics
            .where_predicates
            .iter()
            .filter(|pred| pred.mentions_any(&unbound))
            .map(|pred| pred.subst(subst))
            .collect();
        let assoc_types = data
            .assoc_types
            .iter()
            .map(|(name, bound)| (name.clone(), bound.subst(subst).replace_self(ty)))
            .collect();
        let methods = self.method_signatures(&trait_ref, Some(data));
        InterfaceImplementation {
            impl_id: Some(impl_id),
            trait_ref,
            self_ty: ty.clone(),
            assoc_types,
            methods,
            unbound_params,
            where_predicates,
            blanket: data.is_blanket(),
        }
    }

    /// The shape of `trait_id` for `ty` built from the trait declaration alone: trait
    /// parameters take their defaults, associated types are left for the caller to bind.
    /// `None` when a parameter has no default.
    pub fn declared_interface(&self, trait_id: TraitId, ty: &Ty) -> Option<InterfaceImplementation> {
        let generics = &self.def_map.trait_(trait_id).generics;
        let mut so_far = Substitution::new();
        let mut args = Vec::with_capacity(generics.params.len());
        for param in &generics.params {
            let arg = match &param.kind {
                GenericParamKind::Type { default: Some(default) } => {
                    GenericArg::Type(default.subst(&so_far).replace_self(ty))
                }
                GenericParamKind::Lifetime => GenericArg::Lifetime("'_".to_string()),
                _ => return None,
            };
            so_far.insert(param.name.clone(), arg.clone());
            args.push(arg);
        }
        let trait_ref = TraitRef { trait_id, args };
        Some(InterfaceImplementation {
            impl_id: None,
            methods: self.method_signatures(&trait_ref, None),
            trait_ref,
            self_ty: ty.clone(),
            assoc_types: Vec::new(),
            unbound_params: Vec::new(),
            where_predicates: Vec::new(),
            blanket: false,
        })
    }

    fn method_signatures(&self, trait_ref: &TraitRef, impl_data: Option<&ImplData>) -> Vec<MethodSignature> {
        let data = self.def_map.trait_(trait_ref.trait_id);
        let subst = Substitution::from_pairs(data.generics.names(), &trait_ref.args);
        // Method generics must not capture names the trait arguments bring in.
        let mut incoming = Vec::new();
        for arg in &trait_ref.args {
            match arg {
                GenericArg::Type(ty) => incoming.extend(ty.free_vars()),
                GenericArg::Lifetime(text) | GenericArg::Const(text) => incoming.push(text.clone()),
            }
        }
        data.methods()
            .map(|method| MethodSignature {
                sig: method.rename_generics(&incoming).subst(&subst),
                required: !method.has_body,
                overridden: method.has_body
                    && impl_data.is_some_and(|imp| imp.methods.iter().any(|m| *m == method.name)),
            })
            .collect()
    }

    /// Whether `adt` already has an impl of `trait_ref` covering all of its
    /// instantiations, blanket impls whose bounds hold included.
    pub fn interface_already_implemented(&self, adt: AdtId, trait_ref: &TraitRef) -> bool {
        let identity = self.adt_identity(adt);
        self.impls_of(trait_ref.trait_id).any(|(impl_id, data)| {
            if data.negative {
                return false;
            }
            let hit = self.match_impl(data, &identity, Some(trait_ref), 0).is_some();
            if hit {
                log::debug!("{} already implemented by {impl_id}", self.def_map.trait_(trait_ref.trait_id).name);
            }
            hit
        })
    }

    /// Supertraits of `trait_ref` applied to `self_ty`.
    pub fn supertraits(&self, trait_ref: &TraitRef, self_ty: &Ty) -> Vec<TraitRef> {
        let data = self.def_map.trait_(trait_ref.trait_id);
        let subst = Substitution::from_pairs(data.generics.names(), &trait_ref.args);
        data.supertraits
            .iter()
            .map(|sup| sup.subst(&subst).replace_self(self_ty))
            .collect()
    }

    /// The trait in `trait_id`'s supertrait hierarchy, itself included, that declares
    /// the associated type `name`.
    pub fn assoc_type_owner(&self, trait_id: TraitId, name: &str) -> Option<TraitId> {
        let mut stack = vec![trait_id];
        let mut seen = Vec::new();
        while let Some(id) = stack.pop() {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            let data = self.def_map.trait_(id);
            if data.has_assoc_type(name) {
                return Some(id);
            }
            stack.extend(data.supertraits.iter().rev().map(|s| s.trait_id));
        }
        None
    }
}

fn unbound_names<'a>(data: &'a ImplData, subst: &Substitution) -> Vec<&'a str> {
    data.generics
        .params
        .iter()
        .map(|p| p.name.as_str())
        .filter(|name| !subst.contains(name))
        .collect()
}

/// Gives every impl parameter the match left unbound a name distinct from the free
/// variables of `ty`, recording renames in `subst`. Returns `(declared, used)` name pairs.
fn rename_unbound_apart(data: &ImplData, ty: &Ty, subst: &mut Substitution) -> Vec<(String, String)> {
    let mut taken = ty.free_vars();
    taken.extend(data.generics.params.iter().map(|p| p.name.clone()));
    let clashing = ty.free_vars();
    let unbound: Vec<String> = unbound_names(data, subst).into_iter().map(str::to_string).collect();
    let mut pairs = Vec::with_capacity(unbound.len());
    for name in unbound {
        if !clashing.contains(&name) {
            pairs.push((name.clone(), name));
            continue;
        }
        let fresh = fresh_name(&name, &taken);
        taken.push(fresh.clone());
        if let Some(param) = data.generics.params.iter().find(|p| p.name == name) {
            let renamed = GenericParamData {
                name: fresh.clone(),
                kind: param.kind.clone(),
                bounds: Vec::new(),
            };
            subst.insert(name.clone(), renamed.as_arg());
        }
        log::trace!("impl parameter {name} renamed to {fresh}, it clashes with {ty}");
        pairs.push((name, fresh));
    }
    pairs
}

fn arg_mentions(arg: &GenericArg, names: &[&str]) -> bool {
    match arg {
        GenericArg::Type(ty) => ty.mentions_any(names),
        GenericArg::Lifetime(text) | GenericArg::Const(text) => names.contains(&text.as_str()),
    }
}
