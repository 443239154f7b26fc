//! Per-trait delegation plans.
//!
//! A plan fixes, for one candidate trait, how every delegated method is implemented,
//! what each associated type is bound to and which generic parameters and where
//! clauses the generated impl needs. Planning fails for a single trait when
//! something cannot be forwarded soundly; the other candidates are unaffected.
//!
//! Methods whose contract is to hand out a borrow of the logical inner value are
//! never forwarded. These are the methods returning `&Self::Target` or
//! `&mut Self::Target` of `Deref`, `DerefMut` and traits built on them. Their body
//! borrows the field directly. `Target` projects onto the field type's own `Deref`
//! impl when it has one (deref coercion makes the borrow fit) and is the field type
//! otherwise.

use relay_types::{
    fresh_name, Bound, FnData, GenericParamData, GenericParamKind, GenericParams,
    InterfaceImplementation, Receiver, ReceiverKind, Semantics, Substitution, TraitId, TraitRef, Ty,
    WherePredicate, WhereTarget,
};

use crate::context::FieldSelection;
use crate::error::ExclusionReason;
use crate::resolver::TypeDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `&self.field`
    DirectFieldAccess,
    /// `&mut self.field`
    DirectFieldAccessMutable,
    /// `<FieldTy as Trait>::method(self.field, ..)`
    ForwardCall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMethod {
    pub sig: FnData,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedConst {
    pub name: String,
    pub ty: Ty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationPlan {
    pub trait_ref: TraitRef,
    pub field_ty: Ty,
    /// Parameters and where clause of the generated impl
    pub generics: GenericParams,
    pub assoc_types: Vec<(String, Ty)>,
    pub consts: Vec<PlannedConst>,
    pub methods: Vec<PlannedMethod>,
    pub is_unsafe: bool,
    /// Associated types the direct borrows return, e.g. `Target` for `DerefMut`
    pub borrowed: Vec<String>,
}

impl DelegationPlan {
    pub fn trait_id(&self) -> TraitId {
        self.trait_ref.trait_id
    }

    /// Whether the trait is delegated by borrowing the field directly.
    pub fn is_projection(&self) -> bool {
        self.methods.iter().any(|m| m.strategy != Strategy::ForwardCall)
    }
}

pub struct Planner<'a> {
    sema: &'a Semantics,
    selection: &'a FieldSelection,
    desc: &'a TypeDescriptor,
    composite_drops: bool,
    deref: Option<TraitId>,
}

impl<'a> Planner<'a> {
    pub fn new(sema: &'a Semantics, selection: &'a FieldSelection, desc: &'a TypeDescriptor) -> Self {
        Planner {
            sema,
            selection,
            desc,
            composite_drops: sema.adt_implements_drop(selection.adt),
            deref: sema.std_trait(&["ops", "Deref"]),
        }
    }

    fn trait_name(&self, trait_ref: &TraitRef) -> String {
        self.sema.def_map().render_trait_ref(trait_ref, self.selection.module)
    }

    fn field_ty_name(&self) -> String {
        self.sema.def_map().render_ty(&self.desc.ty, self.selection.module)
    }

    /// Plans one candidate.
    pub fn plan(&self, iface: &InterfaceImplementation) -> Result<DelegationPlan, ExclusionReason> {
        let def_map = self.sema.def_map();
        let trait_data = def_map.trait_(iface.trait_id());
        let composite = &def_map.adt(self.selection.adt).generics;
        let composite_names: Vec<String> = composite.names().into_iter().map(str::to_string).collect();

        // Impl parameters the field type leaves open become parameters of the new impl.
        let mut taken = composite_names.clone();
        taken.extend(iface.unbound_params.iter().map(|p| p.name.clone()));
        let mut rename = Substitution::new();
        let mut extra_params = Vec::new();
        for param in &iface.unbound_params {
            let name = if composite_names.contains(&param.name) {
                let fresh = fresh_name(&param.name, &taken);
                taken.push(fresh.clone());
                fresh
            } else {
                param.name.clone()
            };
            if name != param.name {
                let renamed = GenericParamData {
                    name: name.clone(),
                    kind: param.kind.clone(),
                    bounds: Vec::new(),
                };
                rename.insert(param.name.clone(), renamed.as_arg());
            }
            extra_params.push(GenericParamData {
                name,
                kind: param.kind.clone(),
                bounds: param.bounds.clone(),
            });
        }
        for param in &mut extra_params {
            param.bounds = param.bounds.iter().map(|b| b.subst(&rename)).collect();
        }

        let trait_ref = iface.trait_ref.subst(&rename);
        let trait_name = self.trait_name(&trait_ref);
        let not_implemented = || ExclusionReason::NotImplementedByField {
            trait_name: trait_name.clone(),
            ty: self.field_ty_name(),
        };
        let forwards = iface.impl_id.is_some();
        // `Drop::drop` cannot be called explicitly and the field is dropped anyway.
        if self.sema.std_trait(&["ops", "Drop"]) == Some(iface.trait_id()) {
            return Err(ExclusionReason::UndelegatableMethod {
                trait_name: trait_name.clone(),
                method: "drop".to_string(),
            });
        }

        let mut methods = Vec::new();
        let mut projected = Vec::new();
        for method in &iface.methods {
            if !method.required && !method.overridden {
                continue;
            }
            let sig = method.sig.rename_generics(&taken).subst(&rename);
            if let Some((strategy, assoc)) = self.projection_of(iface.trait_id(), &sig) {
                log::debug!("{trait_name}::{} borrows the field directly", sig.name);
                if !projected.contains(&assoc) {
                    projected.push(assoc);
                }
                methods.push(PlannedMethod { sig, strategy });
                continue;
            }
            if !forwards {
                return Err(not_implemented());
            }
            let undelegatable = || ExclusionReason::UndelegatableMethod {
                trait_name: trait_name.clone(),
                method: sig.name.clone(),
            };
            let Some(kind) = forwardable_receiver(&sig) else {
                if method.required {
                    return Err(undelegatable());
                }
                continue;
            };
            if kind == ReceiverKind::ByValue {
                let borrows_self = sig
                    .params
                    .iter()
                    .any(|(_, ty)| matches!(ty, Ty::Ref { .. }) && ty.mentions_bare_self());
                if self.composite_drops || borrows_self {
                    if !method.required {
                        continue;
                    }
                    return Err(ExclusionReason::PartialMoveError {
                        trait_name: trait_name.clone(),
                        method: sig.name.clone(),
                        composite: self.selection.composite.clone(),
                    });
                }
            }
            if sig.signature_types().any(Ty::mentions_bare_self) {
                if method.required {
                    return Err(undelegatable());
                }
                continue;
            }
            methods.push(PlannedMethod {
                sig,
                strategy: Strategy::ForwardCall,
            });
        }

        let mut assoc_types = Vec::new();
        for assoc in trait_data.assoc_types() {
            let bound = if forwards {
                Ty::Projection {
                    self_ty: Box::new(self.desc.ty.clone()),
                    trait_ref: Some(Box::new(trait_ref.clone())),
                    name: assoc.name.clone(),
                }
            } else if projected.contains(&assoc.name) {
                self.desc.ty.clone()
            } else {
                return Err(not_implemented());
            };
            assoc_types.push((assoc.name.clone(), bound));
        }

        let trait_subst = Substitution::from_pairs(trait_data.generics.names(), &trait_ref.args);
        let mut consts = Vec::new();
        for konst in trait_data.assoc_consts().filter(|c| !c.has_default) {
            if !forwards {
                return Err(not_implemented());
            }
            let ty = konst.ty.subst(&trait_subst);
            if ty.mentions_bare_self() {
                return Err(ExclusionReason::UndelegatableMethod {
                    trait_name: trait_name.clone(),
                    method: konst.name.clone(),
                });
            }
            consts.push(PlannedConst {
                name: konst.name.clone(),
                ty,
            });
        }

        if !forwards && projected.is_empty() {
            return Err(not_implemented());
        }

        let uses_field_impl = methods.iter().any(|m| m.strategy == Strategy::ForwardCall)
            || assoc_types.iter().any(|(_, ty)| matches!(ty, Ty::Projection { .. }))
            || !consts.is_empty();
        let generics = self.merge_generics(composite, extra_params, iface, &rename, &trait_ref, uses_field_impl);

        Ok(DelegationPlan {
            trait_ref,
            field_ty: self.desc.ty.clone(),
            generics,
            assoc_types,
            consts,
            methods,
            is_unsafe: trait_data.is_unsafe,
            borrowed: projected,
        })
    }

    /// Recognizes `fn m(&self) -> &Self::Target` and `fn m(&mut self) -> &mut Self::Target`
    /// where `Target` is the one `Deref` declares, reached from `trait_id` itself or
    /// through its supertraits.
    fn projection_of(&self, trait_id: TraitId, sig: &FnData) -> Option<(Strategy, String)> {
        let Some(Receiver::Ref { mutable, .. }) = &sig.receiver else {
            return None;
        };
        if !sig.params.is_empty() || !sig.generics.params.is_empty() {
            return None;
        }
        let Some(Ty::Ref {
            mutable: ret_mutable,
            inner,
            ..
        }) = &sig.ret
        else {
            return None;
        };
        let Ty::Projection { self_ty, name, .. } = inner.as_ref() else {
            return None;
        };
        if ret_mutable != mutable || **self_ty != Ty::SelfTy {
            return None;
        }
        let owner = self.sema.assoc_type_owner(trait_id, name)?;
        if Some(owner) != self.deref {
            return None;
        }
        let strategy = if *mutable {
            Strategy::DirectFieldAccessMutable
        } else {
            Strategy::DirectFieldAccess
        };
        Some((strategy, name.clone()))
    }

    fn merge_generics(
        &self,
        composite: &GenericParams,
        extra_params: Vec<GenericParamData>,
        iface: &InterfaceImplementation,
        rename: &Substitution,
        trait_ref: &TraitRef,
        uses_field_impl: bool,
    ) -> GenericParams {
        // Lifetimes have to come first.
        let (lifetimes, others): (Vec<_>, Vec<_>) = composite
            .params
            .iter()
            .cloned()
            .chain(extra_params)
            .partition(|p| matches!(p.kind, GenericParamKind::Lifetime));
        let params = lifetimes.into_iter().chain(others).collect();

        let mut where_predicates = composite.where_predicates.clone();
        where_predicates.extend(iface.where_predicates.iter().map(|p| p.subst(rename)));
        if uses_field_impl && self.desc.is_generic() {
            where_predicates.push(WherePredicate {
                target: WhereTarget::Type(self.desc.ty.clone()),
                bounds: vec![Bound::Trait {
                    trait_ref: trait_ref.clone(),
                    bindings: Vec::new(),
                }],
            });
        }
        GenericParams {
            params,
            where_predicates,
        }
    }
}

/// The receiver kind when the method can be called on the field, `None` for
/// associated functions and receivers such as `self: Box<Self>`.
fn forwardable_receiver(sig: &FnData) -> Option<ReceiverKind> {
    match sig.receiver.as_ref()? {
        Receiver::Typed(Ty::Ref { inner, .. }) if **inner != Ty::SelfTy => None,
        Receiver::Typed(ty) if !matches!(ty, Ty::Ref { .. } | Ty::SelfTy) => None,
        receiver => Some(receiver.kind()),
    }
}

/// Drops plans whose supertraits neither the composite nor another plan of the batch
/// provides, until the batch is closed under its supertraits.
pub fn check_supertraits(
    sema: &Semantics,
    selection: &FieldSelection,
    mut plans: Vec<DelegationPlan>,
) -> (Vec<DelegationPlan>, Vec<ExclusionReason>) {
    let def_map = sema.def_map();
    let composite = sema.adt_identity(selection.adt);
    let mut excluded = Vec::new();
    loop {
        let missing = plans.iter().enumerate().find_map(|(index, plan)| {
            sema.supertraits(&plan.trait_ref, &composite)
                .into_iter()
                .find(|sup| {
                    let in_batch = plans.iter().any(|other| other.trait_id() == sup.trait_id);
                    !in_batch && !sema.implements(&composite, sup)
                })
                .map(|sup| (index, sup))
        });
        let Some((index, sup)) = missing else {
            break;
        };
        let plan = plans.remove(index);
        let reason = ExclusionReason::UnsatisfiedSupertrait {
            trait_name: def_map.render_trait_ref(&plan.trait_ref, selection.module),
            supertrait: def_map.render_trait_ref(&sup, selection.module),
            composite: selection.composite.clone(),
        };
        log::warn!("{reason}");
        excluded.push(reason);
    }
    (plans, excluded)
}

/// Drops plans whose direct borrow of the field cannot produce the associated type
/// that is bound elsewhere, by another plan of the batch or by an impl the composite
/// already has (`DerefMut` next to a hand written `Deref`).
pub fn check_borrowed_targets(
    sema: &Semantics,
    selection: &FieldSelection,
    desc: &TypeDescriptor,
    plans: Vec<DelegationPlan>,
) -> (Vec<DelegationPlan>, Vec<ExclusionReason>) {
    let def_map = sema.def_map();
    let composite = sema.adt_identity(selection.adt);
    let existing = sema.list_direct_interfaces(&composite);
    let mut excluded = Vec::new();
    let mut kept = Vec::with_capacity(plans.len());
    for (index, plan) in plans.iter().enumerate() {
        let mutable = plan
            .methods
            .iter()
            .any(|m| m.strategy == Strategy::DirectFieldAccessMutable);
        let mismatch = plan.borrowed.iter().find_map(|name| {
            if plan.assoc_types.iter().any(|(own, _)| own == name) {
                return None;
            }
            let owner = sema.assoc_type_owner(plan.trait_id(), name)?;
            let in_batch = plans
                .iter()
                .filter(|other| other.trait_id() == owner)
                .find_map(|other| assoc_binding(&other.assoc_types, name));
            let bound = in_batch.or_else(|| {
                existing
                    .iter()
                    .filter(|iface| iface.impl_id.is_some() && iface.trait_id() == owner)
                    .find_map(|iface| assoc_binding(&iface.assoc_types, name))
            })?;
            (!borrow_reaches(sema, &desc.ty, &bound, mutable)).then(|| (name.clone(), bound))
        });
        match mismatch {
            Some((assoc, bound)) => {
                let reason = ExclusionReason::BorrowMismatch {
                    trait_name: def_map.render_trait_ref(&plan.trait_ref, selection.module),
                    assoc,
                    bound: def_map.render_ty(&bound, selection.module),
                    field: selection.field.to_string(),
                    field_ty: def_map.render_ty(&desc.ty, selection.module),
                };
                log::warn!("{reason}");
                excluded.push(reason);
            }
            None => kept.push(index),
        }
    }
    let plans = plans
        .into_iter()
        .enumerate()
        .filter(|(index, _)| kept.contains(index))
        .map(|(_, plan)| plan)
        .collect();
    (plans, excluded)
}

fn assoc_binding(assoc_types: &[(String, Ty)], name: &str) -> Option<Ty> {
    assoc_types.iter().find(|(own, _)| own == name).map(|(_, ty)| ty.clone())
}

/// Whether `&field` (or `&mut field`) coerces to a borrow of `bound`: it is the field
/// type, or the field type's own `Deref::Target` and the field can be dereferenced
/// mutably when it has to be.
fn borrow_reaches(sema: &Semantics, field_ty: &Ty, bound: &Ty, mutable: bool) -> bool {
    if bound == field_ty {
        return true;
    }
    let Some(deref) = sema.std_trait(&["ops", "Deref"]) else {
        return false;
    };
    let projects_field = matches!(
        bound,
        Ty::Projection { self_ty, trait_ref: Some(trait_ref), name }
            if **self_ty == *field_ty && trait_ref.trait_id == deref && name == "Target"
    );
    let field_target = sema
        .list_direct_interfaces(field_ty)
        .into_iter()
        .filter(|iface| iface.impl_id.is_some() && iface.trait_id() == deref)
        .find_map(|iface| assoc_binding(&iface.assoc_types, "Target"));
    if !projects_field && field_target.as_ref() != Some(bound) {
        return false;
    }
    if !mutable {
        return true;
    }
    sema.std_trait(&["ops", "DerefMut"]).is_some_and(|deref_mut| {
        let trait_ref = TraitRef {
            trait_id: deref_mut,
            args: Vec::new(),
        };
        sema.implements(field_ty, &trait_ref)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover_interfaces;
    use crate::testing::{analyze, descriptor, Fixture};

    fn plan_all(fixture: &Fixture) -> Vec<(String, Result<DelegationPlan, ExclusionReason>)> {
        let (desc, module) = descriptor(fixture);
        let selection = fixture.selection();
        let sema = fixture.sema();
        let planner = Planner::new(sema, &selection, &desc);
        discover_interfaces(sema, &desc, module)
            .candidates
            .iter()
            .map(|iface| (sema.def_map().render_trait_ref(&iface.trait_ref, module), planner.plan(iface)))
            .collect()
    }

    fn plan_of(fixture: &Fixture, name: &str) -> Result<DelegationPlan, ExclusionReason> {
        plan_all(fixture)
            .into_iter()
            .find(|(trait_name, _)| trait_name == name)
            .map(|(_, plan)| plan)
            .unwrap_or_else(|| panic!("{name} was not discovered"))
    }

    #[test]
    fn deref_methods_borrow_the_field() {
        let fixture = analyze("struct W { items: Vec<u8>$0 }");
        let deref = plan_of(&fixture, "std::ops::Deref").unwrap();
        assert!(deref.is_projection());
        assert_eq!(deref.methods[0].strategy, Strategy::DirectFieldAccess);
        let def_map = fixture.sema().def_map();
        let module = fixture.selection().module;
        let targets: Vec<String> = deref
            .assoc_types
            .iter()
            .map(|(name, ty)| format!("{name} = {}", def_map.render_ty(ty, module)))
            .collect();
        assert_eq!(targets, ["Target = <Vec<u8> as std::ops::Deref>::Target"]);

        let deref_mut = plan_of(&fixture, "std::ops::DerefMut").unwrap();
        assert_eq!(deref_mut.methods[0].strategy, Strategy::DirectFieldAccessMutable);
        assert!(deref_mut.assoc_types.is_empty());

        let as_ref = plan_of(&fixture, "AsRef<[u8]>").unwrap();
        assert!(!as_ref.is_projection());
        assert_eq!(as_ref.methods[0].strategy, Strategy::ForwardCall);
    }

    #[test]
    fn target_without_deref_is_the_field_type() {
        let fixture = analyze("use std::ops::Deref;\nstruct A;\nstruct B { a: A$0 }");
        let sema = fixture.sema();
        let selection = fixture.selection();
        let (desc, _) = descriptor(&fixture);
        let deref = sema.std_trait(&["ops", "Deref"]).unwrap();
        let iface = sema.declared_interface(deref, &desc.ty).unwrap();
        let plan = Planner::new(sema, &selection, &desc).plan(&iface).unwrap();
        assert_eq!(plan.assoc_types, [("Target".to_string(), desc.ty.clone())]);
        assert_eq!(plan.borrowed, ["Target"]);
    }

    #[test]
    fn borrows_of_other_associated_types_are_forwarded() {
        let fixture = analyze(
            r#"
trait Container {
    type Item;
    fn first(&self) -> &Self::Item;
    fn get(&self, i: usize) -> Option<&Self::Item>;
}
struct Person;
impl Container for Person {
    type Item = String;
    fn first(&self) -> &String { loop {} }
    fn get(&self, i: usize) -> Option<&String> { None }
}
struct Host { person: Person$0 }
"#,
        );
        let plan = plan_of(&fixture, "Container").unwrap();
        assert!(!plan.is_projection());
        assert!(plan.borrowed.is_empty());
        let strategies: Vec<(&str, Strategy)> = plan.methods.iter().map(|m| (m.sig.name.as_str(), m.strategy)).collect();
        assert_eq!(strategies, [("first", Strategy::ForwardCall), ("get", Strategy::ForwardCall)]);

        let def_map = fixture.sema().def_map();
        let module = fixture.selection().module;
        let items: Vec<String> = plan
            .assoc_types
            .iter()
            .map(|(name, ty)| format!("{name} = {}", def_map.render_ty(ty, module)))
            .collect();
        assert_eq!(items, ["Item = <Person as Container>::Item"]);
    }

    #[test]
    fn open_impl_parameters_keep_clear_of_composite_parameters() {
        let fixture = analyze("struct W<U> { items: Vec<U>$0 }");
        let plan = plan_of(&fixture, "PartialEq<Vec<U1>>").unwrap();
        let def_map = fixture.sema().def_map();
        let module = fixture.selection().module;
        let params: Vec<String> = plan
            .generics
            .params
            .iter()
            .map(|p| def_map.render_generic_param(p, module))
            .collect();
        let preds: Vec<String> = plan
            .generics
            .where_predicates
            .iter()
            .map(|p| def_map.render_where_predicate(p, module))
            .collect();
        assert_eq!(params, ["U", "U1"]);
        assert_eq!(preds, ["U: PartialEq<U1>", "Vec<U>: PartialEq<Vec<U1>>"]);
    }

    #[test]
    fn provided_methods_follow_overrides() {
        let fixture = analyze(
            r#"
trait Greet {
    fn name(&self) -> String;
    fn greet(&self) -> String { loop {} }
    fn wave(&self) {}
}
struct Person;
impl Greet for Person {
    fn name(&self) -> String { loop {} }
    fn wave(&self) {}
}
struct Host { person: Person$0 }
"#,
        );
        let plan = plan_of(&fixture, "Greet").unwrap();
        let names: Vec<&str> = plan.methods.iter().map(|m| m.sig.name.as_str()).collect();
        assert_eq!(names, ["name", "wave"]);
    }

    #[test]
    fn by_value_receiver_with_borrowed_self_is_a_partial_move() {
        let fixture = analyze(
            r#"
trait Merge {
    fn merge(self, other: &Self) -> u8;
}
struct Part;
impl Merge for Part {
    fn merge(self, other: &Self) -> u8 { 0 }
}
struct Whole { part: Part$0 }
"#,
        );
        assert_eq!(
            plan_of(&fixture, "Merge"),
            Err(ExclusionReason::PartialMoveError {
                trait_name: "Merge".to_string(),
                method: "merge".to_string(),
                composite: "Whole".to_string(),
            })
        );
    }

    #[test]
    fn drop_is_never_delegated() {
        let fixture = analyze(
            r#"
struct Handle;
impl Drop for Handle {
    fn drop(&mut self) {}
}
struct Owner { handle: Handle$0 }
"#,
        );
        assert_eq!(
            plan_of(&fixture, "Drop"),
            Err(ExclusionReason::UndelegatableMethod {
                trait_name: "Drop".to_string(),
                method: "drop".to_string(),
            })
        );
    }

    #[test]
    fn associated_functions_are_undelegatable() {
        let fixture = analyze(
            r#"
trait Make {
    fn make() -> u8;
    fn id(&self) -> u8;
}
struct Maker;
impl Make for Maker {
    fn make() -> u8 { 0 }
    fn id(&self) -> u8 { 0 }
}
struct Shop { maker: Maker$0 }
"#,
        );
        assert_eq!(
            plan_of(&fixture, "Make"),
            Err(ExclusionReason::UndelegatableMethod {
                trait_name: "Make".to_string(),
                method: "make".to_string(),
            })
        );
    }

    #[test]
    fn generic_fields_add_a_field_bound() {
        let fixture = analyze("struct Wrapper<T: Clone> { items: Vec<T>$0 }");
        let plan = plan_of(&fixture, "IntoIterator").unwrap();
        let def_map = fixture.sema().def_map();
        let module = fixture.selection().module;
        let params: Vec<String> = plan
            .generics
            .params
            .iter()
            .map(|p| def_map.render_generic_param(p, module))
            .collect();
        let preds: Vec<String> = plan
            .generics
            .where_predicates
            .iter()
            .map(|p| def_map.render_where_predicate(p, module))
            .collect();
        assert_eq!(params, ["T: Clone"]);
        assert_eq!(preds, ["Vec<T>: IntoIterator"]);
    }
}
