//! The delegate assist as one run over a snapshot.
//!
//! A run moves through the stages below in order. Between stages the snapshot token
//! is checked, and a run that notices the document moved on stops with
//! [`AbortReason::SnapshotStale`]. Nothing is emitted unless the run reaches
//! [`Stage::Emitted`]; the returned [`EditPlan`] is applied by the caller in one step.
//!
//! Per-trait failures never stop the run. They are collected as [`ExclusionReason`]s
//! and reported next to the edits, or attached to
//! [`AbortReason::NoDelegatableInterfaces`] when nothing is left.

use std::fmt;

use relay_types::{InterfaceImplementation, ModuleDef, ModuleId, Semantics, TraitId, TraitRef};

use crate::conflicts::filter_conflicts;
use crate::context::{AssistContext, FieldSelection, FieldTarget};
use crate::discovery::{discover_interfaces, Ambiguity, Discovery};
use crate::edit::EditPlan;
use crate::error::{AbortReason, AssistResult, ExclusionReason};
use crate::planner::{check_borrowed_targets, check_supertraits, Planner};
use crate::resolver::{resolve_field_type, TypeDescriptor};
use crate::synth::{GeneratedImplementation, Synthesizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    ContextResolved,
    TypeResolved,
    CandidatesDiscovered,
    ConflictsFiltered,
    Planned,
    Synthesized,
    Emitted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ContextResolved => "context resolved",
            Stage::TypeResolved => "type resolved",
            Stage::CandidatesDiscovered => "candidates discovered",
            Stage::ConflictsFiltered => "conflicts filtered",
            Stage::Planned => "planned",
            Stage::Synthesized => "synthesized",
            Stage::Emitted => "emitted",
        };
        f.write_str(name)
    }
}

/// What to delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateRequest {
    pub target: FieldTarget,
    /// Traits to generate, by name (`Deref`, `std::ops::Deref`, `AsRef<str>`).
    /// Empty means every discovered trait.
    pub traits: Vec<String>,
}

impl DelegateRequest {
    pub fn new(target: FieldTarget) -> Self {
        DelegateRequest {
            target,
            traits: Vec::new(),
        }
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }
}

/// A successful run: edits to apply plus the traits that were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateOutcome {
    pub plan: EditPlan,
    pub generated: Vec<GeneratedImplementation>,
    pub exclusions: Vec<ExclusionReason>,
}

/// Discovery results for a field without generating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitReport {
    pub composite: String,
    pub field_ty: String,
    /// Traits that would be generated by a default run, rendered as in the impl header
    pub candidates: Vec<String>,
    pub exclusions: Vec<ExclusionReason>,
}

struct Run<'a> {
    ctx: &'a AssistContext,
    stage: Stage,
}

impl<'a> Run<'a> {
    fn new(ctx: &'a AssistContext) -> Self {
        Run { ctx, stage: Stage::Idle }
    }

    fn advance(&mut self, next: Stage) -> AssistResult<()> {
        if let Err(stale) = self.ctx.check_snapshot() {
            log::debug!("snapshot went stale after stage `{}`", self.stage);
            return Err(stale.into());
        }
        log::debug!("delegate: {} -> {}", self.stage, next);
        self.stage = next;
        Ok(())
    }
}

/// Runs the delegate assist for one field.
pub fn delegate_field(ctx: &AssistContext, request: &DelegateRequest) -> AssistResult<DelegateOutcome> {
    let mut run = Run::new(ctx);
    let sema = ctx.sema();
    let def_map = sema.def_map();

    let selection = ctx
        .select_field(&request.target)
        .ok_or(AbortReason::NoFieldUnderCursor)?;
    run.advance(Stage::ContextResolved)?;

    let desc = resolve_field_type(sema, &selection)?;
    run.advance(Stage::TypeResolved)?;

    let discovery = discover_interfaces(sema, &desc, selection.module);
    let mut exclusions = Vec::new();
    let candidates = if request.traits.is_empty() {
        exclusions.extend(discovery.exclusions(def_map, selection.module));
        let (kept, skipped): (Vec<_>, Vec<_>) = discovery
            .candidates
            .into_iter()
            .partition(|iface| !ctx.config().skips(&def_map.def_path(ModuleDef::Trait(iface.trait_id()))));
        for iface in skipped {
            let reason = ExclusionReason::Skipped {
                trait_name: def_map.render_trait_ref(&iface.trait_ref, selection.module),
            };
            log::debug!("{reason}");
            exclusions.push(reason);
        }
        kept
    } else {
        select_requested(sema, &selection, &desc, discovery, &request.traits, &mut exclusions)
    };
    run.advance(Stage::CandidatesDiscovered)?;

    let (candidates, conflicts) = filter_conflicts(sema, &selection, candidates);
    exclusions.extend(conflicts);
    run.advance(Stage::ConflictsFiltered)?;

    let planner = Planner::new(sema, &selection, &desc);
    let mut plans = Vec::with_capacity(candidates.len());
    for iface in &candidates {
        match planner.plan(iface) {
            Ok(plan) => plans.push(plan),
            Err(reason) => {
                log::warn!("{reason}");
                exclusions.push(reason);
            }
        }
    }
    let (plans, unsatisfied) = check_supertraits(sema, &selection, plans);
    exclusions.extend(unsatisfied);
    let (plans, mismatched) = check_borrowed_targets(sema, &selection, &desc, plans);
    exclusions.extend(mismatched);
    if plans.is_empty() {
        return Err(AbortReason::NoDelegatableInterfaces {
            composite: selection.composite.clone(),
            ty: def_map.render_ty(&desc.ty, selection.module),
            exclusions,
        });
    }
    run.advance(Stage::Planned)?;

    let synthesizer = Synthesizer::new(def_map, &selection, ctx.config());
    let (plan, generated) = synthesizer.synthesize(&plans, ctx.indent_at(selection.item_range.start()));
    run.advance(Stage::Synthesized)?;

    run.advance(Stage::Emitted)?;
    log::info!(
        "generated {} impl(s) for {}, {} trait(s) excluded",
        generated.len(),
        selection.composite,
        exclusions.len()
    );
    Ok(DelegateOutcome {
        plan,
        generated,
        exclusions,
    })
}

/// Runs the assist up to conflict filtering and reports what a default run would do.
pub fn list_traits(ctx: &AssistContext, target: &FieldTarget) -> AssistResult<TraitReport> {
    let sema = ctx.sema();
    let def_map = sema.def_map();
    let selection = ctx.select_field(target).ok_or(AbortReason::NoFieldUnderCursor)?;
    let desc = resolve_field_type(sema, &selection)?;
    let discovery = discover_interfaces(sema, &desc, selection.module);
    let mut exclusions = discovery.exclusions(def_map, selection.module);
    let (kept, conflicts) = filter_conflicts(sema, &selection, discovery.candidates);
    exclusions.extend(conflicts);
    ctx.check_snapshot()?;
    Ok(TraitReport {
        composite: selection.composite.clone(),
        field_ty: def_map.render_ty(&desc.ty, selection.module),
        candidates: kept
            .iter()
            .map(|iface| def_map.render_trait_ref(&iface.trait_ref, selection.module))
            .collect(),
        exclusions,
    })
}

/// Narrows discovery to explicitly requested traits. A requested trait the field type
/// does not implement is still offered from its declaration, which only plans when
/// every item can borrow the field directly.
fn select_requested(
    sema: &Semantics,
    selection: &FieldSelection,
    desc: &TypeDescriptor,
    discovery: Discovery,
    requested: &[String],
    exclusions: &mut Vec<ExclusionReason>,
) -> Vec<InterfaceImplementation> {
    let def_map = sema.def_map();
    let from = selection.module;
    let Discovery {
        mut candidates,
        ambiguous,
    } = discovery;
    let mut selected = Vec::new();
    for text in requested {
        let path = text.split('<').next().unwrap_or(text);
        let Some(trait_id) = sema.find_trait(path, from) else {
            exclusions.push(ExclusionReason::NotImplementedByField {
                trait_name: text.clone(),
                ty: def_map.render_ty(&desc.ty, from),
            });
            continue;
        };
        let wanted = |trait_ref: &TraitRef| request_matches(sema, trait_ref, trait_id, text, from);

        let mut found = false;
        for amb in ambiguous.iter().filter(|amb: &&Ambiguity| wanted(&amb.trait_ref)) {
            found = true;
            exclusions.push(ExclusionReason::AmbiguousImplementationError {
                trait_name: def_map.render_trait_ref(&amb.trait_ref, from),
                count: amb.count,
            });
        }
        let (hits, rest): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|iface| wanted(&iface.trait_ref));
        candidates = rest;
        found |= !hits.is_empty();
        selected.extend(hits);
        if found || selected.iter().any(|iface| iface.trait_id() == trait_id) {
            continue;
        }

        match sema.declared_interface(trait_id, &desc.ty) {
            Some(iface) => {
                log::debug!("{text} is not implemented by the field, planning from its declaration");
                selected.push(iface);
            }
            None => exclusions.push(ExclusionReason::NotImplementedByField {
                trait_name: text.clone(),
                ty: def_map.render_ty(&desc.ty, from),
            }),
        }
    }
    selected
}

/// `AsRef` matches every `AsRef<..>` impl, `AsRef<str>` only the one with those arguments.
fn request_matches(sema: &Semantics, trait_ref: &TraitRef, trait_id: TraitId, text: &str, from: ModuleId) -> bool {
    if trait_ref.trait_id != trait_id {
        return false;
    }
    let Some(start) = text.find('<') else {
        return true;
    };
    let rendered = sema.def_map().render_trait_ref(trait_ref, from);
    let rendered_args = rendered.find('<').map_or("", |i| &rendered[i..]);
    strip_whitespace(rendered_args) == strip_whitespace(&text[start..])
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
