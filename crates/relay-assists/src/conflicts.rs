//! Removes candidates the composite already implements.

use relay_types::{InterfaceImplementation, Semantics};

use crate::context::FieldSelection;
use crate::error::ExclusionReason;

/// Splits `candidates` into those still free on the composite and an exclusion for
/// each one an existing impl already covers.
pub fn filter_conflicts(
    sema: &Semantics,
    selection: &FieldSelection,
    candidates: Vec<InterfaceImplementation>,
) -> (Vec<InterfaceImplementation>, Vec<ExclusionReason>) {
    let def_map = sema.def_map();
    let mut kept = Vec::with_capacity(candidates.len());
    let mut excluded = Vec::new();
    for candidate in candidates {
        if sema.interface_already_implemented(selection.adt, &candidate.trait_ref) {
            let trait_name = def_map.render_trait_ref(&candidate.trait_ref, selection.module);
            log::debug!("{} already implements {trait_name}", selection.composite);
            excluded.push(ExclusionReason::AlreadyImplemented {
                trait_name,
                composite: selection.composite.clone(),
            });
        } else {
            kept.push(candidate);
        }
    }
    (kept, excluded)
}
