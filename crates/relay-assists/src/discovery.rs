//! Trait discovery for a resolved field type.

use relay_types::{DefMap, InterfaceImplementation, ModuleId, Semantics, TraitRef};

use crate::error::ExclusionReason;
use crate::resolver::TypeDescriptor;

/// Several direct impls share one (trait, arguments) identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    pub trait_ref: TraitRef,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Delegatable impls, ordered by trait name then rendered arguments
    pub candidates: Vec<InterfaceImplementation>,
    pub ambiguous: Vec<Ambiguity>,
}

impl Discovery {
    pub fn exclusions(&self, def_map: &DefMap, from: ModuleId) -> Vec<ExclusionReason> {
        self.ambiguous
            .iter()
            .map(|amb| ExclusionReason::AmbiguousImplementationError {
                trait_name: def_map.render_trait_ref(&amb.trait_ref, from),
                count: amb.count,
            })
            .collect()
    }
}

/// Lists the traits the field type implements directly and that have something to
/// delegate. `from` is the module generated code will live in; it only affects
/// how arguments are rendered for ordering.
pub fn discover_interfaces(sema: &Semantics, desc: &TypeDescriptor, from: ModuleId) -> Discovery {
    let def_map = sema.def_map();
    let mut found: Vec<InterfaceImplementation> = sema
        .list_direct_interfaces(&desc.ty)
        .into_iter()
        .filter(|iface| {
            if iface.blanket {
                log::trace!("skipping blanket impl of {}", def_map.trait_(iface.trait_id()).name);
            }
            !iface.blanket
        })
        .filter(|iface| has_delegatable_items(def_map, iface))
        .collect();
    found.sort_by_cached_key(|iface| {
        (
            def_map.trait_(iface.trait_id()).name.clone(),
            def_map.render_trait_ref(&iface.trait_ref, from),
            iface.trait_id().index(),
        )
    });

    let mut discovery = Discovery::default();
    let mut found = found.into_iter().peekable();
    while let Some(first) = found.next() {
        let mut count = 1;
        while found.next_if(|next| next.trait_ref == first.trait_ref).is_some() {
            count += 1;
        }
        if count > 1 {
            log::warn!(
                "{count} direct impls of {} for {}",
                def_map.render_trait_ref(&first.trait_ref, from),
                def_map.render_ty(&desc.ty, from)
            );
            discovery.ambiguous.push(Ambiguity {
                trait_ref: first.trait_ref,
                count,
            });
            continue;
        }
        discovery.candidates.push(first);
    }
    log::debug!(
        "discovered {} candidate trait(s) for {}",
        discovery.candidates.len(),
        def_map.render_ty(&desc.ty, from)
    );
    discovery
}

/// Traits with neither instance methods nor associated types are markers.
fn has_delegatable_items(def_map: &DefMap, iface: &InterfaceImplementation) -> bool {
    let data = def_map.trait_(iface.trait_id());
    data.methods().any(|m| m.receiver.is_some()) || data.assoc_types().next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{analyze, descriptor};

    fn simple_names(discovery: &Discovery, sema: &Semantics) -> Vec<String> {
        discovery
            .candidates
            .iter()
            .map(|iface| sema.def_map().trait_(iface.trait_id()).name.clone())
            .collect()
    }

    #[test]
    fn markers_and_blanket_impls_are_left_out() {
        let fixture = analyze("struct W { name: String$0 }");
        let (desc, module) = descriptor(&fixture);
        let names = simple_names(&discover_interfaces(fixture.sema(), &desc, module), fixture.sema());
        assert!(!names.iter().any(|n| n == "Eq"), "{names:?}");
        assert!(!names.iter().any(|n| n == "Default"), "{names:?}");
        assert!(!names.iter().any(|n| n == "ToString"), "{names:?}");
        assert!(names.iter().any(|n| n == "Display"), "{names:?}");
    }

    #[test]
    fn candidates_are_sorted_by_name_then_arguments() {
        let fixture = analyze("struct W { name: String$0 }");
        let (desc, module) = descriptor(&fixture);
        let discovery = discover_interfaces(fixture.sema(), &desc, module);
        let names = simple_names(&discovery, fixture.sema());
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        let as_ref: Vec<String> = discovery
            .candidates
            .iter()
            .map(|iface| fixture.sema().def_map().render_trait_ref(&iface.trait_ref, module))
            .filter(|n| n.starts_with("AsRef"))
            .collect();
        assert_eq!(as_ref, ["AsRef<[u8]>", "AsRef<str>"]);
    }

    #[test]
    fn duplicate_impls_are_reported_as_ambiguous() {
        let fixture = analyze(
            r#"
struct Inner;
trait Speak { fn speak(&self); }
impl Speak for Inner { fn speak(&self) {} }
impl Speak for Inner { fn speak(&self) {} }
struct W { inner: Inner$0 }
"#,
        );
        let (desc, module) = descriptor(&fixture);
        let discovery = discover_interfaces(fixture.sema(), &desc, module);
        assert!(discovery.candidates.is_empty());
        assert_eq!(
            discovery.exclusions(fixture.sema().def_map(), module),
            [ExclusionReason::AmbiguousImplementationError {
                trait_name: "Speak".to_string(),
                count: 2,
            }]
        );
    }
}
