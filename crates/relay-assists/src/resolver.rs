//! Field type resolution.

use relay_types::{GenericContext, Semantics, Ty};

use crate::context::FieldSelection;
use crate::error::AbortReason;

/// A resolved field type together with the composite parameters it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub ty: Ty,
    /// Composite generic parameters appearing free in `ty`, in order of appearance
    pub inherited_params: Vec<String>,
}

impl TypeDescriptor {
    pub fn is_generic(&self) -> bool {
        !self.inherited_params.is_empty()
    }
}

/// Resolves the declared type of the selected field in the composite's own scope.
pub fn resolve_field_type(sema: &Semantics, selection: &FieldSelection) -> Result<TypeDescriptor, AbortReason> {
    let ctx = GenericContext::for_adt(sema.def_map(), selection.adt);
    let ty = sema
        .resolve_type(&selection.type_ref, &ctx)
        .ok_or_else(|| AbortReason::UnresolvedFieldType {
            field: selection.field.to_string(),
            ty: selection.type_ref.to_string(),
        })?;
    let inherited_params = ty
        .free_vars()
        .into_iter()
        .filter(|var| ctx.params.contains(var))
        .collect();
    Ok(TypeDescriptor { ty, inherited_params })
}
