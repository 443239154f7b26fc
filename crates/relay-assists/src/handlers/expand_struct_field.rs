//! Replaces a struct-typed field by the fields of that struct.
//!
//! ```text
//! struct Point { x: i32, y: i32 }
//! struct Line {
//!     pub start: Point$0,
//!     end: Point,
//! }
//! ```
//! becomes
//! ```text
//! struct Line {
//!     pub start_x: i32,
//!     pub start_y: i32,
//!     end: Point,
//! }
//! ```
//! when run on `start`. Fields of the source struct that the composite's module cannot
//! see are left out; if none are visible the assist does not apply.

use relay_syntax::ast::{FieldName, StructShape, Visibility};
use relay_types::{AdtKind, GenericContext, ModuleDef, Substitution, Ty};

use crate::context::{AssistContext, FieldTarget};
use crate::edit::{EditPlan, TextEdit};
use crate::error::ExpandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandOutcome {
    pub plan: EditPlan,
    /// Names of the fields that replace the expanded one, in declaration order
    pub fields: Vec<String>,
}

pub fn expand_struct_field(ctx: &AssistContext, target: &FieldTarget) -> Result<ExpandOutcome, ExpandError> {
    let sema = ctx.sema();
    let def_map = sema.def_map();
    let selection = ctx.select_field(target).ok_or(ExpandError::NoFieldUnderCursor)?;
    let FieldName::Named(field_name) = &selection.field else {
        return Err(ExpandError::NoFieldUnderCursor);
    };

    let generic_ctx = GenericContext::for_adt(def_map, selection.adt);
    let not_a_struct = || ExpandError::NotAStruct {
        ty: selection.type_ref.to_string(),
    };
    let Some(Ty::Adt { id, args }) = sema.resolve_type(&selection.type_ref, &generic_ctx) else {
        return Err(not_a_struct());
    };
    let source = def_map.adt(id);
    let source_path = def_map.def_path(ModuleDef::Adt(id));
    match source.kind {
        AdtKind::Enum => return Err(not_a_struct()),
        AdtKind::Struct(StructShape::Unit) => return Err(ExpandError::UnitStruct { ty: source_path }),
        AdtKind::Struct(_) => {}
    }
    if !def_map.is_visible_from(&source.visibility, source.module, selection.module) {
        return Err(ExpandError::NotVisible {
            ty: source_path,
            composite: selection.composite.clone(),
        });
    }

    let subst = Substitution::from_pairs(source.generics.names(), &args);
    let visibility = &def_map.adt(selection.adt).fields[selection.field_index].visibility;
    let prefix = match visibility {
        Visibility::Private => String::new(),
        vis => format!("{vis} "),
    };
    let mut names = Vec::new();
    let mut declarations = Vec::new();
    for field in &source.fields {
        if !def_map.is_visible_from(&field.visibility, source.module, selection.module) {
            log::debug!("skipping {source_path}.{}, not visible from {}", field.name, selection.composite);
            continue;
        }
        let name = format!("{field_name}_{}", field.name);
        let ty = def_map.render_ty(&field.ty.subst(&subst), selection.module);
        declarations.push(format!("{prefix}{name}: {ty}"));
        names.push(name);
    }
    if declarations.is_empty() {
        return Err(ExpandError::NoVisibleFields {
            ty: source_path,
            composite: selection.composite.clone(),
        });
    }
    ctx.check_snapshot()?;

    // A field sharing its line with the struct header keeps the new fields on that line.
    let start = selection.range.start();
    let before = &ctx.text()[..start];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let separator = if before[line_start..].trim().is_empty() {
        format!(",\n{}", ctx.indent_at(start))
    } else {
        ", ".to_string()
    };
    let plan = EditPlan::from_iter([TextEdit::replace(selection.range, declarations.join(&separator))]);
    log::info!("expanded {}.{field_name} into {} field(s)", selection.composite, names.len());
    Ok(ExpandOutcome { plan, fields: names })
}
