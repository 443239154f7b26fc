use tree_sitter::Node;

use super::common::{
    find_child, has_token, named_children, node_range, node_text, parse_visibility, require_child,
    require_name, visibility_from_text,
};
use super::generics::{parse_bounds, parse_generics};
use super::types::{parse_path, parse_type_field};
use crate::ast::*;
use crate::error::SyntaxError;
use relay_source::TextRange;

/// Parse every item directly below `node` (a `source_file` or a module `declaration_list`).
///
/// Items that fail to lower are reported in `errors` and skipped; their siblings are
/// still returned.
pub fn parse_items(node: &Node, source: &str, errors: &mut Vec<SyntaxError>) -> Vec<Item> {
    let mut items = Vec::new();
    for child in named_children(node) {
        match parse_item(&child, source, errors) {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(err) => {
                log::debug!("skipping item at {:?}: {}", node_range(&child), err);
                errors.push(err);
            }
        }
    }
    items
}

fn parse_item(node: &Node, source: &str, errors: &mut Vec<SyntaxError>) -> Result<Option<Item>, SyntaxError> {
    let kind = match node.kind() {
        "struct_item" => ItemKind::Struct(parse_struct(node, source)?),
        "enum_item" => ItemKind::Enum(EnumDef {
            name: require_name(node, source, "enum")?,
            generics: parse_generics(node, source)?,
        }),
        "trait_item" => ItemKind::Trait(parse_trait(node, source)?),
        "impl_item" => ItemKind::Impl(parse_impl(node, source)?),
        "mod_item" => {
            let name = require_name(node, source, "module")?;
            // `mod foo;` declarations are satisfied by the crate's file list.
            let Some(body) = node.child_by_field_name("body") else {
                return Ok(None);
            };
            ItemKind::Module(ModuleDef {
                name,
                items: parse_items(&body, source, errors),
            })
        }
        "use_declaration" => {
            let argument = require_child(node, "argument", "use declaration")?;
            let mut imports = Vec::new();
            parse_use_tree(&argument, source, &[], &mut imports)?;
            ItemKind::Use(imports)
        }
        _ => return Ok(None),
    };
    Ok(Some(Item {
        kind,
        visibility: parse_visibility(node, source)?,
        range: node_range(node),
    }))
}

fn parse_struct(node: &Node, source: &str) -> Result<StructDef, SyntaxError> {
    let name = require_name(node, source, "struct")?;
    let generics = parse_generics(node, source)?;
    let (shape, fields) = match node.child_by_field_name("body") {
        Some(body) if body.kind() == "field_declaration_list" => {
            (StructShape::Record, parse_record_fields(&body, source)?)
        }
        Some(body) => (StructShape::Tuple, parse_tuple_fields(&body, source)?),
        None => (StructShape::Unit, Vec::new()),
    };
    Ok(StructDef {
        name,
        generics,
        shape,
        fields,
    })
}

fn parse_record_fields(body: &Node, source: &str) -> Result<Vec<FieldDef>, SyntaxError> {
    named_children(body)
        .iter()
        .filter(|child| child.kind() == "field_declaration")
        .map(|field| {
            Ok(FieldDef {
                name: FieldName::Named(require_name(field, source, "field")?),
                ty: parse_type_field(field, "type", source),
                visibility: parse_visibility(field, source)?,
                range: node_range(field),
            })
        })
        .collect()
}

// Tuple fields are not wrapped in their own node; a visibility modifier belongs to
// the `type` field that follows it.
fn parse_tuple_fields(body: &Node, source: &str) -> Result<Vec<FieldDef>, SyntaxError> {
    let mut fields = Vec::new();
    let mut pending: Option<(Visibility, usize)> = None;
    let mut cursor = body.walk();
    if !cursor.goto_first_child() {
        return Ok(fields);
    }
    loop {
        let child = cursor.node();
        if child.kind() == "visibility_modifier" {
            let vis = visibility_from_text(node_text(&child, source)?).unwrap_or_default();
            pending = Some((vis, child.start_byte()));
        } else if cursor.field_name() == Some("type") {
            let (visibility, start) = pending.take().unwrap_or((Visibility::Private, child.start_byte()));
            let ty = super::types::parse_type(&child, source)
                .unwrap_or_else(|_| TypeRef::Error(node_text(&child, source).unwrap_or_default().to_string()));
            fields.push(FieldDef {
                name: FieldName::Index(fields.len()),
                ty,
                visibility,
                range: TextRange::new(start, child.end_byte()),
            });
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
    Ok(fields)
}

fn parse_trait(node: &Node, source: &str) -> Result<TraitDef, SyntaxError> {
    let supertraits = match node.child_by_field_name("bounds") {
        Some(bounds) => parse_bounds(&bounds, source)?,
        None => Vec::new(),
    };
    let body = require_child(node, "body", "trait")?;
    Ok(TraitDef {
        name: require_name(node, source, "trait")?,
        generics: parse_generics(node, source)?,
        supertraits,
        items: parse_assoc_items(&body, source)?,
        is_unsafe: has_token(node, "unsafe"),
    })
}

fn parse_impl(node: &Node, source: &str) -> Result<ImplDef, SyntaxError> {
    let trait_ref = match node.child_by_field_name("trait") {
        Some(t) => Some(parse_path(&t, source)?),
        None => None,
    };
    let items = match node.child_by_field_name("body") {
        Some(body) => parse_assoc_items(&body, source)?,
        None => Vec::new(),
    };
    Ok(ImplDef {
        generics: parse_generics(node, source)?,
        trait_ref,
        negative: has_token(node, "!"),
        self_ty: parse_type_field(node, "type", source),
        items,
        is_unsafe: has_token(node, "unsafe"),
    })
}

fn parse_assoc_items(body: &Node, source: &str) -> Result<Vec<AssocItem>, SyntaxError> {
    let mut items = Vec::new();
    for child in named_children(body) {
        let item = match child.kind() {
            "function_item" | "function_signature_item" => AssocItem::Fn(parse_fn(&child, source)?),
            "associated_type" => {
                let bounds = match child.child_by_field_name("bounds") {
                    Some(bounds) => parse_bounds(&bounds, source)?,
                    None => Vec::new(),
                };
                let ty = child
                    .child_by_field_name("type")
                    .map(|_| parse_type_field(&child, "type", source));
                AssocItem::Type(AssocTypeDef {
                    name: require_name(&child, source, "associated type")?,
                    bounds,
                    ty,
                })
            }
            "type_item" => AssocItem::Type(AssocTypeDef {
                name: require_name(&child, source, "associated type")?,
                bounds: Vec::new(),
                ty: Some(parse_type_field(&child, "type", source)),
            }),
            "const_item" => AssocItem::Const(AssocConstDef {
                name: require_name(&child, source, "associated const")?,
                ty: child
                    .child_by_field_name("type")
                    .map(|_| parse_type_field(&child, "type", source)),
                has_value: child.child_by_field_name("value").is_some(),
            }),
            _ => continue,
        };
        items.push(item);
    }
    Ok(items)
}

fn parse_fn(node: &Node, source: &str) -> Result<FnSig, SyntaxError> {
    let parameters = require_child(node, "parameters", "function")?;
    let (self_param, params) = parse_parameters(&parameters, source)?;
    let modifiers = find_child(node, "function_modifiers");
    Ok(FnSig {
        name: require_name(node, source, "function")?,
        generics: parse_generics(node, source)?,
        self_param,
        params,
        ret: node
            .child_by_field_name("return_type")
            .map(|_| parse_type_field(node, "return_type", source)),
        has_body: node.kind() == "function_item",
        is_unsafe: modifiers.is_some_and(|m| has_token(&m, "unsafe")),
        is_async: modifiers.is_some_and(|m| has_token(&m, "async")),
    })
}

fn parse_parameters(node: &Node, source: &str) -> Result<(Option<SelfParam>, Vec<Param>), SyntaxError> {
    let mut self_param = None;
    let mut params = Vec::new();
    for child in named_children(node) {
        match child.kind() {
            "self_parameter" => {
                let mutable = find_child(&child, "mutable_specifier").is_some();
                self_param = Some(if has_token(&child, "&") {
                    let lifetime = find_child(&child, "lifetime")
                        .map(|lt| node_text(&lt, source).map(str::to_string))
                        .transpose()?;
                    SelfParam::Ref { lifetime, mutable }
                } else {
                    SelfParam::Value { mutable }
                });
            }
            "parameter" => {
                let pattern = require_child(&child, "pattern", "parameter")?;
                let pattern = node_text(&pattern, source)?.to_string();
                let ty = parse_type_field(&child, "type", source);
                if pattern == "self" {
                    self_param = Some(SelfParam::Typed(ty));
                } else {
                    params.push(Param { pattern, ty });
                }
            }
            "variadic_parameter" => {}
            // Anonymous parameters: `fn f(u8);`
            _ => params.push(Param {
                pattern: "_".to_string(),
                ty: super::types::parse_type(&child, source)?,
            }),
        }
    }
    Ok((self_param, params))
}

fn parse_use_tree(
    node: &Node,
    source: &str,
    prefix: &[String],
    out: &mut Vec<UseImport>,
) -> Result<(), SyntaxError> {
    match node.kind() {
        "use_list" => {
            for child in named_children(node) {
                parse_use_tree(&child, source, prefix, out)?;
            }
        }
        "scoped_use_list" => {
            let mut base = prefix.to_vec();
            if let Some(path) = node.child_by_field_name("path") {
                base.extend(path_segments(&path, source)?);
            }
            let list = require_child(node, "list", "use list")?;
            parse_use_tree(&list, source, &base, out)?;
        }
        "use_as_clause" => {
            let path = require_child(node, "path", "use alias")?;
            let alias = require_child(node, "alias", "use alias")?;
            let mut full = prefix.to_vec();
            full.extend(path_segments(&path, source)?);
            out.push(UseImport {
                path: full,
                alias: Some(node_text(&alias, source)?.to_string()),
                glob: false,
            });
        }
        "use_wildcard" => {
            let text = node_text(node, source)?;
            let mut full = prefix.to_vec();
            full.extend(split_path(text.trim_end_matches('*')));
            out.push(UseImport {
                path: full,
                alias: None,
                glob: true,
            });
        }
        _ => {
            let mut full = prefix.to_vec();
            full.extend(path_segments(node, source)?);
            // `use a::{self}` binds `a`
            if full.len() > 1 && full.last().is_some_and(|s| s == "self") {
                full.pop();
            }
            out.push(UseImport {
                path: full,
                alias: None,
                glob: false,
            });
        }
    }
    Ok(())
}

fn path_segments(node: &Node, source: &str) -> Result<Vec<String>, SyntaxError> {
    Ok(split_path(node_text(node, source)?))
}

fn split_path(text: &str) -> Vec<String> {
    text.split("::")
        .map(|seg| seg.trim())
        .filter(|seg| !seg.is_empty())
        .map(str::to_string)
        .collect()
}
