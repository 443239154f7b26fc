use tree_sitter::Node;

use super::common::{find_child, named_children, node_range, node_text, require_child};
use super::types::{parse_path, parse_type};
use crate::ast::{Bound, GenericParam, GenericParamKind, Generics, PathType, WherePredicate, WhereTarget};
use crate::error::SyntaxError;

/// Parse the `type_parameters` field and the where clause of an item
pub fn parse_generics(node: &Node, source: &str) -> Result<Generics, SyntaxError> {
    let params = match node.child_by_field_name("type_parameters") {
        Some(tp) => named_children(&tp)
            .iter()
            .map(|param| parse_generic_param(param, source))
            .collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    let where_predicates = match find_child(node, "where_clause") {
        Some(clause) => parse_where_clause(&clause, source)?,
        None => Vec::new(),
    };
    Ok(Generics {
        params,
        where_predicates,
    })
}

// Covers both the older grammar (`constrained_type_parameter`, `optional_type_parameter`)
// and the newer one (`type_parameter`, `lifetime_parameter`).
fn parse_generic_param(node: &Node, source: &str) -> Result<GenericParam, SyntaxError> {
    let bounds = match node.child_by_field_name("bounds") {
        Some(bounds) => parse_bounds(&bounds, source)?,
        None => Vec::new(),
    };
    let param = match node.kind() {
        "lifetime" => GenericParam {
            name: node_text(node, source)?.to_string(),
            kind: GenericParamKind::Lifetime,
            bounds,
        },
        "lifetime_parameter" => {
            let name = node
                .child_by_field_name("name")
                .or_else(|| find_child(node, "lifetime"))
                .unwrap_or(*node);
            GenericParam {
                name: node_text(&name, source)?.to_string(),
                kind: GenericParamKind::Lifetime,
                bounds,
            }
        }
        "const_parameter" => {
            let name = require_child(node, "name", "const parameter")?;
            let ty = require_child(node, "type", "const parameter")?;
            GenericParam {
                name: node_text(&name, source)?.to_string(),
                kind: GenericParamKind::Const {
                    ty: parse_type(&ty, source)?,
                },
                bounds,
            }
        }
        "type_identifier" => GenericParam {
            name: node_text(node, source)?.to_string(),
            kind: GenericParamKind::Type { default: None },
            bounds,
        },
        "constrained_type_parameter" => {
            let left = require_child(node, "left", "type parameter")?;
            let kind = if left.kind() == "lifetime" {
                GenericParamKind::Lifetime
            } else {
                GenericParamKind::Type { default: None }
            };
            GenericParam {
                name: node_text(&left, source)?.to_string(),
                kind,
                bounds,
            }
        }
        "optional_type_parameter" => {
            let name = require_child(node, "name", "type parameter")?;
            let mut param = parse_generic_param(&name, source)?;
            let default = match node.child_by_field_name("default_type") {
                Some(ty) => Some(parse_type(&ty, source)?),
                None => None,
            };
            param.kind = GenericParamKind::Type { default };
            param
        }
        "type_parameter" => {
            let name = require_child(node, "name", "type parameter")?;
            let default = match node.child_by_field_name("default_type") {
                Some(ty) => Some(parse_type(&ty, source)?),
                None => None,
            };
            GenericParam {
                name: node_text(&name, source)?.to_string(),
                kind: GenericParamKind::Type { default },
                bounds,
            }
        }
        other => {
            return Err(SyntaxError::NodeError {
                message: format!("Unsupported generic parameter kind: {}", other),
                span: Some(node_range(node).into()),
                node_type: other.to_string(),
            })
        }
    };
    Ok(param)
}

/// Parse a `trait_bounds` node (`: Clone + 'a + ?Sized`)
pub fn parse_bounds(node: &Node, source: &str) -> Result<Vec<Bound>, SyntaxError> {
    let mut bounds = Vec::new();
    for child in named_children(node) {
        let bound = match child.kind() {
            "lifetime" => Bound::Lifetime(node_text(&child, source)?.to_string()),
            "removed_trait_bound" => match named_children(&child).first() {
                Some(inner) => Bound::Maybe(parse_path(inner, source)?),
                None => Bound::Verbatim(node_text(&child, source)?.to_string()),
            },
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                Bound::Trait(parse_path(&child, source)?)
            }
            _ => {
                let text = node_text(&child, source)?;
                match text.strip_prefix('?') {
                    Some(rest) => Bound::Maybe(PathType::single(rest.trim())),
                    None => Bound::Verbatim(text.to_string()),
                }
            }
        };
        bounds.push(bound);
    }
    Ok(bounds)
}

fn parse_where_clause(node: &Node, source: &str) -> Result<Vec<WherePredicate>, SyntaxError> {
    let mut predicates = Vec::new();
    for predicate in named_children(node) {
        if predicate.kind() != "where_predicate" {
            continue;
        }
        let left = require_child(&predicate, "left", "where predicate")?;
        let target = if left.kind() == "lifetime" {
            WhereTarget::Lifetime(node_text(&left, source)?.to_string())
        } else {
            WhereTarget::Type(parse_type(&left, source)?)
        };
        let bounds = match predicate.child_by_field_name("bounds") {
            Some(bounds) => parse_bounds(&bounds, source)?,
            None => Vec::new(),
        };
        predicates.push(WherePredicate { target, bounds });
    }
    Ok(predicates)
}
