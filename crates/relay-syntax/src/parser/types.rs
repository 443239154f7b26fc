use tree_sitter::Node;

use super::common::{find_child, named_children, node_range, node_text, require_child};
use crate::ast::{GenericArgRef, PathSegment, PathType, TypeRef};
use crate::error::SyntaxError;

/// Parse a type node into a `TypeRef`
pub fn parse_type(node: &Node, source: &str) -> Result<TypeRef, SyntaxError> {
    let ty = match node.kind() {
        "type_identifier" | "identifier" | "primitive_type" | "self" | "metavariable" => {
            let text = node_text(node, source)?;
            if text == "_" {
                TypeRef::Infer
            } else {
                TypeRef::Path(PathType::single(text))
            }
        }
        "scoped_type_identifier" | "scoped_identifier" | "generic_type" => {
            TypeRef::Path(parse_path(node, source)?)
        }
        "reference_type" => TypeRef::Ref {
            lifetime: lifetime_child(node, source)?,
            mutable: find_child(node, "mutable_specifier").is_some(),
            inner: Box::new(parse_type_field(node, "type", source)),
        },
        "pointer_type" => TypeRef::Ptr {
            mutable: find_child(node, "mutable_specifier").is_some(),
            inner: Box::new(parse_type_field(node, "type", source)),
        },
        "tuple_type" => TypeRef::Tuple(
            named_children(node)
                .iter()
                .map(|elem| parse_type(elem, source))
                .collect::<Result<_, _>>()?,
        ),
        "unit_type" => TypeRef::Tuple(Vec::new()),
        "array_type" => {
            let element = Box::new(parse_type_field(node, "element", source));
            match node.child_by_field_name("length") {
                Some(len) => TypeRef::Array(element, node_text(&len, source)?.to_string()),
                None => TypeRef::Slice(element),
            }
        }
        "never_type" => TypeRef::Never,
        "dynamic_type" | "abstract_type" | "function_type" | "bounded_type" | "macro_invocation" => {
            TypeRef::Opaque(node_text(node, source)?.to_string())
        }
        _ => {
            let text = node_text(node, source)?;
            if text.trim() == "_" {
                TypeRef::Infer
            } else {
                TypeRef::Error(text.to_string())
            }
        }
    };
    Ok(ty)
}

/// Parse the type stored under `field`, degrading to `TypeRef::Error` instead of failing.
/// Field and parameter types are always recorded, even when they cannot be understood.
pub fn parse_type_field(node: &Node, field: &str, source: &str) -> TypeRef {
    match node.child_by_field_name(field) {
        Some(ty) => parse_type(&ty, source).unwrap_or_else(|err| {
            log::debug!("unparsable type: {err}");
            TypeRef::Error(node_text(&ty, source).unwrap_or_default().to_string())
        }),
        None => TypeRef::Error(String::new()),
    }
}

/// Parse a path such as `std::collections::HashMap<K, V>` into segments
pub fn parse_path(node: &Node, source: &str) -> Result<PathType, SyntaxError> {
    let mut segments = Vec::new();
    parse_path_into(node, source, &mut segments)?;
    Ok(PathType { segments })
}

fn parse_path_into(node: &Node, source: &str, segments: &mut Vec<PathSegment>) -> Result<(), SyntaxError> {
    match node.kind() {
        "generic_type" => {
            let base = require_child(node, "type", "generic type")?;
            parse_path_into(&base, source, segments)?;
            let args = match node.child_by_field_name("type_arguments") {
                Some(args) => parse_type_arguments(&args, source)?,
                None => Vec::new(),
            };
            if let Some(last) = segments.last_mut() {
                last.args = args;
            }
            Ok(())
        }
        "scoped_type_identifier" | "scoped_identifier" => {
            if let Some(prefix) = node.child_by_field_name("path") {
                parse_path_into(&prefix, source, segments)?;
            }
            let name = require_child(node, "name", "path")?;
            segments.push(PathSegment {
                name: node_text(&name, source)?.to_string(),
                args: Vec::new(),
            });
            Ok(())
        }
        "type_identifier" | "identifier" | "primitive_type" | "self" | "super" | "crate" | "metavariable" => {
            segments.push(PathSegment {
                name: node_text(node, source)?.to_string(),
                args: Vec::new(),
            });
            Ok(())
        }
        other => Err(SyntaxError::NodeError {
            message: format!("Unsupported path segment kind: {}", other),
            span: Some(node_range(node).into()),
            node_type: other.to_string(),
        }),
    }
}

/// Parse `<T, 'a, Item = U, 3>`
pub fn parse_type_arguments(node: &Node, source: &str) -> Result<Vec<GenericArgRef>, SyntaxError> {
    let mut args = Vec::new();
    for child in named_children(node) {
        let arg = match child.kind() {
            "lifetime" => GenericArgRef::Lifetime(node_text(&child, source)?.to_string()),
            "type_binding" => {
                let name = require_child(&child, "name", "type binding")?;
                GenericArgRef::Binding {
                    name: node_text(&name, source)?.to_string(),
                    ty: parse_type_field(&child, "type", source),
                }
            }
            // Bounds on generic associated type arguments are not modelled.
            "trait_bounds" => continue,
            "block" | "integer_literal" | "boolean_literal" | "char_literal" | "string_literal"
            | "float_literal" | "negative_literal" => {
                GenericArgRef::Const(node_text(&child, source)?.to_string())
            }
            _ => GenericArgRef::Type(parse_type(&child, source)?),
        };
        args.push(arg);
    }
    Ok(args)
}

fn lifetime_child(node: &Node, source: &str) -> Result<Option<String>, SyntaxError> {
    find_child(node, "lifetime")
        .map(|lt| node_text(&lt, source).map(str::to_string))
        .transpose()
}
