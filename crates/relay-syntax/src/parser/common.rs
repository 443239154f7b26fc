use relay_source::TextRange;
use tree_sitter::Node;

use crate::ast::{Name, Visibility};
use crate::error::SyntaxError;

/// Creates a TextRange from a Node's byte range
pub fn node_range(node: &Node) -> TextRange {
    TextRange::new(node.start_byte(), node.end_byte())
}

/// Extracts text from a Node, handling UTF-8 conversion and errors
pub fn node_text<'s>(node: &Node, source: &'s str) -> Result<&'s str, SyntaxError> {
    node.utf8_text(source.as_bytes())
        .map_err(|e| SyntaxError::NodeError {
            message: format!("Invalid UTF-8 in node text: {}", e),
            span: Some(node_range(node).into()),
            node_type: node.kind().to_string(),
        })
}

/// Gets a required child by field name, failing with a node error that names the parent
pub fn require_child<'t>(node: &Node<'t>, field: &str, parent: &str) -> Result<Node<'t>, SyntaxError> {
    node.child_by_field_name(field).ok_or_else(|| SyntaxError::NodeError {
        message: format!("Missing '{}' in {}", field, parent),
        span: Some(node_range(node).into()),
        node_type: node.kind().to_string(),
    })
}

/// Reads a name field (`name` by default) into a `Name`
pub fn require_name(node: &Node, source: &str, parent: &str) -> Result<Name, SyntaxError> {
    let name_node = require_child(node, "name", parent)?;
    Ok(Name {
        text: node_text(&name_node, source)?.to_string(),
        range: node_range(&name_node),
    })
}

/// All named children, skipping attributes and comments
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_trivia(child))
        .collect()
}

/// Finds the first direct child (named or anonymous) of the given kind
pub fn find_child<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Whether a direct anonymous token such as `!` or `unsafe` is present
pub fn has_token(node: &Node, token: &str) -> bool {
    find_child(node, token).is_some()
}

pub fn is_trivia(node: &Node) -> bool {
    matches!(
        node.kind(),
        "attribute_item" | "inner_attribute_item" | "line_comment" | "block_comment"
    )
}

/// Parses a `visibility_modifier` child of `node`, if present
pub fn parse_visibility(node: &Node, source: &str) -> Result<Visibility, SyntaxError> {
    let Some(vis) = find_child(node, "visibility_modifier") else {
        return Ok(Visibility::Private);
    };
    visibility_from_text(node_text(&vis, source)?)
        .ok_or_else(|| SyntaxError::NodeError {
            message: "Unrecognized visibility".to_string(),
            span: Some(node_range(&vis).into()),
            node_type: vis.kind().to_string(),
        })
}

/// Normalizes visibility text such as `pub ( crate )`
pub fn visibility_from_text(text: &str) -> Option<Visibility> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let vis = match compact.as_str() {
        "pub" => Visibility::Public,
        "crate" | "pub(crate)" => Visibility::Crate,
        "pub(super)" => Visibility::Super,
        "pub(self)" => Visibility::SelfModule,
        other => {
            let inner = other.strip_prefix("pub(in")?.strip_suffix(')')?;
            Visibility::InPath(inner.split("::").map(str::to_string).collect())
        }
    };
    Some(vis)
}

/// Collects ERROR and MISSING nodes as syntax errors
pub fn collect_ts_errors(node: &Node, source: &str, errors: &mut Vec<SyntaxError>) {
    if node.is_error() || node.is_missing() {
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            let text = node_text(node, source).unwrap_or_default();
            format!("unexpected `{}`", text.lines().next().unwrap_or_default().trim())
        };
        errors.push(SyntaxError::SyntaxError {
            message,
            span: Some(node_range(node).into()),
        });
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_ts_errors(&child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_text_is_normalized() {
        assert_eq!(visibility_from_text("pub"), Some(Visibility::Public));
        assert_eq!(visibility_from_text("pub ( crate )"), Some(Visibility::Crate));
        assert_eq!(visibility_from_text("pub(super)"), Some(Visibility::Super));
        assert_eq!(
            visibility_from_text("pub(in crate::a)"),
            Some(Visibility::InPath(vec!["crate".into(), "a".into()]))
        );
        assert_eq!(visibility_from_text("pub(nonsense)"), None);
    }
}
