//! Everything an assist invocation reads: one snapshot of the def map, the parsed
//! file the cursor is in, the configuration and the snapshot token.

use relay_source::{AssistConfig, SnapshotToken, SourceFile, Stale, TextRange, Workspace};
use relay_syntax::ast::{FieldName, TypeRef};
use relay_syntax::{parse_file_query, FieldLocation, ParsedFile};
use relay_types::{def_map_query, AdtId, ModuleId, Semantics, TypeDatabase};
use triomphe::Arc;

/// How the caller points at a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    /// Byte offset of a cursor inside a field declaration
    Offset(usize),
    /// `Struct.field` or `module::Struct.0`
    Path { strukt: String, field: String },
}

impl FieldTarget {
    /// Parses `Struct.field` syntax.
    pub fn parse_path(text: &str) -> Option<FieldTarget> {
        let (strukt, field) = text.rsplit_once('.')?;
        if strukt.is_empty() || field.is_empty() {
            return None;
        }
        Some(FieldTarget::Path {
            strukt: strukt.to_string(),
            field: field.to_string(),
        })
    }
}

/// The field an assist operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub adt: AdtId,
    pub composite: String,
    pub module: ModuleId,
    pub field: FieldName,
    pub field_index: usize,
    pub type_ref: TypeRef,
    /// The field declaration
    pub range: TextRange,
    /// The whole struct item
    pub item_range: TextRange,
}

impl FieldSelection {
    /// `self.name` or `self.0`
    pub fn access(&self) -> String {
        format!("self.{}", self.field)
    }
}

pub struct AssistContext {
    sema: Semantics,
    file: SourceFile,
    parsed: Arc<ParsedFile>,
    text: String,
    config: AssistConfig,
    token: SnapshotToken,
}

impl AssistContext {
    pub fn new(
        db: &dyn TypeDatabase,
        workspace: Workspace,
        file: SourceFile,
        config: AssistConfig,
        token: SnapshotToken,
    ) -> Self {
        AssistContext {
            sema: Semantics::new(def_map_query(db, workspace)),
            file,
            parsed: parse_file_query(db, file),
            text: file.text(db).clone(),
            config,
            token,
        }
    }

    pub fn sema(&self) -> &Semantics {
        &self.sema
    }

    pub fn file(&self) -> SourceFile {
        self.file
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Fails once the document moved past the snapshot this context reads.
    pub fn check_snapshot(&self) -> Result<(), Stale> {
        self.token.check()
    }

    /// Finds the field `target` points at.
    pub fn select_field(&self, target: &FieldTarget) -> Option<FieldSelection> {
        let location = match target {
            FieldTarget::Offset(offset) => self.parsed.field_at(*offset),
            FieldTarget::Path { strukt, field } => self.parsed.find_field(strukt, field),
        }?;
        self.selection_for(&location)
    }

    fn selection_for(&self, location: &FieldLocation<'_>) -> Option<FieldSelection> {
        let def_map = self.sema.def_map();
        let item_range = location.owner.item.range;
        let (adt, data) = def_map
            .adts()
            .find(|(_, data)| data.file == self.file && data.range == item_range)?;
        Some(FieldSelection {
            adt,
            composite: data.name.clone(),
            module: data.module,
            field: location.field.name.clone(),
            field_index: location.index,
            type_ref: location.field.ty.clone(),
            range: location.field.range,
            item_range,
        })
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn indent_at(&self, offset: usize) -> &str {
        let line_start = self.text[..offset.min(self.text.len())]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let line = &self.text[line_start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_paths_split_on_the_last_dot() {
        assert_eq!(
            FieldTarget::parse_path("inner::Wrapper.items"),
            Some(FieldTarget::Path {
                strukt: "inner::Wrapper".to_string(),
                field: "items".to_string(),
            })
        );
        assert_eq!(FieldTarget::parse_path("Wrapper"), None);
        assert_eq!(FieldTarget::parse_path("Wrapper."), None);
    }
}
