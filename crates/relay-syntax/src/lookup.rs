//! Cursor and name lookups over a parsed file.

use crate::ast::{FieldDef, FieldName, Item, ItemKind, StructDef};
use crate::ParsedFile;

/// A struct together with the inline module path leading to it.
#[derive(Debug, Clone)]
pub struct StructLocation<'a> {
    pub module_path: Vec<String>,
    pub item: &'a Item,
    pub def: &'a StructDef,
}

/// A field of a struct, addressed by position within the struct.
#[derive(Debug, Clone)]
pub struct FieldLocation<'a> {
    pub owner: StructLocation<'a>,
    pub field: &'a FieldDef,
    pub index: usize,
}

impl ParsedFile {
    /// All structs in the file, inline modules included, in source order.
    pub fn structs(&self) -> Vec<StructLocation<'_>> {
        let mut out = Vec::new();
        collect_structs(&self.items, &mut Vec::new(), &mut out);
        out
    }

    /// The field whose declaration contains `offset`.
    pub fn field_at(&self, offset: usize) -> Option<FieldLocation<'_>> {
        self.structs()
            .into_iter()
            .filter(|owner| owner.item.range.contains_inclusive(offset))
            .find_map(|owner| {
                let index = owner.def.fields.iter().position(|f| f.range.contains_inclusive(offset))?;
                Some(owner.field(index))
            })
    }

    /// Finds `field` of the struct named `struct_path` (`Wrapper` or `inner::Wrapper`).
    pub fn find_field(&self, struct_path: &str, field: &str) -> Option<FieldLocation<'_>> {
        let mut wanted: Vec<&str> = struct_path.split("::").map(str::trim).collect();
        let name = wanted.pop()?;
        self.structs().into_iter().find_map(|owner| {
            let module_matches = owner.module_path.len() == wanted.len()
                && owner.module_path.iter().zip(&wanted).all(|(a, b)| a == b);
            if !module_matches || owner.def.name.text != name {
                return None;
            }
            let index = owner.def.fields.iter().position(|f| field_matches(&f.name, field))?;
            Some(owner.field(index))
        })
    }
}

impl<'a> StructLocation<'a> {
    fn field(self, index: usize) -> FieldLocation<'a> {
        let field = &self.def.fields[index];
        FieldLocation {
            owner: self,
            field,
            index,
        }
    }
}

fn field_matches(name: &FieldName, wanted: &str) -> bool {
    match name {
        FieldName::Named(n) => n.text == wanted,
        FieldName::Index(i) => wanted.parse::<usize>().is_ok_and(|w| w == *i),
    }
}

fn collect_structs<'a>(items: &'a [Item], path: &mut Vec<String>, out: &mut Vec<StructLocation<'a>>) {
    for item in items {
        match &item.kind {
            ItemKind::Struct(def) => out.push(StructLocation {
                module_path: path.clone(),
                item,
                def,
            }),
            ItemKind::Module(module) => {
                path.push(module.name.text.clone());
                collect_structs(&module.items, path, out);
                path.pop();
            }
            _ => {}
        }
    }
}
