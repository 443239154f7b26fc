//! The standard library as seen by relay.
//!
//! Trait discovery needs the impls of `std` types (`Vec`, `String`, `Box`, ...) and
//! the definitions of `std` traits. Instead of reading a toolchain's sources, relay
//! ships a signature-level model of the parts it needs. The files are embedded at
//! compile time and loaded into the database as the crate named [`STD_CRATE`].
//! Paths written as `core::...` or `alloc::...` resolve into the same crate.

use relay_source::{CrateRoot, SourceDatabase, SourceFile};

/// Crate name the model is registered under.
pub const STD_CRATE: &str = "std";

/// Other crate names that resolve into the model.
pub const STD_ALIASES: &[&str] = &["core", "alloc"];

macro_rules! load_stdlib_files {
    ($($name:ident),*) => {
        $(
            #[allow(non_upper_case_globals)]
            const $name: (&str, &str) = (
                concat!(stringify!($name), ".rs"),
                include_str!(concat!("../std/", stringify!($name), ".rs")),
            );
        )*
        const STDLIBS: &[(&str, &str)] = &[$($name),*];
    };
}

load_stdlib_files!(
    lib, marker, clone, cmp, convert, ops, fmt, iter, option, string, vec, boxed, collections, primitives
);

/// Creates source inputs for the embedded standard library and groups them as a crate.
pub fn load_stdlib(db: &dyn SourceDatabase) -> CrateRoot {
    let files = STDLIBS
        .iter()
        .map(|(filename, content)| SourceFile::new(db, format!("std/{}", filename), content.to_string()))
        .collect::<Vec<_>>();
    log::debug!("loaded {} standard library files", files.len());
    CrateRoot::new(STD_CRATE, files)
}

/// Whether `name` refers to the standard library crate.
pub fn is_std_crate(name: &str) -> bool {
    name == STD_CRATE || STD_ALIASES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_syntax::RustParser;

    #[test]
    fn embedded_sources_parse_cleanly() {
        let mut parser = RustParser::new().expect("Failed to create parser");
        for (name, content) in STDLIBS {
            let (items, errors) = parser.parse_ast(content);
            assert!(errors.is_empty(), "{name}: {errors:?}");
            assert!(!items.is_empty(), "{name} produced no items");
        }
    }

    #[test]
    fn aliases_resolve_to_std() {
        assert!(is_std_crate("std"));
        assert!(is_std_crate("core"));
        assert!(!is_std_crate("crate"));
    }
}
