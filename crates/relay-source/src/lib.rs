//! Source inputs for the relay analysis database.
//!
//! This crate owns everything that enters the database from the outside world:
//! - `SourceFile` and `Workspace` salsa inputs holding file texts and crate membership
//! - `TextRange` / `FilePosition` used to address text inside a file
//! - `Generation` / `SnapshotToken`, the cheap version check used to detect that a
//!   snapshot went stale while an assist was running
//! - `ProjectConfig`, deserialized from `relay.toml`
//!
//! ## Salsa Integration
//!
//! Inputs are `#[salsa::input]` structs. Every later stage (parsing, def maps, assists)
//! reads them through a database implementing `SourceDatabase`, so an edit to one file
//! only invalidates the queries that actually read it.

mod config;
mod error;
mod file;
mod fs;
mod generation;
mod range;

pub use config::{AssistConfig, ProjectConfig, CONFIG_FILE_NAME};
pub use error::{SourceError, SourceResult};
pub use file::{CrateRoot, SourceFile, Workspace};
pub use fs::{collect_source_files, read_source};
pub use generation::{Generation, SnapshotToken, Stale};
pub use range::{FilePosition, TextRange};

/// Name of the crate that user files are loaded into.
pub const LOCAL_CRATE: &str = "crate";

/// Database trait for the source layer.
///
/// Implemented by the root database (`relay-db`) and by test databases. All query
/// crates extend this trait, so any of them can read file texts directly.
#[salsa::db]
pub trait SourceDatabase: salsa::Database {
    /// Returns the text of `file`.
    fn file_text<'db>(&'db self, file: SourceFile) -> &'db str
    where
        Self: Sized,
    {
        file.text(self).as_str()
    }
}

/// Test utilities for working with source inputs.
#[cfg(test)]
pub mod testing {
    use super::*;

    /// A minimal database implementing only `SourceDatabase`.
    #[salsa::db]
    #[derive(Default, Clone)]
    pub struct TestDatabase {
        storage: salsa::Storage<Self>,
    }

    #[salsa::db]
    impl salsa::Database for TestDatabase {
        fn salsa_event(&self, event: &dyn Fn() -> salsa::Event) {
            event();
        }
    }

    #[salsa::db]
    impl SourceDatabase for TestDatabase {}
}

#[cfg(test)]
mod tests {
    use super::testing::TestDatabase;
    use super::*;
    use salsa::Setter;

    #[test]
    fn file_text_reads_the_input() {
        let db = TestDatabase::default();
        let file = SourceFile::new(&db, "lib.rs".to_string(), "struct A;".to_string());
        assert_eq!(db.file_text(file), "struct A;");
    }

    #[test]
    fn setting_text_replaces_contents() {
        let mut db = TestDatabase::default();
        let file = SourceFile::new(&db, "lib.rs".to_string(), "struct A;".to_string());
        file.set_text(&mut db).to("struct B;".to_string());
        assert_eq!(db.file_text(file), "struct B;");
    }

    #[test]
    fn workspace_lists_crates_in_order() {
        let db = TestDatabase::default();
        let a = SourceFile::new(&db, "a.rs".to_string(), String::new());
        let ws = Workspace::new(
            &db,
            vec![
                CrateRoot::new(LOCAL_CRATE, vec![a]),
                CrateRoot::new("std", vec![]),
            ],
        );
        let names: Vec<_> = ws.crates(&db).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["crate", "std"]);
    }
}
