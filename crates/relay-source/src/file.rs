/// A source file known to the database.
///
/// This is a Salsa input struct: its text can be replaced with
/// `file.set_text(&mut db).to(..)`, which invalidates every query that read it.
///
/// # Example
///
/// ```rust,ignore
/// let file = SourceFile::new(&db, "lib.rs".to_string(), "struct A;".to_string());
/// file.set_text(&mut db).to("struct A { x: i32 }".to_string());
/// ```
#[salsa::input]
pub struct SourceFile {
    /// Path the file was loaded from, used for display only
    #[return_ref]
    pub path: String,

    /// Full text of the file
    #[return_ref]
    pub text: String,
}

/// The set of crates analyzed together.
///
/// Crate names are used as the first path segment when resolving paths (`std::ops::Deref`),
/// with the local crate registered under `crate`.
#[salsa::input]
pub struct Workspace {
    #[return_ref]
    pub crates: Vec<CrateRoot>,
}

/// One crate of the workspace. All of its files contribute items to the crate root module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrateRoot {
    pub name: String,
    pub files: Vec<SourceFile>,
}

impl CrateRoot {
    pub fn new(name: impl Into<String>, files: Vec<SourceFile>) -> Self {
        CrateRoot { name: name.into(), files }
    }
}
