use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use relay_assists::{
    delegate_field, expand_struct_field, list_traits, AssistContext, DelegateOutcome, DelegateRequest,
    ExpandOutcome, FieldTarget, TraitReport,
};
use relay_source::{
    collect_source_files, AssistConfig, CrateRoot, Generation, ProjectConfig, SnapshotToken, SourceFile, Workspace,
    LOCAL_CRATE,
};
use relay_syntax::{parse_file_query, SyntaxError};
use relay_types::{def_map_query, LowerError};
use salsa::Setter;

use crate::database::RootDatabase;
use crate::error::{DbError, DbResult};

/// Owns the database and applies every change to it.
///
/// All files added to a host belong to the local crate; the embedded standard
/// library is loaded next to it on construction.
pub struct AnalysisHost {
    db: RootDatabase,
    workspace: Workspace,
    files: IndexMap<PathBuf, SourceFile>,
    generation: Generation,
    config: AssistConfig,
}

impl Default for AnalysisHost {
    fn default() -> Self {
        AnalysisHost::new(AssistConfig::default())
    }
}

impl AnalysisHost {
    pub fn new(config: AssistConfig) -> Self {
        let db = RootDatabase::default();
        let std = relay_stdlib::load_stdlib(&db);
        let workspace = Workspace::new(&db, vec![CrateRoot::new(LOCAL_CRATE, Vec::new()), std]);
        AnalysisHost {
            db,
            workspace,
            files: IndexMap::new(),
            generation: Generation::new(),
            config,
        }
    }

    /// Loads every `.rs` file below `path`, configured by the `relay.toml` found in
    /// `path` (or next to it, when `path` is a file).
    pub fn load(path: &Path) -> DbResult<Self> {
        let config_dir = if path.is_dir() {
            path
        } else {
            path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
        };
        let config = ProjectConfig::load(config_dir)?;
        let mut host = AnalysisHost::new(config.assist);
        let files = collect_source_files(path)?;
        log::info!("loading {} file(s) from {}", files.len(), path.display());
        host.add_files(files);
        Ok(host)
    }

    /// Adds files to the local crate in one change. Paths already known get their
    /// text replaced instead.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = (PathBuf, String)>) {
        self.generation.advance();
        let mut added = Vec::new();
        for (path, text) in files {
            match self.files.get(&path) {
                Some(file) => {
                    file.set_text(&mut self.db).to(text);
                }
                None => {
                    let file = SourceFile::new(&self.db, path.display().to_string(), text);
                    self.files.insert(path, file);
                    added.push(file);
                }
            }
        }
        if added.is_empty() {
            return;
        }
        let mut crates = self.workspace.crates(&self.db).clone();
        match crates.iter_mut().find(|krate| krate.name == LOCAL_CRATE) {
            Some(local) => local.files.extend(added),
            None => crates.insert(0, CrateRoot::new(LOCAL_CRATE, added)),
        }
        self.workspace.set_crates(&mut self.db).to(crates);
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.add_files([(path.into(), text.into())]);
    }

    /// Replaces the text of a known file.
    ///
    /// The generation moves first, so snapshots still running on other threads
    /// stop at their next check. The write itself waits for them to be dropped.
    pub fn set_file_text(&mut self, path: &Path, text: impl Into<String>) -> DbResult<()> {
        let file = self.lookup(path)?;
        self.generation.advance();
        file.set_text(&mut self.db).to(text.into());
        Ok(())
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// A snapshot of the current state.
    pub fn analysis(&self) -> Analysis {
        Analysis {
            db: self.db.clone(),
            workspace: self.workspace,
            files: self.files.clone(),
            token: self.generation.token(),
            config: self.config.clone(),
        }
    }

    fn lookup(&self, path: &Path) -> DbResult<SourceFile> {
        lookup(&self.files, path)
    }
}

/// A read-only view of the database at one generation.
///
/// Assists run against an `Analysis`. It must be dropped before the host that
/// created it can apply further changes.
pub struct Analysis {
    db: RootDatabase,
    workspace: Workspace,
    files: IndexMap<PathBuf, SourceFile>,
    token: SnapshotToken,
    config: AssistConfig,
}

impl Analysis {
    fn context(&self, path: &Path) -> DbResult<AssistContext> {
        let file = lookup(&self.files, path)?;
        Ok(AssistContext::new(
            &self.db,
            self.workspace,
            file,
            self.config.clone(),
            self.token.clone(),
        ))
    }

    /// The generation this snapshot was taken at.
    pub fn generation(&self) -> u64 {
        self.token.observed()
    }

    /// Generates delegating impls for the field `request` points at.
    pub fn delegate(&self, path: &Path, request: &DelegateRequest) -> DbResult<DelegateOutcome> {
        let ctx = self.context(path)?;
        Ok(delegate_field(&ctx, request)?)
    }

    /// The traits the field could delegate and the ones it would leave out.
    pub fn traits(&self, path: &Path, target: &FieldTarget) -> DbResult<TraitReport> {
        let ctx = self.context(path)?;
        Ok(list_traits(&ctx, target)?)
    }

    /// Replaces a struct-typed field by the fields of that struct.
    pub fn expand(&self, path: &Path, target: &FieldTarget) -> DbResult<ExpandOutcome> {
        let ctx = self.context(path)?;
        Ok(expand_struct_field(&ctx, target)?)
    }

    pub fn file_text(&self, path: &Path) -> DbResult<String> {
        let file = lookup(&self.files, path)?;
        Ok(file.text(&self.db).clone())
    }

    pub fn syntax_errors(&self, path: &Path) -> DbResult<Vec<SyntaxError>> {
        let file = lookup(&self.files, path)?;
        Ok(parse_file_query(&self.db, file).errors.clone())
    }

    /// Problems met while lowering items, across the whole workspace.
    pub fn lowering_diagnostics(&self) -> Vec<LowerError> {
        def_map_query(&self.db, self.workspace).diagnostics().to_vec()
    }
}

/// Finds a file by the path it was added under, falling back to comparing
/// canonical paths so `./src/lib.rs` finds `src/lib.rs`.
fn lookup(files: &IndexMap<PathBuf, SourceFile>, path: &Path) -> DbResult<SourceFile> {
    if let Some(file) = files.get(path) {
        return Ok(*file);
    }
    let unknown = || DbError::UnknownFile(path.to_path_buf());
    let wanted = path.canonicalize().map_err(|_| unknown())?;
    files
        .iter()
        .find(|(known, _)| known.canonicalize().is_ok_and(|known| known == wanted))
        .map(|(_, file)| *file)
        .ok_or_else(unknown)
}
