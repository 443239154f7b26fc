use std::path::{Path, PathBuf};

use crate::error::{SourceError, SourceResult};

/// Reads a single source file.
pub fn read_source(path: &Path) -> SourceResult<String> {
    if !path.exists() {
        return Err(SourceError::PathNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| SourceError::read(path, e))
}

/// Collects `.rs` files below `path` (or `path` itself when it is a file), sorted by path
/// so that loading order does not depend on directory iteration order.
pub fn collect_source_files(path: &Path) -> SourceResult<Vec<(PathBuf, String)>> {
    if !path.exists() {
        return Err(SourceError::PathNotFound(path.to_path_buf()));
    }
    let mut found = Vec::new();
    walk(path, &mut found)?;
    found.sort();

    let mut files = Vec::with_capacity(found.len());
    for file in found {
        let text = read_source(&file)?;
        files.push((file, text));
    }
    Ok(files)
}

fn walk(path: &Path, found: &mut Vec<PathBuf>) -> SourceResult<()> {
    if path.is_file() {
        if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path.to_path_buf());
        }
        return Ok(());
    }
    let entries = std::fs::read_dir(path).map_err(|e| SourceError::read(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SourceError::read(path, e))?;
        walk(&entry.path(), found)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_rust_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.rs"), "struct B;").unwrap();
        std::fs::write(dir.path().join("a.rs"), "struct A;").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("nested/c.rs"), "struct C;").unwrap();

        let files = collect_source_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|(p, _)| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, ["a.rs", "b.rs", "nested/c.rs"]);
        assert_eq!(files[0].1, "struct A;");
    }

    #[test]
    fn missing_path_is_reported() {
        let err = read_source(Path::new("/definitely/not/here.rs")).unwrap_err();
        assert!(matches!(err, SourceError::PathNotFound(_)));
    }
}
