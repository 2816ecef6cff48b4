//! File-system access used by the extractors.
//!
//! Extraction only needs to read text, list a directory and ask whether a
//! path is a directory, so that is all the trait exposes.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::ExtractError;

pub trait SourceFs {
    /// Read a UTF-8 file. A missing file is `ExtractError::NotFound`.
    fn read_text(&self, path: &Path) -> Result<String, ExtractError>;

    /// Entry names directly inside `path`, sorted by name.
    fn list_entries(&self, path: &Path) -> Result<Vec<String>, ExtractError>;

    fn is_directory(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path) && !self.is_directory(path)
    }
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl SourceFs for DiskFs {
    fn read_text(&self, path: &Path) -> Result<String, ExtractError> {
        fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))
    }

    fn list_entries(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        if !path.is_dir() {
            return Err(ExtractError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                ExtractError::io(path, source)
            })?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_entries_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.ts"), "").unwrap();
        fs::write(dir.path().join("a.vue"), "").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("c").join("nested.ts"), "").unwrap();

        let names = DiskFs.list_entries(dir.path()).unwrap();
        assert_eq!(names, vec!["a.vue", "b.ts", "c"]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = DiskFs.read_text(&dir.path().join("nope.ts")).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { .. }));
    }

    #[test]
    fn test_list_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(DiskFs.list_entries(&dir.path().join("missing")).is_err());
        assert!(!DiskFs.is_file(dir.path()));
    }
}
