use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::definition::{parse_definition, DefinitionFile};
use crate::error::ExtractError;
use crate::source_fs::SourceFs;

/// Parsed definition files keyed by path.
///
/// Each path is parsed at most once for the lifetime of the cache; entries
/// are never invalidated. Pass a fresh cache to start over.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: HashMap<PathBuf, Arc<DefinitionFile>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definition(
        &mut self,
        fs: &dyn SourceFs,
        path: &Path,
    ) -> Result<Arc<DefinitionFile>, ExtractError> {
        if let Some(hit) = self.entries.get(path) {
            return Ok(Arc::clone(hit));
        }

        let source = fs.read_text(path)?;
        let parsed = Arc::new(parse_definition(path, &source)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&parsed));
        Ok(parsed)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_fs::DiskFs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parses_each_path_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("badge.ts");
        fs::write(
            &path,
            "export const badgePropTypes = { tone: { type: String } };",
        )
        .unwrap();

        let mut cache = ParseCache::new();
        let first = cache.definition(&DiskFs, &path).unwrap();
        assert_eq!(first.props.len(), 1);

        // Entries are never refreshed from disk.
        fs::write(&path, "export const x = 1;").unwrap();
        let second = cache.definition(&DiskFs, &path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.ts");

        let mut cache = ParseCache::new();
        assert!(matches!(
            cache.definition(&DiskFs, &path),
            Err(ExtractError::NotFound { .. })
        ));
        assert!(cache.is_empty());
        assert!(!cache.contains(&path));
    }
}
