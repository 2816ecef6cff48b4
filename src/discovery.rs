//! Sub-component discovery.
//!
//! A component directory may hold sub-components in three layouts:
//!
//! ```text
//! table/
//!   table.ts  table.vue
//!   row/row.ts  row/row.vue        NestedWithOwnFile      -> "row"
//!   parts/TableCell.vue            NestedWithForeignFiles -> "TableCell"
//!   table-head.vue  table-head.ts  FlatFile               -> "table-head"
//! ```
//!
//! Classification is done by pure predicates over entry names; only the
//! `hasProps` lookups touch the file system.

use std::path::{Path, PathBuf};

use crate::error::ExtractError;
use crate::manifest::{to_pascal_case, SubComponentMeta};
use crate::source_fs::SourceFs;

pub const DEFINITION_EXT: &str = "ts";
pub const DESCRIPTOR_EXT: &str = "vue";

// ═══════════════════════════════════════════════════════════════════════════════
// LAYOUTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubEntityLayout {
    /// `x/` holding `x.ts` or `x.vue`.
    NestedWithOwnFile { dir: String },
    /// `x/` holding only differently-named descriptors; one entity per stem.
    NestedWithForeignFiles { dir: String, stems: Vec<String> },
    /// `y.vue` beside the component's own files.
    FlatFile { stem: String },
}

/// A discovered sub-component with the files its metadata comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntity {
    pub meta: SubComponentMeta,
    pub definition: Option<PathBuf>,
    pub descriptor: Option<PathBuf>,
}

fn stem_with_ext<'a>(file_name: &'a str, ext: &str) -> Option<&'a str> {
    file_name
        .strip_suffix(ext)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

/// Layout of subdirectory `dir` given the names it contains.
pub fn classify_directory(dir: &str, entries: &[String]) -> Option<SubEntityLayout> {
    if dir.starts_with('.') {
        return None;
    }

    let own_definition = format!("{dir}.{DEFINITION_EXT}");
    let own_descriptor = format!("{dir}.{DESCRIPTOR_EXT}");
    if entries.iter().any(|e| *e == own_definition || *e == own_descriptor) {
        return Some(SubEntityLayout::NestedWithOwnFile { dir: dir.to_string() });
    }

    let stems: Vec<String> = entries
        .iter()
        .filter_map(|e| stem_with_ext(e, DESCRIPTOR_EXT))
        .map(str::to_string)
        .collect();
    if stems.is_empty() {
        return None;
    }
    Some(SubEntityLayout::NestedWithForeignFiles {
        dir: dir.to_string(),
        stems,
    })
}

/// Layout of a plain file in the directory of `component`.
pub fn classify_file(component: &str, file_name: &str) -> Option<SubEntityLayout> {
    let stem = stem_with_ext(file_name, DESCRIPTOR_EXT)?;
    if stem == component || stem.starts_with('.') {
        return None;
    }
    Some(SubEntityLayout::FlatFile {
        stem: stem.to_string(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════════

fn existing(fs: &dyn SourceFs, path: PathBuf) -> Option<PathBuf> {
    fs.is_file(&path).then_some(path)
}

/// First existing path among `candidates`.
fn first_existing(fs: &dyn SourceFs, candidates: [PathBuf; 2]) -> Option<PathBuf> {
    candidates.into_iter().find_map(|path| existing(fs, path))
}

fn resolve(fs: &dyn SourceFs, component_dir: &Path, layout: SubEntityLayout) -> Vec<SubEntity> {
    let def = |stem: &str| format!("{stem}.{DEFINITION_EXT}");
    let desc = |stem: &str| format!("{stem}.{DESCRIPTOR_EXT}");

    match layout {
        SubEntityLayout::NestedWithOwnFile { dir } => {
            let nested = component_dir.join(&dir);
            let definition = first_existing(
                fs,
                [nested.join(def(&dir)), component_dir.join(def(&dir))],
            );
            vec![SubEntity {
                meta: SubComponentMeta {
                    pascal_name: to_pascal_case(&dir),
                    has_props: definition.is_some(),
                    name: dir.clone(),
                },
                definition,
                descriptor: existing(fs, nested.join(desc(&dir))),
            }]
        }
        SubEntityLayout::NestedWithForeignFiles { dir, stems } => {
            let nested = component_dir.join(&dir);
            stems
                .into_iter()
                .map(|stem| {
                    let definition = first_existing(
                        fs,
                        [nested.join(def(&stem)), component_dir.join(def(&stem))],
                    );
                    SubEntity {
                        meta: SubComponentMeta {
                            name: stem.clone(),
                            pascal_name: stem.clone(),
                            has_props: definition.is_some(),
                        },
                        definition,
                        descriptor: Some(nested.join(desc(&stem))),
                    }
                })
                .collect()
        }
        SubEntityLayout::FlatFile { stem } => {
            let definition = existing(fs, component_dir.join(def(&stem)));
            vec![SubEntity {
                meta: SubComponentMeta {
                    pascal_name: to_pascal_case(&stem),
                    has_props: definition.is_some(),
                    name: stem.clone(),
                },
                definition,
                descriptor: Some(component_dir.join(desc(&stem))),
            }]
        }
    }
}

/// Sub-components of `component`, in directory order.
pub fn discover_sub_entities(
    fs: &dyn SourceFs,
    component_dir: &Path,
    component: &str,
) -> Result<Vec<SubEntity>, ExtractError> {
    let mut found = Vec::new();

    for entry in fs.list_entries(component_dir)? {
        let path = component_dir.join(&entry);
        let layout = if fs.is_directory(&path) {
            let children = fs.list_entries(&path)?;
            classify_directory(&entry, &children)
        } else {
            classify_file(component, &entry)
        };

        if let Some(layout) = layout {
            found.extend(resolve(fs, component_dir, layout));
        }
    }

    Ok(found)
}

pub fn discover_sub_components(
    fs: &dyn SourceFs,
    component_dir: &Path,
    component: &str,
) -> Result<Vec<SubComponentMeta>, ExtractError> {
    Ok(discover_sub_entities(fs, component_dir, component)?
        .into_iter()
        .map(|entity| entity.meta)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_fs::DiskFs;
    use std::fs;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_classify_directory() {
        assert_eq!(
            classify_directory("row", &names(&["row.vue"])),
            Some(SubEntityLayout::NestedWithOwnFile { dir: "row".into() })
        );
        assert_eq!(
            classify_directory("row", &names(&["row.ts"])),
            Some(SubEntityLayout::NestedWithOwnFile { dir: "row".into() })
        );
        assert_eq!(
            classify_directory("parts", &names(&["TableCell.vue", "helpers.ts", "TableFoot.vue"])),
            Some(SubEntityLayout::NestedWithForeignFiles {
                dir: "parts".into(),
                stems: names(&["TableCell", "TableFoot"]),
            })
        );
        assert_eq!(classify_directory("utils", &names(&["format.ts"])), None);
        assert_eq!(classify_directory(".cache", &names(&[".cache.vue"])), None);
    }

    #[test]
    fn test_classify_file() {
        assert_eq!(classify_file("table", "table.vue"), None);
        assert_eq!(classify_file("table", "table.ts"), None);
        assert_eq!(classify_file("table", "useTable.ts"), None);
        assert_eq!(
            classify_file("table", "table-head.vue"),
            Some(SubEntityLayout::FlatFile { stem: "table-head".into() })
        );
        assert_eq!(classify_file("table", ".vue"), None);
    }

    #[test]
    fn test_nested_with_own_file_has_props() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x/x.ts");
        touch(dir.path(), "x/x.vue");

        let found = discover_sub_components(&DiskFs, dir.path(), "z").unwrap();
        assert_eq!(
            found,
            vec![SubComponentMeta {
                name: "x".into(),
                pascal_name: "X".into(),
                has_props: true,
            }]
        );
    }

    #[test]
    fn test_flat_file_without_definition() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "z.vue");
        touch(dir.path(), "z.ts");
        touch(dir.path(), "y.vue");

        let found = discover_sub_components(&DiskFs, dir.path(), "z").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "y");
        assert_eq!(found[0].pascal_name, "Y");
        assert!(!found[0].has_props);

        touch(dir.path(), "y.ts");
        let found = discover_sub_components(&DiskFs, dir.path(), "z").unwrap();
        assert!(found[0].has_props);
    }

    #[test]
    fn test_foreign_files_keep_their_names() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "parts/TableCell.vue");
        touch(dir.path(), "parts/TableCell.ts");
        touch(dir.path(), "parts/table-foot.vue");

        let found = discover_sub_entities(&DiskFs, dir.path(), "table").unwrap();
        let metas: Vec<_> = found.iter().map(|e| &e.meta).collect();
        assert_eq!(metas[0].name, "TableCell");
        assert_eq!(metas[0].pascal_name, "TableCell");
        assert!(metas[0].has_props);
        assert_eq!(metas[1].name, "table-foot");
        assert_eq!(metas[1].pascal_name, "table-foot");
        assert!(!metas[1].has_props);
        assert_eq!(found[1].descriptor, Some(dir.path().join("parts/table-foot.vue")));
    }

    #[test]
    fn test_nested_definition_checked_before_flat() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "row/row.vue");
        touch(dir.path(), "row.ts");

        let found = discover_sub_entities(&DiskFs, dir.path(), "table").unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].meta.has_props);
        assert_eq!(found[0].definition, Some(dir.path().join("row.ts")));

        touch(dir.path(), "row/row.ts");
        let found = discover_sub_entities(&DiskFs, dir.path(), "table").unwrap();
        assert_eq!(found[0].definition, Some(dir.path().join("row/row.ts")));
    }
}
