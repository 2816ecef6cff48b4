//! Manifest assembly.
//!
//! Walks the component directories of a source library and runs every
//! extractor over them, then adds tokens, stores and assets. A component
//! whose files fail to read or parse is kept with the affected fields empty;
//! the failure is logged and the run continues.

use std::fs;
use std::path::Path;

use crate::cache::ParseCache;
use crate::composable::{extract_composable, is_composable_file};
use crate::config::BuildOptions;
use crate::discovery::{discover_sub_entities, SubEntity, DEFINITION_EXT, DESCRIPTOR_EXT};
use crate::error::ExtractError;
use crate::manifest::{
    AssetEntry, Assets, ComponentManifest, Manifest, StoreEntry, SubComponentManifest,
};
use crate::slots::extract_slots_with;
use crate::source_fs::SourceFs;
use crate::tokens::extract_tokens;

pub const UNKNOWN_LIBRARY_VERSION: &str = "unknown";

const STORE_EXTENSIONS: [&str; 2] = ["ts", "js"];

/// Build the manifest for the library at `options.library_root`.
///
/// Only a missing library root is an error; everything below it degrades.
pub fn build_manifest(
    options: &BuildOptions,
    fs: &dyn SourceFs,
    cache: &mut ParseCache,
) -> Result<Manifest, ExtractError> {
    if !fs.is_directory(&options.library_root) {
        return Err(ExtractError::LibraryNotFound {
            path: options.library_root.clone(),
        });
    }

    let mut assembler = Assembler { options, fs, cache };
    let components = assembler.components();
    let tokens = extract_tokens(fs, &options.tokens_path());
    let stores = assembler.stores();
    let assets = Assets {
        images: assembler.assets(&options.images_path()),
        empty_states: assembler.assets(&options.empty_states_path()),
    };

    let manifest = Manifest {
        version: options.manifest_version.clone(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        source_library_version: library_version(fs, &options.library_root),
        components,
        tokens,
        stores,
        assets,
    };

    tracing::info!(
        components = manifest.components.len(),
        stores = manifest.stores.len(),
        images = manifest.assets.images.len(),
        empty_states = manifest.assets.empty_states.len(),
        parsed_files = assembler.cache.len(),
        "manifest assembled"
    );
    Ok(manifest)
}

/// `version` from the library's `package.json`.
fn library_version(fs: &dyn SourceFs, root: &Path) -> String {
    fs.read_text(&root.join("package.json"))
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|pkg| pkg.get("version")?.as_str().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_LIBRARY_VERSION.to_string())
}

struct Assembler<'a> {
    options: &'a BuildOptions,
    fs: &'a dyn SourceFs,
    cache: &'a mut ParseCache,
}

impl Assembler<'_> {
    /// Visible entries of `dir`, empty (with a log line) when it cannot be listed.
    fn entries(&self, dir: &Path, what: &str) -> Vec<String> {
        match self.fs.list_entries(dir) {
            Ok(entries) => entries.into_iter().filter(|e| !e.starts_with('.')).collect(),
            Err(ExtractError::NotFound { .. }) => {
                tracing::debug!(dir = %dir.display(), "no {} directory", what);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot list {} directory", what);
                Vec::new()
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COMPONENTS
    // ═══════════════════════════════════════════════════════════════════════════

    fn components(&mut self) -> Vec<ComponentManifest> {
        let root = self.options.components_path();
        let mut components = Vec::new();

        for name in self.entries(&root, "components") {
            let dir = root.join(&name);
            if !self.fs.is_directory(&dir) {
                continue;
            }
            components.push(self.component(&name, &dir));
        }
        components
    }

    fn component(&mut self, name: &str, dir: &Path) -> ComponentManifest {
        let mut component = ComponentManifest::empty(name);

        let definition = dir.join(format!("{name}.{DEFINITION_EXT}"));
        if self.fs.is_file(&definition) {
            match self.cache.definition(self.fs, &definition) {
                Ok(file) => {
                    component.props = file.props.clone();
                    component.emits = file.emits.clone();
                    component.types = file.types.clone();
                }
                Err(e) => warn_failed(name, "definition", &e),
            }
        }

        let descriptor = dir.join(format!("{name}.{DESCRIPTOR_EXT}"));
        if self.fs.is_file(&descriptor) {
            match self.fs.read_text(&descriptor) {
                Ok(source) => {
                    component.slots = extract_slots_with(&source, self.options.slot_strategy)
                }
                Err(e) => warn_failed(name, "descriptor", &e),
            }
        }

        for file_name in self.entries(dir, "component") {
            if !is_composable_file(&file_name) {
                continue;
            }
            match self.fs.read_text(&dir.join(&file_name)) {
                Ok(source) => component
                    .composables
                    .push(extract_composable(&source, &file_name)),
                Err(e) => warn_failed(name, "composable", &e),
            }
        }

        match discover_sub_entities(self.fs, dir, name) {
            Ok(entities) => {
                component.sub_components = entities
                    .into_iter()
                    .map(|entity| self.sub_component(name, entity))
                    .collect();
            }
            Err(e) => warn_failed(name, "sub-components", &e),
        }

        tracing::debug!(
            component = name,
            props = component.props.len(),
            emits = component.emits.len(),
            slots = component.slots.len(),
            sub_components = component.sub_components.len(),
            "component extracted"
        );
        component
    }

    fn sub_component(&mut self, component: &str, entity: SubEntity) -> SubComponentManifest {
        let mut sub = SubComponentManifest {
            meta: entity.meta,
            props: Vec::new(),
            emits: Vec::new(),
            slots: Vec::new(),
        };

        if let Some(path) = &entity.definition {
            match self.cache.definition(self.fs, path) {
                Ok(file) => {
                    sub.props = file.props.clone();
                    sub.emits = file.emits.clone();
                }
                Err(e) => warn_failed(component, "sub-component definition", &e),
            }
        }

        if let Some(path) = &entity.descriptor {
            match self.fs.read_text(path) {
                Ok(source) => sub.slots = extract_slots_with(&source, self.options.slot_strategy),
                Err(e) => warn_failed(component, "sub-component descriptor", &e),
            }
        }

        sub
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STORES & ASSETS
    // ═══════════════════════════════════════════════════════════════════════════

    fn stores(&self) -> Vec<StoreEntry> {
        let dir = self.options.stores_path();
        let mut stores = Vec::new();

        for file_name in self.entries(&dir, "stores") {
            let path = dir.join(&file_name);
            let Some(stem) = split_extension(&file_name)
                .filter(|(_, ext)| STORE_EXTENSIONS.contains(ext))
                .map(|(stem, _)| stem.to_string())
            else {
                continue;
            };
            if !self.fs.is_file(&path) {
                continue;
            }

            match self.fs.read_text(&path) {
                Ok(source) => stores.push(StoreEntry {
                    name: stem,
                    file_name,
                    source,
                }),
                Err(e) => tracing::warn!(store = %file_name, error = %e, "store skipped"),
            }
        }
        stores
    }

    fn assets(&self, dir: &Path) -> Vec<AssetEntry> {
        let root = &self.options.library_root;
        self.entries(dir, "assets")
            .into_iter()
            .filter(|file_name| self.fs.is_file(&dir.join(file_name)))
            .filter_map(|file_name| {
                let (stem, ext) = split_extension(&file_name)?;
                let full = dir.join(&file_name);
                let relative = full.strip_prefix(root).unwrap_or(&full);
                Some(AssetEntry {
                    name: stem.to_string(),
                    path: relative.to_string_lossy().replace('\\', "/"),
                    asset_type: ext.to_lowercase(),
                })
            })
            .collect()
    }
}

fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    file_name
        .rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
}

fn warn_failed(component: &str, part: &str, error: &ExtractError) {
    tracing::warn!(component, part, error = %error, "component extraction failed, field left empty");
}

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════════

pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), ExtractError> {
    let json = serde_json::to_string_pretty(manifest)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| ExtractError::io(path, e))
}

pub fn load_manifest(path: &Path) -> Result<Manifest, ExtractError> {
    let text = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}
