//! Node bindings.

use napi_derive::napi;
use std::path::Path;

use crate::assemble::{build_manifest, load_manifest};
use crate::cache::ParseCache;
use crate::config::BuildOptions;
use crate::query::ManifestIndex;
use crate::source_fs::DiskFs;

/// Assemble the manifest for `library_root` and return it as JSON.
#[napi]
pub fn build_manifest_native(library_root: String) -> napi::Result<serde_json::Value> {
    let options = BuildOptions::new(library_root);
    let manifest = build_manifest(&options, &DiskFs, &mut ParseCache::new())
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;

    serde_json::to_value(&manifest)
        .map_err(|e| napi::Error::from_reason(format!("Invalid manifest: {}", e)))
}

/// Load a manifest file and run one tool call against it.
#[napi]
pub fn query_manifest_native(
    manifest_path: String,
    tool: String,
    args_json: String,
) -> napi::Result<serde_json::Value> {
    let manifest = load_manifest(Path::new(&manifest_path))
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let result = ManifestIndex::new(manifest).call_tool_json(&tool, &args_json);

    serde_json::to_value(&result)
        .map_err(|e| napi::Error::from_reason(format!("Invalid tool result: {}", e)))
}
