use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::slots::SlotStrategy;

pub const DEFAULT_MANIFEST_VERSION: &str = "1.0.0";

/// Where the source library lives and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    pub library_root: PathBuf,
    pub components_dir: String,
    pub tokens_dir: String,
    pub stores_dir: String,
    pub assets_dir: String,
    pub manifest_version: String,
    pub slot_strategy: SlotStrategy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from("."),
            components_dir: "components".to_string(),
            tokens_dir: "tokens".to_string(),
            stores_dir: "stores".to_string(),
            assets_dir: "assets".to_string(),
            manifest_version: DEFAULT_MANIFEST_VERSION.to_string(),
            slot_strategy: SlotStrategy::default(),
        }
    }
}

impl BuildOptions {
    pub fn new(library_root: impl Into<PathBuf>) -> Self {
        Self {
            library_root: library_root.into(),
            ..Self::default()
        }
    }

    pub fn components_path(&self) -> PathBuf {
        self.library_root.join(&self.components_dir)
    }

    pub fn tokens_path(&self) -> PathBuf {
        self.library_root.join(&self.tokens_dir)
    }

    pub fn stores_path(&self) -> PathBuf {
        self.library_root.join(&self.stores_dir)
    }

    pub fn images_path(&self) -> PathBuf {
        self.library_root.join(&self.assets_dir).join("images")
    }

    pub fn empty_states_path(&self) -> PathBuf {
        self.images_path().join("empty-states")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_use_defaults() {
        let opts: BuildOptions =
            serde_json::from_str(r#"{ "libraryRoot": "/lib", "slotStrategy": "scan" }"#).unwrap();
        assert_eq!(opts.library_root, PathBuf::from("/lib"));
        assert_eq!(opts.components_dir, "components");
        assert_eq!(opts.slot_strategy, SlotStrategy::Scan);
        assert_eq!(opts.empty_states_path(), PathBuf::from("/lib/assets/images/empty-states"));
    }
}
