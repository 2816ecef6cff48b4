//! # Component Library Manifest Extraction
//!
//! Reads the sources of a Vue-style component library and produces one
//! serializable `Manifest` describing it:
//!
//! - **Props / emits**: the `*PropTypes` and `*EmitTypes` tables of each
//!   definition file (`button.ts`), parsed with Oxc.
//! - **Slots**: `<slot>` elements of each descriptor (`button.vue`).
//! - **Types**: exported aliases, interfaces and `[...] as const` tables.
//! - **Composables**: `use*.ts` signatures and returned members.
//! - **Sub-components**: nested and flat layouts inside a component directory.
//! - **Tokens, stores, assets**: read once per library.
//!
//! Assembly is offline. At serve time a `ManifestIndex` answers lookups
//! over the finished manifest through `call_tool`.
//!
//! ## Failure Model
//!
//! A pattern missing from a file yields an empty field, never an error. A
//! file that cannot be read or parsed degrades that component's fields and
//! is logged; only a missing library root stops assembly.

mod assemble;
mod cache;
mod category;
mod composable;
mod config;
mod definition;
mod discovery;
mod error;
mod literal;
mod manifest;
mod props;
mod query;
mod slots;
mod source_fs;
mod tokens;
mod type_alias;

#[cfg(feature = "napi")]
mod native;


pub use assemble::{build_manifest, load_manifest, write_manifest, UNKNOWN_LIBRARY_VERSION};
pub use cache::ParseCache;
pub use category::Category;
pub use composable::{extract_composable, is_composable_file};
pub use config::{BuildOptions, DEFAULT_MANIFEST_VERSION};
pub use definition::{parse_definition, DefinitionFile};
pub use discovery::{
    classify_directory, classify_file, discover_sub_components, discover_sub_entities, SubEntity,
    SubEntityLayout,
};
pub use error::{ExtractError, ToolError};
pub use manifest::*;
pub use props::{extract_props_and_emits, resolve_type, PropsAndEmits};
pub use query::{
    AssetKind, ComponentSummary, ComposableHit, ManifestIndex, PropHit, StoreSummary, TokenType,
    ToolResult,
};
pub use slots::{extract_slots, extract_slots_with, template_region, SlotStrategy};
pub use source_fs::{DiskFs, SourceFs};
pub use tokens::{extract_tokens, parse_colors, parse_scalar_table, parse_utilities};
pub use type_alias::extract_types;

#[cfg(feature = "napi")]
pub use native::{build_manifest_native, query_manifest_native};
