//! Exported type declarations of a definition file.

use std::path::Path;

use crate::definition::parse_definition;
use crate::manifest::TypeDeclaration;

/// Exported `type` aliases, `interface`s and `[...] as const` tables, in
/// source order, each with its declaration text verbatim.
pub fn extract_types(source: &str) -> Vec<TypeDeclaration> {
    parse_definition(Path::new("<inline>.ts"), source)
        .map(|file| file.types)
        .unwrap_or_default()
}
