//! Design token tables.
//!
//! Each token file holds one flat `const NAME = { ... }` object literal.
//! A file that does not exist yet leaves its category empty.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ExtractError;
use crate::literal::{find_const_objects, LiteralValue};
use crate::manifest::{ColorPalette, DesignTokens};
use crate::source_fs::SourceFs;

type Entries = Vec<(String, LiteralValue)>;

pub const COLORS_FILE: &str = "colors.ts";
pub const SPACING_FILE: &str = "spacing.ts";
pub const BORDER_RADIUS_FILE: &str = "border-radius.ts";
pub const MAX_WIDTH_FILE: &str = "max-width.ts";
pub const UTILITIES_FILE: &str = "utilities.ts";

pub fn extract_tokens(fs: &dyn SourceFs, tokens_dir: &Path) -> DesignTokens {
    DesignTokens {
        colors: read_table(fs, tokens_dir, COLORS_FILE, parse_colors),
        spacing: read_table(fs, tokens_dir, SPACING_FILE, parse_scalar_table),
        border_radius: read_table(fs, tokens_dir, BORDER_RADIUS_FILE, parse_scalar_table),
        max_width: read_table(fs, tokens_dir, MAX_WIDTH_FILE, parse_scalar_table),
        utilities: read_table(fs, tokens_dir, UTILITIES_FILE, parse_utilities),
    }
}

fn read_table<T: Default>(
    fs: &dyn SourceFs,
    dir: &Path,
    file_name: &str,
    parse: fn(&str) -> T,
) -> T {
    let path = dir.join(file_name);
    match fs.read_text(&path) {
        Ok(source) => parse(&source),
        Err(ExtractError::NotFound { .. }) => {
            tracing::debug!(file = file_name, "token file absent");
            T::default()
        }
        Err(e) => {
            tracing::warn!(file = file_name, error = %e, "token file unreadable");
            T::default()
        }
    }
}

fn first_table(source: &str) -> Entries {
    find_const_objects(source)
        .into_iter()
        .next()
        .map(|(_, entries)| entries)
        .unwrap_or_default()
}

/// `{ blue: { 50: '#eff6ff', ... } }`. Non-numeric shade keys are skipped.
pub fn parse_colors(source: &str) -> BTreeMap<String, ColorPalette> {
    let mut colors = BTreeMap::new();
    for (family, value) in first_table(source) {
        let Some(shades) = value.as_object() else {
            continue;
        };
        let palette: ColorPalette = shades
            .iter()
            .filter_map(|(shade, hex)| Some((shade.parse::<u32>().ok()?, hex.as_text()?)))
            .collect();
        colors.insert(family, palette);
    }
    colors
}

/// `{ sm: '0.5rem', ... }`.
pub fn parse_scalar_table(source: &str) -> BTreeMap<String, String> {
    first_table(source)
        .into_iter()
        .filter_map(|(key, value)| Some((key, value.as_text()?)))
        .collect()
}

/// `{ 'flex-center': { display: 'flex', ... } }`.
pub fn parse_utilities(source: &str) -> BTreeMap<String, BTreeMap<String, String>> {
    first_table(source)
        .into_iter()
        .filter_map(|(key, value)| {
            let bag = value
                .as_object()?
                .iter()
                .filter_map(|(prop, v)| Some((prop.clone(), v.as_text()?)))
                .collect();
            Some((key, bag))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_fs::DiskFs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_colors() {
        let src = r##"
export const colors = {
  // brand
  blue: {
    50: '#eff6ff',
    500: "#3b82f6",
    DEFAULT: '#3b82f6',
  },
  white: '#ffffff',
} as const;
"##;
        let colors = parse_colors(src);
        assert_eq!(colors.len(), 1);
        let blue = &colors["blue"];
        assert_eq!(blue.get(&50).map(String::as_str), Some("#eff6ff"));
        assert_eq!(blue.get(&500).map(String::as_str), Some("#3b82f6"));
        assert_eq!(blue.len(), 2);
    }

    #[test]
    fn test_commented_out_table_is_skipped() {
        let src = r##"
// const legacy = {
//   blue: { 50: '#000000' },
// };
/* export const old = { red: { 500: '#ff0000' } }; */
export const colors = {
  blue: { 500: '#3b82f6' },
};
"##;
        let colors = parse_colors(src);
        assert_eq!(colors.keys().collect::<Vec<_>>(), vec!["blue"]);
        assert_eq!(colors["blue"].get(&500).map(String::as_str), Some("#3b82f6"));
    }

    #[test]
    fn test_non_ascii_token_values() {
        let src = "// Abstände — größer als üblich\nexport const spacing = {\n  'très-grand': '4rem', // « xl »\n  gap: 'calc(1rem × 2)',\n};";
        let spacing = parse_scalar_table(src);
        assert_eq!(spacing["très-grand"], "4rem");
        assert_eq!(spacing["gap"], "calc(1rem × 2)");
        assert_eq!(spacing.len(), 2);
    }

    #[test]
    fn test_scalar_table() {
        let src = "export const spacing = {\n  xs: '0.25rem',\n  'x-large': '3rem',\n  px: '1px',\n};";
        let spacing = parse_scalar_table(src);
        assert_eq!(spacing["xs"], "0.25rem");
        assert_eq!(spacing["x-large"], "3rem");
        assert_eq!(spacing.len(), 3);
    }

    #[test]
    fn test_utilities() {
        let src = r#"
export const utilities = {
  'flex-center': { display: 'flex', alignItems: 'center' },
  truncate: { overflow: 'hidden', textOverflow: 'ellipsis' },
};
"#;
        let utilities = parse_utilities(src);
        assert_eq!(utilities["flex-center"]["alignItems"], "center");
        assert_eq!(utilities["truncate"].len(), 2);
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MAX_WIDTH_FILE),
            "export const maxWidth = { prose: '65ch' };",
        )
        .unwrap();

        let tokens = extract_tokens(&DiskFs, dir.path());
        assert!(tokens.colors.is_empty());
        assert!(tokens.spacing.is_empty());
        assert!(tokens.utilities.is_empty());
        assert_eq!(tokens.max_width["prose"], "65ch");

        let nowhere = extract_tokens(&DiskFs, &dir.path().join("missing"));
        assert_eq!(nowhere, DesignTokens::default());
    }
}
