//! Manifest data model.
//!
//! Every record here serializes with the camelCase property names downstream
//! consumers read, so renaming a field is a wire-format change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::Category;

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Type tag used when a prop has no readable `type` field.
pub const UNKNOWN_TYPE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    pub name: String,
    /// Semantic tag (`string`, `boolean`, ...) or raw structural type text.
    #[serde(rename = "type")]
    pub prop_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Never `Some(vec![])`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_text: Option<String>,
}

impl PropertyDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prop_type: UNKNOWN_TYPE.to_string(),
            default_value_text: None,
            description: None,
            valid_values: None,
            required: None,
            validator_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedEventDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDeclaration {
    /// `default`, a static name, or `[expr]` for a dynamically bound name.
    pub name: String,
    pub scoped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_props: Option<Vec<String>>,
}

impl SlotDeclaration {
    pub fn new(name: impl Into<String>, scope_props: Vec<String>) -> Self {
        let scoped = !scope_props.is_empty();
        Self {
            name: name.into(),
            scoped,
            scope_props: if scoped { Some(scope_props) } else { None },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    TypeAlias,
    Interface,
    ConstArray,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    /// Declaration text exactly as written, `export` keyword included.
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposableSignature {
    pub name: String,
    pub file_name: String,
    pub signature: String,
    pub returned_members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubComponentMeta {
    pub name: String,
    pub pascal_name: String,
    pub has_props: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubComponentManifest {
    #[serde(flatten)]
    pub meta: SubComponentMeta,
    pub props: Vec<PropertyDeclaration>,
    pub emits: Vec<EmittedEventDeclaration>,
    pub slots: Vec<SlotDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentManifest {
    pub name: String,
    pub pascal_name: String,
    pub category: Category,
    pub props: Vec<PropertyDeclaration>,
    pub emits: Vec<EmittedEventDeclaration>,
    pub slots: Vec<SlotDeclaration>,
    pub types: Vec<TypeDeclaration>,
    pub composables: Vec<ComposableSignature>,
    pub sub_components: Vec<SubComponentManifest>,
}

impl ComponentManifest {
    /// A record with every extracted field empty.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pascal_name: to_pascal_case(name),
            category: Category::of_component(name),
            props: Vec::new(),
            emits: Vec::new(),
            slots: Vec::new(),
            types: Vec::new(),
            composables: Vec::new(),
            sub_components: Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DESIGN TOKENS
// ═══════════════════════════════════════════════════════════════════════════════

/// Shade level -> hex color.
pub type ColorPalette = BTreeMap<u32, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    pub colors: BTreeMap<String, ColorPalette>,
    pub spacing: BTreeMap<String, String>,
    pub border_radius: BTreeMap<String, String>,
    pub max_width: BTreeMap<String, String>,
    pub utilities: BTreeMap<String, BTreeMap<String, String>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// STORES & ASSETS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEntry {
    pub name: String,
    pub file_name: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub asset_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    pub images: Vec<AssetEntry>,
    pub empty_states: Vec<AssetEntry>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROOT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub generated_at: String,
    pub source_library_version: String,
    pub components: Vec<ComponentManifest>,
    pub tokens: DesignTokens,
    pub stores: Vec<StoreEntry>,
    pub assets: Assets,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME TRANSFORMS
// ═══════════════════════════════════════════════════════════════════════════════

/// `date-picker` -> `DatePicker`.
pub fn to_pascal_case(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `use-click-outside` -> `useClickOutside`.
pub fn to_camel_case(name: &str) -> String {
    let mut segments = name.split('-');
    let head = segments.next().unwrap_or_default().to_string();
    head + &segments.map(to_pascal_case).collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("button"), "Button");
        assert_eq!(to_pascal_case("date-picker"), "DatePicker");
        assert_eq!(to_pascal_case("y"), "Y");
        assert_eq!(to_pascal_case("a--b"), "AB");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("use-click-outside"), "useClickOutside");
        assert_eq!(to_camel_case("useToggle"), "useToggle");
    }

    #[test]
    fn test_slot_without_scope_props_is_unscoped() {
        let slot = SlotDeclaration::new("default", vec![]);
        assert!(!slot.scoped);
        assert!(slot.scope_props.is_none());

        let json = serde_json::to_value(&slot).unwrap();
        assert!(json.get("scopeProps").is_none());
    }

    #[test]
    fn test_property_serializes_camel_case() {
        let mut prop = PropertyDeclaration::new("size");
        prop.prop_type = "string".to_string();
        prop.valid_values = Some(vec!["sm".to_string(), "lg".to_string()]);
        prop.default_value_text = Some("'sm'".to_string());

        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["defaultValueText"], "'sm'");
        assert_eq!(json["validValues"][1], "lg");
        assert!(json.get("required").is_none());
    }

    #[test]
    fn test_type_kind_serialization() {
        let json = serde_json::to_value(TypeKind::ConstArray).unwrap();
        assert_eq!(json, "const-array");
    }
}
