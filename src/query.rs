//! Lookups over a finished manifest.
//!
//! `ManifestIndex` is built once when the manifest is loaded; every query is
//! a map lookup or a walk over one category. `call_tool` is the dispatch
//! table the transport talks to, turning `ToolError`s into error results.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::category::Category;
use crate::error::ToolError;
use crate::manifest::{
    ComponentManifest, ComposableSignature, Manifest, PropertyDeclaration, StoreEntry,
    SubComponentManifest,
};

// ═══════════════════════════════════════════════════════════════════════════════
// RESULT SHAPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub name: String,
    pub pascal_name: String,
    pub category: Category,
    pub prop_count: usize,
    pub has_slots: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropHit<'m> {
    pub component: &'m str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_component: Option<&'m str>,
    pub prop: &'m PropertyDeclaration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposableHit<'m> {
    pub component: &'m str,
    #[serde(flatten)]
    pub composable: &'m ComposableSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary<'m> {
    pub name: &'m str,
    pub file_name: &'m str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Value,
    pub is_error: bool,
}

impl ToolResult {
    pub fn ok(content: impl Serialize) -> Self {
        match serde_json::to_value(content) {
            Ok(content) => Self {
                content,
                is_error: false,
            },
            Err(e) => Self::error(&e.to_string()),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            content: json!({ "error": message }),
            is_error: true,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARGUMENT ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Colors,
    Spacing,
    BorderRadius,
    MaxWidth,
    Utilities,
    All,
}

impl TokenType {
    pub fn parse(value: &str) -> Result<Self, ToolError> {
        match value.trim().to_lowercase().as_str() {
            "colors" => Ok(TokenType::Colors),
            "spacing" => Ok(TokenType::Spacing),
            "borderradius" | "border-radius" => Ok(TokenType::BorderRadius),
            "maxwidth" | "max-width" => Ok(TokenType::MaxWidth),
            "utilities" => Ok(TokenType::Utilities),
            "all" => Ok(TokenType::All),
            _ => Err(ToolError::InvalidArgument(format!(
                "Invalid token type: {value}. Valid types: colors, spacing, borderRadius, maxWidth, utilities, all"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Images,
    EmptyStates,
}

impl AssetKind {
    pub fn parse(value: &str) -> Result<Self, ToolError> {
        match value.trim().to_lowercase().as_str() {
            "images" => Ok(AssetKind::Images),
            "emptystates" | "empty-states" => Ok(AssetKind::EmptyStates),
            _ => Err(ToolError::InvalidArgument(format!(
                "Invalid asset type: {value}. Valid types: images, emptyStates"
            ))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INDEX
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ManifestIndex {
    manifest: Manifest,
    by_name: HashMap<String, usize>,
    by_category: HashMap<Category, Vec<usize>>,
    /// Lowercase composable name -> (component, composable) positions.
    composables: HashMap<String, (usize, usize)>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ManifestIndex {
    pub fn new(manifest: Manifest) -> Self {
        let mut by_name = HashMap::new();
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();
        let mut composables = HashMap::new();

        for (i, component) in manifest.components.iter().enumerate() {
            by_name.entry(component.name.to_lowercase()).or_insert(i);
            by_category.entry(component.category).or_default().push(i);
            for (j, composable) in component.composables.iter().enumerate() {
                composables
                    .entry(composable.name.to_lowercase())
                    .or_insert((i, j));
            }
        }

        Self {
            manifest,
            by_name,
            by_category,
            composables,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn list_components(&self, category: Option<&str>) -> Result<Vec<ComponentSummary>, ToolError> {
        let summarize = |c: &ComponentManifest| ComponentSummary {
            name: c.name.clone(),
            pascal_name: c.pascal_name.clone(),
            category: c.category,
            prop_count: c.props.len(),
            has_slots: !c.slots.is_empty(),
        };

        match category {
            None => Ok(self.manifest.components.iter().map(summarize).collect()),
            Some(raw) => {
                let category = Category::parse(raw)?;
                Ok(self
                    .by_category
                    .get(&category)
                    .map(|positions| {
                        positions
                            .iter()
                            .map(|&i| summarize(&self.manifest.components[i]))
                            .collect()
                    })
                    .unwrap_or_default())
            }
        }
    }

    pub fn get_component(&self, name: &str) -> Result<&ComponentManifest, ToolError> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.manifest.components[i])
            .ok_or_else(|| ToolError::not_found("Component", name))
    }

    pub fn get_sub_component(
        &self,
        component: &str,
        name: &str,
    ) -> Result<&SubComponentManifest, ToolError> {
        let wanted = name.trim().to_lowercase();
        self.get_component(component)?
            .sub_components
            .iter()
            .find(|s| s.meta.name.to_lowercase() == wanted || s.meta.pascal_name.to_lowercase() == wanted)
            .ok_or_else(|| ToolError::not_found("Sub-component", format!("{component}/{name}")))
    }

    /// Props whose name and/or type contain the given text, ignoring case.
    pub fn search_by_prop(
        &self,
        prop_name: Option<&str>,
        prop_type: Option<&str>,
    ) -> Result<Vec<PropHit<'_>>, ToolError> {
        let prop_name = prop_name.filter(|s| !s.trim().is_empty());
        let prop_type = prop_type.filter(|s| !s.trim().is_empty());
        if prop_name.is_none() && prop_type.is_none() {
            return Err(ToolError::MissingArgument(
                "At least one of propName or propType must be provided".to_string(),
            ));
        }

        let matches = |p: &PropertyDeclaration| {
            prop_name.map_or(true, |n| contains_ignore_case(&p.name, n))
                && prop_type.map_or(true, |t| contains_ignore_case(&p.prop_type, t))
        };

        let mut hits = Vec::new();
        for component in &self.manifest.components {
            hits.extend(component.props.iter().filter(|p| matches(*p)).map(|prop| PropHit {
                component: &component.name,
                sub_component: None,
                prop,
            }));
            for sub in &component.sub_components {
                hits.extend(sub.props.iter().filter(|p| matches(*p)).map(|prop| PropHit {
                    component: &component.name,
                    sub_component: Some(&sub.meta.name),
                    prop,
                }));
            }
        }
        Ok(hits)
    }

    pub fn get_tokens(&self, token_type: &str) -> Result<Value, ToolError> {
        let tokens = &self.manifest.tokens;
        let value = match TokenType::parse(token_type)? {
            TokenType::Colors => serde_json::to_value(&tokens.colors),
            TokenType::Spacing => serde_json::to_value(&tokens.spacing),
            TokenType::BorderRadius => serde_json::to_value(&tokens.border_radius),
            TokenType::MaxWidth => serde_json::to_value(&tokens.max_width),
            TokenType::Utilities => serde_json::to_value(&tokens.utilities),
            TokenType::All => serde_json::to_value(tokens),
        };
        value.map_err(|e| ToolError::InvalidArgument(e.to_string()))
    }

    pub fn list_composables(&self) -> Vec<ComposableHit<'_>> {
        self.manifest
            .components
            .iter()
            .flat_map(|c| {
                c.composables.iter().map(move |composable| ComposableHit {
                    component: &c.name,
                    composable,
                })
            })
            .collect()
    }

    pub fn get_composable(&self, name: &str) -> Result<ComposableHit<'_>, ToolError> {
        let &(i, j) = self
            .composables
            .get(&name.trim().to_lowercase())
            .ok_or_else(|| ToolError::not_found("Composable", name))?;
        let component = &self.manifest.components[i];
        Ok(ComposableHit {
            component: &component.name,
            composable: &component.composables[j],
        })
    }

    pub fn list_stores(&self) -> Vec<StoreSummary<'_>> {
        self.manifest
            .stores
            .iter()
            .map(|s| StoreSummary {
                name: &s.name,
                file_name: &s.file_name,
            })
            .collect()
    }

    pub fn get_store(&self, name: &str) -> Result<&StoreEntry, ToolError> {
        let wanted = name.trim().to_lowercase();
        self.manifest
            .stores
            .iter()
            .find(|s| s.name.to_lowercase() == wanted || s.file_name.to_lowercase() == wanted)
            .ok_or_else(|| ToolError::not_found("Store", name))
    }

    pub fn list_assets(&self, kind: Option<&str>) -> Result<Value, ToolError> {
        let assets = &self.manifest.assets;
        let value = match kind.map(AssetKind::parse).transpose()? {
            None => serde_json::to_value(assets),
            Some(AssetKind::Images) => serde_json::to_value(&assets.images),
            Some(AssetKind::EmptyStates) => serde_json::to_value(&assets.empty_states),
        };
        value.map_err(|e| ToolError::InvalidArgument(e.to_string()))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DISPATCH
    // ═══════════════════════════════════════════════════════════════════════════

    /// Run one tool by name. Failures come back as error results.
    pub fn call_tool(&self, tool: &str, args: &Value) -> ToolResult {
        let result = self.dispatch(tool, args);
        match result {
            Ok(content) => ToolResult::ok(content),
            Err(e) => {
                tracing::debug!(tool, error = %e, "tool failed");
                ToolResult::error(&e.to_string())
            }
        }
    }

    /// Like `call_tool`, with arguments as JSON text (empty means none).
    pub fn call_tool_json(&self, tool: &str, args_json: &str) -> ToolResult {
        if args_json.trim().is_empty() {
            return self.call_tool(tool, &json!({}));
        }
        match serde_json::from_str::<Value>(args_json) {
            Ok(args) => self.call_tool(tool, &args),
            Err(e) => ToolResult::error(&format!("Invalid arguments: {e}")),
        }
    }

    fn dispatch(&self, tool: &str, args: &Value) -> Result<Value, ToolError> {
        let to_value = |v: Result<Value, serde_json::Error>| {
            v.map_err(|e| ToolError::InvalidArgument(e.to_string()))
        };

        match tool {
            "list_components" => to_value(serde_json::to_value(
                self.list_components(optional_arg(args, "category"))?,
            )),
            "get_component" => to_value(serde_json::to_value(
                self.get_component(required_arg(args, "name")?)?,
            )),
            "get_sub_component" => to_value(serde_json::to_value(self.get_sub_component(
                required_arg(args, "component")?,
                required_arg(args, "name")?,
            )?)),
            "search_by_prop" => to_value(serde_json::to_value(self.search_by_prop(
                optional_arg(args, "propName"),
                optional_arg(args, "propType"),
            )?)),
            "get_tokens" => self.get_tokens(optional_arg(args, "type").unwrap_or("all")),
            "list_composables" => to_value(serde_json::to_value(self.list_composables())),
            "get_composable" => to_value(serde_json::to_value(
                self.get_composable(required_arg(args, "name")?)?,
            )),
            "list_stores" => to_value(serde_json::to_value(self.list_stores())),
            "get_store" => to_value(serde_json::to_value(
                self.get_store(required_arg(args, "name")?)?,
            )),
            "list_assets" => self.list_assets(optional_arg(args, "type")),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

fn optional_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn required_arg<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    optional_arg(args, key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ToolError::MissingArgument(format!("Missing required argument: {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{
        AssetEntry, Assets, DesignTokens, SlotDeclaration, SubComponentMeta,
    };

    fn prop(name: &str, ty: &str) -> PropertyDeclaration {
        let mut p = PropertyDeclaration::new(name);
        p.prop_type = ty.to_string();
        p
    }

    fn fixture() -> ManifestIndex {
        let mut button = ComponentManifest::empty("button");
        button.props = vec![prop("variant", "string"), prop("disabled", "boolean")];
        button.slots = vec![SlotDeclaration::new("default", vec![])];
        button.composables = vec![ComposableSignature {
            name: "useButton".into(),
            file_name: "useButton.ts".into(),
            signature: "(props: ButtonProps)".into(),
            returned_members: vec!["classes".into()],
        }];

        let mut table = ComponentManifest::empty("data-table");
        table.props = vec![prop("rows", "Row[]")];
        table.sub_components = vec![SubComponentManifest {
            meta: SubComponentMeta {
                name: "table-row".into(),
                pascal_name: "TableRow".into(),
                has_props: true,
            },
            props: vec![prop("isDisabled", "boolean")],
            emits: vec![],
            slots: vec![],
        }];

        let modal = ComponentManifest::empty("modal");

        let mut tokens = DesignTokens::default();
        tokens.spacing.insert("md".into(), "1rem".into());
        tokens.border_radius.insert("full".into(), "9999px".into());

        ManifestIndex::new(Manifest {
            version: "1.0.0".into(),
            generated_at: "2026-01-01T00:00:00+00:00".into(),
            source_library_version: "3.2.1".into(),
            components: vec![button, table, modal],
            tokens,
            stores: vec![StoreEntry {
                name: "theme".into(),
                file_name: "theme.ts".into(),
                source: "export const useThemeStore = 1;".into(),
            }],
            assets: Assets {
                images: vec![AssetEntry {
                    name: "logo".into(),
                    path: "assets/images/logo.svg".into(),
                    asset_type: "svg".into(),
                }],
                empty_states: vec![],
            },
        })
    }

    #[test]
    fn test_get_component_ignores_case() {
        let index = fixture();
        for name in ["button", "BUTTON", "Button", " button "] {
            assert_eq!(index.get_component(name).unwrap().name, "button");
        }
        let err = index.get_component("nope").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_list_components_by_category() {
        let index = fixture();
        assert_eq!(index.list_components(None).unwrap().len(), 3);

        let forms = index.list_components(Some("form")).unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].name, "button");
        assert_eq!(forms[0].prop_count, 2);
        assert!(forms[0].has_slots);

        assert!(index.list_components(Some("media")).unwrap().is_empty());
        let err = index.list_components(Some("widgets")).unwrap_err();
        assert!(err.to_string().contains("Invalid category"));
    }

    #[test]
    fn test_get_sub_component_by_either_name() {
        let index = fixture();
        assert_eq!(
            index.get_sub_component("data-table", "TableRow").unwrap().meta.name,
            "table-row"
        );
        assert!(index.get_sub_component("data-table", "table-row").is_ok());
        assert!(index
            .get_sub_component("data-table", "cell")
            .unwrap_err()
            .to_string()
            .contains("not found"));
    }

    #[test]
    fn test_search_by_prop() {
        let index = fixture();

        let err = index.search_by_prop(None, None).unwrap_err();
        assert!(err.to_string().contains("At least one"));

        let hits = index.search_by_prop(None, Some("BOOLEAN")).unwrap();
        let found: Vec<_> = hits.iter().map(|h| (h.component, h.sub_component, h.prop.name.as_str())).collect();
        assert_eq!(
            found,
            vec![("button", None, "disabled"), ("data-table", Some("table-row"), "isDisabled")]
        );

        let hits = index.search_by_prop(Some("disabled"), Some("boolean")).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(index.search_by_prop(Some("rows"), Some("string")).unwrap().is_empty());
    }

    #[test]
    fn test_get_tokens() {
        let index = fixture();
        assert_eq!(index.get_tokens("spacing").unwrap()["md"], "1rem");
        assert_eq!(index.get_tokens("border-radius").unwrap()["full"], "9999px");
        assert_eq!(index.get_tokens("borderRadius").unwrap()["full"], "9999px");
        assert!(index.get_tokens("all").unwrap()["maxWidth"].is_object());

        let err = index.get_tokens("shadows").unwrap_err();
        assert!(err.to_string().contains("Invalid token type"));
    }

    #[test]
    fn test_composables_stores_and_assets() {
        let index = fixture();
        assert_eq!(index.list_composables().len(), 1);
        assert_eq!(index.get_composable("usebutton").unwrap().component, "button");
        assert!(index.get_composable("useNothing").is_err());

        assert_eq!(index.list_stores()[0].file_name, "theme.ts");
        assert!(index.get_store("Theme").unwrap().source.contains("useThemeStore"));
        assert!(index.get_store("cart").is_err());

        assert_eq!(index.list_assets(Some("images")).unwrap()[0]["type"], "svg");
        assert!(index.list_assets(None).unwrap()["emptyStates"].is_array());
        assert!(index.list_assets(Some("videos")).is_err());
    }

    #[test]
    fn test_call_tool() {
        let index = fixture();

        let ok = index.call_tool("get_component", &json!({ "name": "MODAL" }));
        assert!(!ok.is_error);
        assert_eq!(ok.content["pascalName"], "Modal");
        assert_eq!(ok.content["category"], "overlay");

        let missing = index.call_tool("get_component", &json!({ "name": "ghost" }));
        assert!(missing.is_error);
        assert!(missing.content["error"].as_str().unwrap().contains("not found"));

        let empty = index.call_tool("list_components", &json!({ "category": "media" }));
        assert!(!empty.is_error);
        assert_eq!(empty.content, json!([]));

        let search = index.call_tool_json("search_by_prop", "{}");
        assert!(search.is_error);
        assert!(search.content["error"].as_str().unwrap().contains("At least one"));

        let tokens = index.call_tool_json("get_tokens", r#"{ "type": "fonts" }"#);
        assert!(tokens.content["error"].as_str().unwrap().contains("Invalid token type"));

        let unknown = index.call_tool("launch", &json!({}));
        assert!(unknown.is_error);
        assert_eq!(unknown.content["error"], "Unknown tool: launch");

        let bad_json = index.call_tool_json("list_stores", "{ nope");
        assert!(bad_json.is_error);

        let serialized = serde_json::to_value(&ok).unwrap();
        assert_eq!(serialized["isError"], false);
    }
}
