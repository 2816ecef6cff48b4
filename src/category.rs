//! Static component -> category table.
//!
//! Hand-maintained; a component missing from the table lands in `Other`.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Form,
    Layout,
    Navigation,
    Feedback,
    Overlay,
    DataDisplay,
    Typography,
    Media,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Form,
        Category::Layout,
        Category::Navigation,
        Category::Feedback,
        Category::Overlay,
        Category::DataDisplay,
        Category::Typography,
        Category::Media,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Form => "form",
            Category::Layout => "layout",
            Category::Navigation => "navigation",
            Category::Feedback => "feedback",
            Category::Overlay => "overlay",
            Category::DataDisplay => "data-display",
            Category::Typography => "typography",
            Category::Media => "media",
            Category::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ToolError> {
        let wanted = value.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                ToolError::InvalidArgument(format!(
                    "Invalid category: {}. Valid categories: {}",
                    value,
                    Self::ALL.map(|c| c.as_str()).join(", ")
                ))
            })
    }

    pub fn of_component(name: &str) -> Self {
        CATEGORY_TABLE
            .get(name.to_lowercase().as_str())
            .copied()
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref CATEGORY_TABLE: HashMap<&'static str, Category> = {
        let mut m = HashMap::new();
        for name in [
            "button", "button-group", "checkbox", "checkbox-group", "color-picker", "date-picker",
            "file-upload", "form", "form-field", "input", "number-input", "radio", "radio-group",
            "range", "search", "select", "slider", "switch", "textarea", "time-picker", "toggle",
        ] {
            m.insert(name, Category::Form);
        }
        for name in [
            "box", "card", "columns", "container", "divider", "flex", "grid", "layout", "panel",
            "section", "spacer", "stack",
        ] {
            m.insert(name, Category::Layout);
        }
        for name in [
            "breadcrumb", "breadcrumbs", "link", "menu", "nav", "navbar", "navigation",
            "pagination", "sidebar", "stepper", "steps", "tabs",
        ] {
            m.insert(name, Category::Navigation);
        }
        for name in [
            "alert", "banner", "empty-state", "loader", "notification", "progress", "skeleton",
            "spinner", "toast",
        ] {
            m.insert(name, Category::Feedback);
        }
        for name in [
            "dialog", "drawer", "dropdown", "modal", "popover", "tooltip",
        ] {
            m.insert(name, Category::Overlay);
        }
        for name in [
            "accordion", "avatar", "badge", "chip", "collapse", "data-table", "description-list",
            "list", "stat", "table", "tag", "timeline", "tree",
        ] {
            m.insert(name, Category::DataDisplay);
        }
        for name in ["heading", "label", "paragraph", "text", "title"] {
            m.insert(name, Category::Typography);
        }
        for name in ["carousel", "icon", "illustration", "image", "logo", "video"] {
            m.insert(name, Category::Media);
        }
        m
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_components() {
        assert_eq!(Category::of_component("button"), Category::Form);
        assert_eq!(Category::of_component("Modal"), Category::Overlay);
        assert_eq!(Category::of_component("flux-capacitor"), Category::Other);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(Category::parse("data-display").unwrap(), Category::DataDisplay);
        assert_eq!(Category::parse(" Form ").unwrap(), Category::Form);

        let err = Category::parse("widgets").unwrap_err();
        assert!(err.to_string().contains("Invalid category"));
    }

    #[test]
    fn test_serializes_kebab_case() {
        let json = serde_json::to_value(Category::DataDisplay).unwrap();
        assert_eq!(json, "data-display");
    }
}
