//! Prop and emit extraction.
//!
//! Reads the exported `*PropTypes` and `*EmitTypes` object literals of a
//! definition file. Anything unreadable is left out rather than reported:
//! a missing table is an empty list and a missing field is `None`.

use lazy_static::lazy_static;
use oxc_ast::ast::{Expression, ObjectExpression, ObjectPropertyKind, PropertyKey};
use oxc_span::GetSpan;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::definition::{parse_definition, span_text, unwrap_ts_expression};
use crate::literal::{find_balanced_end, split_once_top_level, split_top_level, strip_quotes};
use crate::manifest::{EmittedEventDeclaration, PropertyDeclaration};

lazy_static! {
    /// `PropType<Inner>`, `Array<Inner>`, ... anchored at the end of the type text.
    static ref GENERIC_WRAPPER_RE: Regex =
        Regex::new(r"(?s)[A-Za-z_$][\w$]*\s*<(.+)>\s*$").unwrap();

    static ref TYPEOF_RE: Regex = Regex::new(r"typeof\s+([A-Za-z_$][\w$]*)").unwrap();

    static ref INCLUDES_RE: Regex = Regex::new(r"([A-Za-z_$][\w$]*)\s*\.\s*includes\s*\(").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropsAndEmits {
    pub props: Vec<PropertyDeclaration>,
    pub emits: Vec<EmittedEventDeclaration>,
}

/// Props and emits of a definition file's text. Never fails; a file the
/// parser rejects yields empty lists.
pub fn extract_props_and_emits(source: &str) -> PropsAndEmits {
    match parse_definition(Path::new("<inline>.ts"), source) {
        Ok(file) => PropsAndEmits {
            props: file.props,
            emits: file.emits,
        },
        Err(_) => PropsAndEmits::default(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPS
// ═══════════════════════════════════════════════════════════════════════════════

pub(crate) fn props_from_object(
    obj: &ObjectExpression,
    source: &str,
    const_arrays: &HashMap<String, Vec<String>>,
) -> Vec<PropertyDeclaration> {
    let mut props: Vec<PropertyDeclaration> = Vec::new();
    // Doc comments sit between the previous entry and this one.
    let mut gap_start = obj.span.start as usize + 1;

    for kind in &obj.properties {
        let ObjectPropertyKind::ObjectProperty(property) = kind else {
            gap_start = kind.span().end as usize;
            continue;
        };
        let gap = source
            .get(gap_start..property.span.start as usize)
            .unwrap_or_default();
        gap_start = property.span.end as usize;

        let Expression::ObjectExpression(fields) = unwrap_ts_expression(&property.value) else {
            continue;
        };

        let name = property_key_name(&property.key, source);
        if props.iter().any(|p| p.name == name) {
            continue;
        }

        let mut prop = PropertyDeclaration::new(name);
        prop.description = doc_description(gap);
        read_prop_fields(&mut prop, fields, source, const_arrays);
        props.push(prop);
    }

    props
}

fn read_prop_fields(
    prop: &mut PropertyDeclaration,
    fields: &ObjectExpression,
    source: &str,
    const_arrays: &HashMap<String, Vec<String>>,
) {
    let mut raw_type: Option<&str> = None;

    for kind in &fields.properties {
        let ObjectPropertyKind::ObjectProperty(field) = kind else {
            continue;
        };
        let value = span_text(source, field.value.span()).trim();
        match property_key_name(&field.key, source).as_str() {
            "type" => raw_type = Some(value),
            "default" => prop.default_value_text = Some(value.to_string()),
            "required" => prop.required = value.parse::<bool>().ok(),
            "validator" => prop.validator_text = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(raw) = raw_type {
        prop.prop_type = resolve_type(raw);

        if let Some(values) = referenced_values(&TYPEOF_RE, raw, const_arrays) {
            prop.valid_values = Some(values);
            if prop.prop_type.contains("typeof") {
                prop.prop_type = "string".to_string();
            }
        }
    }

    if prop.valid_values.is_none() {
        if let Some(validator) = &prop.validator_text {
            prop.valid_values = referenced_values(&INCLUDES_RE, validator, const_arrays);
        }
    }
}

/// Map a prop's `type` field text to a type tag.
pub fn resolve_type(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(inner) = GENERIC_WRAPPER_RE.captures(raw).and_then(|c| c.get(1)) {
        return inner.as_str().trim().to_string();
    }

    match raw {
        "String" => "string",
        "Boolean" => "boolean",
        "Number" => "number",
        "Array" => "array",
        "Object" => "object",
        "Function" => "function",
        other => other,
    }
    .to_string()
}

/// Values of the first const table `re` finds a reference to.
fn referenced_values(
    re: &Regex,
    text: &str,
    const_arrays: &HashMap<String, Vec<String>>,
) -> Option<Vec<String>> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|name| const_arrays.get(name.as_str()))
        .find(|values| !values.is_empty())
        .cloned()
}

/// Text of the `@description` tag of the last `/** */` block in `gap`.
fn doc_description(gap: &str) -> Option<String> {
    let start = gap.rfind("/**")?;
    let end = start + gap[start..].find("*/")?;
    let body = &gap[start + 3..end];

    let mut lines = body
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim());

    let mut text = Vec::new();
    for line in lines.by_ref() {
        if let Some(rest) = line.strip_prefix("@description") {
            text.push(rest.trim());
            break;
        }
    }
    if text.is_empty() {
        return None;
    }
    text.extend(lines.take_while(|line| !line.starts_with('@')));

    let joined = text
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = joined.trim().trim_end_matches(',').trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn property_key_name(key: &PropertyKey, source: &str) -> String {
    match key {
        PropertyKey::StaticIdentifier(id) => id.name.to_string(),
        PropertyKey::StringLiteral(s) => s.value.to_string(),
        other => strip_quotes(span_text(source, other.span())).to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EMITS
// ═══════════════════════════════════════════════════════════════════════════════

pub(crate) fn emits_from_object(obj: &ObjectExpression, source: &str) -> Vec<EmittedEventDeclaration> {
    obj.properties
        .iter()
        .filter_map(|kind| match kind {
            ObjectPropertyKind::ObjectProperty(property) => Some(property),
            ObjectPropertyKind::SpreadProperty(_) => None,
        })
        .map(|property| {
            let key = span_text(source, property.key.span());
            let value = span_text(source, property.value.span());
            EmittedEventDeclaration {
                name: strip_quotes(key).to_string(),
                payload_type: payload_type(value),
            }
        })
        .collect()
}

/// Type of the first `name: Type` parameter of a validator function.
fn payload_type(value: &str) -> Option<String> {
    let open = value.find('(')?;
    let end = find_balanced_end(value, open)?;
    let params = &value[open + 1..end - 1];

    let first = split_top_level(params, b',', true).into_iter().next()?;
    let (name, ty) = split_once_top_level(first, b':')?;
    let name = name.trim().trim_end_matches('?');
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return None;
    }

    let ty = ty.trim();
    if ty.is_empty() {
        None
    } else {
        Some(ty.to_string())
    }
}
