//! Definition file parsing.
//!
//! A component's definition file (`button.ts`) is parsed once with Oxc and
//! reduced to an owned `DefinitionFile`: the PropTypes/EmitTypes tables, the
//! exported type declarations, and the `[...] as const` string tables the
//! props refer to.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpressionElement, BindingPattern, Declaration, Expression, ObjectExpression, Statement,
    VariableDeclaration,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ExtractError;
use crate::manifest::{EmittedEventDeclaration, PropertyDeclaration, TypeDeclaration, TypeKind};
use crate::props::{emits_from_object, props_from_object};

/// Everything extracted from one definition file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionFile {
    pub props: Vec<PropertyDeclaration>,
    pub emits: Vec<EmittedEventDeclaration>,
    pub types: Vec<TypeDeclaration>,
    /// `const X = ['a', 'b'] as const` tables, exported or not.
    pub const_arrays: HashMap<String, Vec<String>>,
}

/// Exported object names ending in this suffix hold the prop table.
const PROP_TYPES_SUFFIX: &str = "proptypes";
/// Exported object names ending in this suffix hold the emit table.
const EMIT_TYPES_SUFFIX: &str = "emittypes";

pub(crate) fn span_text(source: &str, span: Span) -> &str {
    source
        .get(span.start as usize..span.end as usize)
        .unwrap_or_default()
}

/// Look through `as`, `satisfies`, `!` and parentheses.
pub(crate) fn unwrap_ts_expression<'b, 'a>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
    match expr {
        Expression::TSAsExpression(e) => unwrap_ts_expression(&e.expression),
        Expression::TSSatisfiesExpression(e) => unwrap_ts_expression(&e.expression),
        Expression::TSNonNullExpression(e) => unwrap_ts_expression(&e.expression),
        Expression::ParenthesizedExpression(e) => unwrap_ts_expression(&e.expression),
        _ => expr,
    }
}

/// Parse a definition file.
///
/// Recoverable syntax errors keep whatever Oxc managed to build; only a
/// parse that gives up entirely is an error.
pub fn parse_definition(path: &Path, source: &str) -> Result<DefinitionFile, ExtractError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true);
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked || (!ret.errors.is_empty() && ret.program.body.is_empty()) {
        let message = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unrecoverable syntax error".to_string());
        return Err(ExtractError::Parse {
            path: path.to_path_buf(),
            message,
        });
    }
    if !ret.errors.is_empty() {
        tracing::debug!(
            path = %path.display(),
            errors = ret.errors.len(),
            "definition file parsed with recoverable errors"
        );
    }

    let mut file = DefinitionFile::default();
    let mut prop_types: Option<&ObjectExpression> = None;
    let mut emit_types: Option<&ObjectExpression> = None;

    for stmt in &ret.program.body {
        match stmt {
            Statement::ExportNamedDeclaration(export) => {
                let Some(decl) = &export.declaration else {
                    continue;
                };
                let definition = span_text(source, export.span).trim_end().to_string();
                match decl {
                    Declaration::VariableDeclaration(var) => {
                        for (name, init) in declarators(var) {
                            if let Some(values) = const_array_values(init, source) {
                                file.types.push(TypeDeclaration {
                                    name: name.clone(),
                                    kind: TypeKind::ConstArray,
                                    definition: definition.clone(),
                                });
                                file.const_arrays.insert(name, values);
                                continue;
                            }
                            if let Expression::ObjectExpression(obj) = unwrap_ts_expression(init) {
                                let lower = name.to_lowercase();
                                if prop_types.is_none() && lower.ends_with(PROP_TYPES_SUFFIX) {
                                    prop_types = Some(&**obj);
                                } else if emit_types.is_none() && lower.ends_with(EMIT_TYPES_SUFFIX) {
                                    emit_types = Some(&**obj);
                                }
                            }
                        }
                    }
                    Declaration::TSTypeAliasDeclaration(alias) => {
                        file.types.push(TypeDeclaration {
                            name: alias.id.name.to_string(),
                            kind: TypeKind::TypeAlias,
                            definition,
                        });
                    }
                    Declaration::TSInterfaceDeclaration(iface) => {
                        file.types.push(TypeDeclaration {
                            name: iface.id.name.to_string(),
                            kind: TypeKind::Interface,
                            definition,
                        });
                    }
                    _ => {}
                }
            }
            Statement::VariableDeclaration(var) => {
                for (name, init) in declarators(var) {
                    if let Some(values) = const_array_values(init, source) {
                        file.const_arrays.insert(name, values);
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(obj) = prop_types {
        file.props = props_from_object(obj, source, &file.const_arrays);
    }
    if let Some(obj) = emit_types {
        file.emits = emits_from_object(obj, source);
    }

    Ok(file)
}

/// `(name, initializer)` for each simply-named declarator.
fn declarators<'b, 'a>(var: &'b VariableDeclaration<'a>) -> Vec<(String, &'b Expression<'a>)> {
    var.declarations
        .iter()
        .filter_map(|decl| match (&decl.id, &decl.init) {
            (BindingPattern::BindingIdentifier(id), Some(init)) => Some((id.name.to_string(), init)),
            _ => None,
        })
        .collect()
}

/// Values of `['a', 'b'] as const`. Arrays holding anything but string
/// literals are not value tables.
fn const_array_values(init: &Expression, source: &str) -> Option<Vec<String>> {
    let Expression::TSAsExpression(as_expr) = init else {
        return None;
    };
    if span_text(source, as_expr.type_annotation.span()).trim() != "const" {
        return None;
    }
    let Expression::ArrayExpression(array) = unwrap_ts_expression(&as_expr.expression) else {
        return None;
    };

    array
        .elements
        .iter()
        .map(|elem| match elem {
            ArrayExpressionElement::StringLiteral(s) => Some(s.value.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON_TS: &str = r#"
import type { PropType } from 'vue';

export const BUTTON_SIZES = ['sm', 'md', 'lg'] as const;
const VARIANTS = ['primary', 'ghost'] as const;
const MIXED = ['a', 1] as const;

export type ButtonSize = typeof BUTTON_SIZES[number];

export interface ButtonProps {
  size?: ButtonSize;
}

type Internal = string;

export const buttonPropTypes = {
  size: {
    type: String as PropType<typeof BUTTON_SIZES[number]>,
    default: 'md',
  },
};

export const buttonEmitTypes = {
  click: (event: MouseEvent) => true,
};
"#;

    #[test]
    fn test_collects_const_arrays() {
        let file = parse_definition(Path::new("button.ts"), BUTTON_TS).unwrap();
        assert_eq!(
            file.const_arrays.get("BUTTON_SIZES"),
            Some(&vec!["sm".to_string(), "md".to_string(), "lg".to_string()])
        );
        assert_eq!(
            file.const_arrays.get("VARIANTS"),
            Some(&vec!["primary".to_string(), "ghost".to_string()])
        );
        assert!(!file.const_arrays.contains_key("MIXED"));
    }

    #[test]
    fn test_collects_exported_types_in_order() {
        let file = parse_definition(Path::new("button.ts"), BUTTON_TS).unwrap();
        let names: Vec<_> = file.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["BUTTON_SIZES", "ButtonSize", "ButtonProps"]);
        assert_eq!(file.types[0].kind, TypeKind::ConstArray);
        assert_eq!(file.types[1].kind, TypeKind::TypeAlias);
        assert_eq!(file.types[2].kind, TypeKind::Interface);
        assert!(file.types[2].definition.starts_with("export interface ButtonProps"));
    }

    #[test]
    fn test_finds_prop_and_emit_tables() {
        let file = parse_definition(Path::new("button.ts"), BUTTON_TS).unwrap();
        assert_eq!(file.props.len(), 1);
        assert_eq!(file.emits.len(), 1);
        assert_eq!(file.emits[0].name, "click");
    }

    #[test]
    fn test_empty_file() {
        let file = parse_definition(Path::new("empty.ts"), "").unwrap();
        assert_eq!(file, DefinitionFile::default());
    }
}
