//! Composable (`use*`) file extraction.
//!
//! Composables are small and regular enough that a text scan is sufficient:
//! the declaration is found with a regex over the source with strings and
//! comments blanked, and brackets are balanced with `literal` helpers.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;
use std::path::Path;

use crate::literal::{blank_strings_and_comments, find_balanced_end, split_top_level};
use crate::manifest::{to_camel_case, ComposableSignature};

lazy_static! {
    static ref ARROW_DECL_RE: Regex = Regex::new(
        r"export\s+const\s+(use[A-Za-z0-9_$]*)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:<[^>]*>\s*)?\("
    )
    .unwrap();
    static ref FUNCTION_DECL_RE: Regex = Regex::new(
        r"export\s+(?:default\s+)?(?:async\s+)?function\s*\*?\s*(use[A-Za-z0-9_$]*)\s*(?:<[^>]*>\s*)?\("
    )
    .unwrap();
    static ref RETURN_OBJECT_RE: Regex = Regex::new(r"\breturn\s*\{").unwrap();
    static ref IDENT_RE: Regex = Regex::new(r"[A-Za-z_$][\w$]*").unwrap();
}

/// Words that can sit before `,` or `:` in an initializer without being a
/// returned member.
const MEMBER_DENYLIST: &[&str] = &[
    "if", "else", "return", "const", "let", "var", "function", "for", "while", "do",
    "switch", "case", "break", "continue", "true", "false", "null", "undefined", "new",
    "this", "typeof", "instanceof", "void", "delete", "in", "of", "await", "async", "yield",
    "class", "extends", "super", "import", "export", "default", "try", "catch", "finally",
    "throw", "as",
];

/// `useToggle.ts`, `use-toggle.ts`; declaration and test files excluded.
/// `user-avatar.ts` and `useful.ts` are not composables.
pub fn is_composable_file(file_name: &str) -> bool {
    let prefixed = file_name
        .strip_prefix("use")
        .and_then(|rest| rest.bytes().next())
        .is_some_and(|b| b.is_ascii_uppercase() || b == b'-');

    prefixed
        && file_name.ends_with(".ts")
        && !file_name.ends_with(".d.ts")
        && !file_name.ends_with(".test.ts")
        && !file_name.ends_with(".spec.ts")
}

pub fn extract_composable(source: &str, file_name: &str) -> ComposableSignature {
    let code = blank_strings_and_comments(source);

    let declaration = [&*ARROW_DECL_RE, &*FUNCTION_DECL_RE]
        .iter()
        .filter_map(|re| re.captures(&code))
        .min_by_key(|caps| caps.get(0).map(|m| m.start()).unwrap_or(usize::MAX));

    let (name, params, body) = match declaration {
        Some(caps) => {
            let name = caps[1].to_string();
            let open = caps.get(0).map(|m| m.end() - 1).unwrap_or_default();
            match find_balanced_end(&code, open) {
                Some(end) => (name, &source[open + 1..end - 1], find_body(&code, end)),
                None => (name, "", None),
            }
        }
        None => (fallback_name(file_name), "", None),
    };

    let returned = match body {
        Some(Body::Object(open)) => Some(open),
        Some(Body::Block(open, end)) => top_level_return(&code, open + 1..end - 1),
        None => top_level_return(&code, 0..code.len()),
    };

    ComposableSignature {
        name,
        file_name: file_name.to_string(),
        signature: normalize_signature(params),
        returned_members: returned
            .map(|open| object_members(&code, open))
            .unwrap_or_default(),
    }
}

/// `use-click-outside.ts` -> `useClickOutside`.
fn fallback_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    to_camel_case(stem)
}

fn normalize_signature(params: &str) -> String {
    let parts: Vec<&str> = split_top_level(params, b',', true)
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    format!("({})", parts.join(", "))
}

enum Body {
    /// `{ ... }` block, as `[open, end)` in the blanked code.
    Block(usize, usize),
    /// `=> ({ ... })`; the index of the object's `{`.
    Object(usize),
}

/// The composable's body, searched from just past its parameter list.
/// Object types in a return annotation follow `:`, `|`, `&` or `,` and are
/// skipped; the first other top-level `{` opens the body.
fn find_body(code: &str, from: usize) -> Option<Body> {
    let bytes = code.as_bytes();
    let mut angle = 0usize;
    let mut prev = b')';
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'=' if angle == 0 && bytes.get(i + 1) == Some(&b'>') => {
                let start = skip_whitespace(code, i + 2);
                return match bytes.get(start) {
                    Some(b'{') => find_balanced_end(code, start).map(|end| Body::Block(start, end)),
                    Some(b'(') => {
                        let inner = skip_whitespace(code, start + 1);
                        (bytes.get(inner) == Some(&b'{')).then_some(Body::Object(inner))
                    }
                    _ => None,
                };
            }
            b'>' if i > 0 && bytes[i - 1] == b'=' => {}
            b'<' => angle += 1,
            b'>' => angle = angle.saturating_sub(1),
            b'{' if angle == 0 && !matches!(prev, b':' | b'|' | b'&' | b',') => {
                return find_balanced_end(code, i).map(|end| Body::Block(i, end));
            }
            b'{' | b'(' | b'[' => {
                let end = find_balanced_end(code, i)?;
                prev = bytes[end - 1];
                i = end;
                continue;
            }
            b';' if angle == 0 => return None,
            _ => {}
        }
        if !b.is_ascii_whitespace() {
            prev = b;
        }
        i += 1;
    }

    None
}

fn skip_whitespace(code: &str, from: usize) -> usize {
    let rest = code.get(from..).unwrap_or_default();
    from + (rest.len() - rest.trim_start().len())
}

/// `{` of the last `return { ... }` at the shallowest bracket depth inside
/// `scope`. Returns inside nested functions, branches and the returned
/// object's own initializers sit deeper and are ignored.
fn top_level_return(code: &str, scope: Range<usize>) -> Option<usize> {
    let region = code.get(scope.clone())?;
    let bytes = region.as_bytes();
    let mut depth = 0i64;
    let mut scanned = 0;
    let mut best: Option<(i64, usize)> = None;

    for m in RETURN_OBJECT_RE.find_iter(region) {
        for &b in &bytes[scanned..m.start()] {
            match b {
                b'{' | b'(' | b'[' => depth += 1,
                b'}' | b')' | b']' => depth -= 1,
                _ => {}
            }
        }
        scanned = m.start();

        let open = scope.start + m.end() - 1;
        if find_balanced_end(code, open).is_some() && best.map_or(true, |(d, _)| depth <= d) {
            best = Some((depth, open));
        }
    }

    best.map(|(_, open)| open)
}

/// Member names of the object literal opening at `open`.
fn object_members(code: &str, open: usize) -> Vec<String> {
    let Some(end) = find_balanced_end(code, open) else {
        return Vec::new();
    };

    let body = &code[open + 1..end - 1];
    let bytes = body.as_bytes();
    let mut members = Vec::new();

    for m in IDENT_RE.find_iter(body) {
        if m.start() > 0 {
            let before = bytes[m.start() - 1];
            if before.is_ascii_alphanumeric() || matches!(before, b'_' | b'$' | b'.') {
                continue;
            }
        }

        let after = body[m.end()..].trim_start();
        let terminated = after.is_empty() || after.starts_with(',') || after.starts_with(':');
        if terminated && !MEMBER_DENYLIST.contains(&m.as_str()) {
            members.push(m.as_str().to_string());
        }
    }

    members
}
