//! Text-level helpers for JavaScript/TypeScript snippets.
//!
//! These work on raw source text without a parser: balanced bracket
//! matching that skips strings and comments, top-level splitting, and a
//! small object-literal reader used for the token tables.

use lazy_static::lazy_static;
use regex::Regex;

// ═══════════════════════════════════════════════════════════════════════════════
// CODE WALKER
// ═══════════════════════════════════════════════════════════════════════════════

/// Walk `text` byte by byte, skipping string literals and comments, calling
/// `visit(index, byte, depth)` for every code byte.
///
/// `depth` is the bracket depth outside an opener and after a closer, so a
/// balanced `{a}` reports `{` and `}` both at depth 0. With `angle` set,
/// `<`/`>` count as brackets (except the `>` of `=>`). The walk stops when
/// `visit` returns `false`.
fn walk_code(text: &str, angle: bool, mut visit: impl FnMut(usize, u8, usize) -> bool) {
    let bytes = text.as_bytes();
    let mut depth: usize = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        match b {
            b'"' | b'\'' | b'`' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 2;
                continue;
            }
            _ => {}
        }

        let is_open = matches!(b, b'(' | b'[' | b'{') || (angle && b == b'<');
        let is_close = matches!(b, b')' | b']' | b'}')
            || (angle && b == b'>' && (i == 0 || bytes[i - 1] != b'='));

        if is_close {
            depth = depth.saturating_sub(1);
        }
        if !visit(i, b, depth) {
            return;
        }
        if is_open {
            depth += 1;
        }
        i += 1;
    }
}

/// Index just past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Find the end (exclusive) of the bracket group opening at `open_index`.
pub fn find_balanced_end(text: &str, open_index: usize) -> Option<usize> {
    let (open, close) = match text.as_bytes().get(open_index)? {
        b'{' => (b'{', b'}'),
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut end = None;
    let mut started = false;
    walk_code(&text[open_index..], false, |i, b, depth| {
        if i == 0 {
            started = b == open;
            return started;
        }
        if b == close && depth == 0 {
            end = Some(open_index + i + 1);
            return false;
        }
        true
    });
    end
}

/// Split on `separator` wherever it sits outside brackets, strings and comments.
pub fn split_top_level(text: &str, separator: u8, angle: bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    walk_code(text, angle, |i, b, depth| {
        if b == separator && depth == 0 {
            parts.push(&text[last..i]);
            last = i + 1;
        }
        true
    });
    parts.push(&text[last..]);
    parts
}

/// Split once at the first top-level `separator`.
pub fn split_once_top_level(text: &str, separator: u8) -> Option<(&str, &str)> {
    let mut found = None;
    walk_code(text, false, |i, b, depth| {
        if b == separator && depth == 0 {
            found = Some(i);
            return false;
        }
        true
    });
    found.map(|i| (&text[..i], &text[i + 1..]))
}

/// Copy of `text` with string contents and comments replaced by spaces.
/// Byte offsets are preserved and quote characters are kept, so matches map
/// back onto the original and blanked strings still read as values.
pub fn blank_strings_and_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
                let end = skip_string(bytes, i);
                let close = if end > i + 1 && bytes[end - 1] == bytes[i] {
                    end - 1
                } else {
                    end
                };
                out[i + 1..close].fill(b' ');
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                out[start..i].fill(b' ');
            }
            _ => i += 1,
        }
    }

    // Blanked ranges always cover whole characters.
    String::from_utf8(out).unwrap_or_else(|_| text.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRING LITERALS
// ═══════════════════════════════════════════════════════════════════════════════

/// Strip one pair of matching quote characters, if present.
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'' | b'`')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Value of a single/double quoted literal, or a backtick literal without interpolation.
pub fn parse_string_literal(s: &str) -> Option<String> {
    let trimmed = s.trim();

    if (trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2)
        || (trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() >= 2)
    {
        return Some(unescape_string(&trimmed[1..trimmed.len() - 1]));
    }

    if trimmed.starts_with('`') && trimmed.ends_with('`') && trimmed.len() >= 2 {
        let inner = &trimmed[1..trimmed.len() - 1];
        if !inner.contains("${") {
            return Some(unescape_string(inner));
        }
    }

    None
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// OBJECT LITERALS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Object(Vec<(String, LiteralValue)>),
    /// Any other value, as trimmed source text.
    Raw(String),
}

impl LiteralValue {
    /// The string value if this is a string literal, else the raw text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            LiteralValue::Raw(raw) => Some(parse_string_literal(raw).unwrap_or_else(|| raw.clone())),
            LiteralValue::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, LiteralValue)]> {
        match self {
            LiteralValue::Object(entries) => Some(entries),
            LiteralValue::Raw(_) => None,
        }
    }
}

/// Read an object literal (`text` starts at `{`) into ordered key/value pairs.
/// Spread entries are skipped; shorthand entries map to their own name.
pub fn parse_object_literal(text: &str) -> Option<Vec<(String, LiteralValue)>> {
    let text = text.trim_start();
    let end = find_balanced_end(text, 0)?;
    let inner = &text[1..end - 1];

    let mut entries = Vec::new();
    for part in split_top_level(inner, b',', false) {
        let part = part.trim();
        if part.is_empty() || part.starts_with("...") {
            continue;
        }

        let (key, value) = match split_once_top_level(part, b':') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (part, part),
        };
        let key = strip_leading_comments(key);
        let value = strip_leading_comments(value);

        let value = if value.starts_with('{') {
            parse_object_literal(value)
                .map(LiteralValue::Object)
                .unwrap_or_else(|| LiteralValue::Raw(value.to_string()))
        } else {
            LiteralValue::Raw(strip_const_assertion(value).to_string())
        };
        entries.push((strip_quotes(key).to_string(), value));
    }

    Some(entries)
}

lazy_static! {
    static ref LEADING_COMMENTS_RE: Regex =
        Regex::new(r"^(?:\s*(?://[^\n]*\n|/\*[\s\S]*?\*/))*\s*").unwrap();
    static ref CONST_OBJECT_RE: Regex = Regex::new(
        r"(?:^|[\s;])(?:export\s+)?const\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*\{"
    )
    .unwrap();
}

fn strip_leading_comments(s: &str) -> &str {
    match LEADING_COMMENTS_RE.find(s) {
        Some(m) => s[m.end()..].trim(),
        None => s.trim(),
    }
}

fn strip_const_assertion(s: &str) -> &str {
    s.strip_suffix("as const").map(str::trim_end).unwrap_or(s)
}

/// Find `const NAME = { ... }` declarations and read their object literals.
pub fn find_const_objects(source: &str) -> Vec<(String, Vec<(String, LiteralValue)>)> {
    let code = blank_strings_and_comments(source);
    let mut found = Vec::new();
    for caps in CONST_OBJECT_RE.captures_iter(&code) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let open = whole.end() - 1;
        if let Some(entries) = parse_object_literal(&source[open..]) {
            found.push((source[name.range()].to_string(), entries));
        }
    }
    found
}
