//! Slot discovery for single-file UI descriptors (`.vue`).
//!
//! The outermost `<template>` region is isolated by a depth-tracking tag
//! scan, then slots inside it are found by one of two strategies:
//!
//! - `Tree`: html5ever builds a DOM of the region, walked depth-first.
//! - `Scan`: a linear tag scanner that tracks quotes, comments and `{{ }}`
//!   interpolations itself.
//!
//! Both yield the same slots, in document order, first occurrence of each
//! name winning. `Tree` needs the `html-tree` feature and otherwise falls
//! back to `Scan`.

use serde::{Deserialize, Serialize};

use crate::manifest::SlotDeclaration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStrategy {
    #[default]
    Tree,
    Scan,
}

/// Slots of a descriptor using the default strategy.
pub fn extract_slots(source: &str) -> Vec<SlotDeclaration> {
    extract_slots_with(source, SlotStrategy::default())
}

pub fn extract_slots_with(source: &str, strategy: SlotStrategy) -> Vec<SlotDeclaration> {
    let Some(region) = template_region(source) else {
        return Vec::new();
    };

    let candidates = match strategy {
        #[cfg(feature = "html-tree")]
        SlotStrategy::Tree => tree::slot_attributes(region),
        _ => scan_slot_attributes(region),
    };

    let mut slots: Vec<SlotDeclaration> = Vec::new();
    for attrs in candidates {
        let slot = slot_from_attributes(attrs);
        if !slots.iter().any(|s| s.name == slot.name) {
            slots.push(slot);
        }
    }
    slots
}

// ═══════════════════════════════════════════════════════════════════════════════
// SLOT ATTRIBUTES
// ═══════════════════════════════════════════════════════════════════════════════

type Attributes = Vec<(String, Option<String>)>;

enum Binding {
    Static(String),
    Bound(String),
    /// Events, directives and dynamic arguments; never slot props.
    Other,
}

fn binding_target(attr: &str) -> Binding {
    let bound = attr
        .strip_prefix("v-bind:")
        .or_else(|| attr.strip_prefix(':'))
        .or_else(|| attr.strip_prefix('.'));

    if let Some(rest) = bound {
        let target = rest.split('.').next().unwrap_or_default();
        if target.is_empty() || target.starts_with('[') {
            return Binding::Other;
        }
        return Binding::Bound(target.to_string());
    }

    if attr.starts_with("v-") || attr.starts_with('@') || attr.starts_with('#') {
        return Binding::Other;
    }
    Binding::Static(attr.to_string())
}

fn slot_from_attributes(attrs: Attributes) -> SlotDeclaration {
    let mut static_name = None;
    let mut bound_name = None;
    let mut scope_props = Vec::new();

    for (attr, value) in attrs {
        match binding_target(&attr) {
            Binding::Static(target) if target == "name" => static_name = value,
            Binding::Bound(target) if target == "name" => bound_name = value,
            Binding::Static(target) | Binding::Bound(target) if target == "class" => {}
            Binding::Static(target) | Binding::Bound(target) => scope_props.push(target),
            Binding::Other => {}
        }
    }

    let name = static_name
        .filter(|n| !n.trim().is_empty())
        .map(|n| n.trim().to_string())
        .or_else(|| {
            bound_name
                .filter(|e| !e.trim().is_empty())
                .map(|e| format!("[{}]", e.trim()))
        })
        .unwrap_or_else(|| "default".to_string());

    SlotDeclaration::new(name, scope_props)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TAG SCANNER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
struct Tag<'s> {
    name: &'s str,
    attrs: Vec<(&'s str, Option<&'s str>)>,
    closing: bool,
    self_closing: bool,
    start: usize,
    end: usize,
}

/// Linear tag tokenizer.
///
/// Skips comments, `{{ }}` interpolations and the bodies of `<script>` and
/// `<style>`. Quoted attribute values may contain `<`, `>` and `/`.
struct TagScanner<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> TagScanner<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_past(&mut self, needle: &str) {
        self.pos = match self.src[self.pos..].find(needle) {
            Some(offset) => self.pos + offset + needle.len(),
            None => self.src.len(),
        };
    }

    fn read_name(&mut self) -> &'s str {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_alphanumeric()
                || matches!(bytes[self.pos], b'-' | b'_' | b'.' | b':'))
        {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Attributes up to and including the closing `>`; returns `self_closing`.
    fn read_attributes(&mut self, attrs: &mut Vec<(&'s str, Option<&'s str>)>) -> bool {
        let bytes = self.src.as_bytes();
        loop {
            self.skip_whitespace();
            let Some(&b) = bytes.get(self.pos) else {
                return false;
            };
            match b {
                b'>' => {
                    self.pos += 1;
                    return false;
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    return true;
                }
                b'/' => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let name_start = self.pos;
            while self.pos < bytes.len() {
                let c = bytes[self.pos];
                if c.is_ascii_whitespace()
                    || c == b'='
                    || c == b'>'
                    || (c == b'/' && bytes.get(self.pos + 1) == Some(&b'>'))
                {
                    break;
                }
                self.pos += 1;
            }
            if self.pos == name_start {
                self.pos += 1;
                continue;
            }
            let name = &self.src[name_start..self.pos];

            self.skip_whitespace();
            if bytes.get(self.pos) != Some(&b'=') {
                attrs.push((name, None));
                continue;
            }
            self.pos += 1;
            self.skip_whitespace();

            let value = match bytes.get(self.pos) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let value_start = self.pos + 1;
                    let value_end = self.src[value_start..]
                        .find(q as char)
                        .map(|offset| value_start + offset)
                        .unwrap_or(self.src.len());
                    self.pos = (value_end + 1).min(self.src.len());
                    &self.src[value_start..value_end]
                }
                _ => {
                    let value_start = self.pos;
                    while self.pos < bytes.len()
                        && !bytes[self.pos].is_ascii_whitespace()
                        && bytes[self.pos] != b'>'
                    {
                        self.pos += 1;
                    }
                    &self.src[value_start..self.pos]
                }
            };
            attrs.push((name, Some(value)));
        }
    }
}

impl<'s> Iterator for TagScanner<'s> {
    type Item = Tag<'s>;

    fn next(&mut self) -> Option<Tag<'s>> {
        let bytes = self.src.as_bytes();

        while self.pos < bytes.len() {
            let rest = &bytes[self.pos..];

            if rest.starts_with(b"{{") {
                self.pos += 2;
                self.skip_past("}}");
                continue;
            }
            if rest.starts_with(b"<!--") {
                self.pos += 4;
                self.skip_past("-->");
                continue;
            }
            if rest[0] != b'<' {
                // Jump to the next ASCII delimiter so `pos` stays on a char boundary.
                self.pos += 1 + rest[1..]
                    .iter()
                    .position(|&b| b == b'<' || b == b'{')
                    .unwrap_or(rest.len() - 1);
                continue;
            }

            let start = self.pos;
            let closing = bytes.get(self.pos + 1) == Some(&b'/');
            let name_at = if closing { self.pos + 2 } else { self.pos + 1 };
            if !bytes.get(name_at).is_some_and(|b| b.is_ascii_alphabetic()) {
                self.pos += 1;
                continue;
            }

            self.pos = name_at;
            let name = self.read_name();

            if closing {
                self.skip_past(">");
                return Some(Tag {
                    name,
                    attrs: Vec::new(),
                    closing: true,
                    self_closing: false,
                    start,
                    end: self.pos,
                });
            }

            let mut attrs = Vec::new();
            let self_closing = self.read_attributes(&mut attrs);
            let end = self.pos;

            if !self_closing && (name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style")) {
                let closer = format!("</{}", name.to_ascii_lowercase());
                match self.src[self.pos..].to_ascii_lowercase().find(&closer) {
                    Some(offset) => self.pos += offset,
                    None => self.pos = self.src.len(),
                }
            }

            return Some(Tag {
                name,
                attrs,
                closing: false,
                self_closing,
                start,
                end,
            });
        }

        None
    }
}

/// Contents of the outermost `<template>` element. Nested `<template>`s are
/// tracked by depth so an inner closer does not end the region.
pub fn template_region(source: &str) -> Option<&str> {
    let mut scanner = TagScanner::new(source);

    let opener = scanner.find(|tag| !tag.closing && tag.name == "template")?;
    if opener.self_closing {
        return Some("");
    }

    let mut depth = 1usize;
    for tag in scanner {
        if tag.name != "template" || tag.self_closing {
            continue;
        }
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return Some(&source[opener.end..tag.start]);
            }
        } else {
            depth += 1;
        }
    }

    Some(&source[opener.end..])
}

fn scan_slot_attributes(region: &str) -> Vec<Attributes> {
    TagScanner::new(region)
        .filter(|tag| !tag.closing && tag.name == "slot")
        .map(|tag| {
            tag.attrs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
                .collect()
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// TREE STRATEGY
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "html-tree")]
mod tree {
    use html5ever::parse_document;
    use html5ever::tendril::TendrilSink;
    use markup5ever_rcdom::{Handle, NodeData, RcDom};
    use lazy_static::lazy_static;
    use regex::Regex;
    use std::collections::HashMap;

    use super::{Attributes, TagScanner};

    lazy_static! {
        /// Elements whose HTML parsing rules move, drop or swallow their children.
        /// They are renamed to inert custom elements before html5ever sees them.
        static ref SPECIAL_TAG_RE: Regex = Regex::new(
            r"(?i)(</?)(html|head|body|template|table|caption|colgroup|col|thead|tbody|tfoot|tr|td|th|select|option|optgroup|textarea|title|form|frameset|frame|noscript|noembed|noframes|iframe|xmp|plaintext)([\s/>])"
        )
        .unwrap();

        static ref INTERPOLATION_RE: Regex = Regex::new(r"(?s)\{\{.*?\}\}").unwrap();
    }

    /// html5ever lowercases attribute names; map them back to source casing.
    /// Names are read with the tag scanner, so quoted, unquoted and valueless
    /// attributes are all covered.
    fn attribute_case_map(region: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for tag in TagScanner::new(region).filter(|tag| !tag.closing) {
            for (original, _) in tag.attrs {
                if original.chars().any(|c| c.is_ascii_uppercase()) {
                    map.entry(original.to_ascii_lowercase())
                        .or_insert_with(|| original.to_string());
                }
            }
        }
        map
    }

    fn prepare(region: &str) -> String {
        let blanked = INTERPOLATION_RE.replace_all(region, "");
        SPECIAL_TAG_RE
            .replace_all(&blanked, "${1}zm-${2}${3}")
            .to_string()
    }

    pub(super) fn slot_attributes(region: &str) -> Vec<Attributes> {
        let prepared = prepare(region);
        let dom = match parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut prepared.as_bytes())
        {
            Ok(dom) => dom,
            Err(e) => {
                tracing::debug!(error = %e, "html5ever failed, using the tag scanner");
                return super::scan_slot_attributes(region);
            }
        };

        let case_map = attribute_case_map(region);
        let mut found = Vec::new();
        collect(&dom.document, &case_map, &mut found);
        found
    }

    fn collect(handle: &Handle, case_map: &HashMap<String, String>, found: &mut Vec<Attributes>) {
        if let NodeData::Element { name, attrs, .. } = &handle.data {
            if &*name.local == "slot" {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        let lower = attr.name.local.to_string();
                        let name = case_map.get(&lower).cloned().unwrap_or(lower);
                        (name, Some(attr.value.to_string()))
                    })
                    .collect();
                found.push(attrs);
            }
        }

        for child in handle.children.borrow().iter() {
            collect(child, case_map, found);
        }
    }
}
