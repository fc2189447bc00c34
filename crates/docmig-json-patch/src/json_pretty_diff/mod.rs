//! Display-oriented diff of two JSON values.
//!
//! The output reads like the pretty-printed destination document, with every
//! line prefixed by a marker column:
//!
//! ```text
//!  {
//! -  "foo": "bar",
//! +  "foo": "baz",
//!    "n": 1
//!  }
//! ```
//!
//! `' '` marks unchanged lines, `'-'` lines only present in the source and
//! `'+'` lines only present in the destination. This is for humans; use
//! [`crate::json_patch_diff::diff`] for something that can be applied.

use serde_json::{Map, Value};

const INDENT: &str = "  ";

/// Render the difference between `src` and `dst`. Equal inputs render as the
/// empty string.
pub fn pretty_diff(src: &Value, dst: &Value) -> String {
    if src == dst {
        return String::new();
    }
    let mut out = Printer::default();
    out.diff_value(0, None, src, dst, false);
    out.lines.join("\n")
}

enum Entry<'a> {
    Same(Option<&'a str>, &'a Value),
    Removed(Option<&'a str>, &'a Value),
    Added(Option<&'a str>, &'a Value),
    Changed(Option<&'a str>, &'a Value, &'a Value),
}

#[derive(Default)]
struct Printer {
    lines: Vec<String>,
}

impl Printer {
    fn push(&mut self, marker: char, depth: usize, text: &str) {
        self.lines.push(format!("{marker}{}{text}", INDENT.repeat(depth)));
    }

    fn emit_value(&mut self, marker: char, depth: usize, key: Option<&str>, value: &Value, comma: bool) {
        let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        let mut lines = rendered.lines().peekable();
        let mut first = true;
        while let Some(line) = lines.next() {
            let mut text = String::new();
            if first {
                text.push_str(&key_prefix(key));
                first = false;
            }
            text.push_str(line);
            if comma && lines.peek().is_none() {
                text.push(',');
            }
            self.push(marker, depth, &text);
        }
    }

    fn diff_value(&mut self, depth: usize, key: Option<&str>, src: &Value, dst: &Value, comma: bool) {
        let close = if comma { "," } else { "" };
        match (src, dst) {
            _ if src == dst => self.emit_value(' ', depth, key, dst, comma),
            (Value::Object(s), Value::Object(d)) => {
                self.push(' ', depth, &format!("{}{{", key_prefix(key)));
                let entries = object_entries(s, d);
                self.emit_entries(depth + 1, entries);
                self.push(' ', depth, &format!("}}{close}"));
            }
            (Value::Array(s), Value::Array(d)) => {
                self.push(' ', depth, &format!("{}[", key_prefix(key)));
                let entries = array_entries(s, d);
                self.emit_entries(depth + 1, entries);
                self.push(' ', depth, &format!("]{close}"));
            }
            _ => {
                self.emit_value('-', depth, key, src, comma);
                self.emit_value('+', depth, key, dst, comma);
            }
        }
    }

    fn emit_entries(&mut self, depth: usize, entries: Vec<Entry<'_>>) {
        let last = entries.len().saturating_sub(1);
        for (i, entry) in entries.into_iter().enumerate() {
            let comma = i != last;
            match entry {
                Entry::Same(key, v) => self.emit_value(' ', depth, key, v, comma),
                Entry::Removed(key, v) => self.emit_value('-', depth, key, v, comma),
                Entry::Added(key, v) => self.emit_value('+', depth, key, v, comma),
                Entry::Changed(key, s, d) => self.diff_value(depth, key, s, d, comma),
            }
        }
    }
}

fn key_prefix(key: Option<&str>) -> String {
    match key {
        Some(k) => format!("{}: ", Value::String(k.to_string())),
        None => String::new(),
    }
}

/// Source keys in source order, then keys only present in the destination.
fn object_entries<'a>(src: &'a Map<String, Value>, dst: &'a Map<String, Value>) -> Vec<Entry<'a>> {
    let mut entries = Vec::with_capacity(src.len().max(dst.len()));
    for (key, s) in src {
        entries.push(match dst.get(key) {
            Some(d) if d == s => Entry::Same(Some(key.as_str()), d),
            Some(d) => Entry::Changed(Some(key.as_str()), s, d),
            None => Entry::Removed(Some(key.as_str()), s),
        });
    }
    for (key, d) in dst {
        if !src.contains_key(key) {
            entries.push(Entry::Added(Some(key.as_str()), d));
        }
    }
    entries
}

fn array_entries<'a>(src: &'a [Value], dst: &'a [Value]) -> Vec<Entry<'a>> {
    let prefix = src.iter().zip(dst).take_while(|(a, b)| a == b).count();
    let max_suffix = src.len().min(dst.len()) - prefix;
    let suffix = src
        .iter()
        .rev()
        .zip(dst.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    let src_mid = &src[prefix..src.len() - suffix];
    let dst_mid = &dst[prefix..dst.len() - suffix];

    let mut entries: Vec<Entry<'a>> = dst[..prefix].iter().map(|v| Entry::Same(None, v)).collect();
    if src_mid.len() == dst_mid.len() {
        entries.extend(src_mid.iter().zip(dst_mid).map(|(s, d)| Entry::Changed(None, s, d)));
    } else {
        entries.extend(src_mid.iter().map(|v| Entry::Removed(None, v)));
        entries.extend(dst_mid.iter().map(|v| Entry::Added(None, v)));
    }
    entries.extend(dst[dst.len() - suffix..].iter().map(|v| Entry::Same(None, v)));
    entries
}
