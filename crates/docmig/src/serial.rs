//! Encoding of [`RichValue`] trees into plain JSON and back.
//!
//! Values JSON cannot express are written as strings wrapped in a tag on
//! both sides:
//!
//! | value       | encoded as                        |
//! |-------------|-----------------------------------|
//! | timestamp   | `<time>2024-05-01T10:00:00Z<time>` |
//! | reference   | `<ref>users/alice<ref>`           |
//! | delete      | `<delete>!delete<delete>`         |
//!
//! Everything else maps one to one. `deserialize(serialize(v)) == v` holds for
//! every tree. The reverse does not: a user string that happens to look like
//! a sentinel decodes as the tagged value.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::value::{Fields, RichValue};

pub const TIME_TAG: &str = "<time>";
pub const REF_TAG: &str = "<ref>";
pub const DELETE_TAG: &str = "<delete>";
pub const DELETE_PAYLOAD: &str = "!delete";

pub const SENTINEL_TAGS: [&str; 3] = [TIME_TAG, REF_TAG, DELETE_TAG];

fn wrap(tag: &str, payload: &str) -> String {
    let mut out = String::with_capacity(tag.len() * 2 + payload.len());
    out.push_str(tag);
    out.push_str(payload);
    out.push_str(tag);
    out
}

fn unwrap_tag<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    if s.len() < tag.len() * 2 {
        return None;
    }
    s.strip_prefix(tag)?.strip_suffix(tag)
}

pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// The encoded form of [`RichValue::Delete`].
pub fn delete_sentinel() -> String {
    wrap(DELETE_TAG, DELETE_PAYLOAD)
}

// ── RichValue → JSON ──────────────────────────────────────────────────────

pub fn serialize(value: &RichValue) -> Value {
    match value {
        RichValue::Null => Value::Null,
        RichValue::Bool(b) => Value::Bool(*b),
        RichValue::Number(n) => Value::Number(n.clone()),
        RichValue::String(s) => Value::String(s.clone()),
        RichValue::Array(items) => Value::Array(items.iter().map(serialize).collect()),
        RichValue::Map(fields) => serialize_fields(fields),
        RichValue::Timestamp(t) => Value::String(wrap(TIME_TAG, &format_timestamp(t))),
        RichValue::Reference(path) => Value::String(wrap(REF_TAG, path)),
        RichValue::Delete => Value::String(delete_sentinel()),
    }
}

pub fn serialize_fields(fields: &Fields) -> Value {
    let mut map = Map::with_capacity(fields.len());
    for (k, v) in fields {
        map.insert(k.clone(), serialize(v));
    }
    Value::Object(map)
}

// ── JSON → RichValue ──────────────────────────────────────────────────────

pub fn deserialize(value: Value) -> RichValue {
    match value {
        Value::Null => RichValue::Null,
        Value::Bool(b) => RichValue::Bool(b),
        Value::Number(n) => RichValue::Number(n),
        Value::String(s) => deserialize_str(s),
        Value::Array(items) => RichValue::Array(items.into_iter().map(deserialize).collect()),
        Value::Object(map) => RichValue::Map(deserialize_map(map)),
    }
}

/// Decodes a JSON object into document fields. Returns `None` for any other
/// JSON shape.
pub fn deserialize_fields(value: Value) -> Option<Fields> {
    match value {
        Value::Object(map) => Some(deserialize_map(map)),
        _ => None,
    }
}

fn deserialize_map(map: Map<String, Value>) -> Fields {
    map.into_iter().map(|(k, v)| (k, deserialize(v))).collect()
}

fn deserialize_str(s: String) -> RichValue {
    if let Some(payload) = unwrap_tag(&s, TIME_TAG) {
        if let Ok(t) = DateTime::parse_from_rfc3339(payload) {
            return RichValue::Timestamp(t.with_timezone(&Utc));
        }
    } else if let Some(payload) = unwrap_tag(&s, REF_TAG) {
        return RichValue::Reference(payload.to_string());
    } else if unwrap_tag(&s, DELETE_TAG) == Some(DELETE_PAYLOAD) {
        return RichValue::Delete;
    }
    RichValue::String(s)
}

/// Finds the first timestamp whose year falls outside `0..=9999`. RFC 3339
/// cannot express such instants, so they would not survive a round trip.
pub fn unrepresentable_timestamp(fields: &Fields) -> Option<DateTime<Utc>> {
    fields.values().find_map(find_unrepresentable)
}

fn find_unrepresentable(value: &RichValue) -> Option<DateTime<Utc>> {
    match value {
        RichValue::Timestamp(t) if !(0..=9999).contains(&t.year()) => Some(*t),
        RichValue::Array(items) => items.iter().find_map(find_unrepresentable),
        RichValue::Map(fields) => unrepresentable_timestamp(fields),
        _ => None,
    }
}

/// True when `value` is the encoded delete marker.
pub fn is_delete_sentinel(value: &Value) -> bool {
    value
        .as_str()
        .and_then(|s| unwrap_tag(s, DELETE_TAG))
        .is_some_and(|payload| payload == DELETE_PAYLOAD)
}

/// Removes the quote-adjacent sentinel tags from rendered JSON text, so that
/// `"<time>2024-05-01T10:00:00Z<time>"` displays as `2024-05-01T10:00:00Z`.
pub fn strip_sentinels(rendered: &str) -> String {
    let mut out = rendered.to_string();
    for tag in SENTINEL_TAGS {
        out = out.replace(&format!("\"{tag}"), "").replace(&format!("{tag}\""), "");
    }
    out
}
