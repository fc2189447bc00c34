//! JSON codec for JSON Patch operations.
//!
//! Converts operations to and from their RFC 6902 wire form.

use serde_json::{json, Map, Value};

use super::types::{Op, PatchError};
use crate::pointer::{format_pointer, try_parse_pointer};

// ── Path helpers ──────────────────────────────────────────────────────────

fn decode_path(obj: &Map<String, Value>, key: &str, op: &str) -> Result<Vec<String>, PatchError> {
    let raw = obj
        .get(key)
        .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires '{key}'")))?
        .as_str()
        .ok_or_else(|| PatchError::InvalidOp(format!("'{key}' must be a string")))?;
    try_parse_pointer(raw).ok_or_else(|| PatchError::InvalidOp(format!("invalid pointer: {raw}")))
}

fn decode_value(obj: &Map<String, Value>, op: &str) -> Result<Value, PatchError> {
    obj.get("value")
        .cloned()
        .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires 'value'")))
}

// ── Serialization ─────────────────────────────────────────────────────────

pub fn to_json(op: &Op) -> Value {
    match op {
        Op::Add { path, value } => json!({
            "op": "add",
            "path": format_pointer(path),
            "value": value
        }),
        Op::Remove { path } => json!({
            "op": "remove",
            "path": format_pointer(path)
        }),
        Op::Replace { path, value } => json!({
            "op": "replace",
            "path": format_pointer(path),
            "value": value
        }),
        Op::Copy { path, from } => json!({
            "op": "copy",
            "path": format_pointer(path),
            "from": format_pointer(from)
        }),
        Op::Move { path, from } => json!({
            "op": "move",
            "path": format_pointer(path),
            "from": format_pointer(from)
        }),
        Op::Test { path, value } => json!({
            "op": "test",
            "path": format_pointer(path),
            "value": value
        }),
    }
}

// ── Deserialization ───────────────────────────────────────────────────────

pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("operation must be an object".into()))?;
    let op_str = obj
        .get("op")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PatchError::InvalidOp("missing 'op' field".into()))?;
    let path = decode_path(obj, "path", op_str)?;

    match op_str {
        "add" => Ok(Op::Add { path, value: decode_value(obj, op_str)? }),
        "remove" => Ok(Op::Remove { path }),
        "replace" => Ok(Op::Replace { path, value: decode_value(obj, op_str)? }),
        "copy" => Ok(Op::Copy { path, from: decode_path(obj, "from", op_str)? }),
        "move" => Ok(Op::Move { path, from: decode_path(obj, "from", op_str)? }),
        "test" => Ok(Op::Test { path, value: decode_value(obj, op_str)? }),
        other => Err(PatchError::InvalidOp(format!("unknown op: {other}"))),
    }
}

/// Serialize a list of operations to a JSON array.
pub fn to_json_patch(ops: &[Op]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

/// Deserialize a JSON array into a list of operations.
pub fn from_json_patch(v: &Value) -> Result<Vec<Op>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

/// Compact textual form of a patch, as stored in rollback records.
pub fn to_patch_text(ops: &[Op]) -> String {
    to_json_patch(ops).to_string()
}

/// Parses patch text produced by [`to_patch_text`] or any RFC 6902 document.
pub fn from_patch_text(text: &str) -> Result<Vec<Op>, PatchError> {
    let v: Value =
        serde_json::from_str(text).map_err(|e| PatchError::InvalidJson(e.to_string()))?;
    from_json_patch(&v)
}
