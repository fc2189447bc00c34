//! JSON Patch apply logic.

use serde_json::Value;

use super::types::{Op, PatchError, PatchResult};
use crate::pointer::{self, format_pointer};

// ── Path navigation ───────────────────────────────────────────────────────

fn get_mut_at<'a>(doc: &'a mut Value, path: &[String]) -> Result<&'a mut Value, PatchError> {
    pointer::get_mut(doc, path).ok_or_else(|| PatchError::NotFound(format_pointer(path)))
}

fn array_index(key: &str, path: &[String]) -> Result<usize, PatchError> {
    pointer::parse_index(key).ok_or_else(|| PatchError::InvalidIndex(format_pointer(path)))
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(doc: &mut Value, path: &[String], value: Value) -> Result<Option<Value>, PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        return Ok(Some(std::mem::replace(doc, value)));
    };
    match get_mut_at(doc, parent_path)? {
        Value::Object(map) => Ok(map.insert(key.clone(), value)),
        Value::Array(arr) => {
            if key == "-" {
                arr.push(value);
                return Ok(None);
            }
            let idx = array_index(key, path)?;
            if idx > arr.len() {
                return Err(PatchError::InvalidIndex(format_pointer(path)));
            }
            arr.insert(idx, value);
            Ok(None)
        }
        _ => Err(PatchError::InvalidTarget(format_pointer(path))),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<Value, PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        return Err(PatchError::InvalidTarget(String::new()));
    };
    match get_mut_at(doc, parent_path)? {
        Value::Object(map) => map
            .shift_remove(key)
            .ok_or_else(|| PatchError::NotFound(format_pointer(path))),
        Value::Array(arr) => {
            let idx = array_index(key, path)?;
            if idx >= arr.len() {
                return Err(PatchError::NotFound(format_pointer(path)));
            }
            Ok(arr.remove(idx))
        }
        _ => Err(PatchError::InvalidTarget(format_pointer(path))),
    }
}

fn apply_replace(doc: &mut Value, path: &[String], value: Value) -> Result<Value, PatchError> {
    let target = get_mut_at(doc, path)?;
    Ok(std::mem::replace(target, value))
}

fn apply_copy(doc: &mut Value, path: &[String], from: &[String]) -> Result<Option<Value>, PatchError> {
    let src = pointer::get(doc, from)
        .ok_or_else(|| PatchError::NotFound(format_pointer(from)))?
        .clone();
    apply_add(doc, path, src)
}

fn apply_move(doc: &mut Value, path: &[String], from: &[String]) -> Result<Option<Value>, PatchError> {
    if pointer::is_child(from, path) {
        return Err(PatchError::InvalidTarget(format_pointer(path)));
    }
    if path == from {
        return Ok(None);
    }
    let value = apply_remove(doc, from)?;
    apply_add(doc, path, value)
}

fn apply_test(doc: &Value, path: &[String], value: &Value) -> Result<(), PatchError> {
    let actual = pointer::get(doc, path).ok_or_else(|| PatchError::NotFound(format_pointer(path)))?;
    if actual == value {
        Ok(())
    } else {
        Err(PatchError::Test(format_pointer(path)))
    }
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single operation to the document in place.
///
/// Returns the value displaced at the target path, if any.
pub fn apply_op(doc: &mut Value, op: &Op) -> Result<Option<Value>, PatchError> {
    match op {
        Op::Add { path, value } => apply_add(doc, path, value.clone()),
        Op::Remove { path } => apply_remove(doc, path).map(Some),
        Op::Replace { path, value } => apply_replace(doc, path, value.clone()).map(Some),
        Op::Copy { path, from } => apply_copy(doc, path, from),
        Op::Move { path, from } => apply_move(doc, path, from),
        Op::Test { path, value } => {
            apply_test(doc, path, value)?;
            Ok(None)
        }
    }
}

/// Apply a sequence of operations. The first failing op aborts the patch and
/// the partially patched document is dropped.
pub fn apply_ops(mut doc: Value, ops: &[Op]) -> Result<PatchResult, PatchError> {
    let mut old = Vec::with_capacity(ops.len());
    for op in ops {
        old.push(apply_op(&mut doc, op)?);
    }
    Ok(PatchResult { doc, old })
}

/// Convenience wrapper returning only the patched document.
pub fn apply_patch(doc: Value, ops: &[Op]) -> Result<Value, PatchError> {
    apply_ops(doc, ops).map(|res| res.doc)
}

// ── Tests ─────────────────────────────────────────────────────────────────
