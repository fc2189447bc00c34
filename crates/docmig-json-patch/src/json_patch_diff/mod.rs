//! JSON Patch diff: generate a JSON Patch from two document values.
//!
//! The generated patch only uses `add`, `remove` and `replace`, and always
//! satisfies `apply_patch(src, diff(src, dst)) == dst`.

use serde_json::{Map, Value};

use crate::json_patch::types::Op;

// ── Public API ────────────────────────────────────────────────────────────

/// Generate a JSON Patch (list of operations) that transforms `src` into `dst`.
pub fn diff(src: &Value, dst: &Value) -> Vec<Op> {
    let mut ops = Vec::new();
    diff_at_path(&mut ops, &[], src, dst);
    ops
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_at_path(ops: &mut Vec<Op>, path: &[String], src: &Value, dst: &Value) {
    if src == dst {
        return;
    }
    match (src, dst) {
        (Value::Object(s), Value::Object(d)) => diff_obj(ops, path, s, d),
        (Value::Array(s), Value::Array(d)) => diff_arr(ops, path, s, d),
        _ => ops.push(Op::Replace { path: path.to_vec(), value: dst.clone() }),
    }
}

fn child(path: &[String], step: impl Into<String>) -> Vec<String> {
    let mut p = Vec::with_capacity(path.len() + 1);
    p.extend_from_slice(path);
    p.push(step.into());
    p
}

fn diff_obj(ops: &mut Vec<Op>, path: &[String], src: &Map<String, Value>, dst: &Map<String, Value>) {
    for key in src.keys() {
        if !dst.contains_key(key) {
            ops.push(Op::Remove { path: child(path, key.as_str()) });
        }
    }
    for (key, dst_val) in dst {
        let p = child(path, key.as_str());
        match src.get(key) {
            None => ops.push(Op::Add { path: p, value: dst_val.clone() }),
            Some(src_val) => diff_at_path(ops, &p, src_val, dst_val),
        }
    }
}

fn diff_arr(ops: &mut Vec<Op>, path: &[String], src: &[Value], dst: &[Value]) {
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

    if src_mid.len() == dst_mid.len() {
        for (i, (s, d)) in src_mid.iter().zip(dst_mid).enumerate() {
            diff_at_path(ops, &child(path, (prefix + i).to_string()), s, d);
        }
        return;
    }

    // Remove from the highest index down so earlier indices stay valid.
    for i in (prefix..prefix + src_mid.len()).rev() {
        ops.push(Op::Remove { path: child(path, i.to_string()) });
    }
    for (j, v) in dst_mid.iter().enumerate() {
        ops.push(Op::Add { path: child(path, (prefix + j).to_string()), value: v.clone() });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
