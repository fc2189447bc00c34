//! JSON Patch implementation (RFC 6902).
//!
//! Supported operations: `add`, `remove`, `replace`, `copy`, `move`, `test`.
//! Extension ops are rejected by the codec so that stored patches stay
//! readable by any RFC 6902 tool.

pub mod types;
pub mod apply;
pub mod codec;

pub use types::{Op, PatchError, PatchResult};
pub use apply::{apply_op, apply_ops, apply_patch};
pub use codec::{from_json, from_json_patch, from_patch_text, to_json, to_json_patch, to_patch_text};
