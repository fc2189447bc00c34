//! Generic structural diff/patch over plain JSON values.
//!
//! Everything in this crate works on `serde_json::Value` only. Callers that
//! carry richer value types are expected to encode them into JSON first.

pub mod pointer;
pub mod json_patch;
pub mod json_patch_diff;
pub mod json_pretty_diff;

pub use json_patch::{apply_patch, from_patch_text, to_patch_text, Op, PatchError};
pub use json_patch_diff::diff;
pub use json_pretty_diff::pretty_diff;
