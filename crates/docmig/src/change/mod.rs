//! One unit of migration work on one document.
//!
//! A [`Change`] is built from whatever is known about the document (a before
//! snapshot, a patch, a stored patch text, a command) and [`Change::resolve`]
//! fills in the rest:
//!
//! 1. `after`, by applying the patch (or instruction) to `before`, or
//!    directly for `Set`/`Add`/`Delete`;
//! 2. `command`, when it was `Unknown`;
//! 3. the pretty diff `before → after`;
//! 4. the rollback patch `after → before`;
//! 5. `patch`, when it was empty and the command writes one.
//!
//! All diffing happens on the JSON encoding produced by [`crate::serial`].

mod execute;
mod present;

pub use present::PresentOptions;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use docmig_json_patch::json_patch::{from_json_patch, Op, PatchError};
use docmig_json_patch::pointer::Path;
use docmig_json_patch::{apply_patch, diff, pretty_diff, to_patch_text};
use serde_json::{Map, Value};

use crate::command::Command;
use crate::error::ChangeError;
use crate::serial;
use crate::store::DocumentStore;
use crate::value::Fields;

const BEFORE_KEY: &str = "before";
const PATCH_KEY: &str = "patch";
const AFTER_KEY: &str = "after";

pub struct Change {
    doc_path: String,
    before: Option<Fields>,
    patch: Option<Fields>,
    after: Option<Fields>,
    instruction: String,
    command: Command,
    pretty_diff: String,
    rollback: String,
    error: Option<ChangeError>,
    store: Arc<dyn DocumentStore>,
    cache: HashMap<&'static str, Arc<Value>>,
}

impl fmt::Debug for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Change")
            .field("doc_path", &self.doc_path)
            .field("command", &self.command)
            .field("before", &self.before)
            .field("patch", &self.patch)
            .field("after", &self.after)
            .field("instruction", &self.instruction)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Change {
    /// Creates an unresolved change. `doc_path` must not be empty.
    pub fn new(
        doc_path: impl Into<String>,
        before: Option<Fields>,
        patch: Option<Fields>,
        command: Command,
        instruction: impl Into<String>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, ChangeError> {
        let doc_path = doc_path.into();
        if doc_path.is_empty() {
            return Err(ChangeError::EmptyDocPath);
        }
        Ok(Self {
            doc_path,
            before,
            patch,
            after: None,
            instruction: instruction.into(),
            command,
            pretty_diff: String::new(),
            rollback: String::new(),
            error: Some(ChangeError::Unresolved),
            store,
            cache: HashMap::new(),
        })
    }

    pub fn doc_path(&self) -> &str {
        &self.doc_path
    }

    pub fn before(&self) -> Option<&Fields> {
        self.before.as_ref()
    }

    pub fn patch(&self) -> Option<&Fields> {
        self.patch.as_ref()
    }

    pub fn after(&self) -> Option<&Fields> {
        self.after.as_ref()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn pretty_diff(&self) -> &str {
        &self.pretty_diff
    }

    /// RFC 6902 patch text that turns `after` back into `before`.
    pub fn rollback(&self) -> &str {
        &self.rollback
    }

    /// `None` once the last resolution succeeded.
    pub fn error(&self) -> Option<&ChangeError> {
        self.error.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.error.is_none()
    }

    /// Supplies (or replaces) the before snapshot. The change must be
    /// resolved again afterwards.
    pub fn set_before(&mut self, before: Option<Fields>) {
        self.before = before;
        self.cache.clear();
        self.error = Some(ChangeError::Unresolved);
    }

    /// Runs the inference pipeline. Stops at the first failing step and
    /// records its error; fields derived by earlier steps keep their values.
    pub fn resolve(&mut self) -> Result<(), ChangeError> {
        self.cache.clear();
        self.error = None;
        let outcome = self.run_pipeline();
        if let Err(err) = &outcome {
            tracing::warn!(path = %self.doc_path, "change resolution failed: {err}");
            self.error = Some(err.clone());
        }
        outcome
    }

    /// The change that undoes this one: its before is this change's after
    /// and its instruction is the rollback patch. `None` while unresolved.
    pub fn rollback_change(&self) -> Option<Change> {
        if self.error.is_some() {
            return None;
        }
        Some(Change {
            doc_path: self.doc_path.clone(),
            before: self.after.clone(),
            patch: None,
            after: None,
            instruction: self.rollback.clone(),
            command: Command::Unknown,
            pretty_diff: String::new(),
            rollback: String::new(),
            error: Some(ChangeError::Unresolved),
            store: Arc::clone(&self.store),
            cache: HashMap::new(),
        })
    }

    fn run_pipeline(&mut self) -> Result<(), ChangeError> {
        self.infer_after()?;
        self.infer_command()?;
        self.infer_pretty_diff()?;
        self.infer_rollback()?;
        self.infer_patch();
        Ok(())
    }

    fn infer_after(&mut self) -> Result<(), ChangeError> {
        match self.command {
            Command::Set | Command::Add => {
                self.after = self.patch.clone();
                tracing::debug!(path = %self.doc_path, command = %self.command, "after taken from patch");
                return Ok(());
            }
            Command::Delete => {
                self.after = Some(Fields::new());
                tracing::debug!(path = %self.doc_path, "after is empty for delete");
                return Ok(());
            }
            Command::Update | Command::Unknown => {}
        }

        let before = self.before.as_ref().ok_or(ChangeError::MissingBefore("after"))?;
        let patch = self.patch.as_ref().filter(|p| !p.is_empty());
        if patch.is_none() && self.instruction.is_empty() {
            return Err(ChangeError::MissingPatchOrInstruction);
        }

        let s_before = cached(&mut self.cache, BEFORE_KEY, before)?;
        let ops = match patch {
            Some(patch) => {
                let s_patch = cached(&mut self.cache, PATCH_KEY, patch)?;
                match &*s_patch {
                    Value::Object(fields) => lower_fields(fields, &s_before),
                    _ => Vec::new(),
                }
            }
            None => parse_instruction(&self.instruction, &s_before)?,
        };

        let doc = apply_patch(Value::clone(&s_before), &ops)?;
        let after = serial::deserialize_fields(doc).ok_or_else(|| {
            ChangeError::DiffApply(PatchError::InvalidTarget("patched document is not an object".into()))
        })?;
        tracing::debug!(path = %self.doc_path, ops = ops.len(), "after derived from patch");
        self.after = Some(after);
        Ok(())
    }

    fn infer_command(&mut self) -> Result<(), ChangeError> {
        if self.command != Command::Unknown {
            return Ok(());
        }
        let after = self.after.as_ref().ok_or(ChangeError::MissingAfter("command"))?;
        // A transition that leaves no fields is treated as a deletion.
        self.command = if after.is_empty() { Command::Delete } else { Command::Set };
        tracing::debug!(path = %self.doc_path, command = %self.command, "command inferred");
        Ok(())
    }

    fn infer_pretty_diff(&mut self) -> Result<(), ChangeError> {
        let (s_before, s_after) = self.serialized_pair("pretty diff")?;
        self.pretty_diff = pretty_diff(&s_before, &s_after);
        Ok(())
    }

    fn infer_rollback(&mut self) -> Result<(), ChangeError> {
        let (s_before, s_after) = self.serialized_pair("rollback")?;
        let ops = diff(&s_after, &s_before);
        self.rollback = to_patch_text(&ops);
        tracing::debug!(path = %self.doc_path, ops = ops.len(), "rollback derived");
        Ok(())
    }

    fn infer_patch(&mut self) {
        let empty = self.patch.as_ref().map_or(true, Fields::is_empty);
        if empty && self.command.writes_payload() {
            self.patch = self.after.clone();
        }
    }

    fn serialized_pair(&mut self, step: &'static str) -> Result<(Arc<Value>, Arc<Value>), ChangeError> {
        let before = self.before.as_ref().ok_or(ChangeError::MissingBefore(step))?;
        let after = self.after.as_ref().ok_or(ChangeError::MissingAfter(step))?;
        Ok((
            cached(&mut self.cache, BEFORE_KEY, before)?,
            cached(&mut self.cache, AFTER_KEY, after)?,
        ))
    }
}

/// Serializes `fields` once per resolution and memoizes the result under
/// `key`.
fn cached(
    cache: &mut HashMap<&'static str, Arc<Value>>,
    key: &'static str,
    fields: &Fields,
) -> Result<Arc<Value>, ChangeError> {
    if let Some(hit) = cache.get(key) {
        return Ok(Arc::clone(hit));
    }
    if let Some(t) = serial::unrepresentable_timestamp(fields) {
        return Err(ChangeError::Serialization(format!("{key}: timestamp {t} has no RFC 3339 form")));
    }
    let value = Arc::new(serial::serialize_fields(fields));
    cache.insert(key, Arc::clone(&value));
    Ok(value)
}

/// Turns a field mapping into patch ops: delete markers remove the field if
/// it exists, every other field is upserted.
fn lower_fields(fields: &Map<String, Value>, before: &Value) -> Vec<Op> {
    let mut ops = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        let path: Path = vec![key.clone()];
        if serial::is_delete_sentinel(value) {
            if before.get(key).is_some() {
                ops.push(Op::Remove { path });
            }
        } else {
            ops.push(Op::Add { path, value: value.clone() });
        }
    }
    ops
}

/// Instruction text is either an RFC 6902 op array or a field mapping.
fn parse_instruction(text: &str, before: &Value) -> Result<Vec<Op>, ChangeError> {
    let parsed: Value = serde_json::from_str(text).map_err(|e| PatchError::InvalidJson(e.to_string()))?;
    match parsed {
        Value::Array(_) => Ok(from_json_patch(&parsed)?),
        Value::Object(fields) => Ok(lower_fields(&fields, before)),
        _ => Err(PatchError::InvalidOp("instruction must be a patch array or a field object".into()).into()),
    }
}
