//! Logic behind the `docmig-resolve` binary: decode one change description,
//! resolve it and render the result. Nothing is written to a database.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::change::{Change, PresentOptions};
use crate::command::Command;
use crate::error::ChangeError;
use crate::serial;
use crate::store::MemoryStore;
use crate::value::Fields;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("'{0}' must be a JSON object")]
    NotADocument(&'static str),
    #[error(transparent)]
    Change(#[from] ChangeError),
}

/// One change, with document values in their JSON/sentinel encoding.
#[derive(Debug, Deserialize)]
pub struct ChangeInput {
    pub path: String,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub patch: Option<Value>,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub instruction: String,
}

#[derive(Debug)]
pub struct Report {
    pub text: String,
    pub resolved: bool,
}

fn decode_fields(value: Option<Value>, name: &'static str) -> Result<Option<Fields>, CliError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serial::deserialize_fields(v).map(Some).ok_or(CliError::NotADocument(name)),
    }
}

pub fn build_change(input: ChangeInput) -> Result<Change, CliError> {
    let command: Command = input.command.parse()?;
    let before = decode_fields(input.before, "before")?;
    let patch = decode_fields(input.patch, "patch")?;
    Ok(Change::new(
        input.path,
        before,
        patch,
        command,
        input.instruction,
        Arc::new(MemoryStore::new()),
    )?)
}

/// Resolves the change described by `json` and renders it for a terminal.
pub fn resolve_json(json: &str, options: &PresentOptions) -> Result<Report, CliError> {
    let input: ChangeInput = serde_json::from_str(json)?;
    let mut change = build_change(input)?;
    let resolved = change.resolve().is_ok();

    let (header, body) = change.present_with(options);
    let mut text = header.concat();
    text.push_str(&body);
    if resolved {
        text.push_str("\nrollback: ");
        text.push_str(change.rollback());
        text.push('\n');
    }
    Ok(Report { text, resolved })
}
