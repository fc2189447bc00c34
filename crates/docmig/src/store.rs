//! The database operations a resolved change is pushed through.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::value::{Fields, RichValue};

/// The three writes a [`crate::Change`] can perform. Implementations do their
/// own encoding of [`RichValue`]s for the wire; errors are handed back to the
/// caller of `execute` unchanged.
pub trait DocumentStore {
    /// Merge `fields` into the existing document at `path`.
    fn update_doc(&self, path: &str, fields: &Fields) -> Result<(), StoreError>;
    /// Replace the document at `path` with exactly `fields`.
    fn set_doc(&self, path: &str, fields: &Fields) -> Result<(), StoreError>;
    /// Remove the document at `path`.
    fn delete_doc(&self, path: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("no document at {0}")]
    NotFound(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// In-process document store keyed by document path.
///
/// `update_doc` honours [`RichValue::Delete`] markers by dropping the field;
/// `set_doc` drops them as well, matching how document databases treat a
/// delete marker outside an update.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Fields>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doc(self, path: impl Into<String>, fields: Fields) -> Self {
        if let Ok(mut docs) = self.docs.lock() {
            docs.insert(path.into(), fields);
        }
        self
    }

    pub fn get(&self, path: &str) -> Option<Fields> {
        self.docs.lock().ok()?.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_docs<T>(&self, f: impl FnOnce(&mut BTreeMap<String, Fields>) -> Result<T, MemoryStoreError>) -> Result<T, StoreError> {
        let mut docs = self.docs.lock().map_err(|_| MemoryStoreError::Poisoned)?;
        Ok(f(&mut docs)?)
    }
}

fn without_deletes(fields: &Fields) -> Fields {
    fields
        .iter()
        .filter(|(_, v)| !v.is_delete())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl DocumentStore for MemoryStore {
    fn update_doc(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
        self.with_docs(|docs| {
            let doc = docs
                .get_mut(path)
                .ok_or_else(|| MemoryStoreError::NotFound(path.to_string()))?;
            for (key, value) in fields {
                if value.is_delete() {
                    doc.shift_remove(key);
                } else {
                    doc.insert(key.clone(), value.clone());
                }
            }
            Ok(())
        })
    }

    fn set_doc(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
        self.with_docs(|docs| {
            docs.insert(path.to_string(), without_deletes(fields));
            Ok(())
        })
    }

    fn delete_doc(&self, path: &str) -> Result<(), StoreError> {
        self.with_docs(|docs| {
            docs.remove(path);
            Ok(())
        })
    }
}
