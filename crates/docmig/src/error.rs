use docmig_json_patch::PatchError;
use thiserror::Error;

/// Error type returned by [`crate::DocumentStore`] implementations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a change could not be resolved.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChangeError {
    #[error("change has not yet been resolved")]
    Unresolved,
    #[error("document path must not be empty")]
    EmptyDocPath,
    #[error("need a before value to infer {0}")]
    MissingBefore(&'static str),
    #[error("need an after value to infer {0}")]
    MissingAfter(&'static str),
    #[error("need before and patch/instruction to infer after")]
    MissingPatchOrInstruction,
    #[error("could not apply patch: {0}")]
    DiffApply(#[from] PatchError),
    #[error("could not serialize {0}")]
    Serialization(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("refusing to execute unresolved change on {path}: {source}")]
    Unresolved {
        path: String,
        #[source]
        source: ChangeError,
    },
    #[error("{0}")]
    Store(#[source] StoreError),
}
