//! docmig: change resolution for schema-less document database migrations.
//!
//! A [`Change`] describes an intended write to one document. Given any
//! workable subset of {before, patch, instruction, command}, resolution
//! derives the after state, the command, a reviewable diff and an RFC 6902
//! rollback patch before anything touches the database:
//!
//! ```
//! use std::sync::Arc;
//! use docmig::{Change, Command, Fields, MemoryStore, RichValue};
//!
//! let before = Fields::from([("foo".to_string(), RichValue::from("bar"))]);
//! let patch = Fields::from([("foo".to_string(), RichValue::from("baz"))]);
//! let mut change = Change::new("things/1", Some(before), Some(patch), Command::Unknown, "",
//!     Arc::new(MemoryStore::new())).unwrap();
//! change.resolve().unwrap();
//! assert_eq!(change.command(), Command::Set);
//! assert_eq!(change.rollback(), r#"[{"op":"replace","path":"/foo","value":"bar"}]"#);
//! ```
//!
//! Database types (timestamps, references, delete markers) are carried through
//! the JSON-only diff machinery by [`serial`].

pub mod change;
pub mod cli;
pub mod command;
pub mod error;
pub mod serial;
pub mod store;
pub mod value;

pub use change::{Change, PresentOptions};
pub use command::Command;
pub use error::{ChangeError, ExecuteError, StoreError};
pub use store::{DocumentStore, MemoryStore};
pub use value::{Fields, RichValue};
