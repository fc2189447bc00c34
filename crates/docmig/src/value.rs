//! Document values as the migration tool sees them.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Number;

/// Field name → value mapping of one document. Equality ignores insertion
/// order.
pub type Fields = IndexMap<String, RichValue>;

/// A JSON-like value extended with the database types plain JSON cannot
/// express.
#[derive(Debug, Clone, PartialEq)]
pub enum RichValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<RichValue>),
    Map(Fields),
    /// An instant in time.
    Timestamp(DateTime<Utc>),
    /// A reference to another document, by path.
    Reference(String),
    /// Instructs the database to remove the field it is assigned to.
    Delete,
}

impl RichValue {
    pub fn reference(path: impl Into<String>) -> Self {
        RichValue::Reference(path.into())
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            RichValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, RichValue::Delete)
    }
}

impl From<bool> for RichValue {
    fn from(b: bool) -> Self {
        RichValue::Bool(b)
    }
}

impl From<i64> for RichValue {
    fn from(n: i64) -> Self {
        RichValue::Number(n.into())
    }
}

impl From<i32> for RichValue {
    fn from(n: i32) -> Self {
        RichValue::Number(n.into())
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for RichValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(RichValue::Null, RichValue::Number)
    }
}

impl From<&str> for RichValue {
    fn from(s: &str) -> Self {
        RichValue::String(s.to_string())
    }
}

impl From<String> for RichValue {
    fn from(s: String) -> Self {
        RichValue::String(s)
    }
}

impl From<DateTime<Utc>> for RichValue {
    fn from(t: DateTime<Utc>) -> Self {
        RichValue::Timestamp(t)
    }
}

impl From<Fields> for RichValue {
    fn from(m: Fields) -> Self {
        RichValue::Map(m)
    }
}

impl From<Vec<RichValue>> for RichValue {
    fn from(v: Vec<RichValue>) -> Self {
        RichValue::Array(v)
    }
}
