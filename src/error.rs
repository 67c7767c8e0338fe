//! Store error type

use crate::executor::ExecError;
use std::fmt;

/// Errors returned by [`AttrStore`](crate::store::AttrStore) implementations
#[derive(Debug)]
pub enum StoreError {
    /// Database execution error
    Database(ExecError),
    /// Referenced row does not exist
    NotFound { entity: &'static str, id: i64 },
    /// An attribute with this slug already exists
    DuplicateSlug(String),
    /// Slug is empty or contains characters other than letters, digits, `-` and `_`
    InvalidSlug(String),
    /// The attribute-value table was never installed in this store
    UnknownAttrTable(String),
    /// A stored row could not be read back (e.g. unknown type code)
    Corrupt(String),
    /// Raw value longer than the value column allows
    ValueTooLong { len: usize, max: usize },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {e}"),
            StoreError::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            StoreError::DuplicateSlug(slug) => {
                write!(f, "An attribute with slug '{slug}' already exists")
            }
            StoreError::InvalidSlug(slug) => write!(
                f,
                "Invalid slug '{slug}': use only letters, numbers, underscores or hyphens"
            ),
            StoreError::UnknownAttrTable(table) => write!(
                f,
                "Attribute value table '{table}' is not installed in this store"
            ),
            StoreError::Corrupt(msg) => write!(f, "Corrupt row: {msg}"),
            StoreError::ValueTooLong { len, max } => {
                write!(f, "Value has {len} characters, at most {max} are allowed")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExecError> for StoreError {
    fn from(error: ExecError) -> Self {
        StoreError::Database(error)
    }
}
