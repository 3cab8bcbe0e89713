//! # Error Types
//!
//! Every fallible collection operation reports one of four kinds of failure:
//!
//! - **Input validation**: data does not have the shape a collection demands
//!   (a string handed to a numeric series, ragged rows handed to a table).
//! - **Not found**: a lookup documented to fail did not find its key, offset,
//!   value, column or row.
//! - **Invalid operation**: the operation has no meaning for this collection.
//! - **Method not found**: a tabular delegation could not be satisfied.
//!
//! Lookups also come in non-failing flavors (`get`, `has_offset`,
//! `find_index`, `column`) so callers choose per call.

use thiserror::Error;

use crate::key::Key;

/// Errors raised by collection construction and lookups.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollectionError {
    /// Data failed a collection's shape constraint.
    #[error("{target} rejected input: {reason}")]
    InputValidation { target: &'static str, reason: String },

    /// Key lookup failed.
    #[error("No value found at key: {key}")]
    KeyNotFound { key: Key },

    /// Positional lookup failed.
    #[error("Offset does not exist: {offset} (collection has {len} elements)")]
    OffsetOutOfBounds { offset: isize, len: usize },

    /// Value search failed.
    #[error("Value \"{value}\" not found in collection")]
    ValueNotFound { value: String },

    /// No row carries the requested column.
    #[error("Column not found: {column}")]
    ColumnNotFound { column: Key },

    /// No row at the requested offset.
    #[error("Row not found at offset: {offset}")]
    RowNotFound { offset: isize },

    /// The operation is meaningless for this collection.
    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },

    /// Delegated method could not be resolved.
    #[error("Method does not exist: {target}::{method}()")]
    MethodNotFound { target: &'static str, method: String },
}

impl CollectionError {
    /// Shorthand for an input validation failure.
    pub fn invalid_input(target: &'static str, reason: impl Into<String>) -> Self {
        CollectionError::InputValidation {
            target,
            reason: reason.into(),
        }
    }

    /// True for every lookup failure (key, offset, value, column, row).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CollectionError::KeyNotFound { .. }
                | CollectionError::OffsetOutOfBounds { .. }
                | CollectionError::ValueNotFound { .. }
                | CollectionError::ColumnNotFound { .. }
                | CollectionError::RowNotFound { .. }
        )
    }

    pub fn is_input_validation(&self) -> bool {
        matches!(self, CollectionError::InputValidation { .. })
    }
}
