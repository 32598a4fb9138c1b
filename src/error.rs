//! Error types for the record store.
//!
//! Every store operation either succeeds or fails with exactly one of three kinds:
//! a missing record, a rejected payload, or a storage failure.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// A single rejected field in a submitted record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub expected: String,
    pub got: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested id absent from its table, or a referenced id absent from another table.
    #[error("{0}")]
    NotFound(String),

    /// Malformed or missing field in a submitted record. Raised before any mutation.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Backing file unreadable, unwritable or unparseable.
    #[error("Storage error: {0}")]
    StorageIo(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        StoreError::StorageIo(message.into())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::StorageIo(e.to_string())
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::StorageIo(format!("malformed table file: {}", e))
    }
}

impl From<zip::result::ZipError> for StoreError {
    fn from(e: zip::result::ZipError) -> Self {
        StoreError::StorageIo(format!("archive export failed: {}", e))
    }
}

impl From<quick_xml::Error> for StoreError {
    fn from(e: quick_xml::Error) -> Self {
        StoreError::StorageIo(format!("document export failed: {}", e))
    }
}
