//! Error types for the csvtag reader.
//!
//! Errors are grouped by the stage that produces them:
//!
//! - [`ValidationError`] - record type is not eligible (raised at construction)
//! - [`AssignError`] - a mapped column could not be written into its field
//! - [`ReadError`] - per-row failures, including the end-of-data signal
//! - [`ConfigError`] - invalid source options
//! - [`Error`] - top-level wrapper used by the file helpers and the CLI
//!
//! Conversion is automatic via `From` implementations, so `?` works across
//! these boundaries.

use std::error::Error as StdError;

use thiserror::Error;

use crate::descriptor::Kind;

/// Boxed error reported by a row source.
pub type SourceError = Box<dyn StdError + Send + Sync + 'static>;

// =============================================================================
// Validation Errors
// =============================================================================

/// Reasons a record type cannot be populated from rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The type is described by value, rows can only be written through a handle.
    #[error("record type {type_name} should be a pointer-like handle")]
    NotPointer { type_name: &'static str },

    /// The handle does not point to a struct with named fields.
    #[error("record type {type_name} should be a handle to a struct")]
    NotStructPointer { type_name: &'static str },

    /// A field bound to a column is not text.
    #[error("invalid field {field}: field of kind {kind} is not assignable")]
    FieldNotAssignable { field: &'static str, kind: Kind },
}

// =============================================================================
// Assignment Errors
// =============================================================================

/// Errors while writing a row into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// The mapped field has no text setter.
    #[error("field {field} is not assignable")]
    FieldNotAssignable { field: &'static str },

    /// The column map refers to a field the layout does not have.
    #[error("column map refers to field {position} but the record has {fields} fields")]
    FieldOutOfRange { position: usize, fields: usize },
}

// =============================================================================
// Read Errors
// =============================================================================

/// Errors returned by [`crate::Reader::read`].
#[derive(Debug, Error)]
pub enum ReadError {
    /// The row source has no more rows.
    #[error("end of data")]
    EndOfData,

    /// The row source failed; the original error is kept as is.
    #[error(transparent)]
    Source(SourceError),

    /// The row could not be assigned.
    #[error("assign error: {0}")]
    Assign(#[from] AssignError),
}

impl ReadError {
    /// Wrap a row source error.
    pub fn from_source<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Source(Box::new(err))
    }

    /// True for the end-of-data signal.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::EndOfData)
    }

    /// Borrow the row source error as its concrete type.
    pub fn downcast_source<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            Self::Source(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid source options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A single-byte setting got something else.
    #[error("{key} must be a single ASCII character, got '{value}'")]
    NotSingleByte { key: String, value: String },

    /// A boolean setting got something else.
    #[error("{key} must be true or false, got '{value}'")]
    NotBool { key: String, value: String },
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Errors from the file helpers and the command line tool.
#[derive(Debug, Error)]
pub enum Error {
    /// Record type validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reading a row failed.
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to read a file.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV tokenizer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for reads.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for the top-level helpers.
pub type Result<T, E = Error> = std::result::Result<T, E>;
