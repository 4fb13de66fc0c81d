//! # csvtag - read CSV rows into annotated structs
//!
//! csvtag binds the header row of a CSV file to struct fields annotated with
//! `#[csv("column")]`, then fills one struct per data row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Annotations │────▶│  Validator  │────▶│   Binder    │────▶│  Assigner   │
//! │ #[csv(..)]  │     │ (once/type) │     │  (header)   │     │ (each row)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvtag::{CsvRecord, Reader, ReadError};
//!
//! #[derive(Debug, Default, CsvRecord)]
//! struct Work {
//!     #[csv("title")]
//!     title: String,
//!     #[csv("iswc,optional")]
//!     iswc: String,
//!     #[csv("-")]
//!     seen: bool,
//! }
//!
//! let mut reader = Reader::<Work, _>::from_reader(std::io::stdin())?;
//! loop {
//!     let mut work = Work::default();
//!     match reader.read(&mut work) {
//!         Ok(()) => println!("{:?}", work),
//!         Err(ReadError::EndOfData) => break,
//!         Err(err) => return Err(err.into()),
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`annotation`] - `#[csv("...")]` string parsing
//! - [`descriptor`] - record type descriptions and the [`Record`] trait
//! - [`validate`] - eligibility checks and the field setter table
//! - [`bind`] - header to field binding
//! - [`assign`] - row to record assignment
//! - [`reader`] - the typed reader
//! - [`source`] - row sources
//! - [`config`] - tokenizer options
//! - [`input`] - file decoding and delimiter detection
//! - [`error`] - error types

// Lets the derive's `::csvtag::` paths resolve inside this crate.
extern crate self as csvtag;

// Core modules
pub mod annotation;
pub mod descriptor;
pub mod error;

// Binding engine
pub mod assign;
pub mod bind;
pub mod validate;

// Reading
pub mod config;
pub mod input;
pub mod reader;
pub mod source;

// =============================================================================
// Re-exports - Derive
// =============================================================================

pub use csvtag_derive::CsvRecord;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    AssignError,
    ConfigError,
    Error,
    ReadError,
    Result,
    SourceError,
    ValidationError,
};

// =============================================================================
// Re-exports - Descriptions
// =============================================================================

pub use annotation::{parse_annotation, Annotation};
pub use descriptor::{FieldDescriptor, Kind, Pointee, Record, Setter, Shape, TypeDescriptor};
pub use validate::{validate, validate_record, FieldSlot, RecordLayout};

// =============================================================================
// Re-exports - Binding
// =============================================================================

pub use assign::assign_row;
pub use bind::{bind_header, BindingReport, BoundColumn, ColumnMap};

// =============================================================================
// Re-exports - Reading
// =============================================================================

pub use config::SourceOptions;
pub use input::{open_path_auto, InputInfo};
pub use reader::{Reader, Records};
pub use source::{from_rows, CsvSource, IterSource, RowSource};
