//! Record type descriptions.
//!
//! A [`TypeDescriptor`] tells the reader what a record type looks like:
//! whether rows can be written into it at all, which fields it has, what
//! kind of value each field holds, the raw annotation of each field, and how
//! to store text into the fields that hold text.
//!
//! Descriptors are normally produced by `#[derive(CsvRecord)]`. They can be
//! written by hand for types the derive does not cover.
//!
//! ```rust,ignore
//! use csvtag::{FieldDescriptor, Kind, Record, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct Row {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Record for Row {
//!     fn descriptor() -> TypeDescriptor<Self> {
//!         TypeDescriptor::handle_to_struct(
//!             "Row",
//!             vec![
//!                 FieldDescriptor::text("name", "name", |row, value| row.name = value),
//!                 FieldDescriptor::untyped("age", Kind::Integer, ""),
//!             ],
//!         )
//!     }
//! }
//! ```

use std::fmt;

/// Stores a column value into one field of a record.
pub type Setter<T> = fn(&mut T, String);

/// Kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Bool,
    Char,
    Integer,
    Float,
    Other,
}

impl Kind {
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// One declared field of a record type.
pub struct FieldDescriptor<T> {
    /// Field name as declared.
    pub name: &'static str,
    /// Kind of value the field holds.
    pub kind: Kind,
    /// Raw annotation string, empty when the field has none.
    pub tag: &'static str,
    /// Present for text fields.
    pub setter: Option<Setter<T>>,
}

impl<T> FieldDescriptor<T> {
    /// A text field that can receive column values.
    pub fn text(name: &'static str, tag: &'static str, setter: Setter<T>) -> Self {
        Self {
            name,
            kind: Kind::Text,
            tag,
            setter: Some(setter),
        }
    }

    /// A field rows are never written into.
    pub fn untyped(name: &'static str, kind: Kind, tag: &'static str) -> Self {
        Self {
            name,
            kind,
            tag,
            setter: None,
        }
    }
}

// fn pointers are Copy for every T, so these impls do not bound T.
impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            tag: self.tag,
            setter: self.setter,
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("tag", &self.tag)
            .field("settable", &self.setter.is_some())
            .finish()
    }
}

/// What a handle points to.
#[derive(Debug, Clone)]
pub enum Pointee<T> {
    /// A single value.
    Scalar(Kind),
    /// A struct with named fields, in declaration order.
    Struct(Vec<FieldDescriptor<T>>),
}

/// How a record type is shaped.
#[derive(Debug, Clone)]
pub enum Shape<T> {
    /// Held by value, rows cannot be written through it.
    Value(Kind),
    /// Written through a mutable handle.
    Handle(Pointee<T>),
}

/// Description of a record type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor<T> {
    pub type_name: &'static str,
    pub shape: Shape<T>,
}

impl<T> TypeDescriptor<T> {
    /// The usual shape: a mutable handle to a struct.
    pub fn handle_to_struct(type_name: &'static str, fields: Vec<FieldDescriptor<T>>) -> Self {
        Self {
            type_name,
            shape: Shape::Handle(Pointee::Struct(fields)),
        }
    }

    pub fn handle_to_scalar(type_name: &'static str, kind: Kind) -> Self {
        Self {
            type_name,
            shape: Shape::Handle(Pointee::Scalar(kind)),
        }
    }

    pub fn value(type_name: &'static str, kind: Kind) -> Self {
        Self {
            type_name,
            shape: Shape::Value(kind),
        }
    }

    /// Declared fields, if the type is a handle to a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor<T>]> {
        match &self.shape {
            Shape::Handle(Pointee::Struct(fields)) => Some(fields),
            _ => None,
        }
    }
}

/// A type rows can be read into.
///
/// Implemented by `#[derive(CsvRecord)]`.
pub trait Record: Sized {
    /// Describe the type. Called once per reader.
    fn descriptor() -> TypeDescriptor<Self>;
}
