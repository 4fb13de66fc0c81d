//! Field annotation parsing.
//!
//! An annotation is the string attached to a struct field with
//! `#[csv("...")]`. Its first comma-separated part names the header column
//! the field is read from:
//!
//! | Annotation            | Column    | Ignored |
//! |-----------------------|-----------|---------|
//! | `""`                  |           | yes     |
//! | `"name"`              | `name`    | no      |
//! | `"name,omitempty"`    | `name`    | no      |
//! | `"-"`                 |           | yes     |
//! | `"-,"`                | `""`      | no      |
//! | `","`                 | `""`      | no      |
//!
//! The dash only ignores a field when no comma follows it.

use serde::Serialize;

/// Separator between the column name and trailing qualifiers.
pub const SEPARATOR: char = ',';

/// Marks a field as not read from any column.
pub const IGNORE_SENTINEL: &str = "-";

/// Parsed form of a field annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    /// Header text of the column bound to the field.
    pub column_name: String,
    /// The field is not bound to any column.
    pub ignored: bool,
}

impl Annotation {
    /// The annotation of a field that is not bound to any column.
    pub fn empty() -> Self {
        Self {
            column_name: String::new(),
            ignored: true,
        }
    }

    /// Annotation binding a field to `column_name`.
    pub fn bound(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            ignored: false,
        }
    }

    /// Column name the field binds to, if any.
    pub fn column(&self) -> Option<&str> {
        if self.ignored {
            None
        } else {
            Some(&self.column_name)
        }
    }
}

/// Parse an annotation string. Never fails: unknown qualifiers after the
/// column name are accepted and dropped.
pub fn parse_annotation(tag: &str) -> Annotation {
    if tag.is_empty() {
        return Annotation::empty();
    }
    match tag.split_once(SEPARATOR) {
        // "-," binds to the empty column name rather than ignoring the field.
        Some((IGNORE_SENTINEL, _)) => Annotation::bound(""),
        Some((head, _qualifiers)) => Annotation::bound(head),
        None if tag == IGNORE_SENTINEL => Annotation::empty(),
        None => Annotation::bound(tag),
    }
}
