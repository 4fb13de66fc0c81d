//! Header binding.
//!
//! Matches the header row against the declared field annotations and
//! produces the [`ColumnMap`] used for every following row.
//!
//! Duplicates resolve last-write-wins:
//!
//! - a header text that appears twice binds to its last column
//! - a column claimed by several fields goes to the last declared one
//!
//! Declared fields missing from the header are not an error, they keep
//! their default value on every row. Columns nobody claims are dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::annotation::Annotation;

/// Header column position → field position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    slots: Vec<Option<usize>>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `column` to `field`, replacing any previous binding.
    pub fn insert(&mut self, column: usize, field: usize) {
        if column >= self.slots.len() {
            self.slots.resize(column + 1, None);
        }
        self.slots[column] = Some(field);
    }

    /// Field position bound to `column`.
    pub fn get(&self, column: usize) -> Option<usize> {
        self.slots.get(column).copied().flatten()
    }

    pub fn contains_column(&self, column: usize) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// `(column, field)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(column, slot)| slot.map(|field| (column, field)))
    }

    /// True when some column is bound to `field`.
    pub fn binds_field(&self, field: usize) -> bool {
        self.slots.contains(&Some(field))
    }
}

impl FromIterator<(usize, usize)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (column, field) in iter {
            map.insert(column, field);
        }
        map
    }
}

/// Compute the column map for `header`. `annotations` are the field
/// annotations in declaration order.
pub fn bind_header<'a, S, I>(header: &[S], annotations: I) -> ColumnMap
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a Annotation>,
{
    let header_to_index: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(column, text)| (text.as_ref(), column))
        .collect();

    let mut map = ColumnMap::new();
    for (field, annotation) in annotations.into_iter().enumerate() {
        let Some(name) = annotation.column() else {
            continue;
        };
        if let Some(&column) = header_to_index.get(name) {
            map.insert(column, field);
        }
    }
    map
}

/// One column bound to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundColumn {
    pub column: usize,
    pub header: String,
    pub field: String,
}

/// Human-readable outcome of binding a header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindingReport {
    /// Bound columns in column order.
    pub bound: Vec<BoundColumn>,
    /// Fields that declare a column the header lacks (or lost to a later field).
    pub unmatched_fields: Vec<String>,
    /// Header columns no field claimed.
    pub unclaimed_columns: Vec<String>,
}

impl BindingReport {
    /// Describe `map` for `header` and the named field annotations it was
    /// computed from.
    pub fn new<S, N>(header: &[S], fields: &[(N, Annotation)], map: &ColumnMap) -> Self
    where
        S: AsRef<str>,
        N: AsRef<str>,
    {
        let bound = map
            .iter()
            .filter_map(|(column, field)| {
                let (name, _) = fields.get(field)?;
                Some(BoundColumn {
                    column,
                    header: header.get(column)?.as_ref().to_string(),
                    field: name.as_ref().to_string(),
                })
            })
            .collect();

        let unmatched_fields = fields
            .iter()
            .enumerate()
            .filter(|(position, (_, annotation))| {
                annotation.column().is_some() && !map.binds_field(*position)
            })
            .map(|(_, (name, _))| name.as_ref().to_string())
            .collect();

        let unclaimed_columns = header
            .iter()
            .enumerate()
            .filter(|(column, _)| !map.contains_column(*column))
            .map(|(_, text)| text.as_ref().to_string())
            .collect();

        Self {
            bound,
            unmatched_fields,
            unclaimed_columns,
        }
    }
}
