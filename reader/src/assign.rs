//! Row assignment.

use crate::bind::ColumnMap;
use crate::error::AssignError;
use crate::validate::RecordLayout;

/// Move the mapped columns of `row` into `target`.
///
/// Values are stored verbatim. Unmapped columns, including extra trailing
/// ones, are dropped; fields no column maps to keep their current value.
pub fn assign_row<T>(
    row: Vec<String>,
    target: &mut T,
    map: &ColumnMap,
    layout: &RecordLayout<T>,
) -> Result<(), AssignError> {
    for (column, value) in row.into_iter().enumerate() {
        let Some(position) = map.get(column) else {
            continue;
        };
        let field = layout.field(position).ok_or(AssignError::FieldOutOfRange {
            position,
            fields: layout.len(),
        })?;
        let setter = field
            .setter
            .ok_or(AssignError::FieldNotAssignable { field: field.name })?;
        setter(target, value);
    }
    Ok(())
}
