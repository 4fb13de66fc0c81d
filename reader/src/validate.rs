//! Record type validation.
//!
//! Checks that a [`TypeDescriptor`] can be populated from rows and turns it
//! into a [`RecordLayout`]: the parsed annotations plus the setter table the
//! row assigner indexes by field position.
//!
//! Checks run in order and stop at the first failure:
//!
//! 1. the type must be a handle ([`ValidationError::NotPointer`])
//! 2. the handle must point to a struct ([`ValidationError::NotStructPointer`])
//! 3. every field bound to a non-empty column name must be text
//!    ([`ValidationError::FieldNotAssignable`])

use crate::annotation::{parse_annotation, Annotation};
use crate::descriptor::{FieldDescriptor, Kind, Pointee, Record, Setter, Shape, TypeDescriptor};
use crate::error::{ValidationError, ValidationResult};

/// A validated field.
pub struct FieldSlot<T> {
    pub name: &'static str,
    pub kind: Kind,
    pub annotation: Annotation,
    pub setter: Option<Setter<T>>,
}

impl<T> std::fmt::Debug for FieldSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSlot")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("annotation", &self.annotation)
            .finish_non_exhaustive()
    }
}

/// Validated description of a record type, fields in declaration order.
pub struct RecordLayout<T> {
    type_name: &'static str,
    fields: Vec<FieldSlot<T>>,
}

impl<T> RecordLayout<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldSlot<T>] {
        &self.fields
    }

    pub fn field(&self, position: usize) -> Option<&FieldSlot<T>> {
        self.fields.get(position)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Annotations in declaration order, as the header binder consumes them.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> + '_ {
        self.fields.iter().map(|field| &field.annotation)
    }
}

impl<T> std::fmt::Debug for RecordLayout<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLayout")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Validate a record type through its [`Record`] impl.
pub fn validate_record<T: Record>() -> ValidationResult<RecordLayout<T>> {
    validate(T::descriptor())
}

/// Validate a type description.
pub fn validate<T>(descriptor: TypeDescriptor<T>) -> ValidationResult<RecordLayout<T>> {
    let TypeDescriptor { type_name, shape } = descriptor;

    let pointee = match shape {
        Shape::Handle(pointee) => pointee,
        Shape::Value(_) => return Err(ValidationError::NotPointer { type_name }),
    };
    let fields = match pointee {
        Pointee::Struct(fields) => fields,
        Pointee::Scalar(_) => return Err(ValidationError::NotStructPointer { type_name }),
    };

    let fields = fields
        .into_iter()
        .map(validate_field)
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(RecordLayout { type_name, fields })
}

fn validate_field<T>(field: FieldDescriptor<T>) -> ValidationResult<FieldSlot<T>> {
    let annotation = parse_annotation(field.tag);
    if !annotation.column_name.is_empty() && (!field.kind.is_text() || field.setter.is_none()) {
        return Err(ValidationError::FieldNotAssignable {
            field: field.name,
            kind: field.kind,
        });
    }
    Ok(FieldSlot {
        name: field.name,
        kind: field.kind,
        annotation,
        setter: field.setter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Example {
        bar: String,
        baz: String,
        foo: String,
    }

    fn example_descriptor() -> TypeDescriptor<Example> {
        TypeDescriptor::handle_to_struct(
            "Example",
            vec![
                FieldDescriptor::text("bar", "bar", |r: &mut Example, v| r.bar = v),
                FieldDescriptor::text("baz", "baz", |r: &mut Example, v| r.baz = v),
                FieldDescriptor::text("foo", "foo", |r: &mut Example, v| r.foo = v),
            ],
        )
    }

    #[test]
    fn test_valid_layout_keeps_declaration_order() {
        let layout = validate(example_descriptor()).unwrap();
        let names: Vec<_> = layout.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["bar", "baz", "foo"]);
        assert_eq!(layout.field(2).unwrap().annotation, Annotation::bound("foo"));
        assert_eq!(layout.type_name(), "Example");
    }

    #[test]
    fn test_value_type_is_not_pointer() {
        let err = validate::<Example>(TypeDescriptor::value("Example", Kind::Other)).unwrap_err();
        assert_eq!(err, ValidationError::NotPointer { type_name: "Example" });
    }

    #[test]
    fn test_handle_to_scalar_is_not_struct_pointer() {
        let err = validate::<Example>(TypeDescriptor::handle_to_scalar("String", Kind::Text))
            .unwrap_err();
        assert_eq!(err, ValidationError::NotStructPointer { type_name: "String" });
    }

    #[test]
    fn test_bound_integer_field_is_not_assignable() {
        let desc = TypeDescriptor::<Example>::handle_to_struct(
            "Counter",
            vec![FieldDescriptor::untyped("field", Kind::Integer, "field")],
        );
        let err = validate(desc).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FieldNotAssignable {
                field: "field",
                kind: Kind::Integer
            }
        );
    }

    #[test]
    fn test_first_bad_field_is_reported() {
        let desc = TypeDescriptor::<Example>::handle_to_struct(
            "Mixed",
            vec![
                FieldDescriptor::text("bar", "bar", |r: &mut Example, v| r.bar = v),
                FieldDescriptor::untyped("when", Kind::Other, "when"),
                FieldDescriptor::untyped("count", Kind::Integer, "count"),
            ],
        );
        match validate(desc) {
            Err(ValidationError::FieldNotAssignable { field, .. }) => assert_eq!(field, "when"),
            other => panic!("unexpected result: {:?}", other.map(|l| l.len())),
        }
    }

    #[test]
    fn test_unbound_fields_may_have_any_kind() {
        let desc = TypeDescriptor::<Example>::handle_to_struct(
            "Loose",
            vec![
                FieldDescriptor::untyped("count", Kind::Integer, ""),
                FieldDescriptor::untyped("skip", Kind::Float, "-"),
                // ",": bound to the empty column name, which validation lets through
                FieldDescriptor::untyped("blank", Kind::Bool, ","),
            ],
        );
        let layout = validate(desc).unwrap();
        assert_eq!(layout.len(), 3);
        assert!(layout.field(0).unwrap().annotation.ignored);
        assert!(!layout.field(2).unwrap().annotation.ignored);
    }

    #[test]
    fn test_text_kind_without_setter_is_not_assignable() {
        let desc = TypeDescriptor::<Example>::handle_to_struct(
            "NoSetter",
            vec![FieldDescriptor::untyped("name", Kind::Text, "name")],
        );
        assert!(matches!(
            validate(desc),
            Err(ValidationError::FieldNotAssignable { field: "name", .. })
        ));
    }
}
