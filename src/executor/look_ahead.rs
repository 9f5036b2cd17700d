use crate::{
    ast::{SelectedField, Selection},
    schema::{
        meta::{Field, MetaType, ObjectMeta},
        model::SchemaType,
    },
};

/// Field of a sub-selection, paired with the concrete object type it is
/// selected on.
#[derive(Clone, Copy, Debug)]
pub struct ChildField<'a> {
    /// Concrete object type the field is selected on.
    pub object_type: &'a ObjectMeta,
    /// The field as requested.
    pub selection: &'a SelectedField,
}

impl<'a> ChildField<'a> {
    /// Returns the schema definition of the selected field, if the object
    /// type has one.
    pub fn definition(&self) -> Option<&'a Field> {
        self.object_type.field_by_name(&self.selection.name)
    }
}

/// Enumerates the fields of `selections` once per concrete object type of
/// `parent`.
pub(super) fn walk<'a>(
    schema: &'a SchemaType,
    parent: &'a MetaType,
    selections: &'a [Selection],
    f: &mut dyn FnMut(ChildField<'a>),
) {
    let objects = match parent {
        MetaType::Object(o) => vec![o],
        _ => schema.possible_types(parent),
    };
    for object_type in objects {
        collect_fields(schema, object_type, selections, &mut |selection| {
            f(ChildField {
                object_type,
                selection,
            })
        });
    }
}

/// Flattens `selections` into the fields applying to `object`, descending
/// into inline fragments whose type condition matches.
pub(crate) fn collect_fields<'a>(
    schema: &SchemaType,
    object: &ObjectMeta,
    selections: &'a [Selection],
    f: &mut dyn FnMut(&'a SelectedField),
) {
    for selection in selections {
        match selection {
            Selection::Field(field) => f(field),
            Selection::InlineFragment(fragment) => {
                if fragment
                    .type_condition
                    .as_deref()
                    .is_none_or(|cond| schema.fragment_applies(cond, object))
                {
                    collect_fields(schema, object, &fragment.selection_set, f);
                }
            }
        }
    }
}
