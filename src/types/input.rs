use arcstr::ArcStr;

use crate::{
    executor::{Context, FieldResult},
    schema::{
        meta::{Argument, InputObjectMeta, ListFactoryFn, MetaType},
        model::{SchemaType, TypeId, TypeRef},
    },
    types::base::TypeKind,
    value::{HostValue, LiteralObject, LiteralValue},
};

/// Decoder precompiled for the declared type of an argument or input field.
///
/// Leaves hold [`TypeId`]s rather than the types themselves, so recursive
/// input objects need no cycles.
#[derive(Clone, Debug)]
pub(crate) enum InputDecoder {
    NonNull(Box<Self>),
    List(Box<Self>),
    Scalar(TypeId),
    Enum(TypeId),
    InputObject(TypeId),
}

impl InputDecoder {
    /// Compiles a decoder for `t`, given a lookup of the kind of named types.
    ///
    /// Fails with the offending kind if the innermost type is not an input
    /// type.
    pub(crate) fn compile(
        t: &TypeRef,
        kind_of: impl Fn(TypeId) -> TypeKind + Copy,
    ) -> Result<Self, TypeKind> {
        Ok(match t {
            TypeRef::NonNull(inner) => Self::NonNull(Box::new(Self::compile(inner, kind_of)?)),
            TypeRef::List(inner) => Self::List(Box::new(Self::compile(inner, kind_of)?)),
            TypeRef::Named(id) => match kind_of(*id) {
                TypeKind::Scalar => Self::Scalar(*id),
                TypeKind::Enum => Self::Enum(*id),
                TypeKind::InputObject => Self::InputObject(*id),
                kind => return Err(kind),
            },
        })
    }

    pub(crate) fn decode(
        &self,
        schema: &SchemaType,
        ctx: &Context,
        value: &LiteralValue,
    ) -> FieldResult<HostValue> {
        match self {
            Self::NonNull(inner) => {
                if value.is_null() {
                    Err("value is required".into())
                } else {
                    inner.decode(schema, ctx, value)
                }
            }
            Self::List(inner) => match value {
                LiteralValue::Null => Ok(HostValue::null()),
                LiteralValue::List(items) => {
                    let mut element = |i: usize| match items.get(i) {
                        Some(item) => inner.decode(schema, ctx, item),
                        None => Err(format!("List index {i} out of bounds").into()),
                    };
                    match inner.list_factory(schema) {
                        Some(factory) => factory(items.len(), &mut element),
                        None => default_list_factory(items.len(), &mut element),
                    }
                }
                v => Err(format!("Expected a list, found {v}").into()),
            },
            Self::Scalar(id) => schema.scalar_meta(*id)?.decode(ctx, value),
            Self::Enum(id) => match schema.meta(*id) {
                MetaType::Enum(e) => e.decode(ctx, value),
                t => Err(format!("Type \"{}\" is not an enum", t.name()).into()),
            },
            Self::InputObject(id) => {
                let meta = schema.input_object_meta(*id)?;
                let fields = match value {
                    LiteralValue::Null => None,
                    LiteralValue::Object(o) => {
                        if let Some(unknown) =
                            o.keys().find(|k| !meta.input_fields.contains_key(k.as_str()))
                        {
                            return Err(format!(
                                "Field \"{unknown}\" is not defined by input object \"{}\"",
                                meta.name,
                            )
                            .into());
                        }
                        Some(o)
                    }
                    v => {
                        return Err(format!(
                            "Expected an object for input object \"{}\", found {v}",
                            meta.name,
                        )
                        .into());
                    }
                };
                meta.decode(&InputObjectContext {
                    schema,
                    meta,
                    context: ctx,
                    fields,
                })
            }
        }
    }

    fn list_factory<'s>(&self, schema: &'s SchemaType) -> Option<&'s ListFactoryFn> {
        match self {
            Self::NonNull(inner) => inner.list_factory(schema),
            Self::Scalar(id) => schema.scalar_meta(*id).ok()?.list_factory.as_ref(),
            Self::InputObject(id) => schema.input_object_meta(*id).ok()?.list_factory.as_ref(),
            Self::List(_) | Self::Enum(_) => None,
        }
    }
}

/// Builds a [`HostValue::list`] out of the decoded elements.
pub(crate) fn default_list_factory(
    size: usize,
    element: &mut dyn FnMut(usize) -> FieldResult<HostValue>,
) -> FieldResult<HostValue> {
    (0..size)
        .map(element)
        .collect::<FieldResult<Vec<_>>>()
        .map(HostValue::list)
}

/// What an input object decode function gets to look at.
#[derive(Clone, Copy, Debug)]
pub struct InputObjectContext<'a> {
    schema: &'a SchemaType,
    meta: &'a InputObjectMeta,
    context: &'a Context,
    fields: Option<&'a LiteralObject>,
}

impl<'a> InputObjectContext<'a> {
    /// Indicates whether the literal being decoded is null.
    pub fn is_nil(&self) -> bool {
        self.fields.is_none()
    }

    /// Returns the per-request context.
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Returns the input object being decoded.
    pub fn meta(&self) -> &'a InputObjectMeta {
        self.meta
    }

    /// Returns the names of every declared field, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'a ArcStr> + use<'a> {
        self.meta.input_fields.keys()
    }

    fn field(&self, name: &str) -> FieldResult<&'a Argument> {
        self.meta.input_field_by_name(name).ok_or_else(|| {
            format!(
                "Field \"{name}\" is not defined by input object \"{}\"",
                self.meta.name,
            )
            .into()
        })
    }

    fn raw_value(&self, field: &Argument) -> FieldResult<LiteralValue> {
        Ok(match self.fields.and_then(|f| f.get(field.name.as_str())) {
            Some(v) => v.clone(),
            None => match &field.default_value {
                Some(default) => LiteralValue::from_ast(default)?,
                None => LiteralValue::Null,
            },
        })
    }

    /// Returns the decoded value of the named field.
    ///
    /// Fields absent from the literal take their declared default, or null
    /// without one. An explicit null stays null.
    ///
    /// # Errors
    ///
    /// If the input object declares no such field, or decoding fails.
    pub fn get_field_value(&self, name: &str) -> FieldResult<HostValue> {
        let field = self.field(name)?;
        field.decode(self.schema, self.context, &self.raw_value(field)?)
    }

    /// Returns the literal value of the named field, before decoding.
    ///
    /// # Errors
    ///
    /// If the input object declares no such field.
    pub fn get_raw_field_value(&self, name: &str) -> FieldResult<LiteralValue> {
        self.raw_value(self.field(name)?)
    }
}

/// Decodes an input object into an
/// [`IndexMap`](indexmap::IndexMap)`<`[`ArcStr`]`, `[`HostValue`]`>` holding
/// every declared field.
pub(crate) fn decode_all_fields(io: &InputObjectContext<'_>) -> FieldResult<HostValue> {
    if io.is_nil() {
        return Ok(HostValue::null());
    }
    io.field_names()
        .map(|name| Ok((name.clone(), io.get_field_value(name)?)))
        .collect::<FieldResult<indexmap::IndexMap<ArcStr, HostValue>>>()
        .map(HostValue::new)
}
