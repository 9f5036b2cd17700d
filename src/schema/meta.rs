//! Types used to describe a GraphQL schema

use std::sync::Arc;

use arcstr::ArcStr;
use derive_more::with_trait::Debug;
use indexmap::IndexMap;

use crate::{
    ast::{Directive, InputValue},
    executor::{Context, FieldResult, Resolver},
    schema::model::{SchemaType, TypeId, TypeRef},
    types::{
        base::TypeKind,
        input::{InputDecoder, InputObjectContext},
    },
    value::{HostValue, LiteralValue},
};

/// Deprecation reason reported when a `@deprecated` directive gives none.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Names of the scalars every schema carries.
pub const BUILTIN_SCALARS: [&str; 5] = ["ID", "String", "Int", "Float", "Boolean"];

/// Whether an item is deprecated, with context.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DeprecationStatus {
    /// The field/variant is not deprecated.
    Current,
    /// The field/variant is deprecated, with a reason.
    Deprecated(ArcStr),
}

impl DeprecationStatus {
    /// Derives the status from applied directives.
    ///
    /// An item is deprecated iff it carries a `@deprecated` directive. A
    /// missing or non-string `reason` falls back to
    /// [`DEFAULT_DEPRECATION_REASON`].
    pub fn from_directives(directives: &[Directive]) -> Self {
        directives
            .iter()
            .find(|d| d.name == "deprecated")
            .map_or(Self::Current, |d| {
                Self::Deprecated(match d.argument_value("reason") {
                    Some(InputValue::String(reason)) => reason.as_str().into(),
                    _ => DEFAULT_DEPRECATION_REASON.into(),
                })
            })
    }

    /// If this deprecation status indicates the item is deprecated.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated(_))
    }

    /// The reason for the deprecation, or none if `Current`.
    pub fn reason(&self) -> Option<&ArcStr> {
        match self {
            Self::Current => None,
            Self::Deprecated(rsn) => Some(rsn),
        }
    }
}

/// Shortcut for a function encoding a host value of a leaf type.
pub type EncodeFn = Arc<dyn Fn(&Context, &HostValue) -> FieldResult<LiteralValue> + Send + Sync>;

/// Shortcut for a function decoding a literal of a leaf type.
pub type DecodeFn = Arc<dyn Fn(&Context, &LiteralValue) -> FieldResult<HostValue> + Send + Sync>;

/// Shortcut for a function decoding an input object.
pub type InputObjectDecodeFn =
    Arc<dyn Fn(&InputObjectContext<'_>) -> FieldResult<HostValue> + Send + Sync>;

/// Shortcut for a function assembling decoded list elements into a host
/// container.
///
/// Receives the list length and a function decoding the element at an index.
pub type ListFactoryFn = Arc<
    dyn Fn(usize, &mut dyn FnMut(usize) -> FieldResult<HostValue>) -> FieldResult<HostValue>
        + Send
        + Sync,
>;

/// Shortcut for a function revealing the concrete object behind an interface
/// or union value, along with the object type's name.
pub type UnwrapFn =
    Arc<dyn Fn(&Context, &HostValue) -> FieldResult<(HostValue, ArcStr)> + Send + Sync>;

/// Scalar type metadata
#[derive(Debug)]
pub struct ScalarMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub specified_by_url: Option<ArcStr>,
    #[debug(skip)]
    pub(crate) encode_fn: EncodeFn,
    #[debug(skip)]
    pub(crate) decode_fn: DecodeFn,
    #[debug(skip)]
    pub(crate) list_factory: Option<ListFactoryFn>,
}

impl ScalarMeta {
    /// Encodes a host value of this scalar into its literal form.
    ///
    /// # Errors
    ///
    /// Whatever the encode function of the scalar reports.
    pub fn encode(&self, ctx: &Context, value: &HostValue) -> FieldResult<LiteralValue> {
        (self.encode_fn)(ctx, value)
    }

    /// Decodes a literal of this scalar, null included.
    ///
    /// # Errors
    ///
    /// Whatever the decode function of the scalar reports.
    pub fn decode(&self, ctx: &Context, value: &LiteralValue) -> FieldResult<HostValue> {
        (self.decode_fn)(ctx, value)
    }
}

/// Enum type metadata
#[derive(Debug)]
pub struct EnumMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub values: IndexMap<ArcStr, Arc<EnumValue>>,
    #[debug(skip)]
    pub(crate) encode_fn: EncodeFn,
    #[debug(skip)]
    pub(crate) decode_fn: DecodeFn,
}

impl EnumMeta {
    /// Checks whether `name` is one of the declared values.
    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Encodes a host value of this enum.
    ///
    /// # Errors
    ///
    /// If the encode function fails, or produces anything but null or one of
    /// the declared value names.
    pub fn encode(&self, ctx: &Context, value: &HostValue) -> FieldResult<LiteralValue> {
        let encoded = (self.encode_fn)(ctx, value)?;
        match &encoded {
            LiteralValue::Null => Ok(encoded),
            LiteralValue::String(s) if self.has_value(s) => Ok(encoded),
            v => Err(format!("Enum \"{}\" cannot represent value: {v}", self.name).into()),
        }
    }

    /// Decodes a literal of this enum.
    ///
    /// Null is handed to the decode function as is, strings only once they
    /// are known to name a declared value.
    ///
    /// # Errors
    ///
    /// If the literal is not null and does not name a declared value, or the
    /// decode function fails.
    pub fn decode(&self, ctx: &Context, value: &LiteralValue) -> FieldResult<HostValue> {
        match value {
            LiteralValue::Null => (self.decode_fn)(ctx, value),
            LiteralValue::String(s) if self.has_value(s) => (self.decode_fn)(ctx, value),
            LiteralValue::String(s) => Err(format!("Received invalid enum value {s}").into()),
            v => Err(format!("Received invalid enum value {v}").into()),
        }
    }
}

/// Object type metadata
#[derive(Debug)]
pub struct ObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub fields: IndexMap<ArcStr, Arc<Field>>,
    #[doc(hidden)]
    pub interface_names: Vec<ArcStr>,
    #[doc(hidden)]
    pub interfaces: Vec<TypeId>,
}

impl ObjectMeta {
    /// Access a field's meta data given its name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.get(name).map(Arc::as_ref)
    }

    /// Checks whether this object declares to implement the named interface.
    pub fn has_interface(&self, name: &str) -> bool {
        self.interface_names.iter().any(|n| n == name)
    }
}

/// Interface type metadata
#[derive(Debug)]
pub struct InterfaceMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub fields: IndexMap<ArcStr, Arc<Field>>,
    #[doc(hidden)]
    pub implementors: Vec<TypeId>,
    #[debug(skip)]
    pub(crate) unwrap_fn: UnwrapFn,
}

impl InterfaceMeta {
    /// Access a field's meta data given its name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.get(name).map(Arc::as_ref)
    }

    /// Reveals the concrete object behind a value of this interface.
    ///
    /// # Errors
    ///
    /// Whatever the unwrap function of the interface reports.
    pub fn unwrap(&self, ctx: &Context, value: &HostValue) -> FieldResult<(HostValue, ArcStr)> {
        (self.unwrap_fn)(ctx, value)
    }
}

/// Union type metadata
#[derive(Debug)]
pub struct UnionMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub members: Vec<TypeId>,
    #[debug(skip)]
    pub(crate) unwrap_fn: UnwrapFn,
}

impl UnionMeta {
    /// Reveals the concrete object behind a value of this union.
    ///
    /// # Errors
    ///
    /// Whatever the unwrap function of the union reports.
    pub fn unwrap(&self, ctx: &Context, value: &HostValue) -> FieldResult<(HostValue, ArcStr)> {
        (self.unwrap_fn)(ctx, value)
    }
}

/// Input object metadata
#[derive(Debug)]
pub struct InputObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub input_fields: IndexMap<ArcStr, Arc<Argument>>,
    #[debug(skip)]
    pub(crate) decode_fn: InputObjectDecodeFn,
    #[debug(skip)]
    pub(crate) list_factory: Option<ListFactoryFn>,
}

impl InputObjectMeta {
    /// Access an input field's meta data given its name.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        self.input_fields.get(name).map(Arc::as_ref)
    }

    /// Runs the decode function of this input object.
    ///
    /// # Errors
    ///
    /// Whatever the decode function reports.
    pub fn decode(&self, ctx: &InputObjectContext<'_>) -> FieldResult<HostValue> {
        (self.decode_fn)(ctx)
    }
}

/// A placeholder for not-yet-registered types
///
/// While a type is being registered, a placeholder is inserted into the
/// registry under its name, so that references back to it resolve. No
/// placeholder outlives the build.
#[derive(Debug)]
pub struct PlaceholderMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub kind: TypeKind,
}

/// Generic type metadata
#[derive(Debug)]
pub enum MetaType {
    #[doc(hidden)]
    Scalar(ScalarMeta),
    #[doc(hidden)]
    Enum(EnumMeta),
    #[doc(hidden)]
    Object(ObjectMeta),
    #[doc(hidden)]
    Interface(InterfaceMeta),
    #[doc(hidden)]
    Union(UnionMeta),
    #[doc(hidden)]
    InputObject(InputObjectMeta),
    #[doc(hidden)]
    Placeholder(PlaceholderMeta),
}

/// Metadata for a field
#[derive(Debug)]
pub struct Field {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub arguments: Vec<Arc<Argument>>,
    #[doc(hidden)]
    pub field_type: TypeRef,
    #[doc(hidden)]
    pub resolver: Resolver,
    #[doc(hidden)]
    pub deprecation_status: DeprecationStatus,
}

impl Field {
    /// Returns true if the field is reserved for introspection.
    pub fn is_builtin(&self) -> bool {
        // "used exclusively by GraphQL’s introspection system"
        self.name.starts_with("__")
    }

    /// Access an argument's meta data given its name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .map(Arc::as_ref)
    }
}

/// Metadata for an argument to a field, a directive, or a field of an input
/// object
#[derive(Debug)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub directives: Vec<Directive>,
    #[doc(hidden)]
    pub arg_type: TypeRef,
    #[doc(hidden)]
    pub default_value: Option<InputValue>,
    pub(crate) decoder: InputDecoder,
}

impl Argument {
    /// Decodes a literal against the declared type of this argument.
    ///
    /// # Errors
    ///
    /// If the literal does not fit the declared type.
    pub fn decode(
        &self,
        schema: &SchemaType,
        ctx: &Context,
        value: &LiteralValue,
    ) -> FieldResult<HostValue> {
        self.decoder.decode(schema, ctx, value)
    }
}

/// Metadata for a single value in an enum
#[derive(Clone, Debug)]
pub struct EnumValue {
    /// The name of the enum value
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
    /// The optional description of the enum value.
    ///
    /// Note: this is not the description of the enum itself; it's the
    /// description of this enum _value_.
    pub description: Option<ArcStr>,
    /// Directives applied to the enum value.
    pub directives: Vec<Directive>,
    /// Whether the value is deprecated or not, with a reason.
    pub deprecation_status: DeprecationStatus,
}

impl MetaType {
    /// Access the name of the type.
    pub fn name(&self) -> &ArcStr {
        match self {
            Self::Scalar(ScalarMeta { name, .. })
            | Self::Object(ObjectMeta { name, .. })
            | Self::Enum(EnumMeta { name, .. })
            | Self::Interface(InterfaceMeta { name, .. })
            | Self::Union(UnionMeta { name, .. })
            | Self::InputObject(InputObjectMeta { name, .. })
            | Self::Placeholder(PlaceholderMeta { name, .. }) => name,
        }
    }

    /// Access the description of the type, if applicable
    ///
    /// Placeholders don't have descriptions.
    pub fn description(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(ScalarMeta { description, .. })
            | Self::Object(ObjectMeta { description, .. })
            | Self::Enum(EnumMeta { description, .. })
            | Self::Interface(InterfaceMeta { description, .. })
            | Self::Union(UnionMeta { description, .. })
            | Self::InputObject(InputObjectMeta { description, .. }) => description.as_ref(),
            Self::Placeholder(_) => None,
        }
    }

    /// Access the directives applied to the type.
    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Scalar(ScalarMeta { directives, .. })
            | Self::Object(ObjectMeta { directives, .. })
            | Self::Enum(EnumMeta { directives, .. })
            | Self::Interface(InterfaceMeta { directives, .. })
            | Self::Union(UnionMeta { directives, .. })
            | Self::InputObject(InputObjectMeta { directives, .. }) => directives,
            Self::Placeholder(_) => &[],
        }
    }

    /// Accesses the [specification URL][0], if applicable.
    ///
    /// Only custom GraphQL scalars can have a [specification URL][0].
    ///
    /// [0]: https://spec.graphql.org/October2021#sec--specifiedBy
    pub fn specified_by_url(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(ScalarMeta {
                specified_by_url, ..
            }) => specified_by_url.as_ref(),
            _ => None,
        }
    }

    /// Construct a [`TypeKind`] for a given type.
    ///
    /// Placeholders report the kind of the type they stand in for.
    pub fn type_kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Object(_) => TypeKind::Object,
            Self::Enum(_) => TypeKind::Enum,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::InputObject(_) => TypeKind::InputObject,
            Self::Placeholder(PlaceholderMeta { kind, .. }) => *kind,
        }
    }

    /// Access a field's meta data given its name
    ///
    /// Only objects and interfaces have fields. This method always returns
    /// [`None`] for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        match self {
            Self::Object(ObjectMeta { fields, .. })
            | Self::Interface(InterfaceMeta { fields, .. }) => fields.get(name).map(Arc::as_ref),
            _ => None,
        }
    }

    /// Access an input field's meta data given its name
    ///
    /// Only input objects have input fields. This method always returns
    /// [`None`] for other types.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        match self {
            Self::InputObject(io) => io.input_field_by_name(name),
            _ => None,
        }
    }

    /// Returns true if the type is a composite type
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can occur in leaf positions in queries
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Enum(_) | Self::Scalar(_))
    }

    /// Returns true if the type is abstract
    ///
    /// Only interfaces and unions are abstract types.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can be used in input positions, e.g.
    /// arguments or input object fields
    ///
    /// Only scalars, enums, and input objects are input types.
    pub fn is_input(&self) -> bool {
        self.type_kind().is_input()
    }

    /// Returns true if the type is one of the five built-in scalars.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Scalar(_)) && BUILTIN_SCALARS.contains(&self.name().as_str())
    }

    /// Returns true if the type belongs to the introspection meta-schema.
    pub fn is_introspection(&self) -> bool {
        // "used exclusively by GraphQL’s introspection system"
        self.name().starts_with("__")
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Directive, InputValue};

    use super::DeprecationStatus;

    #[test]
    fn derives_deprecation_from_directives() {
        assert_eq!(
            DeprecationStatus::from_directives(&[Directive::new("internal")]),
            DeprecationStatus::Current,
        );
        assert_eq!(
            DeprecationStatus::from_directives(&[Directive::new("deprecated")]),
            DeprecationStatus::Deprecated("No longer supported".into()),
        );
        assert_eq!(
            DeprecationStatus::from_directives(&[Directive::new("deprecated")
                .argument("reason", InputValue::String("use v2".into()))]),
            DeprecationStatus::Deprecated("use v2".into()),
        );
    }

    #[test]
    fn reports_reason_only_when_deprecated() {
        assert_eq!(DeprecationStatus::Current.reason(), None);
        assert!(!DeprecationStatus::Current.is_deprecated());

        let d = DeprecationStatus::Deprecated("gone".into());
        assert_eq!(d.reason().map(|r| r.as_str()), Some("gone"));
        assert!(d.is_deprecated());
    }
}
