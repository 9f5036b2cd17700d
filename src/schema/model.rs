use std::{fmt, sync::Arc};

use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::{
    executor::{Context, FieldResult},
    schema::meta::{Argument, InputObjectMeta, MetaType, ObjectMeta, ScalarMeta},
    types::{base::TypeKind, input::InputDecoder},
    value::{HostValue, LiteralValue},
};

/// Index of a named type in its [`SchemaType`].
///
/// Only meaningful for the schema that handed it out.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TypeId(pub(crate) usize);

/// Resolved reference to a type: a named type, possibly wrapped into lists
/// and non-nulls.
///
/// Two references with the same shape are interchangeable.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeRef {
    /// A named type.
    Named(TypeId),
    /// A list of the inner type.
    List(Box<TypeRef>),
    /// A non-null of the inner type.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Returns the named type found after unpacking all wrappers.
    pub fn innermost(&self) -> TypeId {
        match self {
            Self::Named(id) => *id,
            Self::List(inner) | Self::NonNull(inner) => inner.innermost(),
        }
    }

    /// Indicates whether this is a non-null reference.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

/// Metadata for a schema
///
/// Built by [`SchemaBuilder::build`](crate::SchemaBuilder::build), immutable
/// afterwards, and freely shared across threads.
#[derive(Debug)]
pub struct SchemaType {
    pub(crate) description: Option<ArcStr>,
    pub(crate) types: IndexMap<ArcStr, MetaType>,
    pub(crate) query_type: TypeId,
    pub(crate) directives: IndexMap<ArcStr, Arc<DirectiveType>>,
    pub(crate) introspection: bool,
}

/// Borrowed view of a [`TypeRef`], with named types looked up.
#[derive(Clone, Debug)]
pub enum TypeType<'a> {
    /// A named type.
    Concrete(&'a MetaType),
    /// A non-null of the inner type.
    NonNull(Box<TypeType<'a>>),
    /// A list of the inner type.
    List(Box<TypeType<'a>>),
}

/// Definition of a directive
#[derive(Debug)]
pub struct DirectiveType {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub locations: Vec<DirectiveLocation>,
    #[doc(hidden)]
    pub arguments: Vec<Arc<Argument>>,
    #[doc(hidden)]
    pub is_repeatable: bool,
    pub(crate) builtin: bool,
}

impl DirectiveType {
    /// Indicates whether this directive is one every schema carries.
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Access an argument's meta data given its name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .map(Arc::as_ref)
    }
}

/// Places a directive may be applied to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    /// All the locations, in the order the `__DirectiveLocation` enum
    /// declares them.
    pub const ALL: [Self; 18] = [
        Self::Query,
        Self::Mutation,
        Self::Subscription,
        Self::Field,
        Self::FragmentDefinition,
        Self::FragmentSpread,
        Self::InlineFragment,
        Self::Schema,
        Self::Scalar,
        Self::Object,
        Self::FieldDefinition,
        Self::ArgumentDefinition,
        Self::Interface,
        Self::Union,
        Self::Enum,
        Self::EnumValue,
        Self::InputObject,
        Self::InputFieldDefinition,
    ];

    /// Returns the name of this location as introspection reports it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::Schema => "SCHEMA",
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::EnumValue => "ENUM_VALUE",
            Self::InputObject => "INPUT_OBJECT",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SchemaType {
    /// Returns the description of the schema, if any.
    pub fn description(&self) -> Option<&ArcStr> {
        self.description.as_ref()
    }

    /// Indicates whether `__schema` and `__type` were grafted onto the query
    /// type.
    pub fn is_introspection_enabled(&self) -> bool {
        self.introspection
    }

    /// Returns the named type behind a [`TypeId`].
    ///
    /// # Panics
    ///
    /// If the [`TypeId`] was handed out by another schema and is out of
    /// range for this one.
    pub fn meta(&self, id: TypeId) -> &MetaType {
        &self.types[id.0]
    }

    /// Looks up the [`TypeId`] of a named type.
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.types.get_index_of(name).map(TypeId)
    }

    /// Looks up a named type.
    pub fn type_by_name(&self, name: &str) -> Option<TypeType<'_>> {
        self.types.get(name).map(TypeType::Concrete)
    }

    /// Looks up a named type.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// Returns the query type.
    pub fn query_type(&self) -> TypeType<'_> {
        TypeType::Concrete(self.meta(self.query_type))
    }

    /// Returns the query type.
    pub fn concrete_query_type(&self) -> &MetaType {
        self.meta(self.query_type)
    }

    /// Returns the [`TypeId`] of the query type.
    pub fn query_type_id(&self) -> TypeId {
        self.query_type
    }

    /// Returns every named type, in registration order.
    pub fn type_list(&self) -> Vec<TypeType<'_>> {
        self.types.values().map(TypeType::Concrete).collect()
    }

    /// Returns every named type, in registration order.
    pub fn concrete_type_list(&self) -> Vec<&MetaType> {
        self.types.values().collect()
    }

    /// Returns every named type along with its [`TypeId`].
    pub fn types_with_ids(&self) -> impl Iterator<Item = (TypeId, &MetaType)> {
        self.types.values().enumerate().map(|(i, t)| (TypeId(i), t))
    }

    /// Looks up the types a [`TypeRef`] refers to.
    pub fn make_type(&self, t: &TypeRef) -> TypeType<'_> {
        match t {
            TypeRef::Named(id) => TypeType::Concrete(self.meta(*id)),
            TypeRef::List(inner) => TypeType::List(Box::new(self.make_type(inner))),
            TypeRef::NonNull(inner) => TypeType::NonNull(Box::new(self.make_type(inner))),
        }
    }

    /// Returns every directive definition, in definition order.
    pub fn directive_list(&self) -> Vec<&DirectiveType> {
        self.directives.values().map(Arc::as_ref).collect()
    }

    /// Looks up a directive definition.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name).map(Arc::as_ref)
    }

    /// Returns the object types values of an abstract type may be.
    ///
    /// Empty for anything but interfaces and unions.
    pub fn possible_types(&self, t: &MetaType) -> Vec<&ObjectMeta> {
        let ids = match t {
            MetaType::Interface(i) => &i.implementors,
            MetaType::Union(u) => &u.members,
            _ => return Vec::new(),
        };
        ids.iter()
            .filter_map(|id| match self.meta(*id) {
                MetaType::Object(o) => Some(o),
                _ => None,
            })
            .collect()
    }

    /// Checks whether `possible_type` is one of the [`possible_types`] of
    /// `abstract_type`.
    ///
    /// [`possible_types`]: SchemaType::possible_types
    pub fn is_possible_type(&self, abstract_type: &MetaType, possible_type: &ObjectMeta) -> bool {
        self.possible_types(abstract_type)
            .into_iter()
            .any(|t| t.name == possible_type.name)
    }

    /// Checks whether selections under the type condition `on` apply to
    /// values of `object`.
    pub fn fragment_applies(&self, on: &str, object: &ObjectMeta) -> bool {
        object.name == on
            || self
                .concrete_type_by_name(on)
                .is_some_and(|t| t.is_abstract() && self.is_possible_type(t, object))
    }

    /// Decodes a literal against a type of this schema.
    ///
    /// # Errors
    ///
    /// If the type is not an input type, or the literal does not fit it.
    pub fn decode_input(
        &self,
        t: &TypeRef,
        ctx: &Context,
        value: &LiteralValue,
    ) -> FieldResult<HostValue> {
        let decoder = InputDecoder::compile(t, |id| self.meta(id).type_kind()).map_err(|kind| {
            format!("Type \"{}\" is not an input type ({kind})", self.make_type(t))
        })?;
        decoder.decode(self, ctx, value)
    }

    pub(crate) fn scalar_meta(&self, id: TypeId) -> FieldResult<&ScalarMeta> {
        match self.meta(id) {
            MetaType::Scalar(s) => Ok(s),
            t => Err(format!("Type \"{}\" is not a scalar", t.name()).into()),
        }
    }

    pub(crate) fn input_object_meta(&self, id: TypeId) -> FieldResult<&InputObjectMeta> {
        match self.meta(id) {
            MetaType::InputObject(io) => Ok(io),
            t => Err(format!("Type \"{}\" is not an input object", t.name()).into()),
        }
    }
}

impl<'a> TypeType<'a> {
    /// Returns the named type, if this is not a wrapper.
    #[inline]
    pub fn to_concrete(&self) -> Option<&'a MetaType> {
        match self {
            Self::Concrete(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the named type found after unpacking all wrappers.
    #[inline]
    pub fn innermost_concrete(&self) -> &'a MetaType {
        match self {
            Self::Concrete(t) => t,
            Self::NonNull(n) | Self::List(n) => n.innermost_concrete(),
        }
    }

    /// Returns the element type, if this is a (possibly non-null) list.
    #[inline]
    pub fn list_contents(&self) -> Option<&TypeType<'a>> {
        match self {
            Self::List(n) => Some(n),
            Self::NonNull(n) => n.list_contents(),
            Self::Concrete(_) => None,
        }
    }

    /// Indicates whether this is a non-null type.
    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns the name, for named types only.
    pub fn name(&self) -> Option<&'a ArcStr> {
        self.to_concrete().map(MetaType::name)
    }

    /// Returns the kind of this type.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Concrete(t) => t.type_kind(),
            Self::List(_) => TypeKind::List,
            Self::NonNull(_) => TypeKind::NonNull,
        }
    }

    /// Returns the canonical string form: the bare name for named types,
    /// `[X]` for lists and `X!` for non-nulls.
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// Returns true only for the five built-in scalars.
    pub fn is_builtin(&self) -> bool {
        self.to_concrete().is_some_and(MetaType::is_builtin)
    }
}

impl fmt::Display for TypeType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(t) => f.write_str(t.name()),
            Self::List(i) => write!(f, "[{i}]"),
            Self::NonNull(i) => write!(f, "{i}!"),
        }
    }
}

/// Wrapper types compare structurally, named types by identity.
impl PartialEq for TypeType<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Concrete(a), Self::Concrete(b)) => std::ptr::eq(*a, *b),
            (Self::List(a), Self::List(b)) | (Self::NonNull(a), Self::NonNull(b)) => a == b,
            _ => false,
        }
    }
}
