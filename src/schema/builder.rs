//! Declarations collected before a schema is built.
//!
//! Declarations are order-independent: a field may refer to a type that is
//! only added later. Nothing is resolved until [`SchemaBuilder::build`].

use std::sync::Arc;

use arcstr::ArcStr;
use derive_more::with_trait::{Debug, From};
use indexmap::IndexMap;

use crate::{
    ast::{self, Directive, InputValue, IntoTypeLiteral, TypeParseError},
    executor::{Context, FieldResult, Resolver},
    introspection,
    schema::{
        error::{BuildError, BuildErrorKind, BuildErrors, PathElement},
        meta::{DecodeFn, EncodeFn, InputObjectDecodeFn, ListFactoryFn, UnwrapFn},
        model::{DirectiveLocation, SchemaType},
        registry,
    },
    types::{base::TypeKind, input::InputObjectContext, scalars},
    value::{HostValue, LiteralValue},
};

/// Declaration of a scalar type.
#[derive(Clone, Debug)]
pub struct ScalarBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) specified_by_url: Option<ArcStr>,
    #[debug(skip)]
    pub(crate) encode: EncodeFn,
    #[debug(skip)]
    pub(crate) decode: DecodeFn,
    #[debug(skip)]
    pub(crate) list_factory: Option<ListFactoryFn>,
}

impl ScalarBuilder {
    /// Declares a new scalar with the functions converting its values
    /// between host and literal form.
    ///
    /// `decode` also receives nulls, and is expected to map them to
    /// [`HostValue::null`] unless the scalar has a zero value to offer.
    pub fn new<E, D>(name: impl Into<ArcStr>, encode: E, decode: D) -> Self
    where
        E: Fn(&Context, &HostValue) -> FieldResult<LiteralValue> + Send + Sync + 'static,
        D: Fn(&Context, &LiteralValue) -> FieldResult<HostValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            specified_by_url: None,
            encode: Arc::new(encode),
            decode: Arc::new(decode),
            list_factory: None,
        }
    }

    /// Sets the `description` of this scalar.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this scalar.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Sets the [specification URL][0] of this scalar.
    ///
    /// Overwrites any previously set [specification URL][0].
    ///
    /// [0]: https://spec.graphql.org/October2021#sec--specifiedBy
    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<ArcStr>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }

    /// Sets the function assembling decoded lists of this scalar.
    ///
    /// Without one, lists decode into [`HostValue::list`].
    #[must_use]
    pub fn list_factory<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, &mut dyn FnMut(usize) -> FieldResult<HostValue>) -> FieldResult<HostValue>
            + Send
            + Sync
            + 'static,
    {
        self.list_factory = Some(Arc::new(f));
        self
    }
}

/// Declaration of a single enum value.
#[derive(Clone, Debug)]
pub struct EnumValueBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
}

impl EnumValueBuilder {
    /// Declares a new enum value.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
        }
    }

    /// Sets the `description` of this value.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this value.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Marks this value as deprecated, with an optional reason.
    #[must_use]
    pub fn deprecated(self, reason: Option<&str>) -> Self {
        self.directive(deprecated_directive(reason))
    }
}

/// Declaration of an enum type.
#[derive(Clone, Debug)]
pub struct EnumBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) values: Vec<EnumValueBuilder>,
    #[debug(skip)]
    pub(crate) encode: Option<EncodeFn>,
    #[debug(skip)]
    pub(crate) decode: Option<DecodeFn>,
}

impl EnumBuilder {
    /// Declares a new enum.
    ///
    /// Without custom functions, values decode into their name as a
    /// [`String`], and encode from [`String`], [`ArcStr`] or `&'static str`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            values: Vec::new(),
            encode: None,
            decode: None,
        }
    }

    /// Sets the `description` of this enum.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this enum.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Adds a value to this enum.
    #[must_use]
    pub fn value(mut self, value: EnumValueBuilder) -> Self {
        self.values.push(value);
        self
    }

    /// Adds plain values, without descriptions or directives, to this enum.
    #[must_use]
    pub fn values<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ArcStr>,
    {
        self.values
            .extend(names.into_iter().map(EnumValueBuilder::new));
        self
    }

    /// Sets the function encoding host values of this enum into value names.
    #[must_use]
    pub fn encode<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &HostValue) -> FieldResult<LiteralValue> + Send + Sync + 'static,
    {
        self.encode = Some(Arc::new(f));
        self
    }

    /// Sets the function decoding value names (or null) into host values.
    #[must_use]
    pub fn decode<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &LiteralValue) -> FieldResult<HostValue> + Send + Sync + 'static,
    {
        self.decode = Some(Arc::new(f));
        self
    }
}

/// Declaration of an argument of a field or directive, or of a field of an
/// input object.
#[derive(Clone, Debug)]
pub struct ArgumentBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) arg_type: Result<ast::Type, TypeParseError>,
    pub(crate) default_value: Option<InputValue>,
}

impl ArgumentBuilder {
    /// Declares a new argument of the given type, e.g. `"[Episode!]"`.
    pub fn new(name: impl Into<ArcStr>, arg_type: impl IntoTypeLiteral) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            arg_type: arg_type.into_type_literal(),
            default_value: None,
        }
    }

    /// Sets the `description` of this argument.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this argument.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Sets the default value of this argument.
    ///
    /// The value is kept as written, and only decoded when the argument is
    /// absent from a request.
    ///
    /// Overwrites any previously set default value.
    #[must_use]
    pub fn default_value(mut self, value: InputValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Declaration of a field of an object or interface.
#[derive(Clone, Debug)]
pub struct FieldBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) field_type: Result<ast::Type, TypeParseError>,
    pub(crate) arguments: Vec<ArgumentBuilder>,
    pub(crate) resolver: Resolver,
}

impl FieldBuilder {
    /// Declares a new field returning the given type, e.g. `"[Episode!]"`.
    pub fn new(name: impl Into<ArcStr>, field_type: impl IntoTypeLiteral, resolver: Resolver) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            field_type: field_type.into_type_literal(),
            arguments: Vec::new(),
            resolver,
        }
    }

    /// Sets the `description` of this field.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this field.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Marks this field as deprecated, with an optional reason.
    #[must_use]
    pub fn deprecated(self, reason: Option<&str>) -> Self {
        self.directive(deprecated_directive(reason))
    }

    /// Adds an argument to this field.
    ///
    /// Arguments keep the order they are added in.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentBuilder) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Declaration of an object type.
#[derive(Clone, Debug)]
pub struct ObjectBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) fields: Vec<FieldBuilder>,
    pub(crate) interfaces: Vec<ArcStr>,
}

impl ObjectBuilder {
    /// Declares a new object type.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            fields: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    /// Sets the `description` of this object.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this object.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Adds a field to this object.
    #[must_use]
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares this object to implement the named interface.
    #[must_use]
    pub fn interface(mut self, name: impl Into<ArcStr>) -> Self {
        self.interfaces.push(name.into());
        self
    }
}

/// Declaration of an interface type.
#[derive(Clone, Debug)]
pub struct InterfaceBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) fields: Vec<FieldBuilder>,
    #[debug(skip)]
    pub(crate) unwrap: Option<UnwrapFn>,
}

impl InterfaceBuilder {
    /// Declares a new interface type.
    ///
    /// Without a custom unwrap function, values are expected to be built
    /// with [`HostValue::typed`].
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            fields: Vec::new(),
            unwrap: None,
        }
    }

    /// Sets the `description` of this interface.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this interface.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Adds a field to this interface.
    #[must_use]
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the function revealing the concrete object behind a value.
    #[must_use]
    pub fn unwrap<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &HostValue) -> FieldResult<(HostValue, ArcStr)> + Send + Sync + 'static,
    {
        self.unwrap = Some(Arc::new(f));
        self
    }
}

/// Declaration of a union type.
#[derive(Clone, Debug)]
pub struct UnionBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) members: Vec<ArcStr>,
    #[debug(skip)]
    pub(crate) unwrap: Option<UnwrapFn>,
}

impl UnionBuilder {
    /// Declares a new union type.
    ///
    /// Without a custom unwrap function, values are expected to be built
    /// with [`HostValue::typed`].
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            members: Vec::new(),
            unwrap: None,
        }
    }

    /// Sets the `description` of this union.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this union.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Adds the named object type to the members of this union.
    #[must_use]
    pub fn member(mut self, name: impl Into<ArcStr>) -> Self {
        self.members.push(name.into());
        self
    }

    /// Sets the function revealing the concrete object behind a value.
    #[must_use]
    pub fn unwrap<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &HostValue) -> FieldResult<(HostValue, ArcStr)> + Send + Sync + 'static,
    {
        self.unwrap = Some(Arc::new(f));
        self
    }
}

/// Declaration of an input object type.
#[derive(Clone, Debug)]
pub struct InputObjectBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) fields: Vec<ArgumentBuilder>,
    #[debug(skip)]
    pub(crate) decode: Option<InputObjectDecodeFn>,
    #[debug(skip)]
    pub(crate) list_factory: Option<ListFactoryFn>,
}

impl InputObjectBuilder {
    /// Declares a new input object type.
    ///
    /// Without a custom decode function, values decode into an
    /// [`IndexMap`]`<`[`ArcStr`]`, `[`HostValue`]`>` holding every declared
    /// field.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            fields: Vec::new(),
            decode: None,
            list_factory: None,
        }
    }

    /// Sets the `description` of this input object.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Applies a directive to this input object.
    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Adds a field to this input object.
    #[must_use]
    pub fn field(mut self, field: ArgumentBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the function decoding literals of this input object.
    #[must_use]
    pub fn decode<F>(mut self, f: F) -> Self
    where
        F: Fn(&InputObjectContext<'_>) -> FieldResult<HostValue> + Send + Sync + 'static,
    {
        self.decode = Some(Arc::new(f));
        self
    }

    /// Sets the function assembling decoded lists of this input object.
    ///
    /// Without one, lists decode into [`HostValue::list`].
    #[must_use]
    pub fn list_factory<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, &mut dyn FnMut(usize) -> FieldResult<HostValue>) -> FieldResult<HostValue>
            + Send
            + Sync
            + 'static,
    {
        self.list_factory = Some(Arc::new(f));
        self
    }
}

/// Definition of a directive.
#[derive(Clone, Debug)]
pub struct DirectiveBuilder {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) locations: Vec<DirectiveLocation>,
    pub(crate) arguments: Vec<ArgumentBuilder>,
    pub(crate) repeatable: bool,
    pub(crate) builtin: bool,
}

impl DirectiveBuilder {
    /// Defines a new directive, permitted at the given locations.
    pub fn new(
        name: impl Into<ArcStr>,
        locations: impl IntoIterator<Item = DirectiveLocation>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            locations: locations.into_iter().collect(),
            arguments: Vec::new(),
            repeatable: false,
            builtin: false,
        }
    }

    /// Sets the `description` of this directive.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an argument to this directive.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentBuilder) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Allows this directive to be applied more than once per location.
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    fn builtin(mut self) -> Self {
        self.builtin = true;
        self
    }
}

/// Declaration of any named type.
#[derive(Clone, Debug, From)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum TypeBuilder {
    Scalar(ScalarBuilder),
    Enum(EnumBuilder),
    Object(ObjectBuilder),
    Interface(InterfaceBuilder),
    Union(UnionBuilder),
    InputObject(InputObjectBuilder),
}

impl TypeBuilder {
    /// Returns the name of the declared type.
    pub fn name(&self) -> &ArcStr {
        match self {
            Self::Scalar(ScalarBuilder { name, .. })
            | Self::Enum(EnumBuilder { name, .. })
            | Self::Object(ObjectBuilder { name, .. })
            | Self::Interface(InterfaceBuilder { name, .. })
            | Self::Union(UnionBuilder { name, .. })
            | Self::InputObject(InputObjectBuilder { name, .. }) => name,
        }
    }

    /// Returns the kind of the declared type.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Enum(_) => TypeKind::Enum,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    pub(crate) fn path_element(&self) -> PathElement {
        let name = self.name().clone();
        match self {
            Self::Scalar(_) => PathElement::Scalar(name),
            Self::Enum(_) => PathElement::Enum(name),
            Self::Object(_) => PathElement::Object(name),
            Self::Interface(_) => PathElement::Interface(name),
            Self::Union(_) => PathElement::Union(name),
            Self::InputObject(_) => PathElement::InputObject(name),
        }
    }
}

/// Staging area for a schema.
///
/// Collects declarations, then resolves and validates them all at once in
/// [`SchemaBuilder::build`]. Errors in declarations are deferred to that
/// point, so that a single build reports every independent mistake.
///
/// ```rust
/// # use gql_schema::{FieldBuilder, ObjectBuilder, Resolver, SchemaBuilder, HostValue};
/// let mut builder = SchemaBuilder::new();
/// builder
///     .add_object(ObjectBuilder::new("Query").field(FieldBuilder::new(
///         "hello",
///         "String!",
///         Resolver::simple(|_| Ok::<_, gql_schema::FieldError>(HostValue::new("world"))),
///     )))
///     .query_type("Query");
///
/// let schema = builder.build().unwrap();
/// assert_eq!(schema.concrete_query_type().name(), "Query");
/// ```
#[derive(Clone, Debug)]
pub struct SchemaBuilder {
    pub(crate) description: Option<ArcStr>,
    pub(crate) types: IndexMap<ArcStr, TypeBuilder>,
    pub(crate) directives: Vec<DirectiveBuilder>,
    pub(crate) errors: Vec<BuildError>,
    pub(crate) query_type: Option<ArcStr>,
    pub(crate) introspection: bool,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Creates a builder holding the built-in scalars and directives.
    pub fn new() -> Self {
        Self {
            description: None,
            types: scalars::BUILTIN_SCALARS
                .iter()
                .map(|s| (s.name.clone(), TypeBuilder::Scalar(s.clone())))
                .collect(),
            directives: builtin_directives(),
            errors: Vec::new(),
            query_type: None,
            introspection: true,
        }
    }

    /// Sets the `description` of the schema.
    ///
    /// Overwrites any previously set description.
    pub fn description(&mut self, description: impl Into<ArcStr>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Designates the named object type as the query root.
    pub fn query_type(&mut self, name: impl Into<ArcStr>) -> &mut Self {
        self.query_type = Some(name.into());
        self
    }

    /// Prevents `__schema` and `__type` from being attached to the query
    /// type, and the introspection types from being registered.
    pub fn disable_introspection(&mut self) -> &mut Self {
        self.introspection = false;
        self
    }

    /// Reverts [`SchemaBuilder::disable_introspection`].
    pub fn enable_introspection(&mut self) -> &mut Self {
        self.introspection = true;
        self
    }

    /// Adds a named type.
    ///
    /// A name that is already taken, or reserved for introspection, is
    /// reported by [`SchemaBuilder::build`].
    pub fn add_type(&mut self, ty: impl Into<TypeBuilder>) -> &mut Self {
        let ty = ty.into();
        let name = ty.name().clone();
        if name.starts_with("__") {
            self.errors.push(BuildError::new(
                vec![ty.path_element()],
                BuildErrorKind::ReservedName(name),
            ));
        } else if self.types.contains_key(&name) {
            self.errors.push(BuildError::new(
                vec![ty.path_element()],
                BuildErrorKind::DuplicateType(name),
            ));
        } else {
            self.types.insert(name, ty);
        }
        self
    }

    /// Adds a scalar type, see [`SchemaBuilder::add_type`].
    pub fn add_scalar(&mut self, scalar: ScalarBuilder) -> &mut Self {
        self.add_type(scalar)
    }

    /// Adds an enum type, see [`SchemaBuilder::add_type`].
    pub fn add_enum(&mut self, r#enum: EnumBuilder) -> &mut Self {
        self.add_type(r#enum)
    }

    /// Adds an object type, see [`SchemaBuilder::add_type`].
    pub fn add_object(&mut self, object: ObjectBuilder) -> &mut Self {
        self.add_type(object)
    }

    /// Adds an interface type, see [`SchemaBuilder::add_type`].
    pub fn add_interface(&mut self, interface: InterfaceBuilder) -> &mut Self {
        self.add_type(interface)
    }

    /// Adds a union type, see [`SchemaBuilder::add_type`].
    pub fn add_union(&mut self, union: UnionBuilder) -> &mut Self {
        self.add_type(union)
    }

    /// Adds an input object type, see [`SchemaBuilder::add_type`].
    pub fn add_input_object(&mut self, input_object: InputObjectBuilder) -> &mut Self {
        self.add_type(input_object)
    }

    /// Adds a directive definition.
    pub fn add_directive(&mut self, directive: DirectiveBuilder) -> &mut Self {
        self.directives.push(directive);
        self
    }

    /// Resolves every declaration into an immutable [`SchemaType`].
    ///
    /// # Errors
    ///
    /// Every deferred declaration error, or else every error found while
    /// resolving and validating the declarations.
    pub fn build(self) -> Result<SchemaType, BuildErrors> {
        if !self.errors.is_empty() {
            return Err(BuildErrors(self.errors));
        }
        let mut types = self.types;
        if self.introspection {
            for ty in introspection::META_SCHEMA.iter() {
                types.insert(ty.name().clone(), ty.clone());
            }
        }
        registry::Registry::new(types).build(
            self.description,
            self.query_type,
            self.directives,
            self.introspection,
        )
    }
}

fn deprecated_directive(reason: Option<&str>) -> Directive {
    let directive = Directive::new("deprecated");
    match reason {
        Some(reason) => directive.argument("reason", InputValue::String(reason.into())),
        None => directive,
    }
}

fn builtin_directives() -> Vec<DirectiveBuilder> {
    use DirectiveLocation as L;

    vec![
        DirectiveBuilder::new("include", [L::Field, L::FragmentSpread, L::InlineFragment])
            .description(
                "Directs the executor to include this field or fragment only when the `if` \
                 argument is true.",
            )
            .argument(ArgumentBuilder::new("if", "Boolean!").description("Included when true."))
            .builtin(),
        DirectiveBuilder::new("skip", [L::Field, L::FragmentSpread, L::InlineFragment])
            .description(
                "Directs the executor to skip this field or fragment when the `if` argument is \
                 true.",
            )
            .argument(ArgumentBuilder::new("if", "Boolean!").description("Skipped when true."))
            .builtin(),
        DirectiveBuilder::new(
            "deprecated",
            [
                L::FieldDefinition,
                L::ArgumentDefinition,
                L::InputFieldDefinition,
                L::EnumValue,
            ],
        )
        .description("Marks an element of a GraphQL schema as no longer supported.")
        .argument(
            ArgumentBuilder::new("reason", "String")
                .description("Explains why this element was deprecated.")
                .default_value(InputValue::String(
                    crate::schema::meta::DEFAULT_DEPRECATION_REASON.into(),
                )),
        )
        .builtin(),
        DirectiveBuilder::new("specifiedBy", [L::Scalar])
            .description("Exposes a URL that specifies the behavior of this scalar.")
            .argument(
                ArgumentBuilder::new("url", "String!")
                    .description("The URL that specifies the behavior of this scalar."),
            )
            .builtin(),
    ]
}
