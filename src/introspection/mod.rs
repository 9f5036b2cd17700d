//! The `__Schema` meta-schema every schema describes itself with.
//!
//! Meta-types are ordinary declarations, registered alongside user types,
//! and their resolvers walk the schema handed to them through
//! [`ResolverContext::schema`]. Host values flowing through them are:
//!
//! | Meta-type       | Host value             |
//! |-----------------|------------------------|
//! | `__Schema`      | [`SchemaRoot`]         |
//! | `__Type`        | [`TypeRef`]            |
//! | `__Field`       | `Arc<`[`Field`]`>`     |
//! | `__InputValue`  | `Arc<`[`Argument`]`>`  |
//! | `__EnumValue`   | `Arc<`[`EnumValue`]`>` |
//! | `__Directive`   | `Arc<`[`DirectiveType`]`>` |

use std::{any::Any, sync::{Arc, LazyLock}};

use itertools::Itertools as _;

use crate::{
    ast::{self, InputValue},
    executor::{FieldError, FieldResult, Resolver, ResolverContext},
    schema::{
        builder::{
            ArgumentBuilder, EnumBuilder, FieldBuilder, ObjectBuilder, TypeBuilder,
        },
        meta::{Argument, EnumValue, Field, MetaType},
        model::{DirectiveLocation, DirectiveType, SchemaType, TypeRef},
    },
    types::{base::TypeKind, scalars::host_str},
    value::HostValue,
};

/// From <https://github.com/graphql/graphql-js/blob/8c96dc8276f2de27b8af9ffbd71a4597d483523f/src/utilities/introspectionQuery.js#L21>
pub const INTROSPECTION_QUERY: &str = include_str!("./query.graphql");

/// [`INTROSPECTION_QUERY`] without any `description` selection.
pub const INTROSPECTION_QUERY_WITHOUT_DESCRIPTIONS: &str =
    include_str!("./query_without_descriptions.graphql");

/// The desired GraphQL introspection format for the canonical query
/// (<https://github.com/graphql/graphql-js/blob/8c96dc8276f2de27b8af9ffbd71a4597d483523f/src/utilities/introspectionQuery.js#L21>)
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum IntrospectionFormat {
    /// The canonical GraphQL introspection query.
    #[default]
    All,
    /// The canonical GraphQL introspection query without descriptions.
    WithoutDescriptions,
}

impl IntrospectionFormat {
    /// Returns the query text of this format.
    pub fn query(self) -> &'static str {
        match self {
            Self::All => INTROSPECTION_QUERY,
            Self::WithoutDescriptions => INTROSPECTION_QUERY_WITHOUT_DESCRIPTIONS,
        }
    }
}

/// Host value of `__schema`.
///
/// Carries nothing: `__Schema` resolvers read the schema being executed
/// against from their [`ResolverContext`].
#[derive(Clone, Copy, Debug)]
pub struct SchemaRoot;

/// Declarations of the eight meta-types.
pub(crate) static META_SCHEMA: LazyLock<Vec<TypeBuilder>> = LazyLock::new(|| {
    vec![
        schema_type().into(),
        type_type().into(),
        field_type().into(),
        input_value_type().into(),
        enum_value_type().into(),
        directive_type().into(),
        EnumBuilder::new("__TypeKind")
            .description("An enum describing what kind of type a given `__Type` is.")
            .values(TypeKind::ALL.iter().map(TypeKind::as_str))
            .into(),
        EnumBuilder::new("__DirectiveLocation")
            .description(
                "A Directive can be adjacent to many parts of the GraphQL language, a \
                 __DirectiveLocation describes one such possible adjacencies.",
            )
            .values(DirectiveLocation::ALL.iter().map(DirectiveLocation::as_str))
            .into(),
    ]
});

/// Fields attached to the query type: `__schema` and `__type(name:)`.
pub(crate) fn root_fields() -> Vec<FieldBuilder> {
    vec![
        FieldBuilder::new(
            "__schema",
            "__Schema!",
            Resolver::simple(|_| Ok::<_, FieldError>(HostValue::new(SchemaRoot))).safe(),
        )
        .description("Access the current type schema of this server."),
        FieldBuilder::new(
            "__type",
            "__Type",
            Resolver::full(|ctx: &ResolverContext<'_>, _: &HostValue| {
                let name = ctx.get_argument_value("name")?;
                let name = host_str(&name).ok_or("Argument \"name\" must be a string")?;
                Ok::<_, FieldError>(HostValue::optional(
                    ctx.schema().type_id(name).map(TypeRef::Named),
                ))
            }),
        )
        .description("Request the type information of a single type.")
        .argument(ArgumentBuilder::new("name", "String!")),
    ]
}

fn payload<T: Any>(v: &HostValue) -> FieldResult<&T> {
    v.downcast_ref::<T>()
        .ok_or_else(|| format!("Expected a `{}` host value", std::any::type_name::<T>()).into())
}

/// Declares a meta-field resolved from the host value of type `T`.
fn field<T, F>(name: &str, ty: &str, f: F) -> FieldBuilder
where
    T: Any,
    F: Fn(&ResolverContext<'_>, &T) -> FieldResult<HostValue> + Send + Sync + 'static,
{
    FieldBuilder::new(
        name,
        ty,
        Resolver::full(move |ctx: &ResolverContext<'_>, v: &HostValue| f(ctx, payload::<T>(v)?))
            .safe(),
    )
}

fn include_deprecated() -> ArgumentBuilder {
    ArgumentBuilder::new("includeDeprecated", "Boolean").default_value(InputValue::Boolean(false))
}

fn includes_deprecated(ctx: &ResolverContext<'_>) -> FieldResult<bool> {
    Ok(ctx
        .get_argument_value("includeDeprecated")?
        .downcast_ref::<bool>()
        .copied()
        .unwrap_or(false))
}

fn named(t: TypeRef) -> HostValue {
    HostValue::new(t)
}

fn list_of<T: Any + Send + Sync>(items: impl IntoIterator<Item = T>) -> HostValue {
    HostValue::list(items.into_iter().map(HostValue::new).collect())
}

fn schema_type() -> ObjectBuilder {
    ObjectBuilder::new("__Schema")
        .description(
            "A GraphQL Schema defines the capabilities of a GraphQL server. It exposes all \
             available types and directives on the server, as well as the entry points for \
             query, mutation, and subscription operations.",
        )
        .field(field("description", "String", |ctx, _: &SchemaRoot| {
            Ok(HostValue::optional(ctx.schema().description().cloned()))
        }))
        .field(
            field("types", "[__Type!]!", |ctx, _: &SchemaRoot| {
                Ok(list_of(
                    ctx.schema()
                        .types_with_ids()
                        .sorted_by(|(_, a), (_, b)| a.name().cmp(b.name()))
                        .map(|(id, _)| TypeRef::Named(id)),
                ))
            })
            .description("A list of all types supported by this server."),
        )
        .field(
            field("queryType", "__Type!", |ctx, _: &SchemaRoot| {
                Ok(named(TypeRef::Named(ctx.schema().query_type_id())))
            })
            .description("The type that query operations will be rooted at."),
        )
        .field(
            field("mutationType", "__Type", |_, _: &SchemaRoot| Ok(HostValue::null()))
                .description(
                    "If this server supports mutation, the type that mutation operations will \
                     be rooted at.",
                ),
        )
        .field(
            field("subscriptionType", "__Type", |_, _: &SchemaRoot| {
                Ok(HostValue::null())
            })
            .description(
                "If this server support subscription, the type that subscription operations \
                 will be rooted at.",
            ),
        )
        .field(
            field("directives", "[__Directive!]!", |ctx, _: &SchemaRoot| {
                Ok(HostValue::list(
                    ctx.schema()
                        .directives
                        .values()
                        .sorted_by(|a, b| a.name.cmp(&b.name))
                        .map(|d| HostValue::new(Arc::clone(d)))
                        .collect(),
                ))
            })
            .description("A list of all directives supported by this server."),
        )
}

fn type_type() -> ObjectBuilder {
    ObjectBuilder::new("__Type")
        .description(
            "The fundamental unit of any GraphQL Schema is the type. There are many kinds of \
             types in GraphQL as represented by the `__TypeKind` enum.\n\nDepending on the \
             kind of a type, certain fields describe information about that type. Scalar types \
             provide no information beyond a name, description and optional `specifiedByURL`, \
             while Enum types provide their values. Object and Interface types provide the \
             fields they describe. Abstract types, Union and Interface, provide the Object \
             types possible at runtime. List and NonNull types compose other types.",
        )
        .field(field("kind", "__TypeKind!", |ctx, t: &TypeRef| {
            Ok(HostValue::new(ctx.schema().make_type(t).kind().as_str()))
        }))
        .field(field("name", "String", |ctx, t: &TypeRef| {
            Ok(HostValue::optional(concrete(ctx.schema(), t).map(|m| m.name().clone())))
        }))
        .field(field("description", "String", |ctx, t: &TypeRef| {
            Ok(HostValue::optional(
                concrete(ctx.schema(), t).and_then(|m| m.description().cloned()),
            ))
        }))
        .field(field("specifiedByURL", "String", |ctx, t: &TypeRef| {
            Ok(HostValue::optional(
                concrete(ctx.schema(), t).and_then(|m| m.specified_by_url().cloned()),
            ))
        }))
        .field(
            field("fields", "[__Field!]", |ctx, t: &TypeRef| {
                let fields = match concrete(ctx.schema(), t) {
                    Some(MetaType::Object(o)) => &o.fields,
                    Some(MetaType::Interface(i)) => &i.fields,
                    _ => return Ok(HostValue::null()),
                };
                let include_deprecated = includes_deprecated(ctx)?;
                Ok(list_of(
                    fields
                        .values()
                        .filter(|f| !f.is_builtin())
                        .filter(|f| include_deprecated || !f.deprecation_status.is_deprecated())
                        .sorted_by(|a, b| a.name.cmp(&b.name))
                        .map(Arc::clone),
                ))
            })
            .argument(include_deprecated()),
        )
        .field(field("interfaces", "[__Type!]", |ctx, t: &TypeRef| {
            let schema = ctx.schema();
            Ok(match concrete(schema, t) {
                Some(MetaType::Object(o)) => list_of(
                    o.interfaces
                        .iter()
                        .sorted_by(|a, b| schema.meta(**a).name().cmp(schema.meta(**b).name()))
                        .map(|id| TypeRef::Named(*id)),
                ),
                Some(MetaType::Interface(_)) => HostValue::list(Vec::new()),
                _ => HostValue::null(),
            })
        }))
        .field(field("possibleTypes", "[__Type!]", |ctx, t: &TypeRef| {
            let schema = ctx.schema();
            Ok(match concrete(schema, t) {
                Some(m) if m.is_abstract() => list_of(
                    schema
                        .possible_types(m)
                        .into_iter()
                        .sorted_by(|a, b| a.name.cmp(&b.name))
                        .filter_map(|o| schema.type_id(&o.name))
                        .map(TypeRef::Named),
                ),
                _ => HostValue::null(),
            })
        }))
        .field(
            field("enumValues", "[__EnumValue!]", |ctx, t: &TypeRef| {
                let Some(MetaType::Enum(e)) = concrete(ctx.schema(), t) else {
                    return Ok(HostValue::null());
                };
                let include_deprecated = includes_deprecated(ctx)?;
                Ok(list_of(
                    e.values
                        .values()
                        .filter(|v| include_deprecated || !v.deprecation_status.is_deprecated())
                        .sorted_by(|a, b| a.name.cmp(&b.name))
                        .map(Arc::clone),
                ))
            })
            .argument(include_deprecated()),
        )
        .field(field("inputFields", "[__InputValue!]", |ctx, t: &TypeRef| {
            Ok(match concrete(ctx.schema(), t) {
                Some(MetaType::InputObject(io)) => list_of(
                    io.input_fields
                        .values()
                        .sorted_by(|a, b| a.name.cmp(&b.name))
                        .map(Arc::clone),
                ),
                _ => HostValue::null(),
            })
        }))
        .field(field("ofType", "__Type", |_, t: &TypeRef| {
            Ok(match t {
                TypeRef::Named(_) => HostValue::null(),
                TypeRef::List(inner) | TypeRef::NonNull(inner) => named((**inner).clone()),
            })
        }))
}

fn concrete<'s>(schema: &'s SchemaType, t: &TypeRef) -> Option<&'s MetaType> {
    match t {
        TypeRef::Named(id) => Some(schema.meta(*id)),
        TypeRef::List(_) | TypeRef::NonNull(_) => None,
    }
}

fn field_type() -> ObjectBuilder {
    ObjectBuilder::new("__Field")
        .description(
            "Object and Interface types are described by a list of Fields, each of which has \
             a name, potentially a list of arguments, and a return type.",
        )
        .field(field("name", "String!", |_, f: &Arc<Field>| {
            Ok(HostValue::new(f.name.clone()))
        }))
        .field(field("description", "String", |_, f: &Arc<Field>| {
            Ok(HostValue::optional(f.description.clone()))
        }))
        .field(field("args", "[__InputValue!]!", |_, f: &Arc<Field>| {
            Ok(list_of(f.arguments.iter().map(Arc::clone)))
        }))
        .field(field("type", "__Type!", |_, f: &Arc<Field>| {
            Ok(named(f.field_type.clone()))
        }))
        .field(field("isDeprecated", "Boolean!", |_, f: &Arc<Field>| {
            Ok(HostValue::new(f.deprecation_status.is_deprecated()))
        }))
        .field(field("deprecationReason", "String", |_, f: &Arc<Field>| {
            Ok(HostValue::optional(f.deprecation_status.reason().cloned()))
        }))
}

fn input_value_type() -> ObjectBuilder {
    ObjectBuilder::new("__InputValue")
        .description(
            "Arguments provided to Fields or Directives and the input fields of an \
             InputObject are represented as Input Values which describe their type and \
             optionally a default value.",
        )
        .field(field("name", "String!", |_, a: &Arc<Argument>| {
            Ok(HostValue::new(a.name.clone()))
        }))
        .field(field("description", "String", |_, a: &Arc<Argument>| {
            Ok(HostValue::optional(a.description.clone()))
        }))
        .field(field("type", "__Type!", |_, a: &Arc<Argument>| {
            Ok(named(a.arg_type.clone()))
        }))
        .field(
            field("defaultValue", "String", |_, a: &Arc<Argument>| {
                Ok(HostValue::optional(a.default_value.as_ref().map(ast::print_value)))
            })
            .description(
                "A GraphQL-formatted string representing the default value for this input \
                 value.",
            ),
        )
}

fn enum_value_type() -> ObjectBuilder {
    ObjectBuilder::new("__EnumValue")
        .description(
            "One possible value for a given Enum. Enum values are unique values, not a \
             placeholder for a string or numeric value. However an Enum value is returned in \
             a JSON response as a string.",
        )
        .field(field("name", "String!", |_, v: &Arc<EnumValue>| {
            Ok(HostValue::new(v.name.clone()))
        }))
        .field(field("description", "String", |_, v: &Arc<EnumValue>| {
            Ok(HostValue::optional(v.description.clone()))
        }))
        .field(field("isDeprecated", "Boolean!", |_, v: &Arc<EnumValue>| {
            Ok(HostValue::new(v.deprecation_status.is_deprecated()))
        }))
        .field(field("deprecationReason", "String", |_, v: &Arc<EnumValue>| {
            Ok(HostValue::optional(v.deprecation_status.reason().cloned()))
        }))
}

fn directive_type() -> ObjectBuilder {
    ObjectBuilder::new("__Directive")
        .description(
            "A Directive provides a way to describe alternate runtime execution and type \
             validation behavior in a GraphQL document.",
        )
        .field(field("name", "String!", |_, d: &Arc<DirectiveType>| {
            Ok(HostValue::new(d.name.clone()))
        }))
        .field(field("description", "String", |_, d: &Arc<DirectiveType>| {
            Ok(HostValue::optional(d.description.clone()))
        }))
        .field(field("isRepeatable", "Boolean!", |_, d: &Arc<DirectiveType>| {
            Ok(HostValue::new(d.is_repeatable))
        }))
        .field(field(
            "locations",
            "[__DirectiveLocation!]!",
            |_, d: &Arc<DirectiveType>| Ok(list_of(d.locations.iter().map(DirectiveLocation::as_str))),
        ))
        .field(field("args", "[__InputValue!]!", |_, d: &Arc<DirectiveType>| {
            Ok(list_of(d.arguments.iter().map(Arc::clone)))
        }))
        // Included for compatibility with the introspection query in GraphQL.js
        .field(
            field("onOperation", "Boolean!", |_, d: &Arc<DirectiveType>| {
                Ok(HostValue::new(d.locations.contains(&DirectiveLocation::Query)))
            })
            .deprecated(Some("Use `locations`.")),
        )
        .field(
            field("onFragment", "Boolean!", |_, d: &Arc<DirectiveType>| {
                Ok(HostValue::new(d.locations.iter().any(|l| {
                    matches!(
                        l,
                        DirectiveLocation::FragmentDefinition
                            | DirectiveLocation::InlineFragment
                            | DirectiveLocation::FragmentSpread,
                    )
                })))
            })
            .deprecated(Some("Use `locations`.")),
        )
        .field(
            field("onField", "Boolean!", |_, d: &Arc<DirectiveType>| {
                Ok(HostValue::new(d.locations.contains(&DirectiveLocation::Field)))
            })
            .deprecated(Some("Use `locations`.")),
        )
}
