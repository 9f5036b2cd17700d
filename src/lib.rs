#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[doc(hidden)]
#[macro_use]
pub mod macros;
pub mod ast;
pub mod executor;
pub mod integrations;
mod introspection;
pub mod schema;
mod types;
mod value;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use futures::future::BoxFuture;

pub use crate::{
    ast::{Directive, InputValue, Type},
    executor::{
        ChildField, Context, FieldError, FieldResult, Resolved, Resolver, ResolverContext,
    },
    introspection::{
        INTROSPECTION_QUERY, INTROSPECTION_QUERY_WITHOUT_DESCRIPTIONS, IntrospectionFormat,
        SchemaRoot,
    },
    schema::{
        builder::{
            ArgumentBuilder, DirectiveBuilder, EnumBuilder, EnumValueBuilder, FieldBuilder,
            InputObjectBuilder, InterfaceBuilder, ObjectBuilder, ScalarBuilder, SchemaBuilder,
            TypeBuilder, UnionBuilder,
        },
        error::{BuildError, BuildErrorKind, BuildErrors, PathElement},
        meta,
        model::{DirectiveLocation, DirectiveType, SchemaType, TypeId, TypeRef, TypeType},
    },
    types::{base::TypeKind, input::InputObjectContext},
    value::{FromAstError, HostValue, LiteralObject, LiteralValue, Typed},
};

static_assertions::assert_impl_all!(SchemaType: Send, Sync);
static_assertions::assert_impl_all!(HostValue: Send, Sync);
static_assertions::assert_impl_all!(SchemaBuilder: Send, Sync);
