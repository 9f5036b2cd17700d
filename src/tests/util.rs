//! Miniature query runner standing in for an execution engine.
//!
//! Supports a single query operation without variables. The first field
//! error aborts the whole run.

use futures::future::{FutureExt as _, LocalBoxFuture};
use graphql_parser::parse_query;
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::{
    Context, FieldError, FieldResult, HostValue, LiteralObject, LiteralValue, ResolverContext,
    SchemaType, TypeRef,
    ast::{self, Selection},
    executor::look_ahead::collect_fields,
    schema::meta::MetaType,
};

/// Runs `query` against `schema`, resolving from a null root value.
pub async fn execute(schema: &SchemaType, query: &str, ctx: &Context) -> FieldResult<LiteralValue> {
    let document = parse_query::<&str>(query)?;
    let selections =
        ast::query_selections(&document, None).ok_or("Document holds no query operation")?;
    resolve_object(
        schema,
        schema.concrete_query_type(),
        HostValue::null(),
        &selections,
        ctx,
    )
    .await
}

fn resolve_object<'a>(
    schema: &'a SchemaType,
    parent: &'a MetaType,
    value: HostValue,
    selections: &'a [Selection],
    ctx: &'a Context,
) -> LocalBoxFuture<'a, FieldResult<LiteralValue>> {
    async move {
        let MetaType::Object(object) = parent else {
            return Err(format!("Type \"{}\" is not an object", parent.name()).into());
        };
        let mut requested = Vec::new();
        collect_fields(schema, object, selections, &mut |f| requested.push(f));

        let mut result = LiteralObject::new();
        for selection in requested {
            let field = object.field_by_name(&selection.name).ok_or_else(|| {
                format!(
                    "Unknown field \"{}\" on type \"{}\"",
                    selection.name, object.name,
                )
            })?;
            let arguments = selection
                .arguments
                .iter()
                .map(|(name, v)| Ok((name.clone(), LiteralValue::from_ast(v)?)))
                .collect::<FieldResult<IndexMap<_, _>>>()?;
            let resolver_ctx = ResolverContext::new(
                schema,
                parent,
                field,
                &arguments,
                &selection.selection_set,
                ctx,
            );
            let resolved = field
                .resolver
                .resolve(&resolver_ctx, &value)?
                .into_value()
                .await?;
            let completed = complete(
                schema,
                &field.field_type,
                resolved,
                &selection.selection_set,
                ctx,
            )
            .await?;
            result.insert(selection.response_key().to_owned(), completed);
        }
        Ok::<_, FieldError>(LiteralValue::Object(result))
    }
    .boxed_local()
}

fn complete<'a>(
    schema: &'a SchemaType,
    ty: &'a TypeRef,
    value: HostValue,
    selections: &'a [Selection],
    ctx: &'a Context,
) -> LocalBoxFuture<'a, FieldResult<LiteralValue>> {
    async move {
        match ty {
            TypeRef::NonNull(inner) => {
                let completed = complete(schema, inner, value, selections, ctx).await?;
                if completed.is_null() {
                    return Err(format!(
                        "Cannot return null for non-nullable type {}",
                        schema.make_type(ty),
                    )
                    .into());
                }
                Ok(completed)
            }
            _ if value.is_null() => Ok(LiteralValue::Null),
            TypeRef::List(inner) => {
                let items = value.as_list().ok_or("Expected a list host value")?;
                let mut completed = Vec::with_capacity(items.len());
                for item in items {
                    completed.push(complete(schema, inner, item.clone(), selections, ctx).await?);
                }
                Ok(LiteralValue::List(completed))
            }
            TypeRef::Named(id) => match schema.meta(*id) {
                MetaType::Scalar(s) => s.encode(ctx, &value),
                MetaType::Enum(e) => e.encode(ctx, &value),
                object @ MetaType::Object(_) => {
                    resolve_object(schema, object, value, selections, ctx).await
                }
                MetaType::Interface(i) => {
                    let (value, name) = i.unwrap(ctx, &value)?;
                    resolve_concrete(schema, &name, value, selections, ctx).await
                }
                MetaType::Union(u) => {
                    let (value, name) = u.unwrap(ctx, &value)?;
                    resolve_concrete(schema, &name, value, selections, ctx).await
                }
                t => Err(format!("Type \"{}\" cannot be output", t.name()).into()),
            },
        }
    }
    .boxed_local()
}

async fn resolve_concrete(
    schema: &SchemaType,
    name: &str,
    value: HostValue,
    selections: &[Selection],
    ctx: &Context,
) -> FieldResult<LiteralValue> {
    let object = schema
        .concrete_type_by_name(name)
        .ok_or_else(|| format!("Unknown concrete type \"{name}\""))?;
    resolve_object(schema, object, value, selections, ctx).await
}

/// Resolves a type literal such as `[Int!]` against `schema`.
pub fn type_ref(schema: &SchemaType, literal: &str) -> TypeRef {
    fn convert(schema: &SchemaType, ty: &ast::Type) -> TypeRef {
        match ty {
            ast::Type::NamedType(name) => TypeRef::Named(
                schema
                    .type_id(name)
                    .unwrap_or_else(|| panic!("no type `{name}` in schema")),
            ),
            ast::Type::ListType(inner) => TypeRef::List(Box::new(convert(schema, inner))),
            ast::Type::NonNullType(inner) => TypeRef::NonNull(Box::new(convert(schema, inner))),
        }
    }

    convert(schema, &ast::parse_type(literal).expect("valid type literal"))
}

/// Renders host values of the built-in scalars and lists of them, for
/// comparison.
pub fn render(v: &HostValue) -> String {
    if v.is_null() {
        "null".into()
    } else if let Some(items) = v.as_list() {
        format!("[{}]", items.iter().map(render).join(", "))
    } else if let Some(i) = v.downcast_ref::<i32>() {
        i.to_string()
    } else if let Some(f) = v.downcast_ref::<f64>() {
        format!("{f:?}")
    } else if let Some(b) = v.downcast_ref::<bool>() {
        b.to_string()
    } else if let Some(s) = v.downcast_ref::<String>() {
        format!("{s:?}")
    } else {
        panic!("cannot render {v:?}")
    }
}
