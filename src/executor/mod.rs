//! Contract between the schema and the engine executing queries against it.

pub(crate) mod look_ahead;

use std::{any::Any, fmt, future::Future, sync::Arc};

use arcstr::ArcStr;
use futures::future::BoxFuture;
use indexmap::IndexMap;

use crate::{
    ast::Selection,
    schema::{
        meta::{Argument, Field, MetaType},
        model::SchemaType,
    },
    value::{HostValue, LiteralValue},
};

pub use self::look_ahead::ChildField;

/// Per-request value handed to every resolver, encoder and decoder.
///
/// Resolvers downcast it to whatever the application put in.
pub type Context = dyn Any + Send + Sync;

/// Error type for errors that occur during field resolution, and during
/// encoding or decoding of values.
///
/// Field errors are represented by a human-readable error message and an
/// optional [`LiteralValue`] structure containing additional information.
///
/// They can be converted to from any type that implements
/// [`Display`](fmt::Display), which makes error chaining with the `?`
/// operator a breeze:
///
/// ```rust
/// # use gql_schema::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: LiteralValue,
}

impl<T: fmt::Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: LiteralValue::Null,
        }
    }
}

impl FieldError {
    /// Construct a new [`FieldError`] with additional data.
    ///
    /// You can use the [`literal!`](crate::literal) macro to construct an
    /// error:
    ///
    /// ```rust
    /// use gql_schema::{literal, FieldError};
    ///
    /// # fn sample() {
    /// # let _: FieldError =
    /// FieldError::new(
    ///     "Could not open connection to the database",
    ///     literal!({"internal_error": "Connection refused"}),
    /// );
    /// # }
    /// # fn main() { }
    /// ```
    ///
    /// If the argument is [`LiteralValue::Null`], no extra data will be
    /// included.
    pub fn new<T: fmt::Display>(e: T, extensions: LiteralValue) -> Self {
        Self {
            message: e.to_string(),
            extensions,
        }
    }

    /// Returns the `"message"` field of this [`FieldError`].
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"extensions"` field of this [`FieldError`].
    ///
    /// If there is no `"extensions"`, then [`LiteralValue::Null`] will be
    /// returned.
    #[must_use]
    pub fn extensions(&self) -> &LiteralValue {
        &self.extensions
    }
}

/// The result of resolving, encoding or decoding a value of type `T`.
pub type FieldResult<T> = Result<T, FieldError>;

/// Outcome of invoking a [`Resolver`].
pub enum Resolved {
    /// Value available right away.
    Value(HostValue),

    /// Value to be awaited by the engine.
    Deferred(BoxFuture<'static, FieldResult<HostValue>>),
}

impl Resolved {
    /// Wraps a future into a [`Resolved::Deferred`].
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = FieldResult<HostValue>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// Indicates whether awaiting is required to obtain the value.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Waits for the resolved value.
    ///
    /// # Errors
    ///
    /// Whatever error the deferred computation completes with.
    pub async fn into_value(self) -> FieldResult<HostValue> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Deferred(f) => f.await,
        }
    }
}

impl From<HostValue> for Resolved {
    fn from(v: HostValue) -> Self {
        Self::Value(v)
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

type ResolveFn =
    dyn Fn(&ResolverContext<'_>, &HostValue) -> FieldResult<Resolved> + Send + Sync;

/// Function computing a field's value from its parent value.
///
/// All three supported shapes ([`Resolver::simple`],
/// [`Resolver::with_context`] and [`Resolver::full`]) are normalized into the
/// single `(ResolverContext, parent) -> Resolved` contract.
#[derive(Clone)]
pub struct Resolver {
    func: Arc<ResolveFn>,
    safe: bool,
}

impl Resolver {
    /// Creates a [`Resolver`] looking only at the parent value.
    pub fn simple<F, R>(f: F) -> Self
    where
        F: Fn(&HostValue) -> FieldResult<R> + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        Self::full(move |_: &ResolverContext<'_>, v: &HostValue| f(v))
    }

    /// Creates a [`Resolver`] receiving the per-request [`Context`] as well.
    pub fn with_context<F, R>(f: F) -> Self
    where
        F: Fn(&Context, &HostValue) -> FieldResult<R> + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        Self::full(move |ctx: &ResolverContext<'_>, v: &HostValue| f(ctx.context(), v))
    }

    /// Creates a [`Resolver`] with access to arguments and the
    /// sub-selection through a [`ResolverContext`].
    pub fn full<F, R>(f: F) -> Self
    where
        F: Fn(&ResolverContext<'_>, &HostValue) -> FieldResult<R> + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        Self {
            func: Arc::new(move |ctx: &ResolverContext<'_>, v: &HostValue| {
                f(ctx, v).map(Into::into)
            }),
            safe: false,
        }
    }

    /// Marks this [`Resolver`] as never panicking, so an engine may skip
    /// panic recovery around it.
    #[must_use]
    pub fn safe(mut self) -> Self {
        self.safe = true;
        self
    }

    /// Indicates whether this [`Resolver`] is marked as never panicking.
    pub fn is_safe(&self) -> bool {
        self.safe
    }

    /// Invokes this [`Resolver`].
    ///
    /// # Errors
    ///
    /// Errors of the underlying function are returned verbatim.
    pub fn resolve(&self, ctx: &ResolverContext<'_>, parent: &HostValue) -> FieldResult<Resolved> {
        (self.func)(ctx, parent)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("safe", &self.safe)
            .finish_non_exhaustive()
    }
}

/// Everything a [`Resolver::full`] function may look at.
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    schema: &'a SchemaType,
    parent_type: &'a MetaType,
    field: &'a Field,
    arguments: &'a IndexMap<String, LiteralValue>,
    selection_set: &'a [Selection],
    context: &'a Context,
}

impl<'a> ResolverContext<'a> {
    /// Creates a new [`ResolverContext`].
    ///
    /// `arguments` are the literal argument values of the field as requested,
    /// with variables already substituted.
    pub fn new(
        schema: &'a SchemaType,
        parent_type: &'a MetaType,
        field: &'a Field,
        arguments: &'a IndexMap<String, LiteralValue>,
        selection_set: &'a [Selection],
        context: &'a Context,
    ) -> Self {
        Self {
            schema,
            parent_type,
            field,
            arguments,
            selection_set,
            context,
        }
    }

    /// Returns the schema being executed against.
    pub fn schema(&self) -> &'a SchemaType {
        self.schema
    }

    /// Returns the per-request context.
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Returns the type owning the field being resolved.
    pub fn parent_type(&self) -> &'a MetaType {
        self.parent_type
    }

    /// Returns the field being resolved.
    pub fn field(&self) -> &'a Field {
        self.field
    }

    /// Returns the sub-selection requested on the field being resolved.
    pub fn selection_set(&self) -> &'a [Selection] {
        self.selection_set
    }

    fn argument(&self, name: &str) -> FieldResult<&'a Argument> {
        self.field.argument_by_name(name).ok_or_else(|| {
            format!("Unknown argument \"{name}\" on field \"{}\"", self.field.name).into()
        })
    }

    fn raw_value(&self, arg: &Argument) -> FieldResult<LiteralValue> {
        Ok(match self.arguments.get(arg.name.as_str()) {
            Some(v) => v.clone(),
            None => match &arg.default_value {
                Some(default) => LiteralValue::from_ast(default)?,
                None => LiteralValue::Null,
            },
        })
    }

    /// Returns the decoded value of the named argument.
    ///
    /// Absent arguments take their declared default, or null without one.
    ///
    /// # Errors
    ///
    /// If the field declares no such argument, or decoding fails.
    pub fn get_argument_value(&self, name: &str) -> FieldResult<HostValue> {
        let arg = self.argument(name)?;
        arg.decode(self.schema, self.context, &self.raw_value(arg)?)
    }

    /// Returns the literal value of the named argument, before decoding.
    ///
    /// Absent arguments take their declared default, or null without one.
    ///
    /// # Errors
    ///
    /// If the field declares no such argument.
    pub fn get_raw_argument_value(&self, name: &str) -> FieldResult<LiteralValue> {
        self.raw_value(self.argument(name)?)
    }

    /// Decodes every declared argument, in declaration order.
    ///
    /// # Errors
    ///
    /// On the first argument failing to decode.
    pub fn get_argument_values(&self) -> FieldResult<IndexMap<ArcStr, HostValue>> {
        self.field
            .arguments
            .iter()
            .map(|arg| {
                let value = arg.decode(self.schema, self.context, &self.raw_value(arg)?)?;
                Ok((arg.name.clone(), value))
            })
            .collect()
    }

    /// Calls `f` with every field of the sub-selection.
    ///
    /// Fields are enumerated once per possible concrete object type of the
    /// field's return type, honoring inline fragment type conditions.
    pub fn walk_child_selections<F: FnMut(ChildField<'a>)>(&self, mut f: F) {
        let parent = self.schema.meta(self.field.field_type.innermost());
        look_ahead::walk(self.schema, parent, self.selection_set, &mut f);
    }

    /// Returns every field of the sub-selection, see
    /// [`ResolverContext::walk_child_selections`].
    pub fn child_fields(&self) -> impl Iterator<Item = ChildField<'a>> + use<'a> {
        let mut fields = Vec::new();
        self.walk_child_selections(|f| fields.push(f));
        fields.into_iter()
    }
}

impl fmt::Debug for ResolverContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("parent_type", self.parent_type.name())
            .field("field", &self.field.name)
            .field("arguments", self.arguments)
            .finish_non_exhaustive()
    }
}
