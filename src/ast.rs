//! Syntax-level building blocks.
//!
//! Parsed values and type literals come straight from `graphql-parser`; this
//! module adds the few owned shapes the schema needs on top of them: applied
//! directives and a fragment-free selection tree.

use std::{collections::BTreeMap, fmt};

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;
use graphql_parser::query as q;

pub use graphql_parser::query::{Number, Text};

/// A parsed, constant GraphQL value, e.g. a default value or a directive
/// argument.
///
/// Enum literals and strings stay distinct here, so that printing a default
/// value reproduces what was written.
pub type InputValue = q::Value<'static, String>;

/// A type literal in the syntax tree.
///
/// This carries no semantic information and might refer to types that do not
/// exist.
pub type Type = q::Type<'static, String>;

/// Builds a named type literal, e.g. `String`.
pub fn named(name: impl Into<String>) -> Type {
    Type::NamedType(name.into())
}

/// Wraps a type literal into a list, e.g. `[String]`.
pub fn list(of: Type) -> Type {
    Type::ListType(Box::new(of))
}

/// Wraps a type literal into a non-null, e.g. `String!`.
pub fn non_null(of: Type) -> Type {
    Type::NonNullType(Box::new(of))
}

/// Returns the name found after unpacking all lists and non-nulls.
pub fn innermost_name(ty: &Type) -> &str {
    match ty {
        Type::NamedType(n) => n,
        Type::ListType(inner) | Type::NonNullType(inner) => innermost_name(inner),
    }
}

/// Error of parsing a type literal with [`parse_type`].
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum TypeParseError {
    /// A type name was expected but something else was found.
    #[display("Expected a type name at \"{_0}\"")]
    ExpectedName(#[error(not(source))] String),

    /// A `[` was never closed.
    #[display("Unclosed list type")]
    UnclosedList,

    /// Input remained after a complete type literal.
    #[display("Unexpected \"{_0}\" after type")]
    TrailingInput(#[error(not(source))] String),
}

/// Parses a type literal such as `[Episode!]!`.
pub fn parse_type(source: &str) -> Result<Type, TypeParseError> {
    let (ty, rest) = parse_type_prefix(source)?;
    let rest = rest.trim();
    if !rest.is_empty() {
        return Err(TypeParseError::TrailingInput(rest.into()));
    }
    Ok(ty)
}

fn parse_type_prefix(source: &str) -> Result<(Type, &str), TypeParseError> {
    let source = source.trim_start();
    let (ty, rest) = if let Some(inner) = source.strip_prefix('[') {
        let (of, rest) = parse_type_prefix(inner)?;
        let rest = rest
            .trim_start()
            .strip_prefix(']')
            .ok_or(TypeParseError::UnclosedList)?;
        (list(of), rest)
    } else {
        let end = source
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(source.len());
        if end == 0 {
            return Err(TypeParseError::ExpectedName(source.into()));
        }
        (named(&source[..end]), &source[end..])
    };
    let rest = rest.trim_start();
    Ok(match rest.strip_prefix('!') {
        Some(rest) => (non_null(ty), rest),
        None => (ty, rest),
    })
}

/// Anything usable as the declared type of a field or argument.
///
/// Strings are parsed with [`parse_type`]; a malformed literal surfaces as a
/// build error of the element it was declared on.
pub trait IntoTypeLiteral {
    /// Performs the conversion.
    fn into_type_literal(self) -> Result<Type, TypeParseError>;
}

impl IntoTypeLiteral for Type {
    fn into_type_literal(self) -> Result<Type, TypeParseError> {
        Ok(self)
    }
}

impl IntoTypeLiteral for &str {
    fn into_type_literal(self) -> Result<Type, TypeParseError> {
        parse_type(self)
    }
}

impl IntoTypeLiteral for String {
    fn into_type_literal(self) -> Result<Type, TypeParseError> {
        parse_type(&self)
    }
}

/// Writes a value in GraphQL syntax, e.g. `{first: 2, tags: ["a"]}`.
///
/// Object fields are written in key order.
pub fn write_value(f: &mut impl fmt::Write, value: &InputValue) -> fmt::Result {
    match value {
        InputValue::Variable(v) => write!(f, "${v}"),
        InputValue::Int(n) => match n.as_i64() {
            Some(i) => write!(f, "{i}"),
            None => f.write_str("0"),
        },
        InputValue::Float(n) => write!(f, "{n:?}"),
        InputValue::String(s) => {
            f.write_str(&serde_json::to_string(s).map_err(|_| fmt::Error)?)
        }
        InputValue::Boolean(b) => write!(f, "{b}"),
        InputValue::Null => f.write_str("null"),
        InputValue::Enum(e) => f.write_str(e),
        InputValue::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            f.write_str("]")
        }
        InputValue::Object(fields) => {
            f.write_str("{")?;
            for (i, (name, item)) in fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: ")?;
                write_value(f, item)?;
            }
            f.write_str("}")
        }
    }
}

/// Renders a value in GraphQL syntax, see [`write_value`].
pub fn print_value(value: &InputValue) -> String {
    let mut out = String::new();
    // Writing into a `String` only fails on unserializable strings.
    if write_value(&mut out, value).is_err() {
        out.clear();
    }
    out
}

/// Renders a type literal, e.g. `[Episode!]!`.
pub fn print_type(ty: &Type) -> String {
    match ty {
        Type::NamedType(n) => n.clone(),
        Type::ListType(inner) => format!("[{}]", print_type(inner)),
        Type::NonNullType(inner) => format!("{}!", print_type(inner)),
    }
}

/// A directive applied to a schema element, e.g.
/// `@deprecated(reason: "use v2")`.
///
/// Arguments keep their declaration order and their syntax-level values.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    /// Name of the directive, without the `@`.
    pub name: ArcStr,
    /// Ordered named arguments.
    pub arguments: Vec<(ArcStr, InputValue)>,
}

impl Directive {
    /// Creates a new [`Directive`] without arguments.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Appends an argument to this [`Directive`].
    #[must_use]
    pub fn argument(mut self, name: impl Into<ArcStr>, value: InputValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    /// Looks up an argument value by name.
    pub fn argument_value(&self, name: &str) -> Option<&InputValue> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (i, (name, value)) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: ")?;
                write_value(f, value)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Entry in a selection set, with fragment spreads already expanded.
///
/// ```text
/// {
///   field(withArg: 123) { subField }
///   ...on User {
///     inlineFragmentField
///   }
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum Selection {
    Field(SelectedField),
    InlineFragment(InlineFragment),
}

/// A field requested in a selection set.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedField {
    /// Alias the field is requested under, if any.
    pub alias: Option<String>,
    /// Name of the field on its parent type.
    pub name: String,
    /// Arguments as written in the query, variables included.
    pub arguments: Vec<(String, InputValue)>,
    /// Directives applied to the field in the query.
    pub directives: Vec<Directive>,
    /// Sub-selection of the field, empty for leaves.
    pub selection_set: Vec<Selection>,
}

impl SelectedField {
    /// Returns the key this field is reported under in a response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A group of selections applying only to a certain type.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    /// Type the fragment applies to. [`None`] applies to every type.
    pub type_condition: Option<String>,
    /// Selections of the fragment.
    pub selection_set: Vec<Selection>,
}

/// Extracts the selection set of a query operation from a parsed document.
///
/// Picks the operation named `operation_name`, or the first query operation
/// when [`None`] is given. Fragment spreads are inlined, preserving their type
/// condition. Mutations and subscriptions are never picked.
pub fn query_selections<'a, T: Text<'a>>(
    document: &q::Document<'a, T>,
    operation_name: Option<&str>,
) -> Option<Vec<Selection>> {
    let mut fragments = FnvHashMap::default();
    let mut operation = None;
    for definition in &document.definitions {
        match definition {
            q::Definition::Fragment(f) => {
                fragments.insert(f.name.as_ref(), f);
            }
            q::Definition::Operation(q::OperationDefinition::SelectionSet(set))
                if operation_name.is_none() && operation.is_none() =>
            {
                operation = Some(set);
            }
            q::Definition::Operation(q::OperationDefinition::Query(query))
                if operation.is_none()
                    && (operation_name.is_none()
                        || query.name.as_ref().map(AsRef::as_ref) == operation_name) =>
            {
                operation = Some(&query.selection_set);
            }
            q::Definition::Operation(_) => {}
        }
    }
    operation.map(|set| convert_selection_set(set, &fragments, &mut Vec::new()))
}

fn convert_selection_set<'a, 'd, T: Text<'a>>(
    set: &'d q::SelectionSet<'a, T>,
    fragments: &FnvHashMap<&'d str, &'d q::FragmentDefinition<'a, T>>,
    visiting: &mut Vec<&'d str>,
) -> Vec<Selection> {
    set.items
        .iter()
        .filter_map(|item| match item {
            q::Selection::Field(f) => Some(Selection::Field(SelectedField {
                alias: f.alias.as_ref().map(|a| a.as_ref().to_owned()),
                name: f.name.as_ref().to_owned(),
                arguments: f
                    .arguments
                    .iter()
                    .map(|(n, v)| (n.as_ref().to_owned(), to_owned_value(v)))
                    .collect(),
                directives: f.directives.iter().map(to_owned_directive).collect(),
                selection_set: convert_selection_set(&f.selection_set, fragments, visiting),
            })),
            q::Selection::InlineFragment(f) => Some(Selection::InlineFragment(InlineFragment {
                type_condition: f
                    .type_condition
                    .as_ref()
                    .map(|q::TypeCondition::On(t)| t.as_ref().to_owned()),
                selection_set: convert_selection_set(&f.selection_set, fragments, visiting),
            })),
            q::Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_ref();
                // Cyclic spreads are invalid queries; cut them off silently.
                if visiting.contains(&name) {
                    return None;
                }
                let fragment = fragments.get(name)?;
                visiting.push(name);
                let selection_set =
                    convert_selection_set(&fragment.selection_set, fragments, visiting);
                visiting.pop();
                let q::TypeCondition::On(on) = &fragment.type_condition;
                Some(Selection::InlineFragment(InlineFragment {
                    type_condition: Some(on.as_ref().to_owned()),
                    selection_set,
                }))
            }
        })
        .collect()
}

fn to_owned_directive<'a, T: Text<'a>>(d: &q::Directive<'a, T>) -> Directive {
    Directive {
        name: d.name.as_ref().into(),
        arguments: d
            .arguments
            .iter()
            .map(|(n, v)| (n.as_ref().into(), to_owned_value(v)))
            .collect(),
    }
}

/// Detaches a parsed value from the text it was parsed from.
pub fn to_owned_value<'a, T: Text<'a>>(value: &q::Value<'a, T>) -> InputValue {
    match value {
        q::Value::Variable(v) => InputValue::Variable(v.as_ref().to_owned()),
        q::Value::Int(n) => InputValue::Int(n.clone()),
        q::Value::Float(f) => InputValue::Float(*f),
        q::Value::String(s) => InputValue::String(s.clone()),
        q::Value::Boolean(b) => InputValue::Boolean(*b),
        q::Value::Null => InputValue::Null,
        q::Value::Enum(e) => InputValue::Enum(e.as_ref().to_owned()),
        q::Value::List(l) => InputValue::List(l.iter().map(to_owned_value).collect()),
        q::Value::Object(o) => InputValue::Object(
            o.iter()
                .map(|(k, v)| (k.as_ref().to_owned(), to_owned_value(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}
