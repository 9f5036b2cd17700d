//! Wire-level values and their host-side counterparts.

mod host;

use std::{collections::BTreeMap, fmt, ops};

use derive_more::with_trait::{Display, Error};
use graphql_parser::query::{self as q, Text};
use indexmap::IndexMap;

use crate::ast::{InputValue, Number};

pub use self::host::{HostValue, Typed};

/// Fields of a [`LiteralValue::Object`].
///
/// Equality ignores insertion order.
pub type LiteralObject = IndexMap<String, LiteralValue>;

/// Serializable value of GraphQL's wire format.
///
/// Integers and floats share a single [`LiteralValue::Number`] variant, and
/// enum literals collapse into [`LiteralValue::String`]: decoders recover the
/// distinction from the target type.
#[derive(Clone, Debug, Default, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum LiteralValue {
    #[default]
    Null,
    String(String),
    Number(f64),
    Boolean(bool),
    Object(LiteralObject),
    List(Vec<LiteralValue>),
}

/// Error of converting a parsed value into a [`LiteralValue`].
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum FromAstError {
    /// Variables must be substituted before conversion.
    #[display("Unsubstituted variable `${_0}`")]
    Variable(#[error(not(source))] String),

    /// Integer literal does not fit into a number.
    #[display("Integer literal out of range")]
    IntOutOfRange,
}

impl LiteralValue {
    /// Constructs a null value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Constructs an object value from its fields.
    pub fn object(o: LiteralObject) -> Self {
        Self::Object(o)
    }

    /// Constructs a list value.
    pub fn list(l: Vec<Self>) -> Self {
        Self::List(l)
    }

    /// Does this value represent null?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// View the underlying string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// View the underlying number value, if present.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// View the underlying boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// View the underlying object value, if present.
    pub fn as_object(&self) -> Option<&LiteralObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// View the underlying list value, if present.
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Converts a parsed value into a [`LiteralValue`].
    ///
    /// # Errors
    ///
    /// If the value still contains a variable reference.
    pub fn from_ast<'a, T: Text<'a>>(value: &q::Value<'a, T>) -> Result<Self, FromAstError> {
        Ok(match value {
            q::Value::Variable(v) => return Err(FromAstError::Variable(v.as_ref().into())),
            q::Value::Null => Self::Null,
            q::Value::Int(n) => {
                Self::Number(n.as_i64().ok_or(FromAstError::IntOutOfRange)? as f64)
            }
            q::Value::Float(f) => Self::Number(*f),
            q::Value::String(s) => Self::String(s.clone()),
            q::Value::Enum(e) => Self::String(e.as_ref().into()),
            q::Value::Boolean(b) => Self::Boolean(*b),
            q::Value::List(l) => Self::List(l.iter().map(Self::from_ast).collect::<Result<_, _>>()?),
            q::Value::Object(o) => Self::Object(
                o.iter()
                    .map(|(k, v)| Ok((k.as_ref().to_owned(), Self::from_ast(v)?)))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// Converts this value back into the syntax tree.
    ///
    /// Numbers with no fractional part that fit into 32 bits become integer
    /// literals, all others become float literals.
    pub fn to_ast(&self) -> InputValue {
        match self {
            Self::Null => InputValue::Null,
            Self::String(s) => InputValue::String(s.clone()),
            Self::Number(n) => match as_i32(*n) {
                Some(i) => InputValue::Int(Number::from(i)),
                None => InputValue::Float(*n),
            },
            Self::Boolean(b) => InputValue::Boolean(*b),
            Self::List(l) => InputValue::List(l.iter().map(Self::to_ast).collect()),
            Self::Object(o) => InputValue::Object(
                o.iter()
                    .map(|(k, v)| (k.clone(), v.to_ast()))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}

/// Narrows a number to [`i32`] if it is integral and in range.
pub(crate) fn as_i32(n: f64) -> Option<i32> {
    (n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX)).then_some(n as i32)
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(l) => {
                f.write_str("[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Self::Object(o) => {
                f.write_str("{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for LiteralValue {
    fn from(i: i32) -> Self {
        Self::Number(i.into())
    }
}

impl From<f64> for LiteralValue {
    fn from(f: f64) -> Self {
        Self::Number(f)
    }
}

impl<T: Into<Self>> From<Option<T>> for LiteralValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for LiteralValue {
    fn from(l: Vec<T>) -> Self {
        Self::List(l.into_iter().map(Into::into).collect())
    }
}

impl From<LiteralObject> for LiteralValue {
    fn from(o: LiteralObject) -> Self {
        Self::Object(o)
    }
}

static NULL: LiteralValue = LiteralValue::Null;

/// Looks up an object field. Non-objects and missing fields give null.
impl ops::Index<&str> for LiteralValue {
    type Output = Self;

    fn index(&self, key: &str) -> &Self {
        self.as_object().and_then(|o| o.get(key)).unwrap_or(&NULL)
    }
}

/// Looks up a list element. Non-lists and out of bounds indices give null.
impl ops::Index<usize> for LiteralValue {
    type Output = Self;

    fn index(&self, index: usize) -> &Self {
        self.as_list().and_then(|l| l.get(index)).unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use graphql_parser::parse_query;

    use crate::{
        ast::{InputValue, print_value},
        literal,
    };

    use super::{FromAstError, LiteralValue};

    fn parse_value(s: &str) -> InputValue {
        let q = format!("{{ f(v: {s}) }}");
        let doc = parse_query::<&str>(&q).unwrap();
        let selections = crate::ast::query_selections(&doc, None).unwrap();
        match &selections[0] {
            crate::ast::Selection::Field(f) => f.arguments[0].1.clone(),
            s => panic!("unexpected selection {s:?}"),
        }
    }

    #[test]
    fn converts_scalars_from_ast() {
        assert_eq!(LiteralValue::from_ast(&parse_value("null")), Ok(literal!(null)));
        assert_eq!(LiteralValue::from_ast(&parse_value("12")), Ok(literal!(12)));
        assert_eq!(LiteralValue::from_ast(&parse_value("1.5")), Ok(literal!(1.5)));
        assert_eq!(LiteralValue::from_ast(&parse_value("\"x\"")), Ok(literal!("x")));
        assert_eq!(LiteralValue::from_ast(&parse_value("RED")), Ok(literal!("RED")));
        assert_eq!(LiteralValue::from_ast(&parse_value("true")), Ok(literal!(true)));
    }

    #[test]
    fn converts_composites_from_ast() {
        assert_eq!(
            LiteralValue::from_ast(&parse_value(r#"{b: [1, 2.5], a: {c: "d"}}"#)),
            Ok(literal!({"a": {"c": "d"}, "b": [1, 2.5]})),
        );
    }

    #[test]
    fn rejects_variables() {
        assert_eq!(
            LiteralValue::from_ast(&parse_value("$v")),
            Err(FromAstError::Variable("v".into())),
        );
    }

    #[test]
    fn object_equality_ignores_order() {
        assert_eq!(literal!({"a": 1, "b": 2}), literal!({"b": 2, "a": 1}));
        assert_ne!(literal!({"a": 1}), literal!({"a": 1, "b": 2}));
    }

    #[test]
    fn round_trips_through_ast() {
        for src in [
            "null",
            "7",
            "-3.25",
            "3000000000",
            r#""str""#,
            "ENUM_VALUE",
            "false",
            r#"[1, "a", [true, null]]"#,
            r#"{x: {y: [1.5, Z]}, w: 0}"#,
        ] {
            let lit = LiteralValue::from_ast(&parse_value(src)).unwrap();
            assert_eq!(LiteralValue::from_ast(&lit.to_ast()), Ok(lit), "source: {src}");
        }
    }

    #[test]
    fn prints_integral_numbers_as_ints() {
        assert_eq!(print_value(&literal!(3).to_ast()), "3");
        assert_eq!(print_value(&literal!(2.5).to_ast()), "2.5");
    }

    #[test]
    fn displays_json_like() {
        assert_eq!(
            literal!({"a": [1, null, "x"], "b": true}).to_string(),
            r#"{"a": [1, null, "x"], "b": true}"#,
        );
    }
}
