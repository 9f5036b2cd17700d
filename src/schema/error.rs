use std::fmt;

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use itertools::Itertools as _;

use crate::{ast::TypeParseError, types::base::TypeKind};

/// Breadcrumb locating a schema element while it is being built.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum PathElement {
    #[display("[scalar {_0}]")]
    Scalar(ArcStr),
    #[display("[enum {_0}]")]
    Enum(ArcStr),
    #[display("[object {_0}]")]
    Object(ArcStr),
    #[display("[interface {_0}]")]
    Interface(ArcStr),
    #[display("[union {_0}]")]
    Union(ArcStr),
    #[display("[input {_0}]")]
    InputObject(ArcStr),
    #[display("[directive {_0}]")]
    Directive(ArcStr),
    #[display("[field {_0}]")]
    Field(ArcStr),
    #[display("[arg {_0}]")]
    Argument(ArcStr),
    #[display("[value {_0}]")]
    EnumValue(ArcStr),
    #[display("[member {_0}]")]
    Member(ArcStr),
    #[display("[implements {_0}]")]
    Implements(ArcStr),
}

/// What went wrong building a schema.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum BuildErrorKind {
    /// Two types share a name.
    #[display("type \"{_0}\" is declared more than once")]
    DuplicateType(ArcStr),

    /// A referenced type was never declared.
    #[display("unknown type \"{_0}\"")]
    UnknownType(ArcStr),

    /// A user-declared name starts with `__`.
    #[display("name \"{_0}\" is reserved for introspection")]
    ReservedName(ArcStr),

    /// Two fields of a type share a name.
    #[display("field \"{_0}\" is declared more than once")]
    DuplicateField(ArcStr),

    /// Two arguments of a field or directive share a name.
    #[display("argument \"{_0}\" is declared more than once")]
    DuplicateArgument(ArcStr),

    /// Two values of an enum share a name.
    #[display("enum value \"{_0}\" is declared more than once")]
    DuplicateEnumValue(ArcStr),

    /// Two directive definitions share a name.
    #[display("directive \"@{_0}\" is declared more than once")]
    DuplicateDirective(ArcStr),

    /// A type literal failed to parse.
    #[display("invalid type literal: {_0}")]
    InvalidTypeLiteral(TypeParseError),

    /// A non-null wraps another non-null.
    #[display("type \"{_0}\" wraps a non-null into another non-null")]
    DoubleNonNull(String),

    /// An argument or input field has a type that is not inputable.
    #[display("type \"{ty}\" cannot be used as input, {kind} is not an input kind")]
    NotInputType {
        /// Type as declared.
        ty: String,
        /// Kind of the innermost type.
        kind: TypeKind,
    },

    /// A field returns an input object.
    #[display("type \"{_0}\" cannot be used as output")]
    NotOutputType(String),

    /// An object claims to implement something that is not an interface.
    #[display("\"{_0}\" is not an interface")]
    NotAnInterface(ArcStr),

    /// A union member is not an object type.
    #[display("union member \"{_0}\" is not an object type")]
    UnionMemberNotObject(ArcStr),

    /// No query type was designated.
    #[display("no query type designated")]
    MissingQueryType,

    /// The designated query type is not an object type.
    #[display("query type \"{_0}\" is not an object type")]
    QueryTypeNotObject(ArcStr),
}

/// Error building a schema, located by the path of the element it concerns.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct BuildError {
    /// Breadcrumbs to the offending element, outermost first.
    pub path: Vec<PathElement>,
    /// What went wrong.
    pub kind: BuildErrorKind,
}

impl BuildError {
    pub(crate) fn new(path: Vec<PathElement>, kind: BuildErrorKind) -> Self {
        Self { path, kind }
    }

    /// Renders the path, e.g. `[object Foo].[field bar].[arg baz]`.
    pub fn path_string(&self) -> String {
        self.path.iter().join(".")
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path_string(), self.kind)
        }
    }
}

/// Every error a build ran into.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct BuildErrors(#[error(not(source))] pub Vec<BuildError>);

impl BuildErrors {
    /// Iterates over the individual errors.
    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.0.iter()
    }

    /// Checks whether any error is of the given kind.
    pub fn has_kind(&self, kind: &BuildErrorKind) -> bool {
        self.0.iter().any(|e| &e.kind == kind)
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

impl IntoIterator for BuildErrors {
    type Item = BuildError;
    type IntoIter = std::vec::IntoIter<BuildError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildError, BuildErrorKind, BuildErrors, PathElement};

    #[test]
    fn displays_path_qualified_errors() {
        let err = BuildError::new(
            vec![
                PathElement::Object("Foo".into()),
                PathElement::Field("bar".into()),
                PathElement::Argument("baz".into()),
            ],
            BuildErrorKind::UnknownType("Bar".into()),
        );

        assert_eq!(
            err.to_string(),
            r#"[object Foo].[field bar].[arg baz]: unknown type "Bar""#,
        );
    }

    #[test]
    fn displays_pathless_errors() {
        let errs = BuildErrors(vec![
            BuildError::new(vec![], BuildErrorKind::MissingQueryType),
            BuildError::new(vec![], BuildErrorKind::DuplicateType("A".into())),
        ]);

        assert_eq!(
            errs.to_string(),
            "no query type designated\ntype \"A\" is declared more than once",
        );
        assert!(errs.has_kind(&BuildErrorKind::MissingQueryType));
    }
}
