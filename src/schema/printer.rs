//! Canonical schema definition language output.

use std::{fmt, io, sync::Arc};

use itertools::Itertools as _;

use crate::{
    ast::{self, Directive},
    schema::{
        meta::{
            Argument, EnumMeta, Field, InputObjectMeta, InterfaceMeta, MetaType, ObjectMeta,
            ScalarMeta, UnionMeta,
        },
        model::{DirectiveType, SchemaType, TypeRef},
    },
};

impl SchemaType {
    /// Writes the definition of this schema in the GraphQL schema language.
    ///
    /// Output is deterministic: directives and types are sorted by name,
    /// and so are the fields, values and members within each type.
    /// Arguments keep their declaration order. Built-in scalars, built-in
    /// directives and the introspection types are left out.
    ///
    /// # Errors
    ///
    /// The first error `w` reports.
    pub fn write_definition<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{}", Sdl(self))
    }

    /// Returns the definition of this schema in the GraphQL schema language,
    /// see [`SchemaType::write_definition`].
    #[must_use]
    pub fn as_sdl(&self) -> String {
        Sdl(self).to_string()
    }
}

struct Sdl<'a>(&'a SchemaType);

impl fmt::Display for Sdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;

        write_description(f, schema.description.as_deref(), "")?;
        write!(
            f,
            "schema {{\n  query: {}\n}}",
            schema.concrete_query_type().name(),
        )?;

        for d in schema
            .directives
            .values()
            .filter(|d| !d.is_builtin())
            .sorted_by(|a, b| a.name.cmp(&b.name))
        {
            f.write_str("\n\n")?;
            write_directive_definition(f, schema, d)?;
        }

        for t in schema
            .types
            .values()
            .filter(|t| !t.is_builtin() && !t.is_introspection())
            .sorted_by(|a, b| a.name().cmp(b.name()))
        {
            f.write_str("\n\n")?;
            write_description(f, t.description().map(|d| d.as_str()), "")?;
            match t {
                MetaType::Scalar(s) => write_scalar(f, s)?,
                MetaType::Enum(e) => write_enum(f, e)?,
                MetaType::Object(o) => write_object(f, schema, o)?,
                MetaType::Interface(i) => write_interface(f, schema, i)?,
                MetaType::Union(u) => write_union(f, schema, u)?,
                MetaType::InputObject(io) => write_input_object(f, schema, io)?,
                MetaType::Placeholder(_) => {}
            }
        }
        Ok(())
    }
}

fn write_description(f: &mut fmt::Formatter<'_>, d: Option<&str>, indent: &str) -> fmt::Result {
    match d {
        Some(d) => writeln!(f, "{indent}{}", quote(d)?),
        None => Ok(()),
    }
}

fn quote(s: &str) -> Result<String, fmt::Error> {
    serde_json::to_string(s).map_err(|_| fmt::Error)
}

fn write_directives(f: &mut fmt::Formatter<'_>, directives: &[Directive]) -> fmt::Result {
    directives.iter().try_for_each(|d| write!(f, " {d}"))
}

fn type_signature(schema: &SchemaType, t: &TypeRef) -> String {
    schema.make_type(t).signature()
}

fn write_arguments(
    f: &mut fmt::Formatter<'_>,
    schema: &SchemaType,
    arguments: &[Arc<Argument>],
) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    f.write_str("(")?;
    for (i, a) in arguments.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        if let Some(d) = &a.description {
            write!(f, "{} ", quote(d)?)?;
        }
        write_input_value(f, schema, a)?;
    }
    f.write_str(")")
}

fn write_input_value(f: &mut fmt::Formatter<'_>, schema: &SchemaType, a: &Argument) -> fmt::Result {
    write!(f, "{}: {}", a.name, type_signature(schema, &a.arg_type))?;
    if let Some(default) = &a.default_value {
        f.write_str(" = ")?;
        ast::write_value(f, default)?;
    }
    write_directives(f, &a.directives)
}

fn write_directive_definition(
    f: &mut fmt::Formatter<'_>,
    schema: &SchemaType,
    d: &DirectiveType,
) -> fmt::Result {
    write_description(f, d.description.as_deref(), "")?;
    write!(f, "directive @{}", d.name)?;
    write_arguments(f, schema, &d.arguments)?;
    if d.is_repeatable {
        f.write_str(" repeatable")?;
    }
    write!(f, " on {}", d.locations.iter().join(" | "))
}

fn write_scalar(f: &mut fmt::Formatter<'_>, s: &ScalarMeta) -> fmt::Result {
    write!(f, "scalar {}", s.name)?;
    if let Some(url) = &s.specified_by_url {
        write!(f, " @specifiedBy(url: {})", quote(url)?)?;
    }
    write_directives(f, &s.directives)
}

fn write_enum(f: &mut fmt::Formatter<'_>, e: &EnumMeta) -> fmt::Result {
    write!(f, "enum {}", e.name)?;
    write_directives(f, &e.directives)?;
    f.write_str(" {")?;
    for v in e.values.values().sorted_by(|a, b| a.name.cmp(&b.name)) {
        f.write_str("\n")?;
        write_description(f, v.description.as_deref(), "  ")?;
        write!(f, "  {}", v.name)?;
        write_directives(f, &v.directives)?;
    }
    f.write_str("\n}")
}

fn write_fields<'a>(
    f: &mut fmt::Formatter<'_>,
    schema: &SchemaType,
    fields: impl Iterator<Item = &'a Arc<Field>>,
) -> fmt::Result {
    let fields = fields
        .filter(|field| !field.is_builtin())
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect::<Vec<_>>();
    if fields.is_empty() {
        return Ok(());
    }
    f.write_str(" {")?;
    for field in fields {
        f.write_str("\n")?;
        write_description(f, field.description.as_deref(), "  ")?;
        write!(f, "  {}", field.name)?;
        write_arguments(f, schema, &field.arguments)?;
        write!(f, ": {}", type_signature(schema, &field.field_type))?;
        write_directives(f, &field.directives)?;
    }
    f.write_str("\n}")
}

fn write_object(f: &mut fmt::Formatter<'_>, schema: &SchemaType, o: &ObjectMeta) -> fmt::Result {
    write!(f, "type {}", o.name)?;
    if !o.interfaces.is_empty() {
        let names = o
            .interfaces
            .iter()
            .map(|id| schema.meta(*id).name())
            .sorted()
            .join(" & ");
        write!(f, " implements {names}")?;
    }
    write_directives(f, &o.directives)?;
    write_fields(f, schema, o.fields.values())
}

fn write_interface(
    f: &mut fmt::Formatter<'_>,
    schema: &SchemaType,
    i: &InterfaceMeta,
) -> fmt::Result {
    write!(f, "interface {}", i.name)?;
    write_directives(f, &i.directives)?;
    write_fields(f, schema, i.fields.values())
}

fn write_union(f: &mut fmt::Formatter<'_>, schema: &SchemaType, u: &UnionMeta) -> fmt::Result {
    write!(f, "union {}", u.name)?;
    write_directives(f, &u.directives)?;
    if !u.members.is_empty() {
        let members = u
            .members
            .iter()
            .map(|id| schema.meta(*id).name())
            .sorted()
            .join(" | ");
        write!(f, " = {members}")?;
    }
    Ok(())
}

fn write_input_object(
    f: &mut fmt::Formatter<'_>,
    schema: &SchemaType,
    io: &InputObjectMeta,
) -> fmt::Result {
    write!(f, "input {}", io.name)?;
    write_directives(f, &io.directives)?;
    let fields = io
        .input_fields
        .values()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect::<Vec<_>>();
    if fields.is_empty() {
        return Ok(());
    }
    f.write_str(" {")?;
    for field in fields {
        f.write_str("\n")?;
        write_description(f, field.description.as_deref(), "  ")?;
        f.write_str("  ")?;
        write_input_value(f, schema, field)?;
    }
    f.write_str("\n}")
}
