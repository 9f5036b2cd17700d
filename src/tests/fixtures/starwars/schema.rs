use std::any::Any;

use crate::{
    ArgumentBuilder, Context, EnumBuilder, EnumValueBuilder, FieldBuilder, FieldError,
    FieldResult, HostValue, InterfaceBuilder, LiteralValue, ObjectBuilder, Resolver,
    ResolverContext, SchemaBuilder, SchemaType,
};

use super::model::{Character, Database, Droid, Episode, Human};

/// Declares the Star Wars schema, with `Query` as its query type.
pub fn builder() -> SchemaBuilder {
    let mut builder = SchemaBuilder::new();
    builder
        .add_enum(episode())
        .add_interface(
            character_fields().into_iter().fold(
                InterfaceBuilder::new("Character")
                    .description("A character in the Star Wars Trilogy"),
                InterfaceBuilder::field,
            ),
        )
        .add_object(
            character_fields()
                .into_iter()
                .fold(
                    ObjectBuilder::new("Human")
                        .description("A humanoid creature in the Star Wars universe.")
                        .interface("Character"),
                    ObjectBuilder::field,
                )
                .field(
                    FieldBuilder::new(
                        "homePlanet",
                        "String",
                        getter(|h: &Human| HostValue::optional(h.home_planet().map(String::from))),
                    )
                    .description("The home planet of the human"),
                ),
        )
        .add_object(
            character_fields()
                .into_iter()
                .fold(
                    ObjectBuilder::new("Droid")
                        .description("A mechanical creature in the Star Wars universe.")
                        .interface("Character"),
                    ObjectBuilder::field,
                )
                .field(
                    FieldBuilder::new(
                        "primaryFunction",
                        "String",
                        getter(|d: &Droid| {
                            HostValue::optional(d.primary_function().map(String::from))
                        }),
                    )
                    .description("The primary function of the droid"),
                ),
        )
        .add_object(query())
        .query_type("Query");
    builder
}

/// Builds the Star Wars schema.
pub fn schema() -> SchemaType {
    builder().build().expect("Star Wars schema must build")
}

fn episode() -> EnumBuilder {
    EnumBuilder::new("Episode")
        .description("One of the films in the Star Wars Trilogy")
        .value(EnumValueBuilder::new("NEW_HOPE").description("Released in 1977."))
        .value(EnumValueBuilder::new("EMPIRE").description("Released in 1980."))
        .value(EnumValueBuilder::new("JEDI").description("Released in 1983."))
        .encode(|_, v| {
            if v.is_null() {
                return Ok(LiteralValue::Null);
            }
            v.downcast_ref::<Episode>()
                .map(|e| e.as_str().into())
                .ok_or_else(|| "Expected an `Episode` host value".into())
        })
        .decode(|_, v| match v {
            LiteralValue::Null => Ok(HostValue::null()),
            v => v
                .as_str()
                .and_then(Episode::from_name)
                .map(HostValue::new)
                .ok_or_else(|| format!("Unknown episode {v}").into()),
        })
}

fn query() -> ObjectBuilder {
    ObjectBuilder::new("Query")
        .description("The root query object of the schema")
        .field(
            FieldBuilder::new(
                "human",
                "Human",
                Resolver::full(|ctx: &ResolverContext<'_>, _: &HostValue| {
                    let id = ctx.get_argument_value("id")?;
                    let id = id.downcast_ref::<String>().ok_or("Expected a string id")?;
                    let db = database(ctx.context())?;
                    Ok::<_, FieldError>(HostValue::optional(db.get_human(id).cloned()))
                }),
            )
            .argument(ArgumentBuilder::new("id", "String!").description("id of the human")),
        )
        .field(
            FieldBuilder::new(
                "droid",
                "Droid",
                Resolver::full(|ctx: &ResolverContext<'_>, _: &HostValue| {
                    let id = ctx.get_argument_value("id")?;
                    let id = id.downcast_ref::<String>().ok_or("Expected a string id")?;
                    let db = database(ctx.context())?;
                    Ok::<_, FieldError>(HostValue::optional(db.get_droid(id).cloned()))
                }),
            )
            .argument(ArgumentBuilder::new("id", "String!").description("id of the droid")),
        )
        .field(
            FieldBuilder::new(
                "hero",
                "Character",
                Resolver::full(|ctx: &ResolverContext<'_>, _: &HostValue| {
                    let episode = ctx
                        .get_argument_value("episode")?
                        .downcast_ref::<Episode>()
                        .copied();
                    Ok::<_, FieldError>(database(ctx.context())?.get_hero(episode))
                }),
            )
            .argument(ArgumentBuilder::new("episode", "Episode").description(
                "If omitted, returns the hero of the whole saga. If provided, returns the hero \
                 of that particular episode",
            )),
        )
}

/// Fields shared by `Character` and its implementors.
fn character_fields() -> [FieldBuilder; 4] {
    [
        FieldBuilder::new(
            "id",
            "String!",
            Resolver::simple(|v: &HostValue| {
                Ok::<_, FieldError>(HostValue::new(character(v)?.id().to_owned()))
            }),
        )
        .description("The id of the character"),
        FieldBuilder::new(
            "name",
            "String",
            Resolver::simple(|v: &HostValue| {
                Ok::<_, FieldError>(HostValue::new(character(v)?.name().to_owned()))
            }),
        )
        .description("The name of the character"),
        FieldBuilder::new(
            "friends",
            "[Character]",
            Resolver::with_context(|ctx: &Context, v: &HostValue| {
                let db = database(ctx)?;
                Ok::<_, FieldError>(HostValue::list(
                    character(v)?
                        .friend_ids()
                        .iter()
                        .filter_map(|id| db.get_character(id))
                        .collect(),
                ))
            }),
        )
        .description("The friends of the character"),
        FieldBuilder::new(
            "appearsIn",
            "[Episode]",
            Resolver::simple(|v: &HostValue| {
                Ok::<_, FieldError>(HostValue::list(
                    character(v)?
                        .appears_in()
                        .iter()
                        .copied()
                        .map(HostValue::new)
                        .collect(),
                ))
            }),
        )
        .description("Which movies they appear in"),
    ]
}

fn database(ctx: &Context) -> FieldResult<&Database> {
    ctx.downcast_ref::<Database>()
        .ok_or_else(|| "Expected a `Database` context".into())
}

/// Views a human or droid, whether still tagged with its type or not.
fn character(v: &HostValue) -> FieldResult<&dyn Character> {
    let v = v.as_typed().map_or(v, |t| &t.value);
    v.downcast_ref::<Human>()
        .map(|h| h as &dyn Character)
        .or_else(|| v.downcast_ref::<Droid>().map(|d| d as &dyn Character))
        .ok_or_else(|| "Expected a character host value".into())
}

fn getter<T: Any, F>(f: F) -> Resolver
where
    F: Fn(&T) -> HostValue + Send + Sync + 'static,
{
    Resolver::simple(move |v: &HostValue| {
        let this = v
            .downcast_ref::<T>()
            .ok_or_else(|| format!("Expected a `{}` host value", std::any::type_name::<T>()))?;
        Ok::<_, FieldError>(f(this))
    })
}
