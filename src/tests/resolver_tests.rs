use graphql_parser::parse_query;
use indexmap::IndexMap;
use itertools::Itertools as _;
use pretty_assertions::assert_eq;

use crate::{
    ArgumentBuilder, EnumBuilder, FieldBuilder, FieldError, HostValue, InputObjectBuilder,
    InputValue, LiteralValue, ObjectBuilder, Resolved, Resolver, ResolverContext, SchemaBuilder,
    SchemaType, UnionBuilder,
    ast::{self, Selection},
    literal,
    schema::meta::MetaType,
    tests::{
        fixtures::starwars::{self, Database},
        util::execute,
    },
};

async fn run_starwars(query: &str) -> LiteralValue {
    execute(&starwars::schema(), query, &Database::new())
        .await
        .unwrap_or_else(|e| panic!("query failed: {}", e.message()))
}

#[derive(Debug)]
struct Cat {
    name: &'static str,
}

#[derive(Debug)]
struct Dog {
    name: &'static str,
    good: bool,
}

fn misc_schema() -> SchemaType {
    let mut builder = SchemaBuilder::new();
    builder
        .add_enum(EnumBuilder::new("Shade").values(["LIGHT", "DARK"]))
        .add_input_object(
            InputObjectBuilder::new("Point")
                .field(ArgumentBuilder::new("x", "Int").default_value(InputValue::Int(0.into())))
                .field(ArgumentBuilder::new("y", "Int").default_value(InputValue::Int(0.into()))),
        )
        .add_object(
            ObjectBuilder::new("Cat").field(FieldBuilder::new(
                "name",
                "String!",
                Resolver::simple(|v: &HostValue| {
                    let cat = v.downcast_ref::<Cat>().ok_or("Expected a cat")?;
                    Ok::<_, FieldError>(HostValue::new(cat.name))
                }),
            )),
        )
        .add_object(
            ObjectBuilder::new("Dog")
                .field(FieldBuilder::new(
                    "name",
                    "String!",
                    Resolver::simple(|v: &HostValue| {
                        let dog = v.downcast_ref::<Dog>().ok_or("Expected a dog")?;
                        Ok::<_, FieldError>(HostValue::new(dog.name))
                    }),
                ))
                .field(FieldBuilder::new(
                    "good",
                    "Boolean!",
                    Resolver::simple(|v: &HostValue| {
                        let dog = v.downcast_ref::<Dog>().ok_or("Expected a dog")?;
                        Ok::<_, FieldError>(HostValue::new(dog.good))
                    }),
                )),
        )
        .add_union(UnionBuilder::new("Pet").member("Cat").member("Dog").unwrap(|_, v| {
            if v.is::<Cat>() {
                Ok((v.clone(), "Cat".into()))
            } else if v.is::<Dog>() {
                Ok((v.clone(), "Dog".into()))
            } else {
                Err(format!("Not a pet: {v:?}").into())
            }
        }))
        .add_union(UnionBuilder::new("Stray").member("Cat"))
        .add_object(
            ObjectBuilder::new("Query")
                .field(
                    FieldBuilder::new(
                        "echo",
                        "[String!]!",
                        Resolver::full(|ctx: &ResolverContext<'_>, _: &HostValue| {
                            let args = ctx.get_argument_values()?;
                            let word = args["word"]
                                .downcast_ref::<String>()
                                .ok_or("Expected a word")?;
                            let times = args["times"].downcast_ref::<i32>().copied().unwrap_or(1);
                            Ok::<_, FieldError>(HostValue::list(
                                (0..times).map(|_| HostValue::new(word.clone())).collect(),
                            ))
                        }),
                    )
                    .argument(ArgumentBuilder::new("word", "String!"))
                    .argument(
                        ArgumentBuilder::new("times", "Int").default_value(InputValue::Int(2.into())),
                    ),
                )
                .field(
                    FieldBuilder::new(
                        "raw",
                        "String!",
                        Resolver::full(|ctx: &ResolverContext<'_>, _: &HostValue| {
                            let raw = ctx.get_raw_argument_value("at")?;
                            Ok::<_, FieldError>(HostValue::new(raw.to_string()))
                        }),
                    )
                    .argument(ArgumentBuilder::new("at", "Point")),
                )
                .field(FieldBuilder::new(
                    "answer",
                    "Int!",
                    Resolver::full(|_: &ResolverContext<'_>, _: &HostValue| {
                        Ok::<_, FieldError>(Resolved::deferred(async {
                            tokio::task::yield_now().await;
                            Ok(HostValue::new(42))
                        }))
                    }),
                ))
                .field(FieldBuilder::new(
                    "failing",
                    "String",
                    Resolver::simple(|_| Err::<HostValue, _>(FieldError::from("boom"))),
                ))
                .field(FieldBuilder::new(
                    "sloppy",
                    "String",
                    Resolver::full(|ctx: &ResolverContext<'_>, _: &HostValue| {
                        ctx.get_argument_value("nope")?;
                        Ok::<_, FieldError>(HostValue::null())
                    }),
                ))
                .field(FieldBuilder::new(
                    "required",
                    "String!",
                    Resolver::simple(|_| Ok::<_, FieldError>(HostValue::null())),
                ))
                .field(FieldBuilder::new(
                    "shade",
                    "Shade",
                    Resolver::simple(|_| Ok::<_, FieldError>(HostValue::new("PURPLE"))),
                ))
                .field(FieldBuilder::new(
                    "pets",
                    "[Pet!]!",
                    Resolver::simple(|_| {
                        Ok::<_, FieldError>(HostValue::list(vec![
                            HostValue::new(Cat { name: "Tom" }),
                            HostValue::new(Dog {
                                name: "Rex",
                                good: true,
                            }),
                        ]))
                    }),
                ))
                .field(FieldBuilder::new(
                    "stray",
                    "Stray",
                    Resolver::simple(|_| Ok::<_, FieldError>(HostValue::new(Cat { name: "Kit" }))),
                )),
        )
        .query_type("Query");
    builder.build().unwrap()
}

async fn run_misc(query: &str) -> Result<LiteralValue, String> {
    execute(&misc_schema(), query, &())
        .await
        .map_err(|e| e.message().to_owned())
}

#[tokio::test]
async fn resolves_hero_name() {
    let result = run_starwars("{ hero { name } }").await;

    assert_eq!(result, literal!({"hero": {"name": "R2-D2"}}));
}

#[tokio::test]
async fn resolves_friends_through_the_interface() {
    let result = run_starwars("{ hero { id name friends { name __typename } } }").await;

    assert_eq!(
        result,
        literal!({
            "hero": {
                "id": "2001",
                "name": "R2-D2",
                "friends": [
                    {"name": "Luke Skywalker", "__typename": "Human"},
                    {"name": "Han Solo", "__typename": "Human"},
                    {"name": "Leia Organa", "__typename": "Human"},
                ],
            },
        }),
    );
}

#[tokio::test]
async fn decodes_enum_arguments() {
    let result = run_starwars("{ hero(episode: EMPIRE) { name __typename } }").await;

    assert_eq!(
        result,
        literal!({"hero": {"name": "Luke Skywalker", "__typename": "Human"}}),
    );

    let err = execute(
        &starwars::schema(),
        "{ hero(episode: PHANTOM) { name } }",
        &Database::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.message(), "Received invalid enum value PHANTOM");
}

#[tokio::test]
async fn encodes_enum_lists() {
    let result = run_starwars(r#"{ droid(id: "2000") { name appearsIn } }"#).await;

    assert_eq!(
        result,
        literal!({
            "droid": {"name": "C-3PO", "appearsIn": ["NEW_HOPE", "EMPIRE", "JEDI"]},
        }),
    );
}

#[tokio::test]
async fn applies_fragments_by_type_condition() {
    let result = run_starwars(
        r#"
        query {
            hero { name ...DroidFields ... on Human { homePlanet } }
            human(id: "1000") { ...HumanFields }
        }

        fragment DroidFields on Droid { primaryFunction }
        fragment HumanFields on Human { name homePlanet }
        "#,
    )
    .await;

    assert_eq!(
        result,
        literal!({
            "hero": {"name": "R2-D2", "primaryFunction": "Astromech"},
            "human": {"name": "Luke Skywalker", "homePlanet": "Tatooine"},
        }),
    );
}

#[tokio::test]
async fn reports_aliases_and_missing_objects() {
    let result = run_starwars(
        r#"{
            luke: human(id: "1000") { name }
            leia: human(id: "1003") { name }
            nobody: human(id: "9999") { name }
            han: human(id: "1002") { homePlanet }
        }"#,
    )
    .await;

    assert_eq!(
        result,
        literal!({
            "luke": {"name": "Luke Skywalker"},
            "leia": {"name": "Leia Organa"},
            "nobody": null,
            "han": {"homePlanet": null},
        }),
    );
}

#[tokio::test]
async fn missing_required_argument_fails() {
    let err = execute(&starwars::schema(), "{ human { name } }", &Database::new())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "value is required");
}

#[tokio::test]
async fn omitted_arguments_take_their_defaults() {
    assert_eq!(
        run_misc(r#"{ echo(word: "hi") }"#).await,
        Ok(literal!({"echo": ["hi", "hi"]})),
    );
    assert_eq!(
        run_misc(r#"{ echo(word: "hi", times: 3) }"#).await,
        Ok(literal!({"echo": ["hi", "hi", "hi"]})),
    );
    assert_eq!(
        run_misc(r#"{ echo(word: "hi", times: null) }"#).await,
        Ok(literal!({"echo": ["hi"]})),
    );
}

#[tokio::test]
async fn exposes_raw_argument_literals() {
    assert_eq!(
        run_misc("{ raw(at: {x: 1}) }").await,
        Ok(literal!({"raw": r#"{"x": 1}"#})),
    );
    assert_eq!(run_misc("{ raw }").await, Ok(literal!({"raw": "null"})));
}

#[tokio::test]
async fn awaits_deferred_values() {
    assert_eq!(run_misc("{ answer }").await, Ok(literal!({"answer": 42})));
}

#[tokio::test]
async fn reports_resolver_errors_verbatim() {
    assert_eq!(run_misc("{ failing }").await, Err("boom".into()));
    assert_eq!(
        run_misc("{ sloppy }").await,
        Err(r#"Unknown argument "nope" on field "sloppy""#.into()),
    );
}

#[tokio::test]
async fn refuses_null_for_non_null_fields() {
    assert_eq!(
        run_misc("{ required }").await,
        Err("Cannot return null for non-nullable type String!".into()),
    );
}

#[tokio::test]
async fn refuses_to_encode_undeclared_enum_values() {
    assert_eq!(
        run_misc("{ shade }").await,
        Err(r#"Enum "Shade" cannot represent value: "PURPLE""#.into()),
    );
}

#[tokio::test]
async fn unwraps_union_members() {
    assert_eq!(
        run_misc("{ pets { __typename ... on Cat { name } ... on Dog { name good } } }").await,
        Ok(literal!({
            "pets": [
                {"__typename": "Cat", "name": "Tom"},
                {"__typename": "Dog", "name": "Rex", "good": true},
            ],
        })),
    );
}

#[tokio::test]
async fn untagged_values_of_default_unions_fail() {
    let err = run_misc("{ stray { ... on Cat { name } } }").await.unwrap_err();

    assert!(
        err.starts_with("Cannot determine the concrete type of"),
        "unexpected error: {err}",
    );
}

/// Lists `(object type, field)` pairs of the sub-selection of the first field
/// of `query`.
fn child_fields(schema: &SchemaType, query: &str) -> Vec<(String, String)> {
    let document = parse_query::<&str>(query).unwrap();
    let selections = ast::query_selections(&document, None).unwrap();
    let Selection::Field(selected) = &selections[0] else {
        panic!("expected a field selection");
    };
    let parent = schema.concrete_query_type();
    let MetaType::Object(query_type) = parent else {
        panic!("query type must be an object");
    };
    let field = query_type.field_by_name(&selected.name).unwrap();
    let arguments = IndexMap::new();
    let ctx = ResolverContext::new(
        schema,
        parent,
        field,
        &arguments,
        &selected.selection_set,
        &(),
    );

    let mut walked = Vec::new();
    ctx.walk_child_selections(|f| {
        assert!(f.definition().is_some(), "`{}` must be defined", f.selection.name);
        walked.push((f.object_type.name.to_string(), f.selection.name.clone()));
    });
    let listed = ctx
        .child_fields()
        .map(|f| (f.object_type.name.to_string(), f.selection.name.clone()))
        .collect::<Vec<_>>();
    assert_eq!(walked, listed);

    walked.into_iter().sorted().collect()
}

#[test]
fn enumerates_child_fields_per_possible_type() {
    let schema = starwars::schema();

    let fields = child_fields(
        &schema,
        "{ hero { name ... on Droid { primaryFunction } ... on Human { homePlanet } } }",
    );

    assert_eq!(
        fields,
        [
            ("Droid", "name"),
            ("Droid", "primaryFunction"),
            ("Human", "homePlanet"),
            ("Human", "name"),
        ]
        .map(|(t, f)| (t.to_owned(), f.to_owned())),
    );
}

#[test]
fn child_fields_of_objects_honor_abstract_conditions() {
    let schema = starwars::schema();

    let fields = child_fields(
        &schema,
        r#"{
            human(id: "1000") {
                name
                ... on Character { id }
                ... on Droid { primaryFunction }
                ... { __typename }
            }
        }"#,
    );

    assert_eq!(
        fields,
        [("Human", "__typename"), ("Human", "id"), ("Human", "name")]
            .map(|(t, f)| (t.to_owned(), f.to_owned())),
    );
}

#[test]
fn introspection_resolvers_are_safe() {
    let schema = starwars::schema();
    let MetaType::Object(query) = schema.concrete_query_type() else {
        panic!("query type must be an object");
    };

    assert!(query.field_by_name("__schema").unwrap().resolver.is_safe());
    assert!(query.field_by_name("__typename").unwrap().resolver.is_safe());
    assert!(!query.field_by_name("hero").unwrap().resolver.is_safe());
}
