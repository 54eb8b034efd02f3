use jiku::{
    Arguments, CancellationToken, ErrorKind, Executor, PathSegment, ResolverError,
    ResolverRegistry, Response, Schema, TypenameField,
};
use serde_json::{json, Value};

const SDL: &str = r#"
enum Episode { NEWHOPE, EMPIRE, JEDI }

interface Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
}

type Human implements Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
  homePlanet: String
}

type Droid implements Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
  primaryFunction: String
}

type Query {
  hero(episode: Episode): Character
  human(id: String!): Human
  droid(id: String!): Droid
}
"#;

fn characters() -> Vec<Value> {
    vec![
        json!({
            "__typename": "Human", "id": "1000", "name": "Luke Skywalker",
            "friendIds": ["1002", "1003", "2000", "2001"],
            "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"], "homePlanet": "Tatooine"
        }),
        json!({
            "__typename": "Human", "id": "1001", "name": "Darth Vader",
            "friendIds": ["1004"],
            "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"], "homePlanet": "Tatooine"
        }),
        json!({
            "__typename": "Human", "id": "1002", "name": "Han Solo",
            "friendIds": ["1000", "1003", "2001"],
            "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"]
        }),
        json!({
            "__typename": "Human", "id": "1003", "name": "Leia Organa",
            "friendIds": ["1000", "1002", "2000", "2001"],
            "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"], "homePlanet": "Alderaan"
        }),
        json!({
            "__typename": "Human", "id": "1004", "name": "Wilhuff Tarkin",
            "friendIds": ["1001"], "appearsIn": ["NEWHOPE"]
        }),
        json!({
            "__typename": "Droid", "id": "2000", "name": "C-3PO",
            "friendIds": ["1000", "1002", "1003", "2001"],
            "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"], "primaryFunction": "Protocol"
        }),
        json!({
            "__typename": "Droid", "id": "2001", "name": "R2-D2",
            "friendIds": ["1000", "1002", "1003"],
            "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"], "primaryFunction": "Astromech"
        }),
    ]
}

fn find(id: &str, typename: Option<&str>) -> Value {
    characters()
        .into_iter()
        .find(|c| c["id"] == id && typename.map_or(true, |t| c["__typename"] == t))
        .unwrap_or(Value::Null)
}

fn friends(parent: &Value, _args: &Arguments) -> Result<Value, ResolverError> {
    let ids = parent["friendIds"]
        .as_array()
        .ok_or_else(|| ResolverError::new("character has no friend list"))?;
    let friends = ids
        .iter()
        .filter_map(Value::as_str)
        .map(|id| find(id, None))
        .collect();
    Ok(Value::Array(friends))
}

fn resolvers() -> ResolverRegistry {
    ResolverRegistry::new()
        .with_fn("Query", "hero", |_, args| {
            let id = match args.get_str("episode") {
                Some("EMPIRE") => "1000",
                _ => "2001",
            };
            Ok(find(id, None))
        })
        .with_fn("Query", "human", |_, args| {
            Ok(find(args.get_str("id").unwrap_or_default(), Some("Human")))
        })
        .with_fn("Query", "droid", |_, args| {
            Ok(find(args.get_str("id").unwrap_or_default(), Some("Droid")))
        })
        .with_fn("Human", "friends", friends)
        .with_fn("Droid", "friends", friends)
        .with_type_resolver(TypenameField::default())
}

fn run(query: &str) -> Response {
    let _ = env_logger::builder().is_test(true).try_init();
    let schema = Schema::parse(SDL).unwrap();
    let resolvers = resolvers();
    Executor::new(&schema, &resolvers)
        .execute_str(query, None, &Value::Null, &CancellationToken::new())
        .unwrap()
}

#[test]
fn schema_builds_with_interfaces_and_enums() {
    let schema = Schema::parse(SDL).unwrap();
    let human = schema.get_object("Human").unwrap();
    assert!(human.implements("Character"));
    assert!(human.get_property("id").unwrap().required());
    assert!(!human.get_property("name").unwrap().required());
    assert_eq!(
        human.field("friends").unwrap().ty().to_string(),
        "[Character]"
    );
    let query = schema.query_type().unwrap();
    let hero = query.get_method("hero").unwrap();
    assert_eq!(hero.ty().to_string(), "Character");
    assert!(!hero.parameter("episode").unwrap().required());
    assert!(query.get_method("human").unwrap().parameter("id").unwrap().required());
}

#[test]
fn hero_name_query() {
    let response = run(
        r#"
        query HeroNameQuery {
          hero {
            name
          }
        }
        "#,
    );
    assert_eq!(response.to_json(), json!({ "data": { "hero": { "name": "R2-D2" } } }));
}

#[test]
fn hero_with_friends() {
    let response = run("query HeroNameAndFriendsQuery { hero { id name friends { name } } }");
    assert_eq!(
        response.to_json(),
        json!({
            "data": {
                "hero": {
                    "id": "2001",
                    "name": "R2-D2",
                    "friends": [
                        { "name": "Luke Skywalker" },
                        { "name": "Han Solo" },
                        { "name": "Leia Organa" }
                    ]
                }
            }
        })
    );
}

#[test]
fn nested_friends_and_enum_lists() {
    let response = run("{ hero { name friends { name appearsIn friends { name } } } }");
    assert!(response.is_ok(), "{:?}", response.errors);
    let data = response.data.to_value();
    let luke = &data["hero"]["friends"][0];
    assert_eq!(luke["name"], "Luke Skywalker");
    assert_eq!(luke["appearsIn"], json!(["NEWHOPE", "EMPIRE", "JEDI"]));
    assert_eq!(
        luke["friends"],
        json!([
            { "name": "Han Solo" },
            { "name": "Leia Organa" },
            { "name": "C-3PO" },
            { "name": "R2-D2" }
        ])
    );
}

#[test]
fn arguments_select_the_hero_and_the_human() {
    let response = run(r#"{ hero(episode: EMPIRE) { name } human(id: "1000") { name homePlanet } }"#);
    assert_eq!(
        response.to_json(),
        json!({
            "data": {
                "hero": { "name": "Luke Skywalker" },
                "human": { "name": "Luke Skywalker", "homePlanet": "Tatooine" }
            }
        })
    );
}

#[test]
fn aliases_name_the_response_keys() {
    let response = run(r#"{ luke: human(id: "1000") { name } leia: human(id: "1003") { name } }"#);
    assert_eq!(
        response.to_json(),
        json!({
            "data": {
                "luke": { "name": "Luke Skywalker" },
                "leia": { "name": "Leia Organa" }
            }
        })
    );
}

#[test]
fn unknown_human_is_null() {
    let response = run(r#"{ human(id: "not a valid id") { name } }"#);
    assert_eq!(response.to_json(), json!({ "data": { "human": null } }));
}

#[test]
fn interface_fields_only_are_selectable_on_hero() {
    let response = run("{ hero { birthYear } }");
    assert_eq!(response.errors.len(), 1);
    let error = &response.errors[0];
    assert_eq!(error.kind, ErrorKind::UnknownField);
    assert_eq!(
        error.path,
        vec![PathSegment::from("hero"), PathSegment::from("birthYear")]
    );
    assert_eq!(error.message, "cannot query field \"birthYear\" on type \"Character\"");

    // exists on Droid, but the hero is only known to be a Character
    let response = run("{ hero { primaryFunction } }");
    assert_eq!(response.errors[0].kind, ErrorKind::UnknownField);
    let response = run(r#"{ droid(id: "2001") { primaryFunction } }"#);
    assert_eq!(
        response.to_json(),
        json!({ "data": { "droid": { "primaryFunction": "Astromech" } } })
    );
}

#[test]
fn missing_required_argument_nulls_the_field() {
    let response = run("{ human { name } }");
    assert_eq!(
        response.to_json(),
        json!({
            "data": { "human": null },
            "errors": [{
                "message": "field \"human\" argument \"id\" of type String! is required",
                "path": ["human"],
                "extensions": { "code": "MISSING_REQUIRED_ARGUMENT" }
            }]
        })
    );
}

#[test]
fn unknown_enum_argument_is_a_type_mismatch() {
    let response = run("{ hero(episode: PHANTOM) { name } }");
    assert_eq!(response.data.to_value(), json!({ "hero": null }));
    assert_eq!(response.errors[0].kind, ErrorKind::ArgumentTypeMismatch);
}

#[test]
fn interfaces_need_a_type_resolver() {
    let _ = env_logger::builder().is_test(true).try_init();
    let schema = Schema::parse(SDL).unwrap();
    let resolvers = ResolverRegistry::new();
    let root = json!({ "hero": { "name": "R2-D2" } });
    let response = Executor::new(&schema, &resolvers)
        .execute_str("{ hero { name } }", None, &root, &CancellationToken::new())
        .unwrap();
    assert_eq!(response.data.to_value(), json!({ "hero": null }));
    assert_eq!(response.errors[0].kind, ErrorKind::InterfaceResolution);
}
