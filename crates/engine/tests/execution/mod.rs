use engine::{
    ConstValue, Deferred, Document, Error, ExecutionRequest, Executor, ObjectValue, ResolvedValue,
    registry::{
        CustomScalar, EnumType, FieldResolver, MetaEnumValue, MetaField, MetaInputValue, ObjectType, ScalarType, Schema,
        TypeRef,
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{execute_sync, run};

#[test]
fn reads_fields_from_the_root_value() {
    let schema = Schema::builder("Query")
        .register(ObjectType::new("Query").field(MetaField::new("a", TypeRef::named("String"))))
        .build()
        .unwrap();

    let result = Executor::new(schema)
        .execute(ExecutionRequest::new(Document::parse("{ a }").unwrap()).root_value(ResolvedValue::map([("a", "b")])))
        .wait()
        .unwrap();

    insta::assert_json_snapshot!(result, @r###"
    {
      "data": {
        "a": "b"
      }
    }
    "###);
}

struct Book {
    title: &'static str,
    pages: i32,
}

impl ObjectValue for Book {
    fn field(&self, name: &str) -> Option<ResolvedValue> {
        match name {
            "title" => Some(self.title.into()),
            "pages" => Some(self.pages.into()),
            _ => None,
        }
    }
}

struct Upper;

impl CustomScalar for Upper {
    fn serialize(&self, value: &ConstValue) -> Result<ConstValue, Error> {
        match value {
            ConstValue::String(s) => Ok(ConstValue::String(s.to_uppercase())),
            _ => Err(Error::new("Upper values must be strings")),
        }
    }

    fn parse_value(&self, value: &ConstValue) -> Result<ConstValue, Error> {
        match value {
            ConstValue::String(s) => Ok(ConstValue::String(s.to_lowercase())),
            _ => Err(Error::new("must be a string")),
        }
    }
}

fn library() -> Schema {
    Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(
                    MetaField::new("book", TypeRef::named("Book"))
                        .resolve(|_, _, _, _| {
                            Deferred::resolved(ResolvedValue::object(Book {
                                title: "Dune",
                                pages: 412,
                            }))
                        }),
                )
                .field(
                    MetaField::new("echo", TypeRef::named("Int"))
                        .argument(MetaInputValue::new("x", TypeRef::named("Int")).default_value(5))
                        .resolve(|_, arguments, _, _| {
                            Deferred::resolved(ResolvedValue::from(arguments.get("x").cloned()))
                        }),
                )
                .field(MetaField::new("shelf", TypeRef::named("Shelf")).resolve(|_, _, _, _| {
                    Deferred::resolved(ResolvedValue::map([
                        ("color", ResolvedValue::from(1)),
                        ("badColor", ResolvedValue::from(7)),
                        ("label", ResolvedValue::from("fiction")),
                        ("badLabel", ResolvedValue::from(3)),
                        (
                            "greet",
                            ResolvedValue::callable(|arguments, _, info| {
                                let name = arguments.get_as::<String>("name").ok().flatten().unwrap_or_default();
                                let greeting = format!("{} says hi to {name}", info.parent_type.name);
                                Deferred::resolved(ResolvedValue::from(greeting))
                            }),
                        ),
                    ]))
                })),
        )
        .register(
            ObjectType::new("Book")
                .field(MetaField::new("title", TypeRef::named("String")))
                .field(MetaField::new("pages", TypeRef::named("Int"))),
        )
        .register(
            ObjectType::new("Shelf")
                .field(MetaField::new("color", TypeRef::named("Color")))
                .field(MetaField::new("badColor", TypeRef::named("Color")))
                .field(MetaField::new("label", TypeRef::named("Upper")))
                .field(MetaField::new("badLabel", TypeRef::named("Upper")))
                .field(
                    MetaField::new("greet", TypeRef::named("String"))
                        .argument(MetaInputValue::new("name", TypeRef::named("String").non_null())),
                ),
        )
        .register(
            EnumType::new("Color")
                .value(MetaEnumValue::new("RED").value(0))
                .value(MetaEnumValue::new("GREEN").value(1)),
        )
        .register(ScalarType::custom("Upper", Upper))
        .build()
        .unwrap()
}

#[test]
fn object_values_and_aliases() {
    assert_eq!(
        run(&library(), "{ book { title pages } novel: book { name: title } __typename }"),
        json!({
            "data": {
                "book": {"title": "Dune", "pages": 412},
                "novel": {"name": "Dune"},
                "__typename": "Query",
            }
        })
    );
}

#[test]
fn arguments_and_defaults() {
    assert_eq!(
        run(&library(), "{ a: echo b: echo(x: 2) c: echo(x: null) }"),
        json!({"data": {"a": 5, "b": 2, "c": null}})
    );
}

#[test]
fn callables_receive_the_field_arguments() {
    assert_eq!(
        run(&library(), r#"{ shelf { greet(name: "Ada") } }"#),
        json!({"data": {"shelf": {"greet": "Shelf says hi to Ada"}}})
    );
}

#[test]
fn unknown_fields_are_left_out() {
    assert_eq!(
        run(&library(), "{ book { title isbn } unknown }"),
        json!({"data": {"book": {"title": "Dune"}}})
    );
}

#[test]
fn leaf_serialization() {
    insta::assert_json_snapshot!(run(&library(), "{ shelf { color badColor label badLabel } }"), @r###"
    {
      "data": {
        "shelf": {
          "color": "GREEN",
          "badColor": null,
          "label": "FICTION",
          "badLabel": null
        }
      },
      "errors": [
        {
          "message": "Expected a value of type \"Color\" but received: 7",
          "locations": [
            {
              "line": 1,
              "column": 17
            }
          ],
          "path": [
            "shelf",
            "badColor"
          ]
        },
        {
          "message": "Upper values must be strings",
          "locations": [
            {
              "line": 1,
              "column": 32
            }
          ],
          "path": [
            "shelf",
            "badLabel"
          ]
        }
      ]
    }
    "###);
}

#[test]
fn skip_and_include() {
    let result = execute_sync(
        &library(),
        "query($skip: Boolean!) { a: echo @skip(if: $skip) b: echo @include(if: $skip) c: echo @skip(if: false) }",
        json!({"skip": true}),
    );
    assert_eq!(serde_json::to_value(result).unwrap(), json!({"data": {"b": 5, "c": 5}}));
}

#[test]
fn custom_field_resolver_applies_to_fields_without_one() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(MetaField::new("shout", TypeRef::named("String")))
                .field(
                    MetaField::new("own", TypeRef::named("String"))
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::from("mine"))),
                ),
        )
        .build()
        .unwrap();

    let request = ExecutionRequest::new(Document::parse("{ shout own }").unwrap()).field_resolver(FieldResolver::new(
        |_, _, _, info| Deferred::resolved(ResolvedValue::from(info.field_name.to_uppercase())),
    ));

    let result = Executor::new(schema).execute(request).wait().unwrap();
    assert_eq!(
        serde_json::to_value(result).unwrap(),
        json!({"data": {"shout": "SHOUT", "own": "mine"}})
    );
}
