use engine::{
    ConcurrentPromiseAdapter, Deferred, Document, Error, ExecutionRequest, Executor, ExecutorConfig, ResolvedValue,
    registry::{MetaField, MetaInputValue, ObjectType, Schema, TypeRef},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::run;

fn fails(name: &str, message: &'static str) -> MetaField {
    MetaField::new(name, TypeRef::named("String")).resolve(move |_, _, _, _| Deferred::rejected(Error::new(message)))
}

#[test]
fn non_null_root_field_nulls_the_data() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query").field(
                MetaField::new("nonNullSync", TypeRef::named("String").non_null())
                    .resolve(|_, _, _, _| Deferred::rejected(Error::new("boom"))),
            ),
        )
        .build()
        .unwrap();

    insta::assert_json_snapshot!(run(&schema, "{ nonNullSync }"), @r###"
    {
      "data": null,
      "errors": [
        {
          "message": "boom",
          "locations": [
            {
              "line": 1,
              "column": 3
            }
          ],
          "path": [
            "nonNullSync"
          ]
        }
      ]
    }
    "###);
}

#[test]
fn failing_fields_do_not_affect_their_siblings() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(
                    MetaField::new("a", TypeRef::named("Int"))
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::from(1))),
                )
                .field(fails("broken", "broken"))
                .field(
                    MetaField::new("b", TypeRef::named("Int"))
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::from(2))),
                ),
        )
        .build()
        .unwrap();

    assert_eq!(
        run(&schema, "{ a broken b }"),
        json!({
            "data": {"a": 1, "broken": null, "b": 2},
            "errors": [{"message": "broken", "locations": [{"line": 1, "column": 5}], "path": ["broken"]}],
        })
    );
}

fn nullability() -> Schema {
    Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(MetaField::new("user", TypeRef::named("User")).resolve(|_, _, _, _| {
                    Deferred::resolved(ResolvedValue::map([
                        ("id", ResolvedValue::from(1)),
                        ("name", ResolvedValue::Null),
                    ]))
                }))
                .field(
                    MetaField::new("names", TypeRef::named("String").non_null().list())
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::list([Some("a"), None]))),
                )
                .field(
                    MetaField::new("tags", TypeRef::named("String").list().non_null()).resolve(|_, _, _, _| {
                        Deferred::resolved(ResolvedValue::list([
                            ResolvedValue::from("x"),
                            ResolvedValue::Error(Error::new("bad tag")),
                        ]))
                    }),
                )
                .field(
                    MetaField::new("notAList", TypeRef::named("String").list())
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::from("oops"))),
                ),
        )
        .register(
            ObjectType::new("User")
                .field(MetaField::new("id", TypeRef::named("ID").non_null()))
                .field(MetaField::new("name", TypeRef::named("String").non_null())),
        )
        .build()
        .unwrap()
}

#[test]
fn nulls_bubble_to_the_nearest_nullable_ancestor() {
    assert_eq!(
        run(&nullability(), "{ user { id name } names tags }"),
        json!({
            "data": {"user": null, "names": null, "tags": ["x", null]},
            "errors": [
                {
                    "message": "Cannot return null for non-nullable field User.name.",
                    "locations": [{"line": 1, "column": 13}],
                    "path": ["user", "name"],
                },
                {
                    "message": "Cannot return null for non-nullable field Query.names.",
                    "locations": [{"line": 1, "column": 20}],
                    "path": ["names", 1],
                },
                {
                    "message": "bad tag",
                    "locations": [{"line": 1, "column": 26}],
                    "path": ["tags", 1],
                },
            ],
        })
    );
}

#[test]
fn nulls_bubble_through_several_non_null_levels() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(MetaField::new("deep", TypeRef::named("Outer")).resolve(|_, _, _, _| {
                    Deferred::resolved(ResolvedValue::map([(
                        "inner",
                        ResolvedValue::map([("v", ResolvedValue::Null)]),
                    )]))
                }))
                .field(
                    MetaField::new("sibling", TypeRef::named("String"))
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::from("kept"))),
                ),
        )
        .register(ObjectType::new("Outer").field(MetaField::new("inner", TypeRef::named("Inner").non_null())))
        .register(ObjectType::new("Inner").field(MetaField::new("v", TypeRef::named("String").non_null())))
        .build()
        .unwrap();

    assert_eq!(
        run(&schema, "{ deep { inner { v } } sibling }"),
        json!({
            "data": {"deep": null, "sibling": "kept"},
            "errors": [{
                "message": "Cannot return null for non-nullable field Inner.v.",
                "locations": [{"line": 1, "column": 18}],
                "path": ["deep", "inner", "v"],
            }],
        })
    );
}

#[tokio::test]
async fn async_rejections_are_contained() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(MetaField::new("bad", TypeRef::named("String")).resolve(|_, _, _, _| {
                    Deferred::from_future(async {
                        tokio::task::yield_now().await;
                        Err(Error::new("async boom"))
                    })
                }))
                .field(MetaField::new("good", TypeRef::named("String")).resolve(|_, _, _, _| {
                    Deferred::from_future(async {
                        tokio::task::yield_now().await;
                        Ok(ResolvedValue::from("ok"))
                    })
                }))
                .field(
                    MetaField::new("wrapper", TypeRef::named("Wrapper"))
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::map([("kind", "wrapper")]))),
                ),
        )
        .register(
            ObjectType::new("Wrapper").field(
                MetaField::new("required", TypeRef::named("String").non_null()).resolve(|_, _, _, _| {
                    Deferred::from_future(async {
                        tokio::task::yield_now().await;
                        Err(Error::new("async required"))
                    })
                }),
            ),
        )
        .build()
        .unwrap();

    let executor = Executor::new(schema).with_promise_adapter(ConcurrentPromiseAdapter);
    let result = executor
        .execute(ExecutionRequest::new(Document::parse("{ bad good wrapper { required } }").unwrap()))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(result).unwrap(),
        json!({
            "data": {"bad": null, "good": "ok", "wrapper": null},
            "errors": [
                {"message": "async boom", "locations": [{"line": 1, "column": 3}], "path": ["bad"]},
                {
                    "message": "async required",
                    "locations": [{"line": 1, "column": 22}],
                    "path": ["wrapper", "required"],
                },
            ],
        })
    );
}

#[test]
fn lists_must_be_lists() {
    assert_eq!(
        run(&nullability(), "{ notAList }"),
        json!({
            "data": {"notAList": null},
            "errors": [{
                "message": "Expected Iterable, but did not find one for field \"Query.notAList\".",
                "locations": [{"line": 1, "column": 3}],
                "path": ["notAList"],
            }],
        })
    );
}

#[test]
fn invalid_arguments_are_field_errors() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query").field(
                MetaField::new("echo", TypeRef::named("Int"))
                    .argument(MetaInputValue::new("x", TypeRef::named("Int").non_null()))
                    .resolve(|_, arguments, _, _| Deferred::resolved(arguments.get("x").cloned().into())),
            ),
        )
        .build()
        .unwrap();

    assert_eq!(
        run(&schema, "{ a: echo b: echo(x: 1) }"),
        json!({
            "data": {"a": null, "b": 1},
            "errors": [{
                "message": "Argument \"x\" of required type \"Int!\" was not provided.",
                "locations": [{"line": 1, "column": 3}],
                "path": ["a"],
            }],
        })
    );
}

#[test]
fn internal_errors_are_masked() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(
                    MetaField::new("internal", TypeRef::named("String"))
                        .resolve(|_, _, _, _| Deferred::rejected(Error::internal("connection refused"))),
                )
                .field(MetaField::new("tagged", TypeRef::named("String")).resolve(|_, _, _, _| {
                    Deferred::rejected(Error::new("not allowed").with_extension("code", "FORBIDDEN"))
                })),
        )
        .build()
        .unwrap();

    let request = || ExecutionRequest::new(Document::parse("{ internal tagged }").unwrap());

    let executor = Executor::new(schema);
    let result = executor.execute(request()).wait().unwrap();
    assert_eq!(
        executor.serialize(&result),
        json!({
            "data": {"internal": null, "tagged": null},
            "errors": [
                {"message": "Internal server error", "locations": [{"line": 1, "column": 3}], "path": ["internal"]},
                {
                    "message": "not allowed",
                    "locations": [{"line": 1, "column": 12}],
                    "path": ["tagged"],
                    "extensions": {"code": "FORBIDDEN"},
                },
            ],
        })
    );

    let config: ExecutorConfig = toml::from_str("[debug]\ndebug_message = true\ncategory = true").unwrap();
    let executor = executor.with_config(config);
    let result = executor.execute(request()).wait().unwrap();
    assert_eq!(
        executor.serialize(&result)["errors"][0],
        json!({
            "message": "Internal server error",
            "locations": [{"line": 1, "column": 3}],
            "path": ["internal"],
            "extensions": {"category": "INTERNAL_SERVER_ERROR", "debugMessage": "connection refused"},
        })
    );
}
