use engine::{
    Deferred, Document, ExecutionRequest, Executor, ExecutorConfig, ResolvedValue,
    operation::Definition,
    registry::{MetaField, MetaInputValue, ObjectType, Schema, TypeRef},
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn schema() -> Schema {
    Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(
                    MetaField::new("a", TypeRef::named("String"))
                        .resolve(|_, _, _, _| Deferred::resolved("a".into())),
                )
                .field(
                    MetaField::new("b", TypeRef::named("String"))
                        .resolve(|_, _, _, _| Deferred::resolved("b".into())),
                ),
        )
        .register(ObjectType::new("__Schema").field(MetaField::new("description", TypeRef::named("String"))))
        .register(ObjectType::new("__Type").field(MetaField::new("name", TypeRef::named("String"))))
        .introspection(
            MetaField::new("__schema", TypeRef::named("__Schema").non_null())
                .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::map([("description", "library")]))),
            MetaField::new("__type", TypeRef::named("__Type"))
                .argument(MetaInputValue::new("name", TypeRef::named("String").non_null()))
                .resolve(|_, arguments, _, _| {
                    Deferred::resolved(ResolvedValue::map([(
                        "name",
                        ResolvedValue::from(arguments.get_as::<String>("name").ok().flatten()),
                    )]))
                }),
        )
        .build()
        .unwrap()
}

fn execute(executor: &Executor, request: ExecutionRequest) -> serde_json::Value {
    let result = executor.execute(request).wait().unwrap();
    serde_json::to_value(result).unwrap()
}

fn query(query: &str) -> ExecutionRequest {
    ExecutionRequest::new(Document::parse(query).unwrap())
}

#[test]
fn documents_without_operations() {
    let parsed = Document::parse("query { a } fragment F on Query { b }").unwrap();
    let fragments_only = parsed
        .definitions()
        .iter()
        .filter(|definition| matches!(definition, Definition::Fragment { .. }))
        .cloned()
        .collect();

    assert_eq!(
        execute(&Executor::new(schema()), ExecutionRequest::new(Document::new(fragments_only))),
        json!({"errors": [{"message": "Must provide an operation."}]})
    );
}

#[test]
fn selecting_an_operation_by_name() {
    let executor = Executor::new(schema());
    let document = "query A { a } query B { b }";

    assert_eq!(
        execute(&executor, query(document)),
        json!({"errors": [{"message": "Must provide operation name if query contains multiple operations."}]})
    );
    assert_eq!(
        execute(&executor, query(document).operation_name("C")),
        json!({"errors": [{"message": "Unknown operation named \"C\"."}]})
    );
    assert_eq!(
        execute(&executor, query(document).operation_name("B")),
        json!({"data": {"b": "b"}})
    );
}

#[test]
fn missing_root_types() {
    let executor = Executor::new(schema());

    insta::assert_json_snapshot!(execute(&executor, query("mutation { a }")), @r###"
    {
      "errors": [
        {
          "message": "Schema is not configured for mutations.",
          "locations": [
            {
              "line": 1,
              "column": 1
            }
          ]
        }
      ]
    }
    "###);

    assert_eq!(
        execute(&executor, query("subscription { a }"))["errors"][0]["message"],
        json!("Schema is not configured for subscriptions.")
    );
}

#[test]
fn type_system_definitions_are_not_executable() {
    let document = Document::parse("{ a }")
        .unwrap()
        .with_type_system(async_graphql_parser::parse_schema("type Foo { a: Int }").unwrap());

    assert_eq!(
        execute(&Executor::new(schema()), ExecutionRequest::new(document)),
        json!({
            "errors": [{
                "message": "GraphQL cannot execute a request containing a ObjectTypeDefinition.",
                "locations": [{"line": 1, "column": 1}],
            }]
        })
    );
}

#[test]
fn introspection_fields() {
    let enabled = Executor::new(schema());
    assert_eq!(
        execute(
            &enabled,
            query(r#"{ __typename __schema { description } __type(name: "Query") { name } }"#)
        ),
        json!({
            "data": {
                "__typename": "Query",
                "__schema": {"description": "library"},
                "__type": {"name": "Query"},
            }
        })
    );

    let config: ExecutorConfig = toml::from_str("introspection = false").unwrap();
    let disabled = Executor::new(schema()).with_config(config);
    assert_eq!(
        execute(&disabled, query(r#"{ a __typename __type(name: "Query") { name } }"#)),
        json!({
            "data": {"a": "a", "__typename": "Query", "__type": null},
            "errors": [{
                "message": "Introspection is disabled.",
                "locations": [{"line": 1, "column": 16}],
                "path": ["__type"],
            }],
        })
    );
    assert_eq!(
        execute(&disabled, query("{ a __schema { description } }")),
        json!({
            "data": null,
            "errors": [{
                "message": "Introspection is disabled.",
                "locations": [{"line": 1, "column": 5}],
                "path": ["__schema"],
            }],
        })
    );
}
