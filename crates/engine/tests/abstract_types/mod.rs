use std::sync::{Arc, Mutex};

use engine::{
    ConstValue, Data, Deferred, Document, Error, ExecutionRequest, Executor, ObjectValue, ResolvedValue,
    registry::{
        InterfaceType, MetaField, ObjectType, ResolvedType, Schema, SchemaBuilder, TypeRef, TypeResolver, UnionType,
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::run;

struct Dog {
    name: &'static str,
    woofs: bool,
}

impl ObjectValue for Dog {
    fn field(&self, name: &str) -> Option<ResolvedValue> {
        match name {
            "name" => Some(self.name.into()),
            "woofs" => Some(self.woofs.into()),
            _ => None,
        }
    }
}

struct Cat {
    name: &'static str,
    meows: bool,
}

impl ObjectValue for Cat {
    fn field(&self, name: &str) -> Option<ResolvedValue> {
        match name {
            "name" => Some(self.name.into()),
            "meows" => Some(self.meows.into()),
            _ => None,
        }
    }
}

fn pets() -> ResolvedValue {
    ResolvedValue::list([
        ResolvedValue::object(Dog {
            name: "Odie",
            woofs: true,
        }),
        ResolvedValue::object(Cat {
            name: "Garfield",
            meows: false,
        }),
    ])
}

fn animals(query_field: MetaField) -> SchemaBuilder {
    Schema::builder("Query")
        .register(ObjectType::new("Query").field(query_field))
        .register(InterfaceType::new("Pet").field(MetaField::new("name", TypeRef::named("String"))))
        .register(
            ObjectType::new("Dog")
                .implements("Pet")
                .field(MetaField::new("name", TypeRef::named("String")))
                .field(MetaField::new("woofs", TypeRef::named("Boolean")))
                .is_type_of(|value, _, _| Deferred::resolved(value.downcast_ref::<Dog>().is_some())),
        )
        .register(
            ObjectType::new("Cat")
                .implements("Pet")
                .field(MetaField::new("name", TypeRef::named("String")))
                .field(MetaField::new("meows", TypeRef::named("Boolean")))
                .is_type_of(|value, _, _| Deferred::resolved(value.downcast_ref::<Cat>().is_some())),
        )
}

#[test]
fn interfaces_resolve_with_is_type_of() {
    let schema = animals(
        MetaField::new("pets", TypeRef::named("Pet").list()).resolve(|_, _, _, _| Deferred::resolved(pets())),
    )
    .build()
    .unwrap();

    insta::assert_json_snapshot!(
        run(&schema, "{ pets { name ... on Dog { woofs } ... on Cat { meows } } }"),
        @r###"
    {
      "data": {
        "pets": [
          {
            "name": "Odie",
            "woofs": true
          },
          {
            "name": "Garfield",
            "meows": false
          }
        ]
      }
    }
    "###
    );
}

#[test]
fn concrete_fields_check_is_type_of() {
    let schema = animals(
        MetaField::new("dog", TypeRef::named("Dog"))
            .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::map([("name", "Tom")]))),
    )
    .build()
    .unwrap();

    assert_eq!(
        run(&schema, "{ dog { name } }"),
        json!({
            "data": {"dog": null},
            "errors": [{
                "message": "Expected value of type \"Dog\" but got: {\"name\":\"Tom\"}.",
                "locations": [{"line": 1, "column": 3}],
                "path": ["dog"],
            }],
        })
    );
}

fn search(resolve_type: Option<TypeResolver>) -> Schema {
    let mut union = UnionType::new("SearchResult").member("Book").member("Author");
    if let Some(resolve_type) = resolve_type {
        union = union.resolve_type(resolve_type);
    }

    Schema::builder("Query")
        .register(
            ObjectType::new("Query").field(
                MetaField::new("search", TypeRef::named("SearchResult"))
                    .resolve(|_, _, _, _| {
                        Deferred::resolved(ResolvedValue::map([("kind", "book"), ("title", "Dune")]))
                    }),
            ),
        )
        .register(union)
        .register(ObjectType::new("Book").field(MetaField::new("title", TypeRef::named("String"))))
        .register(ObjectType::new("Author").field(MetaField::new("name", TypeRef::named("String"))))
        .build()
        .unwrap()
}

fn search_error(resolve_type: Option<TypeResolver>) -> serde_json::Value {
    let response = run(&search(resolve_type), "{ search { ... on Book { title } } }");
    assert_eq!(response["data"], json!({"search": null}));
    response["errors"][0]["message"].clone()
}

#[test]
fn resolve_type_picks_the_runtime_type() {
    let resolver = TypeResolver::new(|value, _, _| {
        let kind = match value {
            ResolvedValue::Map(entries) => entries.get("kind").and_then(ResolvedValue::to_const_value),
            _ => None,
        };
        let name = match kind {
            Some(ConstValue::String(kind)) if kind == "book" => "Book",
            _ => "Author",
        };
        Deferred::resolved(Some(ResolvedType::from(name)))
    });

    assert_eq!(
        run(&search(Some(resolver)), "{ search { __typename ... on Book { title } } }"),
        json!({"data": {"search": {"__typename": "Book", "title": "Dune"}}})
    );
}

#[test]
fn abstract_type_resolution_errors() {
    assert_eq!(
        search_error(None),
        json!(
            "Abstract type \"SearchResult\" must resolve to an Object type at runtime for field \"Query.search\". \
             Either the \"SearchResult\" type should provide a \"resolveType\" function or each possible type \
             should provide an \"isTypeOf\" function."
        )
    );

    assert_eq!(
        search_error(Some(TypeResolver::new(|_, _, _| Deferred::resolved(Some(ResolvedType::from("Bird")))))),
        json!("Abstract type \"SearchResult\" was resolved to a type \"Bird\" that does not exist inside the schema.")
    );

    assert_eq!(
        search_error(Some(TypeResolver::new(|_, _, info| {
            Deferred::resolved(Some(ResolvedType::Object(info.parent_type)))
        }))),
        json!("Runtime Object type \"Query\" is not a possible type for \"SearchResult\".")
    );

    assert_eq!(
        search_error(Some(TypeResolver::new(|_, _, _| Deferred::resolved(None)))),
        search_error(None)
    );

    assert_eq!(
        search_error(Some(TypeResolver::new(|_, _, _| Deferred::rejected(Error::new("lookup failed"))))),
        json!("lookup failed")
    );
}

#[derive(Clone, Default)]
struct Trials(Arc<Mutex<Vec<&'static str>>>);

impl Trials {
    fn record(&self, name: &'static str) {
        self.0.lock().unwrap().push(name);
    }

    fn recorded(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn is_type_of_trials_may_suspend() {
    let schema = Schema::builder("Query")
        .register(
            ObjectType::new("Query").field(
                MetaField::new("pets", TypeRef::named("Pet").non_null().list())
                    .resolve(|_, _, _, _| Deferred::resolved(pets())),
            ),
        )
        .register(InterfaceType::new("Pet").field(MetaField::new("name", TypeRef::named("String"))))
        .register(
            ObjectType::new("Dog")
                .implements("Pet")
                .field(MetaField::new("name", TypeRef::named("String")))
                .is_type_of(|value, data, _| {
                    let is_dog = value.downcast_ref::<Dog>().is_some();
                    Deferred::from_future(async move {
                        tokio::task::yield_now().await;
                        if let Some(trials) = data.get::<Trials>() {
                            trials.record("dog");
                        }
                        Ok(is_dog)
                    })
                }),
        )
        .register(
            ObjectType::new("Cat")
                .implements("Pet")
                .field(MetaField::new("name", TypeRef::named("String")))
                .is_type_of(|value, data, _| {
                    let is_cat = value.downcast_ref::<Cat>().is_some();
                    Deferred::from_future(async move {
                        tokio::task::yield_now().await;
                        if let Some(trials) = data.get::<Trials>() {
                            trials.record("cat");
                        }
                        Ok(is_cat)
                    })
                }),
        )
        .build()
        .unwrap();

    let trials = Trials::default();
    let request = ExecutionRequest::new(Document::parse("{ pets { __typename name } }").unwrap())
        .data(Data::new().with(trials.clone()));

    let executor = Executor::new(schema);
    let pending = executor.execute(request);
    assert!(!pending.is_ready());

    let result = pending.await.unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "data": {
                "pets": [
                    {"__typename": "Dog", "name": "Odie"},
                    {"__typename": "Cat", "name": "Garfield"},
                ]
            }
        })
    );
    // Each possible type is tried in turn, and the accepted one is not checked again.
    assert_eq!(trials.recorded(), ["dog", "dog", "cat"]);
}
