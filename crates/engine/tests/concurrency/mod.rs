use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use engine::{
    ConcurrentPromiseAdapter, Data, Deferred, Document, ExecutionRequest, Executor, ExecutorConfig, ResolvedValue,
    registry::{MetaField, ObjectType, Schema, TypeRef},
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A field that sleeps for `millis` before resolving to its own name.
fn slow(name: &'static str, millis: u64) -> MetaField {
    MetaField::new(name, TypeRef::named("String")).resolve(move |_, _, data, _| {
        let log = data.get::<Log>().cloned().unwrap_or_default();
        Deferred::from_future(async move {
            log.push(format!("start {name}"));
            tokio::time::sleep(Duration::from_millis(millis)).await;
            log.push(format!("end {name}"));
            Ok(ResolvedValue::from(name))
        })
    })
}

fn schema() -> Schema {
    Schema::builder("Query")
        .register(
            ObjectType::new("Query")
                .field(slow("a", 30))
                .field(slow("b", 5))
                .field(slow("c", 15)),
        )
        .register(
            ObjectType::new("Mutation")
                .field(slow("first", 20))
                .field(slow("second", 1))
                .field(
                    MetaField::new("create", TypeRef::named("Payload"))
                        .resolve(|_, _, _, _| Deferred::resolved(ResolvedValue::map([("kind", "payload")]))),
                ),
        )
        .register(ObjectType::new("Payload").field(slow("id", 20)).field(slow("label", 5)))
        .mutation("Mutation")
        .build()
        .unwrap()
}

fn request(query: &str, log: &Log) -> ExecutionRequest {
    ExecutionRequest::new(Document::parse(query).unwrap()).data(Data::new().with(log.clone()))
}

#[tokio::test]
async fn response_order_follows_the_selection() {
    let log = Log::default();
    let executor = Executor::new(schema()).with_promise_adapter(ConcurrentPromiseAdapter);

    let pending = executor.execute(request("{ a b c }", &log));
    assert!(!pending.is_ready());

    let result = pending.await.unwrap();
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"data":{"a":"a","b":"b","c":"c"}}"#
    );

    let finished = log
        .entries()
        .into_iter()
        .filter_map(|entry| entry.strip_prefix("end ").map(str::to_string))
        .collect::<Vec<_>>();
    assert_eq!(finished, ["b", "c", "a"]);
}

#[tokio::test]
async fn concurrency_is_configurable() {
    let log = Log::default();
    let config: ExecutorConfig = toml::from_str(r#"concurrency = "concurrent""#).unwrap();
    let executor = Executor::new(schema()).with_config(config);

    let result = executor.execute(request("{ c b }", &log)).await.unwrap();
    assert_eq!(serde_json::to_value(result).unwrap(), json!({"data": {"c": "c", "b": "b"}}));
    assert_eq!(log.entries(), ["start c", "start b", "end b", "end c"]);
}

#[tokio::test]
async fn sequential_adapter_runs_one_field_at_a_time() {
    let log = Log::default();
    let executor = Executor::new(schema());

    executor.execute(request("{ c b }", &log)).await.unwrap();
    assert_eq!(log.entries(), ["start c", "end c", "start b", "end b"]);
}

#[tokio::test]
async fn mutation_fields_run_in_order() {
    let log = Log::default();
    let executor = Executor::new(schema()).with_promise_adapter(ConcurrentPromiseAdapter);

    let result = executor
        .execute(request("mutation { first second again: first }", &log))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(result).unwrap(),
        json!({"data": {"first": "first", "second": "second", "again": "first"}})
    );
    assert_eq!(
        log.entries(),
        ["start first", "end first", "start second", "end second", "start first", "end first"]
    );
}

#[tokio::test]
async fn mutation_fields_wait_for_nested_fields() {
    let log = Log::default();
    let executor = Executor::new(schema()).with_promise_adapter(ConcurrentPromiseAdapter);

    let result = executor
        .execute(request("mutation { create { id label } second }", &log))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(result).unwrap(),
        json!({"data": {"create": {"id": "id", "label": "label"}, "second": "second"}})
    );
    assert_eq!(
        log.entries(),
        ["start id", "start label", "end label", "end id", "start second", "end second"]
    );
}
