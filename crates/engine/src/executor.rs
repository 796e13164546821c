use std::{future::Future, sync::Arc};

use async_graphql_parser::types::OperationType;
use async_graphql_value::ConstValue;
use error::GraphqlError;
use futures_util::FutureExt;

use crate::{
    Data, Deferred, ResolvedValue,
    coercion::coerce_variable_values,
    config::{ConcurrencyMode, ExecutorConfig},
    context::{ExecutionContext, selection_set::collect_fields},
    deferred::{ConcurrentPromiseAdapter, PromiseAdapter, SyncPromiseAdapter},
    operation::{Document, operation_kind, select_operation, select_root_type},
    path::QueryPath,
    registry::{FieldResolver, Schema},
    resolver_utils::{ExecutionMode, execute_selection_set},
    response::ExecutionResult,
};

/// Everything a single execution needs besides the schema.
pub struct ExecutionRequest {
    document: Document,
    operation_name: Option<String>,
    variables: serde_json::Map<String, serde_json::Value>,
    root_value: ResolvedValue,
    data: Data,
    field_resolver: Option<FieldResolver>,
}

impl ExecutionRequest {
    pub fn new(document: impl Into<Document>) -> Self {
        ExecutionRequest {
            document: document.into(),
            operation_name: None,
            variables: serde_json::Map::new(),
            root_value: ResolvedValue::Null,
            data: Data::new(),
            field_resolver: None,
        }
    }

    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Raw variable values, as found in the request body.
    #[must_use]
    pub fn variables(mut self, variables: serde_json::Map<String, serde_json::Value>) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn root_value(mut self, root_value: impl Into<ResolvedValue>) -> Self {
        self.root_value = root_value.into();
        self
    }

    #[must_use]
    pub fn data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    /// Resolver used for fields that do not define their own.
    #[must_use]
    pub fn field_resolver(mut self, resolver: FieldResolver) -> Self {
        self.field_resolver = Some(resolver);
        self
    }
}

/// Executes operations against a schema.
///
/// The schema is shared and never mutated, so one executor serves any number of concurrent
/// executions.
pub struct Executor {
    schema: Arc<Schema>,
    config: ExecutorConfig,
    promise_adapter: Option<Arc<dyn PromiseAdapter>>,
}

impl Executor {
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Executor {
            schema: schema.into(),
            config: ExecutorConfig::default(),
            promise_adapter: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the adapter picked from [`ExecutorConfig::concurrency`].
    #[must_use]
    pub fn with_promise_adapter(mut self, adapter: impl PromiseAdapter + 'static) -> Self {
        self.promise_adapter = Some(Arc::new(adapter));
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Ready right away when no resolver suspended.
    pub fn execute(&self, request: ExecutionRequest) -> Deferred<'_, ExecutionResult> {
        let adapter: &dyn PromiseAdapter = match (&self.promise_adapter, self.config.concurrency) {
            (Some(adapter), _) => adapter.as_ref(),
            (None, ConcurrencyMode::Sequential) => &SyncPromiseAdapter,
            (None, ConcurrencyMode::Concurrent) => &ConcurrentPromiseAdapter,
        };

        settle(execute_request(&self.schema, &self.config, adapter, request))
    }

    /// Serializes a result with the debug details enabled in the configuration.
    pub fn serialize(&self, result: &ExecutionResult) -> serde_json::Value {
        result.to_value(self.config.debug.flags())
    }
}

/// Executes `document` with the default configuration, running resolvers one after the other.
pub fn execute<'a>(
    schema: &'a Schema,
    document: impl Into<Document>,
    root_value: impl Into<ResolvedValue>,
    data: Data,
    variables: serde_json::Map<String, serde_json::Value>,
    operation_name: Option<&str>,
    field_resolver: Option<FieldResolver>,
) -> Deferred<'a, ExecutionResult> {
    let mut request = ExecutionRequest::new(document)
        .root_value(root_value)
        .data(data)
        .variables(variables);
    request.operation_name = operation_name.map(str::to_string);
    request.field_resolver = field_resolver;

    settle(async move {
        let config = ExecutorConfig::default();
        execute_request(schema, &config, &SyncPromiseAdapter, request).await
    })
}

fn settle<'a>(future: impl Future<Output = ExecutionResult> + Send + 'a) -> Deferred<'a, ExecutionResult> {
    let mut future = future.boxed();
    match (&mut future).now_or_never() {
        Some(result) => Deferred::resolved(result),
        None => Deferred::from_future(future.map(Ok)),
    }
}

async fn execute_request(
    schema: &Schema,
    config: &ExecutorConfig,
    adapter: &dyn PromiseAdapter,
    request: ExecutionRequest,
) -> ExecutionResult {
    let ExecutionRequest {
        document,
        operation_name,
        variables,
        root_value,
        data,
        field_resolver,
    } = request;

    let (name, operation) = match select_operation(&document, operation_name.as_deref()) {
        Ok(selected) => selected,
        Err(err) => {
            tracing::debug!(error = %err, "no operation to execute");
            return ExecutionResult::from_errors([GraphqlError::from(err)]);
        }
    };

    let root_type = match select_root_type(schema, operation) {
        Ok(root_type) => root_type,
        Err(err) => {
            tracing::debug!(error = %err, "unsupported operation");
            return ExecutionResult::from_errors([GraphqlError::from(err)]);
        }
    };

    let variables = match coerce_variable_values(
        schema,
        &operation.node.variable_definitions,
        &variables,
        config.validate_variables,
    ) {
        Ok(variables) => variables,
        Err(errors) => {
            tracing::debug!(errors = errors.len(), "invalid variables");
            return ExecutionResult::from_errors(errors.into_iter().map(GraphqlError::from));
        }
    };

    let kind = operation_kind(operation.node.ty);
    tracing::debug!(operation = name.map(|name| name.as_str()), kind, "executing operation");

    let ctx = ExecutionContext::new(
        schema,
        document.fragments(),
        &root_value,
        &data,
        &variables,
        operation,
        field_resolver.as_ref(),
        adapter,
        config,
    );

    let fields = collect_fields(&ctx, root_type, &operation.node.selection_set.node);
    let mode = match operation.node.ty {
        OperationType::Mutation => ExecutionMode::Sequential,
        OperationType::Query | OperationType::Subscription => ExecutionMode::Normal,
    };

    let completed = execute_selection_set(&ctx, root_type, &root_value, fields, QueryPath::empty(), mode).await;
    let errors = ctx.into_errors();

    tracing::debug!(operation = name.map(|name| name.as_str()), kind, errors = errors.len(), "operation executed");

    ExecutionResult {
        data: Some(completed.unwrap_or(ConstValue::Null)),
        errors,
        extensions: None,
    }
}
