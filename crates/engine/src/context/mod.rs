pub(crate) mod selection_set;

use std::sync::Mutex;

use async_graphql_parser::{
    Pos, Positioned,
    types::{Field, OperationDefinition},
};
use error::{ErrorPath, GraphqlError, Location};

use crate::{
    Data, Error, ResolvedValue, Variables,
    config::ExecutorConfig,
    deferred::PromiseAdapter,
    operation::Fragments,
    path::QueryPath,
    registry::{FieldResolver, ObjectType, Schema, TypeRef},
};

pub(crate) fn location(pos: Pos) -> Location {
    Location::new(
        u32::try_from(pos.line).unwrap_or(u32::MAX),
        u32::try_from(pos.column).unwrap_or(u32::MAX),
    )
}

/// Everything a resolver may want to know about the field being resolved.
pub struct ResolveInfo<'a> {
    pub field_name: &'a str,
    /// Every field node merged under this response key.
    pub field_nodes: &'a [&'a Positioned<Field>],
    pub return_type: &'a TypeRef,
    pub parent_type: &'a ObjectType,
    pub path: &'a QueryPath,
    pub schema: &'a Schema,
    pub fragments: &'a Fragments<'a>,
    pub root_value: &'a ResolvedValue,
    pub operation: &'a Positioned<OperationDefinition>,
    pub variable_values: &'a Variables,
}

impl ResolveInfo<'_> {
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.field_nodes.iter().map(|field| location(field.pos))
    }
}

/// State shared by every field of a single execution.
pub(crate) struct ExecutionContext<'a> {
    pub schema: &'a Schema,
    pub fragments: Fragments<'a>,
    pub root_value: &'a ResolvedValue,
    pub data: &'a Data,
    pub variables: &'a Variables,
    pub operation: &'a Positioned<OperationDefinition>,
    pub field_resolver: Option<&'a FieldResolver>,
    pub adapter: &'a dyn PromiseAdapter,
    pub config: &'a ExecutorConfig,
    errors: Mutex<Vec<GraphqlError>>,
}

impl<'a> ExecutionContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        schema: &'a Schema,
        fragments: Fragments<'a>,
        root_value: &'a ResolvedValue,
        data: &'a Data,
        variables: &'a Variables,
        operation: &'a Positioned<OperationDefinition>,
        field_resolver: Option<&'a FieldResolver>,
        adapter: &'a dyn PromiseAdapter,
        config: &'a ExecutorConfig,
    ) -> Self {
        ExecutionContext {
            schema,
            fragments,
            root_value,
            data,
            variables,
            operation,
            field_resolver,
            adapter,
            config,
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn add_error(&self, error: GraphqlError) {
        tracing::trace!(message = %error.message, "field error");
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(error);
    }

    /// Records a resolver error at the position of `fields`.
    pub fn add_field_error(&self, error: Error, fields: &[&Positioned<Field>], path: &QueryPath) {
        self.add_error(
            error
                .into_graphql_error()
                .with_locations(fields.iter().map(|field| location(field.pos)))
                .with_path(ErrorPath::from(path)),
        );
    }

    /// Records an error raised by the executor itself while completing `fields`.
    pub fn add_completion_error(&self, error: GraphqlError, fields: &[&Positioned<Field>], path: &QueryPath) {
        self.add_error(
            error
                .with_locations(fields.iter().map(|field| location(field.pos)))
                .with_path(ErrorPath::from(path)),
        );
    }

    pub fn into_errors(self) -> Vec<GraphqlError> {
        self.errors.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
