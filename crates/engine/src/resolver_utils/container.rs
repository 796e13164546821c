use async_graphql_parser::{Positioned, types::Field};
use async_graphql_value::{ConstValue, Name};
use error::GraphqlError;
use futures_util::{FutureExt, future::BoxFuture};
use indexmap::IndexMap;

use super::{Completed, field::execute_field, try_nullify};
use crate::{
    ResolvedValue,
    context::{ExecutionContext, selection_set::GroupedFields},
    deferred::join_in_order,
    path::QueryPath,
    registry::{ObjectType, TypeRef},
};

/// Marks a null that must replace the nearest nullable ancestor. The error behind it has
/// already been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PropagateNull;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    /// Every field is started before any is awaited.
    Normal,
    /// A field starts once the previous one fully completed, as mutation root fields do.
    Sequential,
}

struct PlannedField<'a> {
    response_key: &'a str,
    nodes: &'a [&'a Positioned<Field>],
    ty: &'a TypeRef,
}

pub(crate) fn execute_selection_set<'a>(
    ctx: &'a ExecutionContext<'a>,
    object_type: &'a ObjectType,
    source: &'a ResolvedValue,
    fields: GroupedFields<'a>,
    path: QueryPath,
    mode: ExecutionMode,
) -> BoxFuture<'a, Completed> {
    async move {
        let mut planned = Vec::with_capacity(fields.len());
        let mut futures = Vec::with_capacity(fields.len());

        for (response_key, nodes) in &fields {
            let Some((definition, future)) =
                execute_field(ctx, object_type, source, nodes, path.child(*response_key))
            else {
                continue;
            };
            planned.push(PlannedField {
                response_key: *response_key,
                nodes,
                ty: &definition.ty,
            });
            futures.push(future);
        }

        let mut object = IndexMap::with_capacity(planned.len());

        match mode {
            ExecutionMode::Normal => {
                let slots = join_in_order(ctx.adapter, futures).await;
                for (field, slot) in planned.iter().zip(slots) {
                    let completed = slot.unwrap_or_else(|| unsettled_field(ctx, field, &path));
                    object.insert(Name::new(field.response_key), completed?);
                }
            }
            ExecutionMode::Sequential => {
                for (field, future) in planned.iter().zip(futures) {
                    let completed = future.await;
                    if completed.is_err() {
                        tracing::debug!(
                            field = field.response_key,
                            "null propagated to the root, skipping remaining fields"
                        );
                    }
                    object.insert(Name::new(field.response_key), completed?);
                }
            }
        }

        Ok(ConstValue::Object(object))
    }
    .boxed()
}

fn unsettled_field(ctx: &ExecutionContext<'_>, field: &PlannedField<'_>, path: &QueryPath) -> Completed {
    ctx.add_completion_error(
        GraphqlError::internal_server_error().with_debug_message("field was never completed"),
        field.nodes,
        &path.child(field.response_key),
    );
    try_nullify(field.ty, Err(PropagateNull))
}
