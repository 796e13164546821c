use std::borrow::Cow;

use async_graphql_value::ConstValue;
use error::GraphqlError;
use futures_util::{FutureExt, future::BoxFuture};

use super::{Completed, PropagateNull, complete_value, try_nullify};
use crate::{
    ResolvedValue,
    context::{ExecutionContext, ResolveInfo},
    deferred::join_in_order,
    path::QueryPath,
    registry::TypeRef,
};

pub(super) async fn complete_list_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    item_ty: &'a TypeRef,
    info: &'a ResolveInfo<'a>,
    path: QueryPath,
    value: &'a ResolvedValue,
) -> Completed {
    let items: Cow<'_, [ResolvedValue]> = match value {
        ResolvedValue::List(items) => Cow::Borrowed(items),
        ResolvedValue::Value(ConstValue::List(items)) => {
            Cow::Owned(items.iter().cloned().map(ResolvedValue::Value).collect())
        }
        _ => {
            ctx.add_completion_error(
                GraphqlError::field_error(format!(
                    "Expected Iterable, but did not find one for field \"{}.{}\".",
                    info.parent_type.name, info.field_name
                )),
                info.field_nodes,
                &path,
            );
            return Err(PropagateNull);
        }
    };

    let futures = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let item_path = path.child(index);
            async move { try_nullify(item_ty, complete_value(ctx, item_ty, info, item_path, item).await) }.boxed()
        })
        .collect::<Vec<BoxFuture<'_, Completed>>>();

    join_in_order(ctx.adapter, futures)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                ctx.add_completion_error(
                    GraphqlError::internal_server_error().with_debug_message("list item was never completed"),
                    info.field_nodes,
                    &path.child(index),
                );
                try_nullify(item_ty, Err(PropagateNull))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ConstValue::List)
}
