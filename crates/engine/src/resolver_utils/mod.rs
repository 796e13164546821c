//! Field execution and value completion.

mod abstract_type;
mod container;
mod field;
mod leaf;
mod list;

use async_graphql_value::ConstValue;
use error::GraphqlError;
use futures_util::{FutureExt, future::BoxFuture};

pub(crate) use container::{ExecutionMode, PropagateNull, execute_selection_set};
pub use field::default_field_resolver;

use crate::{
    ResolvedValue,
    context::{ExecutionContext, ResolveInfo},
    path::QueryPath,
    registry::{MetaType, TypeRef},
};

/// Outcome of completing a value. `Err` asks the nearest nullable ancestor to become null.
pub(crate) type Completed = Result<ConstValue, PropagateNull>;

/// Absorbs a propagated null when `ty` is nullable.
pub(crate) fn try_nullify(ty: &TypeRef, completed: Completed) -> Completed {
    match completed {
        Err(PropagateNull) if !ty.is_non_null() => Ok(ConstValue::Null),
        completed => completed,
    }
}

/// Completes a resolved value against the type it was declared with.
///
/// Errors are recorded on the context at `path` before propagating.
pub(crate) fn complete_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    ty: &'a TypeRef,
    info: &'a ResolveInfo<'a>,
    path: QueryPath,
    value: &'a ResolvedValue,
) -> BoxFuture<'a, Completed> {
    async move {
        if let ResolvedValue::Error(error) = value {
            ctx.add_field_error(error.clone(), info.field_nodes, &path);
            return Err(PropagateNull);
        }

        match ty {
            TypeRef::NonNull(inner) => match complete_value(ctx, inner, info, path.clone(), value).await? {
                ConstValue::Null => {
                    ctx.add_completion_error(
                        GraphqlError::field_error(format!(
                            "Cannot return null for non-nullable field {}.{}.",
                            info.parent_type.name, info.field_name
                        )),
                        info.field_nodes,
                        &path,
                    );
                    Err(PropagateNull)
                }
                completed => Ok(completed),
            },
            _ if value.is_null() => Ok(ConstValue::Null),
            TypeRef::List(item_ty) => list::complete_list_value(ctx, item_ty, info, path, value).await,
            TypeRef::Named(name) => match ctx.schema.lookup(name) {
                Some(MetaType::Scalar(scalar)) => leaf::complete_scalar_value(ctx, scalar, info, &path, value),
                Some(MetaType::Enum(enum_type)) => leaf::complete_enum_value(ctx, enum_type, info, &path, value),
                Some(MetaType::Object(object_type)) => {
                    abstract_type::complete_object_value(ctx, object_type, info, path, value, false).await
                }
                Some(abstract_type @ (MetaType::Interface(_) | MetaType::Union(_))) => {
                    abstract_type::complete_abstract_value(ctx, abstract_type, info, path, value).await
                }
                Some(MetaType::InputObject(_)) | None => {
                    tracing::warn!(ty = %name, "field type cannot be completed");
                    ctx.add_completion_error(
                        GraphqlError::internal_server_error()
                            .with_debug_message(format!("Cannot complete value of unexpected output type: \"{name}\"")),
                        info.field_nodes,
                        &path,
                    );
                    Err(PropagateNull)
                }
            },
        }
    }
    .boxed()
}
