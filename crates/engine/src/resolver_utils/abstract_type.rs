use error::{ErrorCode, GraphqlError};

use super::{Completed, ExecutionMode, PropagateNull, execute_selection_set};
use crate::{
    ResolvedValue,
    context::{ExecutionContext, ResolveInfo, selection_set::collect_subfields},
    path::QueryPath,
    registry::{MetaType, ObjectType, ResolvedType},
};

pub(super) async fn complete_abstract_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    abstract_type: &'a MetaType,
    info: &'a ResolveInfo<'a>,
    path: QueryPath,
    value: &'a ResolvedValue,
) -> Completed {
    let (object_type, verified) = resolve_runtime_type(ctx, abstract_type, info, &path, value).await?;
    complete_object_value(ctx, object_type, info, path, value, verified).await
}

/// Executes the merged sub-selection of the field against `value`.
///
/// The object type's `is_type_of`, when present, is checked first unless `verified` says it
/// already accepted this value.
pub(super) async fn complete_object_value<'a>(
    ctx: &'a ExecutionContext<'a>,
    object_type: &'a ObjectType,
    info: &'a ResolveInfo<'a>,
    path: QueryPath,
    value: &'a ResolvedValue,
    verified: bool,
) -> Completed {
    if let Some(is_type_of) = object_type.is_type_of.as_ref().filter(|_| !verified) {
        match is_type_of.call(value, ctx.data, info).await {
            Ok(true) => {}
            Ok(false) => {
                ctx.add_completion_error(
                    GraphqlError::field_error(format!(
                        "Expected value of type \"{}\" but got: {}.",
                        object_type.name,
                        value.describe()
                    )),
                    info.field_nodes,
                    &path,
                );
                return Err(PropagateNull);
            }
            Err(error) => {
                ctx.add_field_error(error, info.field_nodes, &path);
                return Err(PropagateNull);
            }
        }
    }

    let fields = collect_subfields(ctx, object_type, info.field_nodes);
    execute_selection_set(ctx, object_type, value, fields, path, ExecutionMode::Normal).await
}

/// Picks the object type of an interface or union value.
///
/// A `resolve_type` on the abstract type is the only source of truth when present. Otherwise
/// the possible types' `is_type_of` run one after the other until one accepts the value, in
/// which case the returned flag is set.
async fn resolve_runtime_type<'a>(
    ctx: &'a ExecutionContext<'a>,
    abstract_type: &'a MetaType,
    info: &'a ResolveInfo<'a>,
    path: &QueryPath,
    value: &'a ResolvedValue,
) -> Result<(&'a ObjectType, bool), PropagateNull> {
    let abstract_name = abstract_type.name();

    if let Some(resolve_type) = abstract_type.resolve_type() {
        return match resolve_type.call(value, ctx.data, info).await {
            Ok(Some(resolved)) => ensure_valid_runtime_type(ctx, abstract_name, &resolved)
                .map(|object_type| (object_type, false))
                .map_err(|error| {
                    ctx.add_completion_error(error, info.field_nodes, path);
                    PropagateNull
                }),
            Ok(None) => {
                ctx.add_completion_error(unresolved_type_error(abstract_name, info), info.field_nodes, path);
                Err(PropagateNull)
            }
            Err(error) => {
                ctx.add_field_error(error, info.field_nodes, path);
                Err(PropagateNull)
            }
        };
    }

    for candidate in ctx.schema.possible_types(abstract_name) {
        let Some(is_type_of) = &candidate.is_type_of else {
            continue;
        };

        match is_type_of.call(value, ctx.data, info).await {
            Ok(true) => {
                tracing::trace!(abstract_type = abstract_name, object_type = %candidate.name, "resolved runtime type");
                return Ok((candidate, true));
            }
            Ok(false) => {}
            Err(error) => {
                ctx.add_field_error(error, info.field_nodes, path);
                return Err(PropagateNull);
            }
        }
    }

    ctx.add_completion_error(unresolved_type_error(abstract_name, info), info.field_nodes, path);
    Err(PropagateNull)
}

fn ensure_valid_runtime_type<'a>(
    ctx: &ExecutionContext<'a>,
    abstract_name: &str,
    resolved: &ResolvedType<'_>,
) -> Result<&'a ObjectType, GraphqlError> {
    let name = resolved.name();

    let object_type = match ctx.schema.lookup(name) {
        Some(MetaType::Object(object_type)) => object_type,
        Some(_) => {
            return Err(abstract_type_error(format!(
                "Abstract type \"{abstract_name}\" was resolved to a non-object type \"{name}\"."
            )));
        }
        None => {
            return Err(abstract_type_error(format!(
                "Abstract type \"{abstract_name}\" was resolved to a type \"{name}\" \
                 that does not exist inside the schema."
            )));
        }
    };

    if !ctx.schema.is_possible_type(abstract_name, name) {
        return Err(abstract_type_error(format!(
            "Runtime Object type \"{name}\" is not a possible type for \"{abstract_name}\"."
        )));
    }

    Ok(object_type)
}

fn unresolved_type_error(abstract_name: &str, info: &ResolveInfo<'_>) -> GraphqlError {
    abstract_type_error(format!(
        "Abstract type \"{abstract_name}\" must resolve to an Object type at runtime for field \"{}.{}\". \
         Either the \"{abstract_name}\" type should provide a \"resolveType\" function or each possible type should \
         provide an \"isTypeOf\" function.",
        info.parent_type.name, info.field_name
    ))
}

fn abstract_type_error(message: String) -> GraphqlError {
    GraphqlError::new(message, ErrorCode::AbstractTypeError)
}
