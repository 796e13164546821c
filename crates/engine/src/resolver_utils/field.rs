use async_graphql_parser::{Positioned, types::Field};
use async_graphql_value::ConstValue;
use error::{ErrorPath, GraphqlError};
use futures_util::{FutureExt, future::BoxFuture};

use super::{Completed, PropagateNull, complete_value, try_nullify};
use crate::{
    Arguments, Data, Deferred, ResolvedValue,
    coercion::coerce_argument_values,
    context::{ExecutionContext, ResolveInfo},
    path::QueryPath,
    registry::{MetaField, ObjectType},
};

/// Prepares the execution of one response key.
///
/// Returns `None` for fields the parent type does not define, which are left out of the
/// response. The returned future does nothing until polled.
pub(super) fn execute_field<'a>(
    ctx: &'a ExecutionContext<'a>,
    parent_type: &'a ObjectType,
    source: &'a ResolvedValue,
    field_nodes: &'a [&'a Positioned<Field>],
    path: QueryPath,
) -> Option<(&'a MetaField, BoxFuture<'a, Completed>)> {
    let first = field_nodes.first()?;
    let field_name = first.node.name.node.as_str();

    let Some(definition) = ctx.schema.field_definition(parent_type, field_name) else {
        tracing::debug!(field = field_name, parent_type = %parent_type.name, "skipping unknown field");
        return None;
    };

    let future = async move {
        let ty = &definition.ty;

        if is_introspection_field(field_name) && !ctx.config.introspection {
            ctx.add_completion_error(GraphqlError::field_error("Introspection is disabled."), field_nodes, &path);
            return try_nullify(ty, Err(PropagateNull));
        }

        let arguments = match coerce_argument_values(
            ctx.schema,
            &definition.args,
            &first.node.arguments,
            ctx.variables,
            first.pos,
        ) {
            Ok(arguments) => arguments,
            Err(err) => {
                ctx.add_error(GraphqlError::from(err).with_path(ErrorPath::from(&path)));
                return try_nullify(ty, Err(PropagateNull));
            }
        };

        let info = ResolveInfo {
            field_name,
            field_nodes,
            return_type: ty,
            parent_type,
            path: &path,
            schema: ctx.schema,
            fragments: &ctx.fragments,
            root_value: ctx.root_value,
            operation: ctx.operation,
            variable_values: ctx.variables,
        };

        tracing::trace!(path = %path, "resolving field");

        let resolved = match definition.resolver.as_ref().or(ctx.field_resolver) {
            Some(resolver) => resolver.call(source, &arguments, ctx.data, &info),
            None => default_field_resolver(source, &arguments, ctx.data, &info),
        };
        let value = resolved.await.unwrap_or_else(ResolvedValue::Error);

        try_nullify(ty, complete_value(ctx, ty, &info, path.clone(), &value).await)
    }
    .boxed();

    Some((definition, future))
}

fn is_introspection_field(name: &str) -> bool {
    matches!(name, "__schema" | "__type")
}

/// Reads the field from its parent value.
///
/// Maps and object constants are read by key, [`ObjectValue`](crate::ObjectValue)s through
/// their `field` method. A [`ResolvedValue::Callable`] found there is invoked with the field
/// arguments. Anything else resolves to null.
pub fn default_field_resolver<'a>(
    source: &'a ResolvedValue,
    arguments: &'a Arguments,
    data: &'a Data,
    info: &'a ResolveInfo<'a>,
) -> Deferred<'a, ResolvedValue> {
    let property = match source {
        ResolvedValue::Map(entries) => entries.get(info.field_name).cloned(),
        ResolvedValue::Value(ConstValue::Object(entries)) => {
            entries.get(info.field_name).cloned().map(ResolvedValue::Value)
        }
        ResolvedValue::Object(object) => object.field(info.field_name),
        _ => None,
    };

    match property {
        Some(ResolvedValue::Callable(thunk)) => thunk.call(arguments, data, info),
        property => Deferred::resolved(property.unwrap_or_default()),
    }
}
