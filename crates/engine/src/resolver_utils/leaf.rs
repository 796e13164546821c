use async_graphql_value::ConstValue;

use super::{Completed, PropagateNull};
use crate::{
    Error, ResolvedValue,
    context::{ExecutionContext, ResolveInfo},
    path::QueryPath,
    registry::{EnumType, ScalarType},
};

pub(super) fn complete_scalar_value(
    ctx: &ExecutionContext<'_>,
    scalar: &ScalarType,
    info: &ResolveInfo<'_>,
    path: &QueryPath,
    value: &ResolvedValue,
) -> Completed {
    let serialized = match value.to_const_value() {
        Some(value) => scalar.serialize(&value),
        None => Err(unexpected_value(&scalar.name, value)),
    };
    settle(ctx, info, path, serialized)
}

pub(super) fn complete_enum_value(
    ctx: &ExecutionContext<'_>,
    enum_type: &EnumType,
    info: &ResolveInfo<'_>,
    path: &QueryPath,
    value: &ResolvedValue,
) -> Completed {
    let serialized = match value.to_const_value() {
        Some(value) => enum_type.serialize(&value),
        None => Err(unexpected_value(&enum_type.name, value)),
    };
    settle(ctx, info, path, serialized)
}

fn unexpected_value(ty: &str, value: &ResolvedValue) -> Error {
    Error::new(format!(
        "Expected a value of type \"{ty}\" but received: {}",
        value.describe()
    ))
}

fn settle(
    ctx: &ExecutionContext<'_>,
    info: &ResolveInfo<'_>,
    path: &QueryPath,
    serialized: Result<ConstValue, Error>,
) -> Completed {
    serialized.map_err(|error| {
        ctx.add_field_error(error, info.field_nodes, path);
        PropagateNull
    })
}
