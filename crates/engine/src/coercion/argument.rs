use async_graphql_parser::{Pos, Positioned};
use async_graphql_value::{ConstValue, Name, Value};
use indexmap::IndexMap;

use super::{Coerced, error::ArgumentError, literal::coerce_literal};
use crate::{
    Arguments, Variables,
    registry::{MetaInputValue, Schema},
};

/// Coerces the arguments written on a field or directive against their definitions.
///
/// `pos` is the position of the field or directive, used when a required argument is absent.
pub(crate) fn coerce_argument_values(
    schema: &Schema,
    definitions: &IndexMap<Name, MetaInputValue>,
    arguments: &[(Positioned<Name>, Positioned<Value>)],
    variables: &Variables,
    pos: Pos,
) -> Result<Arguments, ArgumentError> {
    let mut coerced = Arguments::default();

    for (name, definition) in definitions {
        let argument = arguments
            .iter()
            .find(|(argument_name, _)| argument_name.node == *name)
            .map(|(_, value)| value);

        let Some(argument) = argument else {
            if let Some(default) = &definition.default_value {
                coerced.insert(name.clone(), default.clone());
            } else if definition.ty.is_non_null() {
                return Err(ArgumentError::MissingValue {
                    name: name.to_string(),
                    ty: definition.ty.to_string(),
                    pos,
                });
            }
            continue;
        };

        if let Value::Variable(variable) = &argument.node {
            match variables.get(variable) {
                Some(value) => {
                    if *value == ConstValue::Null && definition.ty.is_non_null() {
                        return Err(ArgumentError::NullValue {
                            name: name.to_string(),
                            ty: definition.ty.to_string(),
                            pos: argument.pos,
                        });
                    }
                    coerced.insert(name.clone(), value.clone());
                }
                None => {
                    if let Some(default) = &definition.default_value {
                        coerced.insert(name.clone(), default.clone());
                    } else if definition.ty.is_non_null() {
                        return Err(ArgumentError::UnsetVariable {
                            name: name.to_string(),
                            ty: definition.ty.to_string(),
                            variable: variable.to_string(),
                            pos: argument.pos,
                        });
                    }
                }
            }
            continue;
        }

        match coerce_literal(schema, &argument.node, &definition.ty, Some(variables)) {
            Coerced::Value(value) => coerced.insert(name.clone(), value),
            Coerced::Undefined => {
                return Err(ArgumentError::InvalidValue {
                    name: name.to_string(),
                    value: argument.node.to_string(),
                    pos: argument.pos,
                });
            }
        }
    }

    Ok(coerced)
}
