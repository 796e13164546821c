use async_graphql_parser::{Positioned, types::VariableDefinition};
use async_graphql_value::ConstValue;
use indexmap::IndexMap;
use serde_json::Value;

use super::{
    Coerced,
    error::{InputValueError, VariableError},
    literal::coerce_literal,
};
use crate::{
    Variables,
    registry::{EnumType, InputObjectType, MetaType, ScalarType, Schema, TypeRef},
};

/// Coerces the raw request variables against the operation's variable definitions.
///
/// Every problem is collected. With `validate` unset, the variables that did coerce are returned
/// regardless of the others.
pub(crate) fn coerce_variable_values(
    schema: &Schema,
    definitions: &[Positioned<VariableDefinition>],
    inputs: &serde_json::Map<String, Value>,
    validate: bool,
) -> Result<Variables, Vec<VariableError>> {
    let mut coerced = Variables::new();
    let mut errors = Vec::new();

    for definition in definitions {
        let name = &definition.node.name.node;
        let ty = TypeRef::from(&definition.node.var_type.node);

        if !schema.lookup(ty.named_type()).is_some_and(MetaType::is_input) {
            errors.push(VariableError::NotAnInputType {
                name: name.to_string(),
                ty: ty.to_string(),
                pos: definition.pos,
            });
            continue;
        }

        match inputs.get(name.as_str()) {
            None => {
                if let Some(default) = &definition.node.default_value {
                    match coerce_literal(schema, &default.node.clone().into_value(), &ty, None) {
                        Coerced::Value(value) => {
                            coerced.insert(name.clone(), value);
                        }
                        Coerced::Undefined => {
                            tracing::debug!(variable = %name, "default value does not match the variable type");
                        }
                    }
                } else if ty.is_non_null() {
                    errors.push(VariableError::MissingValue {
                        name: name.to_string(),
                        ty: ty.to_string(),
                        pos: definition.pos,
                    });
                }
            }
            Some(input) => {
                let mut ctx = VariableCoercionContext {
                    schema,
                    problems: Vec::new(),
                };
                match ctx.coerce_input_value(&ty, input) {
                    Some(value) if ctx.problems.is_empty() => {
                        coerced.insert(name.clone(), value);
                    }
                    _ => errors.push(VariableError::InvalidValue {
                        name: name.to_string(),
                        value: input.to_string(),
                        problems: ctx.problems,
                        pos: definition.pos,
                    }),
                }
            }
        }
    }

    if errors.is_empty() || !validate {
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "ignoring invalid variables");
        }
        Ok(coerced)
    } else {
        Err(errors)
    }
}

struct VariableCoercionContext<'a> {
    schema: &'a Schema,
    problems: Vec<InputValueError>,
}

impl VariableCoercionContext<'_> {
    /// Returns `None` when the value could not be coerced, the reasons being in `problems`.
    fn coerce_input_value(&mut self, ty: &TypeRef, value: &Value) -> Option<ConstValue> {
        match ty {
            TypeRef::NonNull(inner) => {
                if value.is_null() {
                    self.problems.push(InputValueError::UnexpectedNull {
                        expected: ty.to_string(),
                    });
                    return None;
                }
                self.coerce_input_value(inner, value)
            }
            _ if value.is_null() => Some(ConstValue::Null),
            TypeRef::List(item_ty) => match value {
                Value::Array(items) => {
                    let mut coerced = Vec::with_capacity(items.len());
                    let mut valid = true;
                    for (index, item) in items.iter().enumerate() {
                        match self.nested(|ctx| ctx.coerce_input_value(item_ty, item), |err| err.in_element(index)) {
                            Some(item) => coerced.push(item),
                            None => valid = false,
                        }
                    }
                    valid.then_some(ConstValue::List(coerced))
                }
                // A single value is accepted where a list is expected.
                _ => self
                    .coerce_input_value(item_ty, value)
                    .map(|item| ConstValue::List(vec![item])),
            },
            TypeRef::Named(name) => match self.schema.lookup(name) {
                Some(MetaType::Scalar(scalar)) => self.coerce_scalar(scalar, value),
                Some(MetaType::Enum(enum_type)) => self.coerce_enum(enum_type, value),
                Some(MetaType::InputObject(input_object)) => self.coerce_input_object(input_object, value),
                _ => {
                    self.problems.push(InputValueError::IncorrectType {
                        expected: name.to_string(),
                        actual: value.to_string(),
                    });
                    None
                }
            },
        }
    }

    fn coerce_scalar(&mut self, scalar: &ScalarType, value: &Value) -> Option<ConstValue> {
        let input = ConstValue::from_json(value.clone()).ok()?;
        match scalar.parse_value(&input) {
            Ok(value) => Some(value),
            Err(err) => {
                self.problems.push(if scalar.is_builtin() {
                    InputValueError::IncorrectType {
                        expected: scalar.name.to_string(),
                        actual: value.to_string(),
                    }
                } else {
                    InputValueError::InvalidScalar {
                        expected: scalar.name.to_string(),
                        actual: value.to_string(),
                        message: err.message,
                    }
                });
                None
            }
        }
    }

    fn coerce_enum(&mut self, enum_type: &EnumType, value: &Value) -> Option<ConstValue> {
        let found = match value {
            Value::String(name) => enum_type.value_by_name(name),
            _ => None,
        };

        match found {
            Some(enum_value) => Some(enum_value.value.clone()),
            None => {
                self.problems.push(InputValueError::IncorrectType {
                    expected: enum_type.name.to_string(),
                    actual: value.to_string(),
                });
                None
            }
        }
    }

    fn coerce_input_object(&mut self, input_object: &InputObjectType, value: &Value) -> Option<ConstValue> {
        let Value::Object(fields) = value else {
            self.problems.push(InputValueError::NotAnObject {
                expected: input_object.name.to_string(),
            });
            return None;
        };

        let mut coerced = IndexMap::with_capacity(input_object.fields.len());
        let mut valid = true;

        for (field_name, field) in &input_object.fields {
            match fields.get(field_name.as_str()) {
                Some(value) => {
                    match self.nested(|ctx| ctx.coerce_input_value(&field.ty, value), |err| err.in_field(field_name)) {
                        Some(value) => {
                            coerced.insert(field_name.clone(), value);
                        }
                        None => valid = false,
                    }
                }
                None => {
                    if let Some(default) = &field.default_value {
                        coerced.insert(field_name.clone(), default.clone());
                    } else if field.ty.is_non_null() {
                        self.problems.push(
                            InputValueError::UnexpectedNull {
                                expected: field.ty.to_string(),
                            }
                            .in_field(field_name),
                        );
                        valid = false;
                    }
                }
            }
        }

        for key in fields.keys() {
            if !input_object.fields.contains_key(key.as_str()) {
                self.problems.push(InputValueError::UnknownField.in_field(key));
                valid = false;
            }
        }

        valid.then_some(ConstValue::Object(coerced))
    }

    /// Runs `coerce` and wraps whatever problems it reported with `wrap`.
    fn nested(
        &mut self,
        coerce: impl FnOnce(&mut Self) -> Option<ConstValue>,
        wrap: impl Fn(InputValueError) -> InputValueError,
    ) -> Option<ConstValue> {
        let start = self.problems.len();
        let result = coerce(self);
        let nested = self.problems.split_off(start);
        self.problems.extend(nested.into_iter().map(wrap));
        result
    }
}
