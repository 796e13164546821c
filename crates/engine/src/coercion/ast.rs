use async_graphql_value::{ConstValue, Number, Value};
use indexmap::IndexMap;

use crate::registry::{BuiltinScalar, MetaType, ScalarKind, Schema, TypeRef};

/// Turns an internal value back into a literal of the given input type.
///
/// `None` means the value cannot be represented: `null` for a non-null type, or a value the type
/// rejects.
pub fn value_to_ast(schema: &Schema, value: &ConstValue, ty: &TypeRef) -> Option<Value> {
    match ty {
        TypeRef::NonNull(inner) => match value_to_ast(schema, value, inner)? {
            Value::Null => None,
            literal => Some(literal),
        },
        _ if *value == ConstValue::Null => Some(Value::Null),
        TypeRef::List(item_ty) => match value {
            ConstValue::List(items) => Some(Value::List(
                items
                    .iter()
                    .filter_map(|item| value_to_ast(schema, item, item_ty))
                    .collect(),
            )),
            _ => value_to_ast(schema, value, item_ty),
        },
        TypeRef::Named(name) => match schema.lookup(name)? {
            MetaType::InputObject(input_object) => {
                let ConstValue::Object(fields) = value else {
                    return None;
                };

                let literal = input_object
                    .fields
                    .iter()
                    .filter_map(|(field_name, field)| {
                        let value = fields.get(field_name)?;
                        Some((field_name.clone(), value_to_ast(schema, value, &field.ty)?))
                    })
                    .collect::<IndexMap<_, _>>();

                Some(Value::Object(literal))
            }
            MetaType::Enum(enum_type) => enum_type
                .value_by_internal(value)
                .map(|enum_value| Value::Enum(enum_value.name.clone())),
            MetaType::Scalar(scalar) => {
                let serialized = scalar.serialize(value).ok()?;
                let is_id = matches!(scalar.kind, ScalarKind::Builtin(BuiltinScalar::Id));
                Some(serialized_to_ast(serialized, is_id))
            }
            MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_) => None,
        },
    }
}

fn serialized_to_ast(serialized: ConstValue, is_id: bool) -> Value {
    match serialized {
        ConstValue::Number(number) => Value::Number(integral_number(&number).unwrap_or(number)),
        ConstValue::String(s) if is_id && looks_like_integer(&s) => match s.parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(s),
        },
        other => other.into_value(),
    }
}

/// An integral float as an integer number, so that it prints as an `IntValue`.
fn integral_number(number: &Number) -> Option<Number> {
    if !number.is_f64() {
        return None;
    }

    let n = number.as_f64()?;
    if n.fract() != 0.0 || n.abs() >= 9_007_199_254_740_992.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    Some(Number::from(n as i64))
}

fn looks_like_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) && (digits == "0" || !digits.starts_with('0'))
}
