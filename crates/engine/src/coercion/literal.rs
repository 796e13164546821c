use async_graphql_value::{ConstValue, Value};
use indexmap::IndexMap;

use super::Coerced;
use crate::{
    Variables,
    registry::{MetaType, Schema, TypeRef},
};

/// Coerces a literal from the document against an input type.
///
/// Variables are looked up in `variables`, which must already be coerced. Without them any
/// variable reference is undefined.
pub fn coerce_literal(
    schema: &Schema,
    value: &Value,
    ty: &TypeRef,
    variables: Option<&Variables>,
) -> Coerced<ConstValue> {
    if let Value::Variable(name) = value {
        let Some(value) = variables.and_then(|variables| variables.get(name)) else {
            return Coerced::Undefined;
        };
        if ty.is_non_null() && value == &ConstValue::Null {
            return Coerced::Undefined;
        }
        return Coerced::Value(value.clone());
    }

    match ty {
        TypeRef::NonNull(inner) => {
            if matches!(value, Value::Null) {
                return Coerced::Undefined;
            }
            match coerce_literal(schema, value, inner, variables) {
                Coerced::Value(ConstValue::Null) | Coerced::Undefined => Coerced::Undefined,
                coerced => coerced,
            }
        }
        _ if matches!(value, Value::Null) => Coerced::Value(ConstValue::Null),
        TypeRef::List(item_ty) => match value {
            Value::List(items) => {
                let mut coerced = Vec::with_capacity(items.len());
                for item in items {
                    if is_missing_variable(item, variables) {
                        if item_ty.is_non_null() {
                            return Coerced::Undefined;
                        }
                        coerced.push(ConstValue::Null);
                        continue;
                    }
                    match coerce_literal(schema, item, item_ty, variables) {
                        Coerced::Value(item) => coerced.push(item),
                        Coerced::Undefined => return Coerced::Undefined,
                    }
                }
                Coerced::Value(ConstValue::List(coerced))
            }
            _ => coerce_literal(schema, value, item_ty, variables).map(|item| ConstValue::List(vec![item])),
        },
        TypeRef::Named(name) => match schema.lookup(name) {
            Some(MetaType::InputObject(input)) => {
                let Value::Object(fields) = value else {
                    return Coerced::Undefined;
                };

                let mut coerced = IndexMap::with_capacity(input.fields.len());
                for (field_name, field) in &input.fields {
                    match fields.get(field_name).filter(|node| !is_missing_variable(node, variables)) {
                        Some(node) => match coerce_literal(schema, node, &field.ty, variables) {
                            Coerced::Value(value) => {
                                coerced.insert(field_name.clone(), value);
                            }
                            Coerced::Undefined => return Coerced::Undefined,
                        },
                        None => match &field.default_value {
                            Some(default) => {
                                coerced.insert(field_name.clone(), default.clone());
                            }
                            None if field.ty.is_non_null() => return Coerced::Undefined,
                            None => {
                                coerced.insert(field_name.clone(), ConstValue::Null);
                            }
                        },
                    }
                }
                Coerced::Value(ConstValue::Object(coerced))
            }
            Some(MetaType::Enum(enum_type)) => match value {
                Value::Enum(name) => enum_type.value_by_name(name).map(|value| value.value.clone()).into(),
                _ => Coerced::Undefined,
            },
            Some(MetaType::Scalar(scalar)) => {
                let substituted = value.clone().into_const_with(|name| {
                    variables
                        .and_then(|variables| variables.get(&name))
                        .cloned()
                        .ok_or(())
                });
                match substituted {
                    Ok(literal) => scalar.parse_literal(&literal).ok().into(),
                    Err(()) => Coerced::Undefined,
                }
            }
            Some(MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_)) | None => Coerced::Undefined,
        },
    }
}

fn is_missing_variable(value: &Value, variables: Option<&Variables>) -> bool {
    match value {
        Value::Variable(name) => !variables.is_some_and(|variables| variables.contains_key(name)),
        _ => false,
    }
}
