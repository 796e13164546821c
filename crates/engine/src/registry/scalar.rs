use std::{fmt, sync::Arc};

use async_graphql_value::{ConstValue, Name, Number};

use crate::{Error, value::describe_const};

/// Behaviour of a user-defined scalar.
///
/// `parse_literal` receives the literal with all variables already substituted.
pub trait CustomScalar: Send + Sync {
    fn serialize(&self, value: &ConstValue) -> Result<ConstValue, Error>;

    fn parse_value(&self, value: &ConstValue) -> Result<ConstValue, Error>;

    fn parse_literal(&self, value: &ConstValue) -> Result<ConstValue, Error> {
        self.parse_value(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScalar {
    Int,
    Float,
    String,
    Boolean,
    Id,
}

impl BuiltinScalar {
    pub const ALL: [BuiltinScalar; 5] = [
        BuiltinScalar::Int,
        BuiltinScalar::Float,
        BuiltinScalar::String,
        BuiltinScalar::Boolean,
        BuiltinScalar::Id,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinScalar::Int => "Int",
            BuiltinScalar::Float => "Float",
            BuiltinScalar::String => "String",
            BuiltinScalar::Boolean => "Boolean",
            BuiltinScalar::Id => "ID",
        }
    }

    pub fn serialize(self, value: &ConstValue) -> Option<ConstValue> {
        match (self, value) {
            (BuiltinScalar::Int, ConstValue::Number(number)) => int_from_number(number),
            (BuiltinScalar::Int, ConstValue::Boolean(b)) => Some(ConstValue::Number(i32::from(*b).into())),
            (BuiltinScalar::Int, ConstValue::String(s)) => {
                let number = s.trim().parse::<f64>().ok()?;
                int_from_number(&Number::from_f64(number)?)
            }
            (BuiltinScalar::Float, ConstValue::Number(number)) => float_from_number(number),
            (BuiltinScalar::Float, ConstValue::Boolean(b)) => {
                Number::from_f64(if *b { 1.0 } else { 0.0 }).map(ConstValue::Number)
            }
            (BuiltinScalar::Float, ConstValue::String(s)) => {
                Number::from_f64(s.trim().parse::<f64>().ok()?).map(ConstValue::Number)
            }
            (BuiltinScalar::String, ConstValue::String(_)) => Some(value.clone()),
            (BuiltinScalar::String, ConstValue::Boolean(b)) => Some(ConstValue::String(b.to_string())),
            (BuiltinScalar::String, ConstValue::Number(number)) => Some(ConstValue::String(number_to_string(number))),
            (BuiltinScalar::String, ConstValue::Enum(name)) => Some(ConstValue::String(name.to_string())),
            (BuiltinScalar::Boolean, ConstValue::Boolean(_)) => Some(value.clone()),
            (BuiltinScalar::Boolean, ConstValue::Number(number)) => {
                Some(ConstValue::Boolean(number.as_f64().is_some_and(|n| n != 0.0)))
            }
            (BuiltinScalar::Id, ConstValue::String(_)) => Some(value.clone()),
            (BuiltinScalar::Id, ConstValue::Number(number)) if number.is_i64() || number.is_u64() => {
                Some(ConstValue::String(number.to_string()))
            }
            _ => None,
        }
    }

    /// Input coming from variables, in its JSON shape.
    pub fn parse_value(self, value: &ConstValue) -> Option<ConstValue> {
        match (self, value) {
            (BuiltinScalar::Int, ConstValue::Number(number)) => int_from_number(number),
            (BuiltinScalar::Float, ConstValue::Number(number)) => float_from_number(number),
            (BuiltinScalar::String, ConstValue::String(_)) | (BuiltinScalar::Boolean, ConstValue::Boolean(_)) => {
                Some(value.clone())
            }
            (BuiltinScalar::Id, ConstValue::String(_)) => Some(value.clone()),
            (BuiltinScalar::Id, ConstValue::Number(number)) if number.is_i64() || number.is_u64() => {
                Some(ConstValue::String(number.to_string()))
            }
            _ => None,
        }
    }

    /// Input written inline in the document.
    pub fn parse_literal(self, value: &ConstValue) -> Option<ConstValue> {
        match (self, value) {
            (BuiltinScalar::Int, ConstValue::Number(number)) if !number.is_f64() => int_from_number(number),
            // Int literals are valid Float literals.
            (BuiltinScalar::Float, ConstValue::Number(number)) => float_from_number(number),
            (BuiltinScalar::String, ConstValue::String(_)) | (BuiltinScalar::Boolean, ConstValue::Boolean(_)) => {
                Some(value.clone())
            }
            (BuiltinScalar::Id, ConstValue::String(_)) => Some(value.clone()),
            (BuiltinScalar::Id, ConstValue::Number(number)) if !number.is_f64() => {
                Some(ConstValue::String(number.to_string()))
            }
            _ => None,
        }
    }
}

fn int_from_number(number: &Number) -> Option<ConstValue> {
    if let Some(n) = number.as_i64() {
        return i32::try_from(n).ok().map(|n| ConstValue::Number(n.into()));
    }

    let n = number.as_f64()?;
    if n.fract() != 0.0 || n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    Some(ConstValue::Number((n as i32).into()))
}

/// Integral floats print without a fraction, `1.0` becoming `"1"`.
fn number_to_string(number: &Number) -> String {
    match number.as_f64() {
        Some(n) if number.is_f64() && n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => format!("{n:.0}"),
        _ => number.to_string(),
    }
}

fn float_from_number(number: &Number) -> Option<ConstValue> {
    number.as_f64().and_then(Number::from_f64).map(ConstValue::Number)
}

#[derive(Clone)]
pub enum ScalarKind {
    Builtin(BuiltinScalar),
    Custom(Arc<dyn CustomScalar>),
}

#[derive(Clone)]
pub struct ScalarType {
    pub name: Name,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
    pub kind: ScalarKind,
}

impl ScalarType {
    pub fn builtin(scalar: BuiltinScalar) -> Self {
        ScalarType {
            name: Name::new(scalar.name()),
            description: None,
            specified_by_url: None,
            kind: ScalarKind::Builtin(scalar),
        }
    }

    pub fn custom(name: impl AsRef<str>, scalar: impl CustomScalar + 'static) -> Self {
        ScalarType {
            name: Name::new(name),
            description: None,
            specified_by_url: None,
            kind: ScalarKind::Custom(Arc::new(scalar)),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<String>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, ScalarKind::Builtin(_))
    }

    pub fn serialize(&self, value: &ConstValue) -> Result<ConstValue, Error> {
        match &self.kind {
            ScalarKind::Builtin(scalar) => scalar.serialize(value).ok_or_else(|| {
                Error::new(format!(
                    "Expected a value of type \"{}\" but received: {}",
                    self.name,
                    describe_const(value)
                ))
            }),
            ScalarKind::Custom(scalar) => scalar.serialize(value),
        }
    }

    pub fn parse_value(&self, value: &ConstValue) -> Result<ConstValue, Error> {
        match &self.kind {
            ScalarKind::Builtin(scalar) => scalar.parse_value(value).ok_or_else(|| self.invalid_input(value)),
            ScalarKind::Custom(scalar) => scalar.parse_value(value),
        }
    }

    pub fn parse_literal(&self, value: &ConstValue) -> Result<ConstValue, Error> {
        match &self.kind {
            ScalarKind::Builtin(scalar) => scalar.parse_literal(value).ok_or_else(|| self.invalid_input(value)),
            ScalarKind::Custom(scalar) => scalar.parse_literal(value),
        }
    }

    fn invalid_input(&self, value: &ConstValue) -> Error {
        Error::new(format!("{} cannot represent value: {}", self.name, describe_const(value)))
    }
}

impl fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarType")
            .field("name", &self.name)
            .field("builtin", &self.is_builtin())
            .finish_non_exhaustive()
    }
}
