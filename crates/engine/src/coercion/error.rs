use async_graphql_parser::Pos;
use error::{ErrorCode, GraphqlError};
use itertools::Itertools;

use crate::context::location;

/// A single problem found while coercing a variable value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum InputValueError {
    #[error("Expected \"{expected}\", found null.")]
    UnexpectedNull { expected: String },
    #[error("Expected type \"{expected}\", found {actual}.")]
    IncorrectType { expected: String, actual: String },
    #[error("Expected type \"{expected}\", found {actual}; {message}")]
    InvalidScalar {
        expected: String,
        actual: String,
        message: String,
    },
    #[error("Expected type \"{expected}\" to be an object.")]
    NotAnObject { expected: String },
    #[error("Unknown field.")]
    UnknownField,
    #[error("In field \"{field}\": {source}")]
    InField {
        field: String,
        source: Box<InputValueError>,
    },
    #[error("In element #{index}: {source}")]
    InElement {
        index: usize,
        source: Box<InputValueError>,
    },
}

impl InputValueError {
    pub(super) fn in_field(self, field: &str) -> Self {
        InputValueError::InField {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    pub(super) fn in_element(self, index: usize) -> Self {
        InputValueError::InElement {
            index,
            source: Box::new(self),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum VariableError {
    #[error("Variable \"${name}\" expected value of type \"{ty}\" which cannot be used as an input type.")]
    NotAnInputType { name: String, ty: String, pos: Pos },
    #[error("Variable \"${name}\" of required type \"{ty}\" was not provided.")]
    MissingValue { name: String, ty: String, pos: Pos },
    #[error("Variable \"${name}\" got invalid value {value}.\n{}", .problems.iter().join("\n"))]
    InvalidValue {
        name: String,
        value: String,
        problems: Vec<InputValueError>,
        pos: Pos,
    },
}

impl From<VariableError> for GraphqlError {
    fn from(err: VariableError) -> Self {
        let pos = match &err {
            VariableError::NotAnInputType { pos, .. }
            | VariableError::MissingValue { pos, .. }
            | VariableError::InvalidValue { pos, .. } => *pos,
        };

        GraphqlError::new(err.to_string(), ErrorCode::VariableError).with_location(location(pos))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ArgumentError {
    #[error(
        "Argument \"{name}\" of required type \"{ty}\" was provided the variable \"${variable}\" \
         which was not provided a runtime value."
    )]
    UnsetVariable {
        name: String,
        ty: String,
        variable: String,
        pos: Pos,
    },
    #[error("Argument \"{name}\" of required type \"{ty}\" was not provided.")]
    MissingValue { name: String, ty: String, pos: Pos },
    #[error("Argument \"{name}\" of non-null type \"{ty}\" must not be null.")]
    NullValue { name: String, ty: String, pos: Pos },
    #[error("Argument \"{name}\" has invalid value {value}.")]
    InvalidValue { name: String, value: String, pos: Pos },
}

impl From<ArgumentError> for GraphqlError {
    fn from(err: ArgumentError) -> Self {
        let pos = match &err {
            ArgumentError::UnsetVariable { pos, .. }
            | ArgumentError::MissingValue { pos, .. }
            | ArgumentError::NullValue { pos, .. }
            | ArgumentError::InvalidValue { pos, .. } => *pos,
        };

        GraphqlError::new(err.to_string(), ErrorCode::FieldError).with_location(location(pos))
    }
}
