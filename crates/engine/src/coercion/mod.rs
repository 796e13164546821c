//! Input coercion: literals, variables and arguments, plus the reverse mapping to literals.

mod argument;
mod ast;
mod error;
mod literal;
mod variable;

pub(crate) use argument::coerce_argument_values;
pub use ast::value_to_ast;
pub use literal::coerce_literal;
pub(crate) use variable::coerce_variable_values;

/// Result of coercing an input. `Undefined` means the input could not be coerced, which is
/// different from successfully coercing it to `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    Value(T),
    Undefined,
}

impl<T> Coerced<T> {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Coerced::Undefined)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coerced<U> {
        match self {
            Coerced::Value(value) => Coerced::Value(f(value)),
            Coerced::Undefined => Coerced::Undefined,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Coerced::Value(value) => Some(value),
            Coerced::Undefined => None,
        }
    }
}

impl<T> From<Option<T>> for Coerced<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Coerced::Undefined, Coerced::Value)
    }
}
