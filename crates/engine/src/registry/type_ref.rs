use std::fmt;

use async_graphql_parser::types::{BaseType, Type};
use async_graphql_value::Name;

/// A reference to a type as written in a field, argument or variable definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(Name),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl AsRef<str>) -> Self {
        TypeRef::Named(Name::new(name))
    }

    /// Wraps this type in a list.
    #[must_use]
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wraps this type in a non-null modifier. Already non-null types are returned unchanged.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// Parses SDL type notation, such as `[Int!]!`.
    pub fn parse(ty: &str) -> Option<Self> {
        Type::new(ty).map(|ty| TypeRef::from(&ty))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.nullable(), TypeRef::List(_))
    }

    /// The type wrapped by a list or non-null modifier.
    pub fn inner(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Named(_) => None,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => Some(inner),
        }
    }

    /// Strips a top-level non-null modifier.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Name of the innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }
}

impl From<&Type> for TypeRef {
    fn from(ty: &Type) -> Self {
        let base = match &ty.base {
            BaseType::Named(name) => TypeRef::Named(name.clone()),
            BaseType::List(item) => TypeRef::from(item.as_ref()).list(),
        };

        if ty.nullable { base } else { base.non_null() }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
