//! The type system consumed by the executor.
//!
//! Schemas are assembled with [`SchemaBuilder`] from typed definitions. Nothing here parses SDL.

mod resolver;
mod scalar;
mod type_ref;
mod types;

use std::collections::HashMap;

use async_graphql_parser::types::OperationType;
use async_graphql_value::Name;
use indexmap::IndexMap;

pub use resolver::{FieldResolver, IsTypeOf, ResolvedType, TypeResolver};
pub use scalar::{BuiltinScalar, CustomScalar, ScalarKind, ScalarType};
pub use type_ref::TypeRef;
pub use types::{
    EnumType, InputObjectType, InterfaceType, MetaDirective, MetaEnumValue, MetaField, MetaInputValue, MetaType,
    ObjectType, UnionType,
};

use crate::{Deferred, ResolvedValue};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Type \"{0}\" is registered more than once.")]
    DuplicateType(String),
    #[error("The {kind} root type \"{name}\" is not registered.")]
    MissingRootType { kind: &'static str, name: String },
    #[error("The {kind} root type \"{name}\" must be an object type.")]
    RootTypeNotObject { kind: &'static str, name: String },
    #[error("Type \"{name}\" referenced by {location} is not registered.")]
    UnknownType { name: String, location: String },
    #[error("{location} must be an {expected} type but \"{name}\" is not.")]
    InvalidTypeKind {
        name: String,
        location: String,
        expected: &'static str,
    },
}

struct IntrospectionFields {
    schema: MetaField,
    ty: MetaField,
}

/// An immutable registry of named types and root operation types.
pub struct Schema {
    types: IndexMap<Name, MetaType>,
    query_type: Name,
    mutation_type: Option<Name>,
    subscription_type: Option<Name>,
    directives: IndexMap<Name, MetaDirective>,
    implementers: HashMap<Name, Vec<Name>>,
    typename_field: MetaField,
    introspection: Option<IntrospectionFields>,
}

impl Schema {
    pub fn builder(query_type: impl AsRef<str>) -> SchemaBuilder {
        SchemaBuilder::new(query_type)
    }

    pub fn lookup(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        match self.lookup(name)? {
            MetaType::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &MetaType> {
        self.types.values()
    }

    pub fn query_type(&self) -> &ObjectType {
        // Checked by SchemaBuilder::build.
        self.object(&self.query_type).unwrap_or_else(|| unreachable!("query root type is validated on build"))
    }

    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.mutation_type.as_deref().and_then(|name| self.object(name))
    }

    pub fn subscription_type(&self) -> Option<&ObjectType> {
        self.subscription_type.as_deref().and_then(|name| self.object(name))
    }

    pub fn root_type(&self, operation: OperationType) -> Option<&ObjectType> {
        match operation {
            OperationType::Query => Some(self.query_type()),
            OperationType::Mutation => self.mutation_type(),
            OperationType::Subscription => self.subscription_type(),
        }
    }

    pub fn directive(&self, name: &str) -> Option<&MetaDirective> {
        self.directives.get(name)
    }

    /// Object types a value of the abstract type `name` may have at runtime, in registration order.
    pub fn possible_types<'a>(&'a self, name: &str) -> Vec<&'a ObjectType> {
        match self.lookup(name) {
            Some(MetaType::Union(union)) => union.members.iter().filter_map(|member| self.object(member)).collect(),
            Some(MetaType::Interface(_)) => self
                .implementers
                .get(name)
                .into_iter()
                .flatten()
                .filter_map(|object| self.object(object))
                .collect(),
            Some(MetaType::Object(object)) => vec![object],
            _ => Vec::new(),
        }
    }

    pub fn is_possible_type(&self, abstract_type: &str, object_type: &str) -> bool {
        match self.lookup(abstract_type) {
            Some(MetaType::Union(union)) => union.members.iter().any(|member| member.as_str() == object_type),
            Some(MetaType::Interface(_)) => self
                .implementers
                .get(abstract_type)
                .is_some_and(|objects| objects.iter().any(|object| object.as_str() == object_type)),
            Some(MetaType::Object(object)) => object.name.as_str() == object_type,
            _ => false,
        }
    }

    /// Looks up a field of an object type, including the meta fields available on it.
    pub fn field_definition<'a>(&'a self, object_type: &'a ObjectType, name: &str) -> Option<&'a MetaField> {
        match name {
            "__typename" => Some(&self.typename_field),
            "__schema" | "__type" if object_type.name == self.query_type => {
                let introspection = self.introspection.as_ref()?;
                Some(if name == "__schema" {
                    &introspection.schema
                } else {
                    &introspection.ty
                })
            }
            _ => object_type.fields.get(name),
        }
    }
}

pub struct SchemaBuilder {
    types: IndexMap<Name, MetaType>,
    duplicates: Vec<String>,
    query_type: Name,
    mutation_type: Option<Name>,
    subscription_type: Option<Name>,
    directives: IndexMap<Name, MetaDirective>,
    introspection: Option<IntrospectionFields>,
}

impl SchemaBuilder {
    pub fn new(query_type: impl AsRef<str>) -> Self {
        let mut directives = IndexMap::new();
        for directive in [MetaDirective::skip(), MetaDirective::include()] {
            directives.insert(directive.name.clone(), directive);
        }

        SchemaBuilder {
            types: IndexMap::new(),
            duplicates: Vec::new(),
            query_type: Name::new(query_type),
            mutation_type: None,
            subscription_type: None,
            directives,
            introspection: None,
        }
    }

    #[must_use]
    pub fn register(mut self, ty: impl Into<MetaType>) -> Self {
        let ty = ty.into();
        let name = Name::new(ty.name());
        if self.types.insert(name.clone(), ty).is_some() {
            self.duplicates.push(name.to_string());
        }
        self
    }

    #[must_use]
    pub fn mutation(mut self, name: impl AsRef<str>) -> Self {
        self.mutation_type = Some(Name::new(name));
        self
    }

    #[must_use]
    pub fn subscription(mut self, name: impl AsRef<str>) -> Self {
        self.subscription_type = Some(Name::new(name));
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: MetaDirective) -> Self {
        self.directives.insert(directive.name.clone(), directive);
        self
    }

    /// Registers the `__schema` and `__type` fields dispatched on the query root.
    ///
    /// The types they return must be registered like any other type.
    #[must_use]
    pub fn introspection(mut self, schema_field: MetaField, type_field: MetaField) -> Self {
        self.introspection = Some(IntrospectionFields {
            schema: schema_field,
            ty: type_field,
        });
        self
    }

    pub fn build(mut self) -> Result<Schema, SchemaError> {
        if let Some(name) = self.duplicates.first() {
            return Err(SchemaError::DuplicateType(name.clone()));
        }

        for scalar in BuiltinScalar::ALL {
            if !self.types.contains_key(scalar.name()) {
                self.types
                    .insert(Name::new(scalar.name()), ScalarType::builtin(scalar).into());
            }
        }

        check_root(&self.types, "query", Some(&self.query_type))?;
        check_root(&self.types, "mutation", self.mutation_type.as_ref())?;
        check_root(&self.types, "subscription", self.subscription_type.as_ref())?;

        let validator = Validator { types: &self.types };
        for ty in self.types.values() {
            validator.validate_type(ty)?;
        }
        for directive in self.directives.values() {
            for arg in directive.args.values() {
                validator.expect_input(&arg.ty, || format!("argument \"{}\" of @{}", arg.name, directive.name))?;
            }
        }
        if let Some(introspection) = &self.introspection {
            validator.validate_fields(&self.query_type, [&introspection.schema, &introspection.ty])?;
        }

        let mut implementers: HashMap<Name, Vec<Name>> = HashMap::new();
        for ty in self.types.values() {
            if let MetaType::Object(object) = ty {
                for interface in &object.interfaces {
                    implementers
                        .entry(interface.clone())
                        .or_default()
                        .push(object.name.clone());
                }
            }
        }

        tracing::debug!(types = self.types.len(), "schema built");

        Ok(Schema {
            types: self.types,
            query_type: self.query_type,
            mutation_type: self.mutation_type,
            subscription_type: self.subscription_type,
            directives: self.directives,
            implementers,
            typename_field: typename_field(),
            introspection: self.introspection,
        })
    }
}

fn typename_field() -> MetaField {
    MetaField::new("__typename", TypeRef::named("String").non_null())
        .resolve(|_, _, _, info| Deferred::resolved(ResolvedValue::from(info.parent_type.name.as_str())))
}

fn check_root(types: &IndexMap<Name, MetaType>, kind: &'static str, name: Option<&Name>) -> Result<(), SchemaError> {
    let Some(name) = name else {
        return Ok(());
    };

    match types.get(name) {
        Some(MetaType::Object(_)) => Ok(()),
        Some(_) => Err(SchemaError::RootTypeNotObject {
            kind,
            name: name.to_string(),
        }),
        None => Err(SchemaError::MissingRootType {
            kind,
            name: name.to_string(),
        }),
    }
}

struct Validator<'a> {
    types: &'a IndexMap<Name, MetaType>,
}

impl Validator<'_> {
    fn validate_type(&self, ty: &MetaType) -> Result<(), SchemaError> {
        match ty {
            MetaType::Scalar(_) | MetaType::Enum(_) => Ok(()),
            MetaType::Object(object) => {
                self.validate_fields(&object.name, object.fields.values())?;
                self.validate_interfaces(&object.name, &object.interfaces)
            }
            MetaType::Interface(interface) => {
                self.validate_fields(&interface.name, interface.fields.values())?;
                self.validate_interfaces(&interface.name, &interface.interfaces)
            }
            MetaType::Union(union) => {
                for member in &union.members {
                    match self.types.get(member) {
                        Some(MetaType::Object(_)) => {}
                        Some(_) => {
                            return Err(SchemaError::InvalidTypeKind {
                                name: member.to_string(),
                                location: format!("member of union \"{}\"", union.name),
                                expected: "object",
                            });
                        }
                        None => {
                            return Err(SchemaError::UnknownType {
                                name: member.to_string(),
                                location: format!("union \"{}\"", union.name),
                            });
                        }
                    }
                }
                Ok(())
            }
            MetaType::InputObject(input) => {
                for field in input.fields.values() {
                    self.expect_input(&field.ty, || format!("input field \"{}.{}\"", input.name, field.name))?;
                }
                Ok(())
            }
        }
    }

    fn validate_fields<'f>(
        &self,
        parent: &str,
        fields: impl IntoIterator<Item = &'f MetaField>,
    ) -> Result<(), SchemaError> {
        for field in fields {
            self.expect_known(&field.ty, || format!("field \"{parent}.{}\"", field.name))?;
            for arg in field.args.values() {
                self.expect_input(&arg.ty, || {
                    format!("argument \"{}\" of field \"{parent}.{}\"", arg.name, field.name)
                })?;
            }
        }
        Ok(())
    }

    fn validate_interfaces(&self, parent: &str, interfaces: &[Name]) -> Result<(), SchemaError> {
        for interface in interfaces {
            match self.types.get(interface) {
                Some(MetaType::Interface(_)) => {}
                Some(_) => {
                    return Err(SchemaError::InvalidTypeKind {
                        name: interface.to_string(),
                        location: format!("interface implemented by \"{parent}\""),
                        expected: "interface",
                    });
                }
                None => {
                    return Err(SchemaError::UnknownType {
                        name: interface.to_string(),
                        location: format!("type \"{parent}\""),
                    });
                }
            }
        }
        Ok(())
    }

    fn expect_known(&self, ty: &TypeRef, location: impl FnOnce() -> String) -> Result<&MetaType, SchemaError> {
        self.types.get(ty.named_type()).ok_or_else(|| SchemaError::UnknownType {
            name: ty.named_type().to_string(),
            location: location(),
        })
    }

    fn expect_input(&self, ty: &TypeRef, location: impl Fn() -> String) -> Result<(), SchemaError> {
        let meta = self.expect_known(ty, &location)?;
        if meta.is_input() {
            Ok(())
        } else {
            Err(SchemaError::InvalidTypeKind {
                name: meta.name().to_string(),
                location: location(),
                expected: "input",
            })
        }
    }
}
