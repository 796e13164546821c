//! Request documents and operation selection.

use std::{collections::HashMap, fmt};

use async_graphql_parser::{
    Pos, Positioned,
    types::{
        ExecutableDocument, FragmentDefinition, OperationDefinition, OperationType, ServiceDocument,
        TypeDefinition, TypeKind, TypeSystemDefinition,
    },
};
use async_graphql_value::Name;
use error::{ErrorCode, GraphqlError};

use crate::{
    context::location,
    registry::{ObjectType, Schema},
};

pub type Fragments<'a> = HashMap<&'a str, &'a Positioned<FragmentDefinition>>;

/// Kind of a type-system definition found in a request document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSystemKind {
    SchemaDefinition,
    SchemaExtension,
    ScalarTypeDefinition,
    ScalarTypeExtension,
    ObjectTypeDefinition,
    ObjectTypeExtension,
    InterfaceTypeDefinition,
    InterfaceTypeExtension,
    UnionTypeDefinition,
    UnionTypeExtension,
    EnumTypeDefinition,
    EnumTypeExtension,
    InputObjectTypeDefinition,
    InputObjectTypeExtension,
    DirectiveDefinition,
}

impl TypeSystemKind {
    fn of_type(definition: &TypeDefinition) -> Self {
        use TypeSystemKind::*;

        let (definition_kind, extension_kind) = match definition.kind {
            TypeKind::Scalar => (ScalarTypeDefinition, ScalarTypeExtension),
            TypeKind::Object(_) => (ObjectTypeDefinition, ObjectTypeExtension),
            TypeKind::Interface(_) => (InterfaceTypeDefinition, InterfaceTypeExtension),
            TypeKind::Union(_) => (UnionTypeDefinition, UnionTypeExtension),
            TypeKind::Enum(_) => (EnumTypeDefinition, EnumTypeExtension),
            TypeKind::InputObject(_) => (InputObjectTypeDefinition, InputObjectTypeExtension),
        };

        if definition.extend { extension_kind } else { definition_kind }
    }
}

impl fmt::Display for TypeSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub enum Definition {
    Operation {
        name: Option<Name>,
        definition: Positioned<OperationDefinition>,
    },
    Fragment {
        name: Name,
        definition: Positioned<FragmentDefinition>,
    },
    TypeSystem {
        kind: TypeSystemKind,
        pos: Pos,
    },
}

impl Definition {
    fn pos(&self) -> Pos {
        match self {
            Definition::Operation { definition, .. } => definition.pos,
            Definition::Fragment { definition, .. } => definition.pos,
            Definition::TypeSystem { pos, .. } => *pos,
        }
    }
}

/// A parsed request document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    definitions: Vec<Definition>,
}

impl Document {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Document { definitions }
    }

    pub fn parse(query: &str) -> async_graphql_parser::Result<Self> {
        async_graphql_parser::parse_query(query).map(Document::from)
    }

    /// Appends the definitions of a type-system document.
    #[must_use]
    pub fn with_type_system(mut self, document: ServiceDocument) -> Self {
        for definition in document.definitions {
            let (kind, pos) = match definition {
                TypeSystemDefinition::Schema(schema) => {
                    let kind = if schema.node.extend {
                        TypeSystemKind::SchemaExtension
                    } else {
                        TypeSystemKind::SchemaDefinition
                    };
                    (kind, schema.pos)
                }
                TypeSystemDefinition::Type(ty) => (TypeSystemKind::of_type(&ty.node), ty.pos),
                TypeSystemDefinition::Directive(directive) => (TypeSystemKind::DirectiveDefinition, directive.pos),
            };
            self.definitions.push(Definition::TypeSystem { kind, pos });
        }
        self
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn operations(&self) -> impl Iterator<Item = (Option<&Name>, &Positioned<OperationDefinition>)> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Operation { name, definition } => Some((name.as_ref(), definition)),
            _ => None,
        })
    }

    /// Fragments by name. A later definition replaces an earlier one with the same name.
    pub fn fragments(&self) -> Fragments<'_> {
        self.definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::Fragment { name, definition } => Some((name.as_str(), definition)),
                _ => None,
            })
            .collect()
    }
}

impl From<ExecutableDocument> for Document {
    fn from(document: ExecutableDocument) -> Self {
        let mut definitions = document
            .operations
            .iter()
            .map(|(name, definition)| Definition::Operation {
                name: name.cloned(),
                definition: definition.clone(),
            })
            .chain(
                document
                    .fragments
                    .into_iter()
                    .map(|(name, definition)| Definition::Fragment { name, definition }),
            )
            .collect::<Vec<_>>();

        // The parser keeps operations and fragments in hash maps.
        definitions.sort_by_key(|definition| {
            let pos = definition.pos();
            (pos.line, pos.column)
        });

        Document { definitions }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("Must provide an operation.")]
    NoOperation,
    #[error("Must provide operation name if query contains multiple operations.")]
    MissingOperationName,
    #[error("Unknown operation named \"{0}\".")]
    UnknownOperation(String),
    #[error("Schema is not configured for {kind}s.")]
    UnsupportedOperation { kind: &'static str, pos: Pos },
    #[error("GraphQL cannot execute a request containing a {kind}.")]
    NonExecutableDefinition { kind: TypeSystemKind, pos: Pos },
}

impl From<OperationError> for GraphqlError {
    fn from(err: OperationError) -> Self {
        let pos = match &err {
            OperationError::UnsupportedOperation { pos, .. } | OperationError::NonExecutableDefinition { pos, .. } => {
                Some(*pos)
            }
            _ => None,
        };

        let error = GraphqlError::new(err.to_string(), ErrorCode::OperationValidationError);
        match pos {
            Some(pos) => error.with_location(location(pos)),
            None => error,
        }
    }
}

pub(crate) fn operation_kind(ty: OperationType) -> &'static str {
    match ty {
        OperationType::Query => "query",
        OperationType::Mutation => "mutation",
        OperationType::Subscription => "subscription",
    }
}

/// Picks the operation to execute.
pub fn select_operation<'a>(
    document: &'a Document,
    operation_name: Option<&str>,
) -> Result<(Option<&'a Name>, &'a Positioned<OperationDefinition>), OperationError> {
    let mut selected = None;

    for definition in document.definitions() {
        match definition {
            Definition::Operation { name, definition } => match operation_name {
                Some(expected) => {
                    if name.as_deref() == Some(expected) {
                        selected = Some((name.as_ref(), definition));
                    }
                }
                None => {
                    if selected.is_some() {
                        return Err(OperationError::MissingOperationName);
                    }
                    selected = Some((name.as_ref(), definition));
                }
            },
            Definition::Fragment { .. } => {}
            Definition::TypeSystem { kind, pos } => {
                return Err(OperationError::NonExecutableDefinition { kind: *kind, pos: *pos });
            }
        }
    }

    selected.ok_or_else(|| match operation_name {
        Some(name) => OperationError::UnknownOperation(name.to_string()),
        None => OperationError::NoOperation,
    })
}

/// The root object type an operation executes against.
pub fn select_root_type<'a>(
    schema: &'a Schema,
    operation: &Positioned<OperationDefinition>,
) -> Result<&'a ObjectType, OperationError> {
    schema
        .root_type(operation.node.ty)
        .ok_or(OperationError::UnsupportedOperation {
            kind: operation_kind(operation.node.ty),
            pos: operation.pos,
        })
}
