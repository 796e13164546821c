use async_graphql_value::{ConstValue, Name};
use indexmap::IndexMap;

use super::{FieldResolver, IsTypeOf, ScalarType, TypeRef, TypeResolver};
use crate::{Arguments, Data, Deferred, Error, ResolveInfo, ResolvedValue, value::describe_const};

#[derive(Debug, Clone)]
pub struct MetaInputValue {
    pub name: Name,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub default_value: Option<ConstValue>,
}

impl MetaInputValue {
    pub fn new(name: impl AsRef<str>, ty: TypeRef) -> Self {
        MetaInputValue {
            name: Name::new(name),
            description: None,
            ty,
            default_value: None,
        }
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<ConstValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct MetaField {
    pub name: Name,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub args: IndexMap<Name, MetaInputValue>,
    pub deprecation: Option<String>,
    pub resolver: Option<FieldResolver>,
}

impl MetaField {
    pub fn new(name: impl AsRef<str>, ty: TypeRef) -> Self {
        MetaField {
            name: Name::new(name),
            description: None,
            ty,
            args: IndexMap::new(),
            deprecation: None,
            resolver: None,
        }
    }

    #[must_use]
    pub fn argument(mut self, argument: MetaInputValue) -> Self {
        self.args.insert(argument.name.clone(), argument);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }

    #[must_use]
    pub fn resolve<F>(mut self, resolver: F) -> Self
    where
        F: for<'a> Fn(&'a ResolvedValue, &'a Arguments, &'a Data, &'a ResolveInfo<'a>) -> Deferred<'a, ResolvedValue>
            + Send
            + Sync
            + 'static,
    {
        self.resolver = Some(FieldResolver::new(resolver));
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: FieldResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: IndexMap<Name, MetaField>,
    pub interfaces: Vec<Name>,
    pub is_type_of: Option<IsTypeOf>,
}

impl ObjectType {
    pub fn new(name: impl AsRef<str>) -> Self {
        ObjectType {
            name: Name::new(name),
            description: None,
            fields: IndexMap::new(),
            interfaces: Vec::new(),
            is_type_of: None,
        }
    }

    #[must_use]
    pub fn field(mut self, field: MetaField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl AsRef<str>) -> Self {
        self.interfaces.push(Name::new(interface));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_type_of<F>(mut self, check: F) -> Self
    where
        F: for<'a> Fn(&'a ResolvedValue, &'a Data, &'a ResolveInfo<'a>) -> Deferred<'a, bool> + Send + Sync + 'static,
    {
        self.is_type_of = Some(IsTypeOf::new(check));
        self
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: IndexMap<Name, MetaField>,
    pub interfaces: Vec<Name>,
    pub resolve_type: Option<TypeResolver>,
}

impl InterfaceType {
    pub fn new(name: impl AsRef<str>) -> Self {
        InterfaceType {
            name: Name::new(name),
            description: None,
            fields: IndexMap::new(),
            interfaces: Vec::new(),
            resolve_type: None,
        }
    }

    #[must_use]
    pub fn field(mut self, field: MetaField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl AsRef<str>) -> Self {
        self.interfaces.push(Name::new(interface));
        self
    }

    #[must_use]
    pub fn resolve_type(mut self, resolver: TypeResolver) -> Self {
        self.resolve_type = Some(resolver);
        self
    }
}

#[derive(Debug, Clone)]
pub struct UnionType {
    pub name: Name,
    pub description: Option<String>,
    pub members: Vec<Name>,
    pub resolve_type: Option<TypeResolver>,
}

impl UnionType {
    pub fn new(name: impl AsRef<str>) -> Self {
        UnionType {
            name: Name::new(name),
            description: None,
            members: Vec::new(),
            resolve_type: None,
        }
    }

    #[must_use]
    pub fn member(mut self, object: impl AsRef<str>) -> Self {
        self.members.push(Name::new(object));
        self
    }

    #[must_use]
    pub fn resolve_type(mut self, resolver: TypeResolver) -> Self {
        self.resolve_type = Some(resolver);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MetaEnumValue {
    pub name: Name,
    pub description: Option<String>,
    pub deprecation: Option<String>,
    /// What resolvers return and what arguments receive. Defaults to the name as a string.
    pub value: ConstValue,
}

impl MetaEnumValue {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = Name::new(name);
        MetaEnumValue {
            value: ConstValue::String(name.to_string()),
            name,
            description: None,
            deprecation: None,
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<ConstValue>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct EnumType {
    pub name: Name,
    pub description: Option<String>,
    pub values: IndexMap<Name, MetaEnumValue>,
}

impl EnumType {
    pub fn new(name: impl AsRef<str>) -> Self {
        EnumType {
            name: Name::new(name),
            description: None,
            values: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn value(mut self, value: MetaEnumValue) -> Self {
        self.values.insert(value.name.clone(), value);
        self
    }

    pub fn value_by_name(&self, name: &str) -> Option<&MetaEnumValue> {
        self.values.get(name)
    }

    pub fn value_by_internal(&self, internal: &ConstValue) -> Option<&MetaEnumValue> {
        self.values.values().find(|value| &value.value == internal)
    }

    /// Maps an internal value back to the name of its enum value.
    pub fn serialize(&self, value: &ConstValue) -> Result<ConstValue, Error> {
        let by_name = match value {
            ConstValue::Enum(name) => self.value_by_name(name),
            _ => None,
        };

        self.value_by_internal(value)
            .or(by_name)
            .map(|value| ConstValue::Enum(value.name.clone()))
            .ok_or_else(|| {
                Error::new(format!(
                    "Expected a value of type \"{}\" but received: {}",
                    self.name,
                    describe_const(value)
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: IndexMap<Name, MetaInputValue>,
}

impl InputObjectType {
    pub fn new(name: impl AsRef<str>) -> Self {
        InputObjectType {
            name: Name::new(name),
            description: None,
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: MetaInputValue) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MetaDirective {
    pub name: Name,
    pub description: Option<String>,
    pub args: IndexMap<Name, MetaInputValue>,
}

impl MetaDirective {
    pub fn new(name: impl AsRef<str>) -> Self {
        MetaDirective {
            name: Name::new(name),
            description: None,
            args: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn argument(mut self, argument: MetaInputValue) -> Self {
        self.args.insert(argument.name.clone(), argument);
        self
    }

    pub(crate) fn skip() -> Self {
        MetaDirective::new("skip").argument(MetaInputValue::new("if", TypeRef::named("Boolean").non_null()))
    }

    pub(crate) fn include() -> Self {
        MetaDirective::new("include").argument(MetaInputValue::new("if", TypeRef::named("Boolean").non_null()))
    }
}

#[derive(Debug, Clone, derive_more::From)]
pub enum MetaType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            MetaType::Scalar(ty) => &ty.name,
            MetaType::Object(ty) => &ty.name,
            MetaType::Interface(ty) => &ty.name,
            MetaType::Union(ty) => &ty.name,
            MetaType::Enum(ty) => &ty.name,
            MetaType::InputObject(ty) => &ty.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MetaType::Scalar(_) => "SCALAR",
            MetaType::Object(_) => "OBJECT",
            MetaType::Interface(_) => "INTERFACE",
            MetaType::Union(_) => "UNION",
            MetaType::Enum(_) => "ENUM",
            MetaType::InputObject(_) => "INPUT_OBJECT",
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, MetaType::Scalar(_) | MetaType::Enum(_) | MetaType::InputObject(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, MetaType::Scalar(_) | MetaType::Enum(_))
    }

    pub fn fields(&self) -> Option<&IndexMap<Name, MetaField>> {
        match self {
            MetaType::Object(ty) => Some(&ty.fields),
            MetaType::Interface(ty) => Some(&ty.fields),
            _ => None,
        }
    }

    pub fn resolve_type(&self) -> Option<&TypeResolver> {
        match self {
            MetaType::Interface(ty) => ty.resolve_type.as_ref(),
            MetaType::Union(ty) => ty.resolve_type.as_ref(),
            _ => None,
        }
    }
}
