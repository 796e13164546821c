use std::{fmt, sync::Arc};

use async_graphql_value::Name;

use super::ObjectType;
use crate::{Arguments, Data, Deferred, ResolveInfo, ResolvedValue};

type ResolverFn = dyn for<'a> Fn(
        &'a ResolvedValue,
        &'a Arguments,
        &'a Data,
        &'a ResolveInfo<'a>,
    ) -> Deferred<'a, ResolvedValue>
    + Send
    + Sync;

type IsTypeOfFn = dyn for<'a> Fn(&'a ResolvedValue, &'a Data, &'a ResolveInfo<'a>) -> Deferred<'a, bool> + Send + Sync;

type ResolveTypeFn = dyn for<'a> Fn(
        &'a ResolvedValue,
        &'a Data,
        &'a ResolveInfo<'a>,
    ) -> Deferred<'a, Option<ResolvedType<'a>>>
    + Send
    + Sync;

/// Resolves a field from its parent value, the coerced arguments and the context data.
#[derive(Clone)]
pub struct FieldResolver(Arc<ResolverFn>);

impl FieldResolver {
    pub fn new<F>(resolver: F) -> Self
    where
        F: for<'a> Fn(&'a ResolvedValue, &'a Arguments, &'a Data, &'a ResolveInfo<'a>) -> Deferred<'a, ResolvedValue>
            + Send
            + Sync
            + 'static,
    {
        FieldResolver(Arc::new(resolver))
    }

    pub fn call<'a>(
        &self,
        source: &'a ResolvedValue,
        arguments: &'a Arguments,
        data: &'a Data,
        info: &'a ResolveInfo<'a>,
    ) -> Deferred<'a, ResolvedValue> {
        (self.0)(source, arguments, data, info)
    }
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldResolver")
    }
}

/// Tells whether a value belongs to an object type.
#[derive(Clone)]
pub struct IsTypeOf(Arc<IsTypeOfFn>);

impl IsTypeOf {
    pub fn new<F>(check: F) -> Self
    where
        F: for<'a> Fn(&'a ResolvedValue, &'a Data, &'a ResolveInfo<'a>) -> Deferred<'a, bool> + Send + Sync + 'static,
    {
        IsTypeOf(Arc::new(check))
    }

    pub fn call<'a>(&self, value: &'a ResolvedValue, data: &'a Data, info: &'a ResolveInfo<'a>) -> Deferred<'a, bool> {
        (self.0)(value, data, info)
    }
}

impl fmt::Debug for IsTypeOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IsTypeOf")
    }
}

/// Runtime type chosen by a [`TypeResolver`].
#[derive(Debug, Clone)]
pub enum ResolvedType<'a> {
    Name(Name),
    Object(&'a ObjectType),
}

impl ResolvedType<'_> {
    pub fn name(&self) -> &str {
        match self {
            ResolvedType::Name(name) => name,
            ResolvedType::Object(object) => &object.name,
        }
    }
}

impl From<&str> for ResolvedType<'_> {
    fn from(name: &str) -> Self {
        ResolvedType::Name(Name::new(name))
    }
}

impl From<Name> for ResolvedType<'_> {
    fn from(name: Name) -> Self {
        ResolvedType::Name(name)
    }
}

/// Picks the concrete object type of an interface or union value.
#[derive(Clone)]
pub struct TypeResolver(Arc<ResolveTypeFn>);

impl TypeResolver {
    pub fn new<F>(resolve: F) -> Self
    where
        F: for<'a> Fn(&'a ResolvedValue, &'a Data, &'a ResolveInfo<'a>) -> Deferred<'a, Option<ResolvedType<'a>>>
            + Send
            + Sync
            + 'static,
    {
        TypeResolver(Arc::new(resolve))
    }

    pub fn call<'a>(
        &self,
        value: &'a ResolvedValue,
        data: &'a Data,
        info: &'a ResolveInfo<'a>,
    ) -> Deferred<'a, Option<ResolvedType<'a>>> {
        (self.0)(value, data, info)
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeResolver")
    }
}
