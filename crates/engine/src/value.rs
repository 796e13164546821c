use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use async_graphql_value::{ConstValue, Name};
use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};

use crate::{Deferred, Error, ResolveInfo};

/// A record whose fields are read by the default field resolver.
///
/// `ResolvedValue::downcast_ref` gives access to the concrete type.
pub trait ObjectValue: Any + Send + Sync {
    fn field(&self, name: &str) -> Option<ResolvedValue>;
}

type ThunkFn =
    dyn for<'a> Fn(&'a Arguments, &'a crate::Data, &'a ResolveInfo<'a>) -> Deferred<'a, ResolvedValue> + Send + Sync;

/// A lazily computed field value. The default resolver invokes it with the field arguments.
#[derive(Clone)]
pub struct FieldThunk(Arc<ThunkFn>);

impl FieldThunk {
    pub fn call<'a>(
        &self,
        arguments: &'a Arguments,
        data: &'a crate::Data,
        info: &'a ResolveInfo<'a>,
    ) -> Deferred<'a, ResolvedValue> {
        (self.0)(arguments, data, info)
    }
}

/// What resolvers hand back to the executor, before completion against the field type.
#[derive(Clone, Default)]
pub enum ResolvedValue {
    #[default]
    Null,
    Value(ConstValue),
    List(Vec<ResolvedValue>),
    Map(IndexMap<Name, ResolvedValue>),
    Object(Arc<dyn ObjectValue>),
    Callable(FieldThunk),
    /// A returned error, handled exactly like a resolver failure.
    Error(Error),
}

impl ResolvedValue {
    pub fn object(object: impl ObjectValue) -> Self {
        ResolvedValue::Object(Arc::new(object))
    }

    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<ResolvedValue>,
    {
        ResolvedValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (Name::new(key), value.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<ResolvedValue>>(items: impl IntoIterator<Item = V>) -> Self {
        ResolvedValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn callable<F>(thunk: F) -> Self
    where
        F: for<'a> Fn(&'a Arguments, &'a crate::Data, &'a ResolveInfo<'a>) -> Deferred<'a, ResolvedValue>
            + Send
            + Sync
            + 'static,
    {
        ResolvedValue::Callable(FieldThunk(Arc::new(thunk)))
    }

    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, Error> {
        let value = async_graphql_value::to_value(value).map_err(|err| Error::internal(err.to_string()))?;
        Ok(ResolvedValue::Value(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResolvedValue::Null | ResolvedValue::Value(ConstValue::Null))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            ResolvedValue::Object(object) => {
                let object: &dyn Any = &**object;
                object.downcast_ref()
            }
            _ => None,
        }
    }

    /// The plain value, if this value and everything inside it is plain data.
    pub fn to_const_value(&self) -> Option<ConstValue> {
        match self {
            ResolvedValue::Null => Some(ConstValue::Null),
            ResolvedValue::Value(value) => Some(value.clone()),
            ResolvedValue::List(items) => items
                .iter()
                .map(ResolvedValue::to_const_value)
                .collect::<Option<Vec<_>>>()
                .map(ConstValue::List),
            ResolvedValue::Map(entries) => entries
                .iter()
                .map(|(key, value)| Some((key.clone(), value.to_const_value()?)))
                .collect::<Option<IndexMap<_, _>>>()
                .map(ConstValue::Object),
            ResolvedValue::Object(_) | ResolvedValue::Callable(_) | ResolvedValue::Error(_) => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self.to_const_value() {
            Some(value) => describe_const(&value),
            None => match self {
                ResolvedValue::Callable(_) => "a callable".into(),
                ResolvedValue::Error(_) => "an error".into(),
                _ => "an object".into(),
            },
        }
    }
}

/// Renders a value as JSON for error messages.
pub(crate) fn describe_const(value: &ConstValue) -> String {
    match value {
        ConstValue::Enum(name) => name.to_string(),
        _ => serde_json::to_string(value).unwrap_or_else(|_| value.to_string()),
    }
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Null => f.write_str("Null"),
            ResolvedValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ResolvedValue::List(items) => f.debug_tuple("List").field(items).finish(),
            ResolvedValue::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            ResolvedValue::Object(_) => f.write_str("Object(..)"),
            ResolvedValue::Callable(_) => f.write_str("Callable(..)"),
            ResolvedValue::Error(error) => f.debug_tuple("Error").field(error).finish(),
        }
    }
}

impl From<ConstValue> for ResolvedValue {
    fn from(value: ConstValue) -> Self {
        ResolvedValue::Value(value)
    }
}

impl From<()> for ResolvedValue {
    fn from((): ()) -> Self {
        ResolvedValue::Null
    }
}

impl From<Error> for ResolvedValue {
    fn from(error: Error) -> Self {
        ResolvedValue::Error(error)
    }
}

impl From<serde_json::Value> for ResolvedValue {
    fn from(value: serde_json::Value) -> Self {
        match ConstValue::from_json(value) {
            Ok(value) => ResolvedValue::Value(value),
            Err(err) => ResolvedValue::Error(Error::internal(err.to_string())),
        }
    }
}

impl<T: Into<ResolvedValue>> From<Option<T>> for ResolvedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ResolvedValue::Null, Into::into)
    }
}

impl<T: Into<ResolvedValue>> From<Vec<T>> for ResolvedValue {
    fn from(items: Vec<T>) -> Self {
        ResolvedValue::list(items)
    }
}

macro_rules! from_plain {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ResolvedValue {
                fn from(value: $ty) -> Self {
                    ResolvedValue::Value(ConstValue::from(value))
                }
            }
        )*
    };
}

from_plain!(bool, i32, i64, u32, u64, f64, String, &str);

/// Coerced field arguments, in declaration order. Omitted arguments are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(IndexMap<Name, ConstValue>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&ConstValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Deserializes an argument, `None` when it was omitted.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, Error> {
        self.get(name)
            .map(|value| {
                async_graphql_value::from_value(value.clone())
                    .map_err(|err| Error::new(format!("Invalid argument \"{name}\": {err}")))
            })
            .transpose()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &ConstValue)> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, name: Name, value: ConstValue) {
        self.0.insert(name, value);
    }
}

impl From<Arguments> for IndexMap<Name, ConstValue> {
    fn from(arguments: Arguments) -> Self {
        arguments.0
    }
}

/// Context shared by every resolver of an execution, keyed by type.
#[derive(Default)]
pub struct Data(HashMap<TypeId, Box<dyn Any + Send + Sync>>);

impl Data {
    pub fn new() -> Self {
        Data::default()
    }

    pub fn insert<D: Any + Send + Sync>(&mut self, data: D) {
        self.0.insert(TypeId::of::<D>(), Box::new(data));
    }

    #[must_use]
    pub fn with<D: Any + Send + Sync>(mut self, data: D) -> Self {
        self.insert(data);
        self
    }

    pub fn get<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.0.get(&TypeId::of::<D>()).and_then(|data| data.downcast_ref::<D>())
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Data").field(&self.0.len()).finish()
    }
}
