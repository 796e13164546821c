use async_graphql_value::ConstValue;
use error::{DebugFlags, GraphqlError};
use indexmap::IndexMap;

/// The response of a single execution.
///
/// `data` is `None` when execution never started, for instance on invalid variables, and
/// `Some(Null)` when a null propagated up to the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    pub data: Option<ConstValue>,
    pub errors: Vec<GraphqlError>,
    pub extensions: Option<IndexMap<String, serde_json::Value>>,
}

impl ExecutionResult {
    pub fn from_errors(errors: impl IntoIterator<Item = GraphqlError>) -> Self {
        ExecutionResult {
            data: None,
            errors: errors.into_iter().collect(),
            extensions: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.get_or_insert_with(IndexMap::new).insert(key.into(), value.into());
        self
    }

    /// The response as JSON, with error details gated by `flags`.
    pub fn to_value(&self, flags: DebugFlags) -> serde_json::Value {
        let mut response = serde_json::Map::new();

        if let Some(data) = &self.data {
            response.insert("data".into(), serde_json::to_value(data).unwrap_or_default());
        }

        if !self.errors.is_empty() {
            response.insert(
                "errors".into(),
                self.errors.iter().map(|error| error.to_json(flags)).collect(),
            );
        }

        if let Some(extensions) = self.extensions.as_ref().filter(|extensions| !extensions.is_empty()) {
            response.insert(
                "extensions".into(),
                extensions
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect::<serde_json::Map<_, _>>()
                    .into(),
            );
        }

        serde_json::Value::Object(response)
    }
}

impl serde::Serialize for ExecutionResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value(DebugFlags::empty()).serialize(serializer)
    }
}
