mod code;
mod path;

pub use code::*;
pub use path::*;
use std::borrow::Cow;

pub type GraphqlResult<T> = Result<T, GraphqlError>;

/// Line and column of an AST node, both starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }
}

bitflags::bitflags! {
    /// Controls which debugging details end up in serialized errors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DebugFlags: u8 {
        const INCLUDE_DEBUG_MESSAGE = 1;
        const INCLUDE_CATEGORY = 1 << 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlError {
    pub message: Cow<'static, str>,
    pub code: ErrorCode,
    pub locations: Vec<Location>,
    pub path: Option<ErrorPath>,
    // Serialized as a map, but kept as a Vec for efficiency.
    pub extensions: Vec<(Cow<'static, str>, serde_json::Value)>,
    /// Only exposed with [`DebugFlags::INCLUDE_DEBUG_MESSAGE`].
    pub debug_message: Option<String>,
}

impl GraphqlError {
    pub fn new(message: impl Into<Cow<'static, str>>, code: ErrorCode) -> Self {
        GraphqlError {
            message: message.into(),
            code,
            locations: Vec::new(),
            path: None,
            extensions: Vec::new(),
            debug_message: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.locations.extend(locations);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<ErrorPath>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<serde_json::Value>) -> Self {
        let key = key.into();
        self.extensions.push((key, value.into()));
        self
    }

    #[must_use]
    pub fn with_extensions(
        mut self,
        extensions: impl IntoIterator<Item = (impl Into<Cow<'static, str>>, impl Into<serde_json::Value>)>,
    ) -> Self {
        for (key, value) in extensions {
            self.extensions.push((key.into(), value.into()));
        }
        self
    }

    #[must_use]
    pub fn with_debug_message(mut self, message: impl Into<String>) -> Self {
        self.debug_message = Some(message.into());
        self
    }

    /// Serializes the error into its response shape.
    pub fn to_json(&self, flags: DebugFlags) -> serde_json::Value {
        let mut error = serde_json::Map::new();
        error.insert("message".into(), self.message.as_ref().into());

        if !self.locations.is_empty() {
            error.insert(
                "locations".into(),
                serde_json::to_value(&self.locations).unwrap_or_default(),
            );
        }

        if let Some(path) = &self.path {
            error.insert("path".into(), serde_json::to_value(path).unwrap_or_default());
        }

        let mut extensions = self
            .extensions
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect::<serde_json::Map<_, _>>();

        if flags.contains(DebugFlags::INCLUDE_CATEGORY) {
            extensions.insert("category".into(), self.code.as_ref().into());
        }

        if flags.contains(DebugFlags::INCLUDE_DEBUG_MESSAGE) {
            if let Some(debug_message) = &self.debug_message {
                extensions.insert("debugMessage".into(), debug_message.as_str().into());
            }
        }

        if !extensions.is_empty() {
            error.insert("extensions".into(), extensions.into());
        }

        serde_json::Value::Object(error)
    }

    // ------------- //
    // Common errors //
    // ------------- //

    pub fn internal_server_error() -> Self {
        GraphqlError::new("Internal server error", ErrorCode::InternalServerError)
    }

    pub fn field_error(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError::new(message, ErrorCode::FieldError)
    }
}

impl serde::Serialize for GraphqlError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json(DebugFlags::empty()).serialize(serializer)
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for GraphqlError {}
