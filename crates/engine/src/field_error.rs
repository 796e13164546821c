use std::{fmt, sync::Arc};

use error::{ErrorCode, GraphqlError};

/// An error raised by a resolver, `is_type_of` or `resolve_type`.
///
/// Any [`std::error::Error`] converts into it, so resolvers can use `?`.
#[derive(Clone)]
pub struct Error {
    pub message: String,
    pub extensions: Vec<(String, serde_json::Value)>,
    client_safe: bool,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Error {
            message: message.into(),
            extensions: Vec::new(),
            client_safe: true,
            source: None,
        }
    }

    /// An error whose message must not reach clients. It is reported as `Internal server error`.
    pub fn internal(message: impl Into<String>) -> Self {
        Error {
            client_safe: false,
            ..Error::new(message)
        }
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.push((key.into(), value.into()));
        self
    }

    pub fn is_client_safe(&self) -> bool {
        self.client_safe
    }

    pub fn source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub(crate) fn into_graphql_error(self) -> GraphqlError {
        let error = if self.client_safe {
            GraphqlError::new(self.message, ErrorCode::FieldError)
        } else {
            GraphqlError::internal_server_error().with_debug_message(self.message)
        };

        error.with_extensions(self.extensions)
    }
}

impl<E> From<E> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Error {
            message: error.to_string(),
            extensions: Vec::new(),
            client_safe: true,
            source: Some(Arc::new(error)),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("extensions", &self.extensions)
            .field("client_safe", &self.client_safe)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.extensions == other.extensions && self.client_safe == other.client_safe
    }
}
