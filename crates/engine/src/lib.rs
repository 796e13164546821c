//! A GraphQL execution engine.
//!
//! Build a [`registry::Schema`], parse a [`Document`] and hand both to an [`Executor`]. Resolvers
//! return [`Deferred`] values, so synchronous schemas complete without ever touching an async
//! runtime while asynchronous ones are driven by the caller's executor.

#![deny(clippy::future_not_send)]

pub mod coercion;
mod config;
mod context;
mod deferred;
mod executor;
mod field_error;
pub mod operation;
mod path;
pub mod registry;
mod resolver_utils;
mod response;
mod value;

pub use async_graphql_value::{ConstValue, Name, Number};
pub use config::{ConcurrencyMode, DebugConfig, ExecutorConfig};
pub use context::ResolveInfo;
pub use deferred::{ConcurrentPromiseAdapter, Deferred, PromiseAdapter, SyncPromiseAdapter};
pub use error::{DebugFlags, ErrorCode, ErrorPath, ErrorPathSegment, GraphqlError, Location};
pub use executor::{ExecutionRequest, Executor, execute};
pub use field_error::{Error, Result};
pub use operation::Document;
pub use path::{QueryPath, QueryPathSegment};
pub use resolver_utils::default_field_resolver;
pub use response::ExecutionResult;
pub use value::{Arguments, Data, FieldThunk, ObjectValue, ResolvedValue};

/// Coerced variable values of an execution, by name.
pub type Variables = indexmap::IndexMap<Name, ConstValue>;
