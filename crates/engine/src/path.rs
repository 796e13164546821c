use std::{fmt, sync::Arc};

use async_graphql_value::Name;
use error::{ErrorPath, ErrorPathSegment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPathSegment {
    Field(Name),
    Index(usize),
}

impl From<&str> for QueryPathSegment {
    fn from(name: &str) -> Self {
        QueryPathSegment::Field(Name::new(name))
    }
}

impl From<Name> for QueryPathSegment {
    fn from(name: Name) -> Self {
        QueryPathSegment::Field(name)
    }
}

impl From<usize> for QueryPathSegment {
    fn from(index: usize) -> Self {
        QueryPathSegment::Index(index)
    }
}

#[derive(Debug)]
struct QueryPathNode {
    segment: QueryPathSegment,
    parent: QueryPath,
}

/// Position of a value in the response, built by appending to a shared parent.
#[derive(Debug, Clone, Default)]
pub struct QueryPath(Option<Arc<QueryPathNode>>);

impl QueryPath {
    pub fn empty() -> Self {
        QueryPath(None)
    }

    #[must_use]
    pub fn child(&self, segment: impl Into<QueryPathSegment>) -> Self {
        QueryPath(Some(Arc::new(QueryPathNode {
            segment: segment.into(),
            parent: self.clone(),
        })))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn last(&self) -> Option<&QueryPathSegment> {
        self.0.as_ref().map(|node| &node.segment)
    }

    pub fn parent(&self) -> Option<&QueryPath> {
        self.0.as_ref().map(|node| &node.parent)
    }

    /// Segments from the root down.
    pub fn segments(&self) -> Vec<&QueryPathSegment> {
        let mut segments = Vec::new();
        let mut current = self;
        while let Some(node) = &current.0 {
            segments.push(&node.segment);
            current = &node.parent;
        }
        segments.reverse();
        segments
    }
}

impl PartialEq for QueryPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl From<&QueryPath> for ErrorPath {
    fn from(path: &QueryPath) -> Self {
        path.segments()
            .into_iter()
            .map(|segment| match segment {
                QueryPathSegment::Field(name) => ErrorPathSegment::Field(name.as_str().into()),
                QueryPathSegment::Index(index) => ErrorPathSegment::Index(*index),
            })
            .collect()
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().into_iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                QueryPathSegment::Field(name) => f.write_str(name)?,
                QueryPathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}
