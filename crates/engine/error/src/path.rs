#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Default)]
pub struct ErrorPath(Vec<ErrorPathSegment>);

impl std::ops::Deref for ErrorPath {
    type Target = Vec<ErrorPathSegment>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for ErrorPath {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl serde::Serialize for ErrorPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum ErrorPathSegment {
    Field(Box<str>),
    Index(usize),
}

pub trait InsertIntoErrorPath {
    fn insert_into(self, path: &mut ErrorPath);
}

impl InsertIntoErrorPath for &str {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Field(self.into()));
    }
}

impl InsertIntoErrorPath for String {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Field(self.into_boxed_str()));
    }
}

impl InsertIntoErrorPath for usize {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Index(self));
    }
}

impl InsertIntoErrorPath for ErrorPathSegment {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(self);
    }
}

impl<T: InsertIntoErrorPath> FromIterator<T> for ErrorPath {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut path = ErrorPath::default();
        for item in iter {
            item.insert_into(&mut path);
        }
        path
    }
}

impl<T: InsertIntoErrorPath, const N: usize> From<[T; N]> for ErrorPath {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: InsertIntoErrorPath> From<Vec<T>> for ErrorPath {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}
