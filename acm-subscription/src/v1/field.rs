use super::*;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field {path} is missing")]
    Missing { path: String },

    #[error("field {path} is not an object")]
    NotAnObject { path: String },

    #[error("field {path} is not a string")]
    NotAString { path: String },

    #[error("field {path} is empty")]
    Empty { path: String },
}

impl FieldError {
    /// Dotted path of the offending field, e.g. `metadata.namespace`.
    pub fn path(&self) -> &str {
        match self {
            Self::Missing { path }
            | Self::NotAnObject { path }
            | Self::NotAString { path }
            | Self::Empty { path } => path,
        }
    }

    fn missing(path: &[&str]) -> Self {
        let path = path.join(".");
        Self::Missing { path }
    }

    fn not_an_object(path: &[&str]) -> Self {
        let path = path.join(".");
        Self::NotAnObject { path }
    }

    pub(super) fn not_a_string(path: &[&str]) -> Self {
        let path = path.join(".");
        Self::NotAString { path }
    }

    pub(super) fn empty(path: &[&str]) -> Self {
        let path = path.join(".");
        Self::Empty { path }
    }
}

pub(super) fn lookup<'a>(
    object: &'a Map<String, Value>,
    path: &[&str],
) -> Result<&'a Value, FieldError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(FieldError::missing(path));
    };

    let mut current = object;
    for (depth, key) in parents.iter().enumerate() {
        current = match current.get(*key) {
            Some(Value::Object(inner)) => inner,
            Some(_) => return Err(FieldError::not_an_object(&path[..=depth])),
            None => return Err(FieldError::missing(&path[..=depth])),
        };
    }

    current.get(*last).ok_or_else(|| FieldError::missing(path))
}
