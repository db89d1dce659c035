use crate::types::json_path::JsonPath;
use std::fmt::{Display, Formatter};

/// Category of a [`ValidationErrorType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    ShapeMismatch,
    ConstraintViolation,
    UnresolvedReference,
    CyclicReference,
    AmbiguousResponseKey,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ShapeMismatch => write!(f, "Shape mismatch"),
            ErrorKind::ConstraintViolation => write!(f, "Constraint violation"),
            ErrorKind::UnresolvedReference => write!(f, "Unresolved reference"),
            ErrorKind::CyclicReference => write!(f, "Cyclic reference"),
            ErrorKind::AmbiguousResponseKey => write!(f, "Ambiguous response key"),
        }
    }
}

/// A single problem found in a document, with its location.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorType {
    /// A value does not have the type its field declares.
    ShapeMismatch(String, JsonPath),
    /// A well-typed value breaks a cross-field rule.
    ConstraintViolation(String, JsonPath),
    /// A `$ref` (or a name used like one) points at nothing.
    UnresolvedReference(String, JsonPath),
    /// Following a chain of `$ref` values leads back to a reference already visited.
    CyclicReference(String, JsonPath),
    /// Two keys in one Responses map describe the same status.
    AmbiguousResponseKey(String, JsonPath),
}

impl ValidationErrorType {
    pub(crate) fn shape_mismatch<T>(message: &T, path: &JsonPath) -> Self
    where
        T: ToString + ?Sized,
    {
        ValidationErrorType::ShapeMismatch(message.to_string(), path.clone())
    }

    pub(crate) fn constraint_violation<T>(message: &T, path: &JsonPath) -> Self
    where
        T: ToString + ?Sized,
    {
        ValidationErrorType::ConstraintViolation(message.to_string(), path.clone())
    }

    pub(crate) fn unresolved_reference<T>(message: &T, path: &JsonPath) -> Self
    where
        T: ToString + ?Sized,
    {
        ValidationErrorType::UnresolvedReference(message.to_string(), path.clone())
    }

    pub(crate) fn ambiguous_response_key<T>(message: &T, path: &JsonPath) -> Self
    where
        T: ToString + ?Sized,
    {
        ValidationErrorType::AmbiguousResponseKey(message.to_string(), path.clone())
    }

    /// Maps a resolver failure onto the matching validation kind.
    pub(crate) fn resolve_failed(error: ResolveError, path: &JsonPath) -> Self {
        match error {
            ResolveError::CyclicReference(chain) => ValidationErrorType::CyclicReference(
                format!("reference chain loops back to {}", chain),
                path.clone(),
            ),
            other => ValidationErrorType::UnresolvedReference(other.to_string(), path.clone()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationErrorType::ShapeMismatch(..) => ErrorKind::ShapeMismatch,
            ValidationErrorType::ConstraintViolation(..) => ErrorKind::ConstraintViolation,
            ValidationErrorType::UnresolvedReference(..) => ErrorKind::UnresolvedReference,
            ValidationErrorType::CyclicReference(..) => ErrorKind::CyclicReference,
            ValidationErrorType::AmbiguousResponseKey(..) => ErrorKind::AmbiguousResponseKey,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationErrorType::ShapeMismatch(msg, _)
            | ValidationErrorType::ConstraintViolation(msg, _)
            | ValidationErrorType::UnresolvedReference(msg, _)
            | ValidationErrorType::CyclicReference(msg, _)
            | ValidationErrorType::AmbiguousResponseKey(msg, _) => msg,
        }
    }

    pub fn path(&self) -> &JsonPath {
        match self {
            ValidationErrorType::ShapeMismatch(_, path)
            | ValidationErrorType::ConstraintViolation(_, path)
            | ValidationErrorType::UnresolvedReference(_, path)
            | ValidationErrorType::CyclicReference(_, path)
            | ValidationErrorType::AmbiguousResponseKey(_, path) => path,
        }
    }
}

impl Display for ValidationErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.path().is_empty() {
            write!(f, "{}: {}", self.kind(), self.message())
        } else {
            write!(f, "{}: {} at {}", self.kind(), self.message(), self.path())
        }
    }
}

impl std::error::Error for ValidationErrorType {}

/// Failure to resolve a [`Reference`](crate::openapi::Reference) against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The target does not exist, or lives in a different components section.
    UnresolvedReference(String),

    /// The reference chain revisits the named reference.
    CyclicReference(String),

    /// The reference points outside the document.
    UnsupportedReference(String),
}

impl ResolveError {
    #[inline]
    pub(crate) fn unresolved(message: impl Into<String>) -> Self {
        Self::UnresolvedReference(message.into())
    }

    #[inline]
    pub(crate) fn cyclic(message: impl Into<String>) -> Self {
        Self::CyclicReference(message.into())
    }

    #[inline]
    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedReference(message.into())
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::UnresolvedReference(msg) => write!(f, "Unresolved reference: {}", msg),
            ResolveError::CyclicReference(msg) => write!(f, "Cyclic reference: {}", msg),
            ResolveError::UnsupportedReference(msg) => {
                write!(f, "Unsupported reference: {}", msg)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Failure to read or write a document as text.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    #[cfg(feature = "yaml")]
    Yaml(serde_yaml::Error),
    UnknownFormat(String),
}

impl LoadError {
    pub(crate) fn unknown_format(message: impl Into<String>) -> Self {
        Self::UnknownFormat(message.into())
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(error) => write!(f, "I/O failure: {}", error),
            LoadError::Json(error) => write!(f, "Invalid JSON document: {}", error),
            #[cfg(feature = "yaml")]
            LoadError::Yaml(error) => write!(f, "Invalid YAML document: {}", error),
            LoadError::UnknownFormat(msg) => write!(f, "Unknown document format: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(error) => Some(error),
            LoadError::Json(error) => Some(error),
            #[cfg(feature = "yaml")]
            LoadError::Yaml(error) => Some(error),
            LoadError::UnknownFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        LoadError::Io(error)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(error: serde_json::Error) -> Self {
        LoadError::Json(error)
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for LoadError {
    fn from(error: serde_yaml::Error) -> Self {
        LoadError::Yaml(error)
    }
}

#[cfg(test)]
mod test {
    use crate::error::{ErrorKind, ResolveError, ValidationErrorType};
    use crate::types::json_path::JsonPath;

    #[test]
    fn test_display_includes_dotted_location() {
        let mut path = JsonPath::new();
        path.add("paths")
            .add("/records")
            .add("get")
            .add("parameters")
            .index(0)
            .add("required");
        let error = ValidationErrorType::constraint_violation("path parameter must be required", &path);
        assert_eq!(
            error.to_string(),
            "Constraint violation: path parameter must be required at paths./records.get.parameters[0].required"
        );
        assert_eq!(error.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(error.message(), "path parameter must be required");
    }

    #[test]
    fn test_display_without_location() {
        let error = ValidationErrorType::shape_mismatch("bad document", &JsonPath::new());
        assert_eq!(error.to_string(), "Shape mismatch: bad document");
    }

    #[test]
    fn test_resolve_failures_map_to_kinds() {
        let path = JsonPath::new();
        let cyclic = ValidationErrorType::resolve_failed(
            ResolveError::cyclic("#/components/schemas/A"),
            &path,
        );
        assert_eq!(cyclic.kind(), ErrorKind::CyclicReference);

        let missing = ValidationErrorType::resolve_failed(
            ResolveError::unresolved("#/components/schemas/B"),
            &path,
        );
        assert_eq!(missing.kind(), ErrorKind::UnresolvedReference);

        let external = ValidationErrorType::resolve_failed(
            ResolveError::unsupported("other.yaml#/Pet"),
            &path,
        );
        assert_eq!(external.kind(), ErrorKind::UnresolvedReference);
        assert!(external.message().contains("other.yaml#/Pet"));
    }
}
