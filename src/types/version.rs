use jsonschema::Draft;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The OpenAPI version families this crate models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiVersion {
    V30x,
    V31x,
}

impl FromStr for OpenApiVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let major = parts.next();
        let minor = parts.next();
        let patch_is_numeric = match parts.next() {
            None => true,
            Some(patch) => !patch.is_empty() && patch.chars().all(|c| c.is_ascii_digit()),
        };
        if parts.next().is_some() || !patch_is_numeric {
            return Err(VersionError::unsupported_version(s));
        }
        match (major, minor) {
            (Some("3"), Some("0")) => Ok(OpenApiVersion::V30x),
            (Some("3"), Some("1")) => Ok(OpenApiVersion::V31x),
            _ => Err(VersionError::unsupported_version(s)),
        }
    }
}

impl OpenApiVersion {
    /// JSON Schema draft used for inline schemas of this version.
    pub(crate) fn get_draft(&self) -> Draft {
        match self {
            OpenApiVersion::V30x => Draft::Draft4,
            OpenApiVersion::V31x => Draft::Draft202012,
        }
    }
}

impl Display for OpenApiVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenApiVersion::V30x => write!(f, "3.0.x"),
            OpenApiVersion::V31x => write!(f, "3.1.x"),
        }
    }
}

#[derive(Debug)]
pub enum VersionError {
    UnsupportedVersion(String),
}

impl VersionError {
    pub(crate) fn unsupported_version<T>(version: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        VersionError::UnsupportedVersion(version.to_string())
    }
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::UnsupportedVersion(version) => {
                write!(f, "Unsupported version: {}", version)
            }
        }
    }
}

impl std::error::Error for VersionError {}
