use crate::types::version::OpenApiVersion;
use crate::validator::{DocumentValidator, ValidatorOptions};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorBuilderError {
    InvalidVersion(String),
}

impl ValidatorBuilderError {
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        Self::InvalidVersion(msg.into())
    }
}

impl Display for ValidatorBuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidatorBuilderError::InvalidVersion(msg) => {
                write!(f, "Invalid Version: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidatorBuilderError {}

/// Configures a [`DocumentValidator`].
///
/// Every rule group is on by default. `version` pins the JSON Schema dialect
/// used for example checks instead of taking it from the document.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidatorBuilder {
    options: ValidatorOptions,
    version: Option<String>,
}

impl DocumentValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_examples(mut self, enabled: bool) -> Self {
        self.options.check_examples = enabled;
        self
    }

    pub fn check_path_templates(mut self, enabled: bool) -> Self {
        self.options.check_path_templates = enabled;
        self
    }

    pub fn check_security_requirements(mut self, enabled: bool) -> Self {
        self.options.check_security_requirements = enabled;
        self
    }

    pub fn version(mut self, version: impl AsRef<str>) -> Self {
        self.version = Some(version.as_ref().to_owned());
        self
    }

    pub fn build(self) -> Result<DocumentValidator, ValidatorBuilderError> {
        let version = match &self.version {
            None => None,
            Some(version) => match OpenApiVersion::from_str(version) {
                Ok(version) => Some(version),
                Err(e) => return Err(ValidatorBuilderError::invalid_version(e.to_string())),
            },
        };
        Ok(DocumentValidator {
            options: self.options,
            version,
        })
    }
}

#[cfg(test)]
mod test {
    use crate::validator::{DocumentValidator, ValidatorBuilderError, ValidatorOptions};

    #[test]
    fn test_defaults() {
        let validator = DocumentValidator::builder().build().unwrap();
        assert_eq!(validator.options(), &ValidatorOptions::default());
        assert!(validator.options().check_examples);
    }

    #[test]
    fn test_toggles() {
        let validator = DocumentValidator::builder()
            .check_examples(false)
            .check_path_templates(false)
            .check_security_requirements(false)
            .version("3.1.0")
            .build()
            .unwrap();
        assert_eq!(
            validator.options(),
            &ValidatorOptions {
                check_examples: false,
                check_path_templates: false,
                check_security_requirements: false,
            }
        );
    }

    #[test]
    fn test_invalid_version() {
        let result = DocumentValidator::builder().version("2.0").build();
        assert!(matches!(result, Err(ValidatorBuilderError::InvalidVersion(_))));
    }
}
