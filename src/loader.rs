//! Reading and writing documents as JSON or YAML text.

use crate::error::LoadError;
use crate::openapi::OpenApi;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension: `json`, `yaml` or `yml`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            Some("yaml" | "yml") => Ok(DocumentFormat::Yaml),
            _ => Err(LoadError::unknown_format(path.display().to_string())),
        }
    }
}

pub fn parse<E>(text: &str, format: DocumentFormat) -> Result<OpenApi<E>, LoadError>
where
    E: DeserializeOwned,
{
    let document = match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(document)
}

pub fn from_path<E>(path: impl AsRef<Path>) -> Result<OpenApi<E>, LoadError>
where
    E: DeserializeOwned,
{
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    log::debug!("Loading {:?} document from {}", format, path.display());
    parse(&text, format)
}

/// Renders `document`. JSON output is pretty-printed.
pub fn render<E>(document: &OpenApi<E>, format: DocumentFormat) -> Result<String, LoadError>
where
    E: Serialize,
{
    let text = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(document)?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(document)?,
    };
    Ok(text)
}

pub fn to_path<E>(document: &OpenApi<E>, path: impl AsRef<Path>) -> Result<(), LoadError>
where
    E: Serialize,
{
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let text = render(document, format)?;
    log::debug!("Writing {:?} document to {}", format, path.display());
    std::fs::write(path, text)?;
    Ok(())
}
