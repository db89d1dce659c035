//! One Rust type per OpenAPI 3.x object.
//!
//! Every record keeps fields it does not know in an [`Extensions`] map (or in
//! the caller's `E` for path items and operations), and optional fields that
//! are absent stay absent on output.

pub mod components;
pub mod content;
pub mod parameter;
pub mod path;
pub mod reference;
pub mod responses;
pub mod schema;
pub mod security;

pub use crate::openapi::components::Components;
pub use crate::openapi::content::{Encoding, Example, Link, MediaType, RequestBody};
pub use crate::openapi::parameter::{Header, Parameter, ParameterData, ParameterStyle};
pub use crate::openapi::path::{Callback, Operation, PathItem, Paths};
pub use crate::openapi::reference::{Reference, ReferenceOr};
pub use crate::openapi::responses::{Response, Responses};
pub use crate::openapi::schema::{
    AdditionalProperties, Discriminator, ExclusiveBound, InstanceType, Schema, SchemaObject,
    SchemaType, Xml,
};
pub use crate::openapi::security::{
    ApiKeyLocation, OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme,
    SecuritySchemeType,
};
pub use crate::types::ParameterLocation;

use crate::extensions::Extensions;
use crate::types::version::{OpenApiVersion, VersionError};
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The root of an OpenAPI 3.0.x or 3.1.x document.
///
/// `E` is the extension shape of every [`PathItem`] and [`Operation`] in the
/// document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "E: Deserialize<'de>"))]
pub struct OpenApi<E = Extensions> {
    /// Version of the OpenAPI Specification the document follows, e.g. `3.0.3`.
    pub openapi: String,

    pub info: Info,

    /// Only available in OpenAPI 3.1.x.
    #[serde(skip_serializing_if = "Option::is_none", rename = "jsonSchemaDialect")]
    pub json_schema_dialect: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub paths: Paths<E>,

    /// Only available in OpenAPI 3.1.x.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub webhooks: BTreeMap<String, ReferenceOr<PathItem<E>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl<E> OpenApi<E> {
    pub fn new(openapi: impl Into<String>, info: Info) -> Self {
        Self {
            openapi: openapi.into(),
            info,
            json_schema_dialect: None,
            servers: Vec::new(),
            paths: Paths::new(),
            webhooks: BTreeMap::new(),
            components: None,
            security: None,
            tags: Vec::new(),
            external_docs: None,
            extensions: Extensions::new(),
        }
    }

    pub fn version(&self) -> Result<OpenApiVersion, VersionError> {
        OpenApiVersion::from_str(&self.openapi)
    }

    /// Components section, created empty on first use.
    pub fn components_mut(&mut self) -> &mut Components<E> {
        self.components.get_or_insert_with(Components::new)
    }

    /// Every operation under `paths`, as (template, method, operation).
    pub fn operations(&self) -> impl Iterator<Item = (&str, Method, &Operation<E>)> {
        self.paths.iter().flat_map(|(template, item)| {
            item.operations()
                .map(move |(method, operation)| (template.as_str(), method, operation))
        })
    }

    pub fn operation_by_id(&self, operation_id: &str) -> Option<(&str, Method, &Operation<E>)> {
        self.operations()
            .find(|(_, _, operation)| operation.operation_id.as_deref() == Some(operation_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Info {
    pub title: String,

    /// Only available in OpenAPI 3.1.x.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "termsOfService")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    /// Version of the described API, not of OpenAPI.
    pub version: String,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct License {
    pub name: String,

    /// SPDX expression. Only available in OpenAPI 3.1.x.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A deployment target. `url` may hold `{variable}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, ServerVariable>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Names of the `{variable}` placeholders in `url`, in order of appearance.
    pub fn url_variables(&self) -> Vec<&str> {
        template_variables(&self.url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServerVariable {
    /// When present, `default` must be one of these values.
    #[serde(skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enumeration: Option<Vec<String>>,

    pub default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Tag {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub url: String,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Names between `{` and `}` in a path or server URL template.
pub fn template_variables(template: &str) -> Vec<&str> {
    let mut variables = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                variables.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    variables
}

#[cfg(test)]
mod test {
    use crate::openapi::{
        Info, OpenApi, Operation, Parameter, ParameterLocation, PathItem, Server,
        ServerVariable, template_variables,
    };
    use crate::types::version::OpenApiVersion;
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// The `records` document: one server, one path, one cookie parameter.
    fn records_document() -> OpenApi {
        let mut document = OpenApi::new("3.0.0", Info::new("myapi", "1.0"));
        document
            .servers
            .push(Server::new("http://testapi.example.org"));
        let mut item = PathItem::default();
        item.get = Some(Operation {
            tags: vec!["tag1".to_string()],
            deprecated: Some(true),
            parameters: vec![Parameter::new("param1", ParameterLocation::Cookie).into()],
            ..Default::default()
        });
        document.paths.insert("/records", item);
        document
    }

    #[test]
    fn test_records_document_round_trip() {
        let document = records_document();
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({
                "openapi": "3.0.0",
                "info": {"title": "myapi", "version": "1.0"},
                "servers": [{"url": "http://testapi.example.org"}],
                "paths": {
                    "/records": {
                        "get": {
                            "tags": ["tag1"],
                            "deprecated": true,
                            "parameters": [{"name": "param1", "in": "cookie"}]
                        }
                    }
                }
            })
        );
        let parsed: OpenApi = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, document);

        let parameter = parsed.paths.get("/records").unwrap().get.as_ref().unwrap().parameters[0]
            .as_item()
            .unwrap();
        assert_eq!(parameter.location, ParameterLocation::Cookie);
        assert_eq!(parameter.required, None);
    }

    #[test]
    fn test_missing_required_fields_fail() {
        assert!(serde_json::from_value::<OpenApi>(json!({"openapi": "3.0.0"})).is_err());
        assert!(
            serde_json::from_value::<OpenApi>(json!({"openapi": "3.0.0", "info": {"title": "t"}}))
                .is_err()
        );
        assert!(serde_json::from_value::<OpenApi>(json!({"openapi": 3, "info": {}})).is_err());
    }

    #[test]
    fn test_paths_default_when_absent() {
        let document: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": {"title": "hooks", "version": "1"},
            "webhooks": {"newPet": {"post": {"responses": {"200": {"description": "ok"}}}}}
        }))
        .unwrap();
        assert!(document.paths.is_empty());
        assert_eq!(document.webhooks.len(), 1);
        assert_eq!(document.version().unwrap(), OpenApiVersion::V31x);
    }

    #[test]
    fn test_operation_lookup() {
        let mut document = records_document();
        document
            .paths
            .get_mut("/records")
            .unwrap()
            .get
            .as_mut()
            .unwrap()
            .operation_id = Some("someid".to_string());
        let (template, method, _) = document.operation_by_id("someid").unwrap();
        assert_eq!(template, "/records");
        assert_eq!(method, Method::GET);
        assert!(document.operation_by_id("other").is_none());
        assert_eq!(document.operations().count(), 1);
    }

    #[test]
    fn test_server_variable_enum_field_name() {
        let variable = ServerVariable {
            enumeration: Some(vec!["100".to_string(), "200".to_string()]),
            default: "100".to_string(),
            description: Some("some number".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&variable).unwrap(),
            json!({"enum": ["100", "200"], "default": "100", "description": "some number"})
        );
    }

    #[test]
    fn test_template_variables() {
        assert_eq!(template_variables("/pets/{petId}/toys/{toyId}"), vec!["petId", "toyId"]);
        assert_eq!(
            Server::new("https://{region}.example.org:{port}/v1").url_variables(),
            vec!["region", "port"]
        );
        assert!(template_variables("/pets").is_empty());
        assert!(template_variables("/broken/{id").is_empty());
    }
}
