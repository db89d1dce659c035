use crate::extensions::Extensions;
use crate::openapi::content::{Example, Link, RequestBody};
use crate::openapi::parameter::{Header, Parameter};
use crate::openapi::path::{Callback, PathItem};
use crate::openapi::reference::ReferenceOr;
use crate::openapi::responses::Response;
use crate::openapi::schema::Schema;
use crate::openapi::security::SecurityScheme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named, reusable objects that the rest of the document can reference.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "E: Deserialize<'de>"))]
pub struct Components<E = Extensions> {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, ReferenceOr<Schema>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, ReferenceOr<Response>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ReferenceOr<Parameter>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, ReferenceOr<Example>>,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        rename = "requestBodies"
    )]
    pub request_bodies: BTreeMap<String, ReferenceOr<RequestBody>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ReferenceOr<Header>>,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        rename = "securitySchemes"
    )]
    pub security_schemes: BTreeMap<String, ReferenceOr<SecurityScheme>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, ReferenceOr<Link>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub callbacks: BTreeMap<String, ReferenceOr<Callback<E>>>,

    /// Only available in OpenAPI 3.1.x.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        rename = "pathItems"
    )]
    pub path_items: BTreeMap<String, ReferenceOr<PathItem<E>>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl<E> Default for Components<E> {
    fn default() -> Self {
        Self {
            schemas: BTreeMap::new(),
            responses: BTreeMap::new(),
            parameters: BTreeMap::new(),
            examples: BTreeMap::new(),
            request_bodies: BTreeMap::new(),
            headers: BTreeMap::new(),
            security_schemes: BTreeMap::new(),
            links: BTreeMap::new(),
            callbacks: BTreeMap::new(),
            path_items: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<E> Components<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.responses.is_empty()
            && self.parameters.is_empty()
            && self.examples.is_empty()
            && self.request_bodies.is_empty()
            && self.headers.is_empty()
            && self.security_schemes.is_empty()
            && self.links.is_empty()
            && self.callbacks.is_empty()
            && self.path_items.is_empty()
            && self.extensions.is_empty()
    }
}
