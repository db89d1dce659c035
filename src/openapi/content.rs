use crate::extensions::{Extensions, present_value};
use crate::openapi::parameter::{Header, ParameterStyle};
use crate::openapi::reference::ReferenceOr;
use crate::openapi::schema::Schema;
use crate::openapi::Server;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Media type range to payload description.
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl RequestBody {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Schema and examples for one media type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ReferenceOr<Schema>>,

    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, ReferenceOr<Example>>,

    /// Property name to encoding. Only applies to multipart and form bodies.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub encoding: BTreeMap<String, Encoding>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl MediaType {
    pub fn with_schema(schema: impl Into<ReferenceOr<Schema>>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none", rename = "contentType")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ReferenceOr<Header>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowReserved")]
    pub allow_reserved: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// An example payload, given inline (`value`) or by URL (`external_value`) but not both.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Example {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalValue")]
    pub external_value: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A design-time link from a response to another operation.
///
/// The target is named by `operation_ref` or `operation_id`, never both.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none", rename = "operationRef")]
    pub operation_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "operationId")]
    pub operation_id: Option<String>,

    /// Parameter name to a constant or runtime expression.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,

    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none",
        rename = "requestBody"
    )]
    pub request_body: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,

    #[serde(flatten)]
    pub extensions: Extensions,
}
