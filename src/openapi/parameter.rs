use crate::extensions::{Extensions, present_value};
use crate::openapi::content::{Example, MediaType};
use crate::openapi::reference::ReferenceOr;
use crate::openapi::schema::Schema;
use crate::types::ParameterLocation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a parameter value is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    Matrix,
    Label,
    Form,
    Simple,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

impl ParameterStyle {
    /// Locations for which this style is defined.
    pub fn allowed_in(&self, location: ParameterLocation) -> bool {
        match self {
            ParameterStyle::Matrix | ParameterStyle::Label => location == ParameterLocation::Path,
            ParameterStyle::Form => matches!(
                location,
                ParameterLocation::Query | ParameterLocation::Cookie
            ),
            ParameterStyle::Simple => matches!(
                location,
                ParameterLocation::Path | ParameterLocation::Header
            ),
            ParameterStyle::SpaceDelimited
            | ParameterStyle::PipeDelimited
            | ParameterStyle::DeepObject => location == ParameterLocation::Query,
        }
    }
}

/// A single operation parameter, unique per (`name`, `in`) within its list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Absent means `false`. Must be `true` when `location` is path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowEmptyValue")]
    pub allow_empty_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowReserved")]
    pub allow_reserved: Option<bool>,

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

    /// Alternative to `schema`; holds exactly one media type when set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Parameter {
    /// A parameter with only `name` and `in` set. Path parameters start out required.
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: (location == ParameterLocation::Path).then_some(true),
            deprecated: None,
            allow_empty_value: None,
            style: None,
            explode: None,
            allow_reserved: None,
            schema: None,
            example: None,
            examples: BTreeMap::new(),
            content: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<ReferenceOr<Schema>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Style used when none is given: `form` for query and cookie, `simple` otherwise.
    pub fn effective_style(&self) -> ParameterStyle {
        self.style.unwrap_or(match self.location {
            ParameterLocation::Query | ParameterLocation::Cookie => ParameterStyle::Form,
            ParameterLocation::Path | ParameterLocation::Header => ParameterStyle::Simple,
        })
    }
}

/// Response or encoding header. Shaped like a [`Parameter`] without `name` and `in`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowEmptyValue")]
    pub allow_empty_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "allowReserved")]
    pub allow_reserved: Option<bool>,

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

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Fields shared by [`Parameter`] and [`Header`].
pub trait ParameterData {
    fn location(&self) -> ParameterLocation;
    fn style(&self) -> Option<ParameterStyle>;
    fn schema(&self) -> Option<&ReferenceOr<Schema>>;
    fn content(&self) -> &BTreeMap<String, MediaType>;
    fn example(&self) -> Option<&Value>;
    fn examples(&self) -> &BTreeMap<String, ReferenceOr<Example>>;
}

impl ParameterData for Parameter {
    fn location(&self) -> ParameterLocation {
        self.location
    }

    fn style(&self) -> Option<ParameterStyle> {
        self.style
    }

    fn schema(&self) -> Option<&ReferenceOr<Schema>> {
        self.schema.as_ref()
    }

    fn content(&self) -> &BTreeMap<String, MediaType> {
        &self.content
    }

    fn example(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    fn examples(&self) -> &BTreeMap<String, ReferenceOr<Example>> {
        &self.examples
    }
}

impl ParameterData for Header {
    fn location(&self) -> ParameterLocation {
        ParameterLocation::Header
    }

    fn style(&self) -> Option<ParameterStyle> {
        self.style
    }

    fn schema(&self) -> Option<&ReferenceOr<Schema>> {
        self.schema.as_ref()
    }

    fn content(&self) -> &BTreeMap<String, MediaType> {
        &self.content
    }

    fn example(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    fn examples(&self) -> &BTreeMap<String, ReferenceOr<Example>> {
        &self.examples
    }
}
