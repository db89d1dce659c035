use crate::extensions::{BufferedValue, Extensions, present_value};
use crate::openapi::reference::ReferenceOr;
use crate::openapi::ExternalDocs;
use crate::types::json_path::JsonPath;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Primitive JSON Schema instance types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` keyword: one type in 3.0.x, one or many in 3.1.x.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(InstanceType),
    Multiple(Vec<InstanceType>),
}

impl SchemaType {
    pub fn contains(&self, instance_type: InstanceType) -> bool {
        match self {
            SchemaType::Single(single) => *single == instance_type,
            SchemaType::Multiple(many) => many.contains(&instance_type),
        }
    }
}

/// `exclusiveMinimum`/`exclusiveMaximum`: a flag in 3.0.x, a bound in 3.1.x.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Limit(Number),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(ReferenceOr<Schema>),
}

/// A JSON Schema: an object, or in 3.1.x also `true` (anything) or `false`
/// (nothing).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Schema {
    Boolean(bool),
    Object(Box<SchemaObject>),
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let BufferedValue(value) = BufferedValue::deserialize(deserializer)?;
        match value {
            Value::Bool(allowed) => Ok(Schema::Boolean(allowed)),
            value => SchemaObject::deserialize(value)
                .map(|object| Schema::Object(Box::new(object)))
                .map_err(D::Error::custom),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Object(Box::default())
    }
}

impl From<SchemaObject> for Schema {
    fn from(object: SchemaObject) -> Self {
        Schema::Object(Box::new(object))
    }
}

impl From<SchemaObject> for ReferenceOr<Schema> {
    fn from(object: SchemaObject) -> Self {
        ReferenceOr::Item(object.into())
    }
}

impl Schema {
    pub fn of(instance_type: InstanceType) -> Self {
        SchemaObject::of(instance_type).into()
    }

    pub fn array_of(items: impl Into<ReferenceOr<Schema>>) -> Self {
        SchemaObject::array_of(items).into()
    }

    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            Schema::Object(object) => Some(&**object),
            Schema::Boolean(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut SchemaObject> {
        match self {
            Schema::Object(object) => Some(&mut **object),
            Schema::Boolean(_) => None,
        }
    }

    /// `true` accepts `null` along with everything else.
    pub fn is_nullable(&self) -> bool {
        match self {
            Schema::Object(object) => object.is_nullable(),
            Schema::Boolean(allowed) => *allowed,
        }
    }

    pub fn subschemas(&self) -> Vec<(JsonPath, &ReferenceOr<Schema>)> {
        self.as_object().map(SchemaObject::subschemas).unwrap_or_default()
    }
}

/// A Schema Object: JSON Schema keywords with the OpenAPI additions.
///
/// Nested schemas are held inline or by reference, so the type is a plain
/// recursive tree. Keywords not listed here land in `extensions`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SchemaObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enumeration: Option<Vec<Value>>,

    /// Only available in OpenAPI 3.1.x.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none",
        rename = "const"
    )]
    pub const_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "multipleOf")]
    pub multiple_of: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "exclusiveMaximum")]
    pub exclusive_maximum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "exclusiveMinimum")]
    pub exclusive_minimum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "maxLength")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "minLength")]
    pub min_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ReferenceOr<Schema>>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "maxItems")]
    pub max_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "minItems")]
    pub min_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "uniqueItems")]
    pub unique_items: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "maxProperties")]
    pub max_properties: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "minProperties")]
    pub min_properties: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ReferenceOr<Schema>>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "additionalProperties"
    )]
    pub additional_properties: Option<Box<AdditionalProperties>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "allOf")]
    pub all_of: Vec<ReferenceOr<Schema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "oneOf")]
    pub one_of: Vec<ReferenceOr<Schema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "anyOf")]
    pub any_of: Vec<ReferenceOr<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<ReferenceOr<Schema>>>,

    /// Allows `null` in addition to `type`. Only meaningful in OpenAPI 3.0.x.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    /// Must not be `true` together with `write_only`.
    #[serde(skip_serializing_if = "Option::is_none", rename = "readOnly")]
    pub read_only: Option<bool>,

    /// Must not be `true` together with `read_only`.
    #[serde(skip_serializing_if = "Option::is_none", rename = "writeOnly")]
    pub write_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,

    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,

    /// Only available in OpenAPI 3.1.x.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl SchemaObject {
    pub fn of(instance_type: InstanceType) -> Self {
        Self {
            schema_type: Some(SchemaType::Single(instance_type)),
            ..Default::default()
        }
    }

    pub fn array_of(items: impl Into<ReferenceOr<Schema>>) -> Self {
        Self {
            items: Some(Box::new(items.into())),
            ..Self::of(InstanceType::Array)
        }
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        schema: impl Into<ReferenceOr<Schema>>,
    ) -> Self {
        self.properties.insert(name.into(), schema.into());
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
            || self
                .schema_type
                .as_ref()
                .is_some_and(|t| t.contains(InstanceType::Null))
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn is_write_only(&self) -> bool {
        self.write_only.unwrap_or(false)
    }

    /// Every directly nested schema slot, each with its path relative to this schema.
    pub fn subschemas(&self) -> Vec<(JsonPath, &ReferenceOr<Schema>)> {
        let mut nested = Vec::new();
        if let Some(items) = &self.items {
            nested.push((JsonPath::from_iter(["items"]), items.as_ref()));
        }
        for (name, property) in &self.properties {
            nested.push((JsonPath::from_iter(["properties", name.as_str()]), property));
        }
        if let Some(additional) = &self.additional_properties {
            if let AdditionalProperties::Schema(schema) = additional.as_ref() {
                nested.push((JsonPath::from_iter(["additionalProperties"]), schema));
            }
        }
        for (keyword, list) in [
            ("allOf", &self.all_of),
            ("oneOf", &self.one_of),
            ("anyOf", &self.any_of),
        ] {
            for (index, schema) in list.iter().enumerate() {
                let mut path = JsonPath::new();
                path.add(keyword).index(index);
                nested.push((path, schema));
            }
        }
        if let Some(not) = &self.not {
            nested.push((JsonPath::from_iter(["not"]), not.as_ref()));
        }
        nested
    }
}

/// Tells which schema applies to a polymorphic payload.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,

    /// Payload value to schema name or reference.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// XML representation hints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Xml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<bool>,

    #[serde(flatten)]
    pub extensions: Extensions,
}
