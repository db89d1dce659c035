use crate::extensions::BufferedValue;
use crate::types::json_path::escape_segment;
use crate::{COMPONENTS_FIELD, FRAGMENT_ROOT, REF_FIELD};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sibling keys a 3.1.x Reference Object may carry next to `$ref`.
const ANNOTATION_FIELDS: [&str; 2] = ["summary", "description"];

/// An object holding `$ref`.
///
/// `summary` and `description` are the 3.1.x annotations that may override
/// the target's own. Any other sibling is rejected, so such an object never
/// decodes as a `Reference`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            summary: None,
            description: None,
        }
    }

    /// Builds `#/components/<section>/<name>`, escaping the name.
    pub fn component(section: &str, name: &str) -> Self {
        Self::new(format!(
            "{}{}/{}/{}",
            FRAGMENT_ROOT,
            COMPONENTS_FIELD,
            section,
            escape_segment(name)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.reference
    }

    /// Whether the reference points into this document rather than another resource.
    pub fn is_local(&self) -> bool {
        self.reference.starts_with('#')
    }

    /// Tests a raw value for the reference shape: an object whose only field is a string `$ref`.
    pub fn matches(value: &Value) -> bool {
        match value.as_object() {
            Some(object) => {
                object.len() == 1 && object.get(REF_FIELD).is_some_and(Value::is_string)
            }
            None => false,
        }
    }

    /// A string `$ref` with nothing but `summary`/`description` beside it.
    fn is_annotated(value: &Value) -> bool {
        match value.as_object() {
            Some(object) => {
                object.get(REF_FIELD).is_some_and(Value::is_string)
                    && object
                        .keys()
                        .all(|key| key == REF_FIELD || ANNOTATION_FIELDS.contains(&key.as_str()))
            }
            None => false,
        }
    }
}

/// A slot that holds either a concrete object or a [`Reference`] to one.
///
/// There is no tag on the wire. A lone `$ref` is a reference and any other
/// shape is the concrete object. The one exception is a `$ref` annotated with
/// `summary`/`description` that does not decode as `T`, which is kept as a
/// reference. When neither fits, `T`'s own error is reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference(Reference),
    Item(T),
}

impl<'de, T> Deserialize<'de> for ReferenceOr<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let BufferedValue(value) = BufferedValue::deserialize(deserializer)?;
        if Reference::matches(&value) {
            return Reference::deserialize(value)
                .map(ReferenceOr::Reference)
                .map_err(D::Error::custom);
        }
        if !Reference::is_annotated(&value) {
            return T::deserialize(value)
                .map(ReferenceOr::Item)
                .map_err(D::Error::custom);
        }
        match T::deserialize(value.clone()) {
            Ok(item) => Ok(ReferenceOr::Item(item)),
            Err(_) => Reference::deserialize(value)
                .map(ReferenceOr::Reference)
                .map_err(D::Error::custom),
        }
    }
}

impl<T> ReferenceOr<T> {
    pub fn reference(reference: impl Into<String>) -> Self {
        ReferenceOr::Reference(Reference::new(reference))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ReferenceOr::Reference(_))
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            ReferenceOr::Reference(reference) => Some(reference),
            ReferenceOr::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            ReferenceOr::Reference(_) => None,
            ReferenceOr::Item(item) => Some(item),
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut T> {
        match self {
            ReferenceOr::Reference(_) => None,
            ReferenceOr::Item(item) => Some(item),
        }
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            ReferenceOr::Reference(_) => None,
            ReferenceOr::Item(item) => Some(item),
        }
    }
}

impl<T> From<T> for ReferenceOr<T> {
    fn from(item: T) -> Self {
        ReferenceOr::Item(item)
    }
}

#[cfg(test)]
mod test {
    use crate::openapi::reference::{Reference, ReferenceOr};
    use crate::openapi::schema::Schema;
    use crate::openapi::{ExternalDocs, Parameter, Response};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_lone_ref_is_reference() {
        let value = json!({"$ref": "#/components/schemas/Pet"});
        assert!(Reference::matches(&value));
        let slot: ReferenceOr<Schema> = serde_json::from_value(value.clone()).unwrap();
        assert!(slot.is_reference());
        assert_eq!(
            slot.as_reference().map(Reference::as_str),
            Some("#/components/schemas/Pet")
        );
        assert_eq!(serde_json::to_value(&slot).unwrap(), value);
    }

    #[test]
    fn test_ref_with_siblings_is_concrete() {
        let value = json!({"$ref": "#/components/schemas/Pet", "description": "a pet"});
        assert!(!Reference::matches(&value));
        let slot: ReferenceOr<Schema> = serde_json::from_value(value.clone()).unwrap();
        assert!(!slot.is_reference());
        let schema = slot.as_item().and_then(Schema::as_object).unwrap();
        assert_eq!(schema.description.as_deref(), Some("a pet"));
        // The stray $ref is kept as an unknown field.
        assert_eq!(serde_json::to_value(&slot).unwrap(), value);
    }

    #[test]
    fn test_non_string_ref_is_concrete() {
        let value = json!({"$ref": 5});
        assert!(!Reference::matches(&value));
        let slot: ReferenceOr<Schema> = serde_json::from_value(value).unwrap();
        assert!(slot.as_item().is_some());
    }

    #[test]
    fn test_concrete_parameter() {
        let value = json!({"name": "limit", "in": "query"});
        let slot: ReferenceOr<Parameter> = serde_json::from_value(value).unwrap();
        assert_eq!(slot.into_item().map(|p| p.name), Some("limit".to_string()));
    }

    #[test]
    fn test_neither_shape_fails() {
        let value = json!({"description": "missing url"});
        assert!(serde_json::from_value::<ReferenceOr<ExternalDocs>>(value).is_err());
    }

    #[test]
    fn test_error_names_the_missing_field() {
        let value = json!({"name": "limit"});
        let error = serde_json::from_value::<ReferenceOr<Parameter>>(value).unwrap_err();
        assert!(error.to_string().contains("missing field `in`"), "{}", error);
    }

    #[test]
    fn test_annotated_reference() {
        let value = json!({
            "$ref": "#/components/parameters/limit",
            "summary": "page size",
            "description": "how many records to return"
        });
        let slot: ReferenceOr<Parameter> = serde_json::from_value(value.clone()).unwrap();
        let reference = slot.as_reference().unwrap();
        assert_eq!(reference.as_str(), "#/components/parameters/limit");
        assert_eq!(reference.summary.as_deref(), Some("page size"));
        assert_eq!(serde_json::to_value(&slot).unwrap(), value);
    }

    #[test]
    fn test_annotation_prefers_concrete_when_it_fits() {
        // A response only needs a description.
        let value = json!({"$ref": "#/components/responses/NotFound", "description": "gone"});
        let slot: ReferenceOr<Response> = serde_json::from_value(value.clone()).unwrap();
        let response = slot.as_item().unwrap();
        assert_eq!(response.description, "gone");
        assert_eq!(serde_json::to_value(&slot).unwrap(), value);
    }

    #[test]
    fn test_component_reference_escapes_name() {
        let reference = Reference::component("schemas", "a/b~c");
        assert_eq!(reference.as_str(), "#/components/schemas/a~1b~0c");
        assert!(reference.is_local());
        assert!(!Reference::new("pets.yaml#/Pet").is_local());
    }
}
