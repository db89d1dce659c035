use crate::extensions::{Extensions, deserialize_keyed, serialize_keyed};
use crate::openapi::content::{Link, MediaType};
use crate::openapi::parameter::Header;
use crate::openapi::reference::ReferenceOr;
use crate::types::status::{StatusKey, StatusKeyError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::str::FromStr;

/// Expected responses of an operation, keyed by status.
///
/// Keys are kept exactly as written (`"200"`, `"2XX"`, `"default"`). Use
/// [`Responses::for_status`] for lookups that honour the precedence of an
/// explicit code over its class wildcard over `default`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responses {
    pub responses: BTreeMap<String, ReferenceOr<Response>>,
    pub extensions: Extensions,
}

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        response: impl Into<ReferenceOr<Response>>,
    ) -> Option<ReferenceOr<Response>> {
        self.responses.insert(key.into(), response.into())
    }

    pub fn with(mut self, key: impl Into<String>, response: impl Into<ReferenceOr<Response>>) -> Self {
        self.insert(key, response);
        self
    }

    /// Entry under the literal key, without any precedence rules.
    pub fn get(&self, key: &str) -> Option<&ReferenceOr<Response>> {
        self.responses.get(key)
    }

    pub fn default_response(&self) -> Option<&ReferenceOr<Response>> {
        self.find(StatusKey::Default)
    }

    /// Response that applies to `status`: the exact code first, then its class wildcard, then `default`.
    pub fn for_status(&self, status: u16) -> Option<&ReferenceOr<Response>> {
        let class = u8::try_from(status / 100).ok();
        self.find(StatusKey::Code(status))
            .or_else(|| class.and_then(|class| self.find(StatusKey::Range(class))))
            .or_else(|| self.default_response())
    }

    fn find(&self, wanted: StatusKey) -> Option<&ReferenceOr<Response>> {
        self.responses
            .iter()
            .find(|(key, _)| StatusKey::from_str(key).is_ok_and(|parsed| parsed == wanted))
            .map(|(_, response)| response)
    }

    /// Every raw key with its parsed form.
    pub fn status_keys(&self) -> impl Iterator<Item = (&str, Result<StatusKey, StatusKeyError>)> {
        self.responses
            .keys()
            .map(|key| (key.as_str(), StatusKey::from_str(key)))
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ReferenceOr<Response>> {
        self.responses.iter()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl Serialize for Responses {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_keyed(&self.responses, &self.extensions, serializer)
    }
}

impl<'de> Deserialize<'de> for Responses {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (responses, extensions) = deserialize_keyed(deserializer)?;
        Ok(Self {
            responses,
            extensions,
        })
    }
}

/// A single response of an operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Response {
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ReferenceOr<Header>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, ReferenceOr<Link>>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, media_type: impl Into<String>, content: MediaType) -> Self {
        self.content.insert(media_type.into(), content);
        self
    }
}

#[cfg(test)]
mod test {
    use crate::openapi::reference::ReferenceOr;
    use crate::openapi::responses::{Response, Responses};
    use crate::types::status::StatusKey;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn description(response: Option<&ReferenceOr<Response>>) -> Option<&str> {
        response
            .and_then(ReferenceOr::as_item)
            .map(|r| r.description.as_str())
    }

    #[test]
    fn test_explicit_code_beats_wildcard() {
        let responses = Responses::new()
            .with("2XX", Response::new("any success"))
            .with("200", Response::new("ok"))
            .with("default", Response::new("error"));
        assert_eq!(description(responses.for_status(200)), Some("ok"));
        assert_eq!(description(responses.for_status(204)), Some("any success"));
        assert_eq!(description(responses.for_status(404)), Some("error"));
    }

    #[test]
    fn test_lookup_without_default() {
        let responses = Responses::new().with("201", Response::new("created"));
        assert_eq!(description(responses.for_status(201)), Some("created"));
        assert!(responses.for_status(200).is_none());
        assert!(responses.default_response().is_none());
    }

    #[test]
    fn test_keys_stay_strings() {
        let value = json!({
            "200": {"description": "ok"},
            "4XX": {"$ref": "#/components/responses/ClientError"},
            "default": {"description": "error"},
            "x-trace": true
        });
        let responses: Responses = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(responses.len(), 3);
        assert!(responses.get("4XX").unwrap().is_reference());
        assert_eq!(responses.extensions.get("x-trace"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&responses).unwrap(), value);
    }

    #[test]
    fn test_status_keys_report_invalid() {
        let responses = Responses::new()
            .with("200", Response::new("ok"))
            .with("2xx", Response::new("lower"))
            .with("success", Response::new("bad"));
        let parsed: Vec<(&str, bool)> = responses
            .status_keys()
            .map(|(raw, key)| (raw, key.is_ok()))
            .collect();
        assert_eq!(parsed, vec![("200", true), ("2xx", true), ("success", false)]);
        let lower = responses.status_keys().nth(1).unwrap().1.unwrap();
        assert_eq!(lower, StatusKey::Range(2));
    }

    #[test]
    fn test_empty_responses() {
        let responses: Responses = serde_json::from_value(json!({})).unwrap();
        assert!(responses.is_empty());
    }

    #[test]
    fn test_response_requires_description() {
        assert!(serde_json::from_value::<Response>(json!({"content": {}})).is_err());
    }
}
