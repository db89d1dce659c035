use crate::extensions::{Extensions, deserialize_keyed, serialize_keyed};
use crate::openapi::content::RequestBody;
use crate::openapi::parameter::Parameter;
use crate::openapi::reference::ReferenceOr;
use crate::openapi::responses::Responses;
use crate::openapi::security::SecurityRequirement;
use crate::openapi::{ExternalDocs, Server};
use http::Method;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Methods that have a slot on a [`PathItem`], in document order.
pub static PATH_ITEM_METHODS: [Method; 8] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
    Method::HEAD,
    Method::PATCH,
    Method::TRACE,
];

/// Path template to [`PathItem`], plus `x-` extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths<E = Extensions> {
    pub paths: BTreeMap<String, PathItem<E>>,
    pub extensions: Extensions,
}

impl<E> Default for Paths<E> {
    fn default() -> Self {
        Self {
            paths: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<E> Paths<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: impl Into<String>, item: PathItem<E>) -> Option<PathItem<E>> {
        self.paths.insert(template.into(), item)
    }

    pub fn get(&self, template: &str) -> Option<&PathItem<E>> {
        self.paths.get(template)
    }

    pub fn get_mut(&mut self, template: &str) -> Option<&mut PathItem<E>> {
        self.paths.get_mut(template)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PathItem<E>> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<E> Serialize for Paths<E>
where
    E: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_keyed(&self.paths, &self.extensions, serializer)
    }
}

impl<'de, E> Deserialize<'de> for Paths<E>
where
    E: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (paths, extensions) = deserialize_keyed(deserializer)?;
        Ok(Self { paths, extensions })
    }
}

/// Operations available on one path.
///
/// `E` is the shape of the extra fields. The default [`Extensions`] keeps every
/// unknown key; a caller may flatten in its own struct instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PathItem<E = Extensions> {
    /// Reference to a path item defined elsewhere.
    #[serde(skip_serializing_if = "Option::is_none", rename = "$ref")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation<E>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation<E>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// Parameters shared by every operation on this path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter>>,

    #[serde(flatten)]
    pub extensions: E,
}

impl<E> PathItem<E> {
    pub fn operation(&self, method: &Method) -> Option<&Operation<E>> {
        let slot = match *method {
            Method::GET => &self.get,
            Method::PUT => &self.put,
            Method::POST => &self.post,
            Method::DELETE => &self.delete,
            Method::OPTIONS => &self.options,
            Method::HEAD => &self.head,
            Method::PATCH => &self.patch,
            Method::TRACE => &self.trace,
            _ => return None,
        };
        slot.as_ref()
    }

    pub fn operation_mut(&mut self, method: &Method) -> Option<&mut Operation<E>> {
        self.operation_slot(method).and_then(Option::as_mut)
    }

    /// The field backing `method`, or `None` for methods a path item cannot hold.
    pub fn operation_slot(&mut self, method: &Method) -> Option<&mut Option<Operation<E>>> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::PUT => Some(&mut self.put),
            Method::POST => Some(&mut self.post),
            Method::DELETE => Some(&mut self.delete),
            Method::OPTIONS => Some(&mut self.options),
            Method::HEAD => Some(&mut self.head),
            Method::PATCH => Some(&mut self.patch),
            Method::TRACE => Some(&mut self.trace),
            _ => None,
        }
    }

    /// Stores `operation` under `method` and returns the one it replaces.
    ///
    /// Methods a path item has no field for hand the operation back as `Err`.
    pub fn set_operation(
        &mut self,
        method: &Method,
        operation: Operation<E>,
    ) -> Result<Option<Operation<E>>, Operation<E>> {
        match self.operation_slot(method) {
            Some(slot) => Ok(slot.replace(operation)),
            None => Err(operation),
        }
    }

    /// Defined operations in `get, put, post, delete, options, head, patch, trace` order.
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation<E>)> {
        PATH_ITEM_METHODS
            .iter()
            .filter_map(move |method| self.operation(method).map(|op| (method.clone(), op)))
    }
}

/// One HTTP method on one path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(bound(deserialize = "E: Deserialize<'de>"))]
pub struct Operation<E = Extensions> {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "externalDocs")]
    pub external_docs: Option<ExternalDocs>,

    /// Unique across the whole document.
    #[serde(skip_serializing_if = "Option::is_none", rename = "operationId")]
    pub operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter>>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "requestBody")]
    pub request_body: Option<ReferenceOr<RequestBody>>,

    #[serde(default, skip_serializing_if = "Responses::is_empty")]
    pub responses: Responses,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub callbacks: BTreeMap<String, ReferenceOr<Callback<E>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Overrides the document-level requirements. An empty list removes them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(flatten)]
    pub extensions: E,
}

impl<E> Operation<E> {
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }
}

/// Runtime expression to the [`PathItem`] describing the out-of-band request.
#[derive(Debug, Clone, PartialEq)]
pub struct Callback<E = Extensions> {
    pub expressions: BTreeMap<String, PathItem<E>>,
    pub extensions: Extensions,
}

impl<E> Default for Callback<E> {
    fn default() -> Self {
        Self {
            expressions: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<E> Serialize for Callback<E>
where
    E: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_keyed(&self.expressions, &self.extensions, serializer)
    }
}

impl<'de, E> Deserialize<'de> for Callback<E>
where
    E: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (expressions, extensions) = deserialize_keyed(deserializer)?;
        Ok(Self {
            expressions,
            extensions,
        })
    }
}

#[cfg(test)]
mod test {
    use crate::extensions::Extensions;
    use crate::openapi::path::{Operation, PathItem, Paths};
    use crate::openapi::responses::Response;
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
    struct InternalId {
        #[serde(rename = "x-internal-id", skip_serializing_if = "Option::is_none")]
        internal_id: Option<String>,
    }

    #[test]
    fn test_extension_preserved_on_path_item_and_operation() {
        let value = json!({
            "summary": "records",
            "x-internal-id": "abc",
            "get": {
                "operationId": "listRecords",
                "x-internal-id": "abc",
                "responses": {"200": {"description": "ok"}}
            }
        });
        let item: PathItem = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(item.extensions.get("x-internal-id"), Some(&json!("abc")));
        let get = item.get.as_ref().unwrap();
        assert_eq!(get.extensions.get("x-internal-id"), Some(&json!("abc")));
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn test_typed_extension_shape() {
        let value = json!({
            "x-internal-id": "abc",
            "post": {"x-internal-id": "def", "responses": {"201": {"description": "created"}}}
        });
        let item: PathItem<InternalId> = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(item.extensions.internal_id.as_deref(), Some("abc"));
        let post = item.operation(&Method::POST).unwrap();
        assert_eq!(post.extensions.internal_id.as_deref(), Some("def"));
        assert_eq!(serde_json::to_value(&item).unwrap(), value);
    }

    #[test]
    fn test_operation_access_by_method() {
        let mut item: PathItem = PathItem::default();
        item.get = Some(Operation {
            operation_id: Some("list".to_string()),
            ..Default::default()
        });
        item.delete = Some(Operation::default());
        *item.operation_slot(&Method::PATCH).unwrap() = Some(Operation::default());

        let methods: Vec<Method> = item.operations().map(|(method, _)| method).collect();
        assert_eq!(methods, vec![Method::GET, Method::DELETE, Method::PATCH]);
        assert!(item.operation(&Method::PUT).is_none());
        assert!(item.operation(&Method::CONNECT).is_none());
        assert!(item.operation_slot(&Method::CONNECT).is_none());

        item.operation_mut(&Method::GET).unwrap().deprecated = Some(true);
        assert!(item.get.as_ref().unwrap().is_deprecated());

        let replaced = item.set_operation(&Method::DELETE, Operation::default()).unwrap();
        assert_eq!(replaced, Some(Operation::default()));
        assert_eq!(item.set_operation(&Method::PUT, Operation::default()), Ok(None));
        assert!(item.set_operation(&Method::CONNECT, Operation::default()).is_err());
    }

    #[test]
    fn test_paths_split_extensions() {
        let value = json!({
            "/pets": {"get": {"responses": {"200": {"description": "ok"}}}},
            "x-paths-owner": "team-a"
        });
        let paths: Paths = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths.extensions.get("x-paths-owner"), Some(&json!("team-a")));
        assert_eq!(serde_json::to_value(&paths).unwrap(), value);
    }

    #[test]
    fn test_callbacks_nest_path_items() {
        let value = json!({
            "callbacks": {
                "onEvent": {
                    "{$request.body#/callbackUrl}": {
                        "post": {"responses": {"200": {"description": "received"}}}
                    }
                }
            },
            "responses": {"201": {"description": "subscribed"}}
        });
        let operation: Operation = serde_json::from_value(value.clone()).unwrap();
        let callback = operation.callbacks["onEvent"].as_item().unwrap();
        let item = &callback.expressions["{$request.body#/callbackUrl}"];
        let response = item
            .post
            .as_ref()
            .and_then(|op| op.responses.get("200"))
            .and_then(|r| r.as_item())
            .unwrap();
        assert_eq!(response, &Response::new("received"));
        assert_eq!(serde_json::to_value(&operation).unwrap(), value);
    }

    #[test]
    fn test_unknown_operation_field_kept() {
        let operation: Operation<Extensions> =
            serde_json::from_value(json!({"x-codegen": {"skip": true}})).unwrap();
        assert_eq!(
            operation.extensions.get("x-codegen"),
            Some(&json!({"skip": true}))
        );
        assert!(operation.responses.is_empty());
    }
}
