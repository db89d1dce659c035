//! Typed object model for OpenAPI 3.0.x and 3.1.x documents.
//!
//! The [`openapi`] module holds one type per OpenAPI object. Shapes are permissive: a
//! document that decodes is representable, and cross-field rules are checked separately
//! by [`validator::DocumentValidator`]. References between objects are resolved with
//! [`resolver::ReferenceResolver`], and [`loader`] wraps the JSON and YAML codecs.
//!
//! ```rust
//! use oasmodel::openapi::{Info, OpenApi};
//!
//! let document: OpenApi = OpenApi::new("3.0.3", Info::new("pets", "1.0.0"));
//! assert!(document.paths.is_empty());
//! ```

pub mod error;
pub mod extensions;
pub mod loader;
pub mod openapi;
pub mod resolver;
pub mod types;
pub mod validator;

pub use crate::error::{ErrorKind, LoadError, ResolveError, ValidationErrorType};
pub use crate::extensions::Extensions;
pub use crate::openapi::{OpenApi, Reference, ReferenceOr};
pub use crate::resolver::ReferenceResolver;
pub use crate::types::json_path::JsonPath;
pub use crate::validator::{DocumentValidator, ValidationReport};

const REF_FIELD: &'static str = "$ref";
const VENDOR_PREFIX: &'static str = "x-";
const PATH_SEPARATOR: &'static str = "/";
const FRAGMENT_ROOT: &'static str = "#/";
const TILDE: &'static str = "~";
const ENCODED_SLASH: &'static str = "~1";
const ENCODED_TILDE: &'static str = "~0";

const OPENAPI_FIELD: &'static str = "openapi";
const SERVERS_FIELD: &'static str = "servers";
const VARIABLES_FIELD: &'static str = "variables";
const PATHS_FIELD: &'static str = "paths";
const WEBHOOKS_FIELD: &'static str = "webhooks";
const COMPONENTS_FIELD: &'static str = "components";
const SECURITY_FIELD: &'static str = "security";
const TAGS_FIELD: &'static str = "tags";
const PARAMETERS_FIELD: &'static str = "parameters";
const REQUEST_BODY_FIELD: &'static str = "requestBody";
const RESPONSES_FIELD: &'static str = "responses";
const CALLBACKS_FIELD: &'static str = "callbacks";
const CONTENT_FIELD: &'static str = "content";
const SCHEMA_FIELD: &'static str = "schema";
const EXAMPLE_FIELD: &'static str = "example";
const EXAMPLES_FIELD: &'static str = "examples";
const ENCODING_FIELD: &'static str = "encoding";
const HEADERS_FIELD: &'static str = "headers";
const LINKS_FIELD: &'static str = "links";
const NAME_FIELD: &'static str = "name";
const IN_FIELD: &'static str = "in";
const REQUIRED_FIELD: &'static str = "required";
const STYLE_FIELD: &'static str = "style";
const OPERATION_ID_FIELD: &'static str = "operationId";
const FLOWS_FIELD: &'static str = "flows";
