//! Checks the cross-field rules that the object model does not enforce.
//!
//! Validation never stops at the first problem. Every issue is collected into a
//! [`ValidationReport`], each with the location it was found at.
//!
//! Objects are checked where they are written. A reference is only resolved
//! at its use site; the object it points to is checked once, under
//! `components`.

mod builder;
mod content;
mod parameters;
mod responses;
mod schema;
mod security;

pub use crate::validator::builder::{DocumentValidatorBuilder, ValidatorBuilderError};

use crate::error::{ErrorKind, ValidationErrorType};
use crate::openapi::{
    Components, OpenApi, Operation, Parameter, PathItem, ReferenceOr, Server, Tag,
};
use crate::resolver::{Component, ReferenceResolver};
use crate::types::json_path::JsonPath;
use crate::types::version::OpenApiVersion;
use crate::{
    CALLBACKS_FIELD, COMPONENTS_FIELD, NAME_FIELD, OPENAPI_FIELD, OPERATION_ID_FIELD,
    PARAMETERS_FIELD, PATHS_FIELD, REF_FIELD, REQUEST_BODY_FIELD, RESPONSES_FIELD,
    SECURITY_FIELD, SERVERS_FIELD, TAGS_FIELD, VARIABLES_FIELD, WEBHOOKS_FIELD,
};
use jsonschema::Draft;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Which optional rule groups run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Check inline examples against their schemas.
    pub check_examples: bool,
    /// Check path parameters against the `{variables}` of their path template.
    pub check_path_templates: bool,
    /// Check that security requirements name declared schemes and scopes.
    pub check_security_requirements: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            check_examples: true,
            check_path_templates: true,
            check_security_requirements: true,
        }
    }
}

/// Validates whole documents.
///
/// ```rust
/// use oasmodel::openapi::{Info, OpenApi};
/// use oasmodel::validator::DocumentValidator;
///
/// let document: OpenApi = OpenApi::new("3.0.3", Info::new("empty", "1.0.0"));
/// let report = DocumentValidator::new().validate(&document);
/// assert!(report.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    options: ValidatorOptions,
    version: Option<OpenApiVersion>,
}

impl DocumentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DocumentValidatorBuilder {
        DocumentValidatorBuilder::new()
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn validate<E>(&self, document: &OpenApi<E>) -> ValidationReport {
        log::debug!(
            "Validating '{}' (openapi {})",
            document.info.title,
            document.openapi
        );
        let root = JsonPath::new();
        let (detected, version_issue) = match document.version() {
            Ok(version) => (Some(version), None),
            Err(e) => {
                log::warn!("Unsupported openapi version '{}'", document.openapi);
                let issue = ValidationErrorType::shape_mismatch(&e, &root.join(OPENAPI_FIELD));
                (None, Some(issue))
            }
        };
        let mut context =
            ValidationContext::new(document, &self.options, self.version.or(detected));
        if let Some(issue) = version_issue {
            context.report(issue);
        }

        check_servers(&mut context, &document.servers, &root.join(SERVERS_FIELD));
        check_tags(&mut context, &document.tags, &root.join(TAGS_FIELD));
        if let Some(requirements) = &document.security {
            security::check_requirements(&mut context, requirements, &root.join(SECURITY_FIELD));
        }

        let paths = root.join(PATHS_FIELD);
        for (template, item) in document.paths.iter() {
            check_path_item(&mut context, item, &paths.join(template), Some(template.as_str()));
        }

        let webhooks = root.join(WEBHOOKS_FIELD);
        for (name, slot) in &document.webhooks {
            let path = webhooks.join(name);
            match slot {
                ReferenceOr::Item(item) => check_path_item(&mut context, item, &path, None),
                ReferenceOr::Reference(_) => {
                    context.resolve(slot, &path);
                }
            }
        }

        if let Some(components) = &document.components {
            check_components(&mut context, components, &root.join(COMPONENTS_FIELD));
        }

        let report = context.finish();
        log::debug!("Validation finished with {} issue(s)", report.len());
        report
    }
}

/// Shared state of one validation pass.
pub(crate) struct ValidationContext<'a, E> {
    pub(crate) resolver: ReferenceResolver<'a, E>,
    pub(crate) options: &'a ValidatorOptions,
    pub(crate) version: Option<OpenApiVersion>,
    pub(crate) draft: Option<Draft>,
    issues: Vec<ValidationErrorType>,
    operation_ids: HashMap<&'a str, JsonPath>,
    linked_operation_ids: Vec<(&'a str, JsonPath)>,
}

impl<'a, E> ValidationContext<'a, E> {
    fn new(
        document: &'a OpenApi<E>,
        options: &'a ValidatorOptions,
        version: Option<OpenApiVersion>,
    ) -> Self {
        Self {
            resolver: ReferenceResolver::new(document),
            options,
            version,
            draft: version.map(|v| v.get_draft()),
            issues: Vec::new(),
            operation_ids: HashMap::new(),
            linked_operation_ids: Vec::new(),
        }
    }

    pub(crate) fn document(&self) -> &'a OpenApi<E> {
        self.resolver.document()
    }

    pub(crate) fn report(&mut self, issue: ValidationErrorType) {
        log::debug!("{}", issue);
        self.issues.push(issue);
    }

    /// Resolves `slot`, recording a failure at `path` instead of returning it.
    pub(crate) fn resolve<T>(&mut self, slot: &'a ReferenceOr<T>, path: &JsonPath) -> Option<&'a T>
    where
        T: Component<E>,
    {
        match self.resolver.resolve(slot) {
            Ok(item) => Some(item),
            Err(e) => {
                self.report(ValidationErrorType::resolve_failed(e, &path.join(REF_FIELD)));
                None
            }
        }
    }

    pub(crate) fn register_operation_id(&mut self, operation_id: &'a str, path: JsonPath) {
        match self.operation_ids.get(operation_id) {
            Some(first) => {
                let message = format!(
                    "operationId '{}' is already used at {}",
                    operation_id, first
                );
                self.report(ValidationErrorType::constraint_violation(&message, &path));
            }
            None => {
                self.operation_ids.insert(operation_id, path);
            }
        }
    }

    /// Records an operationId named by a link; it is checked once every operation is known.
    pub(crate) fn register_link_target(&mut self, operation_id: &'a str, path: JsonPath) {
        self.linked_operation_ids.push((operation_id, path));
    }

    fn finish(mut self) -> ValidationReport {
        let linked = std::mem::take(&mut self.linked_operation_ids);
        for (operation_id, path) in linked {
            if !self.operation_ids.contains_key(operation_id) {
                let message = format!("no operation has operationId '{}'", operation_id);
                self.report(ValidationErrorType::unresolved_reference(&message, &path));
            }
        }
        ValidationReport {
            issues: self.issues,
        }
    }
}

fn check_path_item<'a, E>(
    context: &mut ValidationContext<'a, E>,
    item: &'a PathItem<E>,
    path: &JsonPath,
    template: Option<&str>,
) {
    if let Some(reference) = &item.reference {
        match context.resolver.resolve_str::<PathItem<E>>(reference) {
            Ok(target) => {
                if let Some(template) = template {
                    parameters::check_referenced_template(context, template, target, path);
                }
            }
            Err(e) => {
                context.report(ValidationErrorType::resolve_failed(e, &path.join(REF_FIELD)));
            }
        }
    }

    parameters::check_parameter_list(
        context,
        &item.parameters,
        &path.join(PARAMETERS_FIELD),
        template,
    );
    check_servers(context, &item.servers, &path.join(SERVERS_FIELD));

    for (method, operation) in item.operations() {
        let operation_path = path.join(method.as_str().to_ascii_lowercase());
        check_operation(context, operation, &operation_path, template, &item.parameters);
    }
}

fn check_operation<'a, E>(
    context: &mut ValidationContext<'a, E>,
    operation: &'a Operation<E>,
    path: &JsonPath,
    template: Option<&str>,
    shared_parameters: &'a [ReferenceOr<Parameter>],
) {
    if let Some(operation_id) = &operation.operation_id {
        context.register_operation_id(operation_id, path.join(OPERATION_ID_FIELD));
    }

    parameters::check_parameter_list(
        context,
        &operation.parameters,
        &path.join(PARAMETERS_FIELD),
        template,
    );
    if let Some(template) = template {
        parameters::check_template_coverage(
            context,
            template,
            shared_parameters,
            &operation.parameters,
            path,
        );
    }

    if let Some(slot) = &operation.request_body {
        let body_path = path.join(REQUEST_BODY_FIELD);
        match slot {
            ReferenceOr::Item(body) => content::check_request_body(context, body, &body_path),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &body_path);
            }
        }
    }

    responses::check_responses(context, &operation.responses, &path.join(RESPONSES_FIELD));

    let callbacks = path.join(CALLBACKS_FIELD);
    for (name, slot) in &operation.callbacks {
        let callback_path = callbacks.join(name);
        match slot {
            ReferenceOr::Item(callback) => {
                for (expression, item) in &callback.expressions {
                    check_path_item(context, item, &callback_path.join(expression), None);
                }
            }
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &callback_path);
            }
        }
    }

    if let Some(requirements) = &operation.security {
        security::check_requirements(context, requirements, &path.join(SECURITY_FIELD));
    }
    check_servers(context, &operation.servers, &path.join(SERVERS_FIELD));
}

fn check_components<'a, E>(
    context: &mut ValidationContext<'a, E>,
    components: &'a Components<E>,
    path: &JsonPath,
) {
    for (name, slot) in &components.schemas {
        schema::check_schema_slot(context, slot, &path.join("schemas").join(name));
    }
    for (name, slot) in &components.responses {
        let entry = path.join("responses").join(name);
        match slot {
            ReferenceOr::Item(response) => responses::check_response(context, response, &entry),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.parameters {
        let entry = path.join(PARAMETERS_FIELD).join(name);
        match slot {
            ReferenceOr::Item(parameter) => {
                parameters::check_parameter(context, parameter, &entry)
            }
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.examples {
        let entry = path.join("examples").join(name);
        match slot {
            ReferenceOr::Item(example) => content::check_example(context, example, &entry),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.request_bodies {
        let entry = path.join("requestBodies").join(name);
        match slot {
            ReferenceOr::Item(body) => content::check_request_body(context, body, &entry),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.headers {
        let entry = path.join("headers").join(name);
        match slot {
            ReferenceOr::Item(header) => parameters::check_parameter_data(context, header, &entry),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.security_schemes {
        let entry = path.join("securitySchemes").join(name);
        match slot {
            ReferenceOr::Item(scheme) => security::check_scheme(context, scheme, &entry),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.links {
        let entry = path.join("links").join(name);
        match slot {
            ReferenceOr::Item(link) => responses::check_link(context, link, &entry),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.callbacks {
        let entry = path.join(CALLBACKS_FIELD).join(name);
        match slot {
            ReferenceOr::Item(callback) => {
                for (expression, item) in &callback.expressions {
                    check_path_item(context, item, &entry.join(expression), None);
                }
            }
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
    for (name, slot) in &components.path_items {
        let entry = path.join("pathItems").join(name);
        match slot {
            ReferenceOr::Item(item) => check_path_item(context, item, &entry, None),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &entry);
            }
        }
    }
}

pub(crate) fn check_servers<E>(
    context: &mut ValidationContext<'_, E>,
    servers: &[Server],
    path: &JsonPath,
) {
    for (index, server) in servers.iter().enumerate() {
        check_server(context, server, &path.join_index(index));
    }
}

pub(crate) fn check_server<E>(context: &mut ValidationContext<'_, E>, server: &Server, path: &JsonPath) {
    for variable in server.url_variables() {
        if !server.variables.contains_key(variable) {
            let message = format!("server variable '{}' is used in the url but not defined", variable);
            context.report(ValidationErrorType::constraint_violation(&message, &path.join("url")));
        }
    }
    for (name, variable) in &server.variables {
        let Some(allowed) = &variable.enumeration else {
            continue;
        };
        let variable_path = path.join(VARIABLES_FIELD).join(name);
        if allowed.is_empty() {
            context.report(ValidationErrorType::constraint_violation(
                "enum must not be empty",
                &variable_path.join("enum"),
            ));
        } else if !allowed.contains(&variable.default) {
            let message = format!(
                "default '{}' is not one of the enum values {:?}",
                variable.default, allowed
            );
            context.report(ValidationErrorType::constraint_violation(
                &message,
                &variable_path.join("default"),
            ));
        }
    }
}

fn check_tags<E>(context: &mut ValidationContext<'_, E>, tags: &[Tag], path: &JsonPath) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, tag) in tags.iter().enumerate() {
        match seen.get(tag.name.as_str()) {
            Some(first) => {
                let message = format!("tag '{}' is already declared at index {}", tag.name, first);
                context.report(ValidationErrorType::constraint_violation(
                    &message,
                    &path.join_index(index).join(NAME_FIELD),
                ));
            }
            None => {
                seen.insert(tag.name.as_str(), index);
            }
        }
    }
}

/// Every issue found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<ValidationErrorType>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationErrorType] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationErrorType> {
        self.issues
    }

    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationErrorType> {
        self.issues.iter().filter(move |issue| issue.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "Document is valid");
        }
        writeln!(f, "Document has {} issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use crate::openapi::OpenApi;
    use crate::validator::{DocumentValidator, ValidationReport};
    use serde_json::{Value, json};

    pub(crate) fn validate(value: Value) -> ValidationReport {
        let document: OpenApi = serde_json::from_value(value).unwrap();
        DocumentValidator::new().validate(&document)
    }

    pub(crate) fn locations(report: &ValidationReport, kind: ErrorKind) -> Vec<String> {
        report
            .of_kind(kind)
            .map(|issue| issue.path().to_string())
            .collect()
    }

    pub(crate) fn document_with_paths(paths: Value) -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "test", "version": "1.0.0"},
            "paths": paths
        })
    }

    #[test]
    fn test_valid_document() {
        let report = validate(json!({
            "openapi": "3.0.3",
            "info": {"title": "pets", "version": "1.0.0"},
            "servers": [{
                "url": "https://{env}.example.org",
                "variables": {"env": {"default": "prod", "enum": ["prod", "staging"]}}
            }],
            "tags": [{"name": "pets"}],
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "get": {
                        "operationId": "getPet",
                        "tags": ["pets"],
                        "responses": {
                            "200": {
                                "description": "the pet",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Pet"}
                                    }
                                }
                            },
                            "default": {"$ref": "#/components/responses/Error"}
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
                },
                "responses": {"Error": {"description": "unexpected error"}}
            }
        }));
        assert!(report.is_valid(), "{}", report);
        assert_eq!(report.to_string(), "Document is valid");
    }

    #[test]
    fn test_unsupported_version_reported_and_walk_continues() {
        let mut value = document_with_paths(json!({"/a": {"get": {"responses": {}}}}));
        value["openapi"] = json!("2.0");
        let report = validate(value);
        assert_eq!(locations(&report, ErrorKind::ShapeMismatch), vec!["openapi"]);
        assert_eq!(
            locations(&report, ErrorKind::ConstraintViolation),
            vec!["paths./a.get.responses"]
        );
    }

    #[test]
    fn test_duplicate_operation_id_across_callbacks() {
        let report = validate(document_with_paths(json!({
            "/subscribe": {
                "post": {
                    "operationId": "subscribe",
                    "responses": {"201": {"description": "subscribed"}},
                    "callbacks": {
                        "onEvent": {
                            "{$request.body#/url}": {
                                "post": {
                                    "operationId": "subscribe",
                                    "responses": {"200": {"description": "ok"}}
                                }
                            }
                        }
                    }
                }
            }
        })));
        let issues = locations(&report, ErrorKind::ConstraintViolation);
        assert_eq!(
            issues,
            vec!["paths./subscribe.post.callbacks.onEvent.{$request.body#/url}.post.operationId"]
        );
        let message = report.issues()[0].message();
        assert!(message.contains("paths./subscribe.post.operationId"), "{}", message);
    }

    #[test]
    fn test_server_variables() {
        let report = validate(json!({
            "openapi": "3.0.3",
            "info": {"title": "servers", "version": "1"},
            "paths": {},
            "servers": [
                {"url": "https://api.example.org", "variables": {"some": {"default": "300", "enum": ["100", "200"]}}},
                {"url": "https://{region}.example.org"}
            ]
        }));
        assert_eq!(
            locations(&report, ErrorKind::ConstraintViolation),
            vec!["servers[0].variables.some.default", "servers[1].url"]
        );
    }

    #[test]
    fn test_duplicate_tags() {
        let report = validate(json!({
            "openapi": "3.0.3",
            "info": {"title": "tags", "version": "1"},
            "paths": {},
            "tags": [{"name": "a"}, {"name": "b"}, {"name": "a"}]
        }));
        assert_eq!(
            locations(&report, ErrorKind::ConstraintViolation),
            vec!["tags[2].name"]
        );
    }

    #[test]
    fn test_component_reference_cycle() {
        let report = validate(json!({
            "openapi": "3.0.3",
            "info": {"title": "cycle", "version": "1"},
            "paths": {
                "/a": {
                    "get": {
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/A"}}}
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "A": {"$ref": "#/components/schemas/B"},
                    "B": {"$ref": "#/components/schemas/A"}
                }
            }
        }));
        let cycles = locations(&report, ErrorKind::CyclicReference);
        assert_eq!(
            cycles,
            vec![
                "paths./a.get.responses.200.content.application/json.schema.$ref",
                "components.schemas.A.$ref",
                "components.schemas.B.$ref"
            ]
        );
    }

    #[test]
    fn test_unresolved_references_collected() {
        let report = validate(json!({
            "openapi": "3.0.3",
            "info": {"title": "refs", "version": "1"},
            "paths": {
                "/a": {
                    "$ref": "#/components/pathItems/Missing",
                    "get": {
                        "parameters": [{"$ref": "#/components/parameters/Missing"}],
                        "requestBody": {"$ref": "#/components/requestBodies/Missing"},
                        "responses": {"200": {"$ref": "#/components/responses/Missing"}}
                    }
                }
            }
        }));
        assert_eq!(
            locations(&report, ErrorKind::UnresolvedReference),
            vec![
                "paths./a.$ref",
                "paths./a.get.parameters[0].$ref",
                "paths./a.get.requestBody.$ref",
                "paths./a.get.responses.200.$ref"
            ]
        );
    }

    #[test]
    fn test_webhooks_are_walked() {
        let report = validate(json!({
            "openapi": "3.1.0",
            "info": {"title": "hooks", "version": "1"},
            "webhooks": {
                "newPet": {"post": {"responses": {}}}
            }
        }));
        assert_eq!(
            locations(&report, ErrorKind::ConstraintViolation),
            vec!["webhooks.newPet.post.responses"]
        );
    }

    #[test]
    fn test_records_document() {
        let report = validate(json!({
            "openapi": "3.0.0",
            "info": {"title": "myapi", "version": "1.0"},
            "servers": [
                {"url": "http://testapi.example.org"},
                {
                    "url": "https://api.example.org",
                    "description": "This is the production api",
                    "variables": {
                        "some": {"default": "100", "description": "some number", "enum": ["100", "200"]}
                    }
                }
            ],
            "paths": {
                "/records": {
                    "description": "this is the gets records",
                    "summary": "This path does something very cool",
                    "get": {
                        "tags": ["tag1"],
                        "summary": "this is a summary",
                        "deprecated": true,
                        "operationId": "someid",
                        "parameters": [{"name": "param1", "in": "cookie"}]
                    }
                }
            }
        }));
        assert_eq!(
            locations(&report, ErrorKind::ConstraintViolation),
            vec!["paths./records.get.parameters[0]", "paths./records.get.responses"]
        );
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_into_result() {
        let report = validate(document_with_paths(json!({"/a": {"get": {}}})));
        let error = report.into_result().unwrap_err();
        assert_eq!(error.len(), 1);
        assert!(error.to_string().starts_with("Document has 1 issue(s):"));
    }
}
