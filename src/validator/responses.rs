use crate::error::ValidationErrorType;
use crate::openapi::{Link, ReferenceOr, Response, Responses};
use crate::types::json_path::JsonPath;
use crate::types::status::StatusKey;
use crate::validator::{ValidationContext, check_server, content, parameters};
use crate::{CONTENT_FIELD, HEADERS_FIELD, LINKS_FIELD, OPERATION_ID_FIELD};
use std::collections::HashMap;

/// An operation needs at least one response, and no two keys may describe the
/// same status once `2xx` and `2XX` are treated alike.
pub(super) fn check_responses<'a, E>(
    context: &mut ValidationContext<'a, E>,
    responses: &'a Responses,
    path: &JsonPath,
) {
    if responses.is_empty() {
        context.report(ValidationErrorType::constraint_violation(
            "at least one response is required",
            path,
        ));
        return;
    }

    let mut seen: HashMap<StatusKey, &str> = HashMap::new();
    for (raw, parsed) in responses.status_keys() {
        let key_path = path.join(raw);
        match parsed {
            Err(e) => context.report(ValidationErrorType::shape_mismatch(&e, &key_path)),
            Ok(key) => match seen.get(&key) {
                Some(first) => {
                    let message = format!("'{}' and '{}' both describe {}", first, raw, key);
                    context.report(ValidationErrorType::ambiguous_response_key(&message, &key_path));
                }
                None => {
                    seen.insert(key, raw);
                }
            },
        }
    }

    for (key, slot) in responses.iter() {
        let response_path = path.join(key);
        match slot {
            ReferenceOr::Item(response) => check_response(context, response, &response_path),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &response_path);
            }
        }
    }
}

pub(super) fn check_response<'a, E>(
    context: &mut ValidationContext<'a, E>,
    response: &'a Response,
    path: &JsonPath,
) {
    let headers_path = path.join(HEADERS_FIELD);
    for (name, slot) in &response.headers {
        let header_path = headers_path.join(name);
        match slot {
            ReferenceOr::Item(header) => {
                parameters::check_parameter_data(context, header, &header_path)
            }
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &header_path);
            }
        }
    }

    let content_path = path.join(CONTENT_FIELD);
    for (media_type, media) in &response.content {
        content::check_media_type(context, media, &content_path.join(media_type));
    }

    let links_path = path.join(LINKS_FIELD);
    for (name, slot) in &response.links {
        let link_path = links_path.join(name);
        match slot {
            ReferenceOr::Item(link) => check_link(context, link, &link_path),
            ReferenceOr::Reference(_) => {
                context.resolve(slot, &link_path);
            }
        }
    }
}

pub(super) fn check_link<'a, E>(context: &mut ValidationContext<'a, E>, link: &'a Link, path: &JsonPath) {
    match (&link.operation_ref, &link.operation_id) {
        (Some(_), Some(_)) => context.report(ValidationErrorType::constraint_violation(
            "operationRef and operationId are mutually exclusive",
            path,
        )),
        (None, None) => context.report(ValidationErrorType::constraint_violation(
            "either operationRef or operationId is required",
            path,
        )),
        (None, Some(operation_id)) => {
            context.register_link_target(operation_id, path.join(OPERATION_ID_FIELD))
        }
        (Some(_), None) => {}
    }
    if let Some(server) = &link.server {
        check_server(context, server, &path.join("server"));
    }
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;
    use crate::validator::test::{document_with_paths, locations, validate};
    use serde_json::json;

    #[test]
    fn test_empty_responses() {
        let report = validate(document_with_paths(json!({
            "/records": {"get": {"responses": {}}}
        })));
        assert_eq!(
            locations(&report, ErrorKind::ConstraintViolation),
            vec!["paths./records.get.responses"]
        );
    }

    #[test]
    fn test_single_response_is_enough() {
        let report = validate(document_with_paths(json!({
            "/records": {"get": {"responses": {"default": {"description": "anything"}}}}
        })));
        assert!(report.is_valid(), "{}", report);
    }

    #[test]
    fn test_ambiguous_wildcards() {
        let report = validate(document_with_paths(json!({
            "/records": {
                "get": {
                    "responses": {
                        "2XX": {"description": "success"},
                        "2xx": {"description": "also success"},
                        "200": {"description": "ok"}
                    }
                }
            }
        })));
        assert_eq!(
            locations(&report, ErrorKind::AmbiguousResponseKey),
            vec!["paths./records.get.responses.2xx"]
        );
    }

    #[test]
    fn test_invalid_status_key() {
        let report = validate(document_with_paths(json!({
            "/records": {
                "get": {"responses": {"200": {"description": "ok"}, "OK": {"description": "?"}}}
            }
        })));
        assert_eq!(
            locations(&report, ErrorKind::ShapeMismatch),
            vec!["paths./records.get.responses.OK"]
        );
    }

    #[test]
    fn test_links() {
        let report = validate(document_with_paths(json!({
            "/records": {
                "post": {
                    "operationId": "createRecord",
                    "responses": {
                        "201": {
                            "description": "created",
                            "links": {
                                "self": {"operationId": "getRecord"},
                                "broken": {"operationId": "deleteRecord"},
                                "both": {"operationId": "getRecord", "operationRef": "#/paths/~1records/get"},
                                "neither": {"description": "nothing to follow"}
                            }
                        }
                    }
                },
                "get": {
                    "operationId": "getRecord",
                    "responses": {"200": {"description": "ok"}}
                }
            }
        })));
        assert_eq!(
            locations(&report, ErrorKind::ConstraintViolation),
            vec![
                "paths./records.post.responses.201.links.both",
                "paths./records.post.responses.201.links.neither"
            ]
        );
        assert_eq!(
            locations(&report, ErrorKind::UnresolvedReference),
            vec!["paths./records.post.responses.201.links.broken.operationId"]
        );
    }
}
