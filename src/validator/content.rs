use crate::error::ValidationErrorType;
use crate::openapi::{Example, MediaType, ParameterLocation, ReferenceOr, RequestBody, Schema};
use crate::types::json_path::JsonPath;
use crate::validator::{ValidationContext, parameters, schema};
use crate::{
    CONTENT_FIELD, ENCODING_FIELD, EXAMPLE_FIELD, EXAMPLES_FIELD, HEADERS_FIELD, SCHEMA_FIELD,
    STYLE_FIELD,
};
use serde_json::Value;
use std::collections::BTreeMap;

pub(super) fn check_request_body<'a, E>(
    context: &mut ValidationContext<'a, E>,
    body: &'a RequestBody,
    path: &JsonPath,
) {
    let content_path = path.join(CONTENT_FIELD);
    if body.content.is_empty() {
        context.report(ValidationErrorType::constraint_violation(
            "request body must describe at least one media type",
            &content_path,
        ));
    }
    for (media_type, media) in &body.content {
        check_media_type(context, media, &content_path.join(media_type));
    }
}

pub(super) fn check_media_type<'a, E>(
    context: &mut ValidationContext<'a, E>,
    media: &'a MediaType,
    path: &JsonPath,
) {
    if let Some(slot) = &media.schema {
        schema::check_schema_slot(context, slot, &path.join(SCHEMA_FIELD));
    }
    check_examples(
        context,
        media.schema.as_ref(),
        media.example.as_ref(),
        &media.examples,
        path,
    );

    let encoding_path = path.join(ENCODING_FIELD);
    for (property, encoding) in &media.encoding {
        let property_path = encoding_path.join(property);
        if let Some(style) = encoding.style {
            if !style.allowed_in(ParameterLocation::Query) {
                context.report(ValidationErrorType::constraint_violation(
                    "encoding style must be valid for query values",
                    &property_path.join(STYLE_FIELD),
                ));
            }
        }
        let headers_path = property_path.join(HEADERS_FIELD);
        for (name, slot) in &encoding.headers {
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
    }
}

/// `example` and `examples` exclude each other; every value found is checked
/// against `schema`.
pub(super) fn check_examples<'a, E>(
    context: &mut ValidationContext<'a, E>,
    schema: Option<&'a ReferenceOr<Schema>>,
    example: Option<&'a Value>,
    examples: &'a BTreeMap<String, ReferenceOr<Example>>,
    path: &JsonPath,
) {
    if let Some(example) = example {
        let example_path = path.join(EXAMPLE_FIELD);
        if !examples.is_empty() {
            context.report(ValidationErrorType::constraint_violation(
                "example and examples are mutually exclusive",
                &example_path,
            ));
        }
        schema::check_example_value(context, schema, example, &example_path);
    }

    let examples_path = path.join(EXAMPLES_FIELD);
    for (name, slot) in examples {
        let entry = examples_path.join(name);
        let resolved = match slot {
            ReferenceOr::Item(example) => {
                check_example(context, example, &entry);
                Some(example)
            }
            ReferenceOr::Reference(_) => context.resolve(slot, &entry),
        };
        if let Some(value) = resolved.and_then(|example| example.value.as_ref()) {
            schema::check_example_value(context, schema, value, &entry.join("value"));
        }
    }
}

pub(super) fn check_example<E>(
    context: &mut ValidationContext<'_, E>,
    example: &Example,
    path: &JsonPath,
) {
    if example.value.is_some() && example.external_value.is_some() {
        context.report(ValidationErrorType::constraint_violation(
            "value and externalValue are mutually exclusive",
            path,
        ));
    }
}
