use crate::error::ValidationErrorType;
use crate::openapi::{ReferenceOr, Schema};
use crate::types::json_path::JsonPath;
use crate::types::version::OpenApiVersion;
use crate::validator::ValidationContext;
use crate::{EXAMPLE_FIELD, EXAMPLES_FIELD, REF_FIELD};
use jsonschema::Validator as JsonValidator;
use serde_json::{Value, json};

const NULLABLE_FIELD: &str = "nullable";
const TYPE_FIELD: &str = "type";

pub(super) fn check_schema_slot<'a, E>(
    context: &mut ValidationContext<'a, E>,
    slot: &'a ReferenceOr<Schema>,
    path: &JsonPath,
) {
    match slot {
        ReferenceOr::Item(schema) => check_schema(context, schema, path),
        ReferenceOr::Reference(_) => {
            context.resolve(slot, path);
        }
    }
}

fn check_schema<'a, E>(context: &mut ValidationContext<'a, E>, schema: &'a Schema, path: &JsonPath) {
    let Some(object) = schema.as_object() else {
        return;
    };
    if object.is_read_only() && object.is_write_only() {
        context.report(ValidationErrorType::constraint_violation(
            "readOnly and writeOnly can not both be true",
            path,
        ));
    }

    if let Some(example) = &object.example {
        check_against(context, schema, example, &path.join(EXAMPLE_FIELD));
    }
    if let Some(examples) = &object.examples {
        let examples_path = path.join(EXAMPLES_FIELD);
        for (index, example) in examples.iter().enumerate() {
            check_against(context, schema, example, &examples_path.join_index(index));
        }
    }

    for (relative, nested) in object.subschemas() {
        check_schema_slot(context, nested, &path.concat(&relative));
    }
}

/// Checks `value` against the schema in `slot`, if there is one.
///
/// Reference failures are not reported here; the schema slot itself reports them.
pub(super) fn check_example_value<'a, E>(
    context: &mut ValidationContext<'a, E>,
    slot: Option<&'a ReferenceOr<Schema>>,
    value: &Value,
    path: &JsonPath,
) {
    let Some(slot) = slot else {
        return;
    };
    if let Ok(schema) = context.resolver.resolve(slot) {
        check_against(context, schema, value, path);
    }
}

fn check_against<E>(
    context: &mut ValidationContext<'_, E>,
    schema: &Schema,
    value: &Value,
    path: &JsonPath,
) {
    if !context.options.check_examples {
        return;
    }
    if value.is_null() && schema.is_nullable() {
        return;
    }
    let Some(draft) = context.draft else {
        return;
    };

    let mut schema_value = match serde_json::to_value(schema) {
        Ok(schema_value) => schema_value,
        Err(e) => {
            log::warn!("Could not render schema at {}: {}", path, e);
            return;
        }
    };
    if contains_reference(&schema_value) {
        log::debug!("Skipping example at {}, its schema has references", path);
        return;
    }

    if context.version == Some(OpenApiVersion::V30x) {
        expand_nullable(&mut schema_value);
    }

    let validator = match JsonValidator::options().with_draft(draft).build(&schema_value) {
        Ok(validator) => validator,
        Err(e) => {
            log::warn!("Skipping example at {}, schema does not compile: {}", path, e);
            return;
        }
    };
    let failures: Vec<String> = validator
        .iter_errors(value)
        .map(|error| error.to_string())
        .collect();
    for failure in failures {
        let message = format!("example does not match its schema: {}", failure);
        context.report(ValidationErrorType::constraint_violation(&message, path));
    }
}

/// Rewrites 3.0.x `nullable: true` as a `null` member of `type`.
fn expand_nullable(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get(NULLABLE_FIELD) == Some(&Value::Bool(true)) {
                map.remove(NULLABLE_FIELD);
                let expanded = match map.get(TYPE_FIELD) {
                    Some(Value::String(single)) => Some(json!([single, "null"])),
                    Some(Value::Array(many)) if !many.iter().any(|t| t == "null") => {
                        let mut many = many.clone();
                        many.push(Value::from("null"));
                        Some(Value::Array(many))
                    }
                    _ => None,
                };
                if let Some(expanded) = expanded {
                    map.insert(TYPE_FIELD.to_string(), expanded);
                }
            }
            map.values_mut().for_each(expand_nullable);
        }
        Value::Array(items) => items.iter_mut().for_each(expand_nullable),
        _ => {}
    }
}

fn contains_reference(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key(REF_FIELD) || map.values().any(contains_reference)
        }
        Value::Array(items) => items.iter().any(contains_reference),
        _ => false,
    }
}
