use crate::error::ValidationErrorType;
use crate::openapi::{
    Parameter, ParameterData, ParameterLocation, PathItem, ReferenceOr, template_variables,
};
use crate::types::json_path::JsonPath;
use crate::validator::{ValidationContext, content, schema};
use crate::{CONTENT_FIELD, NAME_FIELD, PARAMETERS_FIELD, REQUIRED_FIELD, SCHEMA_FIELD, STYLE_FIELD};
use std::borrow::Cow;
use std::collections::HashMap;

/// Checks one `parameters` list. `(name, in)` must be unique within it;
/// header names compare case-insensitively.
pub(super) fn check_parameter_list<'a, E>(
    context: &mut ValidationContext<'a, E>,
    parameters: &'a [ReferenceOr<Parameter>],
    path: &JsonPath,
    template: Option<&str>,
) {
    let mut seen: HashMap<(Cow<'a, str>, ParameterLocation), usize> = HashMap::new();
    for (index, slot) in parameters.iter().enumerate() {
        let parameter_path = path.join_index(index);
        let parameter = match slot {
            ReferenceOr::Item(parameter) => {
                check_parameter(context, parameter, &parameter_path);
                parameter
            }
            ReferenceOr::Reference(_) => match context.resolve(slot, &parameter_path) {
                Some(parameter) => parameter,
                None => continue,
            },
        };

        let name = match parameter.location {
            ParameterLocation::Header => Cow::Owned(parameter.name.to_ascii_lowercase()),
            _ => Cow::Borrowed(parameter.name.as_str()),
        };
        let key = (name, parameter.location);
        match seen.get(&key) {
            Some(first) => {
                let message = format!(
                    "parameter '{}' in {} is already declared at index {}",
                    parameter.name, parameter.location, first
                );
                context.report(ValidationErrorType::constraint_violation(
                    &message,
                    &parameter_path.join(NAME_FIELD),
                ));
            }
            None => {
                seen.insert(key, index);
            }
        }

        if let Some(template) = template {
            check_template_name(context, parameter, template, &parameter_path);
        }
    }
}

/// A path parameter's name must be one of the `{variables}` of `template`.
fn check_template_name<E>(
    context: &mut ValidationContext<'_, E>,
    parameter: &Parameter,
    template: &str,
    path: &JsonPath,
) {
    if !context.options.check_path_templates || parameter.location != ParameterLocation::Path {
        return;
    }
    if !template_variables(template).contains(&parameter.name.as_str()) {
        let message = format!(
            "path parameter '{}' does not appear in '{}'",
            parameter.name, template
        );
        context.report(ValidationErrorType::constraint_violation(
            &message,
            &path.join(NAME_FIELD),
        ));
    }
}

/// Template rules for a path item whose body comes from `$ref`. The target is
/// checked under `components`, where it has no template.
pub(super) fn check_referenced_template<'a, E>(
    context: &mut ValidationContext<'a, E>,
    template: &str,
    item: &'a PathItem<E>,
    path: &JsonPath,
) {
    let mut lists = vec![(path.clone(), &item.parameters)];
    for (method, operation) in item.operations() {
        let operation_path = path.join(method.as_str().to_ascii_lowercase());
        lists.push((operation_path, &operation.parameters));
    }
    for (owner_path, parameters) in lists {
        let parameters_path = owner_path.join(PARAMETERS_FIELD);
        for (index, slot) in parameters.iter().enumerate() {
            if let Ok(parameter) = context.resolver.resolve(slot) {
                let parameter_path = parameters_path.join_index(index);
                check_template_name(context, parameter, template, &parameter_path);
            }
        }
    }
    for (method, operation) in item.operations() {
        let operation_path = path.join(method.as_str().to_ascii_lowercase());
        check_template_coverage(
            context,
            template,
            &item.parameters,
            &operation.parameters,
            &operation_path,
        );
    }
}

/// Every `{variable}` of `template` needs a path parameter, declared either on
/// the path item or on the operation.
pub(super) fn check_template_coverage<'a, E>(
    context: &mut ValidationContext<'a, E>,
    template: &str,
    shared: &'a [ReferenceOr<Parameter>],
    own: &'a [ReferenceOr<Parameter>],
    operation_path: &JsonPath,
) {
    if !context.options.check_path_templates {
        return;
    }
    let declared: Vec<&str> = shared
        .iter()
        .chain(own)
        .filter_map(|slot| context.resolver.resolve(slot).ok())
        .filter(|parameter| parameter.location == ParameterLocation::Path)
        .map(|parameter| parameter.name.as_str())
        .collect();

    for variable in template_variables(template) {
        if !declared.contains(&variable) {
            let message = format!(
                "'{}' has no path parameter for '{{{}}}'",
                template, variable
            );
            context.report(ValidationErrorType::constraint_violation(
                &message,
                &operation_path.join(PARAMETERS_FIELD),
            ));
        }
    }
}

pub(super) fn check_parameter<'a, E>(
    context: &mut ValidationContext<'a, E>,
    parameter: &'a Parameter,
    path: &JsonPath,
) {
    if parameter.location == ParameterLocation::Path && parameter.required != Some(true) {
        let message = format!("path parameter '{}' must be required", parameter.name);
        context.report(ValidationErrorType::constraint_violation(
            &message,
            &path.join(REQUIRED_FIELD),
        ));
    }
    check_parameter_data(context, parameter, path);
}

/// Rules shared by parameters and headers.
pub(super) fn check_parameter_data<'a, E, P>(
    context: &mut ValidationContext<'a, E>,
    data: &'a P,
    path: &JsonPath,
) where
    P: ParameterData,
{
    if let Some(style) = data.style() {
        if !style.allowed_in(data.location()) {
            let message = format!("style is not allowed for {} values", data.location());
            context.report(ValidationErrorType::constraint_violation(
                &message,
                &path.join(STYLE_FIELD),
            ));
        }
    }

    match (data.schema(), data.content().len()) {
        (Some(_), 0) | (None, 1) => {}
        (Some(_), _) => context.report(ValidationErrorType::constraint_violation(
            "schema and content are mutually exclusive",
            path,
        )),
        (None, 0) => context.report(ValidationErrorType::constraint_violation(
            "either schema or content is required",
            path,
        )),
        (None, _) => context.report(ValidationErrorType::constraint_violation(
            "content must hold exactly one media type",
            &path.join(CONTENT_FIELD),
        )),
    }

    if let Some(slot) = data.schema() {
        schema::check_schema_slot(context, slot, &path.join(SCHEMA_FIELD));
    }
    let content_path = path.join(CONTENT_FIELD);
    for (media_type, media) in data.content() {
        content::check_media_type(context, media, &content_path.join(media_type));
    }
    content::check_examples(context, data.schema(), data.example(), data.examples(), path);
}
