use crate::error::ValidationErrorType;
use crate::openapi::{OAuthFlow, SecurityRequirement, SecurityScheme, SecuritySchemeType};
use crate::types::json_path::JsonPath;
use crate::types::version::OpenApiVersion;
use crate::validator::ValidationContext;
use crate::{FLOWS_FIELD, IN_FIELD, NAME_FIELD};

pub(super) fn check_scheme<E>(
    context: &mut ValidationContext<'_, E>,
    scheme: &SecurityScheme,
    path: &JsonPath,
) {
    match scheme.scheme_type {
        SecuritySchemeType::ApiKey => {
            require_field(context, scheme, scheme.name.is_some(), NAME_FIELD, path);
            require_field(context, scheme, scheme.location.is_some(), IN_FIELD, path);
        }
        SecuritySchemeType::Http => {
            require_field(context, scheme, scheme.scheme.is_some(), "scheme", path)
        }
        SecuritySchemeType::OpenIdConnect => {
            let present = scheme.open_id_connect_url.is_some();
            require_field(context, scheme, present, "openIdConnectUrl", path)
        }
        SecuritySchemeType::OAuth2 => match &scheme.flows {
            None => require_field(context, scheme, false, FLOWS_FIELD, path),
            Some(flows) => {
                let flows_path = path.join(FLOWS_FIELD);
                for (name, flow) in flows.iter() {
                    check_flow(context, name, flow, &flows_path.join(name));
                }
            }
        },
        SecuritySchemeType::MutualTls => {
            if context.version == Some(OpenApiVersion::V30x) {
                context.report(ValidationErrorType::constraint_violation(
                    "mutualTLS schemes need OpenAPI 3.1",
                    &path.join("type"),
                ));
            }
        }
    }
}

fn require_field<E>(
    context: &mut ValidationContext<'_, E>,
    scheme: &SecurityScheme,
    present: bool,
    field: &str,
    path: &JsonPath,
) {
    if !present {
        let message = format!("{} is required for {} schemes", field, scheme.scheme_type);
        context.report(ValidationErrorType::constraint_violation(&message, &path.join(field)));
    }
}

fn check_flow<E>(context: &mut ValidationContext<'_, E>, name: &str, flow: &OAuthFlow, path: &JsonPath) {
    let (needs_authorization, needs_token) = match name {
        "implicit" => (true, false),
        "authorizationCode" => (true, true),
        _ => (false, true),
    };
    if needs_authorization && flow.authorization_url.is_none() {
        let message = format!("authorizationUrl is required for the {} flow", name);
        context.report(ValidationErrorType::constraint_violation(
            &message,
            &path.join("authorizationUrl"),
        ));
    }
    if needs_token && flow.token_url.is_none() {
        let message = format!("tokenUrl is required for the {} flow", name);
        context.report(ValidationErrorType::constraint_violation(
            &message,
            &path.join("tokenUrl"),
        ));
    }
}

/// Every scheme named by a requirement must exist in
/// `components.securitySchemes`, and listed scopes must make sense for it.
pub(super) fn check_requirements<'a, E>(
    context: &mut ValidationContext<'a, E>,
    requirements: &'a [SecurityRequirement],
    path: &JsonPath,
) {
    if !context.options.check_security_requirements {
        return;
    }
    let registry = context
        .document()
        .components
        .as_ref()
        .map(|components| &components.security_schemes);

    for (index, requirement) in requirements.iter().enumerate() {
        let requirement_path = path.join_index(index);
        for (name, scopes) in requirement.schemes() {
            let scheme_path = requirement_path.join(name);
            let Some(slot) = registry.and_then(|schemes| schemes.get(name)) else {
                let message = format!("security scheme '{}' is not declared", name);
                context.report(ValidationErrorType::unresolved_reference(&message, &scheme_path));
                continue;
            };
            let Ok(scheme) = context.resolver.resolve(slot) else {
                continue;
            };
            check_scopes(context, scheme, scopes, &scheme_path);
        }
    }
}

fn check_scopes<E>(
    context: &mut ValidationContext<'_, E>,
    scheme: &SecurityScheme,
    scopes: &[String],
    path: &JsonPath,
) {
    if scopes.is_empty() {
        return;
    }
    // 3.1 lets any scheme list role names here.
    if !scheme.uses_scopes() && context.version != Some(OpenApiVersion::V31x) {
        let message = format!("{} schemes do not take scopes", scheme.scheme_type);
        context.report(ValidationErrorType::constraint_violation(&message, path));
        return;
    }
    let Some(flows) = scheme
        .flows
        .as_ref()
        .filter(|_| scheme.scheme_type == SecuritySchemeType::OAuth2)
    else {
        return;
    };
    for (index, scope) in scopes.iter().enumerate() {
        if !flows.declares_scope(scope) {
            let message = format!("scope '{}' is not declared by any flow", scope);
            context.report(ValidationErrorType::constraint_violation(
                &message,
                &path.join_index(index),
            ));
        }
    }
}
