use crate::extensions::Extensions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
    /// Only available in OpenAPI 3.1.x.
    #[serde(rename = "mutualTLS")]
    MutualTls,
}

impl Display for SecuritySchemeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SecuritySchemeType::ApiKey => write!(f, "apiKey"),
            SecuritySchemeType::Http => write!(f, "http"),
            SecuritySchemeType::OAuth2 => write!(f, "oauth2"),
            SecuritySchemeType::OpenIdConnect => write!(f, "openIdConnect"),
            SecuritySchemeType::MutualTls => write!(f, "mutualTLS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

/// An authentication mechanism.
///
/// Which optional fields are needed depends on `scheme_type`: `name` and
/// `location` for apiKey, `scheme` for http, `flows` for oauth2 and
/// `open_id_connect_url` for openIdConnect.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "in")]
    pub location: Option<ApiKeyLocation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "bearerFormat")]
    pub bearer_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "openIdConnectUrl")]
    pub open_id_connect_url: Option<String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl SecurityScheme {
    fn of(scheme_type: SecuritySchemeType) -> Self {
        Self {
            scheme_type,
            description: None,
            name: None,
            location: None,
            scheme: None,
            bearer_format: None,
            flows: None,
            open_id_connect_url: None,
            extensions: Extensions::new(),
        }
    }

    pub fn api_key(name: impl Into<String>, location: ApiKeyLocation) -> Self {
        Self {
            name: Some(name.into()),
            location: Some(location),
            ..Self::of(SecuritySchemeType::ApiKey)
        }
    }

    pub fn http(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            ..Self::of(SecuritySchemeType::Http)
        }
    }

    pub fn oauth2(flows: OAuthFlows) -> Self {
        Self {
            flows: Some(flows),
            ..Self::of(SecuritySchemeType::OAuth2)
        }
    }

    pub fn open_id_connect(url: impl Into<String>) -> Self {
        Self {
            open_id_connect_url: Some(url.into()),
            ..Self::of(SecuritySchemeType::OpenIdConnect)
        }
    }

    /// Whether requirements on this scheme may list scopes.
    pub fn uses_scopes(&self) -> bool {
        matches!(
            self.scheme_type,
            SecuritySchemeType::OAuth2 | SecuritySchemeType::OpenIdConnect
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "clientCredentials")]
    pub client_credentials: Option<OAuthFlow>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "authorizationCode")]
    pub authorization_code: Option<OAuthFlow>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl OAuthFlows {
    /// Every configured flow with its wire name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OAuthFlow)> {
        [
            ("implicit", self.implicit.as_ref()),
            ("password", self.password.as_ref()),
            ("clientCredentials", self.client_credentials.as_ref()),
            ("authorizationCode", self.authorization_code.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, flow)| flow.map(|flow| (name, flow)))
    }

    /// Whether any flow declares `scope`.
    pub fn declares_scope(&self, scope: &str) -> bool {
        self.iter().any(|(_, flow)| flow.scopes.contains_key(scope))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OAuthFlow {
    #[serde(skip_serializing_if = "Option::is_none", rename = "authorizationUrl")]
    pub authorization_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "tokenUrl")]
    pub token_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", rename = "refreshUrl")]
    pub refresh_url: Option<String>,

    /// Scope name to a short description. May be empty.
    #[serde(default)]
    pub scopes: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Scheme name to the scopes required from it.
///
/// Names refer to entries of `components.securitySchemes`. An empty
/// requirement makes security optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecurityRequirement(pub BTreeMap<String, Vec<String>>);

impl SecurityRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(scheme.into(), scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn schemes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, scopes)| (name.as_str(), scopes.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod test {
    use crate::openapi::security::{
        ApiKeyLocation, OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme,
        SecuritySchemeType,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_api_key_scheme_wire_form() {
        let scheme = SecurityScheme::api_key("X-API-Key", ApiKeyLocation::Header);
        assert_eq!(
            serde_json::to_value(&scheme).unwrap(),
            json!({"type": "apiKey", "name": "X-API-Key", "in": "header"})
        );
        assert!(!scheme.uses_scopes());
    }

    #[test]
    fn test_oauth2_round_trip() {
        let value = json!({
            "type": "oauth2",
            "flows": {
                "authorizationCode": {
                    "authorizationUrl": "https://auth.example.org/authorize",
                    "tokenUrl": "https://auth.example.org/token",
                    "scopes": {"read:pets": "read pets", "write:pets": "modify pets"}
                },
                "clientCredentials": {
                    "tokenUrl": "https://auth.example.org/token",
                    "scopes": {}
                }
            }
        });
        let scheme: SecurityScheme = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(scheme.scheme_type, SecuritySchemeType::OAuth2);
        let flows = scheme.flows.as_ref().unwrap();
        let names: Vec<&str> = flows.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["clientCredentials", "authorizationCode"]);
        assert!(flows.declares_scope("read:pets"));
        assert!(!flows.declares_scope("admin"));
        assert_eq!(serde_json::to_value(&scheme).unwrap(), value);
    }

    #[test]
    fn test_unknown_scheme_type_rejected() {
        let result = serde_json::from_value::<SecurityScheme>(json!({"type": "basic"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_requirement_builder() {
        let requirement = SecurityRequirement::new()
            .with("petstore_auth", ["read:pets"])
            .with("api_key", Vec::<String>::new());
        assert_eq!(
            serde_json::to_value(&requirement).unwrap(),
            json!({"api_key": [], "petstore_auth": ["read:pets"]})
        );
        let empty: SecurityRequirement = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_flow_scopes_default_empty() {
        let flow: OAuthFlow =
            serde_json::from_value(json!({"tokenUrl": "https://t.example.org"})).unwrap();
        assert!(flow.scopes.is_empty());
        let flows = OAuthFlows {
            password: Some(flow),
            ..Default::default()
        };
        assert_eq!(flows.iter().count(), 1);
    }
}
