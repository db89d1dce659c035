pub mod json_path;
pub mod status;
pub mod version;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Where a parameter is carried in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ParameterLocation::Header => "header",
            ParameterLocation::Query => "query",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Path => "path",
        };
        write!(f, "{}", str)
    }
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(ParameterLocation::Query),
            "header" => Ok(ParameterLocation::Header),
            "path" => Ok(ParameterLocation::Path),
            "cookie" => Ok(ParameterLocation::Cookie),
            other => Err(format!("Unknown parameter location: {}", other)),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::types::ParameterLocation;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_location_wire_names() {
        assert_eq!(
            serde_json::to_value(ParameterLocation::Cookie).unwrap(),
            json!("cookie")
        );
        let location: ParameterLocation = serde_json::from_value(json!("path")).unwrap();
        assert_eq!(location, ParameterLocation::Path);
        assert!(serde_json::from_value::<ParameterLocation>(json!("body")).is_err());
    }

    #[test]
    fn test_location_display_matches_from_str() {
        for location in [
            ParameterLocation::Query,
            ParameterLocation::Header,
            ParameterLocation::Path,
            ParameterLocation::Cookie,
        ] {
            assert_eq!(
                ParameterLocation::from_str(&location.to_string()).unwrap(),
                location
            );
        }
    }
}
