use crate::{ENCODED_SLASH, ENCODED_TILDE, PATH_SEPARATOR, TILDE};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One step into a document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node inside an OpenAPI document.
///
/// `Display` renders the dotted form used in diagnostics
/// (`paths./records.get.parameters[0].name`), while [`JsonPath::format_path`]
/// renders the escaped pointer form (`paths/~1records/get/parameters/0/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
pub struct JsonPath(pub Vec<PathSegment>);

impl JsonPath {
    pub fn new() -> Self {
        JsonPath(Vec::new())
    }

    pub fn add(&mut self, segment: impl AsRef<str>) -> &mut Self {
        self.0.push(PathSegment::Key(segment.as_ref().to_owned()));
        self
    }

    pub fn index(&mut self, index: usize) -> &mut Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    /// Returns a copy of this path extended by one key.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let mut path = self.clone();
        path.add(segment);
        path
    }

    /// Returns a copy of this path extended by one array index.
    pub fn join_index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.index(index);
        path
    }

    /// Returns a copy of this path with every segment of `suffix` appended.
    pub fn concat(&self, suffix: &JsonPath) -> Self {
        let mut path = self.clone();
        path.0.extend(suffix.0.iter().cloned());
        path
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn format_path(&self) -> String {
        self.0
            .iter()
            .map(|segment| match segment {
                PathSegment::Key(key) => escape_segment(key),
                PathSegment::Index(index) => index.to_string(),
            })
            .collect::<Vec<String>>()
            .join(PATH_SEPARATOR)
    }
}

/// Applies JSON pointer escaping (`~` to `~0`, `/` to `~1`) to a single segment.
pub(crate) fn escape_segment(segment: &str) -> String {
    if segment.contains(TILDE) || segment.contains(PATH_SEPARATOR) {
        segment
            .replace(TILDE, ENCODED_TILDE)
            .replace(PATH_SEPARATOR, ENCODED_SLASH)
    } else {
        segment.to_owned()
    }
}

/// Reverses [`escape_segment`]. `~1` is decoded before `~0` so `~01` stays `~1`.
pub(crate) fn unescape_segment(segment: &str) -> String {
    if segment.contains(TILDE) {
        segment
            .replace(ENCODED_SLASH, PATH_SEPARATOR)
            .replace(ENCODED_TILDE, TILDE)
    } else {
        segment.to_owned()
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl<S> FromIterator<S> for JsonPath
where
    S: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut path = JsonPath::new();
        for segment in iter {
            path.add(segment);
        }
        path
    }
}

#[cfg(test)]
mod test {
    use crate::types::json_path::{JsonPath, PathSegment, escape_segment, unescape_segment};
    use crate::{ENCODED_SLASH, ENCODED_TILDE, PATH_SEPARATOR};

    #[test]
    fn test_new_json_path() {
        let path = JsonPath::new();
        assert_eq!(path.0.len(), 0);
        assert_eq!(path.format_path(), "");
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_add_multiple_segments() {
        let mut path = JsonPath::new();
        path.add("components").add("schemas").add("User");
        assert_eq!(path.0.len(), 3);
        assert_eq!(path.0[2], PathSegment::Key("User".to_string()));
        assert_eq!(path.format_path(), "components/schemas/User");
        assert_eq!(path.to_string(), "components.schemas.User");
    }

    #[test]
    fn test_dotted_display_with_index() {
        let mut path = JsonPath::new();
        path.add("paths")
            .add("/records")
            .add("get")
            .add("parameters")
            .index(0)
            .add("name");
        assert_eq!(path.to_string(), "paths./records.get.parameters[0].name");
    }

    #[test]
    fn test_format_path_escapes_segments() {
        let mut path = JsonPath::new();
        path.add("paths").add("/users/{id}").add("get");
        let expected = format!(
            "paths{0}{1}users{1}{{id}}{0}get",
            PATH_SEPARATOR, ENCODED_SLASH
        );
        assert_eq!(path.format_path(), expected);
        // Display keeps the raw key.
        assert_eq!(path.to_string(), "paths./users/{id}.get");
    }

    #[test]
    fn test_format_path_index_segment() {
        let mut path = JsonPath::new();
        path.add("items").index(3).add("name");
        assert_eq!(path.format_path(), "items/3/name");
    }

    #[test]
    fn test_join_does_not_modify_original() {
        let base: JsonPath = ["components", "schemas"].into_iter().collect();
        let joined = base.join("Pet").join_index(1);
        assert_eq!(base.0.len(), 2);
        assert_eq!(joined.to_string(), "components.schemas.Pet[1]");
    }

    #[test]
    fn test_concat() {
        let base: JsonPath = ["components", "schemas", "Pet"].into_iter().collect();
        let mut suffix = JsonPath::new();
        suffix.add("properties").add("tag");
        assert_eq!(
            base.concat(&suffix).format_path(),
            "components/schemas/Pet/properties/tag"
        );
    }

    #[test]
    fn test_special_characters_encoding() {
        assert_eq!(
            escape_segment("a~b/c"),
            format!("a{}b{}c", ENCODED_TILDE, ENCODED_SLASH)
        );
        assert_eq!(
            escape_segment("~~/~~"),
            format!("{0}{0}{1}{0}{0}", ENCODED_TILDE, ENCODED_SLASH)
        );
        assert_eq!(escape_segment("//"), format!("{0}{0}", ENCODED_SLASH));
    }

    #[test]
    fn test_unescape_reverses_escape() {
        for raw in ["simple", "a~b/c", "~1", "/pets/{id}", "~~/~~"] {
            assert_eq!(unescape_segment(&escape_segment(raw)), raw);
        }
        assert_eq!(unescape_segment("~01"), "~1");
    }
}
