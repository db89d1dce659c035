use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DEFAULT_KEY: &str = "default";

/// Parsed form of a key in a Responses map.
///
/// Ordering follows lookup precedence: an explicit code sorts before a class
/// wildcard, which sorts before `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKey {
    /// An explicit HTTP status code, `100` through `599`.
    Code(u16),
    /// A status class wildcard, `1XX` through `5XX`. Holds the leading digit.
    Range(u8),
    /// The `default` entry.
    Default,
}

impl StatusKey {
    /// Whether a response with this key applies to `status`.
    pub fn matches(&self, status: u16) -> bool {
        match self {
            StatusKey::Code(code) => *code == status,
            StatusKey::Range(class) => status / 100 == u16::from(*class),
            StatusKey::Default => true,
        }
    }
}

impl FromStr for StatusKey {
    type Err = StatusKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEFAULT_KEY {
            return Ok(StatusKey::Default);
        }
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
            return Err(StatusKeyError::invalid(s));
        }
        if bytes[1..].iter().all(|b| b.eq_ignore_ascii_case(&b'X')) {
            return Ok(StatusKey::Range(bytes[0] - b'0'));
        }
        if bytes[1..].iter().all(u8::is_ascii_digit) {
            return s
                .parse::<u16>()
                .map(StatusKey::Code)
                .map_err(|_| StatusKeyError::invalid(s));
        }
        Err(StatusKeyError::invalid(s))
    }
}

impl Display for StatusKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusKey::Code(code) => write!(f, "{}", code),
            StatusKey::Range(class) => write!(f, "{}XX", class),
            StatusKey::Default => write!(f, "{}", DEFAULT_KEY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKeyError {
    InvalidKey(String),
}

impl StatusKeyError {
    pub(crate) fn invalid<T>(key: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        StatusKeyError::InvalidKey(key.to_string())
    }
}

impl Display for StatusKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusKeyError::InvalidKey(key) => write!(
                f,
                "'{}' is not a status code, a 1XX-5XX wildcard or 'default'",
                key
            ),
        }
    }
}

impl std::error::Error for StatusKeyError {}
