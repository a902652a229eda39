//! Resource reference type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// An opaque reference (href) to a remote resource.
///
/// References are never interpreted beyond path extraction, which is the
/// job of [`EndpointUrl::extract_path`](crate::EndpointUrl::extract_path).
///
/// On the wire a reference shows up either as a bare string or as an
/// object carrying an `href`; both forms deserialize into a `Reference`.
///
/// # Example
///
/// ```
/// use cimi_core::Reference;
///
/// let r = Reference::new("https://cloud.example.com/cimi/machines/42").unwrap();
/// assert_eq!(r.as_str(), "https://cloud.example.com/cimi/machines/42");
/// assert!(Reference::looks_like_reference("machines/42"));
/// assert!(!Reference::looks_like_reference("web-frontend"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference(String);

impl Reference {
    /// Create a new reference, rejecting empty or whitespace-bearing input.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the reference as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment, which providers use as the short id.
    pub fn short_id(&self) -> &str {
        let path = self.0.split(['?', '#']).next().unwrap_or(&self.0);
        path.trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(path)
    }

    /// The `{"href": ...}` link form used inside request payloads.
    pub fn to_link(&self) -> serde_json::Value {
        serde_json::json!({ "href": self.0 })
    }

    /// Decides whether a user-supplied token is a reference rather than a
    /// resource name.
    ///
    /// Absolute `http(s)` URLs and anything containing a path separator are
    /// references; everything else is treated as a name.
    pub fn looks_like_reference(token: &str) -> bool {
        token.starts_with("http://") || token.starts_with("https://") || token.contains('/')
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Reference {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidInputError::Reference {
                value: s.to_string(),
                reason: "cannot contain whitespace".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Reference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Reference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireReference {
    Bare(String),
    Link { href: String },
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = match WireReference::deserialize(deserializer)? {
            WireReference::Bare(s) => s,
            WireReference::Link { href } => href,
        };
        Reference::new(s).map_err(serde::de::Error::custom)
    }
}
