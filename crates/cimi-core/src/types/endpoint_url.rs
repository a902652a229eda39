//! Provider endpoint URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated CIMI provider endpoint.
///
/// The endpoint is the base every relative path is resolved against. The
/// cloud entry point lives at `<endpoint>/cloudEntryPoint`.
///
/// # Example
///
/// ```
/// use cimi_core::EndpointUrl;
///
/// let endpoint = EndpointUrl::new("https://cloud.example.com/cimi/").unwrap();
/// assert_eq!(endpoint.url_for("machines/42"), "https://cloud.example.com/cimi/machines/42");
/// assert_eq!(endpoint.extract_path("https://cloud.example.com/cimi/machines/42"), "machines/42");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointUrl(Url);

impl EndpointUrl {
    /// Create a new endpoint URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error unless the string is an absolute `http` or `https`
    /// URL with a host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::EndpointUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    /// Returns the full URL for a path relative to this endpoint.
    ///
    /// Absolute `http(s)` hrefs pointing elsewhere are returned unchanged.
    pub fn url_for(&self, path: &str) -> String {
        if is_absolute_http(path) {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base().to_string()
        } else {
            format!("{}/{}", self.base(), path)
        }
    }

    /// Normalizes a possibly-absolute href into a path relative to this
    /// endpoint.
    ///
    /// Accepts a full URL under the endpoint, an absolute path under the
    /// endpoint's path, or an already relative path. Applying it to its own
    /// output returns the same value.
    pub fn extract_path(&self, href: &str) -> String {
        let base_path = self.0.path().trim_end_matches('/');

        let rest = if let Some(rest) = strip_base(href, self.base()) {
            rest
        } else if href.starts_with('/') {
            strip_base(href, base_path).unwrap_or(href)
        } else {
            href
        };

        if is_absolute_http(rest) {
            rest.to_string()
        } else {
            rest.trim_start_matches('/').to_string()
        }
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::EndpointUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        if !matches!(url.scheme(), "http" | "https") {
            return Err(InvalidInputError::EndpointUrl {
                value: original.to_string(),
                reason: "must use http or https".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::EndpointUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(InvalidInputError::EndpointUrl {
                value: original.to_string(),
                reason: "must not carry a query or fragment".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn is_absolute_http(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Strips `base` only at a path-segment boundary.
fn strip_base<'a>(href: &'a str, base: &str) -> Option<&'a str> {
    let rest = href.strip_prefix(base)?;
    (rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')).then_some(rest)
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base())
    }
}

impl FromStr for EndpointUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for EndpointUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.base())
    }
}

impl<'de> Deserialize<'de> for EndpointUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EndpointUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
