//! Endpoint label value object
//!
//! A synthetic request path such as `/foo`, used as the `endpoint` label of
//! the request counter.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::Endpoint;
//!
//! let endpoint = Endpoint::new("/bar").expect("valid endpoint");
//! assert_eq!(endpoint.as_str(), "/bar");
//!
//! assert!(Endpoint::new("bar").is_err());
//! assert!(Endpoint::new("").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when an endpoint label is malformed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid endpoint '{0}': must start with '/' and contain no whitespace")]
pub struct InvalidEndpoint(String);

/// A request path label, always starting with `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Create a validated endpoint label
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if the label is empty, does not start with
    /// `/`, or contains whitespace.
    pub fn new(path: impl Into<String>) -> Result<Self, InvalidEndpoint> {
        let path = path.into();
        if !path.starts_with('/') || path.chars().any(char::is_whitespace) {
            return Err(InvalidEndpoint(path));
        }
        Ok(Self(path))
    }

    /// Get the label as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = InvalidEndpoint;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = InvalidEndpoint;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_paths() {
        assert!(Endpoint::new("/").is_ok());
        assert!(Endpoint::new("/foo").is_ok());
        assert!(Endpoint::new("/api/v1/items").is_ok());
    }

    #[test]
    fn rejects_missing_slash() {
        let err = Endpoint::new("foo").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid endpoint 'foo': must start with '/' and contain no whitespace"
        );
    }

    #[test]
    fn rejects_whitespace() {
        assert!(Endpoint::new("/foo bar").is_err());
        assert!(Endpoint::new("/foo\n").is_err());
    }

    #[test]
    fn display_is_raw_path() {
        let endpoint = Endpoint::new("/baz").unwrap();
        assert_eq!(endpoint.to_string(), "/baz");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Endpoint = serde_json::from_str(r#""/foo""#).unwrap();
        assert_eq!(ok.as_str(), "/foo");

        let bad: Result<Endpoint, _> = serde_json::from_str(r#""foo""#);
        assert!(bad.is_err());
    }
}
