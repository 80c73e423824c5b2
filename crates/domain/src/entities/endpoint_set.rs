//! The fixed set of endpoint labels a tick can be attributed to

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::Endpoint};

/// Non-empty, duplicate-free list of endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Endpoint>", into = "Vec<Endpoint>")]
pub struct EndpointSet {
    endpoints: Vec<Endpoint>,
}

impl EndpointSet {
    /// Build a set from endpoints, dropping duplicates while keeping order
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyEndpointSet` if no endpoints are given.
    pub fn new(endpoints: impl IntoIterator<Item = Endpoint>) -> Result<Self, DomainError> {
        let mut unique: Vec<Endpoint> = Vec::new();
        for endpoint in endpoints {
            if !unique.contains(&endpoint) {
                unique.push(endpoint);
            }
        }

        if unique.is_empty() {
            return Err(DomainError::EmptyEndpointSet);
        }
        Ok(Self { endpoints: unique })
    }

    /// Parse a list of raw paths
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEndpoint` for the first malformed path, or
    /// `DomainError::EmptyEndpointSet` if the list is empty.
    pub fn parse<S: AsRef<str>>(paths: &[S]) -> Result<Self, DomainError> {
        let endpoints = paths
            .iter()
            .map(|p| {
                Endpoint::new(p.as_ref())
                    .map_err(|_| DomainError::InvalidEndpoint(p.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(endpoints)
    }

    /// Endpoint at `index`, wrapping around the set size
    #[must_use]
    pub fn pick(&self, index: usize) -> &Endpoint {
        &self.endpoints[index % self.endpoints.len()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }
}

impl Default for EndpointSet {
    fn default() -> Self {
        let endpoints = ["/foo", "/bar", "/baz"]
            .into_iter()
            .filter_map(|p| Endpoint::new(p).ok())
            .collect();
        Self { endpoints }
    }
}

impl TryFrom<Vec<Endpoint>> for EndpointSet {
    type Error = DomainError;

    fn try_from(value: Vec<Endpoint>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EndpointSet> for Vec<Endpoint> {
    fn from(set: EndpointSet) -> Self {
        set.endpoints
    }
}
