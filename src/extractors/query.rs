//! Query string access where a repeated key keeps its first value.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use std::collections::HashMap;

/// Decode the query string of `uri`. The first occurrence of a key wins; an
/// undecodable query yields no parameters.
pub fn first_values(uri: &Uri) -> HashMap<String, String> {
    let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(p)| p)
        .unwrap_or_default();
    let mut out = HashMap::new();
    for (k, v) in pairs {
        out.entry(k).or_insert(v);
    }
    out
}

/// Query parameters, first value per key. Never rejects.
#[derive(Clone, Debug, Default)]
pub struct FirstQuery(pub HashMap<String, String>);

impl FirstQuery {
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for FirstQuery
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(FirstQuery(first_values(&parts.uri)))
    }
}
