//! Extract the requested response format from the `format` query parameter.

use super::query::first_values;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Query parameter name selecting the response body encoding.
pub const FORMAT_PARAM: &str = "format";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    /// Only the exact value `xml` selects XML; anything else, or nothing, is JSON.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("xml") => ResponseFormat::Xml,
            _ => ResponseFormat::Json,
        }
    }
}

/// Extractor for the response format. Never rejects.
#[derive(Clone, Copy, Debug)]
pub struct Format(pub ResponseFormat);

#[async_trait]
impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = first_values(&parts.uri);
        Ok(Format(ResponseFormat::from_param(
            params.get(FORMAT_PARAM).map(String::as_str),
        )))
    }
}
