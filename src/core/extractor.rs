use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use std::convert::Infallible;

/// Longest requester tag kept on a session
const MAX_TAG_LEN: usize = 256;

/// Informational tag describing who allocated a code, taken from `User-Agent`
#[derive(Debug, Clone)]
pub struct RequesterTag(pub String);

impl<S> FromRequestParts<S> for RequesterTag
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tag = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().take(MAX_TAG_LEN).collect())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self(tag))
    }
}
