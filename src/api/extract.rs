//! Request extractors
//!
//! Wrappers around axum's `Json`, `Query` and `Path` whose rejections are
//! [`BackendError`]s, so a malformed request gets the same `{"error": ...}`
//! body as every other failure. [`Bearer`] pulls the caller's session token.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::BackendError;
use crate::gateway::AuthToken;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(BackendError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BackendError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(BackendError))]
pub struct ApiPath<T>(pub T);

/// Session token from `Authorization: Bearer <token>` (or `JWT <token>`).
pub struct Bearer(pub AuthToken);

impl Bearer {
    fn parse(header: &str) -> Option<AuthToken> {
        let (scheme, token) = header.trim().split_once(' ')?;
        if scheme.eq_ignore_ascii_case("bearer") || scheme.eq_ignore_ascii_case("jwt") {
            AuthToken::new(token)
        } else {
            None
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Bearer {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse);

        match token {
            Some(token) => Ok(Bearer(token)),
            None => {
                tracing::debug!(uri = %parts.uri, "Request without a usable session token");
                Err(BackendError::Unauthenticated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_schemes() {
        assert_eq!(Bearer::parse("Bearer abc").unwrap().as_str(), "abc");
        assert_eq!(Bearer::parse("jwt  xyz ").unwrap().as_str(), "xyz");
    }

    #[test]
    fn test_parse_rejects_other_headers() {
        assert!(Bearer::parse("Basic dXNlcjpwdw==").is_none());
        assert!(Bearer::parse("Bearer").is_none());
        assert!(Bearer::parse("Bearer    ").is_none());
    }
}
