//! Caller identity extraction.
//!
//! The identity provider sits in front of this API and attaches the
//! caller's stable opaque token as a bearer credential. The token is
//! carried verbatim into the core as [`CallerIdentity`]; this layer never
//! issues or validates it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;

use crate::access::CallerIdentity;

/// Extractor for the optional caller identity.
///
/// Yields `None` when no `Authorization: Bearer` header is present, so
/// handlers can pass `Option<&CallerIdentity>` straight into the core and
/// let it enforce authentication.
#[derive(Debug, Clone)]
pub struct Identity(pub Option<CallerIdentity>);

impl Identity {
    /// Borrow the inner identity, if any.
    pub fn as_caller(&self) -> Option<&CallerIdentity> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(CallerIdentity::new);

        Ok(Identity(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Identity {
        let (mut parts, _) = request.into_parts();
        Identity::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_bearer_token_extracted() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Bearer user-token")
            .body(())
            .unwrap();

        let identity = extract(request).await;
        assert_eq!(
            identity.as_caller().map(|c| c.as_str()),
            Some("user-token")
        );
    }

    #[tokio::test]
    async fn test_missing_header_yields_none() {
        let request = Request::builder().body(()).unwrap();
        let identity = extract(request).await;
        assert!(identity.as_caller().is_none());
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_ignored() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap();

        let identity = extract(request).await;
        assert!(identity.as_caller().is_none());
    }

    #[tokio::test]
    async fn test_empty_bearer_ignored() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Bearer ")
            .body(())
            .unwrap();

        let identity = extract(request).await;
        assert!(identity.as_caller().is_none());
    }
}
