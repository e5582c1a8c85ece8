//! Client metadata extractor — request IP and user agent.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use wajha_auth::service::ClientInfo;

/// Caller IP and user agent, read from proxy headers.
///
/// The deployment fronts the server with a reverse proxy, so the
/// `x-forwarded-for` value is trusted as the caller address. Absent
/// headers yield `"unknown"` rather than a rejection.
#[derive(Debug, Clone)]
pub struct ClientMeta(pub ClientInfo);

impl ClientMeta {
    /// Builds client metadata from raw request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let user_agent = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self(ClientInfo {
            ip_address,
            user_agent,
        })
    }
}

impl std::ops::Deref for ClientMeta {
    type Target = ClientInfo;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_first_forwarded_address_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        let meta = ClientMeta::from_headers(&headers);
        assert_eq!(meta.ip_address, "203.0.113.9");
    }

    #[test]
    fn test_missing_headers_default_to_unknown() {
        let meta = ClientMeta::from_headers(&HeaderMap::new());
        assert_eq!(meta.ip_address, "unknown");
        assert!(meta.user_agent.is_none());
    }
}
