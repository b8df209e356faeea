use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::admin_auth::AdminAuthError;

use super::super::error::ApiError;
use super::AdminState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub(super) async fn require_admin_key(
    State(state): State<AdminState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = presented_key(request.headers());

    match state.auth.authenticate(token.as_deref()) {
        Ok(()) => next.run(request).await,
        Err(AdminAuthError::NotConfigured) => ApiError::admin_disabled().into_response(),
        Err(AdminAuthError::Missing) | Err(AdminAuthError::Invalid) => {
            ApiError::unauthorized().into_response()
        }
    }
}

fn presented_key(headers: &HeaderMap) -> Option<String> {
    extract_bearer(headers).or_else(|| {
        headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    })
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_takes_precedence_over_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));
        assert_eq!(presented_key(&headers).as_deref(), Some("from-bearer"));
    }

    #[test]
    fn falls_back_to_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));
        assert_eq!(presented_key(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn no_credentials() {
        assert_eq!(presented_key(&HeaderMap::new()), None);
    }
}
