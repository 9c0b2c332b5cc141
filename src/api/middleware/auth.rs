use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::router::AppState;
use crate::application::ports::TokenService;
use crate::domain::authorization::UserContext;
use crate::domain::value_objects::UserId;

/// Authentication middleware for protected routes.
///
/// A missing or malformed `Authorization: Bearer` header is 401; a token
/// that fails verification is 403. On success the caller's [`UserContext`]
/// is added to the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = authenticate(request.headers(), state.tokens.as_ref())?;
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(headers: &HeaderMap, tokens: &dyn TokenService) -> Result<UserContext, ApiError> {
    let token = bearer_token(headers).ok_or_else(ApiError::unauthorized)?;

    let claims = tokens.verify_access_token(token).map_err(|e| {
        debug!("Rejected access token: {}", e);
        ApiError::forbidden()
    })?;
    let user_id: UserId = claims.sub.parse().map_err(|_| ApiError::forbidden())?;

    Ok(UserContext::new(user_id, claims.username, claims.roles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AccessClaims, MockTokenService, TokenError};
    use crate::domain::value_objects::Role;
    use axum::http::{HeaderValue, StatusCode};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let tokens = MockTokenService::new();

        let err = authenticate(&HeaderMap::new(), &tokens).unwrap_err();

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthorized() {
        let tokens = MockTokenService::new();

        let err = authenticate(&headers("Basic abc"), &tokens).unwrap_err();

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_token_is_forbidden() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify_access_token()
            .returning(|_| Err(TokenError::Invalid("expired".into())));

        let err = authenticate(&headers("Bearer stale"), &tokens).unwrap_err();

        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_valid_token_builds_context() {
        let user_id = UserId::new();
        let sub = user_id.to_string();
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify_access_token()
            .withf(|t| t == "good")
            .returning(move |_| {
                Ok(AccessClaims {
                    sub: sub.clone(),
                    username: "dave".into(),
                    roles: vec![Role::Employee],
                    iat: 0,
                    exp: usize::MAX,
                })
            });

        let context = authenticate(&headers("Bearer good"), &tokens).unwrap();

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.username, "dave");
        assert!(context.has_role(Role::Employee));
    }
}
