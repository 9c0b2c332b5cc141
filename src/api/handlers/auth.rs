use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::errors::ApiError;
use crate::api::router::AppState;
use crate::application::dto::{AccessTokenResponse, LoginRequest, MessageResponse};

/// Name of the http-only cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "jwt";

fn refresh_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// POST /auth
/// Exchange credentials for an access token; the refresh token is set as a cookie
#[utoipa::path(
    post,
    path = "/auth",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AccessTokenResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AccessTokenResponse>), ApiError> {
    let session = state.login.execute(&request).await?;

    let jar = jar.add(refresh_cookie(
        session.refresh_token,
        state.tokens.refresh_ttl_secs(),
    ));
    Ok((
        jar,
        Json(AccessTokenResponse {
            access_token: session.access_token,
        }),
    ))
}

/// GET /auth/refresh
#[utoipa::path(
    get,
    path = "/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "No refresh cookie"),
        (status = 403, description = "Invalid refresh token")
    )
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    Ok(Json(state.refresh.execute(token.as_deref()).await?))
}

/// POST /auth/logout
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Cookie cleared", body = MessageResponse),
        (status = 204, description = "No session cookie")
    )
)]
pub async fn logout_handler(jar: CookieJar) -> Response {
    if jar.get(REFRESH_COOKIE).is_none() {
        return StatusCode::NO_CONTENT.into_response();
    }

    let jar = jar.remove(
        Cookie::build(REFRESH_COOKIE)
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .path("/"),
    );
    (jar, Json(MessageResponse::new("Cookie cleared"))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = refresh_cookie("token".to_string(), 604_800);

        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
    }
}
