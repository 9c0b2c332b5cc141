use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

/// CORS layer for the configured origins.
///
/// Credentials are allowed so the refresh cookie reaches `/auth/refresh`,
/// which rules out wildcard origins. Without an explicit list the request
/// origin is mirrored in development and nothing is allowed in production.
pub fn create_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let allow_origin = if !origins.is_empty() {
        AllowOrigin::list(origins)
    } else if config.is_production() {
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        AllowOrigin::mirror_request()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(86400))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn preflight(config: &Config, origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/animals", get(|| async { "ok" }))
            .layer(create_cors_layer(config));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/animals")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_listed_origin_is_allowed() {
        let config = Config {
            allowed_origins: vec!["https://zoo.example".to_string()],
            ..Config::default()
        };

        assert_eq!(
            preflight(&config, "https://zoo.example").await.unwrap(),
            "https://zoo.example"
        );
        assert!(preflight(&config, "https://evil.example").await.is_none());
    }

    #[tokio::test]
    async fn test_development_mirrors_origin() {
        let config = Config::default();

        assert_eq!(
            preflight(&config, "http://localhost:3000").await.unwrap(),
            "http://localhost:3000"
        );
    }
}
