//! CORS layer configuration.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use wajha_core::config::app::ServerConfig;

/// Builds a CORS tower layer from server configuration.
///
/// Non-production environments allow any origin. Production serves the
/// configured allow-list only; config validation guarantees the list is
/// non-empty there.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .max_age(std::time::Duration::from_secs(
            config.cors.max_age_seconds,
        ));

    if config.is_production() {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer
            .allow_origin(origins)
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_credentials(true);
    } else {
        layer = layer.allow_origin(Any).allow_headers(Any);
    }

    layer
}
