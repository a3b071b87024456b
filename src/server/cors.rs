use crate::config::CorsConfig;
use axum::http::{Method, header::CONTENT_TYPE};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Answers every `OPTIONS` request as a preflight with an empty 200, echoes an
/// allowed `Origin` back and sets `Vary: origin` on all responses.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let allow_origin = match cors {
        CorsConfig::Any => AllowOrigin::any(),
        CorsConfig::Origins(origins) => AllowOrigin::list(origins.iter().cloned()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
