use super::state::AppState;
use crate::{api, middlewares::metrics::track_http_metrics};
use axum::{Router, middleware::from_fn, routing::get};

pub fn get_api_routes(enable_metrics: bool) -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(api::root::route))
        .route("/api/history", get(api::history::route));

    if enable_metrics {
        router = router
            .route("/metrics", get(api::metrics::route))
            .route_layer(from_fn(track_http_metrics));
    }

    router
}
