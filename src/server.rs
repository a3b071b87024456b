pub mod cors;
pub mod logging;
pub mod metrics;
pub mod routes;
pub mod state;

use crate::{
    config::Config,
    errors::{AppError, HistoryError},
    middlewares::{errors::error_middleware, panic::handle_panic},
    moralis::MoralisClient,
};
use axum::{Extension, Router, middleware::from_fn};
use metrics::{setup_metrics_recorder, spawn_process_collector};
use routes::get_api_routes;
use state::AppState;
use std::sync::Arc;
use tower::{Layer, limit::ConcurrencyLimitLayer};
use tower_http::{catch_panic::CatchPanicLayer, normalize_path::NormalizePathLayer};
use tracing::warn;

/// Builds and configures the Axum `Router`.
/// Returns `Ok(Router)` on success or an `AppError` if a step fails.
pub fn build(config: Arc<Config>) -> Result<Router, AppError> {
    // Setting up the metrics recorder needs to be the very first step before
    // doing anything that uses metrics, or the initial data will be lost:
    let metrics_handle = if !config.no_metrics {
        let recorder = setup_metrics_recorder();
        spawn_process_collector();

        Some(recorder)
    } else {
        None
    };

    let moralis = match &config.moralis.api_key {
        Some(api_key) => Some(MoralisClient::new(&config.moralis, api_key.clone())?),
        None => {
            warn!(
                "No Moralis API key configured; every history request will answer missing_api_key"
            );
            None
        },
    };

    let app_state = AppState { moralis };

    let inner = {
        let mut routes: Router = get_api_routes(!config.no_metrics)
            .with_state(app_state)
            .fallback(HistoryError::NotFound)
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(from_fn(error_middleware))
            .layer(cors::cors_layer(&config.cors));

        if let Some(prom_handler) = metrics_handle {
            routes = routes.layer(Extension(prom_handler));
        }

        routes
    };

    let inner = NormalizePathLayer::trim_trailing_slash().layer(inner);
    let app = Router::new()
        .fallback_service(inner)
        .layer(ConcurrencyLimitLayer::new(config.server_concurrency_limit));

    Ok(app)
}
