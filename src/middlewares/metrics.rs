use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::counter;

/// Counts requests per route template, so path parameters never become labels.
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = req.method().to_string();

    let response = next.run(req).await;
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method, "path" => path, "status" => status)
        .increment(1);

    response
}
