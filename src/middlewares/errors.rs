use crate::errors::{ErrorEnvelope, HistoryError};
use axum::{
    Json,
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

/// Logs every error response and makes sure its body is an `ok: false` envelope.
///
/// Handlers already answer with envelopes; this catches what axum itself
/// produces, like query rejections and bare 405s.
pub async fn error_middleware(request: Request, next: Next) -> Result<Response, Infallible> {
    let request_path = request.uri().path().to_string();
    let request_uri = request.uri().to_string();
    let response = next.run(request).await;
    let status_code = response.status();

    // axum answers a wrong method with an empty 405
    if status_code == StatusCode::METHOD_NOT_ALLOWED {
        tracing::warn!(
            path = %request_path,
            uri = %request_uri,
            "Method not allowed"
        );
        return Ok(HistoryError::MethodNotAllowed.into_response());
    }

    if status_code.is_client_error() || status_code.is_server_error() {
        handle_error(response, &request_path, &request_uri, status_code).await
    } else {
        Ok(response)
    }
}

async fn handle_error(
    response: Response,
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
) -> Result<Response, Infallible> {
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(
                path = %request_path,
                uri = %request_uri,
                status = %status_code,
                "Failed to read body: {e:?}",
            );
            return Ok(
                HistoryError::Internal(format!("Failed to read response body: {e}"))
                    .into_response(),
            );
        },
    };

    match serde_json::from_slice::<ErrorEnvelope>(&bytes) {
        Ok(envelope) => {
            log_error(request_path, request_uri, status_code, &envelope);

            // Reconstruct the response with the original body
            Ok(Response::from_parts(parts, Body::from(bytes)))
        },
        Err(_) => {
            let envelope = wrap_plain_body(status_code, &bytes);
            log_error(request_path, request_uri, status_code, &envelope);

            Ok((status_code, Json(envelope)).into_response())
        },
    }
}

fn wrap_plain_body(status_code: StatusCode, bytes: &Bytes) -> ErrorEnvelope {
    let text = String::from_utf8_lossy(bytes).trim().to_string();
    let message = (!text.is_empty()).then_some(text);

    let code = match status_code {
        StatusCode::NOT_FOUND => "not_found",
        s if s.is_client_error() => "bad_request",
        _ => "server_error",
    };

    ErrorEnvelope::new(code, message)
}

fn log_error(
    request_path: &str,
    request_uri: &str,
    status_code: StatusCode,
    envelope: &ErrorEnvelope,
) {
    let detail = envelope.message.as_deref().unwrap_or_default();

    if status_code.is_server_error() {
        tracing::error!(
            path = %request_path,
            uri = %request_uri,
            status = %status_code,
            failures = envelope.failures.len(),
            "Server error: {} - {}",
            envelope.error,
            detail,
        );
    } else {
        tracing::warn!(
            path = %request_path,
            uri = %request_uri,
            status = %status_code,
            "Client error: {} - {}",
            envelope.error,
            detail,
        );
    }
}
