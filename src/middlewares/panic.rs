use crate::errors::HistoryError;
use axum::response::{IntoResponse, Response};
use std::any::Any;

/// Turns a panic inside a handler into a `server_error` envelope carrying the panic message.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown panic message".to_string()
    };

    HistoryError::Internal(message).into_response()
}
