use crate::moralis::UpstreamFailure;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;
use tracing::error;

/// Errors that stop the service from starting.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Server startup error: {0}")]
    Server(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        error!("I/O Error occurred: {err}");
        AppError::Server(err.to_string())
    }
}

/// Everything a request can fail with.
///
/// - caller faults answer 4xx
/// - a missing API key and internal faults answer 500
/// - upstream faults answer 502
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("The address query parameter is required.")]
    MissingAddress,

    #[error("'{0}' is not a 0x-prefixed, 40 hex digit address.")]
    BadAddress(String),

    #[error("'{0}' is not a supported chain.")]
    BadChain(String),

    #[error("The Moralis API key is not configured.")]
    MissingApiKey,

    #[error("Moralis returned a bad response for {}", summarize(.failures))]
    Upstream {
        chain: String,
        address: String,
        failures: Vec<UpstreamFailure>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("The requested resource has not been found.")]
    NotFound,

    #[error("Only GET and OPTIONS are supported.")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),
}

fn summarize(failures: &[UpstreamFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `ok: false` body every error path answers with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<UpstreamFailure>,
}

impl ErrorEnvelope {
    pub fn new(code: &str, message: Option<String>) -> Self {
        Self {
            ok: false,
            error: code.to_string(),
            message,
            chain: None,
            address: None,
            failures: vec![],
        }
    }
}

impl HistoryError {
    /// Stable, machine-readable code for the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAddress => "missing_address",
            Self::BadAddress(_) => "bad_address",
            Self::BadChain(_) => "bad_chain",
            Self::MissingApiKey => "missing_api_key",
            Self::Upstream { .. } => "moralis_bad_response",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Internal(_) => "server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAddress | Self::BadAddress(_) | Self::BadChain(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            },
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingApiKey | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let mut envelope = ErrorEnvelope::new(self.code(), Some(self.to_string()));

        if let Self::Upstream {
            chain,
            address,
            failures,
        } = self
        {
            envelope.chain = Some(chain.clone());
            envelope.address = Some(address.clone());
            envelope.failures = failures.clone();
        }

        envelope
    }
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.envelope())).into_response()
    }
}
