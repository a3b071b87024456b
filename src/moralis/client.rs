use super::body::{parse_upstream_body, preview};
use super::endpoints::{Endpoint, ORDER};
use crate::config::MoralisConfig;
use crate::errors::AppError;
use metrics::counter;
use reqwest::{Client, StatusCode, Url, header::ACCEPT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error, warn};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Upstream answered with a non-2xx status.
    Status,
    /// Upstream answered 2xx, but the body is not JSON.
    BadJson,
    Timeout,
    /// Connection refused, TLS failure, body cut short and the like.
    Request,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::BadJson => "bad_json",
            Self::Timeout => "timeout",
            Self::Request => "request",
        }
    }
}

/// Why one upstream call did not yield JSON. Serialized as-is into the
/// error envelope so callers can diagnose without upstream credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub endpoint: Endpoint,
    pub kind: FailureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Truncated raw body, see [`super::body::PREVIEW_CHARS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpstreamFailure {
    fn status(endpoint: Endpoint, status: StatusCode, body: &str) -> Self {
        Self {
            endpoint,
            kind: FailureKind::Status,
            status: Some(status.as_u16()),
            body: Some(preview(body)),
            message: None,
        }
    }

    fn transport(endpoint: Endpoint, status: Option<StatusCode>, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FailureKind::Timeout
        } else {
            FailureKind::Request
        };

        Self {
            endpoint,
            kind,
            status: status.map(|s| s.as_u16()),
            body: None,
            message: Some(err.to_string()),
        }
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.endpoint, self.kind.as_str())?;
        if let Some(status) = self.status {
            write!(f, ", status {status}")?;
        }
        write!(f, ")")
    }
}

/// Thin GET-only client for the three history listings.
///
/// Only constructed when an API key is configured, so holding one means
/// requests can be authenticated.
#[derive(Clone)]
pub struct MoralisClient {
    base_url: Url,
    api_key: String,
    client: Client,
}

impl MoralisClient {
    pub fn new(config: &MoralisConfig, api_key: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Server(format!("failed to build Moralis client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key,
            client,
        })
    }

    pub fn endpoint_url(
        &self,
        endpoint: Endpoint,
        address: &str,
        chain_id: &str,
    ) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(&endpoint.path(address))?;

        url.query_pairs_mut()
            .append_pair("chain", chain_id)
            .append_pair("order", ORDER)
            .append_pair("limit", &endpoint.limit().to_string());

        Ok(url)
    }

    /// Fetches one listing and parses its body. Never retries.
    pub async fn fetch(
        &self,
        endpoint: Endpoint,
        address: &str,
        chain_id: &str,
    ) -> Result<Value, UpstreamFailure> {
        let result = self.get_json(endpoint, address, chain_id).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(failure) => failure.kind.as_str(),
        };
        counter!("upstream_requests_total", "endpoint" => endpoint.as_str(), "outcome" => outcome)
            .increment(1);

        result
    }

    async fn get_json(
        &self,
        endpoint: Endpoint,
        address: &str,
        chain_id: &str,
    ) -> Result<Value, UpstreamFailure> {
        let url = self
            .endpoint_url(endpoint, address, chain_id)
            .map_err(|e| UpstreamFailure {
                endpoint,
                kind: FailureKind::Request,
                status: None,
                body: None,
                message: Some(format!("URL error: {e}")),
            })?;

        debug!(%endpoint, url = %url, "Moralis GET");

        let resp = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(%endpoint, error = %e, "Moralis request failed");
                UpstreamFailure::transport(endpoint, None, &e)
            })?;

        let status = resp.status();
        let body_text = resp.text().await.map_err(|e| {
            warn!(%endpoint, %status, error = %e, "Moralis body could not be read");
            UpstreamFailure::transport(endpoint, Some(status), &e)
        })?;

        if !status.is_success() {
            warn!(
                %endpoint,
                %status,
                response_body = %preview(&body_text),
                "Moralis returned a non-success status"
            );
            return Err(UpstreamFailure::status(endpoint, status, &body_text));
        }

        parse_upstream_body(&body_text).map_err(|e| {
            error!(
                %endpoint,
                %status,
                response_body = %e.preview,
                error = %e.reason,
                "Moralis returned a body that is not JSON"
            );
            UpstreamFailure {
                endpoint,
                kind: FailureKind::BadJson,
                status: Some(status.as_u16()),
                body: Some(e.preview),
                message: Some(e.reason),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn client(base: &str) -> MoralisClient {
        let config = MoralisConfig {
            api_key: None,
            base_url: Url::parse(base).unwrap(),
            request_timeout: Duration::from_secs(10),
        };

        MoralisClient::new(&config, "test-key".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_url() {
        let client = client("https://deep-index.moralis.io/api/v2.2/");
        let url = client
            .endpoint_url(
                Endpoint::Erc20Transfers,
                "0xde709f2102306220921060314715629080e2fb77",
                "0x171",
            )
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://deep-index.moralis.io/api/v2.2/0xde709f2102306220921060314715629080e2fb77/erc20/transfers?chain=0x171&order=DESC&limit=200"
        );
    }

    #[test]
    fn test_status_failure_truncates_body() {
        let body = "e".repeat(1_000);
        let failure =
            UpstreamFailure::status(Endpoint::Transactions, StatusCode::BAD_GATEWAY, &body);

        assert_eq!(failure.kind, FailureKind::Status);
        assert_eq!(failure.status, Some(502));
        assert_eq!(failure.body.map(|b| b.len()), Some(500));
    }

    #[test]
    fn test_failure_display() {
        let failure = UpstreamFailure::status(
            Endpoint::InternalTransactions,
            StatusCode::TOO_MANY_REQUESTS,
            "",
        );

        assert_eq!(failure.to_string(), "internal_transactions (status, status 429)");
    }
}
