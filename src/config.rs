use crate::cli::Args;
use crate::errors::AppError;
use axum::http::HeaderValue;
use reqwest::Url;
use std::net::IpAddr;
use std::time::Duration;
use tracing::Level;

/// Read when neither the config file, `HISTORY_PROXY_MORALIS_API_KEY` nor
/// `--moralis-api-key` set a key.
pub const MORALIS_API_KEY_ENV: &str = "MORALIS_API_KEY";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: IpAddr,
    pub server_port: u16,
    pub server_concurrency_limit: usize,
    pub log_level: Level,
    pub moralis: MoralisConfig,
    pub cors: CorsConfig,
    pub no_metrics: bool,
}

#[derive(Clone, Debug)]
pub struct MoralisConfig {
    /// `None` is served as a configuration error on every history request.
    pub api_key: Option<String>,
    /// Always ends with `/` so that joining relative paths keeps the API version.
    pub base_url: Url,
    pub request_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsConfig {
    Any,
    Origins(Vec<HeaderValue>),
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        let api_key = args
            .moralis_api_key
            .or_else(|| std::env::var(MORALIS_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty());

        let moralis = MoralisConfig {
            api_key,
            base_url: parse_base_url(&args.moralis_base_url)?,
            request_timeout: Duration::from_secs(args.upstream_timeout_sec),
        };

        if moralis.request_timeout.is_zero() {
            return Err(AppError::Config(
                "--upstream-timeout-sec must be greater than 0".into(),
            ));
        }

        if args.server_concurrency_limit == 0 {
            return Err(AppError::Config(
                "--server-concurrency-limit must be greater than 0".into(),
            ));
        }

        Ok(Config {
            server_address: args.server_address,
            server_port: args.server_port,
            server_concurrency_limit: args.server_concurrency_limit,
            log_level: args.log_level.into(),
            moralis,
            cors: parse_cors_origins(&args.cors_origins)?,
            no_metrics: args.no_metrics,
        })
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&with_slash)
        .map_err(|e| AppError::Config(format!("invalid Moralis base URL '{raw}': {e}")))?;

    if url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "invalid Moralis base URL '{raw}': not a base URL"
        )));
    }

    Ok(url)
}

/// Comma-separated origins; a `*` anywhere allows every origin.
pub fn parse_cors_origins(raw: &str) -> Result<CorsConfig, AppError> {
    let origins: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.contains(&"*") {
        return Ok(CorsConfig::Any);
    }

    origins
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| AppError::Config(format!("invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsConfig::Origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://deep-index.moralis.io/api/v2.2", "https://deep-index.moralis.io/api/v2.2/")]
    #[case("https://deep-index.moralis.io/api/v2.2/", "https://deep-index.moralis.io/api/v2.2/")]
    #[case("http://127.0.0.1:8080", "http://127.0.0.1:8080/")]
    fn test_parse_base_url(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(parse_base_url(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:someone@example.com")]
    fn test_parse_base_url_err(#[case] raw: &str) {
        assert!(parse_base_url(raw).is_err());
    }

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(
            parse_cors_origins("http://localhost:3000, https://app.example.com,").unwrap(),
            CorsConfig::Origins(vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://app.example.com"),
            ])
        );
        assert_eq!(
            parse_cors_origins("https://app.example.com,*").unwrap(),
            CorsConfig::Any
        );
        assert_eq!(parse_cors_origins("").unwrap(), CorsConfig::Origins(vec![]));
        assert!(parse_cors_origins("http://bad\norigin").is_err());
    }
}
