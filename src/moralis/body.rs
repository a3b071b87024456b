use serde_json::Value;
use thiserror::Error;

/// Maximum number of characters of a raw upstream body we echo back.
pub const PREVIEW_CHARS: usize = 500;

/// Upstream answered with something that is not JSON, usually an HTML error page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("upstream body is not valid JSON: {reason}")]
pub struct ParseError {
    pub reason: String,
    pub preview: String,
}

/// Parses an upstream body that has already been read as text.
///
/// Bodies are always read as text first so that a failed parse can still
/// report what upstream actually sent.
pub fn parse_upstream_body(raw: &str) -> Result<Value, ParseError> {
    serde_json::from_str(raw).map_err(|e| ParseError {
        reason: e.to_string(),
        preview: preview(raw),
    })
}

/// First [`PREVIEW_CHARS`] characters of `raw`. Counts chars, not bytes, so
/// multi-byte text is never split mid-character.
pub fn preview(raw: &str) -> String {
    raw.chars().take(PREVIEW_CHARS).collect()
}
