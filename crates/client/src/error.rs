//! Error types for the Xcode Cloud client.

use serde::Deserialize;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur when talking to the App Store Connect API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing configuration (environment variables, URLs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// JWT signing failed (malformed private key, bad claims).
    #[error("Token signing error: {0}")]
    Signing(String),

    /// API returned a structured error response.
    #[error("API Error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (DNS, connection refused, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact download failed.
    #[error("Failed to download binary: {status} {message}")]
    Download { status: u16, message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Build polling aborted after repeated consecutive fetch failures.
    #[error("Failed to poll build status after {attempts} consecutive errors: {last_error}")]
    PollAborted { attempts: u32, last_error: String },
}

/// Error envelope returned by the App Store Connect API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[allow(dead_code)]
    #[serde(default)]
    status: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    code: Option<String>,
    title: String,
    detail: String,
}

impl Error {
    /// Create an API error from a status code and response body.
    ///
    /// The body is parsed as the upstream `{errors: [...]}` envelope and each
    /// entry joined as `"{title}: {detail}"`. Bodies that do not match the
    /// envelope shape are surfaced verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            let message = envelope
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.title, e.detail))
                .collect::<Vec<_>>()
                .join("; ");
            Self::Api { status, message }
        } else {
            Self::Api {
                status,
                message: body.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_translation() {
        let body = r#"{"errors":[{"status":"401","code":"UNAUTHORIZED","title":"Unauthorized","detail":"Invalid JWT token"}]}"#;
        let err = Error::from_response(401, body);

        assert!(err
            .to_string()
            .contains("API Error (401): Unauthorized: Invalid JWT token"));
    }

    #[test]
    fn test_multiple_errors_joined() {
        let body = r#"{"errors":[
            {"status":"409","code":"CONFLICT","title":"Conflict","detail":"Name taken"},
            {"status":"409","code":"CONFLICT","title":"Conflict","detail":"Path invalid"}
        ]}"#;
        let err = Error::from_response(409, body);

        assert!(err
            .to_string()
            .contains("Conflict: Name taken; Conflict: Path invalid"));
    }

    #[test]
    fn test_unparseable_body_surfaced_raw() {
        let err = Error::from_response(502, "Bad Gateway");

        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
