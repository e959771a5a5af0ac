//! Error types for `appbridge-connect`.

use thiserror::Error;

/// Main error type for control-plane clients.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The service account key JSON could not be parsed.
    #[error("failed to parse service account credential JSON: {0}")]
    Credential(#[source] serde_json::Error),

    /// Signing the service-account assertion failed (bad private key, unsupported alg).
    #[error("failed to sign service account assertion: {0}")]
    Assertion(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint rejected the grant or returned an unusable payload.
    #[error("token exchange failed: {0}")]
    Token(String),

    /// An HTTP request could not be sent or its transport failed.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The control plane answered with a non-success status.
    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Result type alias for control-plane operations.
pub type Result<T> = std::result::Result<T, ConnectError>;
