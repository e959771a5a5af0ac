//! Error types for `appbridge-toolset`.

use thiserror::Error;

/// Main error type for toolset construction.
///
/// There is no degraded or partial-success mode: every variant is fatal to construction.
#[derive(Error, Debug)]
pub enum ToolsetError {
    /// Neither (integration + trigger) nor (connection + entity operations/actions) was
    /// selected by the configuration. Raised before any remote call is made.
    #[error("configuration error: {0}")]
    Config(String),

    /// The supplied service account credential JSON could not be parsed.
    #[error("failed to parse service account credential JSON: {0}")]
    CredentialParse(#[source] serde_json::Error),

    /// A spec provider call failed; the underlying error is propagated unchanged.
    #[error("spec provider error: {0:#}")]
    Provider(anyhow::Error),

    /// The spec document could not be parsed into tools.
    #[error(transparent)]
    Parse(#[from] appbridge_openapi::OpenApiToolError),
}

/// Result type alias for toolset construction.
pub type Result<T> = std::result::Result<T, ToolsetError>;
