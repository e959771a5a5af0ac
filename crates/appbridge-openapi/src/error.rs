//! Error types for `appbridge-openapi`.

use thiserror::Error;

/// Main error type for OpenAPI tool parsing.
#[derive(Error, Debug)]
pub enum OpenApiToolError {
    /// The spec document could not be deserialized as an OpenAPI document.
    #[error("invalid tool spec document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    /// A `$ref` pointed outside the current document or used a non-pointer fragment.
    #[error("unsupported $ref '{reference}': {message}")]
    UnsupportedRef { reference: String, message: String },

    /// A `$ref` did not resolve to a value in the document.
    #[error("unresolved $ref '{reference}'")]
    UnresolvedRef { reference: String },

    /// A `$ref` chain looped back on itself.
    #[error("cyclic $ref detected while resolving '{reference}'")]
    CyclicRef { reference: String },

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for OpenAPI tool parsing.
pub type Result<T> = std::result::Result<T, OpenApiToolError>;
