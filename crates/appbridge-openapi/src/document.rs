//! Opaque OpenAPI-shaped spec documents.

use serde_json::Value;

/// An OpenAPI-shaped description of zero or more callable operations.
///
/// Produced by a spec provider (control-plane API or local synthesis) and consumed by
/// [`crate::parser::parse_document`]. The structure is opaque to everything else; it is
/// carried around as raw JSON so `$ref` resolution can work against the original
/// document rather than a lossy typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpecDocument(Value);

impl ToolSpecDocument {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a document from a JSON string (e.g. the `openApiSpec` payload returned by
    /// the spec generation API).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid JSON.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        Ok(Self(serde_json::from_str(raw)?))
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ToolSpecDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
