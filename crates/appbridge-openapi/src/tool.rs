//! Tool definitions generated from OpenAPI operations.

use crate::auth::{AuthCredential, AuthScheme};
use serde_json::Value;

/// A single invocable REST operation exposed to an agent.
///
/// One tool is generated per OpenAPI operation. The tool carries everything an executor
/// needs to issue the call: method, path template, base URL, a JSON Schema for its
/// input object, and the auth scheme/credential pair resolved at toolset construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RestApiTool {
    /// Unique tool name (OpenAPI `operationId`, or generated from method + path).
    pub name: String,
    /// Human/agent-facing description of what the operation does.
    pub description: String,
    /// Uppercase HTTP method (`GET`, `POST`, ...).
    pub method: String,
    /// Path template as written in the spec (e.g. `/pet/{petId}`).
    pub path: String,
    /// Base URL from the document's first `servers` entry, if any.
    pub base_url: Option<String>,
    /// JSON Schema object describing the tool's input.
    pub input_schema: Value,
    /// How callers of this tool authenticate.
    pub auth_scheme: AuthScheme,
    /// The credential this tool authenticates with.
    pub auth_credential: AuthCredential,
}

impl RestApiTool {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
