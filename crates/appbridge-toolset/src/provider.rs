//! Spec provider seam.
//!
//! The toolset core does not talk to the control plane itself; it consumes this trait.
//! `appbridge-connect` supplies the HTTP implementation, and tests supply in-process
//! mocks.

use appbridge_openapi::ToolSpecDocument;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Connection metadata needed to direct generated tools at the right backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDetails {
    pub service_name: String,
    pub host: String,
}

/// Request for an integration-mode spec document.
#[derive(Debug, Clone)]
pub struct IntegrationSpecRequest<'a> {
    pub project: &'a str,
    pub location: &'a str,
    pub integration: &'a str,
    pub trigger: &'a str,
    pub service_account_json: Option<&'a str>,
}

/// Request for connection metadata.
#[derive(Debug, Clone)]
pub struct ConnectionDetailsRequest<'a> {
    pub project: &'a str,
    pub location: &'a str,
    pub connection: &'a str,
    pub service_account_json: Option<&'a str>,
}

/// Request for a connection-mode spec document.
#[derive(Debug, Clone)]
pub struct ConnectionSpecRequest<'a> {
    pub project: &'a str,
    pub location: &'a str,
    pub connection: &'a str,
    pub entity_operations: &'a BTreeMap<String, Vec<String>>,
    pub actions: &'a [String],
    pub tool_name_prefix: &'a str,
    /// Full instruction text, including the connection directive appended by the
    /// toolset builder. Baked into every generated tool description.
    pub tool_instructions: &'a str,
    pub service_account_json: Option<&'a str>,
}

/// Produces OpenAPI-shaped spec documents and connection metadata.
///
/// Implementations own transport concerns (timeouts, TLS); the toolset core performs no
/// retries and propagates failures unchanged.
#[async_trait]
pub trait SpecProvider: Send + Sync {
    /// Fetch the spec document for an integration/trigger pair.
    async fn openapi_spec_for_integration(
        &self,
        request: &IntegrationSpecRequest<'_>,
    ) -> anyhow::Result<ToolSpecDocument>;

    /// Fetch metadata (service name, host) for a connection.
    async fn connection_details(
        &self,
        request: &ConnectionDetailsRequest<'_>,
    ) -> anyhow::Result<ConnectionDetails>;

    /// Produce the spec document for a connection's entity operations and actions.
    async fn openapi_spec_for_connection(
        &self,
        request: &ConnectionSpecRequest<'_>,
    ) -> anyhow::Result<ToolSpecDocument>;
}
