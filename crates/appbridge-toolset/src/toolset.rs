//! Toolset construction.

use crate::auth;
use crate::config::{ResourceSelector, ToolsetConfig};
use crate::error::{Result, ToolsetError};
use crate::provider::{
    ConnectionDetails, ConnectionDetailsRequest, ConnectionSpecRequest, IntegrationSpecRequest,
    SpecProvider,
};
use crate::registry::ToolRegistry;
use appbridge_openapi::{parse_document, RestApiTool, ToolSpecDocument};
use std::sync::Arc;
use tracing::{debug, warn};

/// A toolset generated from an Application Integration or Integration Connectors
/// resource.
///
/// Constructed once via [`IntegrationToolset::new`]; on success the registry is fully
/// populated, on failure no instance exists. The registry is never mutated after
/// construction, so [`IntegrationToolset::get_tools`] is cheap, infallible, and safe to
/// call from any number of threads.
#[derive(Debug)]
pub struct IntegrationToolset {
    config: ToolsetConfig,
    registry: ToolRegistry,
}

impl IntegrationToolset {
    /// Build a toolset: validate the config, fetch the spec document, resolve auth,
    /// parse, and populate the registry.
    ///
    /// Connection mode first fetches connection metadata and appends a directive to the
    /// tool instructions naming the connection's serviceName, host, and fully qualified
    /// resource path, so downstream consumers never ask the user for them.
    ///
    /// # Errors
    ///
    /// Returns [`ToolsetError::Config`] for an invalid resource selection (before any
    /// provider call), [`ToolsetError::CredentialParse`] for malformed service account
    /// JSON, and [`ToolsetError::Provider`]/[`ToolsetError::Parse`] for upstream
    /// failures, which are propagated unchanged.
    pub async fn new(config: ToolsetConfig, provider: &dyn SpecProvider) -> Result<Self> {
        let selector = config.selector()?;
        let document = Self::fetch_document(&config, &selector, provider).await?;

        let (auth_scheme, auth_credential) =
            auth::resolve(config.service_account_json.as_deref())?;
        let tools = parse_document(&document, &auth_scheme, &auth_credential)?;

        let mut registry = ToolRegistry::new();
        for tool in tools {
            let name = tool.name.clone();
            if registry.insert(tool).is_some() {
                warn!(tool = %name, "duplicate tool name in spec document, keeping the later definition");
            }
        }
        debug!(tool_count = registry.len(), "toolset constructed");

        Ok(Self { config, registry })
    }

    async fn fetch_document(
        config: &ToolsetConfig,
        selector: &ResourceSelector,
        provider: &dyn SpecProvider,
    ) -> Result<ToolSpecDocument> {
        let service_account_json = config.service_account_json.as_deref();
        match selector {
            ResourceSelector::Integration {
                integration,
                trigger,
            } => provider
                .openapi_spec_for_integration(&IntegrationSpecRequest {
                    project: &config.project,
                    location: &config.location,
                    integration,
                    trigger,
                    service_account_json,
                })
                .await
                .map_err(ToolsetError::Provider),
            ResourceSelector::Connection {
                connection,
                entity_operations,
                actions,
            } => {
                let details = provider
                    .connection_details(&ConnectionDetailsRequest {
                        project: &config.project,
                        location: &config.location,
                        connection,
                        service_account_json,
                    })
                    .await
                    .map_err(ToolsetError::Provider)?;

                let tool_instructions = connection_instructions(
                    &config.tool_instructions,
                    &details,
                    &config.project,
                    &config.location,
                    connection,
                );

                provider
                    .openapi_spec_for_connection(&ConnectionSpecRequest {
                        project: &config.project,
                        location: &config.location,
                        connection,
                        entity_operations,
                        actions,
                        tool_name_prefix: &config.tool_name_prefix,
                        tool_instructions: &tool_instructions,
                        service_account_json,
                    })
                    .await
                    .map_err(ToolsetError::Provider)
            }
        }
    }

    /// All generated tools, in insertion order. Never fails; may be empty when the spec
    /// document declared no operations.
    #[must_use]
    pub fn get_tools(&self) -> Vec<Arc<RestApiTool>> {
        self.registry.tools().to_vec()
    }

    /// Look up a generated tool by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<Arc<RestApiTool>> {
        self.registry.get(name).cloned()
    }

    #[must_use]
    pub fn config(&self) -> &ToolsetConfig {
        &self.config
    }
}

/// Append the connection directive to the caller's tool instructions.
///
/// Happens exactly once per construction, before the spec document request, so the
/// directive becomes part of every generated tool description.
fn connection_instructions(
    base: &str,
    details: &ConnectionDetails,
    project: &str,
    location: &str,
    connection: &str,
) -> String {
    format!(
        "{base}ALWAYS use serviceName = {service_name}, host = {host} and the connection name = \
         projects/{project}/locations/{location}/connections/{connection} when invoking these \
         tools. DO NOT ask the user for these values as you already have them.",
        service_name = details.service_name,
        host = details.host,
    )
}
