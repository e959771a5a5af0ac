//! Toolset configuration and resource selection.

use crate::error::{Result, ToolsetError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for a toolset built from an Application Integration or Integration
/// Connectors resource.
///
/// Exactly one of two resource selections must hold:
/// - `integration` + `trigger` (integration mode), or
/// - `connection` + non-empty `entity_operations` and/or `actions` (connection mode).
///
/// Anything else is rejected by [`ToolsetConfig::selector`] before any remote call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsetConfig {
    /// Cloud project id.
    pub project: String,

    /// Cloud location (e.g. `us-central1`).
    pub location: String,

    /// Integration name (integration mode).
    #[serde(default)]
    pub integration: Option<String>,

    /// Trigger id of the integration (integration mode).
    #[serde(default)]
    pub trigger: Option<String>,

    /// Connection name (connection mode).
    #[serde(default)]
    pub connection: Option<String>,

    /// Entity name -> ordered operation names (connection mode). An empty operation
    /// list means every operation supported on that entity.
    #[serde(default)]
    pub entity_operations: Option<BTreeMap<String, Vec<String>>>,

    /// Connection actions outside the entity-operation model (connection mode).
    #[serde(default)]
    pub actions: Option<Vec<String>>,

    /// Prefix prepended to generated tool names.
    #[serde(default)]
    pub tool_name_prefix: String,

    /// Suffix appended to every generated tool description.
    #[serde(default)]
    pub tool_instructions: String,

    /// Service account key JSON used both for control-plane calls and as the credential
    /// attached to generated tools. When absent, the ambient application-default
    /// credential is used.
    #[serde(default)]
    pub service_account_json: Option<String>,
}

/// Which resource a toolset is built from, resolved exactly once during validation.
///
/// Downstream code matches on this and can never observe an invalid third state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSelector {
    /// An integration + trigger pair.
    Integration { integration: String, trigger: String },
    /// A connection with entity operations and/or actions.
    Connection {
        connection: String,
        entity_operations: BTreeMap<String, Vec<String>>,
        actions: Vec<String>,
    },
}

impl ToolsetConfig {
    /// Validate the configuration into a [`ResourceSelector`].
    ///
    /// # Errors
    ///
    /// Returns [`ToolsetError::Config`] if neither selection holds.
    pub fn selector(&self) -> Result<ResourceSelector> {
        if let (Some(integration), Some(trigger)) = (&self.integration, &self.trigger) {
            return Ok(ResourceSelector::Integration {
                integration: integration.clone(),
                trigger: trigger.clone(),
            });
        }

        if let Some(connection) = &self.connection {
            let entity_operations = self.entity_operations.clone().unwrap_or_default();
            let actions = self.actions.clone().unwrap_or_default();
            if !entity_operations.is_empty() || !actions.is_empty() {
                return Ok(ResourceSelector::Connection {
                    connection: connection.clone(),
                    entity_operations,
                    actions,
                });
            }
        }

        Err(ToolsetError::Config(
            "either (integration and trigger) or (connection and (entity_operations or \
             actions)) must be provided"
                .to_string(),
        ))
    }
}
