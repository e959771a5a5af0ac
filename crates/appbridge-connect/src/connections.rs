//! Integration Connectors control-plane client and connection-mode spec synthesis.

use crate::error::{ConnectError, Result};
use crate::token::TokenSource;
use appbridge_openapi::ToolSpecDocument;
use appbridge_toolset::provider::{ConnectionDetails, ConnectionSpecRequest};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Entity operations generated when a configured entity lists none explicitly.
const DEFAULT_ENTITY_OPERATIONS: [&str; 5] = ["LIST", "GET", "CREATE", "UPDATE", "DELETE"];

/// Client for the Integration Connectors API.
pub struct ConnectionsClient {
    http: Client,
    token: TokenSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionResource {
    #[serde(default)]
    service_directory: Option<String>,
    #[serde(default)]
    tls_service_directory: Option<String>,
    #[serde(default)]
    host: Option<String>,
}

impl ConnectionsClient {
    #[must_use]
    pub fn new(http: Client, token: TokenSource) -> Self {
        Self { http, token }
    }

    /// Fetch the connection resource and extract its service name and host.
    ///
    /// When the connection exposes a TLS host, the TLS service directory takes
    /// precedence over the plain one.
    ///
    /// # Errors
    ///
    /// Returns an error on token acquisition failure, a non-success control-plane
    /// status, or an undecodable response payload.
    pub async fn get_connection_details(
        &self,
        project: &str,
        location: &str,
        connection: &str,
    ) -> Result<ConnectionDetails> {
        let url = format!(
            "https://connectors.googleapis.com/v1/projects/{project}/locations/{location}/connections/{connection}?view=BASIC"
        );
        debug!(%url, connection, "fetching connection details");

        let token = self.token.access_token(&self.http).await?;
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ConnectError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectError::Status { url, status, body });
        }

        let resource: ConnectionResource =
            response.json().await.map_err(|e| ConnectError::Decode {
                url,
                message: e.to_string(),
            })?;
        Ok(details_from_resource(&resource))
    }
}

fn details_from_resource(resource: &ConnectionResource) -> ConnectionDetails {
    let host = resource.host.clone().unwrap_or_default();
    let service_name = if host.is_empty() {
        resource.service_directory.clone()
    } else {
        resource.tls_service_directory.clone()
    }
    .unwrap_or_default();
    ConnectionDetails { service_name, host }
}

/// Synthesize the connection-mode spec document.
///
/// One POST operation is emitted per requested entity operation and per action, all
/// targeting the `ExecuteConnection` integration. The tool-name prefix is applied to
/// every `operationId`, and the instruction text is baked into every description. An
/// entity configured with an empty operation list gets the default CRUD set.
#[must_use]
pub fn connection_spec(request: &ConnectionSpecRequest<'_>) -> ToolSpecDocument {
    let execute_path = format!(
        "/v2/projects/{}/locations/{}/integrations/ExecuteConnection:execute",
        request.project, request.location
    );
    let mut paths = Map::new();

    for (entity, operations) in request.entity_operations {
        let operations: Vec<&str> = if operations.is_empty() {
            DEFAULT_ENTITY_OPERATIONS.to_vec()
        } else {
            operations.iter().map(String::as_str).collect()
        };
        for operation in operations {
            let operation_id = format!(
                "{}{}_{}",
                request.tool_name_prefix,
                operation.to_lowercase(),
                entity.to_lowercase()
            );
            let description = format!(
                "Use this tool to {operation} entities of type {entity} on connection {}. {}",
                request.connection, request.tool_instructions
            );
            paths.insert(
                format!(
                    "{execute_path}?triggerId=api_trigger/ExecuteConnection&operation={operation}&entity={entity}"
                ),
                execute_operation(&operation_id, &description, entity_request_schema(operation)),
            );
        }
    }

    for action in request.actions {
        let operation_id = format!("{}{action}", request.tool_name_prefix);
        let description = format!(
            "Use this tool to run the {action} action on connection {}. {}",
            request.connection, request.tool_instructions
        );
        paths.insert(
            format!(
                "{execute_path}?triggerId=api_trigger/ExecuteConnection&action={action}"
            ),
            execute_operation(&operation_id, &description, action_request_schema()),
        );
    }

    ToolSpecDocument::new(json!({
        "openapi": "3.0.0",
        "info": {
            "title": format!("ExecuteConnection ({})", request.connection),
            "version": "1.0.0",
        },
        "servers": [{ "url": "https://integrations.googleapis.com" }],
        "paths": paths,
    }))
}

fn execute_operation(operation_id: &str, description: &str, request_schema: Value) -> Value {
    json!({
        "post": {
            "operationId": operation_id,
            "description": description,
            "requestBody": {
                "required": true,
                "content": { "application/json": { "schema": request_schema } }
            },
            "responses": {
                "200": {
                    "description": "Execution result.",
                    "content": {
                        "application/json": {
                            "schema": { "type": "object" }
                        }
                    }
                }
            }
        }
    })
}

fn entity_request_schema(operation: &str) -> Value {
    let mut properties = json!({
        "connectorInputPayload": {
            "type": "object",
            "description": "Payload for the entity operation.",
        },
        "serviceName": { "type": "string", "description": "Service directory name of the connection." },
        "host": { "type": "string", "description": "Host of the connection." },
        "entity": { "type": "string", "description": "Entity to operate on." },
        "operation": { "type": "string", "description": "Entity operation to run." },
        "connectionName": { "type": "string", "description": "Fully qualified connection resource name." },
    });
    let mut required = vec![
        "serviceName",
        "host",
        "entity",
        "operation",
        "connectionName",
    ];
    // Single-row operations address an entity instance by id.
    if matches!(operation, "GET" | "UPDATE" | "DELETE") {
        properties["entityId"] = json!({
            "type": "string",
            "description": "Id of the entity instance.",
        });
        required.push("entityId");
    }
    if matches!(operation, "LIST") {
        properties["filterClause"] = json!({
            "type": "string",
            "description": "Optional filter applied to the listing.",
        });
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn action_request_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "connectorInputPayload": {
                "type": "object",
                "description": "Payload for the action.",
            },
            "serviceName": { "type": "string", "description": "Service directory name of the connection." },
            "host": { "type": "string", "description": "Host of the connection." },
            "action": { "type": "string", "description": "Action to run." },
            "connectionName": { "type": "string", "description": "Fully qualified connection resource name." },
        },
        "required": ["serviceName", "host", "action", "connectionName"],
    })
}
