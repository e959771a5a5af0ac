//! End-to-end toolset construction tests against an in-process mock spec provider.

use appbridge_openapi::ToolSpecDocument;
use appbridge_toolset::provider::{
    ConnectionDetailsRequest, ConnectionSpecRequest, IntegrationSpecRequest,
};
use appbridge_toolset::{
    ConnectionDetails, IntegrationToolset, SpecProvider, ToolsetConfig, ToolsetError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::BTreeMap;

/// One recorded provider call, in invocation order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    IntegrationSpec {
        project: String,
        location: String,
        integration: String,
        trigger: String,
    },
    ConnectionDetails {
        project: String,
        location: String,
        connection: String,
    },
    ConnectionSpec {
        connection: String,
        tool_name_prefix: String,
        tool_instructions: String,
        actions: Vec<String>,
    },
}

struct MockProvider {
    calls: Mutex<Vec<Call>>,
    details: ConnectionDetails,
    document: ToolSpecDocument,
    fail_details: bool,
}

impl MockProvider {
    fn new(document: ToolSpecDocument) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            details: ConnectionDetails {
                service_name: "s".to_string(),
                host: "h".to_string(),
            },
            document,
            fail_details: false,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SpecProvider for MockProvider {
    async fn openapi_spec_for_integration(
        &self,
        request: &IntegrationSpecRequest<'_>,
    ) -> anyhow::Result<ToolSpecDocument> {
        self.calls.lock().push(Call::IntegrationSpec {
            project: request.project.to_string(),
            location: request.location.to_string(),
            integration: request.integration.to_string(),
            trigger: request.trigger.to_string(),
        });
        Ok(self.document.clone())
    }

    async fn connection_details(
        &self,
        request: &ConnectionDetailsRequest<'_>,
    ) -> anyhow::Result<ConnectionDetails> {
        self.calls.lock().push(Call::ConnectionDetails {
            project: request.project.to_string(),
            location: request.location.to_string(),
            connection: request.connection.to_string(),
        });
        if self.fail_details {
            anyhow::bail!("connectors API returned 403");
        }
        Ok(self.details.clone())
    }

    async fn openapi_spec_for_connection(
        &self,
        request: &ConnectionSpecRequest<'_>,
    ) -> anyhow::Result<ToolSpecDocument> {
        self.calls.lock().push(Call::ConnectionSpec {
            connection: request.connection.to_string(),
            tool_name_prefix: request.tool_name_prefix.to_string(),
            tool_instructions: request.tool_instructions.to_string(),
            actions: request.actions.to_vec(),
        });
        Ok(self.document.clone())
    }
}

/// A spec document with the given POST operation ids, in order.
fn document_with_operations(names: &[&str]) -> ToolSpecDocument {
    let mut paths = serde_json::Map::new();
    for name in names {
        paths.insert(
            format!("/ops/{name}"),
            json!({
                "post": {
                    "operationId": name,
                    "responses": { "200": { "description": "ok" } }
                }
            }),
        );
    }
    ToolSpecDocument::new(json!({
        "openapi": "3.0.0",
        "info": { "title": "generated", "version": "1.0.0" },
        "paths": paths,
    }))
}

fn integration_config() -> ToolsetConfig {
    ToolsetConfig {
        project: "p".to_string(),
        location: "us-central1".to_string(),
        integration: Some("orders".to_string()),
        trigger: Some("api_trigger/orders".to_string()),
        ..ToolsetConfig::default()
    }
}

fn connection_config() -> ToolsetConfig {
    ToolsetConfig {
        project: "p".to_string(),
        location: "us-central1".to_string(),
        connection: Some("c".to_string()),
        actions: Some(vec!["a1".to_string()]),
        ..ToolsetConfig::default()
    }
}

#[tokio::test]
async fn invalid_config_fails_without_any_provider_call() {
    let provider = MockProvider::new(document_with_operations(&[]));
    let config = ToolsetConfig {
        project: "p".to_string(),
        location: "us-central1".to_string(),
        integration: Some("orders".to_string()),
        // no trigger, no connection
        ..ToolsetConfig::default()
    };

    let err = IntegrationToolset::new(config, &provider).await.unwrap_err();
    assert!(matches!(err, ToolsetError::Config(_)));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn integration_mode_makes_exactly_one_spec_call() {
    let provider = MockProvider::new(document_with_operations(&["runOrders"]));
    let toolset = IntegrationToolset::new(integration_config(), &provider)
        .await
        .unwrap();

    assert_eq!(
        provider.calls(),
        [Call::IntegrationSpec {
            project: "p".to_string(),
            location: "us-central1".to_string(),
            integration: "orders".to_string(),
            trigger: "api_trigger/orders".to_string(),
        }]
    );
    assert_eq!(toolset.get_tools().len(), 1);
    assert_eq!(toolset.get_tools()[0].name, "runOrders");
}

#[tokio::test]
async fn connection_mode_fetches_details_before_spec_and_augments_instructions() {
    let provider = MockProvider::new(document_with_operations(&["op1", "op2"]));
    let toolset = IntegrationToolset::new(connection_config(), &provider)
        .await
        .unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        Call::ConnectionDetails {
            project: "p".to_string(),
            location: "us-central1".to_string(),
            connection: "c".to_string(),
        }
    );
    let Call::ConnectionSpec {
        connection,
        tool_instructions,
        actions,
        ..
    } = &calls[1]
    else {
        panic!("expected a connection spec call, got {:?}", calls[1]);
    };
    assert_eq!(connection, "c");
    assert_eq!(actions, &["a1".to_string()]);
    assert!(tool_instructions.contains("serviceName = s"));
    assert!(tool_instructions.contains("host = h"));
    assert!(tool_instructions.contains("projects/p/locations/us-central1/connections/c"));

    let names: Vec<String> = toolset
        .get_tools()
        .iter()
        .map(|t| t.name.clone())
        .collect();
    assert_eq!(names, ["op1", "op2"]);
}

#[tokio::test]
async fn caller_instructions_prefix_the_connection_directive() {
    let provider = MockProvider::new(document_with_operations(&["op1"]));
    let config = ToolsetConfig {
        tool_instructions: "Prefer bulk operations. ".to_string(),
        ..connection_config()
    };
    IntegrationToolset::new(config, &provider).await.unwrap();

    let calls = provider.calls();
    let Call::ConnectionSpec {
        tool_instructions, ..
    } = &calls[1]
    else {
        panic!("expected a connection spec call");
    };
    assert!(tool_instructions.starts_with("Prefer bulk operations. ALWAYS use serviceName = s"));
}

#[tokio::test]
async fn duplicate_tool_names_are_last_write_wins() {
    let doc = ToolSpecDocument::new(json!({
        "openapi": "3.0.0",
        "info": { "title": "dupes", "version": "1.0.0" },
        "paths": {
            "/first": {
                "post": {
                    "operationId": "op",
                    "summary": "first definition",
                    "responses": { "200": { "description": "ok" } }
                }
            },
            "/second": {
                "post": {
                    "operationId": "op",
                    "summary": "second definition",
                    "responses": { "200": { "description": "ok" } }
                }
            },
            "/other": {
                "post": {
                    "operationId": "other",
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    }));
    let provider = MockProvider::new(doc);
    let toolset = IntegrationToolset::new(integration_config(), &provider)
        .await
        .unwrap();

    let tools = toolset.get_tools();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].name, "op");
    assert_eq!(tools[0].description, "second definition");
    assert_eq!(tools[1].name, "other");
}

#[tokio::test]
async fn get_tools_is_idempotent() {
    let provider = MockProvider::new(document_with_operations(&["op1", "op2"]));
    let toolset = IntegrationToolset::new(connection_config(), &provider)
        .await
        .unwrap();

    let first = toolset.get_tools();
    let second = toolset.get_tools();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn empty_spec_document_yields_an_empty_toolset() {
    let provider = MockProvider::new(document_with_operations(&[]));
    let toolset = IntegrationToolset::new(integration_config(), &provider)
        .await
        .unwrap();
    assert!(toolset.get_tools().is_empty());
}

#[tokio::test]
async fn provider_failure_aborts_construction() {
    let mut provider = MockProvider::new(document_with_operations(&["op1"]));
    provider.fail_details = true;

    let err = IntegrationToolset::new(connection_config(), &provider)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolsetError::Provider(_)));
    assert!(err.to_string().contains("spec provider error"));
    // Details call happened, but the spec call never did.
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn malformed_service_account_json_aborts_construction() {
    let provider = MockProvider::new(document_with_operations(&["op1"]));
    let config = ToolsetConfig {
        service_account_json: Some("{broken".to_string()),
        ..integration_config()
    };

    let err = IntegrationToolset::new(config, &provider).await.unwrap_err();
    assert!(matches!(err, ToolsetError::CredentialParse(_)));
}

#[tokio::test]
async fn entity_operations_reach_the_provider() {
    let provider = MockProvider::new(document_with_operations(&["list_issues"]));
    let mut entity_operations = BTreeMap::new();
    entity_operations.insert("Issue".to_string(), vec!["LIST".to_string()]);
    let config = ToolsetConfig {
        project: "p".to_string(),
        location: "us-central1".to_string(),
        connection: Some("tracker".to_string()),
        entity_operations: Some(entity_operations),
        ..ToolsetConfig::default()
    };

    let toolset = IntegrationToolset::new(config, &provider).await.unwrap();
    assert_eq!(toolset.get_tools().len(), 1);
    assert_eq!(provider.calls().len(), 2);
}
