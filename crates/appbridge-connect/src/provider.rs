//! HTTP implementation of the toolset core's `SpecProvider` seam.

use crate::connections::{connection_spec, ConnectionsClient};
use crate::integrations::IntegrationClient;
use crate::token::TokenSource;
use appbridge_openapi::ToolSpecDocument;
use appbridge_toolset::provider::{
    ConnectionDetails, ConnectionDetailsRequest, ConnectionSpecRequest, IntegrationSpecRequest,
    SpecProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Spec provider backed by the Application Integration and Integration Connectors
/// control planes.
///
/// The token source is derived per call from the request's service account JSON, so one
/// provider instance can serve toolsets with different credentials.
pub struct HttpSpecProvider {
    http: Client,
}

impl HttpSpecProvider {
    /// Build a provider with a default 30s request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new() -> crate::Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|source| crate::ConnectError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { http })
    }

    #[must_use]
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SpecProvider for HttpSpecProvider {
    async fn openapi_spec_for_integration(
        &self,
        request: &IntegrationSpecRequest<'_>,
    ) -> anyhow::Result<ToolSpecDocument> {
        let token = TokenSource::from_service_account_json(request.service_account_json)?;
        let client = IntegrationClient::new(self.http.clone(), token);
        Ok(client
            .generate_openapi_spec(
                request.project,
                request.location,
                request.integration,
                request.trigger,
            )
            .await?)
    }

    async fn connection_details(
        &self,
        request: &ConnectionDetailsRequest<'_>,
    ) -> anyhow::Result<ConnectionDetails> {
        let token = TokenSource::from_service_account_json(request.service_account_json)?;
        let client = ConnectionsClient::new(self.http.clone(), token);
        Ok(client
            .get_connection_details(request.project, request.location, request.connection)
            .await?)
    }

    async fn openapi_spec_for_connection(
        &self,
        request: &ConnectionSpecRequest<'_>,
    ) -> anyhow::Result<ToolSpecDocument> {
        // The connection-mode document is synthesized locally; the control plane was
        // already consulted for connection details.
        Ok(connection_spec(request))
    }
}
