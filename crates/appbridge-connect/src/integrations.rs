//! Application Integration control-plane client.

use crate::error::{ConnectError, Result};
use crate::token::TokenSource;
use appbridge_openapi::ToolSpecDocument;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Client for the Application Integration API.
///
/// Generates the OpenAPI spec document for an integration/trigger pair via the regional
/// `:generateOpenApiSpec` endpoint.
pub struct IntegrationClient {
    http: Client,
    token: TokenSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateSpecResponse {
    open_api_spec: String,
}

impl IntegrationClient {
    #[must_use]
    pub fn new(http: Client, token: TokenSource) -> Self {
        Self { http, token }
    }

    /// Generate the OpenAPI spec for `integration`'s `trigger`.
    ///
    /// # Errors
    ///
    /// Returns an error on token acquisition failure, a non-success control-plane
    /// status, or an undecodable response payload.
    pub async fn generate_openapi_spec(
        &self,
        project: &str,
        location: &str,
        integration: &str,
        trigger: &str,
    ) -> Result<ToolSpecDocument> {
        let url = format!(
            "https://{location}-integrations.googleapis.com/v1/projects/{project}/locations/{location}:generateOpenApiSpec"
        );
        let body = json!({
            "apiTriggerResources": [{
                "integrationResource": integration,
                "triggerId": [trigger],
            }],
            "fileFormat": "JSON",
        });
        debug!(%url, integration, trigger, "requesting generated OpenAPI spec");

        let token = self.token.access_token(&self.http).await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
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

        let payload: GenerateSpecResponse =
            response.json().await.map_err(|e| ConnectError::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?;

        // The API returns the spec as a JSON string inside the JSON response.
        ToolSpecDocument::from_json(&payload.open_api_spec).map_err(|e| ConnectError::Decode {
            url,
            message: format!("openApiSpec payload is not valid JSON: {e}"),
        })
    }
}
