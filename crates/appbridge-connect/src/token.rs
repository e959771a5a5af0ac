//! Bearer-token acquisition for control-plane calls.

use crate::error::{ConnectError, Result};
use appbridge_openapi::auth::CLOUD_PLATFORM_SCOPE;
use appbridge_openapi::ServiceAccountKey;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const METADATA_TOKEN_URL: &str = "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Where control-plane access tokens come from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// A caller-supplied token, passed through as-is.
    Static(String),
    /// The ambient application-default credential, via the metadata server.
    MetadataServer,
    /// A service account key, exchanged through the OAuth JWT-bearer grant.
    ServiceAccount(ServiceAccountKey),
}

impl TokenSource {
    /// Build a source from an optional service account key JSON: key present means the
    /// JWT-bearer grant, absent means the ambient metadata-server credential.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Credential`] if the key JSON is malformed.
    pub fn from_service_account_json(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(raw) => {
                let key: ServiceAccountKey =
                    serde_json::from_str(raw).map_err(ConnectError::Credential)?;
                Ok(TokenSource::ServiceAccount(key))
            }
            None => Ok(TokenSource::MetadataServer),
        }
    }

    /// Obtain a bearer access token scoped to `cloud-platform`.
    ///
    /// # Errors
    ///
    /// Returns an error if signing, the token exchange, or the metadata-server fetch
    /// fails.
    pub async fn access_token(&self, http: &Client) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::MetadataServer => fetch_metadata_token(http).await,
            TokenSource::ServiceAccount(key) => exchange_service_account(http, key).await,
        }
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Build the signed JWT assertion for the OAuth JWT-bearer grant.
fn signed_assertion(key: &ServiceAccountKey, now: u64) -> Result<String> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: CLOUD_PLATFORM_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}

async fn exchange_service_account(http: &Client, key: &ServiceAccountKey) -> Result<String> {
    let assertion = signed_assertion(key, unix_now())?;
    debug!(token_uri = %key.token_uri, "exchanging service account assertion");

    let response = http
        .post(&key.token_uri)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await
        .map_err(|source| ConnectError::Http {
            url: key.token_uri.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ConnectError::Token(format!(
            "{} returned {status}: {body}",
            key.token_uri
        )));
    }

    let token: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| ConnectError::Decode {
                url: key.token_uri.clone(),
                message: e.to_string(),
            })?;
    Ok(token.access_token)
}

async fn fetch_metadata_token(http: &Client) -> Result<String> {
    let url = format!("{METADATA_TOKEN_URL}?scopes={CLOUD_PLATFORM_SCOPE}");
    let response = http
        .get(&url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|source| ConnectError::Http {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ConnectError::Token(format!(
            "metadata server returned {status}: {body}"
        )));
    }

    let token: TokenResponse = response.json().await.map_err(|e| ConnectError::Decode {
        url,
        message: e.to_string(),
    })?;
    Ok(token.access_token)
}
