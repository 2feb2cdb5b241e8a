// crates/access-gate-client/src/http.rs
// ============================================================================
// Module: HTTP Identity Client
// Description: reqwest-backed client for the identity and refresh endpoints.
// Purpose: Perform bounded outbound calls with strict failure classification.
// Dependencies: access-gate-core, reqwest, url
// ============================================================================

//! ## Overview
//! The client issues at most one bounded GET per call, forwarding the
//! deduplicated cookie header the resolver built. The hard timeout applies
//! to the full request lifecycle; when it fires the call classifies as
//! [`IdentityCallError::Timeout`], never as an authentication failure.
//! Redirects are disabled so an auth endpoint can never bounce the gate to
//! an attacker-chosen location.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use access_gate_core::IdentityCallError;
use access_gate_core::IdentityClient;
use access_gate_core::IdentityProfile;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Endpoint configuration for the identity backend.
///
/// # Invariants
/// - `base_url` is http/https without embedded credentials.
/// - `timeout_ms` bounds the full request lifecycle of every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEndpoints {
    /// Backend base URL.
    pub base_url: String,
    /// Identity ("who am I") endpoint path.
    pub identity_path: String,
    /// Refresh-token endpoint path.
    pub refresh_path: String,
    /// Hard timeout in milliseconds for each outbound call.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for IdentityEndpoints {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            identity_path: "/user/me".to_string(),
            refresh_path: "/user/refresh-token".to_string(),
            timeout_ms: 5_000,
            user_agent: "access-gate/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client construction errors.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The base URL failed validation.
    #[error("invalid endpoint base url: {0}")]
    InvalidBaseUrl(String),
    /// The underlying HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Production identity client over HTTP.
pub struct HttpIdentityClient {
    /// Endpoint configuration.
    endpoints: IdentityEndpoints,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpIdentityClient {
    /// Creates a client from validated endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError`] when the base URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(endpoints: IdentityEndpoints) -> Result<Self, HttpClientError> {
        validate_base_url(&endpoints.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(endpoints.timeout_ms))
            .user_agent(endpoints.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| HttpClientError::Build(err.to_string()))?;
        Ok(Self {
            endpoints,
            client,
        })
    }

    /// Returns the configured endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &IdentityEndpoints {
        &self.endpoints
    }

    /// Issues one bounded GET with the forwarded cookie header.
    async fn get(&self, path: &str, cookie_header: &str) -> Result<Response, IdentityCallError> {
        let url = join_endpoint(&self.endpoints.base_url, path);
        let response = self
            .client
            .get(url)
            .header(COOKIE, cookie_header)
            .send()
            .await
            .map_err(classify_send_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(IdentityCallError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn fetch_identity(
        &self,
        cookie_header: &str,
    ) -> Result<IdentityProfile, IdentityCallError> {
        let response = self.get(&self.endpoints.identity_path, cookie_header).await?;
        response.json::<IdentityProfile>().await.map_err(|err| {
            if err.is_timeout() {
                IdentityCallError::Timeout
            } else {
                IdentityCallError::Decode(err.to_string())
            }
        })
    }

    async fn refresh(&self, cookie_header: &str) -> Result<Vec<String>, IdentityCallError> {
        let response = self.get(&self.endpoints.refresh_path, cookie_header).await?;
        let headers = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        Ok(headers)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Classifies a reqwest send error into the gate's taxonomy.
///
/// Timeouts are explicit; every other transport failure carries its message
/// for the trace to classify by signature. No thrown error ever maps to a
/// status-class failure.
fn classify_send_error(err: reqwest::Error) -> IdentityCallError {
    if err.is_timeout() {
        IdentityCallError::Timeout
    } else {
        IdentityCallError::Network(err.to_string())
    }
}

/// Validates the backend base URL.
fn validate_base_url(base_url: &str) -> Result<(), HttpClientError> {
    let url = Url::parse(base_url)
        .map_err(|err| HttpClientError::InvalidBaseUrl(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(HttpClientError::InvalidBaseUrl(format!("unsupported scheme: {other}")));
        }
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(HttpClientError::InvalidBaseUrl("credentials are not allowed".to_string()));
    }
    Ok(())
}

/// Joins the base URL and an endpoint path without doubled slashes.
fn join_endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}
