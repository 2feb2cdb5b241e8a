// crates/access-gate-middleware/src/layer.rs
// ============================================================================
// Module: Gate Middleware Layer
// Description: Axum middleware applying the gate to in-scope requests.
// Purpose: Dissect requests, run the gate, and render its decision as HTTP.
// Dependencies: access-gate-client, access-gate-config, access-gate-core, axum
// ============================================================================

//! ## Overview
//! [`authorize`] is an `axum::middleware::from_fn_with_state` function. Paths
//! outside the configured matcher scope pass through untouched, with no
//! credential work and no audit event. In-scope requests are dissected into a
//! [`GateRequest`], decided by the shared [`RequestGate`], audited, and then
//! either forwarded to the inner service or answered with a 307 redirect.
//! Cookie deletions ride on the outgoing response as expiring `Set-Cookie`
//! headers and appear only on conclusive authentication failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use access_gate_client::HttpClientError;
use access_gate_client::HttpIdentityClient;
use access_gate_config::GateConfig;
use access_gate_core::GateRequest;
use access_gate_core::RequestGate;
use access_gate_core::RoutingDecision;
use access_gate_core::SessionInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::audit::GateAuditEvent;
use crate::audit::sink_for;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors constructing the middleware state.
#[derive(Debug, Error)]
pub enum GateSetupError {
    /// The identity client rejected the endpoint configuration.
    #[error(transparent)]
    Client(#[from] HttpClientError),
    /// The audit sink could not be opened.
    #[error("failed to open audit sink: {0}")]
    Audit(#[from] std::io::Error),
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared middleware state, cheap to clone per request.
#[derive(Clone)]
pub struct GateState {
    /// The request gate shared across requests.
    gate: Arc<RequestGate<HttpIdentityClient>>,
    /// Audit sink for decision events.
    audit: Arc<dyn AuditSink>,
}

impl GateState {
    /// Builds middleware state from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GateSetupError`] when the HTTP client or audit sink cannot
    /// be constructed.
    pub fn from_config(config: &GateConfig) -> Result<Self, GateSetupError> {
        let client = HttpIdentityClient::new(config.endpoints.clone())?;
        let audit = sink_for(&config.audit)?;
        Ok(Self {
            gate: Arc::new(RequestGate::new(client, config.paths.clone())),
            audit,
        })
    }

    /// Builds state from an existing gate and sink, used by tests and hosts
    /// that wire their own client.
    #[must_use]
    pub fn new(gate: Arc<RequestGate<HttpIdentityClient>>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            gate,
            audit,
        }
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Decides one request and renders the outcome.
///
/// Host applications that resolve their own session should insert a
/// [`SessionInfo`] into the request extensions before this layer runs; the
/// gate then honors it ahead of any cookie work.
pub async fn authorize(State(state): State<GateState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !state.gate.policy().in_scope(&path) {
        return next.run(request).await;
    }

    let gate_request = GateRequest {
        path: path.clone(),
        cookie_header: joined_cookie_header(request.headers()),
        referer: header_text(request.headers(), &header::REFERER),
        session: request.extensions().get::<SessionInfo>().cloned(),
    };
    let (decision, trace) = state.gate.decide(&gate_request).await;
    state.audit.record(&GateAuditEvent::new(&path, &decision, &trace));
    respond(decision, request, next).await
}

/// Renders a decision as the outgoing response.
async fn respond(decision: RoutingDecision, request: Request, next: Next) -> Response {
    match decision.location() {
        None => {
            let mut response = next.run(request).await;
            append_cookie_deletions(response.headers_mut(), &decision.clear_cookies);
            response
        }
        Some(location) => {
            let Ok(value) = HeaderValue::from_str(&location) else {
                // Targets are policy-owned paths plus percent-encoded query
                // values, so this is unreachable in practice. Fail closed.
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            };
            let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            append_cookie_deletions(response.headers_mut(), &decision.clear_cookies);
            response
        }
    }
}

// ============================================================================
// SECTION: Header Helpers
// ============================================================================

/// Joins repeated `Cookie` headers with `"; "`, the form the parser expects.
fn joined_cookie_header(headers: &HeaderMap) -> Option<String> {
    let parts: Vec<&str> =
        headers.get_all(header::COOKIE).iter().filter_map(|value| value.to_str().ok()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

/// Reads a header as text, dropping non-UTF-8 values.
fn header_text(headers: &HeaderMap, name: &header::HeaderName) -> Option<String> {
    headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_string)
}

/// Appends one expiring `Set-Cookie` header per cleared cookie.
fn append_cookie_deletions(headers: &mut HeaderMap, names: &[&'static str]) {
    for name in names {
        if let Ok(value) = HeaderValue::from_str(&format!("{name}=; Max-Age=0; Path=/; HttpOnly")) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}
