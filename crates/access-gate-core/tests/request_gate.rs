// crates/access-gate-core/tests/request_gate.rs
// ============================================================================
// Module: Request Gate Tests
// Description: End-to-end scenarios through the gate facade.
// ============================================================================
//! ## Overview
//! Drives the complete pipeline (classification, resolution, routing) with
//! scripted backends, covering the canonical scenarios and the idempotence
//! property: same inputs and backend answers, same decision.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap on deterministic fixtures."
)]

mod common;

use access_gate_core::GateRequest;
use access_gate_core::IdentityCallError;
use access_gate_core::PathPolicy;
use access_gate_core::RequestGate;
use access_gate_core::Role;
use access_gate_core::RoutingDecision;
use access_gate_core::SessionInfo;

use crate::common::ScriptedCall;
use crate::common::ScriptedClient;
use crate::common::complete_student;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs one request through a gate over the given script.
async fn decide(script: Vec<ScriptedCall>, request: &GateRequest) -> RoutingDecision {
    let gate = RequestGate::new(ScriptedClient::new(script), PathPolicy::default());
    let (decision, _) = gate.decide(request).await;
    decision
}

// ============================================================================
// SECTION: Canonical Scenarios
// ============================================================================

#[tokio::test]
async fn test_no_credentials_on_protected_redirects_to_login() {
    let request = GateRequest {
        path: "/dashboard/instructor/agencies".to_string(),
        ..GateRequest::default()
    };
    let decision = decide(Vec::new(), &request).await;
    assert_eq!(
        decision.location().unwrap(),
        "/login/instructor?redirect=%2Fdashboard%2Finstructor%2Fagencies"
    );
}

#[tokio::test]
async fn test_incomplete_profile_redirects_to_onboarding() {
    let mut profile = complete_student();
    profile.age = None;
    let request = GateRequest {
        path: "/dashboard/student".to_string(),
        cookie_header: Some("access_token=at".to_string()),
        ..GateRequest::default()
    };
    let decision = decide(vec![ScriptedCall::Identity(Ok(profile))], &request).await;
    assert_eq!(decision.location().unwrap(), "/onboarding/student");
}

#[tokio::test]
async fn test_session_user_on_login_redirects_to_dashboard() {
    let request = GateRequest {
        path: "/login/student".to_string(),
        session: Some(SessionInfo {
            role: Some(Role::Student),
            needs_onboarding: false,
        }),
        ..GateRequest::default()
    };
    let decision = decide(Vec::new(), &request).await;
    assert_eq!(decision.location().unwrap(), "/dashboard/student");
}

#[tokio::test]
async fn test_identity_timeout_continues_with_cookies_intact() {
    let request = GateRequest {
        path: "/dashboard/student".to_string(),
        cookie_header: Some("access_token=at; refresh_token=rt".to_string()),
        ..GateRequest::default()
    };
    let decision =
        decide(vec![ScriptedCall::Identity(Err(IdentityCallError::Timeout))], &request).await;
    assert!(decision.is_continue());
    assert!(decision.clear_cookies.is_empty());
}

#[tokio::test]
async fn test_invitation_path_skips_resolution_entirely() {
    let request = GateRequest {
        path: "/invitation/signed-token".to_string(),
        cookie_header: Some("access_token=at".to_string()),
        ..GateRequest::default()
    };
    // An empty script proves no remote call happens.
    let decision = decide(Vec::new(), &request).await;
    assert!(decision.is_continue());
}

#[tokio::test]
async fn test_fresh_login_referer_grants_leniency_on_401() {
    let request = GateRequest {
        path: "/dashboard/student".to_string(),
        cookie_header: Some("access_token=at; refresh_token=rt".to_string()),
        referer: Some("https://app.example.com/login/student".to_string()),
        ..GateRequest::default()
    };
    let decision =
        decide(vec![ScriptedCall::Identity(Err(IdentityCallError::Status(401)))], &request).await;
    assert!(decision.is_continue());
    assert!(decision.clear_cookies.is_empty());
}

#[tokio::test]
async fn test_conclusive_401_deletes_cookies_and_redirects() {
    let request = GateRequest {
        path: "/dashboard/student".to_string(),
        cookie_header: Some("access_token=at".to_string()),
        ..GateRequest::default()
    };
    let decision =
        decide(vec![ScriptedCall::Identity(Err(IdentityCallError::Status(401)))], &request).await;
    assert_eq!(decision.location().unwrap(), "/login/student?redirect=%2Fdashboard%2Fstudent");
    assert_eq!(decision.clear_cookies, vec!["access_token", "refresh_token"]);
}

// ============================================================================
// SECTION: Idempotence
// ============================================================================

#[tokio::test]
async fn test_same_inputs_same_decision() {
    let request = GateRequest {
        path: "/dashboard/student/reports".to_string(),
        cookie_header: Some("access_token=at; refresh_token=rt".to_string()),
        ..GateRequest::default()
    };
    let first =
        decide(vec![ScriptedCall::Identity(Ok(complete_student()))], &request).await;
    let second =
        decide(vec![ScriptedCall::Identity(Ok(complete_student()))], &request).await;
    assert_eq!(first, second);
    assert!(first.is_continue());
}
