// crates/access-gate-core/tests/resolver.rs
// ============================================================================
// Module: Identity Resolver Tests
// Description: Tests for the resolution state machine over scripted backends.
// ============================================================================
//! ## Overview
//! Exercises every row of the failure-classification table: indeterminate
//! outcomes on transient failures, conclusive invalidation only on explicit
//! 401/403, the one-shot refresh with depth-1 re-check, and the fresh-login
//! leniency window.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap on deterministic fixtures."
)]

mod common;

use access_gate_core::AuthResolution;
use access_gate_core::CredentialBundle;
use access_gate_core::GateResolver;
use access_gate_core::GateTrace;
use access_gate_core::IdentityCallError;
use access_gate_core::IndeterminateCause;
use access_gate_core::RequestCookies;
use access_gate_core::Role;
use access_gate_core::SessionInfo;

use crate::common::ScriptedCall;
use crate::common::ScriptedClient;
use crate::common::complete_student;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Bundle with both tokens and no session.
fn both_tokens() -> CredentialBundle {
    CredentialBundle::new(RequestCookies::parse("access_token=at; refresh_token=rt"), None)
}

/// Bundle with only an access token.
fn access_only() -> CredentialBundle {
    CredentialBundle::new(RequestCookies::parse("access_token=at"), None)
}

/// Runs the resolver over a script, returning the outcome and trace.
async fn resolve(
    script: Vec<ScriptedCall>,
    bundle: &CredentialBundle,
    fresh_login: bool,
) -> (AuthResolution, GateTrace, ScriptedClient) {
    let client = ScriptedClient::new(script);
    let resolver = GateResolver::new(&client);
    let mut trace = GateTrace::default();
    let resolution = resolver.resolve(bundle, fresh_login, &mut trace).await;
    drop(resolver);
    (resolution, trace, client)
}

// ============================================================================
// SECTION: Session Short-Circuit
// ============================================================================

#[tokio::test]
async fn test_session_skips_remote_calls() {
    let bundle = CredentialBundle::new(
        RequestCookies::parse("access_token=at"),
        Some(SessionInfo {
            role: Some(Role::Instructor),
            needs_onboarding: false,
        }),
    );
    let (resolution, trace, client) = resolve(Vec::new(), &bundle, false).await;
    assert!(resolution.is_authenticated());
    assert!(trace.contains("session_identity"));
    assert!(client.headers().is_empty());
}

#[tokio::test]
async fn test_no_credentials_is_anonymous() {
    let bundle = CredentialBundle::new(RequestCookies::parse("theme=dark"), None);
    let (resolution, _, client) = resolve(Vec::new(), &bundle, false).await;
    assert_eq!(resolution, AuthResolution::Anonymous);
    assert!(client.headers().is_empty());
}

// ============================================================================
// SECTION: Indeterminate Outcomes (No False Logout)
// ============================================================================

#[tokio::test]
async fn test_identity_timeout_is_indeterminate() {
    let script = vec![ScriptedCall::Identity(Err(IdentityCallError::Timeout))];
    let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::Timeout));
}

#[tokio::test]
async fn test_identity_network_failure_is_indeterminate() {
    let script =
        vec![ScriptedCall::Identity(Err(IdentityCallError::Network("connection refused".into())))];
    let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::Network));
}

#[tokio::test]
async fn test_identity_server_error_is_indeterminate() {
    for status in [500_u16, 502, 503] {
        let script = vec![ScriptedCall::Identity(Err(IdentityCallError::Status(status)))];
        let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
        assert_eq!(
            resolution,
            AuthResolution::Indeterminate(IndeterminateCause::ServerError(status))
        );
    }
}

#[tokio::test]
async fn test_identity_unexpected_status_is_indeterminate() {
    // Non-401 client errors are not auth signals either.
    let script = vec![ScriptedCall::Identity(Err(IdentityCallError::Status(404)))];
    let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::ServerError(404)));
}

#[tokio::test]
async fn test_identity_malformed_body_is_indeterminate() {
    let script =
        vec![ScriptedCall::Identity(Err(IdentityCallError::Decode("expected value".into())))];
    let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::MalformedBody));
}

// ============================================================================
// SECTION: Conclusive Invalidation
// ============================================================================

#[tokio::test]
async fn test_401_without_refresh_token_is_conclusive() {
    let script = vec![ScriptedCall::Identity(Err(IdentityCallError::Status(401)))];
    let (resolution, trace, client) = resolve(script, &access_only(), false).await;
    assert_eq!(resolution, AuthResolution::ConclusiveInvalid);
    assert!(trace.contains("conclusive_invalid"));
    // No refresh call was made.
    assert_eq!(client.headers().len(), 1);
}

#[tokio::test]
async fn test_401_with_fresh_login_is_lenient() {
    let script = vec![ScriptedCall::Identity(Err(IdentityCallError::Status(401)))];
    let (resolution, trace, client) = resolve(script, &both_tokens(), true).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::FreshLogin));
    assert!(trace.contains("fresh_login_leniency"));
    assert_eq!(client.headers().len(), 1);
}

// ============================================================================
// SECTION: Refresh Sub-Procedure
// ============================================================================

#[tokio::test]
async fn test_refresh_success_recheck_resolves() {
    let script = vec![
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
        ScriptedCall::Refresh(Ok(vec![
            "access_token=newa; Path=/; HttpOnly".to_string(),
            "refresh_token=newr; Path=/; HttpOnly".to_string(),
        ])),
        ScriptedCall::Identity(Ok(complete_student())),
    ];
    let (resolution, trace, client) = resolve(script, &both_tokens(), false).await;
    assert!(resolution.is_authenticated());
    assert!(trace.contains("refresh_tokens_extracted"));
    // The re-check forwarded the renewed tokens.
    let headers = client.headers();
    assert_eq!(headers.len(), 3);
    assert!(headers[2].contains("access_token=newa"));
    assert!(headers[2].contains("refresh_token=newr"));
}

#[tokio::test]
async fn test_refresh_success_without_tokens_uses_original_header() {
    let script = vec![
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
        ScriptedCall::Refresh(Ok(vec!["session=unrelated; Path=/".to_string()])),
        ScriptedCall::Identity(Ok(complete_student())),
    ];
    let (resolution, trace, client) = resolve(script, &both_tokens(), false).await;
    assert!(resolution.is_authenticated());
    assert!(trace.contains("refresh_tokens_missing"));
    let headers = client.headers();
    assert_eq!(headers[0], headers[2]);
}

#[tokio::test]
async fn test_refresh_rejected_is_conclusive() {
    for status in [401_u16, 403] {
        let script = vec![
            ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
            ScriptedCall::Refresh(Err(IdentityCallError::Status(status))),
        ];
        let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
        assert_eq!(resolution, AuthResolution::ConclusiveInvalid);
    }
}

#[tokio::test]
async fn test_refresh_server_error_is_indeterminate() {
    let script = vec![
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
        ScriptedCall::Refresh(Err(IdentityCallError::Status(503))),
    ];
    let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::ServerError(503)));
}

#[tokio::test]
async fn test_refresh_network_error_is_indeterminate() {
    let script = vec![
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
        ScriptedCall::Refresh(Err(IdentityCallError::Network("dns error".into()))),
    ];
    let (resolution, trace, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::Network));
    assert!(trace.contains("refresh_network_failure"));
}

#[tokio::test]
async fn test_refresh_unclassified_error_still_preserves_cookies() {
    let script = vec![
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
        ScriptedCall::Refresh(Err(IdentityCallError::Network("something odd".into()))),
    ];
    let (resolution, trace, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::Network));
    assert!(trace.contains("refresh_unclassified_failure"));
}

#[tokio::test]
async fn test_recheck_401_is_conclusive_and_bounded() {
    let script = vec![
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
        ScriptedCall::Refresh(Ok(vec!["access_token=newa".to_string()])),
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
    ];
    let (resolution, _, client) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::ConclusiveInvalid);
    // Depth 1: exactly three calls, never a second refresh.
    assert_eq!(client.headers().len(), 3);
    assert_eq!(client.remaining(), 0);
}

#[tokio::test]
async fn test_recheck_server_error_is_indeterminate() {
    let script = vec![
        ScriptedCall::Identity(Err(IdentityCallError::Status(401))),
        ScriptedCall::Refresh(Ok(vec!["access_token=newa".to_string()])),
        ScriptedCall::Identity(Err(IdentityCallError::Status(500))),
    ];
    let (resolution, _, _) = resolve(script, &both_tokens(), false).await;
    assert_eq!(resolution, AuthResolution::Indeterminate(IndeterminateCause::ServerError(500)));
}

// ============================================================================
// SECTION: Profile Derivation
// ============================================================================

#[tokio::test]
async fn test_incomplete_profile_needs_onboarding() {
    let mut profile = complete_student();
    profile.age = None;
    let script = vec![ScriptedCall::Identity(Ok(profile))];
    let (resolution, _, _) = resolve(script, &access_only(), false).await;
    let identity = resolution.identity().unwrap();
    assert_eq!(identity.role, Some(Role::Student));
    assert!(identity.needs_onboarding);
}

#[tokio::test]
async fn test_student_without_identifier_needs_onboarding() {
    let mut profile = complete_student();
    profile.student_id = None;
    let script = vec![ScriptedCall::Identity(Ok(profile))];
    let (resolution, _, _) = resolve(script, &access_only(), false).await;
    assert!(resolution.identity().unwrap().needs_onboarding);
}

#[tokio::test]
async fn test_unknown_role_is_not_authenticated() {
    let mut profile = complete_student();
    profile.role = Some("admin".to_string());
    let script = vec![ScriptedCall::Identity(Ok(profile))];
    let (resolution, _, _) = resolve(script, &access_only(), false).await;
    assert!(!resolution.is_authenticated());
    assert!(resolution.identity().is_some());
}

// ============================================================================
// SECTION: Duplicate Cookies
// ============================================================================

#[tokio::test]
async fn test_duplicate_access_token_flagged_and_single_valued() {
    let bundle = CredentialBundle::new(
        RequestCookies::parse("access_token=first; access_token=second"),
        None,
    );
    let script = vec![ScriptedCall::Identity(Ok(complete_student()))];
    let (resolution, trace, client) = resolve(script, &bundle, false).await;
    assert!(resolution.is_authenticated());
    assert!(trace.contains("duplicate_cookies"));
    let headers = client.headers();
    assert_eq!(headers[0].matches("access_token=").count(), 1);
    assert!(headers[0].contains("access_token=first"));
}
