// crates/access-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Scripted identity client and fixture builders.
// Purpose: Drive the resolver deterministically without network mocking.
// ============================================================================

//! ## Overview
//! The scripted client replays a fixed sequence of identity/refresh answers
//! and records every forwarded cookie header, so tests can assert both the
//! resolution outcome and the exact calls the resolver made.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    dead_code,
    reason = "Test helpers panic on script misuse and are shared across test binaries."
)]

use std::collections::VecDeque;
use std::sync::Mutex;

use access_gate_core::IdentityCallError;
use access_gate_core::IdentityClient;
use access_gate_core::IdentityProfile;
use async_trait::async_trait;

/// One scripted backend answer.
#[derive(Debug, Clone)]
pub enum ScriptedCall {
    /// Answer for a `fetch_identity` call.
    Identity(Result<IdentityProfile, IdentityCallError>),
    /// Answer for a `refresh` call.
    Refresh(Result<Vec<String>, IdentityCallError>),
}

/// Identity client replaying a fixed script of answers.
pub struct ScriptedClient {
    /// Remaining scripted answers, consumed front to back.
    script: Mutex<VecDeque<ScriptedCall>>,
    /// Cookie headers seen by each call, in order.
    pub seen_headers: Mutex<Vec<String>>,
}

impl ScriptedClient {
    /// Creates a client from a script of answers.
    pub fn new(script: Vec<ScriptedCall>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen_headers: Mutex::new(Vec::new()),
        }
    }

    /// Returns the cookie headers observed so far.
    pub fn headers(&self) -> Vec<String> {
        self.seen_headers.lock().unwrap().clone()
    }

    /// Returns the number of unconsumed scripted answers.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    fn next(&self, cookie_header: &str) -> ScriptedCall {
        self.seen_headers.lock().unwrap().push(cookie_header.to_string());
        self.script.lock().unwrap().pop_front().expect("script exhausted")
    }
}

#[async_trait]
impl IdentityClient for ScriptedClient {
    async fn fetch_identity(
        &self,
        cookie_header: &str,
    ) -> Result<IdentityProfile, IdentityCallError> {
        match self.next(cookie_header) {
            ScriptedCall::Identity(result) => result,
            ScriptedCall::Refresh(_) => panic!("expected identity call, script has refresh"),
        }
    }

    async fn refresh(&self, cookie_header: &str) -> Result<Vec<String>, IdentityCallError> {
        match self.next(cookie_header) {
            ScriptedCall::Refresh(result) => result,
            ScriptedCall::Identity(_) => panic!("expected refresh call, script has identity"),
        }
    }
}

/// Builds a complete student profile (no onboarding needed).
pub fn complete_student() -> IdentityProfile {
    IdentityProfile {
        role: Some("student".to_string()),
        age: Some(21),
        phone: Some("09171234567".to_string()),
        gender: Some("female".to_string()),
        student_id: Some("2021-00123".to_string()),
    }
}

/// Builds a complete instructor profile (no onboarding needed).
pub fn complete_instructor() -> IdentityProfile {
    IdentityProfile {
        role: Some("instructor".to_string()),
        age: Some(35),
        phone: Some("09179876543".to_string()),
        gender: Some("male".to_string()),
        student_id: None,
    }
}
