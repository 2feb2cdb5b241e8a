// crates/access-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Access Gate Interfaces
// Description: Backend-agnostic interface for remote identity resolution.
// Purpose: Define the contract surface between the gate and the auth backend.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! The gate reaches the outside world through exactly one seam: the
//! [`IdentityClient`] trait, covering the identity ("who am I") and refresh
//! endpoints. The error taxonomy is the heart of the failure-safety design:
//! only [`IdentityCallError::Status`] with 401/403 is ever conclusive enough
//! to invalidate credentials; timeouts, transport failures, server errors,
//! and undecodable bodies all classify as indeterminate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::identity::IdentityProfile;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures of an identity or refresh call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityCallError {
    /// The call exceeded its hard timeout.
    #[error("identity call timed out")]
    Timeout,
    /// The call failed at the transport level before a status was received.
    #[error("identity call network failure: {0}")]
    Network(String),
    /// The endpoint answered with a non-2xx status.
    #[error("identity endpoint returned status {0}")]
    Status(u16),
    /// The endpoint answered 2xx but the body could not be decoded.
    #[error("identity response body could not be decoded: {0}")]
    Decode(String),
}

impl IdentityCallError {
    /// Returns true for explicit 401/403 responses.
    ///
    /// Only these justify deleting stored credentials; every other failure
    /// is indeterminate and must preserve cookies.
    #[must_use]
    pub const fn is_conclusive(&self) -> bool {
        matches!(self, Self::Status(401 | 403))
    }
}

// ============================================================================
// SECTION: Transport Classification
// ============================================================================

/// Error-message fragments that indicate a network-shaped failure.
const NETWORK_SIGNATURES: &[&str] = &[
    "abort",
    "timed out",
    "timeout",
    "connect",
    "connection",
    "dns",
    "refused",
    "reset",
    "broken pipe",
    "unreachable",
];

/// Returns true when an error message looks like a transport failure.
///
/// Used to classify thrown client errors that carry no HTTP status: a
/// network-shaped message is indeterminate, anything else is still treated
/// as indeterminate by the resolver, but the distinction is recorded in the
/// trace for operability.
#[must_use]
pub fn is_network_shaped(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    NETWORK_SIGNATURES.iter().any(|signature| lowered.contains(signature))
}

// ============================================================================
// SECTION: Identity Client
// ============================================================================

/// Backend-agnostic client for the identity and refresh endpoints.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Fetches the current user's profile given a forwarded cookie header.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityCallError`] classified per the taxonomy above.
    async fn fetch_identity(&self, cookie_header: &str)
    -> Result<IdentityProfile, IdentityCallError>;

    /// Exchanges the refresh token for renewed tokens.
    ///
    /// On success returns the raw `Set-Cookie` header values of the refresh
    /// response; callers extract the renewed token pair from them.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityCallError`] classified per the taxonomy above.
    async fn refresh(&self, cookie_header: &str) -> Result<Vec<String>, IdentityCallError>;
}

#[async_trait]
impl<T: IdentityClient + ?Sized> IdentityClient for &T {
    async fn fetch_identity(
        &self,
        cookie_header: &str,
    ) -> Result<IdentityProfile, IdentityCallError> {
        (**self).fetch_identity(cookie_header).await
    }

    async fn refresh(&self, cookie_header: &str) -> Result<Vec<String>, IdentityCallError> {
        (**self).refresh(cookie_header).await
    }
}

#[async_trait]
impl<T: IdentityClient + ?Sized> IdentityClient for std::sync::Arc<T> {
    async fn fetch_identity(
        &self,
        cookie_header: &str,
    ) -> Result<IdentityProfile, IdentityCallError> {
        (**self).fetch_identity(cookie_header).await
    }

    async fn refresh(&self, cookie_header: &str) -> Result<Vec<String>, IdentityCallError> {
        (**self).refresh(cookie_header).await
    }
}
