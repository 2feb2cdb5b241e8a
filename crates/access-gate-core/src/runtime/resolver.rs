// crates/access-gate-core/src/runtime/resolver.rs
// ============================================================================
// Module: Identity Resolver
// Description: The identity-resolution state machine of the gate.
// Purpose: Reduce credentials and remote lookups to one resolution outcome.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Resolution prefers the framework session, falls back to the identity
//! endpoint when only an access token is present, and recovers from a 401
//! with exactly one refresh followed by one re-check. The classification
//! bias is deliberate: cookies are only invalidated on explicit 401/403
//! answers from the auth endpoints. A timeout, transport failure, server
//! error, or undecodable body resolves to [`AuthResolution::Indeterminate`],
//! which downstream policy always maps to pass-through with cookies intact;
//! deleting valid cookies on a transient blip would forcibly log users out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::cookies::CredentialBundle;
use crate::core::identity::Identity;
use crate::core::set_cookie::TokenPair;
use crate::core::trace::GateTrace;
use crate::interfaces::IdentityCallError;
use crate::interfaces::IdentityClient;
use crate::interfaces::is_network_shaped;

// ============================================================================
// SECTION: Resolution Outcome
// ============================================================================

/// Why a resolution ended indeterminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndeterminateCause {
    /// A call exceeded its hard timeout.
    Timeout,
    /// A call failed at the transport level.
    Network,
    /// An endpoint answered with an unexpected or 5xx status.
    ServerError(u16),
    /// An endpoint answered 2xx with an undecodable body.
    MalformedBody,
    /// A 401 arrived inside the fresh-login window.
    FreshLogin,
}

impl IndeterminateCause {
    /// Returns a stable label for trace events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::ServerError(_) => "server_error",
            Self::MalformedBody => "malformed_body",
            Self::FreshLogin => "fresh_login",
        }
    }
}

/// Outcome of the identity-resolution step.
///
/// # Invariants
/// - `ConclusiveInvalid` is produced only on explicit 401/403 from the auth
///   endpoints; it is the only outcome that permits cookie deletion.
/// - `Indeterminate` always maps to pass-through with cookies preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthResolution {
    /// No credential was present at all.
    Anonymous,
    /// A failure too ambiguous to invalidate credentials.
    Indeterminate(IndeterminateCause),
    /// The credential was explicitly rejected; delete cookies.
    ConclusiveInvalid,
    /// An identity was resolved; its role may still be unrecognized.
    Identified(Identity),
}

impl AuthResolution {
    /// Returns the resolved identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Identified(identity) => Some(identity),
            _ => None,
        }
    }

    /// Returns true when a credential resolved to a recognized role.
    ///
    /// Token presence alone does not count as authenticated for routing;
    /// the role must have resolved too.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Identified(identity) if identity.role.is_some())
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves per-request credentials into an [`AuthResolution`].
pub struct GateResolver<C> {
    /// Client for the identity and refresh endpoints.
    client: C,
}

impl<C: IdentityClient> GateResolver<C> {
    /// Creates a resolver over an identity client.
    pub const fn new(client: C) -> Self {
        Self {
            client,
        }
    }

    /// Resolves the effective identity for one request.
    ///
    /// Performs at most two sequential remote calls (identity, then one
    /// refresh plus one re-check); there is no retry loop beyond that.
    pub async fn resolve(
        &self,
        bundle: &CredentialBundle,
        fresh_login: bool,
        trace: &mut GateTrace,
    ) -> AuthResolution {
        let duplicates = bundle.cookies().duplicates();
        if !duplicates.is_empty() {
            trace.record_detail("duplicate_cookies", duplicates.join(","));
        }

        if let Some(session) = bundle.session() {
            trace.record("session_identity");
            return AuthResolution::Identified(Identity::from_session(session));
        }

        if bundle.access_token().is_none() {
            trace.record("no_credentials");
            return AuthResolution::Anonymous;
        }

        trace.record("identity_call");
        match self.client.fetch_identity(&bundle.cookies().forwarded_header()).await {
            Ok(profile) => {
                trace.record("identity_resolved");
                AuthResolution::Identified(Identity::from_profile(&profile))
            }
            Err(err) => self.classify_identity_failure(err, bundle, fresh_login, trace).await,
        }
    }

    /// Classifies a failed identity call, entering refresh when warranted.
    async fn classify_identity_failure(
        &self,
        err: IdentityCallError,
        bundle: &CredentialBundle,
        fresh_login: bool,
        trace: &mut GateTrace,
    ) -> AuthResolution {
        match err {
            IdentityCallError::Timeout => {
                trace.record("identity_timeout");
                AuthResolution::Indeterminate(IndeterminateCause::Timeout)
            }
            IdentityCallError::Network(message) => {
                trace.record_detail("identity_network_failure", message);
                AuthResolution::Indeterminate(IndeterminateCause::Network)
            }
            IdentityCallError::Decode(message) => {
                trace.record_detail("identity_malformed_body", message);
                AuthResolution::Indeterminate(IndeterminateCause::MalformedBody)
            }
            IdentityCallError::Status(401) => {
                if fresh_login {
                    trace.record("fresh_login_leniency");
                    return AuthResolution::Indeterminate(IndeterminateCause::FreshLogin);
                }
                if bundle.refresh_token().is_none() {
                    trace.record_detail("conclusive_invalid", "401 with no refresh token");
                    return AuthResolution::ConclusiveInvalid;
                }
                self.attempt_refresh(bundle, trace).await
            }
            IdentityCallError::Status(status) => {
                trace.record_detail("identity_server_error", status.to_string());
                AuthResolution::Indeterminate(IndeterminateCause::ServerError(status))
            }
        }
    }

    /// One-shot refresh followed by one identity re-check.
    ///
    /// The re-check result is final; a 401 at this depth is conclusive
    /// because no further refresh is permitted.
    async fn attempt_refresh(
        &self,
        bundle: &CredentialBundle,
        trace: &mut GateTrace,
    ) -> AuthResolution {
        trace.record("refresh_attempt");
        let headers = match self.client.refresh(&bundle.cookies().forwarded_header()).await {
            Ok(headers) => headers,
            Err(err) => return classify_refresh_failure(err, trace),
        };

        let tokens = TokenPair::from_headers(&headers);
        let cookie_header = if tokens.is_empty() {
            // Best effort: a 2xx refresh without extractable tokens falls
            // back to the originally held cookie header.
            trace.record("refresh_tokens_missing");
            bundle.cookies().forwarded_header()
        } else {
            trace.record("refresh_tokens_extracted");
            bundle
                .cookies()
                .forwarded_header_with_tokens(
                    tokens.access_token.as_deref(),
                    tokens.refresh_token.as_deref(),
                )
        };

        trace.record("identity_recheck");
        match self.client.fetch_identity(&cookie_header).await {
            Ok(profile) => {
                trace.record("recheck_resolved");
                AuthResolution::Identified(Identity::from_profile(&profile))
            }
            Err(IdentityCallError::Status(401 | 403)) => {
                trace.record_detail("conclusive_invalid", "re-check rejected after refresh");
                AuthResolution::ConclusiveInvalid
            }
            Err(IdentityCallError::Status(status)) => {
                trace.record_detail("recheck_server_error", status.to_string());
                AuthResolution::Indeterminate(IndeterminateCause::ServerError(status))
            }
            Err(IdentityCallError::Timeout) => {
                trace.record("recheck_timeout");
                AuthResolution::Indeterminate(IndeterminateCause::Timeout)
            }
            Err(IdentityCallError::Network(message)) => {
                trace.record_detail("recheck_network_failure", message);
                AuthResolution::Indeterminate(IndeterminateCause::Network)
            }
            Err(IdentityCallError::Decode(message)) => {
                trace.record_detail("recheck_malformed_body", message);
                AuthResolution::Indeterminate(IndeterminateCause::MalformedBody)
            }
        }
    }
}

// ============================================================================
// SECTION: Refresh Classification
// ============================================================================

/// Classifies a failed refresh call.
fn classify_refresh_failure(err: IdentityCallError, trace: &mut GateTrace) -> AuthResolution {
    match err {
        IdentityCallError::Status(401 | 403) => {
            trace.record_detail("conclusive_invalid", "refresh rejected");
            AuthResolution::ConclusiveInvalid
        }
        IdentityCallError::Status(status) => {
            trace.record_detail("refresh_server_error", status.to_string());
            AuthResolution::Indeterminate(IndeterminateCause::ServerError(status))
        }
        IdentityCallError::Timeout => {
            trace.record("refresh_timeout");
            AuthResolution::Indeterminate(IndeterminateCause::Timeout)
        }
        IdentityCallError::Network(message) => {
            // Only explicit 401/403 responses are trusted to delete cookies;
            // a thrown error preserves them whether or not it looks
            // network-shaped, the trace records which it was.
            if is_network_shaped(&message) {
                trace.record_detail("refresh_network_failure", message);
            } else {
                trace.record_detail("refresh_unclassified_failure", message);
            }
            AuthResolution::Indeterminate(IndeterminateCause::Network)
        }
        IdentityCallError::Decode(message) => {
            trace.record_detail("refresh_malformed_body", message);
            AuthResolution::Indeterminate(IndeterminateCause::MalformedBody)
        }
    }
}
