// crates/access-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Request Gate Facade
// Description: Single entry point combining resolver and routing policy.
// Purpose: Turn one dissected HTTP request into one routing decision.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`RequestGate`] is what the middleware holds: one call takes the
//! dissected request (path, cookie header, referer, optional session) and
//! returns the routing decision plus the diagnostic trace. Invocations are
//! independent and idempotent given the same inputs and backend answers;
//! the gate holds no cross-request state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::cookies::CredentialBundle;
use crate::core::cookies::RequestCookies;
use crate::core::decision::RoutingDecision;
use crate::core::identity::SessionInfo;
use crate::core::paths::PathPolicy;
use crate::core::trace::GateTrace;
use crate::interfaces::IdentityClient;
use crate::runtime::policy::route_request;
use crate::runtime::resolver::GateResolver;

// ============================================================================
// SECTION: Gate Request
// ============================================================================

/// Dissected per-request input to the gate.
#[derive(Debug, Clone, Default)]
pub struct GateRequest {
    /// Request path.
    pub path: String,
    /// Raw `Cookie` header, multiple headers pre-joined with `; `.
    pub cookie_header: Option<String>,
    /// Raw `Referer` header, used only for the fresh-login heuristic.
    pub referer: Option<String>,
    /// Pre-resolved framework session, when the host app provides one.
    pub session: Option<SessionInfo>,
}

// ============================================================================
// SECTION: Request Gate
// ============================================================================

/// Per-request authorization gate.
pub struct RequestGate<C> {
    /// Identity resolver over the injected client.
    resolver: GateResolver<C>,
    /// Configured path layout.
    policy: PathPolicy,
}

impl<C: IdentityClient> RequestGate<C> {
    /// Creates a gate from an identity client and path policy.
    pub const fn new(client: C, policy: PathPolicy) -> Self {
        Self {
            resolver: GateResolver::new(client),
            policy,
        }
    }

    /// Returns the configured path policy.
    #[must_use]
    pub const fn policy(&self) -> &PathPolicy {
        &self.policy
    }

    /// Decides whether one request continues or redirects.
    ///
    /// Invitation paths short-circuit before any credential work; everything
    /// else runs resolution (at most two remote calls) and the pure routing
    /// policy.
    pub async fn decide(&self, request: &GateRequest) -> (RoutingDecision, GateTrace) {
        let mut trace = GateTrace::default();
        let class = self.policy.classify(&request.path);

        if class.invitation_route {
            trace.record("route_invitation_passthrough");
            return (RoutingDecision::pass(), trace);
        }

        let cookies = RequestCookies::parse(request.cookie_header.as_deref().unwrap_or(""));
        let bundle = CredentialBundle::new(cookies, request.session.clone());
        let fresh_login = self.policy.is_fresh_login(request.referer.as_deref());
        if fresh_login {
            trace.record("fresh_login_referer");
        }

        let resolution = self.resolver.resolve(&bundle, fresh_login, &mut trace).await;
        let decision = route_request(&self.policy, &class, &resolution, &mut trace);
        (decision, trace)
    }
}
