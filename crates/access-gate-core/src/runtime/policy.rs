// crates/access-gate-core/src/runtime/policy.rs
// ============================================================================
// Module: Routing Policy
// Description: Pure mapping from path class and resolution to a decision.
// Purpose: Apply the area/role/onboarding routing rules in a fixed order.
// Dependencies: crate::core, crate::runtime::resolver
// ============================================================================

//! ## Overview
//! The routing policy is a pure function: given the classified path and the
//! resolution outcome, it produces the single [`RoutingDecision`] for the
//! request. Rules apply in a fixed order: invitation short-circuit,
//! indeterminate pass-through, onboarding-area rules, role fencing, login
//! redirect for unauthenticated protected access, onboarding redirect, and
//! the don't-show-login-to-authenticated-users rule. Cookie deletions attach
//! at the end, and only when the resolution was conclusively invalid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::decision::RoutingDecision;
use crate::core::identity::Role;
use crate::core::paths::PathClass;
use crate::core::paths::PathPolicy;
use crate::core::trace::GateTrace;
use crate::runtime::resolver::AuthResolution;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Query parameter carrying the originally requested path on login redirects.
pub const REDIRECT_PARAM: &str = "redirect";

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Maps a classified path and resolution outcome to the routing decision.
#[must_use]
pub fn route_request(
    policy: &PathPolicy,
    class: &PathClass,
    resolution: &AuthResolution,
    trace: &mut GateTrace,
) -> RoutingDecision {
    let decision = base_route(policy, class, resolution, trace);
    if matches!(resolution, AuthResolution::ConclusiveInvalid) {
        trace.record("clearing_auth_cookies");
        decision.clearing_auth_cookies()
    } else {
        decision
    }
}

/// Applies the routing rules without the cookie-deletion overlay.
fn base_route(
    policy: &PathPolicy,
    class: &PathClass,
    resolution: &AuthResolution,
    trace: &mut GateTrace,
) -> RoutingDecision {
    // Invitation links are an external signed-link flow outside the
    // authorization model.
    if class.invitation_route {
        trace.record("route_invitation_passthrough");
        return RoutingDecision::pass();
    }

    // Indeterminate outcomes defer the authentication decision downstream.
    if let AuthResolution::Indeterminate(cause) = resolution {
        trace.record_detail("route_indeterminate_passthrough", cause.as_str());
        return RoutingDecision::pass();
    }

    let identity = resolution.identity();
    let role = identity.and_then(|identity| identity.role);
    let needs_onboarding = identity.is_some_and(|identity| identity.needs_onboarding);

    if class.onboarding_route {
        return match role {
            Some(role) if !needs_onboarding => {
                trace.record("route_onboarding_complete");
                RoutingDecision::redirect(policy.dashboard_root(role))
            }
            _ => {
                // Unauthenticated visitors and users mid-onboarding are the
                // onboarding page's own concern.
                trace.record("route_onboarding_passthrough");
                RoutingDecision::pass()
            }
        };
    }

    if let Some(role) = role {
        if role == Role::Student && class.instructor_protected {
            trace.record("route_role_fence");
            return RoutingDecision::redirect(policy.dashboard_root(Role::Student));
        }
        if role == Role::Instructor && class.student_protected {
            trace.record("route_role_fence");
            return RoutingDecision::redirect(policy.dashboard_root(Role::Instructor));
        }
    }

    if role.is_none() && class.protected() {
        trace.record("route_login_redirect");
        let login = policy.login_for_class(class);
        return policy.redirect_param(&class.path).map_or_else(
            || RoutingDecision::redirect(login),
            |original| RoutingDecision::redirect_with_query(login, REDIRECT_PARAM, original),
        );
    }

    if let Some(role) = role
        && needs_onboarding
        && class.protected()
    {
        trace.record("route_needs_onboarding");
        return RoutingDecision::redirect(policy.onboarding_path(role));
    }

    if class.auth_route {
        if let Some(role) = role {
            if needs_onboarding {
                trace.record("route_auth_page_to_onboarding");
                return RoutingDecision::redirect(policy.onboarding_path(role));
            }
            trace.record("route_auth_page_to_dashboard");
            return RoutingDecision::redirect(policy.dashboard_root(role));
        }
        // Covers the role-selection page while the role is unknown, and
        // anonymous visitors on any auth page.
        trace.record("route_auth_page_passthrough");
        return RoutingDecision::pass();
    }

    trace.record("route_pass");
    RoutingDecision::pass()
}
