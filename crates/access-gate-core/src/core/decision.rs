// crates/access-gate-core/src/core/decision.rs
// ============================================================================
// Module: Routing Decision
// Description: The single output type of the authorization gate.
// Purpose: Represent continue/redirect outcomes with cookie deletions.
// Dependencies: crate::core::cookies, serde, urlencoding
// ============================================================================

//! ## Overview
//! A [`RoutingDecision`] is produced once per request and immediately turned
//! into an HTTP response by the middleware. It carries exactly one action,
//! either passing the request through or redirecting it, plus the list of
//! cookies to expire on the outgoing response. Cookie deletions appear only on
//! conclusive authentication failures; no other branch mutates cookies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::cookies::ACCESS_TOKEN_COOKIE;
use crate::core::cookies::REFRESH_TOKEN_COOKIE;

// ============================================================================
// SECTION: Route Action
// ============================================================================

/// The action the gate instructs the middleware to take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RouteAction {
    /// Let the request proceed to the requested page.
    Continue,
    /// Redirect the request.
    Redirect {
        /// Redirect target path.
        target: String,
        /// Query parameters to attach, values encoded at render time.
        query: Vec<(String, String)>,
    },
}

// ============================================================================
// SECTION: Routing Decision
// ============================================================================

/// Outcome of one gate invocation.
///
/// # Invariants
/// - `clear_cookies` is non-empty only for conclusive 401/403 outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    /// Continue or redirect.
    pub action: RouteAction,
    /// Cookie names to expire on the outgoing response.
    pub clear_cookies: Vec<&'static str>,
}

impl RoutingDecision {
    /// Builds a pass-through decision.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            action: RouteAction::Continue,
            clear_cookies: Vec::new(),
        }
    }

    /// Builds a redirect decision without query parameters.
    #[must_use]
    pub fn redirect(target: impl Into<String>) -> Self {
        Self {
            action: RouteAction::Redirect {
                target: target.into(),
                query: Vec::new(),
            },
            clear_cookies: Vec::new(),
        }
    }

    /// Builds a redirect decision with a single query parameter.
    #[must_use]
    pub fn redirect_with_query(
        target: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            action: RouteAction::Redirect {
                target: target.into(),
                query: vec![(name.into(), value.into())],
            },
            clear_cookies: Vec::new(),
        }
    }

    /// Returns the decision with both auth cookies marked for deletion.
    #[must_use]
    pub fn clearing_auth_cookies(mut self) -> Self {
        self.clear_cookies = vec![ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE];
        self
    }

    /// Returns true when the action is pass-through.
    #[must_use]
    pub const fn is_continue(&self) -> bool {
        matches!(self.action, RouteAction::Continue)
    }

    /// Renders the redirect `Location` value, `None` for pass-through.
    ///
    /// Query values are percent-encoded; the target path is emitted as-is
    /// because it is always one of the policy-owned paths.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match &self.action {
            RouteAction::Continue => None,
            RouteAction::Redirect {
                target,
                query,
            } => {
                if query.is_empty() {
                    return Some(target.clone());
                }
                let rendered: Vec<String> = query
                    .iter()
                    .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
                    .collect();
                Some(format!("{target}?{}", rendered.join("&")))
            }
        }
    }
}
