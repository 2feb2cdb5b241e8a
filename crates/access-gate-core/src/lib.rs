// crates/access-gate-core/src/lib.rs
// ============================================================================
// Module: Access Gate Core Library
// Description: Public API surface for the Access Gate core.
// Purpose: Expose the decision pipeline types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Access Gate core implements the per-request authorization decision
//! pipeline: credential extraction from request cookies, identity resolution
//! with bounded refresh recovery, and the pure routing policy that maps a
//! classified path and a resolution outcome to a continue/redirect decision.
//! The crate performs no IO itself; remote identity lookups go through the
//! [`IdentityClient`] interface so callers can inject real or scripted
//! implementations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::cookies::ACCESS_TOKEN_COOKIE;
pub use crate::core::cookies::CredentialBundle;
pub use crate::core::cookies::REFRESH_TOKEN_COOKIE;
pub use crate::core::cookies::RequestCookies;
pub use crate::core::decision::RouteAction;
pub use crate::core::decision::RoutingDecision;
pub use crate::core::identity::Identity;
pub use crate::core::identity::IdentityProfile;
pub use crate::core::identity::Role;
pub use crate::core::identity::SessionInfo;
pub use crate::core::paths::PathClass;
pub use crate::core::paths::PathPolicy;
pub use crate::core::paths::PathPolicyError;
pub use crate::core::set_cookie::CookieAttribute;
pub use crate::core::set_cookie::SetCookie;
pub use crate::core::set_cookie::TokenPair;
pub use crate::core::trace::GateEvent;
pub use crate::core::trace::GateTrace;
pub use crate::interfaces::IdentityCallError;
pub use crate::interfaces::IdentityClient;
pub use crate::runtime::gate::GateRequest;
pub use crate::runtime::gate::RequestGate;
pub use crate::runtime::policy::route_request;
pub use crate::runtime::resolver::AuthResolution;
pub use crate::runtime::resolver::GateResolver;
pub use crate::runtime::resolver::IndeterminateCause;
