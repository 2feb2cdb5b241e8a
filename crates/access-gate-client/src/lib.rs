// crates/access-gate-client/src/lib.rs
// ============================================================================
// Module: Access Gate Client Library
// Description: HTTP implementation of the identity client interface.
// Purpose: Expose the reqwest-backed identity/refresh endpoint client.
// Dependencies: crate::http
// ============================================================================

//! ## Overview
//! This crate provides the production [`access_gate_core::IdentityClient`]
//! implementation: bounded GET requests against the backend's identity and
//! refresh endpoints with a hard per-call timeout, redirects disabled, and
//! failure classification matching the gate's error taxonomy.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::HttpClientError;
pub use http::HttpIdentityClient;
pub use http::IdentityEndpoints;
