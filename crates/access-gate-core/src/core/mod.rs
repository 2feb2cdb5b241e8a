// crates/access-gate-core/src/core/mod.rs
// ============================================================================
// Module: Access Gate Core Types
// Description: Pure data types for the authorization decision pipeline.
// Purpose: Group cookie, identity, path, decision, and trace types.
// Dependencies: serde, thiserror, urlencoding
// ============================================================================

//! ## Overview
//! Core types are deterministic and IO-free. Everything here operates on
//! strings already extracted from an HTTP request; nothing holds state past
//! a single invocation of the gate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cookies;
pub mod decision;
pub mod identity;
pub mod paths;
pub mod set_cookie;
pub mod trace;
