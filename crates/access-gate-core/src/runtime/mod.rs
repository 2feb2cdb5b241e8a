// crates/access-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Access Gate Runtime
// Description: Identity resolution and routing policy evaluation.
// Purpose: Combine the pure core types into the per-request decision flow.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime separates "what do we know" from "what do we do": the
//! resolver produces an [`resolver::AuthResolution`] from the credentials
//! and at most two bounded remote calls, and the policy maps that resolution
//! plus a classified path to a [`crate::RoutingDecision`]. The
//! [`gate::RequestGate`] facade wires both behind one entry point.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod gate;
pub mod policy;
pub mod resolver;
