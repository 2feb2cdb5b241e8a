// crates/access-gate-middleware/src/lib.rs
// ============================================================================
// Module: Access Gate Middleware Library
// Description: Axum wiring for the request authorization gate.
// Purpose: Expose the middleware function, shared state, and audit sinks.
// Dependencies: crate::{audit, layer}
// ============================================================================

//! ## Overview
//! This crate turns the pure gate from `access-gate-core` into an axum
//! middleware. The host application builds a [`GateState`] from a validated
//! [`access_gate_config::GateConfig`] and layers [`authorize`] onto its
//! router. Every in-scope request is decided once; decisions are emitted as
//! JSON lines through the configured [`AuditSink`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod layer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::GateAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::sink_for;
pub use layer::GateSetupError;
pub use layer::GateState;
pub use layer::authorize;
