// crates/access-gate-config/src/lib.rs
// ============================================================================
// Module: Access Gate Configuration Library
// Description: Public API surface for gate configuration loading.
// Purpose: Expose strict, fail-closed TOML configuration for the gate.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and bounds
//! limits. Missing sections fall back to safe defaults; invalid values fail
//! closed rather than degrading silently.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuditConfig;
pub use config::AuditMode;
pub use config::CONFIG_ENV_VAR;
pub use config::GateConfig;
pub use config::GateConfigError;
