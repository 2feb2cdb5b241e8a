// crates/access-gate-core/src/core/trace.rs
// ============================================================================
// Module: Gate Trace
// Description: Per-request diagnostic event collection.
// Purpose: Record every branch of the resolution pipeline for audit sinks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every branch of the resolution state machine and the routing policy
//! appends a [`GateEvent`] to the request's [`GateTrace`]. The trace is not
//! user-visible; the middleware serializes it into the audit log after the
//! decision is made. Collection is in-memory and ordered, so tests can
//! assert on the exact branch sequence a scenario takes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One diagnostic event recorded during gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateEvent {
    /// Stable event identifier.
    pub event: &'static str,
    /// Optional human-readable detail.
    pub detail: Option<String>,
}

/// Ordered collection of diagnostic events for one request.
#[derive(Debug, Clone, Default)]
pub struct GateTrace {
    /// Events in the order they were recorded.
    entries: Vec<GateEvent>,
}

impl GateTrace {
    /// Records an event without detail.
    pub fn record(&mut self, event: &'static str) {
        self.entries.push(GateEvent {
            event,
            detail: None,
        });
    }

    /// Records an event with detail.
    pub fn record_detail(&mut self, event: &'static str, detail: impl Into<String>) {
        self.entries.push(GateEvent {
            event,
            detail: Some(detail.into()),
        });
    }

    /// Returns the recorded events in order.
    #[must_use]
    pub fn entries(&self) -> &[GateEvent] {
        &self.entries
    }

    /// Returns true when an event with the given identifier was recorded.
    #[must_use]
    pub fn contains(&self, event: &str) -> bool {
        self.entries.iter().any(|entry| entry.event == event)
    }
}
