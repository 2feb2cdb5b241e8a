// crates/access-gate-middleware/src/audit.rs
// ============================================================================
// Module: Gate Audit Logging
// Description: Structured audit events for gate decisions.
// Purpose: Emit one JSON line per decision without hard logging dependencies.
// Dependencies: access-gate-config, access-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! One [`GateAuditEvent`] is recorded per in-scope request, after the
//! decision is made and before the response is built. The event carries the
//! decision outcome plus the full resolution trace, so an operator can
//! reconstruct exactly which branch a request took. Sinks are intentionally
//! lightweight: stderr, an append-only file, or nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use access_gate_config::AuditConfig;
use access_gate_config::AuditMode;
use access_gate_core::GateEvent;
use access_gate_core::GateTrace;
use access_gate_core::RouteAction;
use access_gate_core::RoutingDecision;
use serde::Serialize;

// ============================================================================
// SECTION: Event
// ============================================================================

/// Audit payload for one gate decision.
#[derive(Debug, Clone, Serialize)]
pub struct GateAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request path the decision applies to.
    pub path: String,
    /// Decision outcome label.
    pub action: &'static str,
    /// Redirect target when the outcome is a redirect.
    pub location: Option<String>,
    /// Cookie names expired on the outgoing response.
    pub cleared_cookies: Vec<&'static str>,
    /// Ordered resolution trace.
    pub trace: Vec<GateEvent>,
}

impl GateAuditEvent {
    /// Creates an audit event from a finished decision.
    #[must_use]
    pub fn new(path: &str, decision: &RoutingDecision, trace: &GateTrace) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let action = match decision.action {
            RouteAction::Continue => "continue",
            RouteAction::Redirect {
                ..
            } => "redirect",
        };
        Self {
            event: "gate_decision",
            timestamp_ms,
            path: path.to_string(),
            action,
            location: decision.location(),
            cleared_cookies: decision.clear_cookies.clone(),
            trace: trace.entries().to_vec(),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for gate decision events.
pub trait AuditSink: Send + Sync {
    /// Record a decision event.
    fn record(&self, event: &GateAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &GateAuditEvent) {}
}

/// Builds the sink selected by the audit configuration.
///
/// # Errors
///
/// Returns an error when file mode is selected and the file cannot be
/// opened, or when the validated config is missing the file path.
pub fn sink_for(config: &AuditConfig) -> io::Result<Arc<dyn AuditSink>> {
    match config.mode {
        AuditMode::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditMode::Off => Ok(Arc::new(NoopAuditSink)),
        AuditMode::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "file audit mode requires a path")
            })?;
            Ok(Arc::new(FileAuditSink::new(path)?))
        }
    }
}
