// crates/access-gate-core/src/core/identity.rs
// ============================================================================
// Module: Identity Types
// Description: Roles, sessions, and the identity-endpoint wire profile.
// Purpose: Derive routing-relevant identity facts from untrusted sources.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identity facts come from two sources of differing trust: a framework
//! session object resolved upstream, or the JSON body of the remote identity
//! endpoint. Both reduce to the same [`Identity`] shape: an optional
//! recognized role plus an onboarding-needed flag. Unrecognized role strings
//! map to `None` rather than an error so that routing can degrade to the
//! unauthenticated policy without invalidating credentials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Role
// ============================================================================

/// Recognized application roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructor dashboard area.
    Instructor,
    /// Student dashboard area.
    Student,
}

impl Role {
    /// Returns the stable lowercase label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instructor => "instructor",
            Self::Student => "student",
        }
    }

    /// Parses a role label, returning `None` for unrecognized values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "instructor" => Some(Self::Instructor),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Pre-resolved framework session passed into the gate by the host app.
///
/// # Invariants
/// - When present, the session short-circuits remote identity calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Role claim from the session, when recognized.
    pub role: Option<Role>,
    /// Whether the session user still needs to complete onboarding.
    pub needs_onboarding: bool,
}

// ============================================================================
// SECTION: Wire Profile
// ============================================================================

/// JSON body returned by the identity endpoint.
///
/// Fields are optional because profile completeness is exactly what the gate
/// derives from their absence; `null` and missing are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentityProfile {
    /// Role label as reported by the backend.
    #[serde(default)]
    pub role: Option<String>,
    /// User age, absent until onboarding completes.
    #[serde(default)]
    pub age: Option<u32>,
    /// Phone number, absent until onboarding completes.
    #[serde(default)]
    pub phone: Option<String>,
    /// Gender, absent until onboarding completes.
    #[serde(default)]
    pub gender: Option<String>,
    /// Student identifier, required for students only.
    #[serde(default, alias = "studentId")]
    pub student_id: Option<String>,
}

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Routing-relevant identity derived from a session or a wire profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Recognized role, `None` when the source carried an unknown role.
    pub role: Option<Role>,
    /// Whether the user must complete onboarding before dashboard access.
    pub needs_onboarding: bool,
}

impl Identity {
    /// Derives an identity from the identity-endpoint profile.
    ///
    /// Onboarding is needed when any of age/phone/gender is absent, or when
    /// the role is student and the student identifier is absent.
    #[must_use]
    pub fn from_profile(profile: &IdentityProfile) -> Self {
        let role = profile.role.as_deref().and_then(Role::parse);
        let core_missing =
            profile.age.is_none() || profile.phone.is_none() || profile.gender.is_none();
        let student_missing = role == Some(Role::Student) && profile.student_id.is_none();
        Self {
            role,
            needs_onboarding: core_missing || student_missing,
        }
    }

    /// Derives an identity from a framework session.
    #[must_use]
    pub const fn from_session(session: &SessionInfo) -> Self {
        Self {
            role: session.role,
            needs_onboarding: session.needs_onboarding,
        }
    }
}
