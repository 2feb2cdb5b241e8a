// crates/access-gate-core/src/core/paths.rs
// ============================================================================
// Module: Path Classification
// Description: Path policy, classification predicates, and redirect targets.
// Purpose: Map request paths to the areas the routing policy reasons about.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! The gate only ever looks at a request path through the predicates defined
//! here: which dashboard area it belongs to, whether it is an auth page, an
//! onboarding page, or an invitation link. The policy also owns the mapping
//! from roles to login, dashboard, and onboarding targets, and the
//! open-redirect check applied before a path is attached as a `redirect`
//! query parameter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use url::Url;

use crate::core::identity::Role;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Path policy construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathPolicyError {
    /// A configured path did not start with `/`.
    #[error("path for {0} must start with '/'")]
    NotAbsolute(&'static str),
    /// A configured prefix was the bare root path.
    #[error("prefix for {0} must not be '/'")]
    BareRoot(&'static str),
    /// The auth route list was empty.
    #[error("auth route list must not be empty")]
    EmptyAuthRoutes,
}

// ============================================================================
// SECTION: Path Policy
// ============================================================================

/// Configured path layout of the protected application areas.
///
/// # Invariants
/// - Every stored path starts with `/` and prefixes are never bare `/`.
/// - `role_selection` is also a member of `auth_routes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPolicy {
    /// Instructor dashboard prefix.
    instructor_prefix: String,
    /// Student dashboard prefix.
    student_prefix: String,
    /// Onboarding area prefix.
    onboarding_prefix: String,
    /// Invitation (signed-link) area prefix.
    invitation_prefix: String,
    /// Instructor login page.
    instructor_login: String,
    /// Student login page.
    student_login: String,
    /// Fixed set of auth pages (logins, signups, role selection).
    auth_routes: Vec<String>,
    /// Role-selection page, exempt from the authenticated-on-auth-page rule
    /// while the role is unknown.
    role_selection: String,
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self {
            instructor_prefix: "/dashboard/instructor".to_string(),
            student_prefix: "/dashboard/student".to_string(),
            onboarding_prefix: "/onboarding".to_string(),
            invitation_prefix: "/invitation".to_string(),
            instructor_login: "/login/instructor".to_string(),
            student_login: "/login/student".to_string(),
            auth_routes: vec![
                "/login/instructor".to_string(),
                "/login/student".to_string(),
                "/signup/instructor".to_string(),
                "/signup/student".to_string(),
                "/select-role".to_string(),
            ],
            role_selection: "/select-role".to_string(),
        }
    }
}

impl PathPolicy {
    /// Creates a validated path policy.
    ///
    /// # Errors
    ///
    /// Returns [`PathPolicyError`] when any path is not absolute, a prefix is
    /// the bare root, or the auth route list is empty.
    pub fn new(
        instructor_prefix: String,
        student_prefix: String,
        onboarding_prefix: String,
        invitation_prefix: String,
        instructor_login: String,
        student_login: String,
        auth_routes: Vec<String>,
        role_selection: String,
    ) -> Result<Self, PathPolicyError> {
        validate_prefix("instructor_prefix", &instructor_prefix)?;
        validate_prefix("student_prefix", &student_prefix)?;
        validate_prefix("onboarding_prefix", &onboarding_prefix)?;
        validate_prefix("invitation_prefix", &invitation_prefix)?;
        validate_absolute("instructor_login", &instructor_login)?;
        validate_absolute("student_login", &student_login)?;
        validate_absolute("role_selection", &role_selection)?;
        if auth_routes.is_empty() {
            return Err(PathPolicyError::EmptyAuthRoutes);
        }
        for route in &auth_routes {
            validate_absolute("auth_routes", route)?;
        }
        let mut auth_routes = auth_routes;
        if !auth_routes.contains(&role_selection) {
            auth_routes.push(role_selection.clone());
        }
        Ok(Self {
            instructor_prefix,
            student_prefix,
            onboarding_prefix,
            invitation_prefix,
            instructor_login,
            student_login,
            auth_routes,
            role_selection,
        })
    }

    /// Classifies a request path against the configured areas.
    #[must_use]
    pub fn classify(&self, path: &str) -> PathClass {
        PathClass {
            path: path.to_string(),
            instructor_protected: has_prefix(path, &self.instructor_prefix),
            student_protected: has_prefix(path, &self.student_prefix),
            auth_route: self.auth_routes.iter().any(|route| route == path),
            onboarding_route: has_prefix(path, &self.onboarding_prefix),
            invitation_route: has_prefix(path, &self.invitation_prefix),
            role_selection: path == self.role_selection,
        }
    }

    /// Returns true when the gate should inspect the path at all.
    ///
    /// Static assets and API routes outside the configured areas pass
    /// through untouched.
    #[must_use]
    pub fn in_scope(&self, path: &str) -> bool {
        let class = self.classify(path);
        class.instructor_protected
            || class.student_protected
            || class.auth_route
            || class.onboarding_route
            || class.invitation_route
    }

    /// Returns the dashboard root for a role.
    #[must_use]
    pub fn dashboard_root(&self, role: Role) -> &str {
        match role {
            Role::Instructor => &self.instructor_prefix,
            Role::Student => &self.student_prefix,
        }
    }

    /// Returns the login page for a role.
    #[must_use]
    pub fn login_path(&self, role: Role) -> &str {
        match role {
            Role::Instructor => &self.instructor_login,
            Role::Student => &self.student_login,
        }
    }

    /// Returns the login page matching the protected area of a path.
    ///
    /// Paths outside both dashboard areas fall back to the student login,
    /// the public entry point of the application.
    #[must_use]
    pub fn login_for_class(&self, class: &PathClass) -> &str {
        if class.instructor_protected {
            &self.instructor_login
        } else {
            &self.student_login
        }
    }

    /// Returns the onboarding page for a role.
    #[must_use]
    pub fn onboarding_path(&self, role: Role) -> String {
        format!("{}/{}", self.onboarding_prefix, role.as_str())
    }

    /// Validates a path for use as a `redirect` query parameter.
    ///
    /// Only paths under a recognized dashboard prefix are returned; anything
    /// else is dropped to keep the login redirect free of open-redirect
    /// targets.
    #[must_use]
    pub fn redirect_param<'a>(&self, path: &'a str) -> Option<&'a str> {
        if has_prefix(path, &self.instructor_prefix) || has_prefix(path, &self.student_prefix) {
            Some(path)
        } else {
            None
        }
    }

    /// Returns true when the referer points at a login page.
    ///
    /// This is the fresh-login heuristic: immediately after a login redirect,
    /// cross-domain cookie propagation can lag, so a 401 from the identity
    /// endpoint is treated as indeterminate rather than conclusive. The
    /// heuristic is deliberately loose; tightening it would reintroduce
    /// spurious logouts on slow cookie propagation.
    #[must_use]
    pub fn is_fresh_login(&self, referer: Option<&str>) -> bool {
        let Some(referer) = referer else {
            return false;
        };
        let referer_path = Url::parse(referer)
            .map_or_else(|_| referer.to_string(), |url| url.path().to_string());
        referer_path == self.instructor_login
            || referer_path == self.student_login
            || has_prefix(&referer_path, &self.instructor_login)
            || has_prefix(&referer_path, &self.student_login)
    }
}

// ============================================================================
// SECTION: Path Class
// ============================================================================

/// Precomputed predicates over one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClass {
    /// The original request path.
    pub path: String,
    /// Path is under the instructor dashboard prefix.
    pub instructor_protected: bool,
    /// Path is under the student dashboard prefix.
    pub student_protected: bool,
    /// Path is one of the fixed auth pages.
    pub auth_route: bool,
    /// Path is under the onboarding prefix.
    pub onboarding_route: bool,
    /// Path is under the invitation prefix.
    pub invitation_route: bool,
    /// Path is exactly the role-selection page.
    pub role_selection: bool,
}

impl PathClass {
    /// Returns true when the path is under either dashboard prefix.
    #[must_use]
    pub const fn protected(&self) -> bool {
        self.instructor_protected || self.student_protected
    }

    /// Returns the dashboard area the path belongs to, if any.
    #[must_use]
    pub const fn protected_area(&self) -> Option<Role> {
        if self.instructor_protected {
            Some(Role::Instructor)
        } else if self.student_protected {
            Some(Role::Student)
        } else {
            None
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `path` equals `prefix` or sits below it.
fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

/// Validates that a configured path is absolute.
fn validate_absolute(field: &'static str, path: &str) -> Result<(), PathPolicyError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(PathPolicyError::NotAbsolute(field))
    }
}

/// Validates that a configured prefix is absolute and not the bare root.
fn validate_prefix(field: &'static str, prefix: &str) -> Result<(), PathPolicyError> {
    validate_absolute(field, prefix)?;
    if prefix == "/" {
        return Err(PathPolicyError::BareRoot(field));
    }
    Ok(())
}
