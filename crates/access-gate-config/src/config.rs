// crates/access-gate-config/src/config.rs
// ============================================================================
// Module: Access Gate Configuration
// Description: Configuration loading and validation for the gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: access-gate-client, access-gate-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file capped at 1 MiB, with every
//! value bounds-checked before use. The parsed file converts into the typed
//! configs the other crates consume: [`access_gate_client::IdentityEndpoints`],
//! [`access_gate_core::PathPolicy`], and the audit sink settings. Unknown
//! fields are rejected so a typo never silently disables a rule.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use access_gate_client::IdentityEndpoints;
use access_gate_core::PathPolicy;
use access_gate_core::PathPolicyError;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "access-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ACCESS_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Minimum allowed outbound call timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum allowed outbound call timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 30_000;
/// Maximum number of configured auth routes.
pub(crate) const MAX_AUTH_ROUTES: usize = 32;
/// Maximum length of a configured path or prefix.
pub(crate) const MAX_PATH_LENGTH: usize = 256;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum GateConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {message}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error message.
        message: String,
    },
    /// The config file exceeded the size cap.
    #[error("config file exceeds {MAX_CONFIG_FILE_SIZE} bytes: {0}")]
    TooLarge(usize),
    /// The config file failed to parse as TOML.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A value failed bounds or shape validation.
    #[error("invalid config: {0}")]
    Validation(String),
    /// The path layout failed policy validation.
    #[error(transparent)]
    Paths(#[from] PathPolicyError),
}

// ============================================================================
// SECTION: Audit Settings
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    /// JSON lines to standard error.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Auditing disabled.
    Off,
}

/// Audit sink configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditConfig {
    /// Selected sink.
    pub mode: AuditMode,
    /// Target file for [`AuditMode::File`].
    pub path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Gate Config
// ============================================================================

/// Validated gate configuration.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Identity backend endpoints.
    pub endpoints: IdentityEndpoints,
    /// Path layout of the protected areas.
    pub paths: PathPolicy,
    /// Audit sink settings.
    pub audit: AuditConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            endpoints: IdentityEndpoints::default(),
            paths: PathPolicy::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl GateConfig {
    /// Loads configuration from the environment-selected path.
    ///
    /// Uses `ACCESS_GATE_CONFIG` when set, otherwise `access-gate.toml` in
    /// the working directory. A missing default file yields the built-in
    /// defaults; a missing explicitly-configured file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`GateConfigError`] on read, parse, or validation failure.
    pub fn load() -> Result<Self, GateConfigError> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load_from_path(Path::new(&path)),
            Err(_) => {
                let default = Path::new(DEFAULT_CONFIG_NAME);
                if default.exists() {
                    Self::load_from_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`GateConfigError`] on read, parse, or validation failure.
    pub fn load_from_path(path: &Path) -> Result<Self, GateConfigError> {
        let text = fs::read_to_string(path).map_err(|err| GateConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        if text.len() > MAX_CONFIG_FILE_SIZE {
            return Err(GateConfigError::TooLarge(text.len()));
        }
        Self::from_toml_str(&text)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`GateConfigError`] on parse or validation failure.
    pub fn from_toml_str(text: &str) -> Result<Self, GateConfigError> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|err| GateConfigError::Parse(err.to_string()))?;
        Self::from_file(file)
    }

    /// Converts the parsed file into validated runtime configuration.
    fn from_file(file: ConfigFile) -> Result<Self, GateConfigError> {
        let defaults = IdentityEndpoints::default();
        let endpoints = IdentityEndpoints {
            base_url: file.endpoints.base_url.unwrap_or(defaults.base_url),
            identity_path: file.endpoints.identity_path.unwrap_or(defaults.identity_path),
            refresh_path: file.endpoints.refresh_path.unwrap_or(defaults.refresh_path),
            timeout_ms: file.endpoints.timeout_ms.unwrap_or(defaults.timeout_ms),
            user_agent: file.endpoints.user_agent.unwrap_or(defaults.user_agent),
        };
        validate_endpoints(&endpoints)?;

        let path_defaults = PathPolicy::default();
        let paths = match file.paths {
            None => path_defaults,
            Some(section) => {
                validate_path_lengths(&section)?;
                let defaults = DefaultPaths::new();
                PathPolicy::new(
                    section.instructor_prefix.unwrap_or(defaults.instructor_prefix),
                    section.student_prefix.unwrap_or(defaults.student_prefix),
                    section.onboarding_prefix.unwrap_or(defaults.onboarding_prefix),
                    section.invitation_prefix.unwrap_or(defaults.invitation_prefix),
                    section.instructor_login.unwrap_or(defaults.instructor_login),
                    section.student_login.unwrap_or(defaults.student_login),
                    section.auth_routes.unwrap_or(defaults.auth_routes),
                    section.role_selection.unwrap_or(defaults.role_selection),
                )?
            }
        };

        let audit = AuditConfig {
            mode: file.audit.mode.unwrap_or_default(),
            path: file.audit.path,
        };
        if audit.mode == AuditMode::File && audit.path.is_none() {
            return Err(GateConfigError::Validation(
                "audit mode 'file' requires audit.path".to_string(),
            ));
        }

        Ok(Self {
            endpoints,
            paths,
            audit,
        })
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates endpoint configuration bounds and URL shape.
fn validate_endpoints(endpoints: &IdentityEndpoints) -> Result<(), GateConfigError> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&endpoints.timeout_ms) {
        return Err(GateConfigError::Validation(format!(
            "endpoints.timeout_ms must be within {MIN_TIMEOUT_MS}..={MAX_TIMEOUT_MS}, got {}",
            endpoints.timeout_ms
        )));
    }
    let url = Url::parse(&endpoints.base_url)
        .map_err(|err| GateConfigError::Validation(format!("endpoints.base_url: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GateConfigError::Validation(format!(
            "endpoints.base_url must be http or https, got {}",
            url.scheme()
        )));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(GateConfigError::Validation(
            "endpoints.base_url must not embed credentials".to_string(),
        ));
    }
    for (field, path) in [
        ("endpoints.identity_path", &endpoints.identity_path),
        ("endpoints.refresh_path", &endpoints.refresh_path),
    ] {
        if !path.starts_with('/') {
            return Err(GateConfigError::Validation(format!("{field} must start with '/'")));
        }
        if path.len() > MAX_PATH_LENGTH {
            return Err(GateConfigError::Validation(format!("{field} exceeds length limit")));
        }
    }
    Ok(())
}

/// Validates counts and lengths of the paths section before policy checks.
fn validate_path_lengths(section: &PathsSection) -> Result<(), GateConfigError> {
    if let Some(routes) = &section.auth_routes {
        if routes.len() > MAX_AUTH_ROUTES {
            return Err(GateConfigError::Validation(format!(
                "paths.auth_routes exceeds {MAX_AUTH_ROUTES} entries"
            )));
        }
        for route in routes {
            if route.len() > MAX_PATH_LENGTH {
                return Err(GateConfigError::Validation(
                    "paths.auth_routes entry exceeds length limit".to_string(),
                ));
            }
        }
    }
    let fields = [
        ("paths.instructor_prefix", &section.instructor_prefix),
        ("paths.student_prefix", &section.student_prefix),
        ("paths.onboarding_prefix", &section.onboarding_prefix),
        ("paths.invitation_prefix", &section.invitation_prefix),
        ("paths.instructor_login", &section.instructor_login),
        ("paths.student_login", &section.student_login),
        ("paths.role_selection", &section.role_selection),
    ];
    for (field, value) in fields {
        if let Some(value) = value
            && value.len() > MAX_PATH_LENGTH
        {
            return Err(GateConfigError::Validation(format!("{field} exceeds length limit")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: File Mirror
// ============================================================================

/// Raw TOML file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// `[endpoints]` section.
    #[serde(default)]
    endpoints: EndpointsSection,
    /// `[paths]` section.
    #[serde(default)]
    paths: Option<PathsSection>,
    /// `[audit]` section.
    #[serde(default)]
    audit: AuditSection,
}

/// `[endpoints]` section mirror.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EndpointsSection {
    /// Backend base URL.
    base_url: Option<String>,
    /// Identity endpoint path.
    identity_path: Option<String>,
    /// Refresh endpoint path.
    refresh_path: Option<String>,
    /// Outbound call timeout in milliseconds.
    timeout_ms: Option<u64>,
    /// Outbound user agent.
    user_agent: Option<String>,
}

/// `[paths]` section mirror.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathsSection {
    /// Instructor dashboard prefix.
    instructor_prefix: Option<String>,
    /// Student dashboard prefix.
    student_prefix: Option<String>,
    /// Onboarding area prefix.
    onboarding_prefix: Option<String>,
    /// Invitation area prefix.
    invitation_prefix: Option<String>,
    /// Instructor login page.
    instructor_login: Option<String>,
    /// Student login page.
    student_login: Option<String>,
    /// Auth page list.
    auth_routes: Option<Vec<String>>,
    /// Role-selection page.
    role_selection: Option<String>,
}

/// `[audit]` section mirror.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuditSection {
    /// Sink selection.
    mode: Option<AuditMode>,
    /// Target file for file mode.
    path: Option<PathBuf>,
}

/// Default path layout used to fill unspecified fields.
struct DefaultPaths {
    /// Instructor dashboard prefix.
    instructor_prefix: String,
    /// Student dashboard prefix.
    student_prefix: String,
    /// Onboarding area prefix.
    onboarding_prefix: String,
    /// Invitation area prefix.
    invitation_prefix: String,
    /// Instructor login page.
    instructor_login: String,
    /// Student login page.
    student_login: String,
    /// Auth page list.
    auth_routes: Vec<String>,
    /// Role-selection page.
    role_selection: String,
}

impl DefaultPaths {
    /// Mirrors [`PathPolicy::default`] as raw strings for field-wise fill-in.
    fn new() -> Self {
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
