// crates/access-gate-core/src/core/cookies.rs
// ============================================================================
// Module: Request Cookie Handling
// Description: Cookie header parsing, deduplication, and credential bundles.
// Purpose: Extract auth credentials from untrusted request cookie headers.
// Dependencies: crate::core::identity, urlencoding
// ============================================================================

//! ## Overview
//! Request cookies are untrusted input: names may repeat, values may carry
//! stale or double-applied percent encoding, and the header may be split
//! across multiple lines by the client. Parsing collapses duplicates to the
//! first occurrence and records the duplicated names so the resolver can
//! flag them, and never fails: a malformed pair is skipped, not fatal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identity::SessionInfo;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Cookie name carrying the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Cookie name carrying the long-lived refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

// ============================================================================
// SECTION: Request Cookies
// ============================================================================

/// Deduplicated cookies parsed from a request `Cookie` header.
///
/// # Invariants
/// - `entries` holds at most one value per cookie name; the first occurrence
///   in the header wins.
/// - `duplicates` lists every name that appeared more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    /// Parsed name/value pairs in header order, first occurrence per name.
    entries: Vec<(String, String)>,
    /// Names that occurred more than once in the raw header.
    duplicates: Vec<String>,
}

impl RequestCookies {
    /// Parses a raw `Cookie` header into deduplicated name/value pairs.
    ///
    /// Values are percent-decoded defensively: when decoding fails the raw
    /// value is kept as-is. Pairs without an `=` separator are ignored.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut duplicates: Vec<String> = Vec::new();
        for pair in header.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if entries.iter().any(|(existing, _)| existing == name) {
                if !duplicates.iter().any(|existing| existing == name) {
                    duplicates.push(name.to_string());
                }
                continue;
            }
            entries.push((name.to_string(), decode_defensively(value.trim())));
        }
        Self {
            entries,
            duplicates,
        }
    }

    /// Returns the value for a cookie name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the names that appeared more than once in the header.
    #[must_use]
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Returns true when no cookies were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the URL-encoded `Cookie` header forwarded to the backend.
    #[must_use]
    pub fn forwarded_header(&self) -> String {
        self.forwarded_header_with_tokens(None, None)
    }

    /// Builds the forwarded header with the auth token values replaced.
    ///
    /// Used after a refresh: the renewed access/refresh tokens substitute the
    /// originally held ones while every other cookie is forwarded unchanged.
    /// A replacement for a cookie the request never carried is appended.
    #[must_use]
    pub fn forwarded_header_with_tokens(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.entries.len() + 2);
        for (name, value) in &self.entries {
            let replaced = match name.as_str() {
                ACCESS_TOKEN_COOKIE => access_token,
                REFRESH_TOKEN_COOKIE => refresh_token,
                _ => None,
            };
            let value = replaced.unwrap_or(value.as_str());
            parts.push(format!("{name}={}", urlencoding::encode(value)));
        }
        if self.get(ACCESS_TOKEN_COOKIE).is_none()
            && let Some(token) = access_token
        {
            parts.push(format!("{ACCESS_TOKEN_COOKIE}={}", urlencoding::encode(token)));
        }
        if self.get(REFRESH_TOKEN_COOKIE).is_none()
            && let Some(token) = refresh_token
        {
            parts.push(format!("{REFRESH_TOKEN_COOKIE}={}", urlencoding::encode(token)));
        }
        parts.join("; ")
    }
}

// ============================================================================
// SECTION: Credential Bundle
// ============================================================================

/// Per-request credentials: parsed cookies plus an optional framework session.
///
/// # Invariants
/// - Read-only for the lifetime of one gate invocation; the gate never
///   persists or mutates credentials, it only forwards or clears them.
#[derive(Debug, Clone, Default)]
pub struct CredentialBundle {
    /// Deduplicated request cookies.
    cookies: RequestCookies,
    /// Pre-resolved framework session, when the host app provides one.
    session: Option<SessionInfo>,
}

impl CredentialBundle {
    /// Creates a credential bundle from parsed cookies and optional session.
    #[must_use]
    pub const fn new(cookies: RequestCookies, session: Option<SessionInfo>) -> Self {
        Self {
            cookies,
            session,
        }
    }

    /// Returns the access token cookie value, if present.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.cookies.get(ACCESS_TOKEN_COOKIE)
    }

    /// Returns the refresh token cookie value, if present.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.cookies.get(REFRESH_TOKEN_COOKIE)
    }

    /// Returns the framework session, if present.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    /// Returns true when any credential (token or session) is present.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.session.is_some() || self.access_token().is_some()
    }

    /// Returns the parsed request cookies.
    #[must_use]
    pub const fn cookies(&self) -> &RequestCookies {
        &self.cookies
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Percent-decodes a cookie value, keeping the raw value on failure.
fn decode_defensively(value: &str) -> String {
    urlencoding::decode(value).map_or_else(|_| value.to_string(), |decoded| decoded.into_owned())
}
