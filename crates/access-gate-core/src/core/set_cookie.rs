// crates/access-gate-core/src/core/set_cookie.rs
// ============================================================================
// Module: Set-Cookie Parsing
// Description: Typed parser for Set-Cookie response headers.
// Purpose: Extract renewed auth tokens from refresh-endpoint responses.
// Dependencies: crate::core::cookies, urlencoding
// ============================================================================

//! ## Overview
//! The refresh endpoint reports renewed tokens through `Set-Cookie` response
//! headers. Rather than pattern-matching raw header text, this module parses
//! each header into a structured name/value/attributes triple and extracts
//! the token pair from the result. Values are percent-decoded defensively:
//! a value that fails to decode is used as-is, because rejecting it would
//! discard a token the backend just issued.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::cookies::ACCESS_TOKEN_COOKIE;
use crate::core::cookies::REFRESH_TOKEN_COOKIE;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single attribute of a `Set-Cookie` header, such as `Path=/` or `Secure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttribute {
    /// Attribute name as written, case preserved.
    pub name: String,
    /// Attribute value, `None` for flag attributes like `HttpOnly`.
    pub value: Option<String>,
}

/// A parsed `Set-Cookie` header.
///
/// # Invariants
/// - `name` is non-empty.
/// - `value` is percent-decoded when decodable, raw otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value after defensive decoding.
    pub value: String,
    /// Trailing attributes in header order.
    pub attributes: Vec<CookieAttribute>,
}

impl SetCookie {
    /// Parses one `Set-Cookie` header value.
    ///
    /// Returns `None` when the header has no leading `name=value` pair.
    #[must_use]
    pub fn parse(header: &str) -> Option<Self> {
        let mut segments = header.split(';');
        let first = segments.next()?.trim();
        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = decode_defensively(value.trim());
        let mut attributes = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (attr_name, attr_value) = match segment.split_once('=') {
                Some((attr_name, attr_value)) => {
                    (attr_name.trim(), Some(attr_value.trim().to_string()))
                }
                None => (segment, None),
            };
            attributes.push(CookieAttribute {
                name: attr_name.to_string(),
                value: attr_value,
            });
        }
        Some(Self {
            name: name.to_string(),
            value,
            attributes,
        })
    }
}

// ============================================================================
// SECTION: Token Extraction
// ============================================================================

/// Renewed token values harvested from refresh-response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    /// Renewed access token, when the response carried one.
    pub access_token: Option<String>,
    /// Renewed refresh token, when the response carried one.
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Extracts auth tokens from a list of `Set-Cookie` header values.
    ///
    /// Malformed headers are skipped; the first occurrence of each token
    /// name wins.
    #[must_use]
    pub fn from_headers(headers: &[String]) -> Self {
        let mut pair = Self::default();
        for header in headers {
            let Some(cookie) = SetCookie::parse(header) else {
                continue;
            };
            match cookie.name.as_str() {
                ACCESS_TOKEN_COOKIE if pair.access_token.is_none() => {
                    pair.access_token = Some(cookie.value);
                }
                REFRESH_TOKEN_COOKIE if pair.refresh_token.is_none() => {
                    pair.refresh_token = Some(cookie.value);
                }
                _ => {}
            }
        }
        pair
    }

    /// Returns true when neither token was extracted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Percent-decodes a cookie value, keeping the raw value on failure.
fn decode_defensively(value: &str) -> String {
    urlencoding::decode(value).map_or_else(|_| value.to_string(), |decoded| decoded.into_owned())
}
