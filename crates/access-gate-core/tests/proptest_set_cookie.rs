// crates/access-gate-core/tests/proptest_set_cookie.rs
// ============================================================================
// Module: Set-Cookie Parser Property Tests
// Description: Property tests over arbitrary and adversarial header input.
// ============================================================================
//! ## Overview
//! The parser handles untrusted backend output; these properties pin down
//! that it never panics, never invents names, and survives arbitrary
//! attribute noise around a well-formed leading pair.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Property tests unwrap on generated fixtures."
)]

use access_gate_core::SetCookie;
use access_gate_core::TokenPair;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_parse_never_panics(header in ".*") {
        let _ = SetCookie::parse(&header);
    }

    #[test]
    fn prop_parsed_name_is_nonempty(header in ".*") {
        if let Some(cookie) = SetCookie::parse(&header) {
            prop_assert!(!cookie.name.is_empty());
        }
    }

    #[test]
    fn prop_well_formed_pair_survives_attribute_noise(
        value in "[A-Za-z0-9._-]{0,64}",
        noise in "[ ;=A-Za-z/-]{0,64}",
    ) {
        let header = format!("access_token={value}; Path=/;{noise}");
        let cookie = SetCookie::parse(&header).unwrap();
        prop_assert_eq!(cookie.name, "access_token");
        prop_assert_eq!(cookie.value, value);
    }

    #[test]
    fn prop_token_extraction_never_panics(headers in proptest::collection::vec(".*", 0..8)) {
        let _ = TokenPair::from_headers(&headers);
    }

    #[test]
    fn prop_percent_encoded_value_roundtrips(value in "[ -~]{0,48}") {
        let encoded = urlencoding::encode(&value);
        let header = format!("refresh_token={encoded}; HttpOnly");
        let cookie = SetCookie::parse(&header).unwrap();
        prop_assert_eq!(cookie.value, value);
    }
}
