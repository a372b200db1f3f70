// crates/clump/tests/integer_fuzz.rs
// ============================================================================
// Module: Integer Fuzz Tests
// Description: Property-based coverage for integer value parsing.
// Purpose: Ensure radix handling round-trips and never panics.
// ============================================================================
//! ## Overview
//! Property tests for the integer value parsers: explicit radixes
//! round-trip, auto-detection agrees with the explicit forms, and
//! arbitrary tokens never panic the parser.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::ffi::OsStr;

use clap::builder::TypedValueParser;
use clump::IntegerTextValueParser;
use clump::IntegerValueParser;
use proptest::prelude::*;

/// Parses one token, reducing the clap error to a pass/fail answer.
fn parse(parser: &IntegerValueParser, token: &str) -> Option<i64> {
    let probe = clap::Command::new("probe");
    parser.parse_ref(&probe, None, OsStr::new(token)).ok()
}

proptest! {
    #[test]
    fn decimal_round_trips(value in any::<i64>()) {
        let parser = IntegerValueParser::new();
        prop_assert_eq!(parse(&parser, &value.to_string()), Some(value));
    }

    #[test]
    fn hex_round_trips_with_and_without_prefix(value in any::<i64>()) {
        let parser = IntegerValueParser::with_base(16);
        let magnitude = value.unsigned_abs();
        let sign = if value < 0 { "-" } else { "" };
        prop_assert_eq!(parse(&parser, &format!("{sign}{magnitude:x}")), Some(value));
        prop_assert_eq!(parse(&parser, &format!("{sign}0x{magnitude:x}")), Some(value));
    }

    #[test]
    fn auto_detection_agrees_with_each_explicit_base(value in any::<i64>()) {
        let auto = IntegerValueParser::with_base(0);
        let magnitude = value.unsigned_abs();
        let sign = if value < 0 { "-" } else { "" };

        prop_assert_eq!(parse(&auto, &format!("{sign}0x{magnitude:x}")), Some(value));
        prop_assert_eq!(parse(&auto, &format!("{sign}0o{magnitude:o}")), Some(value));
        prop_assert_eq!(parse(&auto, &format!("{sign}0b{magnitude:b}")), Some(value));
    }

    #[test]
    fn arbitrary_tokens_never_panic(token in "\\PC*", base in 0u32..40) {
        let parser = IntegerValueParser::with_base(base);
        let _ = parse(&parser, &token);
    }

    #[test]
    fn passthrough_agrees_with_the_converting_parser(value in any::<i64>(), base in prop_oneof![Just(0u32), Just(2), Just(8), Just(10), Just(16)]) {
        let spelled = match base {
            2 => format!("0b{:b}", value.unsigned_abs()),
            8 => format!("0o{:o}", value.unsigned_abs()),
            16 => format!("0x{:x}", value.unsigned_abs()),
            _ => value.unsigned_abs().to_string(),
        };
        let token = if value < 0 { format!("-{spelled}") } else { spelled };

        let converting = IntegerValueParser::with_base(base);
        let passthrough = IntegerTextValueParser::with_base(base);
        let probe = clap::Command::new("probe");

        let converted = converting.parse_ref(&probe, None, OsStr::new(&token)).ok();
        let preserved = passthrough.parse_ref(&probe, None, OsStr::new(&token)).ok();
        prop_assert_eq!(converted.is_some(), preserved.is_some());
        if let Some(text) = preserved {
            prop_assert_eq!(text, token);
        }
    }
}
