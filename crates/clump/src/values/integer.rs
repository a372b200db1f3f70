// crates/clump/src/values/integer.rs
// ============================================================================
// Module: values::integer
// Description: Integer parsing with configurable radix and prefix handling.
// Purpose: Accept integers in bases 2-36 or auto-detect the base from a
//          prefix, with a text-preserving variant for passthrough use.
// Dependencies: clap
// ============================================================================

//! ## Overview
//! [`IntegerValueParser`] parses command-line tokens into `i64` under a
//! configurable base. Base 10 is the default; bases 2, 8, and 16 accept
//! their conventional `0b`, `0o`, and `0x` prefixes; base 0 auto-detects
//! the base from the prefix and treats other leading zeros as errors, the
//! convention C and Python share. The sign, when present, precedes the
//! prefix: `-0x10` is minus sixteen.
//!
//! [`IntegerTextValueParser`] applies the same validation but yields the
//! original token as a `String`, for commands that forward numeric
//! arguments to another process or protocol without reformatting them.

use std::ffi::OsStr;

use clap::builder::TypedValueParser;

use crate::values::MetavarHint;
use crate::values::require_utf8;
use crate::values::validation_error;

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parses integer tokens into `i64` under a configurable base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerValueParser {
    /// Radix for digit interpretation: 2 through 36, or 0 to auto-detect
    /// from a `0x`/`0o`/`0b` prefix.
    base: u32,
}

impl IntegerValueParser {
    /// Creates a base-10 parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: 10,
        }
    }

    /// Creates a parser for the given base.
    ///
    /// Accepts 2 through 36, or 0 for prefix auto-detection. Any other
    /// base is rejected when a value is parsed, not at construction.
    #[must_use]
    pub const fn with_base(base: u32) -> Self {
        Self {
            base,
        }
    }

    /// Returns the configured base.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Validates and parses `text` under the configured base.
    fn parse_text(&self, text: &str) -> Result<i64, IntegerParseError> {
        let trimmed = text.trim();
        if !(self.base == 0 || (2 ..= 36).contains(&self.base)) {
            return Err(IntegerParseError::UnsupportedBase(self.base));
        }
        let (sign, magnitude) = split_sign(trimmed);
        let (radix, digits) = match self.base {
            0 => detect_base(magnitude).ok_or(IntegerParseError::Invalid)?,
            16 | 8 | 2 => (self.base, strip_prefix_for(magnitude, self.base)),
            other => (other, magnitude),
        };
        if digits.is_empty() {
            return Err(IntegerParseError::Invalid);
        }
        let signed = format!("{sign}{digits}");
        i64::from_str_radix(&signed, radix).map_err(|_| {
            // from_str_radix conflates bad digits and overflow; a token
            // made of valid digits can only have failed by overflowing.
            if digits.chars().all(|c| c.is_digit(radix)) {
                IntegerParseError::OutOfRange
            } else {
                IntegerParseError::Invalid
            }
        })
    }

    /// Formats the failure message for `text` under the configured base.
    fn failure_message(&self, text: &str, error: IntegerParseError) -> String {
        match error {
            IntegerParseError::Invalid => {
                if self.base == 10 || self.base == 0 {
                    format!("'{text}' is not a valid integer")
                } else {
                    format!("'{text}' is not a valid integer in base {}", self.base)
                }
            }
            IntegerParseError::OutOfRange => {
                format!("'{text}' is out of range for a 64-bit integer")
            }
            IntegerParseError::UnsupportedBase(base) => {
                format!("integer base {base} is not supported")
            }
        }
    }
}

impl Default for IntegerValueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedValueParser for IntegerValueParser {
    type Value = i64;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let text = require_utf8(cmd, arg, value)?;
        self.parse_text(text)
            .map_err(|error| validation_error(cmd, arg, &self.failure_message(text, error)))
    }
}

impl MetavarHint for IntegerValueParser {
    fn metavar(&self) -> String {
        "INTEGER".to_owned()
    }
}

// ============================================================================
// SECTION: Text-preserving parser
// ============================================================================

/// Validates integer tokens but yields the original text unchanged.
///
/// Useful when a command relays numeric arguments verbatim and must not
/// normalize `0x10` into `16` or strip an explicit `+` sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerTextValueParser {
    /// Validation rules, shared with the converting parser.
    inner: IntegerValueParser,
}

impl IntegerTextValueParser {
    /// Creates a base-10 validating passthrough parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: IntegerValueParser::new(),
        }
    }

    /// Creates a validating passthrough parser for the given base.
    #[must_use]
    pub const fn with_base(base: u32) -> Self {
        Self {
            inner: IntegerValueParser::with_base(base),
        }
    }
}

impl Default for IntegerTextValueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedValueParser for IntegerTextValueParser {
    type Value = String;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let text = require_utf8(cmd, arg, value)?;
        match self.inner.parse_text(text) {
            Ok(_) => Ok(text.to_owned()),
            Err(error) => {
                Err(validation_error(cmd, arg, &self.inner.failure_message(text, error)))
            }
        }
    }
}

impl MetavarHint for IntegerTextValueParser {
    fn metavar(&self) -> String {
        self.inner.metavar()
    }
}

// ============================================================================
// SECTION: Parsing internals
// ============================================================================

/// Failure modes distinguished for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntegerParseError {
    /// The token is not a number under the effective base.
    Invalid,
    /// The token is numeric but does not fit in an `i64`.
    OutOfRange,
    /// The configured base is outside 2-36 and is not 0.
    UnsupportedBase(u32),
}

/// Splits an optional leading sign from the rest of the token.
fn split_sign(text: &str) -> (&'static str, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        ("-", rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        ("+", rest)
    } else {
        ("", text)
    }
}

/// Auto-detects the base of an unsigned magnitude for base 0.
///
/// Recognizes `0x`/`0X`, `0o`/`0O`, and `0b`/`0B` prefixes, allows a
/// bare `0`, and rejects any other magnitude with a leading zero so that
/// `010` cannot silently mean either eight or ten.
fn detect_base(magnitude: &str) -> Option<(u32, &str)> {
    if let Some(rest) = strip_ignore_case(magnitude, "0x") {
        return Some((16, rest));
    }
    if let Some(rest) = strip_ignore_case(magnitude, "0o") {
        return Some((8, rest));
    }
    if let Some(rest) = strip_ignore_case(magnitude, "0b") {
        return Some((2, rest));
    }
    if magnitude.len() > 1 && magnitude.starts_with('0') {
        return None;
    }
    Some((10, magnitude))
}

/// Strips the conventional prefix for an explicit base 16, 8, or 2.
fn strip_prefix_for(magnitude: &str, base: u32) -> &str {
    let prefix = match base {
        16 => "0x",
        8 => "0o",
        _ => "0b",
    };
    strip_ignore_case(magnitude, prefix).unwrap_or(magnitude)
}

/// Strips a two-character prefix, matching its second letter in either case.
fn strip_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let lower = text.get(.. prefix.len())?;
    if lower.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len() ..)
    } else {
        None
    }
}
