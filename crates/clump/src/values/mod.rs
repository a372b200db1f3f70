// crates/clump/src/values/mod.rs
// ============================================================================
// Module: values
// Description: Typed value parsers shared by options and positionals.
// Purpose: Provide reusable clap value parsers with self-describing metavars.
// Dependencies: clap
// ============================================================================

//! ## Overview
//! Each parser in this module implements clap's [`TypedValueParser`]
//! seam, so it plugs into any [`clap::Arg`] directly, plus the local
//! [`MetavarHint`] trait, which lets parameter builders derive a
//! placeholder name for help and usage text from the parser itself.
//!
//! The parsers produce owned values (`PrimitiveDateTime`, `i64`,
//! `String`, `serde_json::Value`, `PathBuf`) that callers read back with
//! [`clap::ArgMatches::get_one`] under the matching type.
//!
//! [`TypedValueParser`]: clap::builder::TypedValueParser

pub mod datetime;
pub mod integer;
pub mod json;
pub mod path;

use std::ffi::OsStr;

use clap::error::ErrorKind;

pub use datetime::DateTimeValueParser;
pub use datetime::InvalidDateTimeFormat;
pub use integer::IntegerTextValueParser;
pub use integer::IntegerValueParser;
pub use json::JsonShape;
pub use json::JsonValueParser;
pub use path::PathValueParser;

// ============================================================================
// SECTION: Metavar hint
// ============================================================================

/// Supplies a placeholder name describing the values a parser accepts.
///
/// Parameter builders consult this when the application has not chosen a
/// value name explicitly, so `--when` with a date/time parser renders as
/// `--when [YYYY-MM-DD ...]` instead of `--when WHEN`.
pub trait MetavarHint {
    /// Returns the placeholder text, without surrounding brackets.
    fn metavar(&self) -> String;
}

// ============================================================================
// SECTION: Error helpers
// ============================================================================

/// Builds a value-validation error attributed to `arg` when known.
///
/// clap prints the message verbatim after its `error:` prefix, so the
/// message names the offending argument itself; clap only attributes
/// errors automatically for its built-in parsers.
pub(crate) fn validation_error(
    cmd: &clap::Command,
    arg: Option<&clap::Arg>,
    message: &str,
) -> clap::Error {
    let mut cmd = cmd.clone();
    let text = match arg {
        Some(arg) => format!("invalid value for '{arg}': {message}"),
        None => format!("invalid value: {message}"),
    };
    cmd.error(ErrorKind::ValueValidation, text)
}

/// Decodes a raw argument token as UTF-8 or reports a validation error.
pub(crate) fn require_utf8<'v>(
    cmd: &clap::Command,
    arg: Option<&clap::Arg>,
    value: &'v OsStr,
) -> Result<&'v str, clap::Error> {
    value
        .to_str()
        .ok_or_else(|| validation_error(cmd, arg, "value is not valid UTF-8"))
}
