// crates/clump/src/values/json.rs
// ============================================================================
// Module: values::json
// Description: JSON parsing from inline literals or files on disk.
// Purpose: Accept structured values on the command line, optionally
//          constrained to an expected JSON shape.
// Dependencies: clap, serde_json
// ============================================================================

//! ## Overview
//! [`JsonValueParser`] turns a token into a [`serde_json::Value`]. Three
//! source modes exist: inline literals only, files only, or flexible,
//! where a token naming an existing file is read from disk and anything
//! else parses as a literal. An optional [`JsonShape`] narrows what the
//! parsed document may be, so `--filter` can demand an object and reject
//! a bare string with a clear message.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use clap::builder::TypedValueParser;

use crate::values::MetavarHint;
use crate::values::require_utf8;
use crate::values::validation_error;

// ============================================================================
// SECTION: Shape
// ============================================================================

/// The top-level JSON value kinds a parser can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// JSON null.
    Null,
}

impl JsonShape {
    /// Reports whether `value` has this shape.
    #[must_use]
    pub const fn matches(&self, value: &serde_json::Value) -> bool {
        matches!(
            (self, value),
            (Self::Object, serde_json::Value::Object(_))
                | (Self::Array, serde_json::Value::Array(_))
                | (Self::String, serde_json::Value::String(_))
                | (Self::Number, serde_json::Value::Number(_))
                | (Self::Boolean, serde_json::Value::Bool(_))
                | (Self::Null, serde_json::Value::Null)
        )
    }

    /// Returns the lowercase kind name used in messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

/// Returns the kind name of a parsed value for mismatch messages.
const fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Object(_) => "object",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Null => "null",
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parses tokens into JSON documents from literals, files, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonValueParser {
    /// Whether tokens may be inline JSON literals.
    from_literal: bool,
    /// Whether tokens may name JSON files on disk.
    from_path: bool,
    /// Required top-level shape, when constrained.
    expected: Option<JsonShape>,
}

impl JsonValueParser {
    /// Creates a parser accepting inline JSON literals only.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            from_literal: true,
            from_path: false,
            expected: None,
        }
    }

    /// Creates a parser that reads JSON from a named file only.
    #[must_use]
    pub const fn path() -> Self {
        Self {
            from_literal: false,
            from_path: true,
            expected: None,
        }
    }

    /// Creates a parser that reads a token naming an existing file from
    /// disk and parses any other token as an inline literal.
    #[must_use]
    pub const fn flexible() -> Self {
        Self {
            from_literal: true,
            from_path: true,
            expected: None,
        }
    }

    /// Requires the parsed document to have the given top-level shape.
    #[must_use]
    pub const fn expect(mut self, shape: JsonShape) -> Self {
        self.expected = Some(shape);
        self
    }

    /// Parses `text` under the configured source modes.
    fn parse_text(&self, text: &str) -> Result<serde_json::Value, String> {
        let candidate = Path::new(text);
        if self.from_path && candidate.is_file() {
            let raw = fs::read_to_string(candidate)
                .map_err(|error| format!("could not read '{text}': {error}"))?;
            return serde_json::from_str(&raw)
                .map_err(|error| format!("'{text}' does not contain valid JSON: {error}"));
        }
        if self.from_path && !self.from_literal {
            return Err(format!("file '{text}' does not exist"));
        }
        serde_json::from_str(text).map_err(|error| format!("'{text}' is not valid JSON: {error}"))
    }

    /// Enforces the expected shape on a parsed document.
    fn check_shape(&self, value: serde_json::Value) -> Result<serde_json::Value, String> {
        match self.expected {
            Some(shape) if !shape.matches(&value) => Err(format!(
                "expected a JSON {}, got a JSON {}",
                shape.name(),
                kind_name(&value)
            )),
            _ => Ok(value),
        }
    }
}

impl Default for JsonValueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedValueParser for JsonValueParser {
    type Value = serde_json::Value;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let text = require_utf8(cmd, arg, value)?;
        self.parse_text(text)
            .and_then(|parsed| self.check_shape(parsed))
            .map_err(|message| validation_error(cmd, arg, &message))
    }
}

impl MetavarHint for JsonValueParser {
    fn metavar(&self) -> String {
        if self.from_path && !self.from_literal {
            "JSON_FILE".to_owned()
        } else {
            "JSON".to_owned()
        }
    }
}
