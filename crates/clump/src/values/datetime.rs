// crates/clump/src/values/datetime.rs
// ============================================================================
// Module: values::datetime
// Description: Date/time parsing against an ordered list of formats.
// Purpose: Turn command-line tokens into PrimitiveDateTime values and
//          surface the accepted formats in the metavar.
// Dependencies: clap, time, thiserror
// ============================================================================

//! ## Overview
//! [`DateTimeValueParser`] tries an ordered list of formats against each
//! token and yields the first match as a [`PrimitiveDateTime`]. Formats
//! that describe a bare date complete to midnight. Each format carries a
//! human-readable display form (such as `YYYY-MM-DD`) that, by default,
//! becomes the parameter's metavar so the help screen documents exactly
//! what the parser accepts.
//!
//! [`DateTimeValueParser::flexible`] switches to the well-known interchange
//! formats instead: RFC 3339, then RFC 2822, then ISO 8601. Offset-aware
//! inputs are normalized to UTC before the offset is dropped.

use std::ffi::OsStr;

use clap::builder::TypedValueParser;
use thiserror::Error;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;
use time::UtcOffset;
use time::format_description;
use time::format_description::BorrowedFormatItem;
use time::format_description::OwnedFormatItem;
use time::format_description::well_known::Iso8601;
use time::format_description::well_known::Rfc2822;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description as static_format;

use crate::values::MetavarHint;
use crate::values::require_utf8;
use crate::values::validation_error;

// ============================================================================
// SECTION: Default formats
// ============================================================================

/// Display form and compiled description of the default formats, tried
/// in order: full date/time with a space, with a `T`, then bare date.
const DEFAULT_FORMATS: [(&str, &[BorrowedFormatItem<'static>]); 3] = [
    (
        "YYYY-MM-DD HH:MM:SS",
        static_format!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ),
    (
        "YYYY-MM-DDTHH:MM:SS",
        static_format!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ),
    ("YYYY-MM-DD", static_format!("[year]-[month]-[day]")),
];

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parses date/time tokens against an ordered list of formats.
#[derive(Debug, Clone)]
pub struct DateTimeValueParser {
    /// Formats tried in order; the first match wins.
    formats: Vec<DateTimeFormat>,
    /// Whether the metavar lists the format display forms.
    formats_in_metavar: bool,
    /// Whether to parse the well-known interchange formats instead of
    /// the configured list.
    flexible: bool,
}

impl DateTimeValueParser {
    /// Creates a parser accepting `YYYY-MM-DD HH:MM:SS`,
    /// `YYYY-MM-DDTHH:MM:SS`, and `YYYY-MM-DD`, in that order.
    #[must_use]
    pub fn new() -> Self {
        let formats = DEFAULT_FORMATS
            .iter()
            .map(|(display, items)| DateTimeFormat {
                display: (*display).to_owned(),
                compiled: CompiledFormat::Static(items),
            })
            .collect();
        Self {
            formats,
            formats_in_metavar: true,
            flexible: false,
        }
    }

    /// Creates a parser with custom formats, tried in the given order.
    ///
    /// Each entry pairs a display form for help output with a
    /// [format description] compiled at construction, so malformed
    /// descriptions fail when the command is assembled rather than on
    /// first use.
    ///
    /// [format description]: https://time-rs.github.io/book/api/format-description.html
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDateTimeFormat`] when a description does not
    /// compile.
    pub fn with_formats(specs: &[(&str, &str)]) -> Result<Self, InvalidDateTimeFormat> {
        let mut formats = Vec::with_capacity(specs.len());
        for (display, description) in specs {
            let items = format_description::parse_owned::<2>(description).map_err(|source| {
                InvalidDateTimeFormat {
                    description: (*description).to_owned(),
                    source,
                }
            })?;
            formats.push(DateTimeFormat {
                display: (*display).to_owned(),
                compiled: CompiledFormat::Owned(items),
            });
        }
        Ok(Self {
            formats,
            formats_in_metavar: true,
            flexible: false,
        })
    }

    /// Creates a parser for the well-known interchange formats: RFC 3339,
    /// RFC 2822, then ISO 8601. Offset-aware inputs normalize to UTC.
    #[must_use]
    pub fn flexible() -> Self {
        Self {
            formats: Vec::new(),
            formats_in_metavar: false,
            flexible: true,
        }
    }

    /// Controls whether the metavar lists the accepted format display
    /// forms. On by default; when off the metavar is `DATETIME`.
    #[must_use]
    pub fn formats_in_metavar(mut self, show: bool) -> Self {
        self.formats_in_metavar = show;
        self
    }

    /// Parses `text` against the configured format list.
    fn parse_listed(&self, text: &str) -> Option<PrimitiveDateTime> {
        for format in &self.formats {
            if let Ok(parsed) = format.compiled.parse_datetime(text) {
                return Some(parsed);
            }
            // A date-only format completes to midnight.
            if let Ok(date) = format.compiled.parse_date(text) {
                return Some(PrimitiveDateTime::new(date, Time::MIDNIGHT));
            }
        }
        None
    }

    /// Parses `text` against the well-known interchange formats.
    fn parse_flexible(text: &str) -> Option<PrimitiveDateTime> {
        if let Ok(parsed) = OffsetDateTime::parse(text, &Rfc3339) {
            return Some(drop_offset(parsed));
        }
        if let Ok(parsed) = OffsetDateTime::parse(text, &Rfc2822) {
            return Some(drop_offset(parsed));
        }
        PrimitiveDateTime::parse(text, &Iso8601::DEFAULT).ok()
    }

    /// Formats the failure message for an unparseable token.
    fn failure_message(&self, text: &str) -> String {
        if self.flexible {
            format!("'{text}' is not a recognized date/time (expected RFC 3339, RFC 2822, or ISO 8601)")
        } else {
            format!("'{text}' does not match any accepted format ({})", self.display_list())
        }
    }

    /// Joins the display forms of the configured formats.
    fn display_list(&self) -> String {
        let displays: Vec<&str> = self.formats.iter().map(|f| f.display.as_str()).collect();
        displays.join(" | ")
    }
}

impl Default for DateTimeValueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedValueParser for DateTimeValueParser {
    type Value = PrimitiveDateTime;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let text = require_utf8(cmd, arg, value)?.trim();
        let parsed = if self.flexible {
            Self::parse_flexible(text)
        } else {
            self.parse_listed(text)
        };
        parsed.ok_or_else(|| validation_error(cmd, arg, &self.failure_message(text)))
    }
}

impl MetavarHint for DateTimeValueParser {
    fn metavar(&self) -> String {
        if self.flexible || !self.formats_in_metavar || self.formats.is_empty() {
            "DATETIME".to_owned()
        } else {
            format!("[{}]", self.display_list())
        }
    }
}

// ============================================================================
// SECTION: Format storage
// ============================================================================

/// One accepted format: its help display form and compiled description.
#[derive(Debug, Clone)]
struct DateTimeFormat {
    /// Human-readable form shown in metavars and error messages.
    display: String,
    /// Compiled description used for parsing.
    compiled: CompiledFormat,
}

/// Compiled format items, borrowed for the built-in formats and owned
/// for formats compiled at runtime.
#[derive(Debug, Clone)]
enum CompiledFormat {
    /// Items compiled at build time from a literal description.
    Static(&'static [BorrowedFormatItem<'static>]),
    /// Items compiled at construction from a caller description.
    Owned(OwnedFormatItem),
}

impl CompiledFormat {
    /// Parses a full date/time.
    fn parse_datetime(&self, text: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
        match self {
            Self::Static(items) => PrimitiveDateTime::parse(text, items),
            Self::Owned(items) => PrimitiveDateTime::parse(text, items),
        }
    }

    /// Parses a bare date, succeeding only for date-only descriptions.
    fn parse_date(&self, text: &str) -> Result<Date, time::error::Parse> {
        match self {
            Self::Static(items) => Date::parse(text, items),
            Self::Owned(items) => Date::parse(text, items),
        }
    }
}

/// Normalizes an offset-aware value to UTC and drops the offset.
fn drop_offset(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A format description that failed to compile.
#[derive(Debug, Error)]
#[error("invalid date/time format description '{description}': {source}")]
pub struct InvalidDateTimeFormat {
    /// The offending description text.
    description: String,
    /// The compiler's diagnosis.
    source: time::error::InvalidFormatDescription,
}
