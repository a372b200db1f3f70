// crates/clump/src/values/path.rs
// ============================================================================
// Module: values::path
// Description: Filesystem path parsing with existence and kind checks.
// Purpose: Validate path arguments against the filesystem at parse time.
// Dependencies: clap
// ============================================================================

//! ## Overview
//! [`PathValueParser`] yields [`PathBuf`] values, optionally requiring
//! the path to exist and to be a file or a directory. Paths need not be
//! valid UTF-8; tokens pass through as OS strings untouched. The checks
//! stop at existence and kind: readability and permissions are left to
//! the operation that eventually opens the path, which is the only place
//! the answer cannot race.

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::builder::TypedValueParser;

use crate::values::MetavarHint;
use crate::values::validation_error;

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parses path tokens with optional existence and kind requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathValueParser {
    /// Whether the path must exist at parse time.
    must_exist: bool,
    /// Whether an existing path may be a regular file.
    file_ok: bool,
    /// Whether an existing path may be a directory.
    dir_ok: bool,
}

impl PathValueParser {
    /// Creates a parser that accepts any path, existing or not.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            must_exist: false,
            file_ok: true,
            dir_ok: true,
        }
    }

    /// Creates a parser requiring an existing path of either kind.
    #[must_use]
    pub const fn existing_path() -> Self {
        Self {
            must_exist: true,
            file_ok: true,
            dir_ok: true,
        }
    }

    /// Creates a parser requiring an existing regular file.
    #[must_use]
    pub const fn existing_file() -> Self {
        Self {
            must_exist: true,
            file_ok: true,
            dir_ok: false,
        }
    }

    /// Creates a parser requiring an existing directory.
    #[must_use]
    pub const fn existing_dir() -> Self {
        Self {
            must_exist: true,
            file_ok: false,
            dir_ok: true,
        }
    }

    /// Checks `path` against the configured requirements.
    fn check(&self, path: &PathBuf) -> Result<(), String> {
        let display = path.display();
        match std::fs::metadata(path) {
            Err(_) => {
                if self.must_exist {
                    Err(format!("path '{display}' does not exist"))
                } else {
                    Ok(())
                }
            }
            Ok(meta) => {
                if meta.is_dir() && !self.dir_ok {
                    Err(format!("'{display}' is a directory, expected a file"))
                } else if meta.is_file() && !self.file_ok {
                    Err(format!("'{display}' is a file, expected a directory"))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Default for PathValueParser {
    fn default() -> Self {
        Self::any()
    }
}

impl TypedValueParser for PathValueParser {
    type Value = PathBuf;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let path = PathBuf::from(value.to_os_string());
        self.check(&path)
            .map_err(|message| validation_error(cmd, arg, &message))?;
        Ok(path)
    }
}

impl MetavarHint for PathValueParser {
    fn metavar(&self) -> String {
        match (self.file_ok, self.dir_ok) {
            (true, false) => "FILE".to_owned(),
            (false, true) => "DIRECTORY".to_owned(),
            _ => "PATH".to_owned(),
        }
    }
}
