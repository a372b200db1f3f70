// crates/clump/src/model/settings.rs
// ============================================================================
// Module: model::settings
// Description: Per-command settings that shape parsing and help rendering.
// Purpose: Carry tunable behavior down the command tree with clear defaults.
// Dependencies: help::theme
// ============================================================================

//! ## Overview
//! [`ContextSettings`] collects every tunable knob a command exposes: the
//! spelling of the help flags, the content width cap, requiredness tags,
//! default-value display, column alignment scope, constraint display, and
//! the help theme. A command without its own settings inherits its
//! parent's wholesale; setting any field on a subcommand replaces the
//! inherited block entirely rather than merging field by field.

use crate::help::HelpTheme;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Tunable behavior for one command and, by inheritance, its subtree.
///
/// All fields are public plain data; construct with struct update syntax
/// over [`ContextSettings::default`] to override a subset:
///
/// ```
/// use clump::ContextSettings;
///
/// let settings = ContextSettings {
///     max_content_width: 80,
///     show_defaults: true,
///     ..ContextSettings::default()
/// };
/// assert_eq!(settings.help_option_names, vec!["-h", "--help"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSettings {
    /// Flag spellings that trigger help output. Defaults to `-h` and
    /// `--help`. An empty list disables the help flag entirely.
    pub help_option_names: Vec<String>,
    /// Maximum width of rendered help content in characters.
    pub max_content_width: usize,
    /// Appends a `[required]` tag to required parameters in help output.
    pub tag_required: bool,
    /// Appends an `[optional]` tag to optional parameters in help output.
    pub tag_optional: bool,
    /// Shows `[default: ...]` tags for parameters that have a default and
    /// do not override the choice per parameter.
    pub show_defaults: bool,
    /// Aligns the help columns of all option groups to one shared width
    /// instead of aligning each group independently.
    pub align_option_groups: bool,
    /// Aligns the help columns of all subcommand sections to one shared
    /// width instead of aligning each section independently.
    pub align_sections: bool,
    /// Renders a `Constraints:` section describing command-level
    /// constraints in help output.
    pub show_constraints: bool,
    /// Styles applied to the pieces of the help screen.
    pub theme: HelpTheme,
}

impl ContextSettings {
    /// Splits the configured help flag spellings into long names (without
    /// the `--` prefix) and short characters (without the `-` prefix).
    ///
    /// Spellings that are neither `--long` nor `-x` form are ignored.
    pub(crate) fn help_flags(&self) -> (Vec<String>, Vec<char>) {
        let mut longs = Vec::new();
        let mut shorts = Vec::new();
        for name in &self.help_option_names {
            if let Some(long) = name.strip_prefix("--") {
                if !long.is_empty() {
                    longs.push(long.to_owned());
                }
            } else if let Some(short) = name.strip_prefix('-') {
                let mut chars = short.chars();
                if let (Some(first), None) = (chars.next(), chars.next()) {
                    shorts.push(first);
                }
            }
        }
        (longs, shorts)
    }

    /// Reports whether any usable help flag spelling is configured.
    pub(crate) fn has_help_flag(&self) -> bool {
        let (longs, shorts) = self.help_flags();
        !longs.is_empty() || !shorts.is_empty()
    }

    /// Formats the configured help flags for a help entry, short flags
    /// first, such as `-h, --help`.
    pub(crate) fn help_flag_term(&self) -> String {
        let (longs, shorts) = self.help_flags();
        let mut parts: Vec<String> = Vec::new();
        for short in shorts {
            parts.push(format!("-{short}"));
        }
        for long in longs {
            parts.push(format!("--{long}"));
        }
        parts.join(", ")
    }
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            help_option_names: vec!["-h".to_owned(), "--help".to_owned()],
            max_content_width: 100,
            tag_required: true,
            tag_optional: false,
            show_defaults: false,
            align_option_groups: true,
            align_sections: true,
            show_constraints: false,
            theme: HelpTheme::plain(),
        }
    }
}
