// crates/clump/src/help/theme.rs
// ============================================================================
// Module: help::theme
// Description: Style slots applied to the individual pieces of a help screen.
// Purpose: Let applications recolor help output without touching the layout.
// Dependencies: clap (styling re-export of anstyle)
// ============================================================================

//! ## Overview
//! A [`HelpTheme`] assigns an ANSI [`Style`] to each visual slot of a help
//! screen: the invoked command in the usage line, section headings, the
//! two help columns, constraint annotations, and the epilog. The default
//! theme is plain (every slot renders no escape codes), so themed and
//! unthemed output share one code path.
//!
//! Styles come from `clap::builder::styling`, clap's re-export of the
//! `anstyle` crate, so a theme composes with styles an application already
//! uses for clap itself.

use clap::builder::styling::AnsiColor;
use clap::builder::styling::Color;
use clap::builder::styling::Style;

// ============================================================================
// SECTION: Theme
// ============================================================================

/// Styles for each visual slot of a rendered help screen.
///
/// Slots left at [`Style::new`] render as plain text with no escape
/// codes. Themes are plain data and can be stored in settings, compared,
/// and copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpTheme {
    /// Style for the command path shown in the usage line.
    pub invoked_command: Style,
    /// Style for section headings such as `Options:`.
    pub heading: Style,
    /// Style for the first help column (option names and metavars).
    pub col1: Style,
    /// Style for the second help column (descriptions and tags).
    pub col2: Style,
    /// Style for constraint annotations attached to group headings.
    pub constraint: Style,
    /// Style for the descriptive paragraph under a group heading.
    pub section_help: Style,
    /// Style for the epilog paragraph at the bottom of the screen.
    pub epilog: Style,
}

impl HelpTheme {
    /// Creates a theme that renders no escape codes at all.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            invoked_command: Style::new(),
            heading: Style::new(),
            col1: Style::new(),
            col2: Style::new(),
            constraint: Style::new(),
            section_help: Style::new(),
            epilog: Style::new(),
        }
    }

    /// Creates a theme tuned for dark terminal backgrounds.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            invoked_command: fg(AnsiColor::BrightYellow),
            heading: fg(AnsiColor::BrightWhite).bold(),
            col1: fg(AnsiColor::BrightYellow),
            col2: Style::new(),
            constraint: fg(AnsiColor::Red),
            section_help: Style::new(),
            epilog: Style::new(),
        }
    }

    /// Creates a theme tuned for light terminal backgrounds.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            invoked_command: fg(AnsiColor::Yellow),
            heading: Style::new().bold(),
            col1: fg(AnsiColor::Yellow),
            col2: Style::new(),
            constraint: fg(AnsiColor::Red),
            section_help: Style::new(),
            epilog: Style::new(),
        }
    }

    /// Replaces the style for the invoked command in the usage line.
    #[must_use]
    pub const fn with_invoked_command(mut self, style: Style) -> Self {
        self.invoked_command = style;
        self
    }

    /// Replaces the style for section headings.
    #[must_use]
    pub const fn with_heading(mut self, style: Style) -> Self {
        self.heading = style;
        self
    }

    /// Replaces the style for the first help column.
    #[must_use]
    pub const fn with_col1(mut self, style: Style) -> Self {
        self.col1 = style;
        self
    }

    /// Replaces the style for the second help column.
    #[must_use]
    pub const fn with_col2(mut self, style: Style) -> Self {
        self.col2 = style;
        self
    }

    /// Replaces the style for constraint annotations.
    #[must_use]
    pub const fn with_constraint(mut self, style: Style) -> Self {
        self.constraint = style;
        self
    }

    /// Replaces the style for group help paragraphs.
    #[must_use]
    pub const fn with_section_help(mut self, style: Style) -> Self {
        self.section_help = style;
        self
    }

    /// Replaces the style for the epilog paragraph.
    #[must_use]
    pub const fn with_epilog(mut self, style: Style) -> Self {
        self.epilog = style;
        self
    }
}

impl Default for HelpTheme {
    fn default() -> Self {
        Self::plain()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a style with the given foreground color.
const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Wraps `text` in the escape codes of `style`.
///
/// The plain style renders empty prefixes and suffixes, so unthemed
/// output passes through unchanged. Styled text must never be measured
/// for layout; callers measure the raw text and paint afterwards.
pub(crate) fn paint(style: &Style, text: &str) -> String {
    format!("{}{text}{}", style.render(), style.render_reset())
}
