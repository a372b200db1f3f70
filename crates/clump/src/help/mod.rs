// crates/clump/src/help/mod.rs
// ============================================================================
// Module: help
// Description: Deterministic two-column help rendering.
// Purpose: Turn assembled help sections into the final help screen text.
// Dependencies: help::theme, model::settings
// ============================================================================

//! ## Overview
//! The renderer works from a prepared [`HelpPage`]: a usage line, an
//! optional description, a list of [`HelpSection`]s, and an optional
//! epilog. The command builder assembles the page from its model; this
//! module owns only layout. Rendering is deterministic and does no I/O,
//! so the same page and settings always produce the same string.
//!
//! Each section is a definition list: a 2-space indent, a first column
//! holding the term, a 2-space gutter, and a body column that wraps at
//! the configured content width. The first-column width is measured per
//! section, or shared across sections of the same kind when the
//! alignment settings ask for it. Terms wider than the column cap push
//! their body onto the following line instead of widening the column.
//!
//! Styling never participates in measurement: layout is computed over
//! raw text and theme escape codes are painted on afterwards.

pub mod theme;

pub use theme::HelpTheme;

use crate::help::theme::paint;
use crate::model::settings::ContextSettings;

// ============================================================================
// SECTION: Layout constants
// ============================================================================

/// Spaces before the first column of a definition list.
const INDENT: usize = 2;

/// Spaces between the first column and the body column.
const GUTTER: usize = 2;

/// Widest the first column may grow; longer terms get their own line.
const TERM_CAP: usize = 30;

/// Narrowest body column the wrapper will produce, whatever the math says.
const MIN_BODY_WIDTH: usize = 20;

// ============================================================================
// SECTION: Page model
// ============================================================================

/// What kind of content a section holds, for alignment grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Positional arguments, aligned with the option groups.
    Positionals,
    /// An option group, named or default.
    Options,
    /// Command-level constraint descriptions.
    Constraints,
    /// A subcommand section, named or default.
    Commands,
}

/// One row of a definition list: term, body, and trailing tags.
#[derive(Debug, Clone)]
pub struct Definition {
    /// First-column text, such as `-o, --out FILE`.
    pub term: String,
    /// Body text; wrapped to the content width.
    pub body: String,
    /// Bracketed annotations appended after the body, such as
    /// `[default: 8]` or `[required]`.
    pub tags: Vec<String>,
}

impl Definition {
    /// Creates a row with no tags.
    #[must_use]
    pub fn new(term: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            body: body.into(),
            tags: Vec::new(),
        }
    }

    /// Appends a bracketed tag to the row.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Joins the body and tags into the full second-column text.
    fn body_with_tags(&self) -> String {
        let mut text = self.body.clone();
        for tag in &self.tags {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push('[');
            text.push_str(tag);
            text.push(']');
        }
        text
    }
}

/// A titled definition list on the help screen.
#[derive(Debug, Clone)]
pub struct HelpSection {
    /// What the section holds, for alignment grouping.
    pub kind: SectionKind,
    /// Heading shown above the rows, without the trailing colon.
    pub heading: String,
    /// Optional paragraph rendered under the heading.
    pub description: Option<String>,
    /// Optional bracketed note shown after the heading, such as a
    /// group constraint phrase.
    pub note: Option<String>,
    /// The rows of the section.
    pub definitions: Vec<Definition>,
}

impl HelpSection {
    /// Creates an empty section of the given kind.
    #[must_use]
    pub fn new(kind: SectionKind, heading: impl Into<String>) -> Self {
        Self {
            kind,
            heading: heading.into(),
            description: None,
            note: None,
            definitions: Vec::new(),
        }
    }

    /// Sets the paragraph rendered under the heading.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the bracketed note shown after the heading.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Appends a row to the section.
    #[must_use]
    pub fn definition(mut self, definition: Definition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Widest term in the section, capped at the column limit.
    fn measured_width(&self) -> usize {
        self.definitions
            .iter()
            .map(|definition| definition.term.chars().count())
            .filter(|width| *width <= TERM_CAP)
            .max()
            .unwrap_or(0)
    }
}

/// A fully assembled help screen awaiting layout.
#[derive(Debug, Clone)]
pub struct HelpPage {
    /// The invoked command path, styled as such in the usage line.
    pub invocation: String,
    /// The rest of the usage line after the command path.
    pub usage_trailer: String,
    /// Paragraph shown under the usage line.
    pub description: Option<String>,
    /// The definition-list sections, in render order.
    pub sections: Vec<HelpSection>,
    /// Paragraph shown at the bottom of the screen.
    pub epilog: Option<String>,
}

// ============================================================================
// SECTION: Formatter
// ============================================================================

/// Lays out a [`HelpPage`] under one command's settings.
#[derive(Debug, Clone)]
pub struct HelpFormatter {
    /// The settings governing width, alignment, and theme.
    settings: ContextSettings,
}

impl HelpFormatter {
    /// Creates a formatter for the given settings.
    #[must_use]
    pub fn new(settings: &ContextSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    /// Renders the page to its final text, trailing newline included.
    #[must_use]
    pub fn render(&self, page: &HelpPage) -> String {
        let theme = &self.settings.theme;
        let width = self.settings.max_content_width;
        let mut out = String::new();

        out.push_str("Usage: ");
        out.push_str(&paint(&theme.invoked_command, &page.invocation));
        if !page.usage_trailer.is_empty() {
            out.push(' ');
            out.push_str(&page.usage_trailer);
        }
        out.push('\n');

        if let Some(description) = &page.description {
            out.push('\n');
            for line in wrap(description, width) {
                out.push_str(&line);
                out.push('\n');
            }
        }

        let option_width = self.shared_width(page, SectionKind::Options);
        let command_width = self.shared_width(page, SectionKind::Commands);
        for section in &page.sections {
            if section.definitions.is_empty() && section.description.is_none() {
                continue;
            }
            let shared = match section.kind {
                SectionKind::Positionals | SectionKind::Options | SectionKind::Constraints => {
                    option_width
                }
                SectionKind::Commands => command_width,
            };
            let col1 = shared.unwrap_or_else(|| section.measured_width());
            out.push('\n');
            self.render_section(&mut out, section, col1);
        }

        if let Some(epilog) = &page.epilog {
            out.push('\n');
            for line in wrap(epilog, width) {
                out.push_str(&paint(&theme.epilog, &line));
                out.push('\n');
            }
        }

        out
    }

    /// Width shared by all sections of `kind`, when alignment asks for one.
    fn shared_width(&self, page: &HelpPage, kind: SectionKind) -> Option<usize> {
        let aligned = match kind {
            SectionKind::Positionals | SectionKind::Options | SectionKind::Constraints => {
                self.settings.align_option_groups
            }
            SectionKind::Commands => self.settings.align_sections,
        };
        if !aligned {
            return None;
        }
        let same_class = |section: &&HelpSection| match kind {
            SectionKind::Commands => section.kind == SectionKind::Commands,
            SectionKind::Positionals | SectionKind::Options | SectionKind::Constraints => {
                section.kind != SectionKind::Commands
            }
        };
        page.sections.iter().filter(same_class).map(HelpSection::measured_width).max()
    }

    /// Renders one section with the given first-column width.
    fn render_section(&self, out: &mut String, section: &HelpSection, col1: usize) {
        let theme = &self.settings.theme;
        let width = self.settings.max_content_width;

        out.push_str(&paint(&theme.heading, &format!("{}:", section.heading)));
        if let Some(note) = &section.note {
            out.push(' ');
            out.push_str(&paint(&theme.constraint, &format!("[{note}]")));
        }
        out.push('\n');

        if let Some(description) = &section.description {
            for line in wrap(description, width.saturating_sub(INDENT)) {
                out.push_str(&" ".repeat(INDENT));
                out.push_str(&paint(&theme.section_help, &line));
                out.push('\n');
            }
        }

        let body_indent = INDENT + col1 + GUTTER;
        let body_width = width.saturating_sub(body_indent).max(MIN_BODY_WIDTH);
        for definition in &section.definitions {
            let term_width = definition.term.chars().count();
            let body = definition.body_with_tags();
            let lines = wrap(&body, body_width);

            out.push_str(&" ".repeat(INDENT));
            out.push_str(&paint(&theme.col1, &definition.term));
            if lines.is_empty() {
                out.push('\n');
                continue;
            }
            let mut rest = lines.iter();
            if term_width > col1 {
                // Over-cap term: body starts on its own line.
                out.push('\n');
            } else if let Some(first) = rest.next() {
                out.push_str(&" ".repeat(col1 - term_width + GUTTER));
                out.push_str(&paint(&theme.col2, first));
                out.push('\n');
            }
            for line in rest {
                out.push_str(&" ".repeat(body_indent));
                out.push_str(&paint(&theme.col2, line));
                out.push('\n');
            }
        }
    }
}

// ============================================================================
// SECTION: Wrapping
// ============================================================================

/// Greedy word wrap at `width` characters, preserving explicit newlines.
///
/// A word longer than the width gets its own line rather than being
/// split mid-word. An empty input produces no lines.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(MIN_BODY_WIDTH);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            if !text.trim().is_empty() {
                lines.push(String::new());
            }
            continue;
        }
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
            } else if line.chars().count() + 1 + word.chars().count() <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}
