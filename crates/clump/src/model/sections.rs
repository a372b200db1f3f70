// crates/clump/src/model/sections.rs
// ============================================================================
// Module: model::sections
// Description: Titled sections of subcommands for help output.
// Purpose: Group subcommands under headings, sorted or in declaration order.
// Dependencies: command
// ============================================================================

//! ## Overview
//! A [`Section`] owns a titled list of subcommands. Sections only affect
//! help rendering; parsing sees a flat set of subcommands regardless of
//! sectioning. Each section either preserves declaration order or sorts
//! its entries by name; the default section collecting unsectioned
//! subcommands always sorts.

use crate::command::Command;

// ============================================================================
// SECTION: Sections
// ============================================================================

/// A titled list of subcommands rendered together in help output.
#[derive(Debug)]
pub struct Section {
    /// Heading shown above the section.
    title: String,
    /// Whether entries render sorted by name.
    sorted: bool,
    /// The subcommands belonging to this section.
    commands: Vec<Command>,
}

impl Section {
    /// Creates a section that lists entries in declaration order.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sorted: false,
            commands: Vec::new(),
        }
    }

    /// Creates a section that lists entries sorted by name.
    #[must_use]
    pub fn sorted(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sorted: true,
            commands: Vec::new(),
        }
    }

    /// Adds a subcommand to the section.
    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Returns the section heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the subcommands in declaration order.
    pub(crate) fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns the subcommands in render order, sorting by name when the
    /// section asked for it.
    pub(crate) fn commands_in_order(&self) -> Vec<&Command> {
        let mut ordered: Vec<&Command> = self.commands.iter().collect();
        if self.sorted {
            ordered.sort_by_key(|command| command.name().to_owned());
        }
        ordered
    }
}
