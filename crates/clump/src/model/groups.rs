// crates/clump/src/model/groups.rs
// ============================================================================
// Module: model::groups
// Description: Named groups of options with constraints and callbacks.
// Purpose: Organize help output and attach group-scoped parse behavior.
// Dependencies: clump-constraints, model::params, context, error
// ============================================================================

//! ## Overview
//! An [`OptionGroup`] owns a titled set of [`Opt`] definitions. Groups
//! drive three behaviors: the help renderer emits one titled section per
//! visible group, an attached [`Constraint`] is checked over the group's
//! members after parsing, and an attached post-parse callback runs once
//! parsing and constraint checks succeed. Callbacks run in group
//! declaration order and may veto the parse with a [`UsageError`].
//!
//! Hiding propagates both ways: a hidden group hides its members from
//! help, and a group whose members are all hidden disappears itself.

use std::fmt;

use clump_constraints::Constraint;

use crate::context::Context;
use crate::error::UsageError;
use crate::model::params::Opt;

// ============================================================================
// SECTION: Callback type
// ============================================================================

/// A hook run after parsing and constraint checks succeed.
///
/// Callbacks may inspect the [`Context`], stash derived state in its
/// extras, or reject the invocation by returning a [`UsageError`].
pub type PostParseCallback = Box<dyn Fn(&mut Context) -> Result<(), UsageError> + Send + Sync>;

// ============================================================================
// SECTION: Option groups
// ============================================================================

/// A titled group of options with optional constraint and callback.
pub struct OptionGroup {
    /// Heading shown above the group in help output.
    title: String,
    /// Descriptive paragraph rendered under the heading.
    help: Option<String>,
    /// Whether the whole group is omitted from help output.
    hidden: bool,
    /// Constraint checked over the group's members after parsing.
    constraint: Option<Constraint>,
    /// Hook run after parsing and constraint checks succeed.
    post_parse: Option<PostParseCallback>,
    /// The options belonging to this group.
    opts: Vec<Opt>,
}

impl OptionGroup {
    /// Creates an empty group with the given heading.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            help: None,
            hidden: false,
            constraint: None,
            post_parse: None,
            opts: Vec::new(),
        }
    }

    /// Sets the descriptive paragraph rendered under the heading.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Omits the whole group, members included, from help output.
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Attaches a constraint checked over the group's members once
    /// parsing succeeds.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Attaches a hook run after parsing and constraint checks succeed.
    ///
    /// Hooks run in group declaration order; the first error stops the
    /// remaining hooks.
    #[must_use]
    pub fn post_parse<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Context) -> Result<(), UsageError> + Send + Sync + 'static,
    {
        self.post_parse = Some(Box::new(callback));
        self
    }

    /// Adds an option to the group.
    #[must_use]
    pub fn opt(mut self, opt: Opt) -> Self {
        self.opts.push(opt);
        self
    }

    // SECTION: Group accessors

    /// Returns the group heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the group's options.
    pub(crate) fn opts(&self) -> &[Opt] {
        &self.opts
    }

    /// Returns the identifiers of the group's options.
    pub(crate) fn member_names(&self) -> Vec<&str> {
        self.opts.iter().map(Opt::name).collect()
    }

    /// Returns the descriptive paragraph, when declared.
    pub(crate) fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the attached constraint, when declared.
    pub(crate) fn constraint_ref(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// Returns the attached post-parse hook, when declared.
    pub(crate) fn callback(&self) -> Option<&PostParseCallback> {
        self.post_parse.as_ref()
    }

    /// Reports whether help output omits the group: either it was hidden
    /// explicitly, or every member is hidden.
    pub(crate) fn effective_hidden(&self) -> bool {
        self.hidden || (!self.opts.is_empty() && self.opts.iter().all(Opt::is_hidden))
    }
}

impl fmt::Debug for OptionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionGroup")
            .field("title", &self.title)
            .field("help", &self.help)
            .field("hidden", &self.hidden)
            .field("constraint", &self.constraint)
            .field("post_parse", &self.post_parse.is_some())
            .field("opts", &self.opts)
            .finish()
    }
}
