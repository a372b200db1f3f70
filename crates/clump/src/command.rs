// crates/clump/src/command.rs
// ============================================================================
// Module: command
// Description: The command aggregate: model assembly, parsing, and help.
// Purpose: Lower the declarative model to clap, run the parse pipeline,
//          and assemble help pages for the renderer.
// Dependencies: clap, clump-constraints, model, help, context, error
// ============================================================================

//! ## Overview
//! [`Command`] ties the model together. Applications declare positionals,
//! options, option groups, subcommand sections, constraints, and
//! settings on it; [`Command::try_parse_from`] then runs the pipeline
//! for one invocation:
//!
//! 1. validate the model (duplicate names, constraint references);
//! 2. scan the raw tokens for a help flag, subcommand-aware, stopping
//!    at `--`, and short-circuit to a rendered help screen;
//! 3. hand the tokens to clap for tokenization and value collection;
//! 4. check constraints, outermost command first: each group's
//!    constraint over its members, then command-level constraints;
//! 5. run post-parse callbacks in declaration order, groups before
//!    command-level hooks, each free to mutate the [`Context`] or veto
//!    the invocation.
//!
//! The result is an [`Outcome`]: a context to run with, or help or
//! version text to print. The library never exits the process; callers
//! route the outcome and use the exit-code helpers.

use std::collections::HashMap;
use std::collections::HashSet;

use clap::error::ErrorKind;

use clump_constraints::Constraint;
use clump_constraints::ConstraintError;

use crate::context::Context;
use crate::context::Level;
use crate::error::BuildError;
use crate::error::ParseError;
use crate::help::Definition;
use crate::help::HelpFormatter;
use crate::help::HelpPage;
use crate::help::HelpSection;
use crate::help::SectionKind;
use crate::model::groups::OptionGroup;
use crate::model::groups::PostParseCallback;
use crate::model::params::Opt;
use crate::model::params::Positional;
use crate::model::sections::Section;
use crate::model::settings::ContextSettings;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// What one invocation resolved to.
#[derive(Debug)]
pub enum Outcome {
    /// The invocation parsed; run the application with this context.
    Run(Context),
    /// A help flag was given; print this text and exit cleanly.
    Help(String),
    /// The version flag was given; print this text and exit cleanly.
    Version(String),
}

impl Outcome {
    /// Returns the conventional exit code: all outcomes are successes.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        0
    }

    /// Unwraps the context when the invocation should run.
    #[must_use]
    pub fn into_context(self) -> Option<Context> {
        match self {
            Self::Run(context) => Some(context),
            Self::Help(_) | Self::Version(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Command model
// ============================================================================

/// Whether upcoming tokens in the help scan sit in value position.
#[derive(Clone, Copy)]
enum PendingValues {
    /// The next token stands on its own.
    None,
    /// The next token is the value of the option just seen.
    One,
    /// Every token up to the next option-like one is a value.
    Greedy,
}

/// A command-level constraint over any declared parameters.
struct CommandConstraint {
    /// The check itself.
    constraint: Constraint,
    /// Declared names of the covered parameters.
    params: Vec<String>,
}

/// A command: the root of an interface or one subcommand of it.
pub struct Command {
    /// The command name, as spelled on the command line.
    name: String,
    /// One-line summary shown in help and command listings.
    about: Option<String>,
    /// Longer description shown in this command's own help screen.
    long_about: Option<String>,
    /// Paragraph rendered at the bottom of the help screen.
    epilog: Option<String>,
    /// Version string; enables clap's `-V`/`--version` flag.
    version: Option<String>,
    /// Explicit settings; absent means inherit the parent's wholesale.
    settings: Option<ContextSettings>,
    /// Positional arguments in declaration order.
    positionals: Vec<Positional>,
    /// Ungrouped options, rendered in the default group.
    opts: Vec<Opt>,
    /// Named option groups in declaration order.
    groups: Vec<OptionGroup>,
    /// Named subcommand sections in declaration order.
    sections: Vec<Section>,
    /// Unsectioned subcommands, rendered in the default section.
    subcommands: Vec<Command>,
    /// Command-level constraints in declaration order.
    constraints: Vec<CommandConstraint>,
    /// Command-level hooks, run after all group callbacks.
    post_parse: Vec<PostParseCallback>,
}

impl Command {
    /// Creates an empty command with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            long_about: None,
            epilog: None,
            version: None,
            settings: None,
            positionals: Vec::new(),
            opts: Vec::new(),
            groups: Vec::new(),
            sections: Vec::new(),
            subcommands: Vec::new(),
            constraints: Vec::new(),
            post_parse: Vec::new(),
        }
    }

    /// Sets the one-line summary shown in help and command listings.
    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Sets the longer description shown in this command's help screen.
    #[must_use]
    pub fn long_about(mut self, long_about: impl Into<String>) -> Self {
        self.long_about = Some(long_about.into());
        self
    }

    /// Sets the paragraph rendered at the bottom of the help screen.
    #[must_use]
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    /// Sets the version string and enables the version flag.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replaces this command's settings.
    ///
    /// A command without explicit settings inherits its parent's
    /// effective settings wholesale; setting them here replaces the
    /// inherited block entirely.
    #[must_use]
    pub fn settings(mut self, settings: ContextSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Adds a positional argument.
    #[must_use]
    pub fn positional(mut self, positional: Positional) -> Self {
        self.positionals.push(positional);
        self
    }

    /// Adds an ungrouped option, rendered in the default group.
    #[must_use]
    pub fn opt(mut self, opt: Opt) -> Self {
        self.opts.push(opt);
        self
    }

    /// Adds an option group.
    #[must_use]
    pub fn group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a subcommand section.
    #[must_use]
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Adds an unsectioned subcommand, rendered in the default section.
    #[must_use]
    pub fn subcommand(mut self, command: Self) -> Self {
        self.subcommands.push(command);
        self
    }

    /// Attaches a constraint over any declared parameters of this
    /// command, positionals and grouped options included.
    #[must_use]
    pub fn constraint<I, S>(mut self, constraint: Constraint, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.push(CommandConstraint {
            constraint,
            params: params.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Attaches a command-level hook, run after every group callback.
    #[must_use]
    pub fn post_parse<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Context) -> Result<(), crate::error::UsageError> + Send + Sync + 'static,
    {
        self.post_parse.push(Box::new(callback));
        self
    }

    // SECTION: Model accessors

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the one-line summary, when declared.
    pub(crate) fn about_text(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Iterates every option, grouped ones first.
    fn all_opts(&self) -> impl Iterator<Item = &Opt> {
        self.groups.iter().flat_map(OptionGroup::opts).chain(self.opts.iter())
    }

    /// Iterates every subcommand, sectioned ones first.
    fn all_subcommands(&self) -> impl Iterator<Item = &Self> {
        self.sections.iter().flat_map(Section::commands).chain(self.subcommands.iter())
    }

    /// Finds a direct subcommand by name.
    fn find_subcommand(&self, name: &str) -> Option<&Self> {
        self.all_subcommands().find(|command| command.name == name)
    }

    /// Resolves a declared parameter's user-facing label.
    fn label_of(&self, name: &str) -> Option<String> {
        if let Some(opt) = self.all_opts().find(|opt| opt.name() == name) {
            return Some(opt.label());
        }
        self.positionals
            .iter()
            .find(|positional| positional.name() == name)
            .map(Positional::label)
    }

    /// Builds the name-to-label map the context carries for this level.
    fn labels(&self) -> HashMap<String, String> {
        let mut labels = HashMap::new();
        for positional in &self.positionals {
            labels.insert(positional.name().to_owned(), positional.label());
        }
        for opt in self.all_opts() {
            labels.insert(opt.name().to_owned(), opt.label());
        }
        labels
    }

    /// Collects the names of this command's valueless boolean flags.
    fn flag_names(&self) -> HashSet<String> {
        self.all_opts().filter(|opt| opt.is_flag()).map(|opt| opt.name().to_owned()).collect()
    }

    /// Resolves the settings in effect for this command under a parent.
    fn effective_settings(&self, parent: &ContextSettings) -> ContextSettings {
        self.settings.clone().unwrap_or_else(|| parent.clone())
    }

    // SECTION: Validation

    /// Checks the model for definition mistakes, recursively.
    fn validate(&self) -> Result<(), BuildError> {
        let mut names: HashSet<&str> = HashSet::new();
        for positional in &self.positionals {
            if !names.insert(positional.name()) {
                return Err(BuildError::DuplicateParam {
                    command: self.name.clone(),
                    name: positional.name().to_owned(),
                });
            }
        }
        for opt in self.all_opts() {
            if !names.insert(opt.name()) {
                return Err(BuildError::DuplicateParam {
                    command: self.name.clone(),
                    name: opt.name().to_owned(),
                });
            }
        }

        let mut sub_names: HashSet<&str> = HashSet::new();
        for command in self.all_subcommands() {
            if !sub_names.insert(command.name()) {
                return Err(BuildError::DuplicateSubcommand {
                    command: self.name.clone(),
                    name: command.name().to_owned(),
                });
            }
        }

        for group in &self.groups {
            if let Some(constraint) = group.constraint_ref() {
                constraint.check_consistency(group.opts().len()).map_err(|source| {
                    BuildError::Unsatisfiable {
                        command: self.name.clone(),
                        source,
                    }
                })?;
            }
        }
        for entry in &self.constraints {
            for param in &entry.params {
                if !names.contains(param.as_str()) {
                    return Err(BuildError::UnknownConstraintParam {
                        command: self.name.clone(),
                        name: param.clone(),
                    });
                }
            }
            entry.constraint.check_consistency(entry.params.len()).map_err(|source| {
                BuildError::Unsatisfiable {
                    command: self.name.clone(),
                    source,
                }
            })?;
        }

        for command in self.all_subcommands() {
            command.validate()?;
        }
        Ok(())
    }

    // SECTION: Lowering

    /// Lowers the model to a [`clap::Command`].
    ///
    /// clap's own help flag is disabled at every level; the help flags
    /// from the effective settings are handled by the token scan before
    /// clap ever parses. The version flag stays with clap.
    #[must_use]
    pub fn build(&self) -> clap::Command {
        self.to_clap()
    }

    /// Recursive body of [`Command::build`].
    fn to_clap(&self) -> clap::Command {
        let mut command = clap::Command::new(self.name.clone()).disable_help_flag(true);
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        if let Some(version) = &self.version {
            command = command.version(version.clone());
        }
        for positional in &self.positionals {
            command = command.arg(positional.to_clap());
        }
        for opt in self.all_opts() {
            command = command.arg(opt.to_clap());
        }
        for subcommand in self.all_subcommands() {
            command = command.subcommand(subcommand.to_clap());
        }
        command
    }

    // SECTION: Parsing

    /// Parses one invocation, first element being the program name.
    ///
    /// # Errors
    /// Returns [`ParseError::Setup`] for model mistakes,
    /// [`ParseError::Parser`] when clap rejects the tokens,
    /// [`ParseError::Constraint`] when a declared constraint does not
    /// hold, and [`ParseError::Usage`] when a callback vetoes.
    pub fn try_parse_from<I, S>(&self, argv: I) -> Result<Outcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        self.validate()?;

        let root_settings = self.effective_settings(&ContextSettings::default());
        if let Some(rendered) = self.scan_for_help(&argv, &root_settings) {
            return Ok(Outcome::Help(rendered));
        }

        let matches = match self.build().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(error) if error.kind() == ErrorKind::DisplayVersion => {
                return Ok(Outcome::Version(error.to_string()));
            }
            Err(error) => return Err(ParseError::Parser(error)),
        };

        // Walk the matches chain alongside the model.
        let mut current: &Self = self;
        let mut commands: Vec<&Self> = vec![self];
        let mut settings = root_settings;
        let mut levels =
            vec![Level::new(self.name.clone(), self.labels(), self.flag_names(), matches.clone())];
        let mut cursor = matches;
        loop {
            let Some((sub_name, sub_matches)) = cursor.subcommand() else {
                break;
            };
            let sub_name = sub_name.to_owned();
            let sub_matches = sub_matches.clone();
            let Some(command) = current.find_subcommand(&sub_name) else {
                break;
            };
            settings = command.effective_settings(&settings);
            levels.push(Level::new(
                sub_name,
                command.labels(),
                command.flag_names(),
                sub_matches.clone(),
            ));
            commands.push(command);
            current = command;
            cursor = sub_matches;
        }

        let mut context = Context::new(settings, levels);
        debug_assert_eq!(commands.len(), context.level_count());

        // Constraints, outermost command first, scoped to their level.
        for (index, command) in commands.iter().enumerate() {
            for group in &command.groups {
                if let Some(constraint) = group.constraint_ref() {
                    let members = group.member_names();
                    command.check_scoped(constraint, &members, index, &context)?;
                }
            }
            for entry in &command.constraints {
                let params: Vec<&str> = entry.params.iter().map(String::as_str).collect();
                command.check_scoped(&entry.constraint, &params, index, &context)?;
            }
        }

        // Callbacks, outermost command first; the first veto stops all.
        for command in &commands {
            for group in &command.groups {
                if let Some(callback) = group.callback() {
                    callback(&mut context)?;
                }
            }
            for callback in &command.post_parse {
                callback(&mut context)?;
            }
        }

        Ok(Outcome::Run(context))
    }

    /// Runs one constraint against a single command level of the context.
    fn check_scoped(
        &self,
        constraint: &Constraint,
        params: &[&str],
        level: usize,
        context: &Context,
    ) -> Result<(), ParseError> {
        let source = |name: &str| context.param_at(level, name);
        constraint.check(params, &source).map_err(|error| match error {
            ConstraintError::Violation(violation) => ParseError::Constraint(violation),
            ConstraintError::UnknownParam(name) => ParseError::Setup(
                BuildError::UnknownConstraintParam {
                    command: self.name.clone(),
                    name,
                },
            ),
        })
    }

    /// Looks for a help flag before clap parses, subcommand-aware.
    ///
    /// Walks the raw tokens left to right, descending into subcommands
    /// as their names appear so their own help-flag settings apply, and
    /// stops at `--`. Tokens in value position after a value-taking
    /// option are skipped, so an option value never reads as a help
    /// flag or a subcommand name. A match renders help for the command
    /// reached so far.
    fn scan_for_help(&self, argv: &[String], root_settings: &ContextSettings) -> Option<String> {
        let mut current = self;
        let mut settings = root_settings.clone();
        let mut invocation = self.name.clone();
        let mut pending = PendingValues::None;
        for token in argv.iter().skip(1) {
            if token == "--" {
                break;
            }
            match pending {
                PendingValues::One => {
                    pending = PendingValues::None;
                    continue;
                }
                PendingValues::Greedy if !token.starts_with('-') => continue,
                PendingValues::Greedy => pending = PendingValues::None,
                PendingValues::None => {}
            }
            if settings.help_option_names.iter().any(|name| name == token) {
                return Some(current.render_help_page(&invocation, &settings));
            }
            if let Some(command) = current.find_subcommand(token) {
                settings = command.effective_settings(&settings);
                invocation.push(' ');
                invocation.push_str(command.name());
                current = command;
                continue;
            }
            pending = current.pending_values_after(token);
        }
        None
    }

    /// Classifies a token for the help scan: does it spell a
    /// value-taking option of this command whose value arrives in the
    /// following tokens?
    ///
    /// Flags and spellings with an attached `=value` expect nothing;
    /// bundled short options are left to clap.
    fn pending_values_after(&self, token: &str) -> PendingValues {
        let found = if let Some(long) = token.strip_prefix("--") {
            if long.is_empty() || long.contains('=') {
                None
            } else {
                self.all_opts().find(|opt| opt.answers_to_long(long))
            }
        } else if let Some(rest) = token.strip_prefix('-') {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(short), None) => {
                    self.all_opts().find(|opt| opt.short_name() == Some(short))
                }
                _ => None,
            }
        } else {
            None
        };
        match found {
            Some(opt) if opt.is_flag() => PendingValues::None,
            Some(opt) if opt.is_eat_all() => PendingValues::Greedy,
            Some(_) => PendingValues::One,
            None => PendingValues::None,
        }
    }

    // SECTION: Help assembly

    /// Renders this command's help screen.
    #[must_use]
    pub fn render_help(&self) -> String {
        let settings = self.effective_settings(&ContextSettings::default());
        self.render_help_page(&self.name, &settings)
    }

    /// Renders the help screen of the subcommand at `path`, or `None`
    /// when no such subcommand exists.
    #[must_use]
    pub fn render_help_for(&self, path: &[&str]) -> Option<String> {
        let mut current = self;
        let mut settings = self.effective_settings(&ContextSettings::default());
        let mut invocation = self.name.clone();
        for name in path {
            current = current.find_subcommand(name)?;
            settings = current.effective_settings(&settings);
            invocation.push(' ');
            invocation.push_str(current.name());
        }
        Some(current.render_help_page(&invocation, &settings))
    }

    /// Assembles the help page for this command and lays it out.
    fn render_help_page(&self, invocation: &str, settings: &ContextSettings) -> String {
        let mut sections = Vec::new();

        let visible_positionals: Vec<&Positional> =
            self.positionals.iter().filter(|positional| positional.is_visible()).collect();
        if !visible_positionals.is_empty() {
            let mut section = HelpSection::new(SectionKind::Positionals, "Positional arguments");
            for positional in visible_positionals {
                section = section.definition(Definition {
                    term: positional.metavar(),
                    body: positional.help_text().unwrap_or("").to_owned(),
                    tags: param_tags(
                        settings,
                        positional.is_required(),
                        positional.default_display(),
                        positional.show_default_override(),
                    ),
                });
            }
            sections.push(section);
        }

        let named_groups_visible = self.groups.iter().any(|group| !group.effective_hidden());
        for group in &self.groups {
            if group.effective_hidden() {
                continue;
            }
            let mut section = HelpSection::new(SectionKind::Options, group.title());
            if let Some(help) = group.help_text() {
                section = section.description(help);
            }
            if let Some(constraint) = group.constraint_ref()
                && !constraint.is_no_op(group.opts().len())
            {
                section = section.note(constraint.help());
            }
            for opt in group.opts() {
                if opt.is_hidden() {
                    continue;
                }
                section = section.definition(opt_definition(opt, settings));
            }
            sections.push(section);
        }

        let default_heading = if named_groups_visible { "Other options" } else { "Options" };
        let mut default_group = HelpSection::new(SectionKind::Options, default_heading);
        for opt in &self.opts {
            if opt.is_hidden() {
                continue;
            }
            default_group = default_group.definition(opt_definition(opt, settings));
        }
        if settings.has_help_flag() {
            default_group = default_group.definition(Definition::new(
                settings.help_flag_term(),
                "Show this message and exit.",
            ));
        }
        if self.version.is_some() {
            default_group =
                default_group.definition(Definition::new("-V, --version", "Print version"));
        }
        if !default_group.definitions.is_empty() {
            sections.push(default_group);
        }

        if settings.show_constraints && !self.constraints.is_empty() {
            let mut section = HelpSection::new(SectionKind::Constraints, "Constraints");
            for entry in &self.constraints {
                let labels: Vec<String> = entry
                    .params
                    .iter()
                    .map(|name| self.label_of(name).unwrap_or_else(|| name.clone()))
                    .collect();
                section = section
                    .definition(Definition::new(labels.join(", "), entry.constraint.help()));
            }
            sections.push(section);
        }

        let named_sections_exist = self.sections.iter().any(|section| !section.commands().is_empty());
        for section in &self.sections {
            if section.commands().is_empty() {
                continue;
            }
            let mut listing = HelpSection::new(SectionKind::Commands, section.title());
            for command in section.commands_in_order() {
                listing = listing.definition(Definition::new(
                    command.name(),
                    command.about_text().unwrap_or(""),
                ));
            }
            sections.push(listing);
        }
        if !self.subcommands.is_empty() {
            let heading = if named_sections_exist { "Other commands" } else { "Commands" };
            let mut listing = HelpSection::new(SectionKind::Commands, heading);
            let mut ordered: Vec<&Self> = self.subcommands.iter().collect();
            ordered.sort_by_key(|command| command.name().to_owned());
            for command in ordered {
                listing = listing.definition(Definition::new(
                    command.name(),
                    command.about_text().unwrap_or(""),
                ));
            }
            sections.push(listing);
        }

        let page = HelpPage {
            invocation: invocation.to_owned(),
            usage_trailer: self.usage_trailer(settings),
            description: self.long_about.clone().or_else(|| self.about.clone()),
            sections,
            epilog: self.epilog.clone(),
        };
        HelpFormatter::new(settings).render(&page)
    }

    /// Synthesizes the usage line after the command path.
    fn usage_trailer(&self, settings: &ContextSettings) -> String {
        let mut pieces: Vec<String> = Vec::new();
        let has_options =
            self.all_opts().next().is_some() || settings.has_help_flag() || self.version.is_some();
        if has_options {
            pieces.push("[OPTIONS]".to_owned());
        }
        for positional in &self.positionals {
            pieces.push(positional.usage_piece());
        }
        if self.all_subcommands().next().is_some() {
            pieces.push("[COMMAND]".to_owned());
        }
        pieces.join(" ")
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("about", &self.about)
            .field("positionals", &self.positionals)
            .field("opts", &self.opts)
            .field("groups", &self.groups)
            .field("sections", &self.sections.len())
            .field("subcommands", &self.subcommands.len())
            .field("constraints", &self.constraints.len())
            .field("post_parse", &self.post_parse.len())
            .finish()
    }
}

// ============================================================================
// SECTION: Help helpers
// ============================================================================

/// Builds the help row for one option under the given settings.
fn opt_definition(opt: &Opt, settings: &ContextSettings) -> Definition {
    Definition {
        term: opt.help_term(),
        body: opt.help_text().unwrap_or("").to_owned(),
        tags: param_tags(
            settings,
            opt.is_required(),
            opt.default_display(),
            opt.show_default_override(),
        ),
    }
}

/// Computes the bracketed tags for one parameter's help row.
///
/// The per-parameter override beats the command-wide default echo in
/// either direction; requiredness tags follow the settings toggles.
fn param_tags(
    settings: &ContextSettings,
    required: bool,
    default: Option<&str>,
    show_default_override: Option<bool>,
) -> Vec<String> {
    let mut tags = Vec::new();
    let show_default = show_default_override.unwrap_or(settings.show_defaults);
    if show_default && let Some(default) = default {
        tags.push(format!("default: {default}"));
    }
    if required && settings.tag_required {
        tags.push("required".to_owned());
    }
    if !required && settings.tag_optional {
        tags.push("optional".to_owned());
    }
    tags
}
