// crates/clump/src/model/params.rs
// ============================================================================
// Module: model::params
// Description: Option and positional argument definitions.
// Purpose: Describe parameters declaratively and lower them to clap args.
// Dependencies: clap, values
// ============================================================================

//! ## Overview
//! [`Opt`] and [`Positional`] are the parameter building blocks. Both are
//! plain builders that record what the application declared and lower to
//! [`clap::Arg`] when the command is assembled; clap then owns
//! tokenization and value collection while the help renderer reads the
//! declarations directly.
//!
//! An [`Opt`] without an explicit long or short name gets its id as the
//! long name, so `Opt::new("verbose")` answers to `--verbose`.

use clap::ArgAction;
use clap::builder::PossibleValuesParser;
use clap::builder::TypedValueParser;
use clap::builder::ValueParser;

use crate::values::MetavarHint;

// ============================================================================
// SECTION: Options
// ============================================================================

/// A named option, with or without a value.
#[derive(Debug, Clone)]
pub struct Opt {
    /// Identifier used for lookups and constraint references.
    name: String,
    /// Explicit long name, without the `--` prefix.
    long: Option<String>,
    /// Explicit short name, without the `-` prefix.
    short: Option<char>,
    /// Additional hidden long names.
    aliases: Vec<String>,
    /// Description shown in help output.
    help: Option<String>,
    /// Explicit value placeholder for help and usage text.
    value_name: Option<String>,
    /// Default applied when the option is absent.
    default_value: Option<String>,
    /// Environment variable consulted when the option is absent.
    env_var: Option<String>,
    /// Whether the option must be provided.
    required: bool,
    /// Whether this is a valueless boolean flag.
    flag: bool,
    /// Whether the option may repeat, accumulating values.
    multiple: bool,
    /// Whether one occurrence consumes every following value token.
    eat_all: bool,
    /// Whether help output omits this option.
    hidden: bool,
    /// Per-option override for default-value display in help.
    show_default: Option<bool>,
    /// Allowed literal values, when restricted.
    choices: Vec<String>,
    /// Whether choice matching ignores case.
    ignore_case: bool,
    /// Typed value parser, when one was attached.
    parser: Option<ValueParser>,
}

impl Opt {
    /// Creates an option with the given identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long: None,
            short: None,
            aliases: Vec::new(),
            help: None,
            value_name: None,
            default_value: None,
            env_var: None,
            required: false,
            flag: false,
            multiple: false,
            eat_all: false,
            hidden: false,
            show_default: None,
            choices: Vec::new(),
            ignore_case: false,
            parser: None,
        }
    }

    /// Sets an explicit long name, without the `--` prefix.
    #[must_use]
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    /// Sets a short name, without the `-` prefix.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Adds a hidden long alias, without the `--` prefix.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the description shown in help output.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the value placeholder for help and usage text.
    #[must_use]
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    /// Sets the default applied when the option is absent.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Names an environment variable consulted when the option is absent
    /// from the command line.
    #[must_use]
    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_var = Some(var.into());
        self
    }

    /// Marks the option as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Turns the option into a valueless boolean flag.
    #[must_use]
    pub fn flag(mut self) -> Self {
        self.flag = true;
        self
    }

    /// Allows the option to repeat, accumulating one value per use.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Makes one occurrence consume every following token up to the next
    /// option-like token or the `--` separator.
    #[must_use]
    pub fn eat_all(mut self) -> Self {
        self.eat_all = true;
        self
    }

    /// Omits the option from help output.
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Overrides the command-wide default-value display for this option:
    /// `true` always shows the `[default: ...]` tag, `false` never does.
    #[must_use]
    pub fn show_default(mut self, show: bool) -> Self {
        self.show_default = Some(show);
        self
    }

    /// Restricts values to the given literals.
    #[must_use]
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Matches choices case-insensitively.
    #[must_use]
    pub fn ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = ignore;
        self
    }

    /// Attaches a typed value parser and, when no value name was chosen,
    /// adopts the parser's suggested placeholder.
    #[must_use]
    pub fn value_type<P>(mut self, parser: P) -> Self
    where
        P: TypedValueParser + MetavarHint,
    {
        if self.value_name.is_none() {
            self.value_name = Some(parser.metavar());
        }
        self.parser = Some(ValueParser::new(parser));
        self
    }

    /// Attaches a raw clap value parser without a metavar hint.
    #[must_use]
    pub fn value_parser(mut self, parser: impl Into<ValueParser>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    // SECTION: Option accessors

    /// Returns the option identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reports whether help output omits this option.
    pub(crate) const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Reports whether this is a valueless boolean flag.
    pub(crate) const fn is_flag(&self) -> bool {
        self.flag
    }

    /// Reports whether one occurrence consumes every following value
    /// token.
    pub(crate) const fn is_eat_all(&self) -> bool {
        self.eat_all
    }

    /// Returns the short name, if the option has one.
    pub(crate) const fn short_name(&self) -> Option<char> {
        self.short
    }

    /// Reports whether the option answers to the given long spelling,
    /// aliases included.
    pub(crate) fn answers_to_long(&self, long: &str) -> bool {
        self.effective_long().as_deref() == Some(long)
            || self.aliases.iter().any(|alias| alias == long)
    }

    /// Reports whether the option must be provided.
    pub(crate) const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the per-option default-display override.
    pub(crate) const fn show_default_override(&self) -> Option<bool> {
        self.show_default
    }

    /// Returns the default value, when one is declared.
    pub(crate) fn default_display(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns the description shown in help output.
    pub(crate) fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the value placeholder used in help text.
    pub(crate) fn metavar(&self) -> String {
        self.value_name
            .clone()
            .unwrap_or_else(|| self.name.to_uppercase().replace('-', "_"))
    }

    /// Returns the effective long name, if the option has one.
    fn effective_long(&self) -> Option<String> {
        if self.long.is_some() {
            self.long.clone()
        } else if self.short.is_none() {
            Some(self.name.clone())
        } else {
            None
        }
    }

    /// Formats the option for constraint labels, such as `--out (-o)`.
    pub(crate) fn label(&self) -> String {
        match (self.effective_long(), self.short) {
            (Some(long), Some(short)) => format!("--{long} (-{short})"),
            (Some(long), None) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => self.name.clone(),
        }
    }

    /// Formats the first help column: names, then the value placeholder.
    pub(crate) fn help_term(&self) -> String {
        let mut names: Vec<String> = Vec::new();
        if let Some(short) = self.short {
            names.push(format!("-{short}"));
        }
        if let Some(long) = self.effective_long() {
            names.push(format!("--{long}"));
        }
        let mut term = names.join(", ");
        if !self.flag {
            term.push(' ');
            term.push_str(&self.metavar());
            if self.eat_all {
                term.push_str("...");
            }
        }
        term
    }

    /// Lowers the declaration to a [`clap::Arg`].
    pub(crate) fn to_clap(&self) -> clap::Arg {
        let mut arg = clap::Arg::new(self.name.clone());
        if let Some(long) = self.effective_long() {
            arg = arg.long(long);
        }
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        for alias in &self.aliases {
            arg = arg.alias(alias.clone());
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        arg = arg.hide(self.hidden);
        if self.flag {
            return arg.action(ArgAction::SetTrue);
        }
        arg = arg.action(if self.multiple {
            ArgAction::Append
        } else {
            ArgAction::Set
        });
        if self.eat_all {
            arg = arg.num_args(1 ..);
        }
        arg = arg.value_name(self.metavar());
        if let Some(parser) = &self.parser {
            arg = arg.value_parser(parser.clone());
        } else if !self.choices.is_empty() {
            arg = arg.value_parser(PossibleValuesParser::new(self.choices.clone()));
            arg = arg.ignore_case(self.ignore_case);
        }
        if let Some(default) = &self.default_value {
            arg = arg.default_value(default.clone());
        }
        if let Some(var) = &self.env_var {
            arg = arg.env(var.clone());
        }
        arg.required(self.required)
    }
}

// ============================================================================
// SECTION: Positionals
// ============================================================================

/// A positional argument.
#[derive(Debug, Clone)]
pub struct Positional {
    /// Identifier used for lookups and constraint references.
    name: String,
    /// Description shown in help output.
    help: Option<String>,
    /// Explicit value placeholder for help and usage text.
    value_name: Option<String>,
    /// Default applied when the argument is absent.
    default_value: Option<String>,
    /// Whether the argument must be provided.
    required: bool,
    /// Whether the argument collects every remaining value token.
    multiple: bool,
    /// Visibility override; unset means visible only with help text.
    hidden: Option<bool>,
    /// Per-argument override for default-value display in help.
    show_default: Option<bool>,
    /// Typed value parser, when one was attached.
    parser: Option<ValueParser>,
}

impl Positional {
    /// Creates a positional argument with the given identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            value_name: None,
            default_value: None,
            required: false,
            multiple: false,
            hidden: None,
            show_default: None,
            parser: None,
        }
    }

    /// Sets the description shown in help output.
    ///
    /// A positional with help text appears in the `Positional arguments:`
    /// section; one without stays out of it unless
    /// [`Positional::hidden`] explicitly opts it in.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the value placeholder for help and usage text.
    #[must_use]
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    /// Sets the default applied when the argument is absent.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Marks the argument as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Makes the argument collect every remaining value token.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Overrides the visibility rule: `true` always hides the argument,
    /// `false` shows it even without help text.
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Overrides the command-wide default-value display for this
    /// argument.
    #[must_use]
    pub fn show_default(mut self, show: bool) -> Self {
        self.show_default = Some(show);
        self
    }

    /// Attaches a typed value parser and, when no value name was chosen,
    /// adopts the parser's suggested placeholder.
    #[must_use]
    pub fn value_type<P>(mut self, parser: P) -> Self
    where
        P: TypedValueParser + MetavarHint,
    {
        if self.value_name.is_none() {
            self.value_name = Some(parser.metavar());
        }
        self.parser = Some(ValueParser::new(parser));
        self
    }

    /// Attaches a raw clap value parser without a metavar hint.
    #[must_use]
    pub fn value_parser(mut self, parser: impl Into<ValueParser>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    // SECTION: Positional accessors

    /// Returns the argument identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reports whether the argument appears in help output: an explicit
    /// override wins, otherwise only arguments with help text show.
    pub(crate) fn is_visible(&self) -> bool {
        match self.hidden {
            Some(hidden) => !hidden,
            None => self.help.is_some(),
        }
    }

    /// Reports whether the argument must be provided.
    pub(crate) const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the per-argument default-display override.
    pub(crate) const fn show_default_override(&self) -> Option<bool> {
        self.show_default
    }

    /// Returns the default value, when one is declared.
    pub(crate) fn default_display(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns the description shown in help output.
    pub(crate) fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the value placeholder used in help and usage text.
    pub(crate) fn metavar(&self) -> String {
        self.value_name
            .clone()
            .unwrap_or_else(|| self.name.to_uppercase().replace('-', "_"))
    }

    /// Formats the argument for constraint labels, spelled the way the
    /// help page spells it.
    pub(crate) fn label(&self) -> String {
        self.metavar()
    }

    /// Formats the argument for the usage line: `NAME` when required,
    /// `[NAME]` otherwise, with `...` appended when it collects the
    /// remaining tokens.
    pub(crate) fn usage_piece(&self) -> String {
        let mut piece = if self.required {
            self.metavar()
        } else {
            format!("[{}]", self.metavar())
        };
        if self.multiple {
            piece.push_str("...");
        }
        piece
    }

    /// Lowers the declaration to a [`clap::Arg`].
    pub(crate) fn to_clap(&self) -> clap::Arg {
        let mut arg = clap::Arg::new(self.name.clone());
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        arg = arg.value_name(self.metavar());
        if self.multiple {
            arg = arg.num_args(1 ..);
        }
        if let Some(parser) = &self.parser {
            arg = arg.value_parser(parser.clone());
        }
        if let Some(default) = &self.default_value {
            arg = arg.default_value(default.clone());
        }
        arg.required(self.required)
    }
}
