// crates/clump/src/context.rs
// ============================================================================
// Module: context
// Description: The parsed invocation handed to applications and callbacks.
// Purpose: Expose typed value access, the invoked path, effective settings,
//          and a mutation surface for post-parse callbacks.
// Dependencies: clap, clump-constraints, model::settings
// ============================================================================

//! ## Overview
//! A [`Context`] wraps the chain of [`clap::ArgMatches`] produced for one
//! invocation, from the root command down to the invoked subcommand,
//! together with the effective [`ContextSettings`] of that subcommand.
//! Lookups search the chain innermost first, so a subcommand parameter
//! shadows a root parameter of the same name.
//!
//! Post-parse callbacks receive the context mutably: they may stash
//! derived state in the typed extras map, adjust the settings copy, or
//! veto the invocation through their return value. The context also
//! implements [`ParamsSource`], which is how constraints and conditions
//! read the invocation they are checked against.

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

use clap::ArgMatches;
use clap::parser::ValueSource;

use clump_constraints::ParamState;
use clump_constraints::ParamsSource;

use crate::model::settings::ContextSettings;

// ============================================================================
// SECTION: Levels
// ============================================================================

/// One command level of the invocation: the root or one subcommand.
pub(crate) struct Level {
    /// The command name at this level.
    command: String,
    /// User-facing labels keyed by declared parameter name.
    labels: HashMap<String, String>,
    /// Names of the valueless boolean flags declared at this level.
    flags: HashSet<String>,
    /// The matches clap produced for this level.
    matches: ArgMatches,
}

impl Level {
    /// Creates a level from its command name, labels, flag names, and
    /// matches.
    pub(crate) fn new(
        command: impl Into<String>,
        labels: HashMap<String, String>,
        flags: HashSet<String>,
        matches: ArgMatches,
    ) -> Self {
        Self {
            command: command.into(),
            labels,
            flags,
            matches,
        }
    }

    /// Reports whether this level declares the parameter at all.
    fn declares(&self, name: &str) -> bool {
        !matches!(
            self.matches.try_get_raw(name),
            Err(clap::parser::MatchesError::UnknownArgument { .. })
        )
    }

    /// Reports whether the command line itself supplied the parameter.
    ///
    /// Defaults and environment fallbacks do not count.
    fn supplied(&self, name: &str) -> bool {
        self.declares(name) && self.matches.value_source(name) == Some(ValueSource::CommandLine)
    }

    /// Textual form of the first supplied value, when one exists.
    ///
    /// A valueless flag has none: clap stores a boolean for it
    /// internally, but no text ever appeared on the command line.
    fn value_of(&self, name: &str) -> Option<String> {
        if self.flags.contains(name) {
            return None;
        }
        match self.matches.try_get_raw(name) {
            Ok(Some(mut raw)) => raw.next().map(|os| os.to_string_lossy().into_owned()),
            _ => None,
        }
    }

    /// Builds the constraint-checker view of one declared parameter.
    fn param_state(&self, name: &str) -> Option<ParamState> {
        if !self.declares(name) {
            return None;
        }
        let label = self.labels.get(name).cloned().unwrap_or_else(|| name.to_owned());
        let supplied = self.supplied(name);
        Some(ParamState {
            label,
            set: supplied,
            value: if supplied { self.value_of(name) } else { None },
        })
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// The successfully parsed invocation.
pub struct Context {
    /// Effective settings of the invoked command.
    settings: ContextSettings,
    /// Command levels from the root down to the invoked subcommand.
    levels: Vec<Level>,
    /// Typed state deposited by post-parse callbacks, keyed by type.
    extras: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates a context over the given levels.
    pub(crate) fn new(settings: ContextSettings, levels: Vec<Level>) -> Self {
        Self {
            settings,
            levels,
            extras: HashMap::new(),
        }
    }

    // SECTION: Invocation shape

    /// Returns the effective settings of the invoked command.
    #[must_use]
    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Returns the settings mutably, for callbacks that adjust them.
    pub fn settings_mut(&mut self) -> &mut ContextSettings {
        &mut self.settings
    }

    /// Returns the invoked subcommand path, root excluded.
    #[must_use]
    pub fn subcommand_path(&self) -> Vec<&str> {
        self.levels.iter().skip(1).map(|level| level.command.as_str()).collect()
    }

    /// Returns the name of the innermost invoked command.
    #[must_use]
    pub fn command(&self) -> &str {
        self.levels.last().map_or("", |level| level.command.as_str())
    }

    // SECTION: Value access

    /// Returns the parsed value of a parameter under its parser's type.
    ///
    /// Searches the invocation innermost command first; the first level
    /// declaring the name answers, whether or not a value is present.
    #[must_use]
    pub fn get_one<T>(&self, name: &str) -> Option<&T>
    where
        T: Any + Clone + Send + Sync + 'static,
    {
        for level in self.levels.iter().rev() {
            if let Ok(found) = level.matches.try_get_one::<T>(name) {
                return found;
            }
        }
        None
    }

    /// Returns every parsed value of a repeatable parameter.
    #[must_use]
    pub fn get_many<T>(&self, name: &str) -> Option<Vec<&T>>
    where
        T: Any + Clone + Send + Sync + 'static,
    {
        for level in self.levels.iter().rev() {
            match level.matches.try_get_many::<T>(name) {
                Ok(Some(values)) => return Some(values.collect()),
                Ok(None) => return None,
                Err(_) => {}
            }
        }
        None
    }

    /// Returns a boolean flag's value, `false` when never declared.
    #[must_use]
    pub fn get_flag(&self, name: &str) -> bool {
        self.get_one::<bool>(name).copied().unwrap_or(false)
    }

    /// Reports whether the command line itself supplied the parameter.
    ///
    /// Defaults and environment fallbacks answer `false`; constraint
    /// cardinality counts use exactly this notion of "set".
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        for level in self.levels.iter().rev() {
            if level.declares(name) {
                return level.supplied(name);
            }
        }
        false
    }

    /// Returns the textual form of a parameter's first supplied value,
    /// as the `Equal` constraint condition reads it. Valueless flags
    /// report no value even when set.
    #[must_use]
    pub fn value_display(&self, name: &str) -> Option<String> {
        for level in self.levels.iter().rev() {
            if level.declares(name) {
                if !level.supplied(name) {
                    return None;
                }
                return level.value_of(name);
            }
        }
        None
    }

    // SECTION: Extras

    /// Stores a typed value in the extras map, returning any previous
    /// value of the same type.
    pub fn insert_extra<T>(&mut self, value: T) -> Option<T>
    where
        T: Any + Send + Sync,
    {
        self.extras
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns the stored value of type `T`, when one exists.
    #[must_use]
    pub fn extra<T>(&self) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        self.extras.get(&TypeId::of::<T>()).and_then(|boxed| boxed.downcast_ref())
    }

    /// Removes and returns the stored value of type `T`.
    pub fn remove_extra<T>(&mut self) -> Option<T>
    where
        T: Any + Send + Sync,
    {
        self.extras
            .remove(&TypeId::of::<T>())
            .and_then(|previous| previous.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    // SECTION: Level access

    /// Number of command levels, root included.
    pub(crate) fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Constraint-checker view of one parameter at one level only.
    ///
    /// Used to scope constraint checks to the command level that
    /// declared them, so an outer constraint never reads inner state.
    pub(crate) fn param_at(&self, level: usize, name: &str) -> Option<ParamState> {
        self.levels.get(level).and_then(|level| level.param_state(name))
    }
}

impl ParamsSource for Context {
    fn param(&self, name: &str) -> Option<ParamState> {
        self.levels.iter().rev().find_map(|level| level.param_state(name))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command())
            .field("subcommand_path", &self.subcommand_path())
            .field("settings", &self.settings)
            .field("extras", &self.extras.len())
            .finish()
    }
}
