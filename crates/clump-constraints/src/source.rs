// clump-constraints/src/source.rs
// ============================================================================
// Module: Parameter Source Contracts
// Description: Read-side contracts the constraint checker evaluates against.
// Purpose: Define `ParamState`, the `ParamsSource` trait, and fixture impls.
// Dependencies: std::collections::{BTreeMap, HashMap}
// ============================================================================

//! ## Overview
//! Constraints never talk to a parser directly. They read parameter state
//! through [`ParamsSource`], which any front end (or test fixture) can
//! implement. The map and closure implementations below cover fixtures and
//! ad-hoc adapters without a wrapper type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;

// ============================================================================
// SECTION: Parameter State
// ============================================================================

/// Snapshot of a single parameter as seen by the constraint checker
///
/// # Invariants
/// - `value` is `Some` only when the parameter carries at least one value;
///   flags that take no value report `None` even when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamState {
    /// User-facing label, e.g. `--out (-o)` for options or `FILE` for
    /// positional arguments.
    pub label: String,

    /// Whether the invocation actually supplied this parameter.
    ///
    /// Defaults and environment fallbacks do not count as supplied.
    pub set: bool,

    /// Textual form of the first supplied value, when one exists.
    pub value: Option<String>,
}

impl ParamState {
    /// Creates the state for a parameter the invocation did not supply.
    #[must_use]
    pub fn unset(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            set: false,
            value: None,
        }
    }

    /// Creates the state for a supplied parameter that carries no value.
    #[must_use]
    pub fn set_flag(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            set: true,
            value: None,
        }
    }

    /// Creates the state for a supplied parameter with a textual value.
    #[must_use]
    pub fn set_with(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            set: true,
            value: Some(value.into()),
        }
    }
}

// ============================================================================
// SECTION: Source Trait
// ============================================================================

/// Read access to parameter state, keyed by declared parameter name
///
/// Names are the declaration-side identifiers (`"output"`), not the spelled
/// flags (`"--output"`); labels inside [`ParamState`] carry the spelled form
/// for messages.
pub trait ParamsSource {
    /// Looks up one parameter by declared name.
    ///
    /// Returns `None` when the name is not declared at all, which the checker
    /// reports as a structural error rather than a violation.
    fn param(&self, name: &str) -> Option<ParamState>;
}

// ============================================================================
// SECTION: Fixture Implementations
// ============================================================================

impl ParamsSource for HashMap<String, ParamState> {
    fn param(&self, name: &str) -> Option<ParamState> {
        self.get(name).cloned()
    }
}

impl ParamsSource for BTreeMap<String, ParamState> {
    fn param(&self, name: &str) -> Option<ParamState> {
        self.get(name).cloned()
    }
}

impl<F> ParamsSource for F
where
    F: Fn(&str) -> Option<ParamState>,
{
    fn param(&self, name: &str) -> Option<ParamState> {
        self(name)
    }
}

// ============================================================================
// SECTION: Lookup Helpers
// ============================================================================

/// Resolves a parameter's label, falling back to the declared name when the
/// source does not know the parameter.
///
/// Phrasing helpers use this so help text stays readable even when rendered
/// without a live invocation behind it.
#[must_use]
pub fn label_or_name(source: &dyn ParamsSource, name: &str) -> String {
    source.param(name).map_or_else(|| name.to_owned(), |state| state.label)
}

/// A source that knows no parameters
///
/// # Invariants
/// - Every lookup returns `None`, so phrasing falls back to declared names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParams;

impl ParamsSource for NoParams {
    fn param(&self, _name: &str) -> Option<ParamState> {
        None
    }
}
