// clump-constraints/src/condition.rs
// ============================================================================
// Module: Constraint Conditions
// Description: Predicates over parsed parameter state.
// Purpose: Define `Condition` trees used to gate conditional constraints.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! Conditions decide which branch of a conditional constraint applies. They
//! read the same [`ParamsSource`] the checker reads, compose with boolean
//! operators, and describe themselves in user-facing phrasing for error
//! messages such as `when --json is set, ...`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::error::ConstraintError;
use crate::error::ConstraintResult;
use crate::source::ParamState;
use crate::source::ParamsSource;
use crate::source::label_or_name;

// ============================================================================
// SECTION: Condition Definition
// ============================================================================

/// Predicate tree over parsed parameter state
///
/// Leaves inspect individual parameters; `Not`, `And`, and `Or` compose them.
/// Conditions are pure reads: evaluating one never mutates anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// The named parameter was supplied by the invocation
    IsSet(String),

    /// Every one of the named parameters was supplied
    ///
    /// An empty list is vacuously true.
    AllSet(Vec<String>),

    /// At least one of the named parameters was supplied
    ///
    /// An empty list is vacuously false.
    AnySet(Vec<String>),

    /// The named parameter was supplied with exactly this textual value
    ///
    /// An unset parameter compares unequal rather than erroring.
    Equal {
        /// Declared name of the parameter to inspect.
        param: String,
        /// Textual value to compare against.
        value: String,
    },

    /// Logical NOT: inverts the inner condition
    Not(Box<Self>),

    /// Logical AND: all child conditions must hold
    ///
    /// Evaluation short-circuits on the first false child.
    And(SmallVec<[Box<Self>; 4]>),

    /// Logical OR: at least one child condition must hold
    ///
    /// Evaluation short-circuits on the first true child.
    Or(SmallVec<[Box<Self>; 4]>),
}

// ============================================================================
// SECTION: Lookup Helper
// ============================================================================

/// Resolves a parameter or reports it as unknown.
fn lookup(source: &dyn ParamsSource, name: &str) -> ConstraintResult<ParamState> {
    source.param(name).ok_or_else(|| ConstraintError::unknown_param(name))
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl Condition {
    /// Evaluates this condition against the given parameter source.
    ///
    /// # Errors
    /// Returns [`ConstraintError::UnknownParam`] when a referenced parameter
    /// is not declared by the source.
    pub fn evaluate(&self, source: &dyn ParamsSource) -> ConstraintResult<bool> {
        match self {
            Self::IsSet(name) => Ok(lookup(source, name)?.set),

            Self::AllSet(names) => {
                for name in names {
                    if !lookup(source, name)?.set {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            Self::AnySet(names) => {
                for name in names {
                    if lookup(source, name)?.set {
                        return Ok(true);
                    }
                }
                Ok(false)
            }

            Self::Equal {
                param,
                value,
            } => {
                let state = lookup(source, param)?;
                Ok(state.set && state.value.as_deref() == Some(value.as_str()))
            }

            Self::Not(inner) => Ok(!inner.evaluate(source)?),

            Self::And(children) => {
                for child in children {
                    if !child.evaluate(source)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            Self::Or(children) => {
                for child in children {
                    if child.evaluate(source)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    // ========================================================================
    // SECTION: Phrasing
    // ========================================================================

    /// Renders the user-facing phrasing of this condition.
    ///
    /// Labels are resolved through the source when it knows the parameter and
    /// fall back to the declared name otherwise, so the same phrasing works
    /// for help text rendered without a live invocation.
    #[must_use]
    pub fn describe(&self, source: &dyn ParamsSource) -> String {
        match self {
            Self::IsSet(name) => format!("{} is set", label_or_name(source, name)),

            Self::AllSet(names) => match names.as_slice() {
                [] => "always".to_owned(),
                [single] => format!("{} is set", label_or_name(source, single)),
                many => format!("{} are all set", join_labels(source, many)),
            },

            Self::AnySet(names) => match names.as_slice() {
                [] => "never".to_owned(),
                [single] => format!("{} is set", label_or_name(source, single)),
                many => format!("at least one of {} is set", join_labels(source, many)),
            },

            Self::Equal {
                param,
                value,
            } => format!("{} = '{value}'", label_or_name(source, param)),

            Self::Not(inner) => match inner.as_ref() {
                Self::IsSet(name) => format!("{} is not set", label_or_name(source, name)),
                Self::Equal {
                    param,
                    value,
                } => format!("{} != '{value}'", label_or_name(source, param)),
                other => format!("not ({})", other.describe(source)),
            },

            Self::And(children) => join_descriptions(source, children, " and "),
            Self::Or(children) => join_descriptions(source, children, " or "),
        }
    }
}

/// Joins resolved labels with commas.
fn join_labels(source: &dyn ParamsSource, names: &[String]) -> String {
    let labels: Vec<String> = names.iter().map(|name| label_or_name(source, name)).collect();
    labels.join(", ")
}

/// Joins child condition descriptions with the given separator.
fn join_descriptions(
    source: &dyn ParamsSource,
    children: &SmallVec<[Box<Condition>; 4]>,
    separator: &str,
) -> String {
    let parts: Vec<String> = children.iter().map(|child| child.describe(source)).collect();
    parts.join(separator)
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl Condition {
    /// Creates a condition on a single parameter being supplied.
    pub fn is_set(name: impl Into<String>) -> Self {
        Self::IsSet(name.into())
    }

    /// Creates a condition on every named parameter being supplied.
    #[must_use]
    pub fn all_set(names: Vec<String>) -> Self {
        Self::AllSet(names)
    }

    /// Creates a condition on at least one named parameter being supplied.
    #[must_use]
    pub fn any_set(names: Vec<String>) -> Self {
        Self::AnySet(names)
    }

    /// Creates an equality condition on a parameter's textual value.
    pub fn equal(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equal {
            param: param.into(),
            value: value.into(),
        }
    }

    /// Creates a logical NOT of the given condition.
    #[must_use]
    pub fn negate(condition: Self) -> Self {
        Self::Not(Box::new(condition))
    }

    /// Creates a logical AND of the given conditions.
    #[must_use]
    pub fn all_of(conditions: Vec<Self>) -> Self {
        Self::And(conditions.into_iter().map(Box::new).collect())
    }

    /// Creates a logical OR of the given conditions.
    #[must_use]
    pub fn any_of(conditions: Vec<Self>) -> Self {
        Self::Or(conditions.into_iter().map(Box::new).collect())
    }
}

impl std::ops::Not for Condition {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}
