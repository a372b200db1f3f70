// clump-constraints/src/constraint.rs
// ============================================================================
// Module: Constraint Core Types
// Description: Cardinality and conditional checks over parameter sets.
// Purpose: Define `Constraint`, its checking logic, and phrasing helpers.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! This module defines the constraint tree checked after parsing: cardinality
//! bounds over a set of parameters (all, none, at-least, at-most, exactly,
//! between), the compound forms built from them, conditional constraints
//! gated on [`Condition`] trees, and rephrasing wrappers that override the
//! user-facing text without changing semantics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;
use smallvec::smallvec;

use crate::condition::Condition;
use crate::error::ConstraintError;
use crate::error::ConstraintResult;
use crate::error::ConstraintViolation;
use crate::error::UnsatisfiableConstraint;
use crate::source::NoParams;
use crate::source::ParamState;
use crate::source::ParamsSource;

// ============================================================================
// SECTION: Constraint Definition
// ============================================================================

/// A check over a set of parameters, evaluated after parsing
///
/// A constraint is declared over a list of parameter names and verified
/// against a [`ParamsSource`]. Cardinality variants count how many of the
/// covered parameters the invocation set; compound variants combine checks;
/// `Conditional` applies a check only when its condition holds; `Rephrased`
/// swaps the user-facing phrasing of its inner check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// Every covered parameter must be set
    RequireAll,

    /// No covered parameter may be set
    AcceptNone,

    /// Either every covered parameter is set or none of them is
    AllOrNone,

    /// At most one covered parameter may be set
    ///
    /// Semantically equal to `AcceptAtMost(1)` but phrased as exclusivity.
    MutuallyExclusive,

    /// At least this many covered parameters must be set
    RequireAtLeast(usize),

    /// At most this many covered parameters may be set
    AcceptAtMost(usize),

    /// Exactly this many covered parameters must be set
    RequireExactly(usize),

    /// The number of set parameters must fall inside this inclusive range
    AcceptBetween {
        /// Minimum number of parameters that must be set.
        min: usize,
        /// Maximum number of parameters that may be set.
        max: usize,
    },

    /// Applies a check only when a condition on the invocation holds
    Conditional {
        /// Condition deciding which branch applies.
        condition: Condition,
        /// Check applied when the condition holds.
        then_check: Box<Self>,
        /// Optional check applied when the condition does not hold.
        else_check: Option<Box<Self>>,
    },

    /// Overrides the user-facing phrasing of the inner check
    Rephrased {
        /// Replacement help phrase, when overridden.
        help: Option<String>,
        /// Replacement violation message, when overridden.
        error: Option<String>,
        /// The check whose semantics still apply.
        inner: Box<Self>,
    },

    /// Logical AND: every child check must pass
    ///
    /// Checking short-circuits on the first failing child. An empty And
    /// always passes.
    And(SmallVec<[Box<Self>; 4]>),

    /// Logical OR: at least one child check must pass
    ///
    /// Checking short-circuits on the first passing child. An empty Or
    /// never passes.
    Or(SmallVec<[Box<Self>; 4]>),
}

// ============================================================================
// SECTION: Gathered State
// ============================================================================

/// Parameter states gathered for one cardinality check.
struct Tally {
    /// States of the covered parameters, in declaration order.
    states: Vec<ParamState>,
    /// How many of the covered parameters the invocation set.
    set_count: usize,
}

impl Tally {
    /// Resolves every covered parameter through the source.
    fn collect(params: &[&str], source: &dyn ParamsSource) -> ConstraintResult<Self> {
        let mut states = Vec::with_capacity(params.len());
        for name in params {
            let state =
                source.param(name).ok_or_else(|| ConstraintError::unknown_param(*name))?;
            states.push(state);
        }
        let set_count = states.iter().filter(|state| state.set).count();
        Ok(Self {
            states,
            set_count,
        })
    }

    /// Number of covered parameters.
    fn total(&self) -> usize {
        self.states.len()
    }

    /// Labels of every covered parameter.
    fn all_labels(&self) -> Vec<String> {
        self.states.iter().map(|state| state.label.clone()).collect()
    }

    /// Labels of the covered parameters the invocation set.
    fn set_labels(&self) -> Vec<String> {
        self.states.iter().filter(|state| state.set).map(|state| state.label.clone()).collect()
    }

    /// Labels of the covered parameters the invocation left unset.
    fn unset_labels(&self) -> Vec<String> {
        self.states.iter().filter(|state| !state.set).map(|state| state.label.clone()).collect()
    }
}

/// Produces the violation for a failed cardinality test.
fn enforce(
    holds: bool,
    requirement: String,
    labels: Vec<String>,
    set_count: usize,
) -> ConstraintResult {
    if holds {
        Ok(())
    } else {
        Err(ConstraintViolation {
            requirement,
            labels,
            set_count,
        }
        .into())
    }
}

// ============================================================================
// SECTION: Checking
// ============================================================================

impl Constraint {
    /// Checks this constraint over the named parameters.
    ///
    /// `params` lists the declared names the constraint covers; `source`
    /// resolves each name to its parsed state. Conditions inside
    /// `Conditional` variants may read parameters outside `params`.
    ///
    /// # Errors
    /// Returns [`ConstraintError::Violation`] when the invocation does not
    /// satisfy the constraint, and [`ConstraintError::UnknownParam`] when a
    /// referenced name is not declared by the source.
    pub fn check(&self, params: &[&str], source: &dyn ParamsSource) -> ConstraintResult {
        match self {
            Self::RequireAll => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    tally.set_count == tally.total(),
                    "the following parameters are required".to_owned(),
                    tally.unset_labels(),
                    tally.set_count,
                )
            }

            Self::AcceptNone => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    tally.set_count == 0,
                    "the following parameters should not be provided".to_owned(),
                    tally.set_labels(),
                    tally.set_count,
                )
            }

            Self::AllOrNone => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    tally.set_count == 0 || tally.set_count == tally.total(),
                    "the following parameters should be provided together (or none of them)"
                        .to_owned(),
                    tally.all_labels(),
                    tally.set_count,
                )
            }

            Self::MutuallyExclusive => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    tally.set_count <= 1,
                    "the following parameters are mutually exclusive".to_owned(),
                    tally.all_labels(),
                    tally.set_count,
                )
            }

            Self::RequireAtLeast(min) => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    tally.set_count >= *min,
                    format!("at least {min} of the following parameters must be set"),
                    tally.all_labels(),
                    tally.set_count,
                )
            }

            Self::AcceptAtMost(max) => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    tally.set_count <= *max,
                    format!("no more than {max} of the following parameters should be set"),
                    tally.all_labels(),
                    tally.set_count,
                )
            }

            Self::RequireExactly(count) => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    tally.set_count == *count,
                    format!("exactly {count} of the following parameters must be set"),
                    tally.all_labels(),
                    tally.set_count,
                )
            }

            Self::AcceptBetween {
                min,
                max,
            } => {
                let tally = Tally::collect(params, source)?;
                enforce(
                    (*min ..= *max).contains(&tally.set_count),
                    format!("between {min} and {max} of the following parameters must be set"),
                    tally.all_labels(),
                    tally.set_count,
                )
            }

            Self::Conditional {
                condition,
                then_check,
                else_check,
            } => {
                if condition.evaluate(source)? {
                    then_check
                        .check(params, source)
                        .map_err(|err| prefix_with_condition(err, condition, source))
                } else if let Some(else_check) = else_check {
                    let negated = Condition::negate(condition.clone());
                    else_check
                        .check(params, source)
                        .map_err(|err| prefix_with_condition(err, &negated, source))
                } else {
                    Ok(())
                }
            }

            Self::Rephrased {
                error,
                inner,
                ..
            } => match inner.check(params, source) {
                Err(ConstraintError::Violation(violation)) => match error {
                    Some(message) => Err(ConstraintViolation::rephrased(
                        message.clone(),
                        violation.set_count,
                    )
                    .into()),
                    None => Err(violation.into()),
                },
                other => other,
            },

            Self::And(children) => {
                for child in children {
                    child.check(params, source)?;
                }
                Ok(())
            }

            Self::Or(children) => {
                for child in children {
                    match child.check(params, source) {
                        Ok(()) => return Ok(()),
                        Err(err @ ConstraintError::UnknownParam(_)) => return Err(err),
                        Err(ConstraintError::Violation(_)) => {}
                    }
                }
                let tally = Tally::collect(params, source)?;
                Err(ConstraintViolation {
                    requirement: format!(
                        "none of the following held over these parameters: {}",
                        self.help_with(source)
                    ),
                    labels: tally.all_labels(),
                    set_count: tally.set_count,
                }
                .into())
            }
        }
    }
}

/// Prefixes a violation's phrasing with the condition that selected it.
fn prefix_with_condition(
    err: ConstraintError,
    condition: &Condition,
    source: &dyn ParamsSource,
) -> ConstraintError {
    match err {
        ConstraintError::Violation(violation) => ConstraintError::Violation(ConstraintViolation {
            requirement: format!(
                "when {}, {}",
                condition.describe(source),
                violation.requirement
            ),
            labels: violation.labels,
            set_count: violation.set_count,
        }),
        other => other,
    }
}

// ============================================================================
// SECTION: Phrasing
// ============================================================================

impl Constraint {
    /// Renders the short help phrase for this constraint.
    ///
    /// Parameter references inside conditional constraints fall back to their
    /// declared names; use [`Constraint::help_with`] to resolve labels.
    #[must_use]
    pub fn help(&self) -> String {
        self.help_with(&NoParams)
    }

    /// Renders the short help phrase, resolving parameter labels through the
    /// given source.
    #[must_use]
    pub fn help_with(&self, source: &dyn ParamsSource) -> String {
        match self {
            Self::RequireAll => "all required".to_owned(),
            Self::AcceptNone => "forbidden".to_owned(),
            Self::AllOrNone => "provide all or none".to_owned(),
            Self::MutuallyExclusive => "mutually exclusive".to_owned(),
            Self::RequireAtLeast(min) => format!("at least {min} required"),
            Self::AcceptAtMost(max) => format!("at most {max} accepted"),
            Self::RequireExactly(count) => format!("exactly {count} required"),
            Self::AcceptBetween {
                min,
                max,
            } => format!("at least {min} required, at most {max} accepted"),
            Self::Conditional {
                condition,
                then_check,
                else_check,
            } => {
                let mut text = format!(
                    "{} when {}",
                    then_check.help_with(source),
                    condition.describe(source)
                );
                if let Some(else_check) = else_check {
                    text.push_str(", otherwise ");
                    text.push_str(&else_check.help_with(source));
                }
                text
            }
            Self::Rephrased {
                help,
                inner,
                ..
            } => help.clone().unwrap_or_else(|| inner.help_with(source)),
            Self::And(children) => {
                if children.is_empty() {
                    return "no constraint".to_owned();
                }
                let parts: Vec<String> =
                    children.iter().map(|child| child.help_with(source)).collect();
                parts.join(" and ")
            }
            Self::Or(children) => {
                if children.is_empty() {
                    return "unsatisfiable".to_owned();
                }
                let parts: Vec<String> =
                    children.iter().map(|child| child.help_with(source)).collect();
                parts.join(" or ")
            }
        }
    }
}

// ============================================================================
// SECTION: Consistency
// ============================================================================

impl Constraint {
    /// Verifies that some invocation could satisfy this constraint over the
    /// given number of covered parameters.
    ///
    /// Intended for declaration time: a front end runs this once per bound
    /// constraint before any parsing happens.
    ///
    /// # Errors
    /// Returns [`UnsatisfiableConstraint`] when no assignment of set/unset
    /// parameters can pass the check.
    pub fn check_consistency(&self, param_count: usize) -> Result<(), UnsatisfiableConstraint> {
        match self {
            Self::RequireAtLeast(min) if *min > param_count => Err(self.unsatisfiable(param_count)),
            Self::RequireExactly(count) if *count > param_count => {
                Err(self.unsatisfiable(param_count))
            }
            Self::AcceptBetween {
                min, ..
            } if *min > param_count => Err(self.unsatisfiable(param_count)),

            Self::Conditional {
                then_check,
                else_check,
                ..
            } => {
                then_check.check_consistency(param_count)?;
                if let Some(else_check) = else_check {
                    else_check.check_consistency(param_count)?;
                }
                Ok(())
            }

            Self::Rephrased {
                inner, ..
            } => inner
                .check_consistency(param_count)
                .map_err(|_| self.unsatisfiable(param_count)),

            Self::And(children) => {
                for child in children {
                    child.check_consistency(param_count)?;
                }
                Ok(())
            }

            Self::Or(children) => {
                if children.is_empty() {
                    return Err(self.unsatisfiable(param_count));
                }
                if children.iter().any(|child| child.check_consistency(param_count).is_ok()) {
                    Ok(())
                } else {
                    Err(self.unsatisfiable(param_count))
                }
            }

            _ => Ok(()),
        }
    }

    /// Builds the consistency error for this constraint.
    fn unsatisfiable(&self, param_count: usize) -> UnsatisfiableConstraint {
        UnsatisfiableConstraint {
            requirement: self.help(),
            param_count,
        }
    }

    /// Reports whether this constraint can never fail over the given number
    /// of covered parameters.
    ///
    /// Front ends use this to skip rendering constraint notes that carry no
    /// information, such as `at most 3 accepted` over two parameters.
    #[must_use]
    pub fn is_no_op(&self, param_count: usize) -> bool {
        match self {
            Self::RequireAll | Self::AcceptNone => param_count == 0,
            Self::AllOrNone | Self::MutuallyExclusive => param_count <= 1,
            Self::RequireAtLeast(min) => *min == 0,
            Self::AcceptAtMost(max) => *max >= param_count,
            Self::RequireExactly(_) => false,
            Self::AcceptBetween {
                min,
                max,
            } => *min == 0 && *max >= param_count,
            Self::Conditional {
                then_check,
                else_check,
                ..
            } => {
                then_check.is_no_op(param_count)
                    && else_check.as_ref().is_none_or(|check| check.is_no_op(param_count))
            }
            Self::Rephrased {
                inner, ..
            } => inner.is_no_op(param_count),
            Self::And(children) => children.iter().all(|child| child.is_no_op(param_count)),
            Self::Or(children) => children.iter().any(|child| child.is_no_op(param_count)),
        }
    }

    /// Returns the node count of this constraint tree.
    #[must_use]
    pub fn complexity(&self) -> usize {
        match self {
            Self::Conditional {
                then_check,
                else_check,
                ..
            } => {
                1 + then_check.complexity()
                    + else_check.as_ref().map_or(0, |check| check.complexity())
            }
            Self::Rephrased {
                inner, ..
            } => 1 + inner.complexity(),
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(|child| child.complexity()).sum::<usize>()
            }
            _ => 1,
        }
    }
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl Constraint {
    /// Creates a check that every covered parameter is set.
    #[must_use]
    pub const fn require_all() -> Self {
        Self::RequireAll
    }

    /// Creates a check that no covered parameter is set.
    #[must_use]
    pub const fn accept_none() -> Self {
        Self::AcceptNone
    }

    /// Creates a check that the covered parameters are set together or not
    /// at all.
    #[must_use]
    pub const fn all_or_none() -> Self {
        Self::AllOrNone
    }

    /// Creates a check that at most one covered parameter is set.
    #[must_use]
    pub const fn mutually_exclusive() -> Self {
        Self::MutuallyExclusive
    }

    /// Creates a check that at least `min` covered parameters are set.
    #[must_use]
    pub const fn at_least(min: usize) -> Self {
        Self::RequireAtLeast(min)
    }

    /// Creates a check that at most `max` covered parameters are set.
    #[must_use]
    pub const fn at_most(max: usize) -> Self {
        Self::AcceptAtMost(max)
    }

    /// Creates a check that exactly `count` covered parameters are set.
    #[must_use]
    pub const fn exactly(count: usize) -> Self {
        Self::RequireExactly(count)
    }

    /// Creates a check that the set count falls in `min ..= max`.
    ///
    /// Backwards bounds are reordered; equal bounds collapse to
    /// [`Constraint::RequireExactly`].
    #[must_use]
    pub fn between(min: usize, max: usize) -> Self {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        if low == high {
            Self::RequireExactly(low)
        } else {
            Self::AcceptBetween {
                min: low,
                max: high,
            }
        }
    }

    /// Creates a conditional check with explicit branches.
    #[must_use]
    pub fn conditional(condition: Condition, then_check: Self, else_check: Option<Self>) -> Self {
        Self::Conditional {
            condition,
            then_check: Box::new(then_check),
            else_check: else_check.map(Box::new),
        }
    }

    /// Creates a check applied only when the condition holds.
    #[must_use]
    pub fn when(condition: Condition, then_check: Self) -> Self {
        Self::conditional(condition, then_check, None)
    }

    /// Attaches the fallback branch to a conditional check.
    ///
    /// On non-conditional constraints this returns `self` unchanged.
    #[must_use]
    pub fn otherwise(self, else_check: Self) -> Self {
        match self {
            Self::Conditional {
                condition,
                then_check,
                ..
            } => Self::Conditional {
                condition,
                then_check,
                else_check: Some(Box::new(else_check)),
            },
            other => other,
        }
    }

    /// Overrides the help phrase shown for this constraint.
    #[must_use]
    pub fn rephrased(self, help: impl Into<String>) -> Self {
        match self {
            Self::Rephrased {
                error,
                inner,
                ..
            } => Self::Rephrased {
                help: Some(help.into()),
                error,
                inner,
            },
            other => Self::Rephrased {
                help: Some(help.into()),
                error: None,
                inner: Box::new(other),
            },
        }
    }

    /// Overrides the violation message shown for this constraint.
    #[must_use]
    pub fn rephrased_error(self, error: impl Into<String>) -> Self {
        match self {
            Self::Rephrased {
                help,
                inner,
                ..
            } => Self::Rephrased {
                help,
                error: Some(error.into()),
                inner,
            },
            other => Self::Rephrased {
                help: None,
                error: Some(error.into()),
                inner: Box::new(other),
            },
        }
    }

    /// Combines two checks so both must pass, flattening nested ANDs.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut children) => {
                children.push(Box::new(other));
                Self::And(children)
            }
            first => Self::And(smallvec![Box::new(first), Box::new(other)]),
        }
    }

    /// Combines two checks so either may pass, flattening nested ORs.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut children) => {
                children.push(Box::new(other));
                Self::Or(children)
            }
            first => Self::Or(smallvec![Box::new(first), Box::new(other)]),
        }
    }

    /// Creates a logical AND of the given checks.
    #[must_use]
    pub fn all_of(constraints: Vec<Self>) -> Self {
        Self::And(constraints.into_iter().map(Box::new).collect())
    }

    /// Creates a logical OR of the given checks.
    #[must_use]
    pub fn any_of(constraints: Vec<Self>) -> Self {
        Self::Or(constraints.into_iter().map(Box::new).collect())
    }
}

// ============================================================================
// SECTION: Default Implementations
// ============================================================================

impl Default for Constraint {
    /// Creates an empty And constraint (always satisfied)
    fn default() -> Self {
        Self::And(SmallVec::new())
    }
}
