// clump-constraints/src/error.rs
// ============================================================================
// Module: Constraint Error Definitions
// Description: Structured diagnostics for constraint checking.
// Purpose: Provide violation, structural, and consistency error types.
// Dependencies: serde::{Serialize, Deserialize}, std::fmt
// ============================================================================

//! ## Overview
//! Centralizes the constraint checking errors, their user-facing messaging,
//! and conversions, so front ends can surface violations verbatim while
//! keeping structural problems (unknown names, impossible bounds) distinct.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Violation
// ============================================================================

/// A constraint that held structurally but was not satisfied by the invocation
///
/// `Display` renders the message shown to the end user: the requirement
/// phrase, then the covered parameter labels one per line, indented to match
/// the help renderer's column indent.
///
/// # Invariants
/// - `labels` may be empty when the phrasing was overridden wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Phrase naming the failed requirement, e.g.
    /// `at least 2 of the following parameters must be set`.
    pub requirement: String,

    /// Labels of the parameters the failed check covered.
    pub labels: Vec<String>,

    /// How many of the covered parameters the invocation actually set.
    pub set_count: usize,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return write!(f, "{}", self.requirement);
        }
        write!(f, "{}:", self.requirement)?;
        for label in &self.labels {
            write!(f, "\n  {label}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConstraintViolation {}

impl ConstraintViolation {
    /// Creates a violation whose entire message was supplied by a rephrasing.
    #[must_use]
    pub fn rephrased(message: impl Into<String>, set_count: usize) -> Self {
        Self {
            requirement: message.into(),
            labels: Vec::new(),
            set_count,
        }
    }

    /// Returns the rendered user-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// SECTION: Checking Errors
// ============================================================================

/// Errors that can occur while checking a constraint
///
/// Violations are the expected failure mode; the remaining variants indicate
/// a mismatch between the constraint and the declared parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintError {
    /// A constraint or condition referenced a parameter the source does not
    /// declare
    UnknownParam(String),

    /// The constraint held structurally but the invocation did not satisfy it
    Violation(ConstraintViolation),
}

// ============================================================================
// SECTION: Display Implementation
// ============================================================================

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParam(name) => {
                write!(f, "constraint references unknown parameter '{name}'")
            }
            Self::Violation(violation) => violation.fmt(f),
        }
    }
}

impl std::error::Error for ConstraintError {}

impl From<ConstraintViolation> for ConstraintError {
    fn from(violation: ConstraintViolation) -> Self {
        Self::Violation(violation)
    }
}

// ============================================================================
// SECTION: Convenience Helpers
// ============================================================================

impl ConstraintError {
    /// Creates an unknown-parameter error.
    pub fn unknown_param(name: impl Into<String>) -> Self {
        Self::UnknownParam(name.into())
    }

    /// Returns the violation when this error is one.
    #[must_use]
    pub const fn as_violation(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Violation(violation) => Some(violation),
            Self::UnknownParam(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Consistency Errors
// ============================================================================

/// A constraint no invocation could ever satisfy over the given parameters
///
/// Raised by consistency checks at declaration time, before any parsing runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsatisfiableConstraint {
    /// Help phrase of the offending constraint.
    pub requirement: String,

    /// Number of parameters the constraint was declared over.
    pub param_count: usize,
}

impl fmt::Display for UnsatisfiableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsatisfiable constraint: '{}' declared over {} parameter(s)",
            self.requirement, self.param_count
        )
    }
}

impl std::error::Error for UnsatisfiableConstraint {}

// ============================================================================
// SECTION: Result Alias
// ============================================================================

/// Convenient Result type for constraint operations
pub type ConstraintResult<T = ()> = Result<T, ConstraintError>;
