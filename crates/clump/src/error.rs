// crates/clump/src/error.rs
// ============================================================================
// Module: error
// Description: Error types for command assembly and parsing.
// Purpose: Separate programmer mistakes from end-user mistakes and give
//          callers one exit-code policy for both.
// Dependencies: thiserror, clump-constraints, clap
// ============================================================================

//! ## Overview
//! Two error families exist. [`BuildError`] reports mistakes in the
//! command definition itself, found when the model is assembled or
//! validated: duplicate names, constraints over undeclared parameters,
//! unsatisfiable constraints. [`ParseError`] reports everything that can
//! go wrong for one invocation: clap-level parse failures, constraint
//! violations, and [`UsageError`] vetoes raised by post-parse callbacks.
//!
//! Nothing here terminates the process. Callers decide what to print
//! and pass [`ParseError::exit_code`] to their own exit path.

use thiserror::Error;

use clump_constraints::ConstraintViolation;
use clump_constraints::UnsatisfiableConstraint;

// ============================================================================
// SECTION: Build errors
// ============================================================================

/// A mistake in the command definition, reported at assembly time.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Two parameters in one command share an identifier.
    #[error("duplicate parameter '{name}' in command '{command}'")]
    DuplicateParam {
        /// The command owning the colliding parameters.
        command: String,
        /// The repeated identifier.
        name: String,
    },
    /// Two subcommands of one command share a name.
    #[error("duplicate subcommand '{name}' in command '{command}'")]
    DuplicateSubcommand {
        /// The parent command.
        command: String,
        /// The repeated subcommand name.
        name: String,
    },
    /// A constraint references a parameter the command never declared.
    #[error("constraint references undeclared parameter '{name}' in command '{command}'")]
    UnknownConstraintParam {
        /// The command owning the constraint.
        command: String,
        /// The undeclared identifier.
        name: String,
    },
    /// A constraint can never be satisfied over its parameter list.
    #[error("in command '{command}': {source}")]
    Unsatisfiable {
        /// The command owning the constraint.
        command: String,
        /// The consistency analysis result.
        source: UnsatisfiableConstraint,
    },
}

// ============================================================================
// SECTION: Usage errors
// ============================================================================

/// An end-user mistake raised by application code after parsing.
///
/// Post-parse callbacks return this to veto an invocation that parsed
/// cleanly but makes no sense, such as mutually inconsistent values.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct UsageError {
    /// Explanation shown to the end user.
    message: String,
}

impl UsageError {
    /// Creates a usage error with the given explanation.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the explanation shown to the end user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// SECTION: Parse errors
// ============================================================================

/// A failed invocation: parse, constraint, or callback rejection.
#[derive(Debug, Error)]
pub enum ParseError {
    /// clap rejected the raw arguments.
    #[error(transparent)]
    Parser(#[from] clap::Error),
    /// A declared constraint did not hold over the parsed values.
    #[error("{0}")]
    Constraint(ConstraintViolation),
    /// A post-parse callback vetoed the invocation.
    #[error("{0}")]
    Usage(#[from] UsageError),
    /// The command definition itself was invalid.
    #[error("{0}")]
    Setup(#[from] BuildError),
}

impl ParseError {
    /// Returns the conventional exit code for this failure.
    ///
    /// Usage-level failures exit with 2, matching clap's own convention
    /// for bad invocations.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parser(error) => error.exit_code(),
            Self::Constraint(_) | Self::Usage(_) | Self::Setup(_) => 2,
        }
    }
}

impl From<ConstraintViolation> for ParseError {
    fn from(violation: ConstraintViolation) -> Self {
        Self::Constraint(violation)
    }
}
