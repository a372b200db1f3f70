// clump-constraints/src/lib.rs
// ============================================================================
// Module: Constraint Root
// Description: Public API surface for the constraint subsystem.
// Purpose: Wire together core modules and re-exports.
// Dependencies: crate::{condition, constraint, error, serde_support, source}
// ============================================================================

//! ## Overview
//! Engine-agnostic parameter constraints for command-line interfaces: declare
//! cardinality checks over named parameters, evaluate them against any
//! [`ParamsSource`], and render their help and violation phrasing. No parser
//! types appear in this crate; front ends adapt their parsed state to the
//! source trait.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod condition;
pub mod constraint;
pub mod error;
pub mod serde_support;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use condition::Condition;
pub use constraint::Constraint;
pub use error::ConstraintError;
pub use error::ConstraintResult;
pub use error::ConstraintViolation;
pub use error::UnsatisfiableConstraint;
pub use serde_support::ConstraintValidator;
pub use serde_support::SerdeError;
pub use serde_support::ValidatorConfig;
pub use source::NoParams;
pub use source::ParamState;
pub use source::ParamsSource;
pub use source::label_or_name;

// ============================================================================
// SECTION: Convenience Constructors
// ============================================================================

/// Convenience functions for the common named checks
pub mod convenience {
    use super::Constraint;

    /// Creates a check that at least one covered parameter is set
    #[must_use]
    pub const fn require_any() -> Constraint {
        Constraint::at_least(1)
    }

    /// Creates a check that exactly one covered parameter is set
    #[must_use]
    pub const fn require_one() -> Constraint {
        Constraint::exactly(1)
    }

    /// Creates a check that the covered parameters are set together or not
    /// at all, phrased for option-group headings
    #[must_use]
    pub fn grouped_all_or_none() -> Constraint {
        Constraint::all_or_none().rephrased("provide together")
    }
}
