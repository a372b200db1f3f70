// clump-constraints/src/serde_support.rs
// ============================================================================
// Module: Constraint Serde Support
// Description: Serde helpers for constraint serialization and validation.
// Purpose: Provide error models, configuration, and tree validation helpers.
// Dependencies: serde_json, std::fmt
// ============================================================================

//! ## Overview
//! Constraint trees travel as JSON between tooling and front ends. This
//! module validates deserialized trees before use: depth limits against
//! pathological nesting, and bound checks serde cannot express (builders
//! normalize backwards ranges, raw deserialization does not).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::condition::Condition;
use crate::constraint::Constraint;

// ============================================================================
// SECTION: Serde Errors
// ============================================================================

/// Error types that can occur during constraint serialization/deserialization
///
/// # Invariants
/// - None. Variants capture structured validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerdeError {
    /// Invalid constraint structure
    InvalidStructure(String),

    /// Constraint tree too deep
    TooDeep {
        /// Maximum supported tree depth
        max_depth: usize,
        /// Depth encountered during validation
        actual_depth: usize,
    },

    /// A between check whose bounds are reversed
    InvalidBounds {
        /// Declared minimum number of set parameters.
        min: usize,
        /// Declared maximum number of set parameters.
        max: usize,
    },
}

// ============================================================================
// SECTION: Display Implementation
// ============================================================================

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStructure(msg) => {
                write!(f, "Invalid constraint structure: {msg}")
            }
            Self::TooDeep {
                max_depth,
                actual_depth,
            } => {
                write!(f, "Constraint tree too deep: {actual_depth} levels (max {max_depth})")
            }
            Self::InvalidBounds {
                min,
                max,
            } => {
                write!(f, "Invalid between bounds: min {min} exceeds max {max}")
            }
        }
    }
}

impl std::error::Error for SerdeError {}

// ============================================================================
// SECTION: Validator Configuration
// ============================================================================

/// Configuration for constraint validation
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Maximum allowed depth for constraint trees
    pub max_depth: usize,

    /// Whether to allow empty And/Or constraints
    pub allow_empty_logical: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            allow_empty_logical: true,
        }
    }
}

// ============================================================================
// SECTION: Constraint Validator
// ============================================================================

/// Validator for constraint trees
///
/// # Invariants
/// - Uses the stored [`ValidatorConfig`] for all validation decisions.
#[derive(Debug, Default)]
pub struct ConstraintValidator {
    /// Validation configuration for structure limits.
    config: ValidatorConfig,
}

impl ConstraintValidator {
    /// Creates a new validator with the given configuration
    #[must_use]
    pub const fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
        }
    }

    /// Creates a validator with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: ValidatorConfig::default(),
        }
    }

    /// Validates a constraint tree
    ///
    /// Structural validation only; whether the constraint is satisfiable over
    /// a concrete parameter set is [`Constraint::check_consistency`]'s job.
    ///
    /// # Errors
    /// Returns [`SerdeError`] when the constraint violates structural limits.
    pub fn validate(&self, constraint: &Constraint) -> Result<(), SerdeError> {
        self.validate_depth(constraint, 0)?;
        self.validate_structure(constraint)?;
        Ok(())
    }

    /// Validates the depth of a constraint tree
    fn validate_depth(&self, constraint: &Constraint, current_depth: usize) -> Result<(), SerdeError> {
        if current_depth > self.config.max_depth {
            return Err(SerdeError::TooDeep {
                max_depth: self.config.max_depth,
                actual_depth: current_depth,
            });
        }

        match constraint {
            Constraint::And(children) | Constraint::Or(children) => {
                for child in children {
                    self.validate_depth(child, current_depth + 1)?;
                }
                Ok(())
            }
            Constraint::Conditional {
                condition,
                then_check,
                else_check,
            } => {
                self.validate_condition_depth(condition, current_depth + 1)?;
                self.validate_depth(then_check, current_depth + 1)?;
                if let Some(else_check) = else_check {
                    self.validate_depth(else_check, current_depth + 1)?;
                }
                Ok(())
            }
            Constraint::Rephrased {
                inner, ..
            } => self.validate_depth(inner, current_depth + 1),
            _ => Ok(()),
        }
    }

    /// Validates the depth of a condition tree
    fn validate_condition_depth(
        &self,
        condition: &Condition,
        current_depth: usize,
    ) -> Result<(), SerdeError> {
        if current_depth > self.config.max_depth {
            return Err(SerdeError::TooDeep {
                max_depth: self.config.max_depth,
                actual_depth: current_depth,
            });
        }

        match condition {
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    self.validate_condition_depth(child, current_depth + 1)?;
                }
                Ok(())
            }
            Condition::Not(inner) => self.validate_condition_depth(inner, current_depth + 1),
            _ => Ok(()),
        }
    }

    /// Validates the logical structure of a constraint tree
    fn validate_structure(&self, constraint: &Constraint) -> Result<(), SerdeError> {
        match constraint {
            Constraint::And(children) | Constraint::Or(children) => {
                if !self.config.allow_empty_logical && children.is_empty() {
                    return Err(SerdeError::InvalidStructure(
                        "Empty logical constraint not allowed".to_owned(),
                    ));
                }
                for child in children {
                    self.validate_structure(child)?;
                }
                Ok(())
            }

            Constraint::AcceptBetween {
                min,
                max,
            } => {
                if min > max {
                    return Err(SerdeError::InvalidBounds {
                        min: *min,
                        max: *max,
                    });
                }
                Ok(())
            }

            Constraint::Conditional {
                then_check,
                else_check,
                ..
            } => {
                self.validate_structure(then_check)?;
                if let Some(else_check) = else_check {
                    self.validate_structure(else_check)?;
                }
                Ok(())
            }

            Constraint::Rephrased {
                inner, ..
            } => self.validate_structure(inner),

            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Convenience Functions
// ============================================================================

/// Convenience functions for serialization without an explicit validator
///
/// These functions use default configuration and are suitable for most use
/// cases. For custom limits, create a [`ConstraintValidator`] explicitly.
pub mod convenience {
    use super::Constraint;
    use super::ConstraintValidator;
    use super::SerdeError;

    /// Serialize a constraint to JSON with default validation
    ///
    /// # Errors
    /// Returns [`SerdeError`] if validation fails or serialization fails.
    pub fn to_json(constraint: &Constraint) -> Result<String, SerdeError> {
        ConstraintValidator::with_defaults().validate(constraint)?;
        serde_json::to_string_pretty(constraint)
            .map_err(|e| SerdeError::InvalidStructure(e.to_string()))
    }

    /// Deserialize a constraint from JSON with default validation
    ///
    /// # Errors
    /// Returns [`SerdeError`] if parsing fails or validation fails.
    pub fn from_json(json_str: &str) -> Result<Constraint, SerdeError> {
        let constraint: Constraint = serde_json::from_str(json_str)
            .map_err(|e| SerdeError::InvalidStructure(e.to_string()))?;
        ConstraintValidator::with_defaults().validate(&constraint)?;
        Ok(constraint)
    }

    /// Validate a constraint with default configuration
    ///
    /// # Errors
    /// Returns [`SerdeError`] when the constraint violates structural limits.
    pub fn validate(constraint: &Constraint) -> Result<(), SerdeError> {
        ConstraintValidator::with_defaults().validate(constraint)
    }

    /// Quick validation check that returns a boolean
    ///
    /// Useful for simple validity checks where error details aren't needed.
    #[must_use]
    pub fn is_valid(constraint: &Constraint) -> bool {
        validate(constraint).is_ok()
    }
}
