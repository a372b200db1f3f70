// clump-constraints/tests/constraint.rs
// ============================================================================
// Module: Core Constraint Tests
// Description: Exhaustive tests for constraint checking and phrasing.
// ============================================================================
//! ## Overview
//! Integration tests for cardinality checks, compound constraints,
//! conditionals, rephrasing, and consistency analysis.

#[path = "support/params.rs"]
mod params;
mod support;

use clump_constraints::Condition;
use clump_constraints::Constraint;
use clump_constraints::ConstraintError;
use clump_constraints::convenience;
use params::ParamFixture;
use support::TestResult;
use support::ensure;

/// Checks a condition and returns a test error instead of panicking.
macro_rules! check {
    ($cond:expr $(,)?) => {{
        ensure($cond, concat!("Assertion failed: ", stringify!($cond)))?;
    }};
    ($cond:expr, $($arg:tt)+) => {{
        ensure($cond, format!($($arg)+))?;
    }};
}

/// Checks equality and returns a test error instead of panicking.
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let left_val = &$left;
        let right_val = &$right;
        ensure(
            left_val == right_val,
            format!("Expected {left_val:?} == {right_val:?}"),
        )?;
    }};
}

/// Builds the three-parameter fixture most cardinality tests use.
fn two_of_three_set() -> ParamFixture {
    ParamFixture::new()
        .flag("alpha", "--alpha")
        .flag("beta", "--beta (-b)")
        .unset("gamma", "--gamma")
}

/// Names covered by [`two_of_three_set`].
const ABC: [&str; 3] = ["alpha", "beta", "gamma"];

// ============================================================================
// SECTION: Cardinality Checks
// ============================================================================

#[test]
fn test_require_all_passes_when_all_set() -> TestResult {
    let source = ParamFixture::new().flag("alpha", "--alpha").flag("beta", "--beta");
    check!(Constraint::require_all().check(&["alpha", "beta"], &source).is_ok());
    Ok(())
}

#[test]
fn test_require_all_lists_missing_parameters() -> TestResult {
    let source = two_of_three_set();
    let err = match Constraint::require_all().check(&ABC, &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "require_all should fail with one parameter unset"),
    };
    check_eq!(
        err.to_string(),
        "the following parameters are required:\n  --gamma".to_owned()
    );
    Ok(())
}

#[test]
fn test_accept_none_passes_when_nothing_set() -> TestResult {
    let source = ParamFixture::new().unset("alpha", "--alpha").unset("beta", "--beta");
    check!(Constraint::accept_none().check(&["alpha", "beta"], &source).is_ok());
    Ok(())
}

#[test]
fn test_accept_none_lists_offending_parameters() -> TestResult {
    let source = two_of_three_set();
    let err = match Constraint::accept_none().check(&ABC, &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "accept_none should fail with parameters set"),
    };
    check_eq!(
        err.to_string(),
        "the following parameters should not be provided:\n  --alpha\n  --beta (-b)".to_owned()
    );
    Ok(())
}

#[test]
fn test_all_or_none_accepts_both_extremes() -> TestResult {
    let none = ParamFixture::new().unset("alpha", "--alpha").unset("beta", "--beta");
    let all = ParamFixture::new().flag("alpha", "--alpha").flag("beta", "--beta");
    check!(Constraint::all_or_none().check(&["alpha", "beta"], &none).is_ok());
    check!(Constraint::all_or_none().check(&["alpha", "beta"], &all).is_ok());
    Ok(())
}

#[test]
fn test_all_or_none_rejects_partial_sets() -> TestResult {
    let source = two_of_three_set();
    check!(Constraint::all_or_none().check(&ABC, &source).is_err());
    Ok(())
}

#[test]
fn test_mutually_exclusive_allows_zero_or_one() -> TestResult {
    let none = ParamFixture::new().unset("alpha", "--alpha").unset("beta", "--beta");
    let one = ParamFixture::new().flag("alpha", "--alpha").unset("beta", "--beta");
    check!(Constraint::mutually_exclusive().check(&["alpha", "beta"], &none).is_ok());
    check!(Constraint::mutually_exclusive().check(&["alpha", "beta"], &one).is_ok());
    Ok(())
}

#[test]
fn test_mutually_exclusive_rejects_two_set() -> TestResult {
    let source = two_of_three_set();
    let err = match Constraint::mutually_exclusive().check(&ABC, &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "mutual exclusion should fail with two set"),
    };
    let violation = match err.as_violation() {
        Some(violation) => violation,
        None => return ensure(false, "expected a violation, not a structural error"),
    };
    check_eq!(violation.set_count, 2_usize);
    check_eq!(violation.labels.len(), 3_usize);
    check!(violation.requirement.contains("mutually exclusive"));
    Ok(())
}

#[test]
fn test_counting_bounds() -> TestResult {
    let source = two_of_three_set();
    check!(Constraint::at_least(2).check(&ABC, &source).is_ok());
    check!(Constraint::at_least(3).check(&ABC, &source).is_err());
    check!(Constraint::at_most(2).check(&ABC, &source).is_ok());
    check!(Constraint::at_most(1).check(&ABC, &source).is_err());
    check!(Constraint::exactly(2).check(&ABC, &source).is_ok());
    check!(Constraint::exactly(1).check(&ABC, &source).is_err());
    check!(Constraint::between(1, 2).check(&ABC, &source).is_ok());
    check!(Constraint::between(0, 1).check(&ABC, &source).is_err());
    Ok(())
}

#[test]
fn test_empty_parameter_list_is_vacuous() -> TestResult {
    let source = ParamFixture::new();
    check!(Constraint::require_all().check(&[], &source).is_ok());
    check!(Constraint::accept_none().check(&[], &source).is_ok());
    check!(Constraint::at_least(1).check(&[], &source).is_err());
    Ok(())
}

// ============================================================================
// SECTION: Construction Normalization
// ============================================================================

#[test]
fn test_between_normalizes_bounds() -> TestResult {
    check_eq!(Constraint::between(3, 1), Constraint::between(1, 3));
    check_eq!(Constraint::between(2, 2), Constraint::exactly(2));
    Ok(())
}

#[test]
fn test_default_is_always_satisfied() -> TestResult {
    let source = two_of_three_set();
    check!(Constraint::default().check(&ABC, &source).is_ok());
    check!(Constraint::default().is_no_op(3));
    Ok(())
}

// ============================================================================
// SECTION: Conditional Constraints
// ============================================================================

#[test]
fn test_conditional_applies_then_branch() -> TestResult {
    let source = ParamFixture::new()
        .value("format", "--format", "json")
        .unset("out", "--out")
        .flag("verbose", "--verbose");
    let constraint = Constraint::when(
        Condition::equal("format", "json"),
        Constraint::require_all(),
    );

    let err = match constraint.check(&["out"], &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "then branch should have been enforced"),
    };
    check_eq!(
        err.to_string(),
        "when --format = 'json', the following parameters are required:\n  --out".to_owned()
    );
    Ok(())
}

#[test]
fn test_conditional_without_else_is_noop_when_condition_fails() -> TestResult {
    let source = ParamFixture::new()
        .value("format", "--format", "text")
        .unset("out", "--out")
        .flag("verbose", "--verbose");
    let constraint = Constraint::when(
        Condition::equal("format", "json"),
        Constraint::require_all(),
    );
    check!(constraint.check(&["out"], &source).is_ok());
    Ok(())
}

#[test]
fn test_conditional_else_branch_prefixes_negated_condition() -> TestResult {
    let source = ParamFixture::new()
        .unset("interactive", "--interactive")
        .unset("out", "--out");
    let constraint = Constraint::when(Condition::is_set("interactive"), Constraint::accept_none())
        .otherwise(Constraint::require_all());

    let err = match constraint.check(&["out"], &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "else branch should have been enforced"),
    };
    check!(
        err.to_string().starts_with("when --interactive is not set,"),
        "unexpected message: {}",
        err
    );
    Ok(())
}

// ============================================================================
// SECTION: Rephrasing
// ============================================================================

#[test]
fn test_rephrased_error_replaces_message() -> TestResult {
    let source = two_of_three_set();
    let constraint =
        Constraint::mutually_exclusive().rephrased_error("pick either --alpha or --beta, not both");

    let err = match constraint.check(&ABC, &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "rephrased constraint should still fail"),
    };
    check_eq!(err.to_string(), "pick either --alpha or --beta, not both".to_owned());
    Ok(())
}

#[test]
fn test_rephrased_help_replaces_phrase() -> TestResult {
    let constraint = Constraint::at_least(1).rephrased("pick one");
    check_eq!(constraint.help(), "pick one".to_owned());
    Ok(())
}

#[test]
fn test_rephrasing_merges_instead_of_nesting() -> TestResult {
    let constraint = Constraint::at_least(1).rephrased("pick one").rephrased_error("boom");
    check_eq!(constraint.complexity(), 2_usize);
    Ok(())
}

// ============================================================================
// SECTION: Compound Constraints
// ============================================================================

#[test]
fn test_and_requires_every_child() -> TestResult {
    let source = two_of_three_set();
    let passing = Constraint::at_least(1).and(Constraint::at_most(2));
    let failing = Constraint::at_least(1).and(Constraint::at_most(1));
    check!(passing.check(&ABC, &source).is_ok());
    check!(failing.check(&ABC, &source).is_err());
    Ok(())
}

#[test]
fn test_or_passes_on_any_child() -> TestResult {
    let source = two_of_three_set();
    let constraint = Constraint::accept_none().or(Constraint::at_least(2));
    check!(constraint.check(&ABC, &source).is_ok());
    Ok(())
}

#[test]
fn test_or_reports_all_alternatives_on_failure() -> TestResult {
    let source = two_of_three_set();
    let constraint = Constraint::accept_none().or(Constraint::exactly(3));
    let err = match constraint.check(&ABC, &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "both alternatives should have failed"),
    };
    check!(err.to_string().contains("forbidden or exactly 3 required"));
    Ok(())
}

#[test]
fn test_unknown_parameter_is_structural_error() -> TestResult {
    let source = two_of_three_set();
    let err = match Constraint::require_all().check(&["alpha", "missing"], &source) {
        Err(err) => err,
        Ok(()) => return ensure(false, "unknown parameter should be rejected"),
    };
    check_eq!(err, ConstraintError::unknown_param("missing"));
    Ok(())
}

// ============================================================================
// SECTION: Help Phrasing
// ============================================================================

#[test]
fn test_help_phrases() -> TestResult {
    check_eq!(Constraint::require_all().help(), "all required".to_owned());
    check_eq!(Constraint::accept_none().help(), "forbidden".to_owned());
    check_eq!(Constraint::all_or_none().help(), "provide all or none".to_owned());
    check_eq!(Constraint::mutually_exclusive().help(), "mutually exclusive".to_owned());
    check_eq!(Constraint::at_least(2).help(), "at least 2 required".to_owned());
    check_eq!(Constraint::at_most(3).help(), "at most 3 accepted".to_owned());
    check_eq!(Constraint::exactly(1).help(), "exactly 1 required".to_owned());
    check_eq!(
        Constraint::between(1, 3).help(),
        "at least 1 required, at most 3 accepted".to_owned()
    );
    check_eq!(convenience::require_any().help(), "at least 1 required".to_owned());
    check_eq!(convenience::require_one().help(), "exactly 1 required".to_owned());
    Ok(())
}

#[test]
fn test_conditional_help_mentions_condition() -> TestResult {
    let constraint = Constraint::when(Condition::is_set("json"), Constraint::at_least(1));
    check_eq!(constraint.help(), "at least 1 required when json is set".to_owned());
    Ok(())
}

// ============================================================================
// SECTION: Consistency Analysis
// ============================================================================

#[test]
fn test_consistency_rejects_impossible_minimums() -> TestResult {
    check!(Constraint::at_least(3).check_consistency(2).is_err());
    check!(Constraint::exactly(4).check_consistency(3).is_err());
    check!(Constraint::between(3, 5).check_consistency(2).is_err());
    check!(Constraint::at_least(2).check_consistency(2).is_ok());
    Ok(())
}

#[test]
fn test_consistency_descends_into_branches() -> TestResult {
    let constraint = Constraint::when(Condition::is_set("json"), Constraint::at_least(5));
    check!(constraint.check_consistency(2).is_err());
    Ok(())
}

#[test]
fn test_consistency_accepts_or_with_one_viable_child() -> TestResult {
    let constraint = Constraint::at_least(5).or(Constraint::accept_none());
    check!(constraint.check_consistency(2).is_ok());
    check!(Constraint::any_of(Vec::new()).check_consistency(2).is_err());
    Ok(())
}

#[test]
fn test_unsatisfiable_message_names_requirement() -> TestResult {
    let err = match Constraint::at_least(3).check_consistency(1) {
        Err(err) => err,
        Ok(()) => return ensure(false, "expected an unsatisfiable constraint"),
    };
    check_eq!(
        err.to_string(),
        "unsatisfiable constraint: 'at least 3 required' declared over 1 parameter(s)".to_owned()
    );
    Ok(())
}

// ============================================================================
// SECTION: No-Op Analysis
// ============================================================================

#[test]
fn test_no_op_detection() -> TestResult {
    check!(Constraint::at_most(3).is_no_op(2));
    check!(!Constraint::at_most(1).is_no_op(2));
    check!(Constraint::at_least(0).is_no_op(5));
    check!(Constraint::mutually_exclusive().is_no_op(1));
    check!(!Constraint::mutually_exclusive().is_no_op(2));
    check!(Constraint::require_all().is_no_op(0));
    Ok(())
}
