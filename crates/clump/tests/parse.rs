// crates/clump/tests/parse.rs
// ============================================================================
// Module: Parse Pipeline Tests
// Description: End-to-end tests for the parse pipeline.
// ============================================================================
//! ## Overview
//! Integration tests covering model validation, the help-token scan,
//! clap delegation, constraint checking, and post-parse callbacks.

mod support;

use clump::Command;
use clump::ContextSettings;
use clump::Opt;
use clump::OptionGroup;
use clump::Outcome;
use clump::ParseError;
use clump::Positional;
use clump::UsageError;
use clump::constraints::Condition;
use clump::constraints::Constraint;
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

/// Unwraps a run outcome or fails the test with the actual variant.
fn run_context(outcome: Result<Outcome, ParseError>) -> TestResult<clump::Context> {
    match outcome {
        Ok(Outcome::Run(context)) => Ok(context),
        Ok(other) => Err(format!("expected Outcome::Run, got {other:?}").into()),
        Err(error) => Err(format!("expected Outcome::Run, got error: {error}").into()),
    }
}

// ============================================================================
// SECTION: Basic Parsing
// ============================================================================

#[test]
fn test_flags_and_values_reach_the_context() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("verbose").short('v').flag())
        .opt(Opt::new("output").short('o'))
        .positional(Positional::new("input").required(true));
    let context =
        run_context(command.try_parse_from(["prog", "-v", "-o", "out.txt", "in.txt"]))?;

    check!(context.get_flag("verbose"));
    check_eq!(context.get_one::<String>("output"), Some(&"out.txt".to_owned()));
    check_eq!(context.get_one::<String>("input"), Some(&"in.txt".to_owned()));
    check!(context.subcommand_path().is_empty());
    Ok(())
}

#[test]
fn test_defaults_do_not_count_as_set() -> TestResult {
    let command = Command::new("prog").opt(Opt::new("level").default_value("info"));
    let context = run_context(command.try_parse_from(["prog"]))?;

    check_eq!(context.get_one::<String>("level"), Some(&"info".to_owned()));
    check!(!context.is_set("level"));
    check_eq!(context.value_display("level"), None);
    Ok(())
}

#[test]
fn test_supplied_values_are_set_and_displayable() -> TestResult {
    let command = Command::new("prog").opt(Opt::new("level").default_value("info"));
    let context = run_context(command.try_parse_from(["prog", "--level", "debug"]))?;

    check!(context.is_set("level"));
    check_eq!(context.value_display("level"), Some("debug".to_owned()));
    Ok(())
}

#[test]
fn test_flags_carry_no_textual_value() -> TestResult {
    let command = Command::new("prog").opt(Opt::new("verbose").flag());
    let context = run_context(command.try_parse_from(["prog", "--verbose"]))?;

    check!(context.is_set("verbose"));
    // A bare flag set the boolean, but no text appeared on the command
    // line, so nothing compares equal to the literal "true".
    check_eq!(context.value_display("verbose"), None);
    let equal = match Condition::equal("verbose", "true").evaluate(&context) {
        Ok(value) => value,
        Err(error) => return Err(format!("condition failed to evaluate: {error}").into()),
    };
    check!(!equal);
    Ok(())
}

#[test]
fn test_eat_all_consumes_until_the_next_option() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("files").eat_all())
        .opt(Opt::new("verbose").flag());
    let context =
        run_context(command.try_parse_from(["prog", "--files", "a", "b", "c", "--verbose"]))?;

    let files: Vec<String> =
        context.get_many::<String>("files").unwrap_or_default().into_iter().cloned().collect();
    check_eq!(files, vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]);
    check!(context.get_flag("verbose"));
    Ok(())
}

#[test]
fn test_choices_reject_values_off_the_list() -> TestResult {
    let command =
        Command::new("prog").opt(Opt::new("color").choices(["auto", "always", "never"]));
    check!(matches!(
        command.try_parse_from(["prog", "--color", "sometimes"]),
        Err(ParseError::Parser(_))
    ));
    check!(command.try_parse_from(["prog", "--color", "never"]).is_ok());
    Ok(())
}

// ============================================================================
// SECTION: Help Scan
// ============================================================================

#[test]
fn test_help_flag_short_circuits_before_clap() -> TestResult {
    // The required positional is missing, yet help must still render.
    let command = Command::new("prog").positional(Positional::new("input").required(true));
    let outcome = command.try_parse_from(["prog", "--help"]);
    match outcome {
        Ok(Outcome::Help(rendered)) => check!(rendered.starts_with("Usage: prog")),
        other => check!(false, "expected Outcome::Help, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_help_scan_descends_into_subcommands() -> TestResult {
    let command = Command::new("prog")
        .subcommand(Command::new("copy").about("Copy things"));
    let outcome = command.try_parse_from(["prog", "copy", "-h"]);
    match outcome {
        Ok(Outcome::Help(rendered)) => check!(rendered.starts_with("Usage: prog copy")),
        other => check!(false, "expected Outcome::Help, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_help_scan_stops_at_the_separator() -> TestResult {
    let command = Command::new("prog").positional(Positional::new("args").multiple());
    let context = run_context(command.try_parse_from(["prog", "--", "--help"]))?;

    let args: Vec<String> =
        context.get_many::<String>("args").unwrap_or_default().into_iter().cloned().collect();
    check_eq!(args, vec!["--help".to_owned()]);
    Ok(())
}

#[test]
fn test_custom_help_names_replace_the_defaults() -> TestResult {
    let command = Command::new("prog").settings(ContextSettings {
        help_option_names: vec!["--assist".to_owned()],
        ..ContextSettings::default()
    });

    check!(matches!(command.try_parse_from(["prog", "--assist"]), Ok(Outcome::Help(_))));
    // The stock spelling now falls through to clap, which rejects it.
    check!(matches!(command.try_parse_from(["prog", "--help"]), Err(ParseError::Parser(_))));
    Ok(())
}

#[test]
fn test_help_scan_skips_option_values() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("name"))
        .subcommand(Command::new("deploy").about("Deploy things"));

    // "deploy" is the value of --name, not a subcommand: the help
    // rendered is the root's, not the subcommand's.
    match command.try_parse_from(["prog", "--name", "deploy", "--help"]) {
        Ok(Outcome::Help(rendered)) => {
            check!(rendered.starts_with("Usage: prog [OPTIONS]"), "got:\n{rendered}");
        }
        other => check!(false, "expected Outcome::Help, got {other:?}"),
    }

    // A help spelling in value position never renders help; clap gets
    // the tokens and rejects them.
    check!(matches!(
        command.try_parse_from(["prog", "--name", "--help"]),
        Err(ParseError::Parser(_))
    ));
    Ok(())
}

#[test]
fn test_help_scan_skips_eat_all_values_until_an_option() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("files").eat_all())
        .subcommand(Command::new("sync").about("Synchronize"));

    // "a" and "sync" ride along as values of --files; the option-like
    // -h ends the run, so the help shown is the root's.
    match command.try_parse_from(["prog", "--files", "a", "sync", "-h"]) {
        Ok(Outcome::Help(rendered)) => {
            check!(rendered.starts_with("Usage: prog [OPTIONS]"), "got:\n{rendered}");
        }
        other => check!(false, "expected Outcome::Help, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_version_flag_reports_the_version() -> TestResult {
    let command = Command::new("prog").version("1.2.3");
    match command.try_parse_from(["prog", "--version"]) {
        Ok(Outcome::Version(rendered)) => check!(rendered.contains("1.2.3")),
        other => check!(false, "expected Outcome::Version, got {other:?}"),
    }
    Ok(())
}

// ============================================================================
// SECTION: Constraints
// ============================================================================

/// A destination group where exactly one choice must be given.
fn destination_command() -> Command {
    Command::new("backup").group(
        OptionGroup::new("Destination")
            .constraint(Constraint::exactly(1))
            .opt(Opt::new("to-dir").short('d'))
            .opt(Opt::new("to-host")),
    )
}

#[test]
fn test_group_constraint_passes_and_fails() -> TestResult {
    check!(destination_command().try_parse_from(["backup", "--to-dir", "/tmp"]).is_ok());

    let err = match destination_command().try_parse_from(["backup"]) {
        Err(ParseError::Constraint(violation)) => violation,
        other => {
            return ensure(false, format!("expected a constraint violation, got {other:?}"));
        }
    };
    let message = err.to_string();
    check!(message.contains("exactly 1"), "unexpected message: {message}");
    check!(message.contains("--to-dir (-d)"), "unexpected message: {message}");
    check!(message.contains("--to-host"), "unexpected message: {message}");
    Ok(())
}

#[test]
fn test_group_constraint_ignores_parameters_outside_the_group() -> TestResult {
    let command = destination_command().opt(Opt::new("verbose").flag());
    // Only --verbose set: the group still has zero of its members.
    check!(matches!(
        command.try_parse_from(["backup", "--verbose"]),
        Err(ParseError::Constraint(_))
    ));
    Ok(())
}

#[test]
fn test_command_constraint_spans_groups_and_positionals() -> TestResult {
    let command = Command::new("prog")
        .positional(Positional::new("input"))
        .opt(Opt::new("stdin").flag())
        .constraint(Constraint::exactly(1), ["input", "stdin"]);

    check!(command.try_parse_from(["prog", "file.txt"]).is_ok());
    check!(matches!(command.try_parse_from(["prog"]), Err(ParseError::Constraint(_))));
    Ok(())
}

#[test]
fn test_positional_labels_match_their_help_spelling() -> TestResult {
    let command = Command::new("prog")
        .positional(Positional::new("input-file"))
        .opt(Opt::new("stdin").flag())
        .constraint(Constraint::exactly(1), ["input-file", "stdin"]);

    let err = match command.try_parse_from(["prog"]) {
        Err(ParseError::Constraint(violation)) => violation,
        other => {
            return ensure(false, format!("expected a constraint violation, got {other:?}"));
        }
    };
    // The violation names the positional the way the help page does.
    let message = err.to_string();
    check!(message.contains("INPUT_FILE"), "unexpected message: {message}");
    check!(!message.contains("input-file"), "unexpected message: {message}");
    Ok(())
}

#[test]
fn test_conditional_constraint_reads_other_parameters() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("json").flag())
        .opt(Opt::new("pretty").flag())
        .constraint(
            Constraint::when(Condition::is_set("json"), Constraint::require_all()),
            ["pretty"],
        );

    check!(command.try_parse_from(["prog"]).is_ok());
    check!(command.try_parse_from(["prog", "--json", "--pretty"]).is_ok());
    let err = match command.try_parse_from(["prog", "--json"]) {
        Err(ParseError::Constraint(violation)) => violation,
        other => {
            return ensure(false, format!("expected a constraint violation, got {other:?}"));
        }
    };
    check!(err.to_string().contains("when"), "unexpected message: {err}");
    Ok(())
}

#[test]
fn test_rephrased_constraint_error_survives_the_pipeline() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("fast").flag())
        .opt(Opt::new("careful").flag())
        .constraint(
            Constraint::mutually_exclusive().rephrased_error("pick a speed or pick safety"),
            ["fast", "careful"],
        );

    let err = match command.try_parse_from(["prog", "--fast", "--careful"]) {
        Err(ParseError::Constraint(violation)) => violation,
        other => {
            return ensure(false, format!("expected a constraint violation, got {other:?}"));
        }
    };
    check_eq!(err.to_string(), "pick a speed or pick safety".to_owned());
    Ok(())
}

// ============================================================================
// SECTION: Callbacks
// ============================================================================

/// Order of callback execution, recorded by each hook.
#[derive(Debug, Default, PartialEq, Eq)]
struct Audit(Vec<&'static str>);

/// Appends one entry to the audit trail stored in the context extras.
fn record(context: &mut clump::Context, entry: &'static str) {
    let mut audit = context.remove_extra::<Audit>().unwrap_or_default();
    audit.0.push(entry);
    context.insert_extra(audit);
}

#[test]
fn test_callbacks_run_groups_first_in_declaration_order() -> TestResult {
    let command = Command::new("prog")
        .group(OptionGroup::new("First").opt(Opt::new("a").flag()).post_parse(|context| {
            record(context, "first");
            Ok(())
        }))
        .group(OptionGroup::new("Second").opt(Opt::new("b").flag()).post_parse(|context| {
            record(context, "second");
            Ok(())
        }))
        .post_parse(|context| {
            record(context, "command");
            Ok(())
        });

    let context = run_context(command.try_parse_from(["prog"]))?;
    check_eq!(context.extra::<Audit>(), Some(&Audit(vec!["first", "second", "command"])));
    Ok(())
}

#[test]
fn test_callbacks_observe_a_constraint_valid_context() -> TestResult {
    let command = Command::new("prog")
        .group(
            OptionGroup::new("Input")
                .constraint(Constraint::at_least(1))
                .opt(Opt::new("file").flag())
                .post_parse(|context| {
                    record(context, "ran");
                    Ok(())
                }),
        );

    // Constraint fails, so the callback must never run.
    check!(matches!(command.try_parse_from(["prog"]), Err(ParseError::Constraint(_))));
    let context = run_context(command.try_parse_from(["prog", "--file"]))?;
    check_eq!(context.extra::<Audit>(), Some(&Audit(vec!["ran"])));
    Ok(())
}

#[test]
fn test_callback_veto_becomes_a_usage_error() -> TestResult {
    let command = Command::new("prog").opt(Opt::new("jobs").default_value("1")).post_parse(
        |context| {
            if context.value_display("jobs").as_deref() == Some("0") {
                return Err(UsageError::new("at least one job is required"));
            }
            Ok(())
        },
    );

    check!(command.try_parse_from(["prog", "--jobs", "2"]).is_ok());
    match command.try_parse_from(["prog", "--jobs", "0"]) {
        Err(ParseError::Usage(error)) => {
            check_eq!(error.message(), "at least one job is required");
        }
        other => check!(false, "expected a usage error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_callbacks_may_adjust_the_settings_copy() -> TestResult {
    let command = Command::new("prog").post_parse(|context| {
        context.settings_mut().max_content_width = 72;
        Ok(())
    });
    let context = run_context(command.try_parse_from(["prog"]))?;
    check_eq!(context.settings().max_content_width, 72);
    Ok(())
}

// ============================================================================
// SECTION: Subcommands And Settings
// ============================================================================

#[test]
fn test_subcommand_path_and_parameter_shadowing() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("level").default_value("outer"))
        .subcommand(Command::new("run").opt(Opt::new("level").default_value("inner")));

    let context = run_context(command.try_parse_from(["prog", "run", "--level", "hot"]))?;
    check_eq!(context.subcommand_path(), vec!["run"]);
    check_eq!(context.command(), "run");
    // The inner declaration shadows the outer one of the same name.
    check_eq!(context.get_one::<String>("level"), Some(&"hot".to_owned()));
    Ok(())
}

#[test]
fn test_subcommands_inherit_settings_wholesale() -> TestResult {
    let parent_settings = ContextSettings {
        max_content_width: 60,
        ..ContextSettings::default()
    };
    let command = Command::new("prog")
        .settings(parent_settings)
        .subcommand(Command::new("inherits"))
        .subcommand(Command::new("overrides").settings(ContextSettings {
            max_content_width: 44,
            ..ContextSettings::default()
        }));

    let inherited = run_context(command.try_parse_from(["prog", "inherits"]))?;
    check_eq!(inherited.settings().max_content_width, 60);

    let replaced = run_context(command.try_parse_from(["prog", "overrides"]))?;
    check_eq!(replaced.settings().max_content_width, 44);
    Ok(())
}

#[test]
fn test_outer_constraints_run_before_inner_ones() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("outer").flag())
        .constraint(Constraint::at_least(1), ["outer"])
        .subcommand(
            Command::new("run")
                .opt(Opt::new("inner").flag())
                .constraint(Constraint::at_least(1), ["inner"]),
        );

    // Both constraints fail; the outer one must be the error reported.
    let err = match command.try_parse_from(["prog", "run"]) {
        Err(ParseError::Constraint(violation)) => violation,
        other => {
            return ensure(false, format!("expected a constraint violation, got {other:?}"));
        }
    };
    check!(err.to_string().contains("--outer"), "unexpected message: {err}");
    Ok(())
}

// ============================================================================
// SECTION: Model Validation
// ============================================================================

#[test]
fn test_duplicate_parameters_are_a_setup_error() -> TestResult {
    let command = Command::new("prog").opt(Opt::new("twice")).opt(Opt::new("twice"));
    match command.try_parse_from(["prog"]) {
        Err(ParseError::Setup(error)) => {
            check!(error.to_string().contains("duplicate parameter 'twice'"));
        }
        other => check!(false, "expected a setup error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_constraints_over_undeclared_names_are_rejected() -> TestResult {
    let command = Command::new("prog")
        .opt(Opt::new("real"))
        .constraint(Constraint::at_least(1), ["imaginary"]);
    match command.try_parse_from(["prog"]) {
        Err(ParseError::Setup(error)) => {
            check!(error.to_string().contains("imaginary"));
        }
        other => check!(false, "expected a setup error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_unsatisfiable_constraints_are_rejected() -> TestResult {
    let command = Command::new("prog").group(
        OptionGroup::new("Pair")
            .constraint(Constraint::at_least(3))
            .opt(Opt::new("a").flag())
            .opt(Opt::new("b").flag()),
    );
    match command.try_parse_from(["prog"]) {
        Err(ParseError::Setup(error)) => {
            check!(error.to_string().contains("unsatisfiable"));
            check_eq!(ParseError::Setup(error).exit_code(), 2);
        }
        other => check!(false, "expected a setup error, got {other:?}"),
    }
    Ok(())
}
