// crates/clump/examples/backup.rs
// ============================================================================
// Module: Backup Demo
// Description: A small backup-style CLI exercising the clump surface.
// Purpose: Show groups, constraints, callbacks, typed values, and themes.
// ============================================================================
//! ## Overview
//! Run with `--help` to see grouped options with constraint notes, or
//! with real arguments to watch constraints and callbacks at work:
//!
//! ```text
//! cargo run --example backup -- --help
//! cargo run --example backup -- --to-dir /tmp src1 src2
//! cargo run --example backup -- --to-dir /tmp --to-host backup.local src
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::exit,
    reason = "A demo binary prints its output and exits with a status."
)]

use std::io::IsTerminal;

use clump::Command;
use clump::ContextSettings;
use clump::DateTimeValueParser;
use clump::HelpTheme;
use clump::IntegerValueParser;
use clump::Opt;
use clump::OptionGroup;
use clump::Outcome;
use clump::Positional;
use clump::UsageError;
use clump::constraints::Constraint;

/// Derived state a callback stores for the application to pick up.
#[derive(Debug)]
struct Destination(String);

/// Builds the demo command.
fn build_command() -> Command {
    // Theme selection stays at the call site: the library never probes
    // the terminal itself.
    let theme =
        if std::io::stdout().is_terminal() { HelpTheme::dark() } else { HelpTheme::plain() };

    Command::new("backup")
        .about("Copy data somewhere safer")
        .version("0.1.0")
        .settings(ContextSettings {
            show_defaults: true,
            theme,
            ..ContextSettings::default()
        })
        .positional(
            Positional::new("sources").help("Files and directories to back up").multiple(),
        )
        .group(
            OptionGroup::new("Destination")
                .help("Exactly one place for the copy to land.")
                .constraint(Constraint::exactly(1))
                .opt(Opt::new("to-dir").short('d').help("Copy into a local directory"))
                .opt(Opt::new("to-host").help("Stream to a remote host"))
                .post_parse(|context| {
                    let destination = context
                        .value_display("to-dir")
                        .or_else(|| context.value_display("to-host"))
                        .ok_or_else(|| UsageError::new("no destination resolved"))?;
                    context.insert_extra(Destination(destination));
                    Ok(())
                }),
        )
        .group(
            OptionGroup::new("Tuning")
                .opt(
                    Opt::new("jobs")
                        .short('j')
                        .default_value("4")
                        .value_type(IntegerValueParser::new())
                        .help("Parallel copy jobs"),
                )
                .opt(
                    Opt::new("since")
                        .value_type(DateTimeValueParser::new())
                        .help("Only copy files modified after this point"),
                ),
        )
        .opt(Opt::new("dry-run").short('n').flag().help("Plan the copy without writing"))
}

fn main() {
    let command = build_command();
    match command.try_parse_from(std::env::args()) {
        Ok(Outcome::Help(text) | Outcome::Version(text)) => print!("{text}"),
        Ok(Outcome::Run(context)) => {
            let destination = context
                .extra::<Destination>()
                .map_or_else(|| "(unset)".to_owned(), |found| found.0.clone());
            let sources: Vec<String> = context
                .get_many::<String>("sources")
                .unwrap_or_default()
                .into_iter()
                .cloned()
                .collect();
            println!("destination: {destination}");
            println!("sources:     {}", sources.join(", "));
            println!("jobs:        {}", context.get_one::<i64>("jobs").copied().unwrap_or(1));
            println!("dry run:     {}", context.get_flag("dry-run"));
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(error.exit_code());
        }
    }
}
