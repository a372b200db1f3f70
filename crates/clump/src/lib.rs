// crates/clump/src/lib.rs
// ============================================================================
// Module: Clump Root
// Description: Public API surface for the clap extension layer.
// Purpose: Wire together model, parsing, help, and value-type modules.
// Dependencies: clap, clump-constraints
// ============================================================================

//! ## Overview
//! `clump` layers option groups, subcommand sections, parameter
//! constraints, post-parse callbacks, typed value parsers, and a
//! deterministic help renderer on top of clap. Applications declare a
//! [`Command`] model; clump lowers it to clap for tokenization and value
//! collection, then takes back over for constraint checks, callbacks,
//! and help output.
//!
//! ```
//! use clump::{Command, Opt, OptionGroup, Outcome};
//! use clump::constraints::Constraint;
//!
//! let command = Command::new("backup")
//!     .about("Copy data somewhere safer")
//!     .group(
//!         OptionGroup::new("Destination")
//!             .constraint(Constraint::exactly(1))
//!             .opt(Opt::new("to-dir").help("Copy into a directory"))
//!             .opt(Opt::new("to-host").help("Stream to a remote host")),
//!     );
//! let outcome = command.try_parse_from(["backup", "--to-dir", "/tmp"]);
//! assert!(matches!(outcome, Ok(Outcome::Run(_))));
//! ```

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod command;
pub mod context;
pub mod error;
pub mod help;
pub mod model;
pub mod values;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

/// The constraint algebra, re-exported for constraint construction.
pub use clump_constraints as constraints;

pub use command::Command;
pub use command::Outcome;
pub use context::Context;
pub use error::BuildError;
pub use error::ParseError;
pub use error::UsageError;
pub use help::HelpFormatter;
pub use help::HelpTheme;
pub use model::ContextSettings;
pub use model::Opt;
pub use model::OptionGroup;
pub use model::Positional;
pub use model::Section;
pub use values::DateTimeValueParser;
pub use values::IntegerTextValueParser;
pub use values::IntegerValueParser;
pub use values::JsonShape;
pub use values::JsonValueParser;
pub use values::MetavarHint;
pub use values::PathValueParser;
