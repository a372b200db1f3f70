// crates/clump/src/model/mod.rs
// ============================================================================
// Module: model
// Description: Declarative command-line model shared by parse and help.
// Purpose: Collect the parameter, group, section, and settings types.
// ============================================================================

//! ## Overview
//! The model layer holds what applications declare: options, positional
//! arguments, option groups, subcommand sections, and per-command
//! settings. The command builder lowers this model to clap for parsing
//! and hands it to the help renderer for display, so both views always
//! agree on what was declared.

pub mod groups;
pub mod params;
pub mod sections;
pub mod settings;

pub use groups::OptionGroup;
pub use groups::PostParseCallback;
pub use params::Opt;
pub use params::Positional;
pub use sections::Section;
pub use settings::ContextSettings;
