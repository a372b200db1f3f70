// clump-constraints/tests/support/params.rs
// ============================================================================
// Module: Parameter Fixtures
// Description: Map-backed parameter sources for constraint tests.
// ============================================================================
//! ## Overview
//! Builder for `ParamsSource` fixtures so tests declare parameter state in
//! one line per parameter.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures are permitted to take shortcuts."
)]

use std::collections::BTreeMap;

use clump_constraints::ParamState;
use clump_constraints::ParamsSource;

/// Map-backed parameter source built up one parameter at a time.
#[derive(Debug, Default)]
pub struct ParamFixture {
    /// Parameter states keyed by declared name.
    map: BTreeMap<String, ParamState>,
}

impl ParamFixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a parameter the invocation did not supply.
    pub fn unset(mut self, name: &str, label: &str) -> Self {
        self.map.insert(name.to_owned(), ParamState::unset(label));
        self
    }

    /// Declares a supplied flag parameter with no value.
    pub fn flag(mut self, name: &str, label: &str) -> Self {
        self.map.insert(name.to_owned(), ParamState::set_flag(label));
        self
    }

    /// Declares a supplied parameter carrying a textual value.
    pub fn value(mut self, name: &str, label: &str, value: &str) -> Self {
        self.map.insert(name.to_owned(), ParamState::set_with(label, value));
        self
    }
}

impl ParamsSource for ParamFixture {
    fn param(&self, name: &str) -> Option<ParamState> {
        self.map.get(name).cloned()
    }
}
