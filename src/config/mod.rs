//! Settings for the `include-one` tool
//!
//! Handles loading from a settings file and applying CLI flags on top
//! (CLI > File > Defaults).

pub mod loader;

pub use loader::load_settings;

use crate::expand::ExpandOptions;
use serde::Deserialize;

/// Expansion settings as they appear in `include-one.toml` / `.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub strict_variables: bool,
    pub match_hidden: bool,
    pub case_insensitive: bool,
    pub files_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(ExpandOptions::default())
    }
}

impl From<ExpandOptions> for Settings {
    fn from(options: ExpandOptions) -> Self {
        Self {
            strict_variables: options.strict_variables,
            match_hidden: options.match_hidden,
            case_insensitive: options.case_insensitive,
            files_only: options.files_only,
        }
    }
}

impl Settings {
    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            strict_variables: self.strict_variables,
            match_hidden: self.match_hidden,
            case_insensitive: self.case_insensitive,
            files_only: self.files_only,
        }
    }

    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        self.strict_variables |= overrides.strict_variables;
        self.match_hidden |= overrides.match_hidden;
        self.case_insensitive |= overrides.case_insensitive;
        if overrides.all_entries {
            self.files_only = false;
        }
        self
    }
}

/// CLI flags that override file settings. Flags only ever switch a behaviour on.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub strict_variables: bool,
    pub match_hidden: bool,
    pub case_insensitive: bool,
    pub all_entries: bool,
}
