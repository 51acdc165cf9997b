//! include-one: include configuration files matching shell patterns exactly once
//!
//! The `include_one` directive expands its arguments like a shell would,
//! sorts the matches, and loads every file whose base name has not been
//! included before in this process.

pub mod command;
pub mod config;
pub mod directive;
pub mod error;
pub mod expand;
pub mod loader;
pub mod tracker;

pub use command::{CmdResult, CmdStatus};
pub use config::Settings;
pub use directive::{include_one, try_include_one, IncludeLoader, IncludeScope};
pub use error::IncludeError;
pub use expand::{ExpandOptions, Expander};
pub use loader::{Config, ConfigError, ErrorSink, FileLoader};
pub use tracker::{IncludeReport, IncludeSet};
