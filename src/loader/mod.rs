//! Line-oriented configuration loader
//!
//! Each non-blank, non-comment line is either an `include_one` directive or a
//! `key value...` setting. Later settings override earlier ones, so the
//! order in which includes are loaded decides the final value.

use crate::directive::{include_one, IncludeLoader, IncludeScope, DIRECTIVE};
use crate::expand::{ExpandOptions, Expander};
use crate::tracker::IncludeSet;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub mod sink;

pub use sink::{ConfigError, ErrorSink};

/// Settings merged from every loaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    settings: BTreeMap<String, String>,
    sources: Vec<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(key.into(), value.into());
    }

    pub fn settings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Files that were read, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

/// Loads files into a [`Config`], resolving `include_one` against `set`.
pub struct FileLoader<'a> {
    set: &'a IncludeSet,
    options: ExpandOptions,
    stack: Vec<PathBuf>,
}

impl<'a> FileLoader<'a> {
    pub fn new(set: &'a IncludeSet, options: ExpandOptions) -> Self {
        Self { set, options, stack: Vec::new() }
    }

    /// Load a top-level file.
    pub fn load(&mut self, path: &Path, config: &mut Config, errors: &mut ErrorSink) {
        self.load_include_config(path, config, errors);
    }

    fn scope_for(&self, path: &Path) -> IncludeScope<'a> {
        let expander = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => Expander::new(self.options).with_base_dir(dir),
            None => Expander::new(self.options),
        };
        IncludeScope::new(self.set, expander)
    }

    fn apply_line(&mut self, path: &Path, line_no: usize, line: &str, config: &mut Config, errors: &mut ErrorSink) {
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        if name != DIRECTIVE {
            config.set(name, rest);
            return;
        }

        // The rest of the line stays one argument so quoting inside it survives.
        let args: Vec<&str> = if rest.is_empty() { Vec::new() } else { vec![rest] };
        let scope = self.scope_for(path);
        let result = include_one(&args, &scope, self, config, errors);
        if let Some(message) = result.error {
            errors.push(ConfigError::new(path, Some(line_no), message));
        }
    }
}

impl IncludeLoader<Config> for FileLoader<'_> {
    fn load_include_config(&mut self, path: &Path, config: &mut Config, errors: &mut ErrorSink) {
        let identity = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if self.stack.contains(&identity) {
            tracing::debug!("{} is already being loaded, skipping", path.display());
            return;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                errors.push(ConfigError::new(path, None, format!("Unable to read config file: {e}")));
                return;
            }
        };

        tracing::debug!("Loading config file {}", path.display());
        config.sources.push(path.to_path_buf());
        self.stack.push(identity);

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.apply_line(path, idx + 1, line, config, errors);
        }

        self.stack.pop();
    }
}
