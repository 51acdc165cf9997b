//! Pattern expansion for include directives
//!
//! Turns the joined argument string into a sorted, deduplicated list of
//! existing paths using shell word expansion followed by pathname globbing.

use crate::error::IncludeError;
use glob::MatchOptions;
use std::path::{Path, PathBuf};

pub mod words;

pub use words::{Lexer, Word};

/// Expansion behaviour that can be tuned from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Unset variables fail the expansion instead of expanding to nothing.
    pub strict_variables: bool,
    /// Let `*` and `?` match a leading dot.
    pub match_hidden: bool,
    pub case_insensitive: bool,
    /// Keep only regular files among the matches.
    pub files_only: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self { strict_variables: false, match_hidden: false, case_insensitive: false, files_only: true }
    }
}

/// Pattern expander anchored at an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct Expander {
    options: ExpandOptions,
    base_dir: Option<PathBuf>,
}

impl Expander {
    pub fn new(options: ExpandOptions) -> Self {
        Self { options, base_dir: None }
    }

    /// Resolve relative patterns against `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn options(&self) -> ExpandOptions {
        self.options
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Lex `input` into shell words using the process environment.
    pub fn expand_words(&self, input: &str) -> Result<Vec<Word>, IncludeError> {
        Lexer::new(|name: &str| std::env::var(name).ok())
            .strict_variables(self.options.strict_variables)
            .split(input)
    }

    /// Expand `input` to matching paths, sorted by full path string.
    pub fn expand(&self, input: &str) -> Result<Vec<PathBuf>, IncludeError> {
        let words = self.expand_words(input)?;
        tracing::debug!("Expanding {:?} into {} word(s)", input, words.len());

        let mut paths = Vec::new();
        for word in &words {
            if word.text().is_empty() {
                continue;
            }
            let pattern = self.anchored_pattern(word)?;
            let entries = glob::glob_with(&pattern, self.match_options()).map_err(|e| {
                IncludeError::expansion(format!("invalid pattern '{}': {}", word.text(), e.msg))
            })?;

            for entry in entries {
                match entry {
                    Ok(path) => {
                        if !self.options.files_only || path.is_file() {
                            paths.push(path);
                        }
                    }
                    Err(err) => tracing::debug!("Skipping unreadable path {}: {}", err.path().display(), err),
                }
            }
        }

        // Byte order of the whole path, not component order.
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        paths.dedup();

        if paths.is_empty() {
            return Err(IncludeError::NoMatch);
        }
        Ok(paths)
    }

    fn anchored_pattern(&self, word: &Word) -> Result<String, IncludeError> {
        let Some(base) = self.base_dir.as_deref() else {
            return Ok(word.pattern().to_string());
        };
        if Path::new(word.text()).is_absolute() {
            return Ok(word.pattern().to_string());
        }

        let base = base.to_str().ok_or_else(|| {
            IncludeError::expansion(format!("base directory is not valid UTF-8: {}", base.display()))
        })?;
        let base = glob::Pattern::escape(base.trim_end_matches('/'));
        Ok(format!("{}/{}", base, word.pattern()))
    }

    fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_sensitive: !self.options.case_insensitive,
            require_literal_separator: true,
            require_literal_leading_dot: !self.options.match_hidden,
        }
    }
}
