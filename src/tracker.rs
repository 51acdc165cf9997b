//! Process-wide record of included file names
//!
//! Deduplication is by base name only: `/a/x.conf` and `/b/x.conf` count as
//! the same include. Names are recorded before the loader runs and are
//! never forgotten for the lifetime of the set.

use crate::error::IncludeError;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

static GLOBAL: Lazy<IncludeSet> = Lazy::new(IncludeSet::new);

/// Set of base names that have already been handed to a loader.
#[derive(Debug, Default)]
pub struct IncludeSet {
    names: Mutex<BTreeSet<OsString>>,
}

impl IncludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The instance shared by every directive in this process, created on first use.
    pub fn global() -> &'static IncludeSet {
        &GLOBAL
    }

    /// Record `name`, returning `true` if it was not seen before.
    ///
    /// The check and the insert happen under one lock acquisition.
    pub fn mark(&self, name: &OsStr) -> Result<bool, IncludeError> {
        let mut names = self
            .names
            .lock()
            .map_err(|_| IncludeError::internal("include set lock poisoned"))?;
        if names.contains(name) {
            return Ok(false);
        }
        names.insert(name.to_os_string());
        Ok(true)
    }

    pub fn contains(&self, name: impl AsRef<OsStr>) -> bool {
        self.read().contains(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted snapshot of recorded names.
    pub fn names(&self) -> Vec<OsString> {
        self.read().iter().cloned().collect()
    }

    /// Names are never removed, so reads stay valid after a poisoned insert.
    fn read(&self) -> MutexGuard<'_, BTreeSet<OsString>> {
        self.names.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// What happened to each candidate of one tracker pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeReport {
    pub loaded: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Final path segment used as the deduplication key.
pub fn base_name(path: &Path) -> Result<&OsStr, IncludeError> {
    path.file_name()
        .ok_or_else(|| IncludeError::internal(format!("no file name in {}", path.display())))
}

/// Filter `candidates` against `set` and call `load` for each new one, in order.
///
/// A bookkeeping failure stops the pass immediately; names recorded earlier in
/// the pass stay recorded.
pub fn include_each<F>(set: &IncludeSet, candidates: &[PathBuf], mut load: F) -> Result<IncludeReport, IncludeError>
where
    F: FnMut(&Path),
{
    tracing::debug!("Files to include:");
    for path in candidates {
        tracing::debug!(" - {}", path.file_name().unwrap_or(path.as_os_str()).to_string_lossy());
    }

    let mut report = IncludeReport::default();
    for path in candidates {
        let name = base_name(path)?;
        if !set.mark(name)? {
            tracing::debug!("Skipping duplicate include: {}", name.to_string_lossy());
            report.skipped.push(path.clone());
            continue;
        }

        load(path);
        tracing::debug!("Included {}", path.display());
        report.loaded.push(path.clone());
    }

    tracing::debug!("Include process completed");
    Ok(report)
}
