//! The `include_one` directive
//!
//! Expands its arguments, drops files whose base name was already included
//! and hands the rest to an [`IncludeLoader`]. Loader problems go to the
//! caller's [`ErrorSink`] and never fail the directive.

use crate::command::{check_args, CmdResult};
use crate::error::IncludeError;
use crate::expand::Expander;
use crate::loader::ErrorSink;
use crate::tracker::{include_each, IncludeReport, IncludeSet};
use std::path::Path;

pub const DIRECTIVE: &str = "include_one";

/// Parses one file and merges its directives into `config`.
pub trait IncludeLoader<C> {
    fn load_include_config(&mut self, path: &Path, config: &mut C, errors: &mut ErrorSink);
}

impl<C, F> IncludeLoader<C> for F
where
    F: FnMut(&Path, &mut C, &mut ErrorSink),
{
    fn load_include_config(&mut self, path: &Path, config: &mut C, errors: &mut ErrorSink) {
        self(path, config, errors)
    }
}

/// State a directive invocation runs against.
#[derive(Debug, Clone)]
pub struct IncludeScope<'a> {
    pub set: &'a IncludeSet,
    pub expander: Expander,
}

impl<'a> IncludeScope<'a> {
    pub fn new(set: &'a IncludeSet, expander: Expander) -> Self {
        Self { set, expander }
    }

    /// Process-wide set with default expansion relative to the working directory.
    pub fn global() -> IncludeScope<'static> {
        IncludeScope::new(IncludeSet::global(), Expander::default())
    }
}

/// Run the directive and report which candidates were loaded or skipped.
pub fn try_include_one<S, C, L>(
    args: &[S],
    scope: &IncludeScope<'_>,
    loader: &mut L,
    config: &mut C,
    errors: &mut ErrorSink,
) -> Result<IncludeReport, IncludeError>
where
    S: AsRef<str>,
    L: IncludeLoader<C> + ?Sized,
{
    check_args(DIRECTIVE, args, 1)?;

    let joined = args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
    let candidates = scope.expander.expand(&joined)?;

    include_each(scope.set, &candidates, |path| loader.load_include_config(path, config, errors))
}

/// Run the directive as a dispatcher would, collapsing the outcome to a [`CmdResult`].
pub fn include_one<S, C, L>(
    args: &[S],
    scope: &IncludeScope<'_>,
    loader: &mut L,
    config: &mut C,
    errors: &mut ErrorSink,
) -> CmdResult
where
    S: AsRef<str>,
    L: IncludeLoader<C> + ?Sized,
{
    let result = try_include_one(args, scope, loader, config, errors);
    if let Err(err) = &result {
        match err.reason() {
            Some(reason) => tracing::debug!("{}: {}", err, reason),
            None => tracing::debug!("{}", err),
        }
    }
    result.into()
}
