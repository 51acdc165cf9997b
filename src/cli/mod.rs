//! Command-line interface for include-one
//!
//! Provides `load` and `expand` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod expand;
mod load;

/// Include configuration files matching shell patterns, exactly once each
#[derive(Parser)]
#[command(name = "include-one")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration file, following include_one directives
    Load(load::LoadArgs),

    /// Show the files a set of patterns expands to, without loading them
    Expand(expand::ExpandArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Load(args) => load::run(args),
        Commands::Expand(args) => expand::run(args),
    }
}

/// Expansion flags shared by both subcommands.
#[derive(clap::Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Settings file (default: include-one.toml/.yaml in the working directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Fail on unset variables instead of expanding them to nothing
    #[arg(long)]
    pub strict_vars: bool,

    /// Let wildcards match names starting with a dot
    #[arg(long)]
    pub match_hidden: bool,

    /// Match patterns case-insensitively
    #[arg(long)]
    pub case_insensitive: bool,

    /// Accept directories and other non-regular entries as matches
    #[arg(long)]
    pub all_entries: bool,
}

impl SettingsArgs {
    pub fn resolve(&self) -> Result<include_one::Settings> {
        let cwd = std::env::current_dir()?;
        let settings = include_one::config::load_settings(&cwd, self.config.as_deref())?;
        Ok(settings.with_overrides(&include_one::config::SettingsOverrides {
            strict_variables: self.strict_vars,
            match_hidden: self.match_hidden,
            case_insensitive: self.case_insensitive,
            all_entries: self.all_entries,
        }))
    }
}
