//! Load command implementation

use anyhow::Result;
use clap::Args;
use include_one::{Config, ErrorSink, FileLoader, IncludeSet};
use std::path::PathBuf;

use super::SettingsArgs;

#[derive(Args)]
pub struct LoadArgs {
    /// Configuration file to load
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub fn run(args: LoadArgs) -> Result<()> {
    let settings = args.settings.resolve()?;

    let mut config = Config::new();
    let mut errors = ErrorSink::new();
    let mut loader = FileLoader::new(IncludeSet::global(), settings.expand_options());
    loader.load(&args.file, &mut config, &mut errors);

    for (key, value) in config.settings() {
        println!("{key} = {value}");
    }

    tracing::debug!(
        "Loaded {} file(s), {} name(s) recorded as included",
        config.sources().len(),
        IncludeSet::global().len()
    );

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("Error: {error}");
        }
        anyhow::bail!("{} error(s) while loading {}", errors.len(), args.file.display());
    }

    Ok(())
}
