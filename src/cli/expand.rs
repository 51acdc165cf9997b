//! Expand command implementation

use anyhow::Result;
use clap::Args;
use include_one::Expander;

use super::SettingsArgs;

#[derive(Args)]
pub struct ExpandArgs {
    /// Patterns to expand; joined with spaces like directive arguments
    #[arg(value_name = "PATTERN", num_args = 1.., required = true)]
    pub patterns: Vec<String>,

    /// Print the shell words instead of the matching files
    #[arg(long)]
    pub words: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub fn run(args: ExpandArgs) -> Result<()> {
    let settings = args.settings.resolve()?;
    let expander = Expander::new(settings.expand_options());
    let joined = args.patterns.join(" ");

    if args.words {
        for word in expander.expand_words(&joined)? {
            println!("{}", word.text());
        }
        return Ok(());
    }

    for path in expander.expand(&joined)? {
        println!("{}", path.display());
    }
    Ok(())
}
