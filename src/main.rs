//! include-one: load configuration files with `include_one` directives

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
