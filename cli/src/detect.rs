use clap::Args;

use crate::error::Result;
use crate::utils::load;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the input file. If not specified, reads from stdin
    file: Option<String>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let loaded = load(config.file.as_deref())?;
    match loaded.format {
        Some(format) => println!("{}", format),
        None => println!("unknown"),
    }
    Ok(())
}
