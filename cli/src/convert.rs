use std::fs;

use clap::Args;
use kensa_codec::{Error as CodecError, Format, LoadedInput, convert_format, der_file_name, to_der_bytes};
use tracing::debug;

use crate::error::Result;
use crate::utils::{file_name, load};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the input file. If not specified, reads from stdin
    file: Option<String>,

    /// Target format (pem, base64, hex, der)
    #[arg(long)]
    to: Format,

    /// Source format. Detected from the content when omitted
    #[arg(long)]
    from: Option<Format>,

    /// Write the result to this path instead of stdout.
    /// DER output defaults to a `.der` file named after the input
    #[arg(long)]
    out: Option<String>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let loaded = load(config.file.as_deref())?;
    let from = source_format(&loaded, config.from)?;
    debug!(%from, to = %config.to, binary = loaded.from_binary, "converting input");

    if config.to == Format::Der {
        let der = to_der_bytes(&loaded.text, from)?;
        let path = config
            .out
            .unwrap_or_else(|| der_file_name(file_name(config.file.as_deref())));
        fs::write(&path, &der)?;
        eprintln!("wrote {} bytes to {}", der.len(), path);
        return Ok(());
    }

    let mut converted = convert_format(&loaded.text, from, config.to)?;
    if !converted.ends_with('\n') {
        converted.push('\n');
    }
    match config.out {
        Some(path) => fs::write(path, converted)?,
        None => print!("{}", converted),
    }
    Ok(())
}

/// An explicit `--from` wins over detection.
fn source_format(loaded: &LoadedInput, from: Option<Format>) -> Result<Format> {
    Ok(from
        .or(loaded.format)
        .ok_or(CodecError::UnrecognizedFormat)?)
}
