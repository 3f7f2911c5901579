use clap::Args;
use kensa::decoder::Decoder;
use kensa_codec::{decode_base64, to_der};
use kensa_der::Der;

use crate::error::Result;
use crate::utils::{format_hex_dump, load};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the input (binary DER, PEM, Base64 or hex). If not specified, reads from stdin
    file: Option<String>,

    /// Print a hexadecimal dump of the DER bytes instead of the TLV tree
    #[arg(long)]
    hex: bool,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let loaded = load(config.file.as_deref())?;
    let bytes = if loaded.from_binary {
        decode_base64(&loaded.text)?
    } else {
        to_der(&loaded.text)?
    };

    if config.hex {
        print!("{}", format_hex_dump(&bytes)?);
        return Ok(());
    }

    let der: Der = bytes.decode()?;
    print!("{}", der);
    Ok(())
}
