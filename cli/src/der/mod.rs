pub(crate) mod dump;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum DerCommands {
    /// Print the TLV tree of DER-encoded data
    Dump {
        #[command(flatten)]
        config: dump::Config,
    },
}
