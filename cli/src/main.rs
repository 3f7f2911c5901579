use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

mod cert;
mod convert;
mod der;
mod detect;
mod error;
mod output;
mod utils;

use error::Result;

use cert::CertCommands;
use der::DerCommands;

#[derive(Parser)]
#[command(name = "kensa")]
#[command(about = "X.509 certificate inspection and encoding toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Certificate operations
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
    /// Convert between PEM, Base64, hex and DER
    Convert {
        #[command(flatten)]
        config: convert::Config,
    },
    /// Print the detected encoding of the input
    Detect {
        #[command(flatten)]
        config: detect::Config,
    },
    /// DER encoding operations
    Der {
        #[command(subcommand)]
        command: DerCommands,
    },
}

/// Logs go to stderr so that stdout only carries command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Cert { command } => match command {
            CertCommands::Inspect { config } => {
                cert::inspect::execute(config)?;
            }
        },
        Commands::Convert { config } => {
            convert::execute(config)?;
        }
        Commands::Detect { config } => {
            detect::execute(config)?;
        }
        Commands::Der { command } => match command {
            DerCommands::Dump { config } => {
                der::dump::execute(config)?;
            }
        },
    }

    Ok(())
}
