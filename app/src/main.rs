#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    ChatInput, ChatStrategy, CommandStrategy, Demo, ExtractInput, ExtractStrategy, InfoStrategy,
    InitStrategy, VersionStrategy,
};
use slotfill_config::Config;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "slotfill")]
#[command(about = "Slot-filling dialogue scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a demo dialogue script
    Chat {
        /// Script to run
        #[arg(short, long, value_enum, default_value_t = Demo::Slots)]
        demo: Demo,

        /// Messages to send in order instead of reading stdin
        #[arg(short = 'm', long)]
        message: Vec<String>,
    },
    /// Extract the configured slots from one message
    Extract {
        /// Message to extract from
        #[arg(short = 'm', long)]
        message: String,

        /// Slot paths to extract (all top-level slots by default)
        #[arg(short, long)]
        slot: Vec<String>,
    },
    /// Show configuration and registered slots
    Info,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

fn init_tracing() -> anyhow::Result<()> {
    let level = Config::load().map_or_else(|_| "info".to_string(), |config| config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { demo, message } => {
            ChatStrategy
                .execute(ChatInput {
                    demo,
                    messages: message,
                })
                .await
        }
        Commands::Extract { message, slot } => {
            ExtractStrategy
                .execute(ExtractInput {
                    message,
                    slots: slot,
                })
                .await
        }
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
