use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod lookup;
mod pick;
mod selection;
mod terminal;


use lookup::LookupArgs;
use pick::PickArgs;
use selection::SelectionCommands;

#[derive(Debug, Parser)]
#[command(name = "lockerpick")]
#[command(about = "Pickup locker lookup and selection for checkout")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up lockers for a courier near an address
    Lookup(LookupArgs),
    /// Resolve a postal address to coordinates
    Geocode {
        /// Free-text postal address
        #[arg(long)]
        address: String,

        /// Map-provider API key
        #[arg(long, env = "LOCKERPICK_MAP_API_KEY")]
        key: String,
    },
    /// Inspect or clear the persisted locker selection
    Selection {
        #[command(subcommand)]
        command: SelectionCommands,
    },
    /// Run one locker selection cycle end to end
    Pick(PickArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("lockerpick: run with --help to list commands");
        return Ok(());
    };

    let config = lockerpick_core::load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match command {
        Commands::Lookup(args) => lookup::run_lookup(&config, &args).await,
        Commands::Geocode { address, key } => lookup::run_geocode(&config, &address, &key).await,
        Commands::Selection { command } => selection::run_selection(&config, &command),
        Commands::Pick(args) => pick::run_pick(&config, &args).await,
    }
}
