//! `selection` command handlers.

use clap::Subcommand;
use lockerpick_core::AppConfig;
use lockerpick_workflow::{FileSelectionStore, SelectionStore};

/// Sub-commands available under `selection`.
#[derive(Debug, Subcommand)]
pub enum SelectionCommands {
    /// Print the persisted locker as JSON
    Show,
    /// Remove the persisted locker
    Clear,
}

pub(crate) fn run_selection(
    config: &AppConfig,
    command: &SelectionCommands,
) -> anyhow::Result<()> {
    let store = FileSelectionStore::new(&config.selection_path);
    match command {
        SelectionCommands::Show => match store.read()? {
            Some(locker) => println!("{}", serde_json::to_string_pretty(&locker)?),
            None => println!("no locker selected"),
        },
        SelectionCommands::Clear => {
            store.clear()?;
            tracing::info!(path = %store.path().display(), "locker selection cleared");
            println!("locker selection cleared");
        }
    }
    Ok(())
}
