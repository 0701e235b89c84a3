//! `pick` command: one resolution cycle against the configured services.

use std::sync::Arc;

use clap::Args;
use lockerpick_core::{AppConfig, ShippingAddress, ShippingOption, StoreConfig};
use lockerpick_locator::{GeocodingClient, LocatorClient};
use lockerpick_workflow::{
    CheckoutContext, Collaborators, Completion, FileSelectionStore, MapSettings,
    ShippingOptionWorkflow,
};

use crate::terminal::{TerminalHost, TerminalRenderer};

const CLI_OPTION_ID: &str = "cli-option";
const CLI_CONSIGNMENT_ID: &str = "cli";

#[derive(Debug, Args)]
pub struct PickArgs {
    /// Shipping method description, e.g. "DHL Lockers"
    #[arg(long = "option")]
    pub option: String,

    #[arg(long)]
    pub city: String,

    /// County, state or province
    #[arg(long)]
    pub county: String,

    /// ISO country code, e.g. `KE`
    #[arg(long)]
    pub country: String,

    #[arg(long, default_value = "")]
    pub address1: String,

    #[arg(long, default_value = "")]
    pub address2: String,

    #[arg(long, default_value = "")]
    pub postal: String,

    /// Locker id to pick; the map is dismissed when omitted
    #[arg(long)]
    pub locker: Option<String>,
}

impl PickArgs {
    fn address(&self) -> ShippingAddress {
        ShippingAddress {
            country_code: self.country.to_uppercase(),
            city: self.city.clone(),
            state_or_province: self.county.clone(),
            address1: self.address1.clone(),
            address2: self.address2.clone(),
            postal_code: self.postal.clone(),
        }
    }
}

/// Selects the given shipping option and, for a locker service, resolves
/// lockers and picks (or dismisses) on the terminal map.
///
/// # Errors
///
/// Returns an error if a client cannot be built or the pick is rejected.
/// Lookup and geocoding failures are printed as notices, not returned.
pub(crate) async fn run_pick(config: &AppConfig, args: &PickArgs) -> anyhow::Result<()> {
    let deps = Collaborators {
        locator: Arc::new(
            LocatorClient::from_config(config)
                .map_err(|e| anyhow::anyhow!("failed to build locator client: {e}"))?,
        ),
        resolver: Arc::new(
            GeocodingClient::from_config(config)
                .map_err(|e| anyhow::anyhow!("failed to build geocoding client: {e}"))?,
        ),
        selection: Arc::new(FileSelectionStore::new(&config.selection_path)),
        renderer: Arc::new(TerminalRenderer),
        host: Arc::new(TerminalHost),
    };

    let mut workflow = ShippingOptionWorkflow::new(
        CheckoutContext {
            consignment_id: CLI_CONSIGNMENT_ID.to_string(),
            options: vec![ShippingOption::new(CLI_OPTION_ID, args.option.as_str())],
            selected_option_id: None,
            address: args.address(),
            store: StoreConfig {
                store_hash: config.store_hash.clone(),
            },
        },
        MapSettings::from_config(config),
        deps,
    );

    let Some(pending) = workflow.select_option(CLI_OPTION_ID)? else {
        println!("\"{}\" is not a locker service; nothing to pick", args.option);
        return Ok(());
    };

    match workflow.drive(pending).await {
        Completion::MapOpened { .. } => {}
        Completion::LookupFailed(_) | Completion::Superseded => return Ok(()),
    }

    match &args.locker {
        Some(locker_id) => {
            let locker = workflow.pick_marker(locker_id)?;
            println!("picked locker {} ({})", locker.id, locker.address_text);
        }
        None => {
            workflow.dismiss_map();
            println!("no locker given; map dismissed");
        }
    }
    Ok(())
}
