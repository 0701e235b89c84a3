//! `lookup` and `geocode` command handlers.

use clap::Args;
use lockerpick_core::{AppConfig, LockerLookupRequest};
use lockerpick_locator::{AddressResolver, GeocodingClient, LockerLocator, LocatorClient};

/// Courier and address fields sent to the lockers endpoint.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Courier token, e.g. `DHL`
    #[arg(long)]
    pub courier: String,

    #[arg(long)]
    pub city: String,

    /// County, state or province
    #[arg(long)]
    pub county: String,

    /// ISO country code, e.g. `KE`
    #[arg(long)]
    pub country: String,
}

impl LookupArgs {
    fn to_request(&self, store_hash: &str) -> LockerLookupRequest {
        LockerLookupRequest {
            store_hash: store_hash.to_string(),
            courier: self.courier.clone(),
            city: self.city.clone(),
            county: self.county.clone(),
            country_code: self.country.to_uppercase(),
        }
    }
}

/// Prints the lockers returned for `args`.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the lookup fails.
pub(crate) async fn run_lookup(config: &AppConfig, args: &LookupArgs) -> anyhow::Result<()> {
    let client = LocatorClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build locator client: {e}"))?;
    let request = args.to_request(&config.store_hash);

    let response = client.lookup(&request).await?;

    println!(
        "{} lockers for {} in {}, {} (map key {})",
        response.lockers.len(),
        request.courier,
        request.city,
        request.country_code,
        if response.map_api_key.is_empty() {
            "missing"
        } else {
            "present"
        }
    );
    for locker in &response.lockers {
        println!(
            "  {:<12} {:>10.5} {:>10.5}  {}",
            locker.id, locker.lat, locker.long, locker.address_text
        );
    }
    Ok(())
}

/// Prints the coordinate `address` resolves to.
///
/// # Errors
///
/// Returns an error if the client cannot be built or geocoding fails.
pub(crate) async fn run_geocode(
    config: &AppConfig,
    address: &str,
    key: &str,
) -> anyhow::Result<()> {
    let client = GeocodingClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build geocoding client: {e}"))?;
    let coordinate = client.resolve(address, key).await?;
    println!("{coordinate}");
    Ok(())
}
