//! This example searches an address with the GSI address search API.
//!
//! Run with `cargo run --example geocode -- 所沢市並木`.

use reinfo_map::geocoder::{Geocoder, GeocoderConfig, GsiGeocoder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "所沢市並木".to_string());

    let geocoder = GsiGeocoder::new(&GeocoderConfig::default())?;
    for result in geocoder.forward_geocode(&query).await? {
        println!(
            "{}\t{:.6}\t{:.6}",
            result.place_name,
            result.center.lat(),
            result.center.lon()
        );
    }

    Ok(())
}
