//! Address search for the geocoder control.
//!
//! [`GsiGeocoder`] queries the address search API of the Geospatial Information Authority of
//! Japan. Every keystroke of the search box may start a request; requests are neither
//! de-duplicated nor cancelled, and results of a stale request may arrive after newer ones.

use crate::error::ViewerError;
use async_trait::async_trait;
use reinfo_map_types::{GeoPoint2d, Properties};
use serde::{Deserialize, Serialize};

/// Default endpoint of the GSI address search API.
pub const GSI_ADDRESS_SEARCH_URL: &str = "https://msearch.gsi.go.jp/address-search/AddressSearch";

/// Number of leading query characters a result title must contain.
const TITLE_PREFIX_CHARS: usize = 3;

/// A place found by a geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Title shown in the result list.
    pub place_name: String,
    /// Position the map flies to when the result is picked.
    pub center: GeoPoint2d,
    /// All properties the service returned for the place.
    pub properties: Properties,
    /// Kind of the result. Always `["place"]` for GSI results.
    pub place_type: Vec<String>,
}

/// Forward geocoding service.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Geocoder {
    /// Returns places matching the query text.
    async fn forward_geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, ViewerError>;
}

/// Geocoder settings of a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Address search endpoint.
    pub base_url: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: GSI_ADDRESS_SEARCH_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GsiFeature {
    geometry: GsiGeometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct GsiGeometry {
    coordinates: Vec<f64>,
}

/// Decodes a GSI address search response and keeps the places whose title contains the first
/// three characters of the query.
pub fn parse_gsi_response(json: &str, query: &str) -> Result<Vec<GeocodeResult>, ViewerError> {
    let features: Vec<GsiFeature> = serde_json::from_str(json)?;
    let prefix: String = query.chars().take(TITLE_PREFIX_CHARS).collect();

    let results = features
        .into_iter()
        .filter_map(|feature| {
            let title = feature.properties.get("title")?.as_str()?.to_string();
            if !title.contains(&prefix) {
                return None;
            }

            let Some(center) = GeoPoint2d::from_lonlat_slice(&feature.geometry.coordinates) else {
                log::warn!("Skipping geocoder result '{title}' without coordinates");
                return None;
            };

            Some(GeocodeResult {
                place_name: title,
                center,
                properties: feature.properties,
                place_type: vec!["place".to_string()],
            })
        })
        .collect();

    Ok(results)
}

/// Geocoder backed by the GSI address search API.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct GsiGeocoder {
    http_client: reqwest::Client,
    base_url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl GsiGeocoder {
    /// Creates a geocoder with its own HTTP client.
    pub fn new(config: &GeocoderConfig) -> Result<Self, ViewerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("reinfo-map/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    /// Endpoint the geocoder sends its requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Same as [`Geocoder::forward_geocode`], but returns transport and decoding errors
    /// instead of logging them.
    pub async fn try_forward_geocode(
        &self,
        query: &str,
    ) -> Result<Vec<GeocodeResult>, ViewerError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        parse_gsi_response(&body, query)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl Geocoder for GsiGeocoder {
    /// Failed searches are logged and produce an empty list.
    async fn forward_geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, ViewerError> {
        match self.try_forward_geocode(query).await {
            Ok(results) => Ok(results),
            Err(error) => {
                log::error!("Failed to forwardGeocode '{query}': {error}");
                Ok(vec![])
            }
        }
    }
}
