//! Reverse geocoding endpoint

use async_trait::async_trait;
use fo_core::error::FoError;
use fo_services::ReverseGeocoder;
use serde::Deserialize;
use tracing::debug;

use crate::client::{Envelope, HttpApiClient};

#[derive(Debug, Deserialize)]
struct AddressBody {
    #[serde(default)]
    address: Option<String>,
}

#[async_trait]
impl ReverseGeocoder for HttpApiClient {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, FoError> {
        let mut url = self.endpoint("geocoding/reverse")?;
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string());

        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| FoError::Internal(format!("Reverse geocoding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FoError::Internal(format!("Reverse geocoding returned {}", status)));
        }

        let envelope: Envelope<AddressBody> = response
            .json()
            .await
            .map_err(|e| FoError::Internal(format!("Failed to parse geocoding response: {}", e)))?;

        let address = parse_address(envelope);
        debug!(latitude, longitude, found = address.is_some(), "Reverse geocoded");
        Ok(address)
    }
}

fn parse_address(envelope: Envelope<AddressBody>) -> Option<String> {
    if envelope.success != Some(true) {
        return None;
    }
    envelope
        .data
        .and_then(|data| data.address)
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
}
