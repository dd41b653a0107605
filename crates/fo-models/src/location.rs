//! Captured device location attached to onsite transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A position fix taken just before a status change
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationCapture {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Reverse-geocoded address, if the lookup succeeded
    pub address: Option<String>,

    pub timestamp: DateTime<Utc>,

    /// Reported accuracy radius in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl LocationCapture {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
            timestamp,
            accuracy: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Coordinates rendered the way the address fallback shows them
    pub fn coordinates_label(&self) -> String {
        format_coordinates(self.latitude, self.longitude)
    }

    /// Address to display, falling back to the coordinates
    pub fn display_address(&self) -> String {
        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => self.coordinates_label(),
        }
    }

    pub fn to_payload(&self) -> LocationPayload {
        LocationPayload {
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.display_address(),
            timestamp: self.timestamp,
        }
    }
}

/// `"{lat}, {lng}"` with six decimals
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{:.6}, {:.6}", latitude, longitude)
}

/// Location as sent with a status update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_coordinate_fallback() {
        let capture = LocationCapture::new(12.9715987, 77.5945627, noon());
        assert_eq!(capture.display_address(), "12.971599, 77.594563");

        let blank = capture.clone().with_address("   ");
        assert_eq!(blank.display_address(), "12.971599, 77.594563");

        let named = capture.with_address("MG Road, Bengaluru");
        assert_eq!(named.to_payload().address, "MG Road, Bengaluru");
    }

    #[test]
    fn test_range_validation() {
        assert!(LocationCapture::new(45.0, 90.0, noon()).validate().is_ok());
        assert!(LocationCapture::new(91.0, 0.0, noon()).validate().is_err());
        assert!(LocationCapture::new(0.0, -180.5, noon()).validate().is_err());
    }

    #[test]
    fn test_payload_shape() {
        let payload = LocationCapture::new(1.5, -2.25, noon())
            .with_accuracy(12.0)
            .to_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["latitude"], 1.5);
        assert_eq!(json["longitude"], -2.25);
        assert_eq!(json["address"], "1.500000, -2.250000");
        assert!(json.get("accuracy").is_none());
        assert_eq!(json["timestamp"], "2024-03-01T12:00:00Z");
    }
}
