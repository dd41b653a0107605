//! Device location capture for onsite transitions

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use fo_core::config::AppConfig;
use fo_core::error::{FoError, GeolocationError};
use fo_models::location::format_coordinates;
use fo_models::LocationCapture;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix that may be reused; zero forces a fresh fix
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(30_000),
            maximum_age: Duration::ZERO,
        }
    }
}

impl GeolocationOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            enable_high_accuracy: config.geolocation.enable_high_accuracy,
            timeout: Duration::from_millis(config.geolocation.timeout_ms),
            maximum_age: Duration::from_millis(config.geolocation.maximum_age_ms),
        }
    }
}

/// Raw position reported by the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeolocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters
    pub accuracy: Option<f64>,
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<GeolocationFix, GeolocationError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` when the lookup succeeded without an address
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, FoError>;
}

/// Position known ahead of time, e.g. passed on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition {
    fix: Option<GeolocationFix>,
}

impl FixedPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            fix: Some(GeolocationFix {
                latitude,
                longitude,
                accuracy: None,
            }),
        }
    }

    /// A device without positioning
    pub fn unavailable() -> Self {
        Self { fix: None }
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        if let Some(fix) = self.fix.as_mut() {
            fix.accuracy = Some(meters);
        }
        self
    }
}

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<GeolocationFix, GeolocationError> {
        self.fix.ok_or(GeolocationError::Unavailable)
    }
}

/// Geocoder that never resolves an address
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinatesOnly;

#[async_trait]
impl ReverseGeocoder for CoordinatesOnly {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>, FoError> {
        Ok(None)
    }
}

/// Takes a position fix and resolves its address
pub struct LocationService<G: GeolocationProvider, R: ReverseGeocoder> {
    provider: G,
    geocoder: R,
    options: GeolocationOptions,
    accuracy_warning_meters: f64,
}

impl<G: GeolocationProvider, R: ReverseGeocoder> LocationService<G, R> {
    pub fn new(provider: G, geocoder: R) -> Self {
        Self {
            provider,
            geocoder,
            options: GeolocationOptions::default(),
            accuracy_warning_meters: 30.0,
        }
    }

    pub fn from_config(provider: G, geocoder: R, config: &AppConfig) -> Self {
        Self {
            provider,
            geocoder,
            options: GeolocationOptions::from_config(config),
            accuracy_warning_meters: config.geolocation.accuracy_warning_meters,
        }
    }

    pub fn options(&self) -> &GeolocationOptions {
        &self.options
    }

    /// Capture the current position
    ///
    /// A slow provider fails with [`GeolocationError::Timeout`]. An address
    /// lookup failure never fails the capture; the coordinates stand in for
    /// the address instead.
    pub async fn capture(&self) -> Result<LocationCapture, GeolocationError> {
        let fix = tokio::time::timeout(
            self.options.timeout,
            self.provider.current_position(&self.options),
        )
        .await
        .map_err(|_| GeolocationError::Timeout {
            timeout_ms: timeout_millis(self.options.timeout),
        })??;

        if let Some(accuracy) = fix.accuracy {
            if accuracy > self.accuracy_warning_meters {
                warn!(
                    accuracy,
                    threshold = self.accuracy_warning_meters,
                    "Low location accuracy"
                );
            }
        }

        let address = match self.geocoder.reverse(fix.latitude, fix.longitude).await {
            Ok(Some(address)) if !address.trim().is_empty() => address,
            Ok(_) => format_coordinates(fix.latitude, fix.longitude),
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, using coordinates");
                format_coordinates(fix.latitude, fix.longitude)
            }
        };
        debug!(latitude = fix.latitude, longitude = fix.longitude, %address, "Location captured");

        let mut capture =
            LocationCapture::new(fix.latitude, fix.longitude, Utc::now()).with_address(address);
        capture.accuracy = fix.accuracy;
        Ok(capture)
    }
}

/// Saturates instead of truncating durations beyond `u64::MAX` milliseconds
fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use fo_models::{ActorRole, Status, Ticket};

    use crate::tickets::{StatusChangeForm, StatusTransitionEngine};

    /// Collects formatted log output
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    struct DeniedProvider;

    #[async_trait]
    impl GeolocationProvider for DeniedProvider {
        async fn current_position(
            &self,
            _options: &GeolocationOptions,
        ) -> Result<GeolocationFix, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct StaticGeocoder(Result<Option<String>, ()>);

    #[async_trait]
    impl ReverseGeocoder for StaticGeocoder {
        async fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>, FoError> {
            self.0
                .clone()
                .map_err(|_| FoError::Internal("geocoding service unavailable".into()))
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl GeolocationProvider for SlowProvider {
        async fn current_position(
            &self,
            _options: &GeolocationOptions,
        ) -> Result<GeolocationFix, GeolocationError> {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Err(GeolocationError::Unavailable)
        }
    }

    #[test]
    fn test_default_options() {
        let options = GeolocationOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.maximum_age, Duration::ZERO);
        assert_eq!(GeolocationOptions::from_config(&AppConfig::default()), options);
    }

    #[tokio::test]
    async fn test_capture_with_address() {
        let service = LocationService::new(
            FixedPosition::new(12.9716, 77.5946).with_accuracy(8.0),
            StaticGeocoder(Ok(Some("MG Road, Bengaluru".into()))),
        );
        let capture = service.capture().await.unwrap();
        assert_eq!(capture.address.as_deref(), Some("MG Road, Bengaluru"));
        assert_eq!(capture.accuracy, Some(8.0));
        assert_eq!(capture.latitude, 12.9716);
    }

    #[tokio::test]
    async fn test_geocoding_failure_falls_back_to_coordinates() {
        let service = LocationService::new(FixedPosition::new(12.9716, 77.5946), StaticGeocoder(Err(())));
        let capture = service.capture().await.unwrap();
        assert_eq!(capture.address.as_deref(), Some("12.971600, 77.594600"));
    }

    #[tokio::test]
    async fn test_missing_address_falls_back_to_coordinates() {
        let service = LocationService::new(FixedPosition::new(-33.8688, 151.2093), CoordinatesOnly);
        let capture = service.capture().await.unwrap();
        assert_eq!(capture.address.as_deref(), Some("-33.868800, 151.209300"));

        let blank = LocationService::new(
            FixedPosition::new(-33.8688, 151.2093),
            StaticGeocoder(Ok(Some("  ".into()))),
        );
        assert_eq!(
            blank.capture().await.unwrap().address.as_deref(),
            Some("-33.868800, 151.209300")
        );
    }

    #[tokio::test]
    async fn test_low_accuracy_warns_without_blocking() {
        let (logs, _guard) = capture_logs();

        let service = LocationService::new(FixedPosition::new(1.0, 2.0).with_accuracy(250.0), CoordinatesOnly);
        assert_eq!(service.capture().await.unwrap().accuracy, Some(250.0));

        let output = logs.contents();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("Low location accuracy"), "{}", output);
    }

    #[tokio::test]
    async fn test_accurate_fix_does_not_warn() {
        let (logs, _guard) = capture_logs();

        let service = LocationService::new(FixedPosition::new(1.0, 2.0).with_accuracy(12.0), CoordinatesOnly);
        service.capture().await.unwrap();
        assert!(!logs.contents().contains("Low location accuracy"));
    }

    #[tokio::test]
    async fn test_permission_denied_passes_through() {
        let service = LocationService::new(DeniedProvider, CoordinatesOnly);
        let err = service.capture().await.unwrap_err();
        assert_eq!(err, GeolocationError::PermissionDenied);
        assert_eq!(FoError::from(err).error_code(), "permission_denied");
    }

    #[tokio::test]
    async fn test_failed_capture_leaves_form_untouched() {
        let engine = StatusTransitionEngine::default();
        let mut form = StatusChangeForm::open(
            &engine,
            Ticket::new(11, Status::OnsiteVisitPlanned),
            Some(ActorRole::ServicePerson),
        );
        form.select(Status::OnsiteVisitStarted).unwrap();
        form.set_comment("gate code 4411");

        let service = LocationService::new(DeniedProvider, CoordinatesOnly);
        if let Ok(capture) = service.capture().await {
            form.set_location(capture);
        }

        assert_eq!(form.selected(), Some(Status::OnsiteVisitStarted));
        assert_eq!(form.comment(), "gate code 4411");
        assert!(form.location().is_none());
        assert!(!form.can_submit());
        assert!(form.field_errors().has_error("location"));
    }

    #[test]
    fn test_timeout_millis_saturates() {
        assert_eq!(timeout_millis(Duration::from_millis(30_000)), 30_000);
        assert_eq!(timeout_millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_unavailable_device() {
        let service = LocationService::new(FixedPosition::unavailable(), CoordinatesOnly);
        assert_eq!(service.capture().await.unwrap_err(), GeolocationError::Unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let mut config = AppConfig::default();
        config.geolocation.timeout_ms = 5_000;
        let service = LocationService::from_config(SlowProvider, CoordinatesOnly, &config);
        assert_eq!(
            service.capture().await.unwrap_err(),
            GeolocationError::Timeout { timeout_ms: 5_000 }
        );
    }
}
