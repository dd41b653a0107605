//! Configuration types and loading

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Backend REST API configuration
    pub api: ApiConfig,

    /// Transition engine behavior
    pub engine: EngineConfig,

    /// Position capture options
    pub geolocation: GeolocationConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL the `/tickets` and `/geocoding` paths are resolved against
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Pause between the primary acknowledgement and a chained follow-up
    pub follow_up_settle_delay_ms: u64,
    pub location_policy: LocationPolicy,
}

/// Which transitions need a captured location before submission
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationPolicy {
    /// Only transitions into the onsite-visit statuses that track presence on site
    #[default]
    OnsiteOnly,
    /// Every transition, the way the activity stage manager behaves
    EveryTransition,
}

impl FromStr for LocationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onsite_only" | "onsite" => Ok(Self::OnsiteOnly),
            "every_transition" | "all" => Ok(Self::EveryTransition),
            other => Err(ConfigError::InvalidValue {
                key: "FIELDOPS_LOCATION_POLICY".into(),
                message: format!("unknown policy '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeolocationConfig {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
    /// Fixes less accurate than this are logged as a warning
    pub accuracy_warning_meters: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                token: None,
                request_timeout_seconds: 30,
            },
            engine: EngineConfig {
                follow_up_settle_delay_ms: 500,
                location_policy: LocationPolicy::OnsiteOnly,
            },
            geolocation: GeolocationConfig {
                enable_high_accuracy: true,
                timeout_ms: 30_000,
                maximum_age_ms: 0,
                accuracy_warning_meters: 30.0,
            },
            logging: LoggingConfig {
                filter: "info,fo_services=debug,fo_client=debug".to_string(),
                json: false,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // API
        if let Ok(url) = std::env::var("FIELDOPS_API_URL") {
            config.api.base_url = url;
        }
        if let Ok(token) = std::env::var("FIELDOPS_API_TOKEN") {
            if !token.is_empty() {
                config.api.token = Some(token);
            }
        }
        if let Some(timeout) = parse_env("FIELDOPS_API_TIMEOUT_SECONDS")? {
            config.api.request_timeout_seconds = timeout;
        }

        // Engine
        if let Some(delay) = parse_env("FIELDOPS_FOLLOW_UP_DELAY_MS")? {
            config.engine.follow_up_settle_delay_ms = delay;
        }
        if let Ok(policy) = std::env::var("FIELDOPS_LOCATION_POLICY") {
            config.engine.location_policy = policy.parse()?;
        }

        // Geolocation
        let parse_bool = |v: String| v == "true" || v == "1" || v == "yes";

        if let Ok(v) = std::env::var("FIELDOPS_GEO_HIGH_ACCURACY") {
            config.geolocation.enable_high_accuracy = parse_bool(v);
        }
        if let Some(timeout) = parse_env("FIELDOPS_GEO_TIMEOUT_MS")? {
            config.geolocation.timeout_ms = timeout;
        }
        if let Some(age) = parse_env("FIELDOPS_GEO_MAXIMUM_AGE_MS")? {
            config.geolocation.maximum_age_ms = age;
        }
        if let Some(meters) = parse_env("FIELDOPS_GEO_ACCURACY_WARNING_METERS")? {
            config.geolocation.accuracy_warning_meters = meters;
        }

        // Logging
        if let Ok(filter) = std::env::var("FIELDOPS_LOG") {
            config.logging.filter = filter;
        }
        if let Ok(v) = std::env::var("FIELDOPS_LOG_JSON") {
            config.logging.json = parse_bool(v);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed by the types alone
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base_url()?;
        if self.geolocation.accuracy_warning_meters < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "FIELDOPS_GEO_ACCURACY_WARNING_METERS".into(),
                message: "must not be negative".into(),
            });
        }
        Ok(())
    }

    /// Parsed API base URL, always ending with a slash so relative joins keep its path
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.api.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
            key: "FIELDOPS_API_URL".into(),
            message: e.to_string(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_seconds)
    }

    pub fn follow_up_settle_delay(&self) -> Duration {
        Duration::from_millis(self.engine.follow_up_settle_delay_ms)
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
