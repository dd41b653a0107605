//! Core error types for FieldOps
//!
//! Validation failures are user-correctable and rendered inline; everything
//! else is surfaced as a notification by the caller.

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all FieldOps operations
#[derive(Error, Debug)]
pub enum FoError {
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("A status change is already being submitted")]
    SubmissionInFlight,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation errors collection, keyed by form field
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, field_messages) in fields {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

/// Status transition errors
///
/// Statuses are carried by their wire name so this crate stays free of the
/// model types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Unknown status: {status}")]
    UnknownStatus { status: String },

    #[error("A comment is required when changing the status to {status}")]
    MissingComment { status: String },

    #[error("A location is required when changing the status to {status}")]
    MissingLocation { status: String },

    #[error("The captured location for {status} has out-of-range coordinates")]
    InvalidLocation { status: String },

    #[error("Transition from {from} to {to} is not allowed")]
    NotAllowed { from: String, to: String },
}

impl TransitionError {
    /// Form field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            TransitionError::UnknownStatus { .. } | TransitionError::NotAllowed { .. } => "status",
            TransitionError::MissingComment { .. } => "comment",
            TransitionError::MissingLocation { .. } | TransitionError::InvalidLocation { .. } => {
                "location"
            }
        }
    }
}

impl From<TransitionError> for ValidationErrors {
    fn from(err: TransitionError) -> Self {
        let mut errors = ValidationErrors::new();
        let message = match &err {
            TransitionError::UnknownStatus { .. } => "is not a known status",
            TransitionError::MissingComment { .. } => "can't be blank",
            TransitionError::MissingLocation { .. } => "must be captured",
            TransitionError::InvalidLocation { .. } => "coordinates are out of range",
            TransitionError::NotAllowed { .. } => "is not a valid next status",
        };
        errors.add(err.field(), message);
        errors
    }
}

/// Errors raised while capturing the device position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation is not available on this device")]
    Unavailable,

    #[error("Timed out after {timeout_ms}ms waiting for a position")]
    Timeout { timeout_ms: u64 },

    #[error("Location permission was denied")]
    PermissionDenied,
}

/// Errors raised while persisting a transition through the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Backend rejected the status change ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl FoError {
    pub fn error_code(&self) -> &'static str {
        match self {
            FoError::Transition(TransitionError::UnknownStatus { .. }) => "unknown_status",
            FoError::Transition(TransitionError::MissingComment { .. }) => "missing_comment",
            FoError::Transition(TransitionError::MissingLocation { .. }) => "missing_location",
            FoError::Transition(TransitionError::InvalidLocation { .. }) => "invalid_location",
            FoError::Transition(TransitionError::NotAllowed { .. }) => "transition_not_allowed",
            FoError::Validation(_) => "validation_failed",
            FoError::Geolocation(GeolocationError::Unavailable) => "geolocation_unavailable",
            FoError::Geolocation(GeolocationError::Timeout { .. }) => "geolocation_timeout",
            FoError::Geolocation(GeolocationError::PermissionDenied) => "permission_denied",
            FoError::Submission(_) => "transition_submission_failed",
            FoError::SubmissionInFlight => "submission_in_flight",
            FoError::Config(_) => "configuration_error",
            FoError::Internal(_) => "internal_error",
        }
    }

    /// Whether the user can fix the problem by editing the form
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            FoError::Validation(_)
                | FoError::Transition(TransitionError::MissingComment { .. })
                | FoError::Transition(TransitionError::MissingLocation { .. })
                | FoError::Transition(TransitionError::InvalidLocation { .. })
        )
    }
}
