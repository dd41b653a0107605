//! # fo-services
//!
//! Business logic services for FieldOps.
//!
//! The transition engine answers "what can this actor do next"; the
//! status-change service carries a chosen transition through the backend,
//! including the chained follow-up after an arrival on site.

pub mod tickets;
pub mod location;

pub use tickets::{
    ChangeStatusService, FollowUpOutcome, FollowUpPlan, StatusChangeForm, StatusChangeOutcome,
    StatusOption, StatusTransitionEngine, TicketStatusApi,
};
pub use location::{
    CoordinatesOnly, FixedPosition, GeolocationFix, GeolocationOptions, GeolocationProvider,
    LocationService, ReverseGeocoder,
};
