//! # fo-models
//!
//! Domain models for FieldOps.
//!
//! The ticket record itself lives in the backend; these types describe the
//! pieces the transition engine reasons about and the payloads it produces.

pub use fo_core::traits::{Id, Identifiable, Timestamped};

pub mod status;
pub mod status_metadata;
pub mod role;
pub mod location;
pub mod ticket;

pub use status::Status;
pub use status_metadata::{StatusCategory, StatusMetadata};
pub use role::ActorRole;
pub use location::{LocationCapture, LocationPayload};
pub use ticket::{StatusUpdateRequest, Ticket, TicketStatusAck};
