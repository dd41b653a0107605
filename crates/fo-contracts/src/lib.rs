//! # fo-contracts
//!
//! Contract validation for FieldOps.
//!
//! Contracts decide whether a proposed status change is legal for the
//! requesting actor and whether the submission carries what the target
//! status needs (comment, location) before anything is sent to the backend.

pub mod base;
pub mod transitions;

pub use base::*;
pub use transitions::{
    available_destinations, destinations, is_transition_allowed_for_role, requires_location,
    validate_transition, StatusChangeContract, SubmissionDraft, ValidSubmission,
};
