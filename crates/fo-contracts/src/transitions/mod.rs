//! Status transition contracts
//!
//! - `table`: configured destinations per status
//! - `policy`: role gating applied on top of the table
//! - `submission`: comment and location requirements of a chosen status

mod policy;
mod submission;
mod table;

pub use policy::is_transition_allowed_for_role;
pub use submission::{StatusChangeContract, SubmissionDraft, ValidSubmission};
pub use table::destinations;

use fo_core::error::TransitionError;
use fo_models::{ActorRole, Status};

/// Whether moving into `status` needs a captured location
pub fn requires_location(status: Status) -> bool {
    status.is_onsite_presence()
}

/// Destinations of `from` the role may select, in table order
pub fn available_destinations(from: Status, role: Option<ActorRole>) -> Vec<Status> {
    destinations(from)
        .iter()
        .copied()
        .filter(|to| is_transition_allowed_for_role(*to, role))
        .collect()
}

/// Check that `to` is offered to `role` when the ticket is in `from`
pub fn validate_transition(
    from: Status,
    to: Status,
    role: Option<ActorRole>,
) -> Result<(), TransitionError> {
    if available_destinations(from, role).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::NotAllowed {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
