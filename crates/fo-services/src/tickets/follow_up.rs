//! Chained follow-up transitions

use fo_contracts::ValidSubmission;
use fo_models::{LocationCapture, Status};

pub const AUTO_IN_PROGRESS_COMMENT: &str =
    "Automatically transitioned to in progress after reaching site";

/// A second transition to submit once the primary one is acknowledged
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpPlan {
    pub status: Status,
    pub comment: String,
    /// Reuse the primary transition's location
    pub carry_location: bool,
}

impl FollowUpPlan {
    /// Follow-up implied by selecting `selected`, if any
    ///
    /// Follow-up targets never plan a follow-up of their own.
    pub fn for_status(selected: Status) -> Option<FollowUpPlan> {
        match selected {
            Status::OnsiteVisitReached => Some(FollowUpPlan {
                status: Status::OnsiteVisitInProgress,
                comment: AUTO_IN_PROGRESS_COMMENT.to_string(),
                carry_location: true,
            }),
            _ => None,
        }
    }

    pub fn to_submission(&self, primary_location: Option<&LocationCapture>) -> ValidSubmission {
        ValidSubmission {
            status: self.status,
            comment: Some(self.comment.clone()),
            location: if self.carry_location {
                primary_location.cloned()
            } else {
                None
            },
        }
    }
}
