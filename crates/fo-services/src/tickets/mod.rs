//! Ticket status services

mod change_status;
mod engine;
mod follow_up;

pub use change_status::{ChangeStatusService, FollowUpOutcome, StatusChangeForm, StatusChangeOutcome};
pub use engine::{StatusOption, StatusTransitionEngine};
pub use follow_up::{FollowUpPlan, AUTO_IN_PROGRESS_COMMENT};

use async_trait::async_trait;
use fo_core::error::SubmissionError;
use fo_core::traits::Id;
use fo_models::{StatusUpdateRequest, TicketStatusAck};

/// Backend endpoint that persists status changes
#[async_trait]
pub trait TicketStatusApi: Send + Sync {
    /// `PATCH /tickets/{id}/status`
    async fn update_status(
        &self,
        ticket_id: Id,
        request: &StatusUpdateRequest,
    ) -> Result<TicketStatusAck, SubmissionError>;
}
