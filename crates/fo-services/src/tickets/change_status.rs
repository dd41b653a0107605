//! Status change orchestration
//!
//! Owns the dialog's local form state and carries a chosen transition
//! through the backend. A chained follow-up is only sent after the primary
//! change is acknowledged; its failure never undoes the primary change.

use std::time::Duration;

use fo_contracts::{Contract, StatusChangeContract, SubmissionDraft};
use fo_core::config::AppConfig;
use fo_core::error::{FoError, SubmissionError, TransitionError, ValidationErrors};
use fo_core::result::FoResult;
use fo_models::{ActorRole, LocationCapture, Status, Ticket, TicketStatusAck};
use tracing::{error, info, warn};

use super::engine::{StatusOption, StatusTransitionEngine};
use super::TicketStatusApi;

const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Local state of one status-change dialog
#[derive(Debug, Clone)]
pub struct StatusChangeForm {
    ticket: Ticket,
    role: Option<ActorRole>,
    contract: StatusChangeContract,
    options: Vec<StatusOption>,
    selected: Option<Status>,
    comment: String,
    location: Option<LocationCapture>,
    submitting: bool,
}

impl StatusChangeForm {
    /// Open a form with options computed fresh for the ticket and role
    pub fn open(engine: &StatusTransitionEngine, ticket: Ticket, role: Option<ActorRole>) -> Self {
        let options = engine.available_transitions(ticket.status, role);
        Self {
            ticket,
            role,
            contract: engine.contract(),
            options,
            selected: None,
            comment: String::new(),
            location: None,
            submitting: false,
        }
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn role(&self) -> Option<ActorRole> {
        self.role
    }

    pub fn options(&self) -> &[StatusOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<Status> {
        self.selected
    }

    /// Pick one of the offered statuses
    pub fn select(&mut self, status: Status) -> Result<(), TransitionError> {
        if !self.options.iter().any(|o| o.status == status) {
            return Err(TransitionError::NotAllowed {
                from: self.ticket.status.to_string(),
                to: status.to_string(),
            });
        }
        self.selected = Some(status);
        Ok(())
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn location(&self) -> Option<&LocationCapture> {
        self.location.as_ref()
    }

    pub fn set_location(&mut self, location: LocationCapture) {
        self.location = Some(location);
    }

    pub fn clear_location(&mut self) {
        self.location = None;
    }

    /// Whether the selected status needs a captured location
    pub fn requires_location(&self) -> bool {
        self.selected
            .map(|s| self.contract.requires_location(s))
            .unwrap_or(false)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Inline errors for the current input
    pub fn field_errors(&self) -> ValidationErrors {
        match self.draft() {
            Some(draft) => self.contract.field_errors(&draft),
            None => {
                let mut errors = ValidationErrors::new();
                errors.add("status", "can't be blank");
                errors
            }
        }
    }

    /// Drives enablement of the submit control
    pub fn can_submit(&self) -> bool {
        !self.submitting
            && self
                .draft()
                .map(|draft| self.contract.validate(&draft).is_ok())
                .unwrap_or(false)
    }

    /// Discard the selection, comment and captured location
    pub fn reset(&mut self) {
        self.selected = None;
        self.comment.clear();
        self.location = None;
        self.submitting = false;
    }

    fn draft(&self) -> Option<SubmissionDraft> {
        self.selected.map(|status| SubmissionDraft {
            status,
            comment: Some(self.comment.clone()),
            location: self.location.clone(),
        })
    }

    fn committed(&mut self, engine: &StatusTransitionEngine, status: Status) {
        self.ticket.status = status;
        self.reset();
        self.options = engine.available_transitions(status, self.role);
    }
}

/// What happened to the chained follow-up transition
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUpOutcome {
    NotPlanned,
    Completed(TicketStatusAck),
    /// Logged only; the primary change still stands
    Failed { status: Status, error: SubmissionError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusChangeOutcome {
    pub primary: TicketStatusAck,
    pub follow_up: FollowUpOutcome,
}

impl StatusChangeOutcome {
    /// Latest status the backend acknowledged
    pub fn final_status(&self) -> Status {
        match &self.follow_up {
            FollowUpOutcome::Completed(ack) => ack.status,
            _ => self.primary.status,
        }
    }
}

/// Service submitting status changes
///
/// # Example
/// ```ignore
/// let service = ChangeStatusService::new(api, StatusTransitionEngine::default());
/// let mut form = StatusChangeForm::open(service.engine(), ticket, Some(ActorRole::ServicePerson));
/// form.select(Status::OnsiteVisitReached)?;
/// form.set_location(capture);
/// let outcome = service.submit(&mut form).await?;
/// ```
pub struct ChangeStatusService<A: TicketStatusApi> {
    api: A,
    engine: StatusTransitionEngine,
    settle_delay: Duration,
}

impl<A: TicketStatusApi> ChangeStatusService<A> {
    pub fn new(api: A, engine: StatusTransitionEngine) -> Self {
        Self {
            api,
            engine,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn from_config(api: A, config: &AppConfig) -> Self {
        Self::new(api, StatusTransitionEngine::from_config(config))
            .with_settle_delay(config.follow_up_settle_delay())
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn engine(&self) -> &StatusTransitionEngine {
        &self.engine
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Submit the form's transition and any follow-up it implies
    ///
    /// On failure the form keeps the user's input so the change can be retried.
    pub async fn submit(&self, form: &mut StatusChangeForm) -> FoResult<StatusChangeOutcome> {
        if form.submitting {
            return Err(FoError::SubmissionInFlight);
        }

        let selected = form.selected.ok_or_else(|| FoError::Validation(form.field_errors()))?;
        self.engine
            .validate_transition(form.ticket.status, selected, form.role)?;
        let submission = self.engine.validate_submission(
            selected,
            Some(form.comment.as_str()),
            form.location.as_ref(),
        )?;

        let ticket_id = form.ticket.id;
        form.submitting = true;

        let primary = match self.api.update_status(ticket_id, &submission.to_request()).await {
            Ok(ack) => ack,
            Err(e) => {
                form.submitting = false;
                warn!(ticket_id, status = %selected, error = %e, "Status change rejected");
                return Err(e.into());
            }
        };
        info!(ticket_id, from = %form.ticket.status, to = %primary.status, "Status changed");

        let follow_up = match self.engine.plan_follow_up(selected) {
            Some(plan) if primary.status != selected => {
                warn!(
                    ticket_id,
                    requested = %selected,
                    acknowledged = %primary.status,
                    skipped = %plan.status,
                    "Backend acknowledged a different status, skipping follow-up"
                );
                FollowUpOutcome::NotPlanned
            }
            Some(plan) => {
                tokio::time::sleep(self.settle_delay).await;

                let follow_up = plan.to_submission(submission.location.as_ref());
                match self.api.update_status(ticket_id, &follow_up.to_request()).await {
                    Ok(ack) => {
                        info!(ticket_id, to = %ack.status, "Follow-up status change applied");
                        FollowUpOutcome::Completed(ack)
                    }
                    Err(e) => {
                        error!(
                            ticket_id,
                            status = %plan.status,
                            error = %e,
                            "Follow-up status change failed"
                        );
                        FollowUpOutcome::Failed {
                            status: plan.status,
                            error: e,
                        }
                    }
                }
            }
            None => FollowUpOutcome::NotPlanned,
        };

        let outcome = StatusChangeOutcome { primary, follow_up };
        form.committed(&self.engine, outcome.final_status());
        Ok(outcome)
    }
}
