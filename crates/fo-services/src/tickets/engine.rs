//! Status transition engine
//!
//! Stateless: options are recomputed from `(current status, role)` every time
//! a status dialog opens. The ticket's status itself belongs to the backend.

use fo_contracts::{
    available_destinations, validate_transition, StatusChangeContract, ValidSubmission,
};
use fo_core::config::{AppConfig, LocationPolicy};
use fo_core::error::TransitionError;
use fo_models::{ActorRole, LocationCapture, Status, StatusCategory, StatusMetadata};
use serde::Serialize;
use tracing::debug;

use super::follow_up::FollowUpPlan;

/// A selectable next status with what the picker needs to render it
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusOption {
    pub status: Status,
    pub label: String,
    pub short_label: String,
    pub category: StatusCategory,
    pub description: String,
    pub is_destructive: bool,
    pub requires_comment: bool,
    pub requires_location: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTransitionEngine {
    contract: StatusChangeContract,
}

impl StatusTransitionEngine {
    pub fn new(location_policy: LocationPolicy) -> Self {
        Self {
            contract: StatusChangeContract::new(location_policy),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.engine.location_policy)
    }

    pub fn contract(&self) -> StatusChangeContract {
        self.contract
    }

    /// Legal next statuses in table order
    pub fn available_transitions(&self, current: Status, role: Option<ActorRole>) -> Vec<StatusOption> {
        let options: Vec<StatusOption> = available_destinations(current, role)
            .into_iter()
            .map(|status| self.option_for(status))
            .collect();

        debug!(
            current = %current,
            role = ?role,
            count = options.len(),
            "Computed available transitions"
        );
        options
    }

    /// Same as [`available_transitions`](Self::available_transitions) for a raw status name
    pub fn available_transitions_for(
        &self,
        current: &str,
        role: Option<ActorRole>,
    ) -> Result<Vec<StatusOption>, TransitionError> {
        let current: Status = current.parse()?;
        Ok(self.available_transitions(current, role))
    }

    pub fn requires_location(&self, status: Status) -> bool {
        self.contract.requires_location(status)
    }

    pub fn validate_submission(
        &self,
        status: Status,
        comment: Option<&str>,
        location: Option<&LocationCapture>,
    ) -> Result<ValidSubmission, TransitionError> {
        self.contract.validate_submission(status, comment, location)
    }

    pub fn validate_transition(
        &self,
        current: Status,
        selected: Status,
        role: Option<ActorRole>,
    ) -> Result<(), TransitionError> {
        validate_transition(current, selected, role)
    }

    pub fn plan_follow_up(&self, selected: Status) -> Option<FollowUpPlan> {
        FollowUpPlan::for_status(selected)
    }

    pub fn option_for(&self, status: Status) -> StatusOption {
        let meta = StatusMetadata::for_status(status);
        StatusOption {
            status,
            label: meta.label,
            short_label: meta.short_label,
            category: meta.category,
            description: meta.description,
            is_destructive: meta.is_destructive,
            requires_comment: meta.requires_comment,
            requires_location: self.requires_location(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(options: &[StatusOption]) -> Vec<Status> {
        options.iter().map(|o| o.status).collect()
    }

    #[test]
    fn test_every_status_has_options() {
        let engine = StatusTransitionEngine::default();
        for status in Status::ALL {
            for role in ActorRole::ALL {
                let options = engine.available_transitions(status, Some(role));
                assert!(!options.is_empty(), "{} has no options for {}", status, role);
            }
        }
    }

    #[test]
    fn test_admin_in_progress_offers_closed_pending() {
        let engine = StatusTransitionEngine::default();
        let options = engine.available_transitions(Status::InProgress, Some(ActorRole::Admin));
        let closed_pending = options
            .iter()
            .find(|o| o.status == Status::ClosedPending)
            .unwrap();
        assert!(closed_pending.requires_comment);
        assert!(!closed_pending.requires_location);
        assert_eq!(closed_pending.category, StatusCategory::Completion);
    }

    #[test]
    fn test_service_person_assigned_never_sees_closed() {
        let engine = StatusTransitionEngine::default();
        let options = engine.available_transitions(Status::Assigned, Some(ActorRole::ServicePerson));
        assert!(!statuses(&options).contains(&Status::Closed));
        assert_eq!(
            statuses(&options),
            vec![
                Status::InProgress,
                Status::OnsiteVisitPlanned,
                Status::OnsiteVisit,
                Status::WaitingCustomer,
                Status::OnHold,
                Status::Escalated,
                Status::Cancelled,
            ]
        );
    }

    #[test]
    fn test_closed_ticket_only_reopens() {
        let engine = StatusTransitionEngine::default();
        for role in ActorRole::ALL {
            let options = engine.available_transitions(Status::Closed, Some(role));
            assert_eq!(statuses(&options), vec![Status::Reopened]);
        }
        let cancelled = engine.available_transitions(Status::Cancelled, None);
        assert_eq!(statuses(&cancelled), vec![Status::Reopened]);
    }

    #[test]
    fn test_options_carry_metadata() {
        let engine = StatusTransitionEngine::default();
        let options = engine.available_transitions(Status::ClosedPending, Some(ActorRole::Admin));
        let closed = &options[0];
        assert_eq!(closed.status, Status::Closed);
        assert_eq!(closed.label, "Closed");
        assert!(closed.is_destructive);
        assert!(closed.requires_comment);

        let started = engine.option_for(Status::OnsiteVisitStarted);
        assert!(started.requires_location);
        assert!(!started.requires_comment);
    }

    #[test]
    fn test_unknown_raw_status() {
        let engine = StatusTransitionEngine::default();
        assert_eq!(
            engine.available_transitions_for("ARCHIVED", Some(ActorRole::Admin)),
            Err(TransitionError::UnknownStatus {
                status: "ARCHIVED".into()
            })
        );
        let options = engine
            .available_transitions_for("in_process", Some(ActorRole::Admin))
            .unwrap();
        assert_eq!(
            statuses(&options),
            statuses(&engine.available_transitions(Status::InProgress, Some(ActorRole::Admin)))
        );
    }

    #[test]
    fn test_admin_in_progress_close_pending_scenario() {
        let engine = StatusTransitionEngine::default();
        let options = engine.available_transitions(Status::InProgress, Some(ActorRole::Admin));
        assert!(statuses(&options).contains(&Status::ClosedPending));

        assert!(matches!(
            engine.validate_submission(Status::ClosedPending, Some(""), None),
            Err(TransitionError::MissingComment { .. })
        ));

        let comment = "Replaced filter, tested, customer signed off";
        let submission = engine
            .validate_submission(Status::ClosedPending, Some(comment), None)
            .unwrap();
        let json = serde_json::to_value(submission.to_request()).unwrap();
        assert_eq!(json["status"], "CLOSED_PENDING");
        assert_eq!(json["comments"], comment);
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_follow_up_only_after_reaching_site() {
        let engine = StatusTransitionEngine::default();
        assert_eq!(
            engine.plan_follow_up(Status::OnsiteVisitReached).map(|p| p.status),
            Some(Status::OnsiteVisitInProgress)
        );
        assert!(engine.plan_follow_up(Status::OnsiteVisitInProgress).is_none());
        assert!(engine.plan_follow_up(Status::Closed).is_none());
    }

    #[test]
    fn test_follow_up_target_is_a_legal_transition() {
        let engine = StatusTransitionEngine::default();
        let plan = engine.plan_follow_up(Status::OnsiteVisitReached).unwrap();
        for role in ActorRole::ALL {
            assert!(engine
                .validate_transition(Status::OnsiteVisitReached, plan.status, Some(role))
                .is_ok());
        }
    }

    #[test]
    fn test_location_policy_from_config() {
        let mut config = AppConfig::default();
        config.engine.location_policy = LocationPolicy::EveryTransition;
        let engine = StatusTransitionEngine::from_config(&config);
        let options = engine.available_transitions(Status::Open, Some(ActorRole::ZoneUser));
        assert!(options.iter().all(|o| o.requires_location));
    }
}
