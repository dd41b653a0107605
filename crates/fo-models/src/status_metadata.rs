//! Display metadata for statuses
//!
//! Built once on first access and never mutated afterwards.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::status::Status;

/// Workflow grouping a status is displayed under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Basic,
    Onsite,
    Purchase,
    Parts,
    Completion,
    Special,
    /// Statuses without a metadata entry
    Other,
}

/// Descriptive attributes of a status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusMetadata {
    pub label: String,
    pub short_label: String,
    pub category: StatusCategory,
    pub description: String,
    /// Rendered with a warning style; the change is hard to walk back
    pub is_destructive: bool,
    pub requires_comment: bool,
}

impl StatusMetadata {
    fn entry(
        label: &str,
        short_label: &str,
        category: StatusCategory,
        description: &str,
    ) -> Self {
        Self {
            label: label.to_string(),
            short_label: short_label.to_string(),
            category,
            description: description.to_string(),
            is_destructive: false,
            requires_comment: false,
        }
    }

    fn destructive(mut self) -> Self {
        self.is_destructive = true;
        self
    }

    fn comment_required(mut self) -> Self {
        self.requires_comment = true;
        self
    }

    /// Metadata for a status, deriving a label when the table has no entry
    pub fn for_status(status: Status) -> StatusMetadata {
        STATUS_METADATA
            .get(&status)
            .cloned()
            .unwrap_or_else(|| Self::fallback(status))
    }

    /// Whether the table carries an explicit entry for the status
    pub fn is_known(status: Status) -> bool {
        STATUS_METADATA.contains_key(&status)
    }

    fn fallback(status: Status) -> StatusMetadata {
        let label = title_case(status.as_str());
        StatusMetadata {
            short_label: label.clone(),
            description: label.clone(),
            label,
            category: StatusCategory::Other,
            is_destructive: false,
            requires_comment: false,
        }
    }
}

/// `ONSITE_VISIT_REACHED` -> `Onsite Visit Reached`
pub fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

static STATUS_METADATA: Lazy<HashMap<Status, StatusMetadata>> = Lazy::new(|| {
    use StatusCategory::*;

    HashMap::from([
        // Basic
        (
            Status::Open,
            StatusMetadata::entry("Open", "Open", Basic, "Ticket is newly created and awaiting assignment"),
        ),
        (
            Status::Assigned,
            StatusMetadata::entry("Assigned", "Assigned", Basic, "Ticket has been assigned to a service person"),
        ),
        (
            Status::InProgress,
            StatusMetadata::entry("In Progress", "In Progress", Basic, "Work on the ticket has started"),
        ),
        (
            Status::WaitingCustomer,
            StatusMetadata::entry("Waiting for Customer", "Waiting", Basic, "Waiting for a response or action from the customer"),
        ),
        (
            Status::Pending,
            StatusMetadata::entry("Pending", "Pending", Basic, "Ticket is pending further action"),
        ),
        // Onsite
        (
            Status::OnsiteVisit,
            StatusMetadata::entry("Onsite Visit", "Onsite", Onsite, "An onsite visit is required"),
        ),
        (
            Status::OnsiteVisitPlanned,
            StatusMetadata::entry("Onsite Visit Planned", "Visit Planned", Onsite, "The onsite visit has been scheduled")
                .comment_required(),
        ),
        (
            Status::OnsiteVisitStarted,
            StatusMetadata::entry("Onsite Visit Started", "Visit Started", Onsite, "Service person is on the way to the site"),
        ),
        (
            Status::OnsiteVisitReached,
            StatusMetadata::entry("Onsite Visit Reached", "Site Reached", Onsite, "Service person has arrived at the site"),
        ),
        (
            Status::OnsiteVisitInProgress,
            StatusMetadata::entry("Onsite Visit In Progress", "Visit In Progress", Onsite, "Work is being carried out on site"),
        ),
        (
            Status::OnsiteVisitResolved,
            StatusMetadata::entry("Onsite Visit Resolved", "Visit Resolved", Onsite, "The issue was resolved during the visit"),
        ),
        (
            Status::OnsiteVisitPending,
            StatusMetadata::entry("Onsite Visit Pending", "Visit Pending", Onsite, "The visit is paused pending further action"),
        ),
        (
            Status::OnsiteVisitCompleted,
            StatusMetadata::entry("Onsite Visit Completed", "Visit Completed", Onsite, "Service person has finished and left the site"),
        ),
        // Purchase
        (
            Status::PoNeeded,
            StatusMetadata::entry("PO Needed", "PO Needed", Purchase, "A purchase order is required to proceed"),
        ),
        (
            Status::PoReached,
            StatusMetadata::entry("PO Reached", "PO Reached", Purchase, "The purchase order has reached the customer"),
        ),
        (
            Status::PoReceived,
            StatusMetadata::entry("PO Received", "PO Received", Purchase, "The purchase order has been received"),
        ),
        // Parts
        (
            Status::SparePartsNeeded,
            StatusMetadata::entry("Spare Parts Needed", "Parts Needed", Parts, "Spare parts are required to complete the work"),
        ),
        (
            Status::SparePartsBooked,
            StatusMetadata::entry("Spare Parts Booked", "Parts Booked", Parts, "Spare parts have been ordered"),
        ),
        (
            Status::SparePartsDelivered,
            StatusMetadata::entry("Spare Parts Delivered", "Parts Delivered", Parts, "Spare parts have been delivered"),
        ),
        // Completion
        (
            Status::ClosedPending,
            StatusMetadata::entry("Closed Pending", "Closing", Completion, "Work is done and the ticket awaits final closure")
                .comment_required(),
        ),
        (
            Status::Closed,
            StatusMetadata::entry("Closed", "Closed", Completion, "Ticket is closed")
                .destructive()
                .comment_required(),
        ),
        (
            Status::Resolved,
            StatusMetadata::entry("Resolved", "Resolved", Completion, "The issue has been resolved")
                .comment_required(),
        ),
        // Special
        (
            Status::Cancelled,
            StatusMetadata::entry("Cancelled", "Cancelled", Special, "Ticket has been cancelled")
                .destructive()
                .comment_required(),
        ),
        (
            Status::Reopened,
            StatusMetadata::entry("Reopened", "Reopened", Special, "A closed or cancelled ticket has been reopened"),
        ),
        (
            Status::OnHold,
            StatusMetadata::entry("On Hold", "On Hold", Special, "Work on the ticket is temporarily paused")
                .comment_required(),
        ),
        (
            Status::Escalated,
            StatusMetadata::entry("Escalated", "Escalated", Special, "Ticket has been escalated for attention")
                .destructive()
                .comment_required(),
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_comment_set() {
        let required: Vec<Status> = Status::ALL
            .into_iter()
            .filter(|s| StatusMetadata::for_status(*s).requires_comment)
            .collect();
        assert_eq!(
            required,
            vec![
                Status::OnsiteVisitPlanned,
                Status::ClosedPending,
                Status::Closed,
                Status::Cancelled,
                Status::OnHold,
                Status::Escalated,
                Status::Resolved,
            ]
        );
    }

    #[test]
    fn test_destructive_set() {
        let destructive: Vec<Status> = Status::ALL
            .into_iter()
            .filter(|s| StatusMetadata::for_status(*s).is_destructive)
            .collect();
        assert_eq!(destructive, vec![Status::Closed, Status::Cancelled, Status::Escalated]);
    }

    #[test]
    fn test_legacy_alias_falls_back() {
        assert!(!StatusMetadata::is_known(Status::InProcess));
        let meta = StatusMetadata::for_status(Status::InProcess);
        assert_eq!(meta.label, "In Process");
        assert_eq!(meta.short_label, "In Process");
        assert_eq!(meta.category, StatusCategory::Other);
        assert!(!meta.requires_comment);
        assert!(!meta.is_destructive);
    }

    #[test]
    fn test_every_other_status_has_metadata() {
        for status in Status::ALL.into_iter().filter(|s| !s.is_legacy_alias()) {
            assert!(StatusMetadata::is_known(status), "{} has no metadata", status);
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ONSITE_VISIT_REACHED"), "Onsite Visit Reached");
        assert_eq!(title_case("po_needed"), "Po Needed");
        assert_eq!(title_case("CLOSED"), "Closed");
    }

    #[test]
    fn test_categories() {
        assert_eq!(StatusMetadata::for_status(Status::PoReached).category, StatusCategory::Purchase);
        assert_eq!(StatusMetadata::for_status(Status::SparePartsBooked).category, StatusCategory::Parts);
        assert_eq!(StatusMetadata::for_status(Status::Reopened).category, StatusCategory::Special);
    }
}
