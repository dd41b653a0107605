//! Ticket status
//!
//! The closed set of workflow states a ticket or activity record can be in.

use fo_core::error::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow status of a ticket
///
/// Serialized with the backend's SCREAMING_SNAKE_CASE names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Open,
    Assigned,
    InProgress,
    WaitingCustomer,
    OnsiteVisit,
    OnsiteVisitPlanned,
    OnsiteVisitStarted,
    OnsiteVisitReached,
    OnsiteVisitInProgress,
    OnsiteVisitResolved,
    OnsiteVisitPending,
    OnsiteVisitCompleted,
    PoNeeded,
    PoReached,
    PoReceived,
    SparePartsNeeded,
    SparePartsBooked,
    SparePartsDelivered,
    ClosedPending,
    Closed,
    Cancelled,
    Reopened,
    OnHold,
    Escalated,
    Resolved,
    Pending,
    /// Legacy alias of `InProgress` still present on older records
    InProcess,
}

impl Status {
    pub const ALL: [Status; 27] = [
        Status::Open,
        Status::Assigned,
        Status::InProgress,
        Status::WaitingCustomer,
        Status::OnsiteVisit,
        Status::OnsiteVisitPlanned,
        Status::OnsiteVisitStarted,
        Status::OnsiteVisitReached,
        Status::OnsiteVisitInProgress,
        Status::OnsiteVisitResolved,
        Status::OnsiteVisitPending,
        Status::OnsiteVisitCompleted,
        Status::PoNeeded,
        Status::PoReached,
        Status::PoReceived,
        Status::SparePartsNeeded,
        Status::SparePartsBooked,
        Status::SparePartsDelivered,
        Status::ClosedPending,
        Status::Closed,
        Status::Cancelled,
        Status::Reopened,
        Status::OnHold,
        Status::Escalated,
        Status::Resolved,
        Status::Pending,
        Status::InProcess,
    ];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::Assigned => "ASSIGNED",
            Status::InProgress => "IN_PROGRESS",
            Status::WaitingCustomer => "WAITING_CUSTOMER",
            Status::OnsiteVisit => "ONSITE_VISIT",
            Status::OnsiteVisitPlanned => "ONSITE_VISIT_PLANNED",
            Status::OnsiteVisitStarted => "ONSITE_VISIT_STARTED",
            Status::OnsiteVisitReached => "ONSITE_VISIT_REACHED",
            Status::OnsiteVisitInProgress => "ONSITE_VISIT_IN_PROGRESS",
            Status::OnsiteVisitResolved => "ONSITE_VISIT_RESOLVED",
            Status::OnsiteVisitPending => "ONSITE_VISIT_PENDING",
            Status::OnsiteVisitCompleted => "ONSITE_VISIT_COMPLETED",
            Status::PoNeeded => "PO_NEEDED",
            Status::PoReached => "PO_REACHED",
            Status::PoReceived => "PO_RECEIVED",
            Status::SparePartsNeeded => "SPARE_PARTS_NEEDED",
            Status::SparePartsBooked => "SPARE_PARTS_BOOKED",
            Status::SparePartsDelivered => "SPARE_PARTS_DELIVERED",
            Status::ClosedPending => "CLOSED_PENDING",
            Status::Closed => "CLOSED",
            Status::Cancelled => "CANCELLED",
            Status::Reopened => "REOPENED",
            Status::OnHold => "ON_HOLD",
            Status::Escalated => "ESCALATED",
            Status::Resolved => "RESOLVED",
            Status::Pending => "PENDING",
            Status::InProcess => "IN_PROCESS",
        }
    }

    /// Resolve legacy aliases to the status they stand for
    pub fn canonical(self) -> Status {
        match self {
            Status::InProcess => Status::InProgress,
            other => other,
        }
    }

    pub fn is_legacy_alias(&self) -> bool {
        self.canonical() != *self
    }

    /// Statuses that record the technician's presence on site
    pub fn is_onsite_presence(&self) -> bool {
        matches!(
            self,
            Status::OnsiteVisitStarted
                | Status::OnsiteVisitReached
                | Status::OnsiteVisitInProgress
                | Status::OnsiteVisitResolved
                | Status::OnsiteVisitCompleted
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TransitionError;

    /// Accepts the wire name in any case, with `-` or spaces in place of `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| TransitionError::UnknownStatus {
                status: s.to_string(),
            })
    }
}
