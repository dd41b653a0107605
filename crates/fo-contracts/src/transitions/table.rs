//! Transition table
//!
//! Destinations are listed in workflow order; the order is what the status
//! picker shows and must not be sorted.

use fo_models::Status;

/// Configured destinations of a status, before role filtering
pub fn destinations(from: Status) -> &'static [Status] {
    use Status::*;

    match from {
        Open => &[Assigned, InProgress, OnsiteVisitPlanned, OnHold, Escalated, Cancelled],
        Assigned => &[
            InProgress,
            OnsiteVisitPlanned,
            OnsiteVisit,
            WaitingCustomer,
            OnHold,
            Escalated,
            Cancelled,
        ],
        InProgress | InProcess => &[
            WaitingCustomer,
            OnsiteVisitPlanned,
            OnsiteVisit,
            PoNeeded,
            SparePartsNeeded,
            OnHold,
            Escalated,
            Resolved,
            ClosedPending,
            Cancelled,
        ],
        WaitingCustomer => &[InProgress, OnsiteVisitPlanned, OnHold, Escalated, ClosedPending, Cancelled],

        // Onsite visit
        OnsiteVisit => &[OnsiteVisitPlanned, OnsiteVisitStarted, InProgress, Cancelled],
        OnsiteVisitPlanned => &[OnsiteVisitStarted, OnsiteVisit, OnHold, Cancelled],
        OnsiteVisitStarted => &[OnsiteVisitReached, OnsiteVisitPending],
        OnsiteVisitReached => &[OnsiteVisitInProgress],
        OnsiteVisitInProgress => &[OnsiteVisitResolved, OnsiteVisitPending, PoNeeded, SparePartsNeeded],
        OnsiteVisitResolved => &[OnsiteVisitCompleted, ClosedPending],
        OnsiteVisitPending => &[
            OnsiteVisitPlanned,
            OnsiteVisitInProgress,
            PoNeeded,
            SparePartsNeeded,
            OnHold,
        ],
        OnsiteVisitCompleted => &[ClosedPending, Resolved, InProgress],

        // Purchase order
        PoNeeded => &[PoReached, PoReceived, OnHold, Cancelled],
        PoReached => &[PoReceived, OnHold],
        PoReceived => &[InProgress, SparePartsNeeded, OnsiteVisitPlanned],

        // Spare parts
        SparePartsNeeded => &[SparePartsBooked, PoNeeded, OnHold],
        SparePartsBooked => &[SparePartsDelivered, OnHold],
        SparePartsDelivered => &[InProgress, OnsiteVisitPlanned, OnsiteVisit],

        // Completion
        ClosedPending => &[Closed, Reopened],
        Closed => &[Reopened],
        Resolved => &[Closed, ClosedPending, Reopened],

        // Special
        Cancelled => &[Reopened],
        Reopened => &[Assigned, InProgress, OnsiteVisitPlanned, Escalated, Cancelled],
        OnHold => &[InProgress, Pending, Escalated, Cancelled],
        Escalated => &[InProgress, OnHold, Resolved, ClosedPending, Cancelled],
        Pending => &[Open, InProgress, OnHold, Cancelled],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_status_has_an_exit() {
        for status in Status::ALL {
            assert!(!destinations(status).is_empty(), "{} has no destinations", status);
        }
    }

    #[test]
    fn test_no_duplicates_or_self_loops() {
        for status in Status::ALL {
            let dests = destinations(status);
            let unique: HashSet<_> = dests.iter().collect();
            assert_eq!(unique.len(), dests.len(), "{} lists a destination twice", status);
            assert!(!dests.contains(&status), "{} transitions to itself", status);
        }
    }

    #[test]
    fn test_closed_only_reopens() {
        assert_eq!(destinations(Status::Closed), &[Status::Reopened]);
        assert_eq!(destinations(Status::Cancelled), &[Status::Reopened]);
    }

    #[test]
    fn test_only_closed_and_cancelled_exit_solely_to_reopened() {
        let reopen_only: HashSet<Status> = Status::ALL
            .into_iter()
            .filter(|s| destinations(*s) == [Status::Reopened])
            .collect();
        assert_eq!(reopen_only, HashSet::from([Status::Closed, Status::Cancelled]));
    }

    #[test]
    fn test_every_key_is_reachable() {
        let reachable: HashSet<Status> = Status::ALL
            .into_iter()
            .flat_map(|s| destinations(s).iter().copied())
            .collect();
        for status in Status::ALL {
            if status.is_legacy_alias() {
                assert!(!reachable.contains(&status), "legacy {} offered as destination", status);
            } else {
                assert!(reachable.contains(&status), "{} is never a destination", status);
            }
        }
    }

    #[test]
    fn test_legacy_alias_shares_destinations() {
        assert_eq!(destinations(Status::InProcess), destinations(Status::InProgress));
    }

    #[test]
    fn test_declared_order_is_kept() {
        assert_eq!(
            destinations(Status::OnsiteVisitStarted),
            &[Status::OnsiteVisitReached, Status::OnsiteVisitPending]
        );
        assert_eq!(destinations(Status::ClosedPending), &[Status::Closed, Status::Reopened]);
    }
}
