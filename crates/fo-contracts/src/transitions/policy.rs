//! Role gating of destinations

use fo_models::{ActorRole, Status};

/// Whether `role` may move a ticket into `to`
///
/// A missing role gets no privileges beyond the default.
pub fn is_transition_allowed_for_role(to: Status, role: Option<ActorRole>) -> bool {
    match to {
        Status::Closed => matches!(role, Some(ActorRole::Admin)),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_is_admin_only() {
        assert!(is_transition_allowed_for_role(Status::Closed, Some(ActorRole::Admin)));
        for role in [ActorRole::ServicePerson, ActorRole::ZoneUser, ActorRole::Customer] {
            assert!(!is_transition_allowed_for_role(Status::Closed, Some(role)));
        }
        assert!(!is_transition_allowed_for_role(Status::Closed, None));
    }

    #[test]
    fn test_other_statuses_are_open_to_all() {
        for status in Status::ALL.into_iter().filter(|s| *s != Status::Closed) {
            assert!(is_transition_allowed_for_role(status, None));
            for role in ActorRole::ALL {
                assert!(is_transition_allowed_for_role(status, Some(role)));
            }
        }
    }
}
