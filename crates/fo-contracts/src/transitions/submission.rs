//! Submission contract for a status change
//!
//! Runs twice for every change: reactively while the form is edited (to
//! enable the submit control) and again right before the request is sent.

use fo_core::config::LocationPolicy;
use fo_core::error::{TransitionError, ValidationErrors};
use fo_models::{LocationCapture, Status, StatusMetadata, StatusUpdateRequest};
use validator::Validate;

use crate::base::{Contract, ValidationResult};
use super::requires_location;

/// Form input for a status change
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDraft {
    pub status: Status,
    pub comment: Option<String>,
    pub location: Option<LocationCapture>,
}

/// A submission that passed the contract
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub status: Status,
    /// Trimmed; `None` when the user left it blank
    pub comment: Option<String>,
    pub location: Option<LocationCapture>,
}

impl ValidSubmission {
    pub fn to_request(&self) -> StatusUpdateRequest {
        StatusUpdateRequest {
            status: self.status,
            comments: self.comment.clone(),
            location: self.location.as_ref().map(LocationCapture::to_payload),
        }
    }
}

/// Comment and location requirements of the chosen status
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusChangeContract {
    location_policy: LocationPolicy,
}

impl StatusChangeContract {
    pub fn new(location_policy: LocationPolicy) -> Self {
        Self { location_policy }
    }

    pub fn location_policy(&self) -> LocationPolicy {
        self.location_policy
    }

    pub fn requires_comment(&self, status: Status) -> bool {
        StatusMetadata::for_status(status).requires_comment
    }

    pub fn requires_location(&self, status: Status) -> bool {
        match self.location_policy {
            LocationPolicy::OnsiteOnly => requires_location(status),
            LocationPolicy::EveryTransition => true,
        }
    }

    /// Authoritative check; reports the comment before the location
    pub fn validate_submission(
        &self,
        status: Status,
        comment: Option<&str>,
        location: Option<&LocationCapture>,
    ) -> Result<ValidSubmission, TransitionError> {
        let comment = normalize_comment(comment);

        if self.requires_comment(status) && comment.is_none() {
            return Err(TransitionError::MissingComment {
                status: status.to_string(),
            });
        }
        if self.requires_location(status) && location.is_none() {
            return Err(TransitionError::MissingLocation {
                status: status.to_string(),
            });
        }
        if location.is_some_and(|l| l.validate().is_err()) {
            return Err(TransitionError::InvalidLocation {
                status: status.to_string(),
            });
        }

        Ok(ValidSubmission {
            status,
            comment,
            location: location.cloned(),
        })
    }

    /// Every failing field at once, for inline display
    pub fn field_errors(&self, draft: &SubmissionDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.requires_comment(draft.status) && normalize_comment(draft.comment.as_deref()).is_none() {
            errors.merge(
                TransitionError::MissingComment {
                    status: draft.status.to_string(),
                }
                .into(),
            );
        }

        match &draft.location {
            None if self.requires_location(draft.status) => {
                errors.merge(
                    TransitionError::MissingLocation {
                        status: draft.status.to_string(),
                    }
                    .into(),
                );
            }
            Some(location) if location.validate().is_err() => {
                errors.merge(
                    TransitionError::InvalidLocation {
                        status: draft.status.to_string(),
                    }
                    .into(),
                );
            }
            _ => {}
        }

        errors
    }
}

impl Contract<SubmissionDraft> for StatusChangeContract {
    fn validate(&self, draft: &SubmissionDraft) -> ValidationResult {
        let errors = self.field_errors(draft);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn normalize_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
