//! Ticket snapshot and status update payloads

use chrono::{DateTime, Utc};
use fo_core::traits::{Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};

use crate::location::LocationPayload;
use crate::status::Status;

/// The part of a backend ticket record the transition engine needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Id,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn new(id: Id, status: Status) -> Self {
        Self {
            id,
            status,
            updated_at: None,
        }
    }
}

impl Identifiable for Ticket {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Ticket {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Body of `PATCH /tickets/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdateRequest {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationPayload>,
}

/// Backend acknowledgement of a committed status change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusAck {
    pub ticket_id: Id,
    pub status: Status,
    pub acknowledged_at: DateTime<Utc>,
}
