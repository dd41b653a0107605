//! Ticket status endpoint

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fo_core::error::SubmissionError;
use fo_core::traits::Id;
use fo_models::{Status, StatusUpdateRequest, TicketStatusAck};
use fo_services::TicketStatusApi;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{rejection_message, Envelope, HttpApiClient};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl TicketStatusApi for HttpApiClient {
    async fn update_status(
        &self,
        ticket_id: Id,
        request: &StatusUpdateRequest,
    ) -> Result<TicketStatusAck, SubmissionError> {
        let url = self.endpoint(&format!("tickets/{}/status", ticket_id))?;
        debug!(ticket_id, status = %request.status, %url, "Sending status change");

        let response = self
            .patch(url)
            .json(request)
            .send()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(ticket_id, http_status = status.as_u16(), "Status change rejected by backend");
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body, &status.to_string()),
            });
        }

        acknowledgement(ticket_id, request, status.as_u16(), &body)
    }
}

/// Build the ack from the response body, defaulting to the requested status
fn acknowledgement(
    ticket_id: Id,
    request: &StatusUpdateRequest,
    http_status: u16,
    body: &str,
) -> Result<TicketStatusAck, SubmissionError> {
    let mut ack = TicketStatusAck {
        ticket_id,
        status: request.status,
        acknowledged_at: Utc::now(),
    };
    if body.trim().is_empty() {
        return Ok(ack);
    }

    let envelope: Envelope<TicketBody> = serde_json::from_str(body)
        .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;

    if envelope.success == Some(false) {
        return Err(SubmissionError::Rejected {
            status: http_status,
            message: envelope
                .message
                .unwrap_or_else(|| "status change was not applied".to_string()),
        });
    }

    if let Some(ticket) = envelope.data {
        if let Some(status) = ticket.status.as_deref().and_then(|s| s.parse::<Status>().ok()) {
            ack.status = status;
        }
        if let Some(updated_at) = ticket.updated_at {
            ack.acknowledged_at = updated_at;
        }
    }
    Ok(ack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(status: Status) -> StatusUpdateRequest {
        StatusUpdateRequest {
            status,
            comments: None,
            location: None,
        }
    }

    #[test]
    fn test_empty_body_acknowledges_request() {
        let ack = acknowledgement(7, &request(Status::Assigned), 204, "").unwrap();
        assert_eq!(ack.ticket_id, 7);
        assert_eq!(ack.status, Status::Assigned);
    }

    #[test]
    fn test_body_status_and_timestamp_win() {
        let body = r#"{"success":true,"data":{"id":7,"status":"IN_PROCESS","updatedAt":"2024-05-01T10:00:00Z"}}"#;
        let ack = acknowledgement(7, &request(Status::InProgress), 200, body).unwrap();
        assert_eq!(ack.status, Status::InProcess);
        assert_eq!(ack.acknowledged_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_unsuccessful_envelope_is_rejected() {
        let body = r#"{"success":false,"message":"Ticket is locked"}"#;
        assert_eq!(
            acknowledgement(7, &request(Status::OnHold), 200, body),
            Err(SubmissionError::Rejected {
                status: 200,
                message: "Ticket is locked".into()
            })
        );
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            acknowledgement(7, &request(Status::OnHold), 200, "<html>"),
            Err(SubmissionError::InvalidResponse(_))
        ));
    }
}
