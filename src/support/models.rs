//! Support ticket and chat data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a ticket is in its lifecycle. Transitions are forward-only and
/// `Resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Pending,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Pending, TicketStatus::InProgress)
                | (TicketStatus::Pending, TicketStatus::Resolved)
                | (TicketStatus::InProgress, TicketStatus::Resolved)
        )
    }
}

/// A user-filed support report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub author_id: String,
    pub author_email: String,
    pub author_name: String,
    pub subject_id: u64,
    pub subject_title: String,
    pub reason: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
}

impl Ticket {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        author_id: String,
        author_email: String,
        author_name: String,
        subject_id: u64,
        subject_title: String,
        reason: String,
        details: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author_id,
            author_email,
            author_name,
            subject_id,
            subject_title,
            reason,
            details,
            created_at: Utc::now(),
            status: TicketStatus::Pending,
            resolution_note: None,
        }
    }
}

/// One message in a ticket's two-party chat thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub ticket_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl ChatMessage {
    pub fn new(ticket_id: String, sender_id: String, receiver_id: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id,
            sender_id,
            receiver_id,
            body,
            timestamp: Utc::now(),
            read: false,
        }
    }
}
