//! Support desk: user-filed tickets, their chat threads, and the
//! notification relays toward ticket authors.
//!
//! Tickets and chat messages are the one pair of collections that is NOT
//! scoped per identity: an operator-style consumer has to see every
//! author's tickets at once, so both live in single shared slots.

use super::models::{ChatMessage, Ticket, TicketStatus};
use crate::notifications::NotificationCenter;
use crate::profile::{keys, StorageHandle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const RESOLUTION_PREVIEW_LEN: usize = 50;

struct DeskState {
    tickets: Vec<Ticket>,
    messages: Vec<ChatMessage>,
}

pub struct SupportDesk {
    storage: StorageHandle,
    notifications: Arc<NotificationCenter>,
    support_id: String,
    state: Mutex<DeskState>,
}

impl SupportDesk {
    pub fn new(
        storage: StorageHandle,
        notifications: Arc<NotificationCenter>,
        support_id: impl Into<String>,
    ) -> Self {
        let tickets = load_slot(&storage, keys::REPORTS_SLOT);
        let messages = load_slot(&storage, keys::CHAT_MESSAGES_SLOT);
        Self {
            storage,
            notifications,
            support_id: support_id.into(),
            state: Mutex::new(DeskState { tickets, messages }),
        }
    }

    /// Files a new ticket in `pending`, newest first. The author gets no
    /// notification for their own submission.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &self,
        author_id: impl Into<String>,
        author_email: impl Into<String>,
        author_name: impl Into<String>,
        subject_id: u64,
        subject_title: impl Into<String>,
        reason: impl Into<String>,
        details: impl Into<String>,
    ) -> Ticket {
        let ticket = Ticket::new(
            author_id.into(),
            author_email.into(),
            author_name.into(),
            subject_id,
            subject_title.into(),
            reason.into(),
            details.into(),
        );
        let mut state = self.state.lock().unwrap();
        state.tickets.insert(0, ticket.clone());
        self.persist_tickets(&state);
        debug!("Ticket {} submitted for subject {}", ticket.id, subject_id);
        ticket
    }

    /// Moves a ticket forward through its status machine. An unknown ticket
    /// or an invalid transition is a no-op returning false. When
    /// `notify_message` is supplied the author's inbox gains a system item.
    pub fn advance_status(
        &self,
        ticket_id: &str,
        next: TicketStatus,
        notify_message: Option<&str>,
    ) -> bool {
        let relay = {
            let mut state = self.state.lock().unwrap();
            let ticket = match state.tickets.iter_mut().find(|t| t.id == ticket_id) {
                Some(ticket) => ticket,
                None => return false,
            };
            if !ticket.status.can_transition_to(next) {
                debug!(
                    "Rejected ticket {} transition {:?} -> {:?}",
                    ticket_id, ticket.status, next
                );
                return false;
            }
            ticket.status = next;
            let relay = notify_message.map(|msg| {
                (
                    ticket.author_id.clone(),
                    format!("Update for {}: {}", ticket.subject_title, msg),
                )
            });
            self.persist_tickets(&state);
            relay
        };
        if let Some((author_id, message)) = relay {
            self.notifications
                .add_item_for_other(&author_id, "Support Update", message);
        }
        true
    }

    /// Resolves a ticket, storing the response as its resolution note and
    /// relaying a truncated preview to the author.
    pub fn resolve(&self, ticket_id: &str, response: &str) -> bool {
        let relay = {
            let mut state = self.state.lock().unwrap();
            let ticket = match state.tickets.iter_mut().find(|t| t.id == ticket_id) {
                Some(ticket) => ticket,
                None => return false,
            };
            if !ticket.status.can_transition_to(TicketStatus::Resolved) {
                return false;
            }
            ticket.status = TicketStatus::Resolved;
            ticket.resolution_note = Some(response.to_string());
            let preview: String = response.chars().take(RESOLUTION_PREVIEW_LEN).collect();
            let relay = (
                ticket.author_id.clone(),
                format!(
                    "Official response for {}: {}...",
                    ticket.subject_title, preview
                ),
            );
            self.persist_tickets(&state);
            relay
        };
        self.notifications
            .add_item_for_other(&relay.0, "Support Update", relay.1);
        true
    }

    /// Appends a chat message to a ticket's thread. Messages sent by the
    /// support identity additionally notify the receiving author. Returns
    /// None if the ticket does not exist.
    pub fn send_message(
        &self,
        ticket_id: &str,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Option<ChatMessage> {
        let sender_id = sender_id.into();
        let receiver_id = receiver_id.into();
        let (message, relay) = {
            let mut state = self.state.lock().unwrap();
            let subject_title = state
                .tickets
                .iter()
                .find(|t| t.id == ticket_id)?
                .subject_title
                .clone();
            let message = ChatMessage::new(
                ticket_id.to_string(),
                sender_id.clone(),
                receiver_id.clone(),
                body.into(),
            );
            state.messages.push(message.clone());
            self.persist_messages(&state);
            let relay = (sender_id == self.support_id).then(|| {
                (
                    receiver_id,
                    format!("Regarding your ticket for {}", subject_title),
                )
            });
            (message, relay)
        };
        if let Some((author_id, body)) = relay {
            self.notifications
                .add_item_for_other(&author_id, "New Message from Support", body);
        }
        Some(message)
    }

    /// Deletes one chat message. Ticket status is unaffected.
    pub fn delete_message(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        let before = state.messages.len();
        state.messages.retain(|message| message.id != id);
        if state.messages.len() != before {
            self.persist_messages(&state);
        }
    }

    /// A ticket's thread, timestamp-ascending.
    pub fn messages_for(&self, ticket_id: &str) -> Vec<ChatMessage> {
        let state = self.state.lock().unwrap();
        let mut thread: Vec<ChatMessage> = state
            .messages
            .iter()
            .filter(|message| message.ticket_id == ticket_id)
            .cloned()
            .collect();
        thread.sort_by_key(|message| message.timestamp);
        thread
    }

    pub fn ticket(&self, ticket_id: &str) -> Option<Ticket> {
        self.state
            .lock()
            .unwrap()
            .tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned()
    }

    /// All tickets, newest first.
    pub fn tickets(&self) -> Vec<Ticket> {
        self.state.lock().unwrap().tickets.clone()
    }

    /// All chat messages across every ticket, in append order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().unwrap().messages.clone()
    }

    fn persist_tickets(&self, state: &DeskState) {
        write_slot(&self.storage, keys::REPORTS_SLOT, &state.tickets);
    }

    fn persist_messages(&self, state: &DeskState) {
        write_slot(&self.storage, keys::CHAT_MESSAGES_SLOT, &state.messages);
    }
}

fn load_slot<T: DeserializeOwned>(storage: &StorageHandle, slot: &str) -> Vec<T> {
    match storage.get(slot) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                warn!("Malformed slot {}, treating as empty: {}", slot, err);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("Failed to read slot {}: {}", slot, err);
            Vec::new()
        }
    }
}

fn write_slot<T: Serialize>(storage: &StorageHandle, slot: &str, items: &[T]) {
    match serde_json::to_string(items) {
        Ok(raw) => {
            if let Err(err) = storage.set(slot, &raw) {
                warn!("Failed to persist slot {}: {}", slot, err);
            }
        }
        Err(err) => warn!("Failed to serialize slot {}: {}", slot, err),
    }
}
