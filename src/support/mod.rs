//! Support ticket and chat subsystem.

pub mod desk;
pub mod models;

pub use desk::SupportDesk;
pub use models::{ChatMessage, Ticket, TicketStatus};
