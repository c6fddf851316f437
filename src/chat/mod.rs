//! Live chat: send/receive state machine and session orchestration

pub mod controller;
pub mod state;

pub use controller::ChatController;
pub use state::{BotReply, ChatState, HistoryTicket, PendingSend, SendOutcome, SendStatus};
