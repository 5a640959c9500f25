//! Domain models for the chat relay.

pub mod chat;

pub use chat::{ChatRequest, ConversationTurn, Role, TurnPart};
