//! Role-play tutor core.
//!
//! Holds the room model, the prompt templates derived from it, and the
//! conversation session that replays the full message log to a chat
//! completion service on every turn. Terminal, speech and audio concerns live
//! in the `roleplay-cli` service.

pub mod error;
pub mod llm_client;
pub mod message;
pub mod prompt;
pub mod room;
pub mod session;
pub mod translate;

pub use error::{RoomError, SessionError};
pub use message::{Message, MessageRole};
pub use room::{Language, Level, RoomConfig};
pub use session::{ConversationSession, Persist};
