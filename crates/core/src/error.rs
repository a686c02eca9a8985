/// Errors raised while building or validating a room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Invalid level: {0}")]
    InvalidLevel(String),
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("Missing room field: {0}")]
    MissingField(&'static str),
}

/// Errors raised by a conversation session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("The conversation has no messages yet")]
    EmptyHistory,
    #[error("Chat completion service failed")]
    ExternalService(#[source] anyhow::Error),
}
