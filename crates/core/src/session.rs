//! Conversation Session
//!
//! An owned, append-only message log for one room. Each turn replays the whole
//! log to the chat completion service; taking `&mut self` keeps a session to a
//! single outstanding request.

use crate::error::SessionError;
use crate::llm_client::ChatClient;
use crate::message::Message;
use crate::prompt::{build_example_prompt, build_initial_messages};
use crate::room::RoomConfig;
use tracing::{debug, info, warn};

/// Whether an assistant reply becomes part of the conversation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    /// Append the reply to the history.
    Yes,
    /// Return the reply without keeping it, for one-off side questions.
    No,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    messages: Vec<Message>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that starts from an existing history.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Creates a session for `room`, seeded with the room's system message.
    pub fn for_room(room: &RoomConfig) -> Self {
        let initial = build_initial_messages(room);
        Self {
            messages: vec![initial.system],
        }
    }

    /// Sends the room's opening instruction and returns the assistant's first line.
    ///
    /// An empty session is seeded with the room's system message first, so the
    /// opening prompt is never sent without it.
    pub async fn open(
        &mut self,
        client: &dyn ChatClient,
        room: &RoomConfig,
    ) -> Result<String, SessionError> {
        let initial = build_initial_messages(room);
        if self.messages.is_empty() {
            self.messages.push(initial.system);
        }
        info!(language = %room.language, level = %room.level, "Opening role-play");
        self.send_turn(client, &initial.user.content, Persist::Yes)
            .await
    }

    /// Appends a user turn, asks the service for a reply and returns it.
    ///
    /// The user turn stays in the history when the service fails, so the caller
    /// can inspect or retry it.
    pub async fn send_turn(
        &mut self,
        client: &dyn ChatClient,
        user_text: &str,
        persist: Persist,
    ) -> Result<String, SessionError> {
        self.messages.push(Message::user(user_text));
        debug!(turns = self.messages.len(), ?persist, "Sending turn");

        let reply = client
            .complete(self.messages.clone())
            .await
            .map_err(|e| {
                warn!(error = ?e, "Chat completion failed");
                SessionError::ExternalService(e)
            })?;

        if persist == Persist::Yes {
            self.messages.push(Message::assistant(reply.clone()));
        }
        Ok(reply)
    }

    /// Asks for an example learner reply without recording the answer.
    pub async fn request_example(
        &mut self,
        client: &dyn ChatClient,
        room: &RoomConfig,
    ) -> Result<String, SessionError> {
        let prompt = build_example_prompt(room);
        self.send_turn(client, &prompt, Persist::No).await
    }

    /// Content of the most recently appended message, whatever its role.
    pub fn last_message(&self) -> Result<&str, SessionError> {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .ok_or(SessionError::EmptyHistory)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MockChatClient;
    use crate::message::MessageRole;
    use crate::room::{Language, Level};
    use anyhow::anyhow;

    fn room() -> RoomConfig {
        RoomConfig {
            language: Language::English,
            level: Level::Beginner,
            situation: "ordering coffee".to_string(),
            situation_en: "ordering coffee".to_string(),
            my_role: "a customer".to_string(),
            my_role_en: "a customer".to_string(),
            gpt_role: "a barista".to_string(),
            gpt_role_en: "a barista".to_string(),
        }
    }

    #[tokio::test]
    async fn test_persisted_turn_adds_two_messages() {
        let mut client = MockChatClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(|_| Ok("Hi! What can I get you?".to_string()));

        let mut session = ConversationSession::new();
        let reply = session
            .send_turn(&client, "Hello", Persist::Yes)
            .await
            .unwrap();

        assert_eq!(reply, "Hi! What can I get you?");
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[0], Message::user("Hello"));
        assert_eq!(
            session.messages()[1],
            Message::assistant("Hi! What can I get you?")
        );
    }

    #[tokio::test]
    async fn test_unpersisted_turn_keeps_only_user_message() {
        let mut client = MockChatClient::new();
        client
            .expect_complete()
            .returning(|_| Ok("A latte, please.".to_string()));

        let mut session = ConversationSession::with_messages(vec![Message::system("sys")]);
        let reply = session
            .send_turn(&client, "Give me an example", Persist::No)
            .await
            .unwrap();

        assert_eq!(reply, "A latte, please.");
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[1].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_full_history_is_replayed() {
        let mut client = MockChatClient::new();
        let mut seq = mockall::Sequence::new();
        client
            .expect_complete()
            .withf(|messages| messages.len() == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("first reply".to_string()));
        client
            .expect_complete()
            .withf(|messages| {
                messages.len() == 4
                    && messages[0].role == MessageRole::System
                    && messages[2].content == "first reply"
                    && messages[3].content == "second"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("second reply".to_string()));

        let mut session = ConversationSession::with_messages(vec![Message::system("sys")]);
        session.send_turn(&client, "first", Persist::Yes).await.unwrap();
        session.send_turn(&client, "second", Persist::Yes).await.unwrap();

        assert_eq!(session.len(), 5);
        assert_eq!(session.last_message().unwrap(), "second reply");
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_user_message() {
        let mut client = MockChatClient::new();
        client
            .expect_complete()
            .returning(|_| Err(anyhow!("401 Unauthorized")));

        let mut session = ConversationSession::new();
        let err = session
            .send_turn(&client, "Hello", Persist::Yes)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::ExternalService(_)));
        assert_eq!(session.messages(), &[Message::user("Hello")]);
    }

    #[test]
    fn test_last_message_on_empty_session() {
        let session = ConversationSession::new();
        assert!(matches!(
            session.last_message(),
            Err(SessionError::EmptyHistory)
        ));
    }

    #[tokio::test]
    async fn test_last_message_after_turn() {
        let mut client = MockChatClient::new();
        client
            .expect_complete()
            .returning(|_| Ok("Sure, coming right up.".to_string()));

        let mut session = ConversationSession::new();
        session.send_turn(&client, "A coffee", Persist::Yes).await.unwrap();
        assert_eq!(session.last_message().unwrap(), "Sure, coming right up.");
    }

    #[tokio::test]
    async fn test_open_sends_initial_prompts() {
        let room = room();
        let mut client = MockChatClient::new();
        client
            .expect_complete()
            .withf(|messages| {
                messages.len() == 2
                    && messages[0].role == MessageRole::System
                    && messages[0].content.contains("RolePlayingBot")
                    && messages[1].role == MessageRole::User
                    && messages[1].content.contains("a barista")
            })
            .times(1)
            .returning(|_| Ok("Welcome to the cafe!".to_string()));

        let mut session = ConversationSession::for_room(&room);
        let opening = session.open(&client, &room).await.unwrap();

        assert_eq!(opening, "Welcome to the cafe!");
        assert_eq!(session.len(), 3);
    }

    #[tokio::test]
    async fn test_open_on_empty_session_seeds_system_message() {
        let room = room();
        let mut client = MockChatClient::new();
        client
            .expect_complete()
            .withf(|messages| {
                messages.len() == 2
                    && messages[0].role == MessageRole::System
                    && messages[0].content.contains("a beginner in English")
                    && messages[1].role == MessageRole::User
            })
            .times(1)
            .returning(|_| Ok("Hello there!".to_string()));

        let mut session = ConversationSession::new();
        session.open(&client, &room).await.unwrap();

        assert_eq!(session.len(), 3);
        assert_eq!(session.messages()[0].role, MessageRole::System);
    }

    #[tokio::test]
    async fn test_request_example_is_not_persisted() {
        let room = room();
        let mut client = MockChatClient::new();
        client
            .expect_complete()
            .withf(|messages| {
                messages.last().is_some_and(|m| {
                    m.content
                        .starts_with("Can you please provide me an simple example")
                })
            })
            .returning(|_| Ok("One cappuccino, please.".to_string()));

        let mut session = ConversationSession::for_room(&room);
        let example = session.request_example(&client, &room).await.unwrap();

        assert_eq!(example, "One cappuccino, please.");
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[1].role, MessageRole::User);
    }
}
