//! Prompt Builder
//!
//! Renders the fixed prompt templates for a room. The wording, grammatical
//! quirks included, must stay exactly as written.

use crate::message::Message;
use crate::room::{Language, Level, RoomConfig};

/// Name the assistant persona introduces itself with.
pub const BOT_NAME: &str = "RolePlayingBot";

/// The two messages that open every room's conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialMessages {
    pub system: Message,
    pub user: Message,
}

impl InitialMessages {
    /// Returns the messages in send order: system first, then user.
    pub fn into_messages(self) -> [Message; 2] {
        [self.system, self.user]
    }
}

/// Level-dependent wording used by the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelWording {
    /// Describes the learner, e.g. "a beginner in English".
    pub phrase: String,
    /// Vocabulary instruction, e.g. "simple".
    pub word: &'static str,
}

impl LevelWording {
    pub fn new(level: Level, language: Language) -> Self {
        let phrase = match level {
            Level::Beginner => format!("a beginner in {language}"),
            Level::Intermediate => format!("a intermediate in {language}"),
            Level::Advanced => format!("a advanced learner in {language}"),
        };
        Self {
            phrase,
            word: vocabulary_word(level),
        }
    }
}

fn vocabulary_word(level: Level) -> &'static str {
    match level {
        Level::Beginner => "simple",
        Level::Intermediate => "intermediate",
        Level::Advanced => "advanced",
    }
}

/// Builds the system and user messages that start a role-play.
pub fn build_initial_messages(room: &RoomConfig) -> InitialMessages {
    let language = room.language;
    let wording = LevelWording::new(room.level, language);

    let system = format!(
        "You are helpful assistant supporting people learning {language}. \
         Your name is {BOT_NAME}. \
         Please assume that the user you are assisting is {phrase}. \
         And please write only the sentence without the character role.",
        phrase = wording.phrase,
    );

    let user = format!(
        "Let's have a conversation in {language}. \
         Please answer in {language} only \
         without providing a translation. \
         And please don't write down the pronunciation either. \
         Let us assume that the situation in '{situation}'. \
         I am {my_role}. The character I want you to act as is {gpt_role}. \
         Please make sure that I'm {phrase}, so please use {word} words \
         as much as possible. Now, start a conversation with the first sentence!",
        situation = room.situation_en,
        my_role = room.my_role_en,
        gpt_role = room.gpt_role_en,
        phrase = wording.phrase,
        word = wording.word,
    );

    InitialMessages {
        system: Message::system(system),
        user: Message::user(user),
    }
}

/// Builds the side question asking the model for an example learner reply.
pub fn build_example_prompt(room: &RoomConfig) -> String {
    format!(
        "Can you please provide me an {word} example \
         of how to respond to the last sentence \
         in this situation, without providing a translation \
         and any introductory phrases or sentences.",
        word = vocabulary_word(room.level),
    )
}
