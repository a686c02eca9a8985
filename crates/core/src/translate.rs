//! Fills in the English room fields that the learner left blank.

use crate::llm_client::ChatClient;
use crate::message::Message;
use crate::room::RoomConfig;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Translates free text into English.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn to_english(&self, text: &str) -> Result<String>;
}

/// A `Translator` that asks a chat completion service for the translation.
pub struct ChatTranslator<'a> {
    client: &'a dyn ChatClient,
}

impl<'a> ChatTranslator<'a> {
    pub fn new(client: &'a dyn ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Translator for ChatTranslator<'_> {
    async fn to_english(&self, text: &str) -> Result<String> {
        let messages = vec![
            Message::system("You are a translator. Reply with the English translation only."),
            Message::user(format!("Translate the following text into English:\n{text}")),
        ];
        let reply = self.client.complete(messages).await?;
        Ok(reply.trim().trim_matches('"').to_string())
    }
}

/// Translates every blank `*_en` field of `room` from its display counterpart.
///
/// Returns how many fields were filled. Fields that already have English text
/// are left untouched.
pub async fn fill_missing_english(
    room: &mut RoomConfig,
    translator: &dyn Translator,
) -> Result<usize> {
    let mut filled = 0;
    let pairs = [
        ("situation", &room.situation, &mut room.situation_en),
        ("my_role", &room.my_role, &mut room.my_role_en),
        ("gpt_role", &room.gpt_role, &mut room.gpt_role_en),
    ];
    for (field, source, target) in pairs {
        if !target.trim().is_empty() || source.trim().is_empty() {
            continue;
        }
        *target = translator.to_english(source).await?;
        info!(field, translated = %target, "Filled missing English field");
        filled += 1;
    }
    Ok(filled)
}
