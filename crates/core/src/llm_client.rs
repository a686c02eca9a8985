use crate::message::{Message, MessageRole};
use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// Model used when none is configured.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// A chat completion service that answers a full conversation with one reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the whole ordered message sequence and returns the assistant's reply.
    async fn complete(&self, messages: Vec<Message>) -> Result<String>;
}

/// An implementation of `ChatClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier used for every completion (e.g., "gpt-3.5-turbo").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.clone();
    Ok(match message.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    })
}

#[async_trait]
impl ChatClient for OpenAICompatibleClient {
    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .build()?;

        debug!(model = %self.model, messages = messages.len(), "Requesting chat completion");
        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .clone()
            .context("No content in LLM response")?;
        Ok(content)
    }
}
