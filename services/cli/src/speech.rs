//! Text-to-speech backends.
//!
//! Every synthesizer returns MP3 bytes that the playback side can hand to an
//! audio player as-is.

use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice},
};
use async_trait::async_trait;
use tracing::debug;

/// Longest text the Google endpoint accepts per request.
pub const GOOGLE_MAX_CHARS: usize = 100;

const GOOGLE_TTS_BASE_URL: &str = "https://translate.google.com";

/// Turns text into playable audio.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizes `text` spoken in `language_code` (e.g. "en", "zh-CN").
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>>;
}

/// Speech through Google Translate's TTS endpoint.
pub struct GoogleTranslateTts {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateTts {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: GOOGLE_TTS_BASE_URL.to_string(),
        })
    }

    /// Points the synthesizer at another host serving `/translate_tts`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>> {
        let chunks = split_for_speech(text, GOOGLE_MAX_CHARS);
        debug!(chunks = chunks.len(), language_code, "Synthesizing speech");

        // MP3 frames can be concatenated into one playable stream.
        let url = format!("{}/translate_tts", self.base_url.trim_end_matches('/'));
        let mut audio = Vec::new();
        for chunk in &chunks {
            let bytes = self
                .http
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language_code),
                    ("q", chunk.as_str()),
                ])
                .send()
                .await?
                .error_for_status()
                .context("Speech service rejected the request")?
                .bytes()
                .await?;
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }
}

/// Speech through the OpenAI audio API. The spoken language is inferred from the text.
pub struct OpenAISpeech {
    client: Client<OpenAIConfig>,
}

impl OpenAISpeech {
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::with_config(config),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAISpeech {
    async fn synthesize(&self, text: &str, _language_code: &str) -> Result<Vec<u8>> {
        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .model(SpeechModel::Tts1)
            .voice(Voice::Alloy)
            .response_format(SpeechResponseFormat::Mp3)
            .build()?;
        let response = self.client.audio().speech(request).await?;
        Ok(response.bytes.to_vec())
    }
}

/// Splits `text` into pieces of at most `max_chars` characters.
///
/// Words are kept whole where possible. A word longer than the limit, which is
/// common in languages written without spaces, is cut after its last
/// punctuation mark inside the limit, or at the limit itself.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        for piece in split_long_word(word, max_chars) {
            let piece_len = piece.chars().count();
            if current_len > 0 && current_len + 1 + piece_len > max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(piece);
            current_len += piece_len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = word;
    while let Some((limit, _)) = rest.char_indices().nth(max_chars) {
        let head = &rest[..limit];
        let cut = head
            .char_indices()
            .filter(|(_, c)| is_break(*c))
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(limit);
        pieces.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

fn is_break(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | '!' | '?' | ';' | ':' | '。' | '、' | '，' | '！' | '？' | '；' | '：'
    )
}
