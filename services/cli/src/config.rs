use roleplay_core::llm_client::DEFAULT_CHAT_MODEL;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported text-to-speech backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechProvider {
    Google,
    OpenAI,
}

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub chat_model: String,
    pub speech_provider: SpeechProvider,
    /// Player command line; `None` picks the platform default.
    pub audio_player: Option<Vec<String>>,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        let openai_api_base =
            std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());

        let provider_str = std::env::var("TTS_PROVIDER").unwrap_or_else(|_| "google".to_string());
        let speech_provider = match provider_str.to_lowercase().as_str() {
            "google" => SpeechProvider::Google,
            "openai" => SpeechProvider::OpenAI,
            _ => {
                return Err(ConfigError::InvalidValue(
                    "TTS_PROVIDER".to_string(),
                    format!("'{}' is not one of 'google' or 'openai'", provider_str),
                ));
            }
        };

        let audio_player = match std::env::var("AUDIO_PLAYER") {
            Ok(command) => {
                let parts: Vec<String> = command.split_whitespace().map(String::from).collect();
                if parts.is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "AUDIO_PLAYER".to_string(),
                        "player command is empty".to_string(),
                    ));
                }
                Some(parts)
            }
            Err(_) => None,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            openai_api_key,
            openai_api_base,
            chat_model,
            speech_provider,
            audio_player,
            log_level,
        })
    }
}
