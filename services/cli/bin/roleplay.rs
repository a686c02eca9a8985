//! Main Entrypoint for the Role-Play Tutor
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and the room from arguments.
//! 2. Initializing logging.
//! 3. Building the chat, speech and playback clients.
//! 4. Filling in missing English room fields.
//! 5. Running the interactive loop on stdin/stdout.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use clap::Parser;
use roleplay_cli::{
    args::Args,
    config::{Config, SpeechProvider},
    playback::{AudioPlayer, CommandPlayer, Speaker},
    repl::Repl,
    speech::{GoogleTranslateTts, OpenAISpeech, SpeechSynthesizer},
};
use roleplay_core::{
    ConversationSession,
    llm_client::OpenAICompatibleClient,
    translate::{ChatTranslator, fill_missing_english},
};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let mut room = args.room_config()?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
    info!("Configuration loaded. Initializing clients...");

    // --- 3. Initialize Clients ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(&config.openai_api_key)
        .with_api_base(&config.openai_api_base);
    let chat_client =
        OpenAICompatibleClient::new(openai_config.clone(), config.chat_model.clone());

    let speaker = if args.no_speech {
        None
    } else {
        let synthesizer: Box<dyn SpeechSynthesizer> = match config.speech_provider {
            SpeechProvider::Google => Box::new(GoogleTranslateTts::new()?),
            SpeechProvider::OpenAI => Box::new(OpenAISpeech::new(openai_config)),
        };
        let player: Box<dyn AudioPlayer> = match &config.audio_player {
            Some(command) => Box::new(CommandPlayer::from_command(command)?),
            None => Box::new(CommandPlayer::platform_default()),
        };
        Some(Speaker::new(synthesizer, player))
    };

    // --- 4. Complete the Room ---
    if !args.no_translate {
        let translator = ChatTranslator::new(&chat_client);
        let filled = fill_missing_english(&mut room, &translator)
            .await
            .context("Failed to translate room fields")?;
        if filled > 0 {
            info!(filled, "Translated blank English room fields");
        }
    }

    // --- 5. Run the Conversation ---
    info!(
        provider = ?config.speech_provider,
        model = %config.chat_model,
        language = %room.language,
        level = %room.level,
        "Starting role-play"
    );
    let mut session = ConversationSession::for_room(&room);
    let repl = Repl::new(&room, &chat_client, speaker.as_ref());
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    repl.run(&mut session, stdin, &mut stdout).await?;

    info!("Goodbye.");
    Ok(())
}
