//! Audio playback through an external player process.

use crate::speech::SpeechSynthesizer;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Plays an audio file, returning once playback has finished.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, path: &Path) -> Result<()>;
}

/// Runs a command-line player and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    /// Builds a player from a command line such as `["mpv", "--no-video"]`.
    /// The audio file path is appended as the last argument.
    pub fn from_command(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().context("Player command is empty")?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The player available by default on this platform.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self {
                program: "afplay".to_string(),
                args: Vec::new(),
            }
        } else {
            Self {
                program: "ffplay".to_string(),
                args: ["-nodisp", "-autoexit", "-loglevel", "quiet"]
                    .map(String::from)
                    .to_vec(),
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<()> {
        debug!(program = %self.program, path = %path.display(), "Starting playback");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .kill_on_drop(true)
            .status()
            .await
            .with_context(|| format!("Failed to start audio player '{}'", self.program))?;
        if !status.success() {
            bail!("Audio player '{}' exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// Speaks text by synthesizing it to a temporary file and playing that file.
pub struct Speaker {
    synthesizer: Box<dyn SpeechSynthesizer>,
    player: Box<dyn AudioPlayer>,
}

impl Speaker {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, player: Box<dyn AudioPlayer>) -> Self {
        Self {
            synthesizer,
            player,
        }
    }

    /// Synthesizes `text` and plays it to completion.
    ///
    /// The temporary audio file is removed when this returns, whether or not
    /// playback succeeded.
    pub async fn say(&self, text: &str, language_code: &str) -> Result<()> {
        let audio = self.synthesizer.synthesize(text, language_code).await?;
        info!(bytes = audio.len(), language_code, "Playing synthesized speech");

        let mut file = tempfile::Builder::new()
            .prefix("roleplay-")
            .suffix(".mp3")
            .tempfile()
            .context("Failed to create temporary audio file")?;
        file.write_all(&audio)?;
        file.flush()?;

        self.player.play(file.path()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::MockSpeechSynthesizer;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn synthesizer_returning(bytes: &'static [u8]) -> MockSpeechSynthesizer {
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .returning(move |_, _| Ok(bytes.to_vec()));
        synthesizer
    }

    #[test]
    fn test_player_from_command() {
        let player =
            CommandPlayer::from_command(&["mpv".to_string(), "--no-video".to_string()]).unwrap();
        assert_eq!(player.program(), "mpv");
        assert_eq!(player.args, vec!["--no-video".to_string()]);

        let empty: Vec<String> = Vec::new();
        assert!(CommandPlayer::from_command(&empty).is_err());
    }

    #[tokio::test]
    async fn test_say_plays_synthesized_audio_and_cleans_up() {
        let seen: Arc<Mutex<Option<(PathBuf, Vec<u8>)>>> = Arc::new(Mutex::new(None));
        let seen_in_player = seen.clone();

        let mut player = MockAudioPlayer::new();
        player.expect_play().times(1).returning(move |path| {
            let contents = std::fs::read(path)?;
            *seen_in_player.lock().unwrap() = Some((path.to_path_buf(), contents));
            Ok(())
        });

        let speaker = Speaker::new(
            Box::new(synthesizer_returning(b"ID3-fake-mp3")),
            Box::new(player),
        );
        speaker.say("Hello", "en").await.unwrap();

        let (path, contents) = seen.lock().unwrap().take().unwrap();
        assert_eq!(contents, b"ID3-fake-mp3");
        assert!(path.to_string_lossy().ends_with(".mp3"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_temp_file_removed_when_playback_fails() {
        let seen: Arc<Mutex<Option<PathBuf>>> = Arc::new(Mutex::new(None));
        let seen_in_player = seen.clone();

        let mut player = MockAudioPlayer::new();
        player.expect_play().returning(move |path| {
            *seen_in_player.lock().unwrap() = Some(path.to_path_buf());
            Err(anyhow::anyhow!("no audio device"))
        });

        let speaker = Speaker::new(Box::new(synthesizer_returning(b"mp3")), Box::new(player));
        let err = speaker.say("Hello", "en").await.unwrap_err();

        assert_eq!(err.to_string(), "no audio device");
        let path = seen.lock().unwrap().take().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_synthesis_failure_skips_playback() {
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .returning(|_, _| Err(anyhow::anyhow!("429 Too Many Requests")));
        let mut player = MockAudioPlayer::new();
        player.expect_play().never();

        let speaker = Speaker::new(Box::new(synthesizer), Box::new(player));
        assert!(speaker.say("Hello", "en").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_player_waits_for_exit_status() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let ok = CommandPlayer::from_command(&["true".to_string()]).unwrap();
        assert!(ok.play(file.path()).await.is_ok());

        let failing = CommandPlayer::from_command(&["false".to_string()]).unwrap();
        assert!(failing.play(file.path()).await.is_err());
    }
}
