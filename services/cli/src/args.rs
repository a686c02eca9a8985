use anyhow::{Context, Result};
use clap::Parser;
use roleplay_core::{Language, Level, RoomConfig};
use std::path::PathBuf;

/// Practise a language by role-playing a situation with a chat model.
#[derive(Debug, Parser)]
#[command(name = "roleplay", version, about)]
pub struct Args {
    /// Load the room from a TOML file instead of the flags below.
    #[arg(long, conflicts_with_all = ["language", "level", "situation", "my_role", "gpt_role"])]
    pub room: Option<PathBuf>,

    /// Conversation language, as a name ("Japanese") or code ("ja-JP").
    #[arg(long, default_value = "en-US")]
    pub language: Language,

    /// Learner level: beginner, intermediate, advanced (or 1-3).
    #[arg(long, default_value = "beginner")]
    pub level: Level,

    #[arg(long, required_unless_present = "room")]
    pub situation: Option<String>,

    /// English text of the situation; translated from --situation when omitted.
    #[arg(long)]
    pub situation_en: Option<String>,

    #[arg(long, required_unless_present = "room")]
    pub my_role: Option<String>,

    #[arg(long)]
    pub my_role_en: Option<String>,

    #[arg(long, required_unless_present = "room")]
    pub gpt_role: Option<String>,

    #[arg(long)]
    pub gpt_role_en: Option<String>,

    /// Print replies without speaking them.
    #[arg(long)]
    pub no_speech: bool,

    /// Do not translate blank English fields.
    #[arg(long)]
    pub no_translate: bool,
}

impl Args {
    /// Builds the room from `--room` or the individual flags, and validates it.
    pub fn room_config(&self) -> Result<RoomConfig> {
        let room = match &self.room {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read room file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Invalid room file {}", path.display()))?
            }
            None => RoomConfig {
                language: self.language,
                level: self.level,
                situation: self.situation.clone().unwrap_or_default(),
                situation_en: self.situation_en.clone().unwrap_or_default(),
                my_role: self.my_role.clone().unwrap_or_default(),
                my_role_en: self.my_role_en.clone().unwrap_or_default(),
                gpt_role: self.gpt_role.clone().unwrap_or_default(),
                gpt_role_en: self.gpt_role_en.clone().unwrap_or_default(),
            },
        };
        room.validate()?;
        Ok(room)
    }
}
