//! Role-Playing Room Model
//!
//! A room describes one role-play scenario: the language being practised, the
//! learner's level, the situation, and the two personas. The `*_en` fields are
//! the canonical English texts that go into prompts verbatim.

use crate::error::RoomError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A conversation language offered by the tutor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Language {
    #[default]
    English,
    Japanese,
    Chinese,
    Spanish,
    French,
    German,
    Russian,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Japanese,
        Language::Chinese,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Russian,
    ];

    /// Locale code used as the stored form of the language.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Japanese => "ja-JP",
            Language::Chinese => "zh-CN",
            Language::Spanish => "es-ES",
            Language::French => "fr-FR",
            Language::German => "de-DE",
            Language::Russian => "ru-RU",
        }
    }

    /// Human readable name, as it appears inside prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Russian => "Russian",
        }
    }

    /// Language code understood by the speech synthesizers.
    pub fn speech_code(self) -> &'static str {
        match self {
            Language::Chinese => "zh-CN",
            other => other.primary_subtag(),
        }
    }

    fn primary_subtag(self) -> &'static str {
        let code = self.code();
        code.split('-').next().unwrap_or(code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| {
                wanted.eq_ignore_ascii_case(lang.code())
                    || wanted.eq_ignore_ascii_case(lang.primary_subtag())
                    || wanted.eq_ignore_ascii_case(lang.display_name())
            })
            .ok_or_else(|| RoomError::UnknownLanguage(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = RoomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for &'static str {
    fn from(lang: Language) -> Self {
        lang.code()
    }
}

/// Learner proficiency. Ordered from `Beginner` to `Advanced`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "LevelRepr")]
pub enum Level {
    #[default]
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
}

// Room files may spell the level as its number or its name.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(i64),
    Name(String),
}

impl TryFrom<LevelRepr> for Level {
    type Error = RoomError;

    fn try_from(repr: LevelRepr) -> Result<Self, Self::Error> {
        match repr {
            LevelRepr::Number(n) => u8::try_from(n)
                .map_err(|_| RoomError::InvalidLevel(n.to_string()))
                .and_then(Level::try_from),
            LevelRepr::Name(name) => name.parse(),
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = RoomError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Level::Beginner),
            2 => Ok(Level::Intermediate),
            3 => Ok(Level::Advanced),
            other => Err(RoomError::InvalidLevel(other.to_string())),
        }
    }
}

impl FromStr for Level {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Level::try_from(n);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(RoomError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "Beginner"),
            Level::Intermediate => write!(f, "Intermediate"),
            Level::Advanced => write!(f, "Advanced"),
        }
    }
}

/// Configuration of a single role-play scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub level: Level,
    /// The situation as the learner wrote it.
    pub situation: String,
    /// English text of the situation, used in prompts.
    #[serde(default)]
    pub situation_en: String,
    pub my_role: String,
    #[serde(default)]
    pub my_role_en: String,
    pub gpt_role: String,
    #[serde(default)]
    pub gpt_role_en: String,
}

impl RoomConfig {
    /// Checks that every display field the learner must provide is present.
    pub fn validate(&self) -> Result<(), RoomError> {
        let required = [
            ("situation", &self.situation),
            ("my_role", &self.my_role),
            ("gpt_role", &self.gpt_role),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(RoomError::MissingField(name));
            }
        }
        Ok(())
    }
}
