//! Per-room battle configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ArenaError;

/// Question difficulty requested from the question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Settings for one arena room, chosen by the host at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Topic handed to the question source verbatim.
    pub topic: String,

    /// Difficulty handed to the question source.
    pub difficulty: Difficulty,

    /// Number of questions in the battle. Must be within
    /// [`Self::MIN_QUESTIONS`]..=[`Self::MAX_QUESTIONS`].
    pub question_count: usize,

    /// How long players get to answer each question.
    pub time_per_question: Duration,

    /// Maximum players allowed in the room (host included).
    pub max_players: usize,
}

impl ArenaConfig {
    /// Smallest allowed battle.
    pub const MIN_QUESTIONS: usize = 5;
    /// Largest allowed battle.
    pub const MAX_QUESTIONS: usize = 15;

    /// Creates a config with default timing and capacity for a topic.
    pub fn new(topic: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            question_count: 10,
            time_per_question: Duration::from_secs(15),
            max_players: 10,
        }
    }

    /// Validates the config, returning it unchanged on success.
    ///
    /// Rules:
    /// - `question_count` within 5..=15
    /// - `time_per_question` non-zero
    /// - `max_players` at least 2 (a battle needs an opponent)
    pub fn validated(self) -> Result<Self, ArenaError> {
        if self.question_count < Self::MIN_QUESTIONS
            || self.question_count > Self::MAX_QUESTIONS
        {
            return Err(ArenaError::InvalidConfig(format!(
                "question_count must be {}..={}, got {}",
                Self::MIN_QUESTIONS,
                Self::MAX_QUESTIONS,
                self.question_count
            )));
        }
        if self.time_per_question.is_zero() {
            return Err(ArenaError::InvalidConfig(
                "time_per_question must be non-zero".into(),
            ));
        }
        if self.max_players < 2 {
            return Err(ArenaError::InvalidConfig(format!(
                "max_players must be at least 2, got {}",
                self.max_players
            )));
        }
        Ok(self)
    }

    /// The per-question time limit in milliseconds, as used by scoring.
    pub fn time_limit_ms(&self) -> u64 {
        self.time_per_question.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let cfg = ArenaConfig::new("space", Difficulty::Medium);
        assert_eq!(cfg.question_count, 10);
        assert_eq!(cfg.time_per_question, Duration::from_secs(15));
        assert_eq!(cfg.max_players, 10);
    }

    #[test]
    fn test_validated_accepts_defaults() {
        assert!(ArenaConfig::new("space", Difficulty::Easy).validated().is_ok());
    }

    #[test]
    fn test_validated_rejects_question_count_out_of_range() {
        let mut cfg = ArenaConfig::new("space", Difficulty::Easy);
        cfg.question_count = 4;
        assert!(cfg.clone().validated().is_err());
        cfg.question_count = 16;
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn test_validated_rejects_zero_timer_and_tiny_rooms() {
        let mut cfg = ArenaConfig::new("space", Difficulty::Easy);
        cfg.time_per_question = Duration::ZERO;
        assert!(cfg.clone().validated().is_err());
        cfg.time_per_question = Duration::from_secs(15);
        cfg.max_players = 1;
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn test_difficulty_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
    }
}
