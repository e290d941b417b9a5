//! Events emitted to the notification sink.

use serde::{Deserialize, Serialize};

use quizarena_core::scoring::RankedPlayer;
use quizarena_core::UserId;

/// Why a room was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The host aborted from the lobby or countdown.
    HostCancelled,
    /// The host left before the battle started.
    HostLeft,
    /// The lobby sat unstarted past the lobby timeout.
    LobbyExpired,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HostCancelled => write!(f, "host cancelled"),
            Self::HostLeft => write!(f, "host left"),
            Self::LobbyExpired => write!(f, "lobby expired"),
        }
    }
}

/// One line of the between-questions scoreboard, in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub score: u32,
}

/// Everything the engine tells the outside world.
///
/// Emitted on every state transition and on every accepted or rejected
/// submission. Internally tagged (`"type"`) so a JSON consumer can
/// switch on one field.
///
/// `QuestionStarted` deliberately withholds the correct option; it is
/// revealed only in `QuestionResults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArenaEvent {
    PlayerJoined {
        user_id: UserId,
        display_name: String,
        player_count: usize,
    },
    PlayerLeft {
        user_id: UserId,
        player_count: usize,
    },
    Countdown {
        /// 3, 2, 1.
        step: u8,
    },
    QuestionStarted {
        index: usize,
        text: String,
        options: [String; 4],
        time_limit_ms: u64,
    },
    AnswerAccepted {
        user_id: UserId,
        points: u32,
    },
    AnswerRejected {
        user_id: UserId,
        reason: String,
    },
    QuestionResults {
        index: usize,
        correct_index: u8,
        explanation: String,
        scoreboard: Vec<ScoreEntry>,
    },
    RoomFinished {
        rankings: Vec<RankedPlayer>,
    },
    RoomCancelled {
        reason: CancelReason,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_internally_tagged() {
        let event = ArenaEvent::Countdown { step: 3 };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Countdown");
        assert_eq!(json["step"], 3);
    }

    #[test]
    fn test_question_started_carries_no_answer() {
        let event = ArenaEvent::QuestionStarted {
            index: 0,
            text: "Largest planet?".into(),
            options: ["Mars".into(), "Jupiter".into(), "Venus".into(), "Saturn".into()],
            time_limit_ms: 15_000,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("correct"));
    }

    #[test]
    fn test_cancel_reason_serializes_snake_case() {
        let event = ArenaEvent::RoomCancelled { reason: CancelReason::LobbyExpired };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["reason"], "lobby_expired");
    }
}
