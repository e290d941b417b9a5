//! The room lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle state of an arena room.
///
/// ```text
/// Waiting → Countdown → Question ⇄ Results → Finished
///    │          │
///    └──────────┴────────→ Cancelled
/// ```
///
/// - **Waiting**: the lobby. Players join by code; the host can start
///   or cancel. A lobby that sits here too long expires to Cancelled.
/// - **Countdown**: the pre-battle 3-2-1. Host can still abort.
/// - **Question**: a question is live; submissions are accepted.
/// - **Results**: reveal pause between questions. `Question` and
///   `Results` alternate per question index.
/// - **Finished** / **Cancelled**: terminal. Every further action is
///   rejected with `InvalidState` — never a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Countdown,
    Question,
    Results,
    Finished,
    Cancelled,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if no further transition can ever occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Returns `true` if the host may still abort the room.
    ///
    /// Once the first question is live the room must run to completion
    /// or timeout; mid-battle cancellation is deliberately unsupported.
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Waiting | Self::Countdown)
    }

    /// Returns `true` if `target` is a legal next state.
    ///
    /// `Question ⇄ Results` is the only cycle; everything else is
    /// monotonic.
    pub fn can_transition_to(self, target: Self) -> bool {
        use RoomStatus::*;
        matches!(
            (self, target),
            (Waiting, Countdown)
                | (Countdown, Question)
                | (Question, Results)
                | (Results, Question)
                | (Results, Finished)
                | (Waiting, Cancelled)
                | (Countdown, Cancelled)
        )
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Countdown => write!(f, "countdown"),
            Self::Question => write!(f, "question"),
            Self::Results => write!(f, "results"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RoomStatus::*;

    const ALL: [RoomStatus; 6] =
        [Waiting, Countdown, Question, Results, Finished, Cancelled];

    #[test]
    fn test_legal_edges() {
        assert!(Waiting.can_transition_to(Countdown));
        assert!(Countdown.can_transition_to(Question));
        assert!(Question.can_transition_to(Results));
        assert!(Results.can_transition_to(Question));
        assert!(Results.can_transition_to(Finished));
        assert!(Waiting.can_transition_to(Cancelled));
        assert!(Countdown.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for target in ALL {
            assert!(!Finished.can_transition_to(target));
            assert!(!Cancelled.can_transition_to(target));
        }
    }

    #[test]
    fn test_no_mid_battle_cancellation() {
        assert!(!Question.can_transition_to(Cancelled));
        assert!(!Results.can_transition_to(Cancelled));
        assert!(!Question.can_cancel());
        assert!(!Results.can_cancel());
        assert!(Waiting.can_cancel());
        assert!(Countdown.can_cancel());
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!Waiting.can_transition_to(Question));
        assert!(!Waiting.can_transition_to(Finished));
        assert!(!Countdown.can_transition_to(Results));
        assert!(!Question.can_transition_to(Finished));
        assert!(!Question.can_transition_to(Question));
    }

    #[test]
    fn test_only_waiting_is_joinable() {
        for status in ALL {
            assert_eq!(status.is_joinable(), status == Waiting);
        }
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Waiting).unwrap(), "\"waiting\"");
        assert_eq!(serde_json::to_string(&Question).unwrap(), "\"question\"");
    }
}
