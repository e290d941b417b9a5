//! Question records, as delivered by the question source.

use serde::{Deserialize, Serialize};

/// Number of answer options on every question.
pub const OPTION_COUNT: usize = 4;

/// One multiple-choice question.
///
/// Immutable once the room leaves `Waiting` — the question list is
/// populated exactly once, before the first question goes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text.
    pub text: String,
    /// The four answer options, in display order.
    pub options: [String; OPTION_COUNT],
    /// Index into `options` of the correct answer.
    pub correct_index: u8,
    /// Shown alongside the correct answer during the reveal.
    pub explanation: String,
}

impl Question {
    /// Returns `true` if `option_index` names the correct option.
    pub fn is_correct(&self, option_index: u8) -> bool {
        option_index == self.correct_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question {
            text: "Which planet is largest?".into(),
            options: [
                "Mars".into(),
                "Jupiter".into(),
                "Venus".into(),
                "Saturn".into(),
            ],
            correct_index: 1,
            explanation: "Jupiter is more massive than all others combined.".into(),
        }
    }

    #[test]
    fn test_is_correct() {
        let q = sample();
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
        assert!(!q.is_correct(3));
    }

    #[test]
    fn test_question_round_trip() {
        let q = sample();
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(q, back);
    }
}
