//! Per-player records owned by a room.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::UserId;

/// One recorded answer.
///
/// Elapsed time is kept even for incorrect answers — it feeds the
/// ranking tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The option the player picked.
    pub option_index: u8,
    /// Whether it matched the question's correct option.
    pub correct: bool,
    /// Points awarded for this answer (0 when incorrect).
    pub points: u32,
    /// Milliseconds between question start and submission.
    pub elapsed_ms: u64,
}

/// A player's state within one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub user_id: UserId,
    pub display_name: String,

    /// Accumulated score across all answered questions.
    pub score: u32,

    /// Answers keyed by question index. Sparse: a player who never
    /// answered question `i` simply has no entry for `i`, and a given
    /// index appears at most once.
    pub answers: BTreeMap<usize, Answer>,

    /// Count of correct answers.
    pub correct_count: u32,

    /// Epoch milliseconds when the player joined the room.
    pub joined_at_ms: u64,

    /// `false` once the player has left mid-battle. The record (score,
    /// answers) survives departure; only the all-answered fast path and
    /// notifications stop considering them.
    pub connected: bool,
}

impl PlayerRecord {
    pub fn new(user_id: UserId, display_name: String, joined_at_ms: u64) -> Self {
        Self {
            user_id,
            display_name,
            score: 0,
            answers: BTreeMap::new(),
            correct_count: 0,
            joined_at_ms,
            connected: true,
        }
    }

    /// Returns `true` if the player has an answer recorded for `index`.
    pub fn has_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    /// Records an answer for `index` and updates the running totals.
    ///
    /// The caller must have checked [`Self::has_answered`] first; a
    /// duplicate index here is a logic error upstream.
    pub fn record_answer(&mut self, index: usize, answer: Answer) {
        debug_assert!(!self.has_answered(index), "duplicate answer for index {index}");
        self.score += answer.points;
        if answer.correct {
            self.correct_count += 1;
        }
        self.answers.insert(index, answer);
    }

    /// Response times in question order, for the document shape.
    pub fn response_times_ms(&self) -> Vec<u64> {
        self.answers.values().map(|a| a.elapsed_ms).collect()
    }

    /// Summed response time across all answers, the ranking tiebreak.
    pub fn total_response_time_ms(&self) -> u64 {
        self.answers.values().map(|a| a.elapsed_ms).sum()
    }
}
