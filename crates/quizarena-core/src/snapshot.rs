//! The serializable per-room document.
//!
//! One `RoomSnapshot` per room is the persisted shape: keyed by
//! `room_id`, carrying the join code (unique among live rooms), full
//! config, roster, and question set. The engine emits snapshots on
//! demand; what stores them is up to the host application.

use serde::{Deserialize, Serialize};

use crate::{ArenaConfig, JoinCode, PlayerRecord, Question, RoomId, RoomStatus, UserId};

/// The player portion of the room document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub user_id: UserId,
    pub display_name: String,
    pub score: u32,
    pub correct_count: u32,
    pub response_times_ms: Vec<u64>,
    pub joined_at_ms: u64,
    pub connected: bool,
}

impl From<&PlayerRecord> for PlayerSnapshot {
    fn from(p: &PlayerRecord) -> Self {
        Self {
            user_id: p.user_id,
            display_name: p.display_name.clone(),
            score: p.score,
            correct_count: p.correct_count,
            response_times_ms: p.response_times_ms(),
            joined_at_ms: p.joined_at_ms,
            connected: p.connected,
        }
    }
}

/// A point-in-time view of one arena room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub join_code: JoinCode,
    pub host_id: UserId,
    pub config: ArenaConfig,
    pub status: RoomStatus,

    /// Meaningful only while `status` is `question` or `results`.
    pub current_question_index: Option<usize>,

    /// Populated exactly once, at the `waiting → countdown` transition.
    pub questions: Vec<Question>,

    pub players: Vec<PlayerSnapshot>,

    pub created_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub ended_at_ms: Option<u64>,
}

impl RoomSnapshot {
    /// Looks up a player's snapshot by id.
    pub fn player(&self, user_id: UserId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.user_id == user_id)
    }
}
