//! The error taxonomy shared by every Quizarena layer.

use crate::{RoomId, UserId};

/// Everything that can go wrong with an arena operation.
///
/// All variants are recoverable, typed results — nothing here is
/// process-fatal. Callers are expected to branch on the variant:
/// "too late" (`InvalidState`, `AlreadyAnswered`) and "doesn't exist"
/// (`NotFound`) and "retry" (`QuestionGenerationFailed`) each imply a
/// different corrective action upstream.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// No live room matches the given code or id.
    #[error("room not found")]
    NotFound,

    /// The action is not permitted in the room's current state,
    /// including any action on a finished or cancelled room.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    /// The player already submitted an answer for the current question.
    /// Only the first submission counts; later ones are rejected, not
    /// overwritten.
    #[error("{0} already answered question {1}")]
    AlreadyAnswered(UserId, usize),

    /// The room has no free player slot.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already in a live room (this one or another).
    #[error("{0} is already in a live room")]
    AlreadyJoined(UserId),

    /// The player is not a member of the room.
    #[error("{0} is not in room {1}")]
    NotInRoom(UserId, RoomId),

    /// Fewer than two players present at start.
    #[error("at least 2 players are required to start, room has {0}")]
    InsufficientPlayers(usize),

    /// The question source failed or returned the wrong number of
    /// questions. The room stays in the lobby; the host may retry.
    #[error("question generation failed: {0}")]
    QuestionGenerationFailed(String),

    /// Join-code generation collided on every attempt.
    #[error("could not allocate a unique join code")]
    CodeExhausted,

    /// The submitted option index is outside the question's options.
    #[error("option index {0} is out of range")]
    InvalidOption(u8),

    /// The room config failed validation.
    #[error("invalid arena config: {0}")]
    InvalidConfig(String),

    /// The room's command channel is gone (room task stopped).
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
