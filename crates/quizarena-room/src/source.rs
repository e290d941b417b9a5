//! The question-source collaborator.
//!
//! Quizarena never generates questions itself — an AI pipeline, a
//! content database, whatever the host application has. The engine only
//! needs this trait: give me `count` ready-made questions for a topic.

use quizarena_core::{Difficulty, Question};

/// A failure from the question source.
///
/// Surfaced to the host as `QuestionGenerationFailed`; the room stays
/// in the lobby and the host may retry.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct QuestionSourceError(pub String);

/// Produces the ordered question list for a battle.
///
/// Called exactly once per room, during the `waiting → countdown`
/// transition. Returning an error, or the wrong number of questions,
/// fails the start and leaves the room in the lobby.
pub trait QuestionSource: Send + Sync + 'static {
    fn generate(
        &self,
        topic: &str,
        count: usize,
        difficulty: Difficulty,
    ) -> impl std::future::Future<Output = Result<Vec<Question>, QuestionSourceError>> + Send;
}
