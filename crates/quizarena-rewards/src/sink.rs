//! The external reward collaborator.
//!
//! XP, levels, streaks, and prestige math all live in the host
//! application. The engine only knows this trait: award some XP, record
//! one arena result. Implement it against your progression service; use
//! an in-memory recorder in tests.

use quizarena_core::UserId;

/// A failure reported by the host application's reward services.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct RewardError(pub String);

/// One player's final line in the battle, as recorded externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaResult {
    pub rank: u32,
    pub score: u32,
    pub correct_count: u32,
    pub total_questions: usize,
}

/// Receives reward calls when a battle finishes.
///
/// Both methods are called exactly once per player per battle. Errors
/// are collected by the dispatcher, never retried and never fatal.
///
/// `Send + Sync + 'static` because the sink is shared with room tasks.
pub trait RewardSink: Send + Sync + 'static {
    /// Credits `amount` XP to the player. `reason` is an opaque tag
    /// (e.g. `"arena_rank_1"`) for the host's bookkeeping.
    fn award_xp(
        &self,
        user_id: UserId,
        amount: u32,
        reason: &str,
    ) -> impl std::future::Future<Output = Result<(), RewardError>> + Send;

    /// Records one finished battle in the player's stats.
    fn record_arena_result(
        &self,
        user_id: UserId,
        result: ArenaResult,
    ) -> impl std::future::Future<Output = Result<(), RewardError>> + Send;
}
