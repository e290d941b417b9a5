//! Rank-based reward dispatch.
//!
//! When a battle finishes, the final standings are converted into XP
//! awards and per-player stat records through the [`RewardSink`] trait.
//! The fan-out is best-effort: one player's failing sink call is logged
//! and collected, never rolled back, and never blocks the others.

mod sink;
mod table;

pub use sink::{ArenaResult, RewardError, RewardSink};
pub use table::{PARTICIPATION_XP, xp_for_rank};

use quizarena_core::scoring::RankedPlayer;
use quizarena_core::UserId;

/// The per-player result of a reward fan-out.
///
/// A tagged result rather than a swallowed error, so callers can
/// inspect partial failures after the fact.
#[derive(Debug)]
pub struct RewardOutcome {
    pub user_id: UserId,
    pub rank: u32,
    pub xp: u32,
    pub result: Result<(), RewardError>,
}

impl RewardOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fans the final standings out to the reward sink.
///
/// For each ranked player, calls `award_xp` and `record_arena_result`
/// exactly once each. Both calls are attempted even if the first fails;
/// the outcome carries the first error encountered for that player.
pub async fn dispatch_rewards<R: RewardSink>(
    sink: &R,
    rankings: &[RankedPlayer],
    total_questions: usize,
) -> Vec<RewardOutcome> {
    let mut outcomes = Vec::with_capacity(rankings.len());

    for entry in rankings {
        let xp = xp_for_rank(entry.rank);
        let reason = format!("arena_rank_{}", entry.rank);

        let awarded = sink.award_xp(entry.user_id, xp, &reason).await;
        let recorded = sink
            .record_arena_result(
                entry.user_id,
                ArenaResult {
                    rank: entry.rank,
                    score: entry.score,
                    correct_count: entry.correct_count,
                    total_questions,
                },
            )
            .await;

        let result = match (awarded, recorded) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(
                    user_id = %entry.user_id,
                    rank = entry.rank,
                    error = %e,
                    "reward dispatch failed for player"
                );
                Err(e)
            }
        };

        outcomes.push(RewardOutcome {
            user_id: entry.user_id,
            rank: entry.rank,
            xp,
            result,
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records calls; fails every call for the configured user.
    struct FlakySink {
        fail_for: Option<UserId>,
        calls: Mutex<Vec<(UserId, u32)>>,
        results: Mutex<Vec<(UserId, ArenaResult)>>,
    }

    impl FlakySink {
        fn new(fail_for: Option<UserId>) -> Self {
            Self {
                fail_for,
                calls: Mutex::new(Vec::new()),
                results: Mutex::new(Vec::new()),
            }
        }
    }

    impl RewardSink for FlakySink {
        async fn award_xp(
            &self,
            user_id: UserId,
            amount: u32,
            _reason: &str,
        ) -> Result<(), RewardError> {
            if self.fail_for == Some(user_id) {
                return Err(RewardError("xp service down".into()));
            }
            self.calls.lock().unwrap().push((user_id, amount));
            Ok(())
        }

        async fn record_arena_result(
            &self,
            user_id: UserId,
            result: ArenaResult,
        ) -> Result<(), RewardError> {
            self.results.lock().unwrap().push((user_id, result));
            Ok(())
        }
    }

    fn ranked(rank: u32, id: u64, score: u32) -> RankedPlayer {
        RankedPlayer {
            rank,
            user_id: UserId(id),
            display_name: format!("p{id}"),
            score,
            correct_count: 1,
            total_time_ms: 1000,
        }
    }

    #[tokio::test]
    async fn test_dispatch_awards_table_amounts_in_rank_order() {
        let sink = FlakySink::new(None);
        let rankings =
            vec![ranked(1, 10, 500), ranked(2, 11, 300), ranked(3, 12, 200), ranked(4, 13, 0)];

        let outcomes = dispatch_rewards(&sink, &rankings, 10).await;

        assert!(outcomes.iter().all(RewardOutcome::is_ok));
        let calls = sink.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                (UserId(10), xp_for_rank(1)),
                (UserId(11), xp_for_rank(2)),
                (UserId(12), xp_for_rank(3)),
                (UserId(13), PARTICIPATION_XP),
            ]
        );
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_the_rest() {
        let sink = FlakySink::new(Some(UserId(11)));
        let rankings = vec![ranked(1, 10, 500), ranked(2, 11, 300), ranked(3, 12, 200)];

        let outcomes = dispatch_rewards(&sink, &rankings, 5).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());
        assert!(outcomes[2].is_ok());
        // The failing player's stats were still recorded (both calls attempted).
        assert_eq!(sink.results.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_recorded_results_carry_rank_and_totals() {
        let sink = FlakySink::new(None);
        let outcomes = dispatch_rewards(&sink, &[ranked(2, 42, 280)], 10).await;

        assert_eq!(outcomes[0].xp, xp_for_rank(2));
        let results = sink.results.lock().unwrap();
        let (uid, res) = &results[0];
        assert_eq!(*uid, UserId(42));
        assert_eq!(res.rank, 2);
        assert_eq!(res.score, 280);
        assert_eq!(res.total_questions, 10);
    }
}
