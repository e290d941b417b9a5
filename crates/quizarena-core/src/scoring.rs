//! Per-answer scoring and final ranking.
//!
//! Pure functions, deliberately free of any room or clock dependency so
//! they can be tested on exact boundary values.

use serde::{Deserialize, Serialize};

use crate::{PlayerRecord, UserId};

/// Base points for a correct answer, before the speed bonus.
pub const BASE_POINTS: u32 = 100;

/// Computes the points for one answer.
///
/// A correct answer earns [`BASE_POINTS`] plus a speed bonus of 10
/// points per second left on the clock — `round((limit − elapsed) / 100)`
/// in milliseconds, saturating at zero when the answer arrives at or
/// after the limit. Incorrect answers earn nothing regardless of speed.
pub fn score_answer(correct: bool, elapsed_ms: u64, time_limit_ms: u64) -> u32 {
    if !correct {
        return 0;
    }
    let remaining = time_limit_ms.saturating_sub(elapsed_ms);
    // Integer rounding to the nearest point: round(remaining / 100).
    let bonus = (remaining + 50) / 100;
    BASE_POINTS + bonus as u32
}

/// One entry of the final standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPlayer {
    /// 1-based rank. Never shared between players.
    pub rank: u32,
    pub user_id: UserId,
    pub display_name: String,
    pub score: u32,
    pub correct_count: u32,
    /// Summed response time, the tiebreak (lower is better).
    pub total_time_ms: u64,
}

/// Produces a total order over the room's players.
///
/// Higher score first; equal scores broken by lower summed response
/// time; a residual tie falls back to user id so the order is
/// deterministic. Ranks are dense 1..N with no sharing.
pub fn rank_players(players: &[PlayerRecord]) -> Vec<RankedPlayer> {
    let mut order: Vec<&PlayerRecord> = players.iter().collect();
    order.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.total_response_time_ms().cmp(&b.total_response_time_ms()))
            .then(a.user_id.cmp(&b.user_id))
    });

    order
        .into_iter()
        .enumerate()
        .map(|(i, p)| RankedPlayer {
            rank: i as u32 + 1,
            user_id: p.user_id,
            display_name: p.display_name.clone(),
            score: p.score,
            correct_count: p.correct_count,
            total_time_ms: p.total_response_time_ms(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Answer;

    #[test]
    fn test_instant_correct_answer_gets_full_bonus() {
        // elapsed = 0 → 100 + round(limit / 100)
        assert_eq!(score_answer(true, 0, 15_000), 100 + 150);
        assert_eq!(score_answer(true, 0, 10_000), 100 + 100);
    }

    #[test]
    fn test_buzzer_beater_gets_base_points_only() {
        assert_eq!(score_answer(true, 15_000, 15_000), 100);
        // Even past the limit (timer race), never below base.
        assert_eq!(score_answer(true, 20_000, 15_000), 100);
    }

    #[test]
    fn test_incorrect_answer_scores_zero() {
        assert_eq!(score_answer(false, 0, 15_000), 0);
        assert_eq!(score_answer(false, 15_000, 15_000), 0);
    }

    #[test]
    fn test_bonus_rounds_to_nearest() {
        // 8_000 ms remaining → exactly 80 bonus.
        assert_eq!(score_answer(true, 2_000, 10_000), 180);
        // 1_250 ms remaining → round(12.5) = 13.
        assert_eq!(score_answer(true, 8_750, 10_000), 113);
        // 1_249 ms remaining → round(12.49) = 12.
        assert_eq!(score_answer(true, 8_751, 10_000), 112);
    }

    fn player(id: u64, answers: &[(bool, u32, u64)]) -> PlayerRecord {
        let mut p = PlayerRecord::new(UserId(id), format!("p{id}"), 0);
        for (i, &(correct, points, elapsed_ms)) in answers.iter().enumerate() {
            p.record_answer(i, Answer { option_index: 0, correct, points, elapsed_ms });
        }
        p
    }

    #[test]
    fn test_ranking_by_score_desc() {
        let players = vec![
            player(1, &[(true, 100, 5000)]),
            player(2, &[(true, 180, 2000)]),
            player(3, &[]),
        ];
        let ranked = rank_players(&players);
        assert_eq!(ranked[0].user_id, UserId(2));
        assert_eq!(ranked[1].user_id, UserId(1));
        assert_eq!(ranked[2].user_id, UserId(3));
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_equal_scores_broken_by_faster_total_time() {
        let players = vec![
            player(1, &[(true, 150, 8000)]),
            player(2, &[(true, 150, 3000)]),
        ];
        let ranked = rank_players(&players);
        assert_eq!(ranked[0].user_id, UserId(2));
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_ranks_are_never_shared() {
        // Identical score and time: ranking must still be a total order.
        let players = vec![
            player(5, &[(true, 150, 4000)]),
            player(3, &[(true, 150, 4000)]),
        ];
        let ranked = rank_players(&players);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
        // Deterministic residual tiebreak by user id.
        assert_eq!(ranked[0].user_id, UserId(3));
    }

    #[test]
    fn test_ranking_preserves_correct_count_and_time() {
        let players = vec![player(1, &[(true, 180, 2000), (false, 0, 4000)])];
        let ranked = rank_players(&players);
        assert_eq!(ranked[0].correct_count, 1);
        assert_eq!(ranked[0].total_time_ms, 6000);
        assert_eq!(ranked[0].score, 180);
    }
}
