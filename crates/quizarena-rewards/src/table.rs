//! The fixed rank→XP table.

/// XP for every rank below the podium.
pub const PARTICIPATION_XP: u32 = 50;

const FIRST_PLACE_XP: u32 = 500;
const SECOND_PLACE_XP: u32 = 300;
const THIRD_PLACE_XP: u32 = 200;

/// XP awarded for finishing at `rank` (1-based).
pub fn xp_for_rank(rank: u32) -> u32 {
    match rank {
        1 => FIRST_PLACE_XP,
        2 => SECOND_PLACE_XP,
        3 => THIRD_PLACE_XP,
        _ => PARTICIPATION_XP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_podium_beats_participation() {
        assert_eq!(xp_for_rank(1), 500);
        assert_eq!(xp_for_rank(2), 300);
        assert_eq!(xp_for_rank(3), 200);
        assert!(xp_for_rank(3) > PARTICIPATION_XP);
    }

    #[test]
    fn test_everyone_else_gets_flat_participation() {
        for rank in 4..=20 {
            assert_eq!(xp_for_rank(rank), PARTICIPATION_XP);
        }
    }
}
