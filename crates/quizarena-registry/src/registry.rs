//! The registry: code→room and player→room indexes.

use std::collections::HashMap;

use quizarena_core::{ArenaError, JoinCode, RoomId, UserId};

use crate::code::{MAX_CODE_ATTEMPTS, generate_code};

/// Tracks every live room's join code and every player's current room.
///
/// Entries have the room's lifetime: reserved at creation, dropped by
/// [`RoomRegistry::close_room`] when the room finishes, cancels, or its
/// lobby expires — after which the code is free for reuse.
///
/// # Concurrency note
///
/// `RoomRegistry` is NOT thread-safe by itself — plain `HashMap`s, no
/// interior locking. The engine owns it behind a single mutex, which is
/// exactly the atomic insert-if-absent the code and player indexes need.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Join code → room. Keys are normalized uppercase (the `JoinCode`
    /// invariant), which makes lookups case-insensitive.
    codes: HashMap<JoinCode, RoomId>,

    /// Player → the live room they're in. A player can be in at most
    /// ONE live room at a time (key invariant).
    players: HashMap<UserId, RoomId>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a fresh join code for `room_id`.
    ///
    /// Draws up to [`MAX_CODE_ATTEMPTS`] random codes; the first one not
    /// already held by a live room wins. Every draw colliding returns
    /// [`ArenaError::CodeExhausted`] and reserves nothing.
    pub fn reserve_code(&mut self, room_id: RoomId) -> Result<JoinCode, ArenaError> {
        self.reserve_code_with(room_id, generate_code)
    }

    /// [`Self::reserve_code`] with an injected code generator, so
    /// collision handling is testable without a rigged RNG.
    pub fn reserve_code_with(
        &mut self,
        room_id: RoomId,
        mut generate: impl FnMut() -> JoinCode,
    ) -> Result<JoinCode, ArenaError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate();
            if self.codes.contains_key(&code) {
                tracing::debug!(%room_id, %code, attempt, "join code collision, retrying");
                continue;
            }
            self.codes.insert(code.clone(), room_id);
            return Ok(code);
        }
        tracing::warn!(%room_id, attempts = MAX_CODE_ATTEMPTS, "join code space exhausted");
        Err(ArenaError::CodeExhausted)
    }

    /// Resolves a join code to its live room.
    pub fn resolve(&self, code: &JoinCode) -> Option<RoomId> {
        self.codes.get(code).copied()
    }

    /// Binds a player to a room. Insert-if-absent: a player already in
    /// any live room is rejected with [`ArenaError::AlreadyJoined`].
    pub fn bind_player(&mut self, user_id: UserId, room_id: RoomId) -> Result<(), ArenaError> {
        if self.players.contains_key(&user_id) {
            return Err(ArenaError::AlreadyJoined(user_id));
        }
        self.players.insert(user_id, room_id);
        Ok(())
    }

    /// Releases a player's binding (lobby leave, or join rollback).
    pub fn unbind_player(&mut self, user_id: UserId) {
        self.players.remove(&user_id);
    }

    /// The live room a player is currently in, if any.
    ///
    /// This is the "is this player already in a live room" query path.
    pub fn room_of(&self, user_id: UserId) -> Option<RoomId> {
        self.players.get(&user_id).copied()
    }

    /// Drops a room's code and every player binding pointing at it.
    ///
    /// Called by the room itself on reaching a terminal state. Safe to
    /// call more than once.
    pub fn close_room(&mut self, room_id: RoomId) {
        self.codes.retain(|_, rid| *rid != room_id);
        self.players.retain(|_, rid| *rid != room_id);
        tracing::debug!(%room_id, "registry entries released");
    }

    /// Number of live rooms holding a code.
    pub fn live_rooms(&self) -> usize {
        self.codes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> JoinCode {
        JoinCode::parse(s).unwrap()
    }

    #[test]
    fn test_reserve_and_resolve() {
        let mut reg = RoomRegistry::new();
        let c = reg.reserve_code(RoomId(1)).unwrap();
        assert_eq!(reg.resolve(&c), Some(RoomId(1)));
        assert_eq!(reg.live_rooms(), 1);
    }

    #[test]
    fn test_resolve_is_case_insensitive_via_parse() {
        let mut reg = RoomRegistry::new();
        let c = reg.reserve_code(RoomId(1)).unwrap();
        let lower = JoinCode::parse(&c.as_str().to_ascii_lowercase()).unwrap();
        assert_eq!(reg.resolve(&lower), Some(RoomId(1)));
    }

    #[test]
    fn test_reserve_retries_through_collisions() {
        let mut reg = RoomRegistry::new();
        reg.reserve_code_with(RoomId(1), || code("AAAAAA")).unwrap();

        // Attempts 1–9 collide, attempt 10 succeeds.
        let mut draws = 0;
        let result = reg.reserve_code_with(RoomId(2), || {
            draws += 1;
            if draws < MAX_CODE_ATTEMPTS { code("AAAAAA") } else { code("BBBBBB") }
        });
        assert_eq!(result.unwrap(), code("BBBBBB"));
        assert_eq!(draws, MAX_CODE_ATTEMPTS);
    }

    #[test]
    fn test_reserve_exhausts_after_max_attempts() {
        let mut reg = RoomRegistry::new();
        reg.reserve_code_with(RoomId(1), || code("AAAAAA")).unwrap();

        let mut draws = 0;
        let result = reg.reserve_code_with(RoomId(2), || {
            draws += 1;
            code("AAAAAA")
        });
        assert!(matches!(result, Err(ArenaError::CodeExhausted)));
        assert_eq!(draws, MAX_CODE_ATTEMPTS);
        // Nothing was reserved for the failed room.
        assert_eq!(reg.live_rooms(), 1);
    }

    #[test]
    fn test_bind_player_is_insert_if_absent() {
        let mut reg = RoomRegistry::new();
        reg.bind_player(UserId(1), RoomId(1)).unwrap();
        // Same room or another — already bound is already bound.
        assert!(matches!(
            reg.bind_player(UserId(1), RoomId(1)),
            Err(ArenaError::AlreadyJoined(_))
        ));
        assert!(matches!(
            reg.bind_player(UserId(1), RoomId(2)),
            Err(ArenaError::AlreadyJoined(_))
        ));
        assert_eq!(reg.room_of(UserId(1)), Some(RoomId(1)));
    }

    #[test]
    fn test_unbind_player_frees_the_slot() {
        let mut reg = RoomRegistry::new();
        reg.bind_player(UserId(1), RoomId(1)).unwrap();
        reg.unbind_player(UserId(1));
        assert_eq!(reg.room_of(UserId(1)), None);
        reg.bind_player(UserId(1), RoomId(2)).unwrap();
    }

    #[test]
    fn test_close_room_releases_code_and_players() {
        let mut reg = RoomRegistry::new();
        let c = reg.reserve_code_with(RoomId(1), || code("AAAAAA")).unwrap();
        reg.bind_player(UserId(1), RoomId(1)).unwrap();
        reg.bind_player(UserId(2), RoomId(1)).unwrap();

        reg.close_room(RoomId(1));

        assert_eq!(reg.resolve(&c), None);
        assert_eq!(reg.room_of(UserId(1)), None);
        assert_eq!(reg.room_of(UserId(2)), None);

        // The code is immediately reusable.
        let again = reg.reserve_code_with(RoomId(2), || code("AAAAAA")).unwrap();
        assert_eq!(reg.resolve(&again), Some(RoomId(2)));
    }

    #[test]
    fn test_close_room_is_idempotent_and_scoped() {
        let mut reg = RoomRegistry::new();
        reg.reserve_code_with(RoomId(1), || code("AAAAAA")).unwrap();
        reg.reserve_code_with(RoomId(2), || code("BBBBBB")).unwrap();
        reg.bind_player(UserId(9), RoomId(2)).unwrap();

        reg.close_room(RoomId(1));
        reg.close_room(RoomId(1));

        assert_eq!(reg.live_rooms(), 1);
        assert_eq!(reg.room_of(UserId(9)), Some(RoomId(2)));
    }
}
