//! Arena manager: creates rooms, resolves join codes, routes players.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use quizarena_core::{ArenaConfig, ArenaError, JoinCode, RoomId, RoomSnapshot, UserId};
use quizarena_registry::RoomRegistry;
use quizarena_rewards::RewardSink;

use crate::room::{RoomHandle, RoomInfo, SubmitReceipt, spawn_room};
use crate::{EngineTimings, Notifier, QuestionSource};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// The entry point for everything arena: the host app calls this, the
/// manager routes to the right room task.
///
/// Generic over the three external collaborators: where questions come
/// from, where events go, and where rewards land. The registry behind
/// the mutex is shared with every room task — rooms release their own
/// join code and player bindings when they reach a terminal state, so a
/// finished room's code is reusable without the manager's involvement.
pub struct ArenaManager<Q, N, R> {
    registry: Arc<Mutex<RoomRegistry>>,
    rooms: HashMap<RoomId, RoomHandle>,
    questions: Arc<Q>,
    notifier: Arc<N>,
    rewards: Arc<R>,
    timings: EngineTimings,
}

impl<Q, N, R> ArenaManager<Q, N, R>
where
    Q: QuestionSource,
    N: Notifier,
    R: RewardSink,
{
    /// Creates a manager with production timings.
    pub fn new(questions: Arc<Q>, notifier: Arc<N>, rewards: Arc<R>) -> Self {
        Self::with_timings(questions, notifier, rewards, EngineTimings::default())
    }

    /// Creates a manager with custom timings (tests shrink them).
    pub fn with_timings(
        questions: Arc<Q>,
        notifier: Arc<N>,
        rewards: Arc<R>,
        timings: EngineTimings,
    ) -> Self {
        Self {
            registry: Arc::new(Mutex::new(RoomRegistry::new())),
            rooms: HashMap::new(),
            questions,
            notifier,
            rewards,
            timings,
        }
    }

    /// Creates a room with `host_id` as its first player.
    ///
    /// Validates the config, reserves a unique join code, spawns the
    /// room task, and joins the host. The host must not already be in a
    /// live room.
    pub async fn create_room(
        &mut self,
        host_id: UserId,
        host_name: impl Into<String>,
        config: ArenaConfig,
    ) -> Result<(RoomId, JoinCode), ArenaError> {
        let config = config.validated()?;
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));

        // Reserve the code and bind the host under one lock, so a host
        // racing their own second create sees AlreadyJoined.
        let join_code = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let code = registry.reserve_code(room_id)?;
            if let Err(e) = registry.bind_player(host_id, room_id) {
                registry.close_room(room_id);
                return Err(e);
            }
            code
        };

        let handle = spawn_room(
            room_id,
            join_code.clone(),
            host_id,
            config,
            self.timings.clone(),
            Arc::clone(&self.registry),
            Arc::clone(&self.questions),
            Arc::clone(&self.notifier),
            Arc::clone(&self.rewards),
        );

        if let Err(e) = handle.join(host_id, host_name).await {
            // A freshly spawned room only refuses the host if the task
            // died; roll the registry entries back.
            self.registry
                .lock()
                .expect("registry lock poisoned")
                .close_room(room_id);
            return Err(e);
        }

        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, %join_code, %host_id, "room created");
        Ok((room_id, join_code))
    }

    /// Joins a player to the room behind `code`.
    ///
    /// The player is bound in the registry first (insert-if-absent, so
    /// one live room per player), then joined to the room; the binding
    /// is rolled back if the room refuses.
    pub async fn join(
        &mut self,
        code: &JoinCode,
        user_id: UserId,
        display_name: impl Into<String>,
    ) -> Result<RoomId, ArenaError> {
        let room_id = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let room_id = registry.resolve(code).ok_or(ArenaError::NotFound)?;
            registry.bind_player(user_id, room_id)?;
            room_id
        };

        let handle = match self.rooms.get(&room_id) {
            Some(h) => h.clone(),
            None => {
                self.unbind(user_id);
                return Err(ArenaError::NotFound);
            }
        };

        match handle.join(user_id, display_name).await {
            Ok(()) => Ok(room_id),
            Err(e) => {
                self.unbind(user_id);
                Err(e)
            }
        }
    }

    /// Removes a player from their current room.
    pub async fn leave(&mut self, user_id: UserId) -> Result<(), ArenaError> {
        let room_id = self.room_of(user_id).ok_or(ArenaError::NotFound)?;
        let handle = self.rooms.get(&room_id).ok_or(ArenaError::NotFound)?;
        handle.leave(user_id).await?;
        // No-op when the leave cancelled the room (registry already
        // cleared by the room task).
        self.unbind(user_id);
        Ok(())
    }

    /// Host-only: starts the battle in the caller's room.
    pub async fn start(&self, user_id: UserId) -> Result<(), ArenaError> {
        self.handle_for(user_id)?.start(user_id).await
    }

    /// Submits an answer for the caller's live question.
    pub async fn submit(
        &self,
        user_id: UserId,
        option_index: u8,
    ) -> Result<SubmitReceipt, ArenaError> {
        self.handle_for(user_id)?.submit(user_id, option_index).await
    }

    /// Host-only: aborts the caller's room (lobby/countdown only).
    pub async fn cancel(&self, user_id: UserId) -> Result<(), ArenaError> {
        self.handle_for(user_id)?.cancel(user_id).await
    }

    /// Returns metadata about a room.
    pub async fn room_info(&self, room_id: RoomId) -> Result<RoomInfo, ArenaError> {
        let handle = self.rooms.get(&room_id).ok_or(ArenaError::NotFound)?;
        handle.info().await
    }

    /// Returns the full room document, e.g. for persistence.
    pub async fn room_snapshot(&self, room_id: RoomId) -> Result<RoomSnapshot, ArenaError> {
        let handle = self.rooms.get(&room_id).ok_or(ArenaError::NotFound)?;
        handle.snapshot().await
    }

    /// Resolves a join code to a live room.
    pub fn resolve(&self, code: &JoinCode) -> Option<RoomId> {
        self.registry.lock().expect("registry lock poisoned").resolve(code)
    }

    /// The live room a player is currently in, if any.
    pub fn room_of(&self, user_id: UserId) -> Option<RoomId> {
        self.registry.lock().expect("registry lock poisoned").room_of(user_id)
    }

    /// Drops handles to rooms that have reached a terminal state (or
    /// whose task is gone). Their registry entries are already released;
    /// this just frees the handle map. Returns how many were dropped.
    pub async fn reap_finished(&mut self) -> usize {
        let mut dead = Vec::new();
        for (room_id, handle) in &self.rooms {
            match handle.info().await {
                Ok(info) if !info.status.is_terminal() => {}
                _ => dead.push(*room_id),
            }
        }
        for room_id in &dead {
            self.rooms.remove(room_id);
            tracing::debug!(%room_id, "reaped finished room");
        }
        dead.len()
    }

    /// Number of rooms the manager still holds a handle to.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn handle_for(&self, user_id: UserId) -> Result<&RoomHandle, ArenaError> {
        let room_id = self.room_of(user_id).ok_or(ArenaError::NotFound)?;
        self.rooms.get(&room_id).ok_or(ArenaError::NotFound)
    }

    fn unbind(&self, user_id: UserId) {
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .unbind_player(user_id);
    }
}
