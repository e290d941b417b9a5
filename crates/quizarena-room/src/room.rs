//! Room actor: an isolated Tokio task that owns one arena battle.
//!
//! Mutations arrive from independent concurrent sources — player
//! submissions, host actions, and timer callbacks — but all of them
//! funnel through one mpsc channel into the actor, so the room has a
//! single logical owner.
//!
//! # The single-winner guard
//!
//! Two triggers race to end a live question: "every connected player
//! answered" and the per-question deadline. Timers are spawned tasks
//! that sleep and then post a [`TimerKind`] back onto the room's own
//! channel, each carrying the phase it was armed for. Before acting,
//! every trigger re-checks `(status, current_question_index)` against
//! what it expects; whoever observes the expected phase first performs
//! the transition and everyone else no-ops. A timer firing late —
//! including after a paused process — is therefore harmless.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use quizarena_core::{
    Answer, ArenaConfig, ArenaError, JoinCode, OPTION_COUNT, PlayerRecord, PlayerSnapshot,
    Question, RoomId, RoomSnapshot, RoomStatus, UserId, rank_players, score_answer,
};
use quizarena_registry::RoomRegistry;
use quizarena_rewards::{RewardSink, dispatch_rewards};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::{
    ArenaEvent, CancelReason, EngineTimings, Notifier, QuestionSource, ScoreEntry,
};

/// The result of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Whether the chosen option was the correct one.
    pub correct: bool,
    /// Points this answer added to the player's score (0 if incorrect).
    pub points_awarded: u32,
}

/// A snapshot of room metadata (not the full document).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub join_code: JoinCode,
    pub host_id: UserId,
    pub status: RoomStatus,
    /// Meaningful only in `Question`/`Results`.
    pub current_question_index: Option<usize>,
    /// All roster records, departed players included.
    pub player_count: usize,
    /// Players still present.
    pub connected_count: usize,
    pub max_players: usize,
}

/// Timer callbacks, each tagged with the phase it was armed for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TimerKind {
    /// The lobby sat in `Waiting` for the full lobby timeout.
    LobbyExpired,
    /// Announce the next countdown step; 0 remaining starts question 0.
    CountdownStep { remaining: u8 },
    /// The answer window for question `index` ran out.
    QuestionDeadline { index: usize },
    /// The reveal pause after question `index` is over.
    RevealOver { index: usize },
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    Join {
        user_id: UserId,
        display_name: String,
        reply: oneshot::Sender<Result<(), ArenaError>>,
    },
    Leave {
        user_id: UserId,
        reply: oneshot::Sender<Result<(), ArenaError>>,
    },
    /// Host-only: lobby → countdown → battle.
    Start {
        user_id: UserId,
        reply: oneshot::Sender<Result<(), ArenaError>>,
    },
    Submit {
        user_id: UserId,
        option_index: u8,
        reply: oneshot::Sender<Result<SubmitReceipt, ArenaError>>,
    },
    /// Host-only abort, accepted in `Waiting`/`Countdown`.
    Cancel {
        user_id: UserId,
        reply: oneshot::Sender<Result<(), ArenaError>>,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    Timer(TimerKind),
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    join_code: JoinCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn join_code(&self) -> &JoinCode {
        &self.join_code
    }

    pub async fn join(
        &self,
        user_id: UserId,
        display_name: impl Into<String>,
    ) -> Result<(), ArenaError> {
        self.request(|reply| RoomCommand::Join {
            user_id,
            display_name: display_name.into(),
            reply,
        })
        .await?
    }

    pub async fn leave(&self, user_id: UserId) -> Result<(), ArenaError> {
        self.request(|reply| RoomCommand::Leave { user_id, reply }).await?
    }

    pub async fn start(&self, user_id: UserId) -> Result<(), ArenaError> {
        self.request(|reply| RoomCommand::Start { user_id, reply }).await?
    }

    pub async fn submit(
        &self,
        user_id: UserId,
        option_index: u8,
    ) -> Result<SubmitReceipt, ArenaError> {
        self.request(|reply| RoomCommand::Submit { user_id, option_index, reply })
            .await?
    }

    pub async fn cancel(&self, user_id: UserId) -> Result<(), ArenaError> {
        self.request(|reply| RoomCommand::Cancel { user_id, reply }).await?
    }

    pub async fn info(&self) -> Result<RoomInfo, ArenaError> {
        self.request(|reply| RoomCommand::Info { reply }).await
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, ArenaError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Sends a command carrying a reply channel and awaits the answer.
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, ArenaError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| ArenaError::Unavailable(self.room_id))?;
        reply_rx.await.map_err(|_| ArenaError::Unavailable(self.room_id))
    }
}

/// Epoch milliseconds, for the persisted timestamps.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<Q, N, R> {
    room_id: RoomId,
    join_code: JoinCode,
    host_id: UserId,
    config: ArenaConfig,
    timings: EngineTimings,

    status: RoomStatus,
    /// Roster in join order. Records survive mid-battle departure.
    players: Vec<PlayerRecord>,
    /// Populated exactly once, at the `Waiting → Countdown` transition.
    questions: Vec<Question>,
    current_index: usize,
    /// Tokio clock so paused-time tests measure exact elapsed times.
    question_started_at: Option<Instant>,

    created_at_ms: u64,
    started_at_ms: Option<u64>,
    ended_at_ms: Option<u64>,

    registry: Arc<Mutex<RoomRegistry>>,
    questions_src: Arc<Q>,
    notifier: Arc<N>,
    rewards: Arc<R>,

    receiver: mpsc::Receiver<RoomCommand>,
    /// Weak so pending timers never keep a dead room's channel open.
    timer_sender: mpsc::WeakSender<RoomCommand>,
}

impl<Q, N, R> RoomActor<Q, N, R>
where
    Q: QuestionSource,
    N: Notifier,
    R: RewardSink,
{
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, join_code = %self.join_code, "room task started");
        self.schedule(self.timings.lobby_timeout, TimerKind::LobbyExpired);

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { user_id, display_name, reply } => {
                    let _ = reply.send(self.handle_join(user_id, display_name));
                }
                RoomCommand::Leave { user_id, reply } => {
                    let _ = reply.send(self.handle_leave(user_id));
                }
                RoomCommand::Start { user_id, reply } => {
                    let result = self.handle_start(user_id).await;
                    let _ = reply.send(result);
                }
                RoomCommand::Submit { user_id, option_index, reply } => {
                    let _ = reply.send(self.handle_submit(user_id, option_index));
                }
                RoomCommand::Cancel { user_id, reply } => {
                    let _ = reply.send(self.handle_cancel(user_id));
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                RoomCommand::Timer(kind) => {
                    self.handle_timer(kind).await;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, status = %self.status, "room task stopped");
    }

    // -- guards ----------------------------------------------------------

    /// The single-winner check: is the room still in the phase the
    /// caller armed for?
    fn phase_is(&self, status: RoomStatus, index: usize) -> bool {
        self.status == status && self.current_index == index
    }

    fn ensure_live(&self) -> Result<(), ArenaError> {
        if self.status.is_terminal() {
            Err(ArenaError::InvalidState(format!("room is {}", self.status)))
        } else {
            Ok(())
        }
    }

    // -- roster ----------------------------------------------------------

    fn handle_join(&mut self, user_id: UserId, display_name: String) -> Result<(), ArenaError> {
        self.ensure_live()?;
        if !self.status.is_joinable() {
            return Err(ArenaError::InvalidState(format!(
                "cannot join room in state {}",
                self.status
            )));
        }
        if self.players.iter().any(|p| p.user_id == user_id) {
            return Err(ArenaError::AlreadyJoined(user_id));
        }
        if self.players.len() >= self.config.max_players {
            return Err(ArenaError::RoomFull(self.room_id));
        }

        self.players
            .push(PlayerRecord::new(user_id, display_name.clone(), now_ms()));
        tracing::info!(
            room_id = %self.room_id,
            %user_id,
            players = self.players.len(),
            "player joined"
        );
        self.notify(ArenaEvent::PlayerJoined {
            user_id,
            display_name,
            player_count: self.players.len(),
        });
        Ok(())
    }

    fn handle_leave(&mut self, user_id: UserId) -> Result<(), ArenaError> {
        self.ensure_live()?;
        let pos = self
            .players
            .iter()
            .position(|p| p.user_id == user_id && p.connected)
            .ok_or(ArenaError::NotInRoom(user_id, self.room_id))?;

        // Before the first question is live nothing has been recorded,
        // so the record is removed outright. From `Question` onward the
        // record (score, answers) survives; only `connected` flips.
        match self.status {
            RoomStatus::Waiting | RoomStatus::Countdown => {
                self.players.remove(pos);
            }
            _ => self.players[pos].connected = false,
        }

        tracing::info!(
            room_id = %self.room_id,
            %user_id,
            players = self.players.len(),
            "player left"
        );
        self.notify(ArenaEvent::PlayerLeft {
            user_id,
            player_count: self.players.iter().filter(|p| p.connected).count(),
        });

        if user_id == self.host_id && self.status.can_cancel() {
            // No host transfer: a pre-battle host departure ends the room.
            self.cancel_room(CancelReason::HostLeft);
            return Ok(());
        }

        // A departure can complete the "everyone answered" condition
        // for the players still present.
        if self.status == RoomStatus::Question && self.all_connected_answered() {
            let index = self.current_index;
            self.finish_question(index);
        }
        Ok(())
    }

    // -- lifecycle --------------------------------------------------------

    async fn handle_start(&mut self, user_id: UserId) -> Result<(), ArenaError> {
        self.ensure_live()?;
        if self.status != RoomStatus::Waiting {
            return Err(ArenaError::InvalidState(format!(
                "cannot start from state {}",
                self.status
            )));
        }
        if user_id != self.host_id {
            return Err(ArenaError::InvalidState("only the host can start".into()));
        }
        if self.players.len() < 2 {
            return Err(ArenaError::InsufficientPlayers(self.players.len()));
        }

        // Question generation happens inline: the lobby is frozen while
        // the source works, and on failure the room is still `Waiting`.
        let questions = self
            .questions_src
            .generate(&self.config.topic, self.config.question_count, self.config.difficulty)
            .await
            .map_err(|e| ArenaError::QuestionGenerationFailed(e.to_string()))?;
        if questions.len() != self.config.question_count {
            return Err(ArenaError::QuestionGenerationFailed(format!(
                "expected {} questions, source returned {}",
                self.config.question_count,
                questions.len()
            )));
        }
        if let Some(bad) = questions
            .iter()
            .find(|q| q.correct_index as usize >= OPTION_COUNT)
        {
            return Err(ArenaError::QuestionGenerationFailed(format!(
                "correct_index {} out of range",
                bad.correct_index
            )));
        }

        self.questions = questions;
        self.status = RoomStatus::Countdown;
        tracing::info!(
            room_id = %self.room_id,
            players = self.players.len(),
            questions = self.questions.len(),
            "battle starting"
        );
        self.notify(ArenaEvent::Countdown { step: EngineTimings::COUNTDOWN_STEPS });
        self.schedule(
            self.timings.countdown_step,
            TimerKind::CountdownStep { remaining: EngineTimings::COUNTDOWN_STEPS - 1 },
        );
        Ok(())
    }

    fn handle_cancel(&mut self, user_id: UserId) -> Result<(), ArenaError> {
        self.ensure_live()?;
        if user_id != self.host_id {
            return Err(ArenaError::InvalidState("only the host can cancel".into()));
        }
        if !self.status.can_cancel() {
            return Err(ArenaError::InvalidState(format!(
                "cannot cancel from state {}",
                self.status
            )));
        }
        self.cancel_room(CancelReason::HostCancelled);
        Ok(())
    }

    async fn handle_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::LobbyExpired => {
                if self.status != RoomStatus::Waiting {
                    tracing::trace!(room_id = %self.room_id, "stale lobby timer, ignoring");
                    return;
                }
                tracing::info!(room_id = %self.room_id, "lobby expired");
                self.cancel_room(CancelReason::LobbyExpired);
            }
            TimerKind::CountdownStep { remaining } => {
                if self.status != RoomStatus::Countdown {
                    tracing::trace!(room_id = %self.room_id, "stale countdown timer, ignoring");
                    return;
                }
                if remaining == 0 {
                    self.begin_question(0);
                } else {
                    self.notify(ArenaEvent::Countdown { step: remaining });
                    self.schedule(
                        self.timings.countdown_step,
                        TimerKind::CountdownStep { remaining: remaining - 1 },
                    );
                }
            }
            TimerKind::QuestionDeadline { index } => {
                if !self.phase_is(RoomStatus::Question, index) {
                    tracing::trace!(
                        room_id = %self.room_id,
                        index,
                        "stale question deadline, ignoring"
                    );
                    return;
                }
                self.finish_question(index);
            }
            TimerKind::RevealOver { index } => {
                if !self.phase_is(RoomStatus::Results, index) {
                    tracing::trace!(room_id = %self.room_id, index, "stale reveal timer, ignoring");
                    return;
                }
                if index + 1 < self.questions.len() {
                    self.begin_question(index + 1);
                } else {
                    self.finish_room().await;
                }
            }
        }
    }

    fn begin_question(&mut self, index: usize) {
        debug_assert!(self.status.can_transition_to(RoomStatus::Question));
        self.status = RoomStatus::Question;
        self.current_index = index;
        self.question_started_at = Some(Instant::now());
        if index == 0 {
            self.started_at_ms = Some(now_ms());
        }

        let question = &self.questions[index];
        tracing::debug!(room_id = %self.room_id, index, "question started");
        self.notify(ArenaEvent::QuestionStarted {
            index,
            text: question.text.clone(),
            options: question.options.clone(),
            time_limit_ms: self.config.time_limit_ms(),
        });
        self.schedule(self.config.time_per_question, TimerKind::QuestionDeadline { index });
    }

    /// `Question(i) → Results(i)`. Callers have already passed the
    /// phase guard, so exactly one trigger gets here per question.
    fn finish_question(&mut self, index: usize) {
        debug_assert!(self.phase_is(RoomStatus::Question, index));
        self.status = RoomStatus::Results;

        let scoreboard: Vec<ScoreEntry> = rank_players(&self.players)
            .into_iter()
            .map(|r| ScoreEntry {
                user_id: r.user_id,
                display_name: r.display_name,
                score: r.score,
            })
            .collect();
        let question = &self.questions[index];
        tracing::debug!(room_id = %self.room_id, index, "question over");
        self.notify(ArenaEvent::QuestionResults {
            index,
            correct_index: question.correct_index,
            explanation: question.explanation.clone(),
            scoreboard,
        });

        self.schedule(self.timings.reveal_pause, TimerKind::RevealOver { index });
    }

    /// `Results(last) → Finished`: rank, dispatch rewards exactly once,
    /// release the join code.
    async fn finish_room(&mut self) {
        debug_assert!(self.status.can_transition_to(RoomStatus::Finished));
        self.status = RoomStatus::Finished;
        self.ended_at_ms = Some(now_ms());

        let rankings = rank_players(&self.players);
        let outcomes =
            dispatch_rewards(self.rewards.as_ref(), &rankings, self.questions.len()).await;
        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        tracing::info!(
            room_id = %self.room_id,
            players = rankings.len(),
            reward_failures = failed,
            "battle finished"
        );

        self.notify(ArenaEvent::RoomFinished { rankings });
        self.release_registry_entries();
    }

    fn cancel_room(&mut self, reason: CancelReason) {
        debug_assert!(self.status.can_cancel());
        self.status = RoomStatus::Cancelled;
        self.ended_at_ms = Some(now_ms());
        tracing::info!(room_id = %self.room_id, %reason, "room cancelled");
        self.notify(ArenaEvent::RoomCancelled { reason });
        self.release_registry_entries();
    }

    fn release_registry_entries(&self) {
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .close_room(self.room_id);
    }

    fn notify(&self, event: ArenaEvent) {
        self.notifier.notify(self.room_id, &event);
    }

    // -- submissions ------------------------------------------------------

    fn handle_submit(
        &mut self,
        user_id: UserId,
        option_index: u8,
    ) -> Result<SubmitReceipt, ArenaError> {
        let result = self.try_submit(user_id, option_index);
        match &result {
            Ok(receipt) => {
                self.notify(ArenaEvent::AnswerAccepted { user_id, points: receipt.points_awarded });
                if self.all_connected_answered() {
                    // Fast path of the question-ending race. The phase
                    // guard is trivially satisfied: we are handling a
                    // submission for the live question.
                    let index = self.current_index;
                    self.finish_question(index);
                }
            }
            Err(e) => {
                tracing::debug!(room_id = %self.room_id, %user_id, error = %e, "answer rejected");
                self.notify(ArenaEvent::AnswerRejected { user_id, reason: e.to_string() });
            }
        }
        result
    }

    /// Preconditions, checked in order: live question, membership, first
    /// submission for this index, valid option.
    fn try_submit(
        &mut self,
        user_id: UserId,
        option_index: u8,
    ) -> Result<SubmitReceipt, ArenaError> {
        if self.status != RoomStatus::Question {
            return Err(ArenaError::InvalidState(format!(
                "cannot submit in state {}",
                self.status
            )));
        }
        let index = self.current_index;
        let time_limit_ms = self.config.time_limit_ms();
        let question = &self.questions[index];
        let correct = question.is_correct(option_index);

        let started = self
            .question_started_at
            .expect("question_started_at set while status is Question");
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let player = self
            .players
            .iter_mut()
            .find(|p| p.user_id == user_id && p.connected)
            .ok_or(ArenaError::NotInRoom(user_id, self.room_id))?;
        if player.has_answered(index) {
            return Err(ArenaError::AlreadyAnswered(user_id, index));
        }
        if option_index as usize >= OPTION_COUNT {
            return Err(ArenaError::InvalidOption(option_index));
        }

        let points = score_answer(correct, elapsed_ms, time_limit_ms);
        player.record_answer(index, Answer { option_index, correct, points, elapsed_ms });
        tracing::debug!(
            room_id = %self.room_id,
            %user_id,
            index,
            correct,
            points,
            elapsed_ms,
            "answer recorded"
        );
        Ok(SubmitReceipt { correct, points_awarded: points })
    }

    /// True when every still-connected player has answered the live
    /// question. An empty room never fast-forwards — the deadline timer
    /// is the backstop there.
    fn all_connected_answered(&self) -> bool {
        let connected: Vec<_> = self.players.iter().filter(|p| p.connected).collect();
        !connected.is_empty() && connected.iter().all(|p| p.has_answered(self.current_index))
    }

    // -- timers -----------------------------------------------------------

    /// Arms a one-shot timer that posts `kind` back onto the command
    /// channel. The weak sender means a dropped room silently absorbs
    /// its pending timers.
    fn schedule(&self, after: Duration, kind: TimerKind) {
        let sender = self.timer_sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(RoomCommand::Timer(kind)).await;
            }
        });
    }

    // -- views ------------------------------------------------------------

    fn current_index_if_live(&self) -> Option<usize> {
        matches!(self.status, RoomStatus::Question | RoomStatus::Results)
            .then_some(self.current_index)
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            join_code: self.join_code.clone(),
            host_id: self.host_id,
            status: self.status,
            current_question_index: self.current_index_if_live(),
            player_count: self.players.len(),
            connected_count: self.players.iter().filter(|p| p.connected).count(),
            max_players: self.config.max_players,
        }
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id,
            join_code: self.join_code.clone(),
            host_id: self.host_id,
            config: self.config.clone(),
            status: self.status,
            current_question_index: self.current_index_if_live(),
            questions: self.questions.clone(),
            players: self.players.iter().map(PlayerSnapshot::from).collect(),
            created_at_ms: self.created_at_ms,
            started_at_ms: self.started_at_ms,
            ended_at_ms: self.ended_at_ms,
        }
    }
}

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Spawns a new room task and returns a handle to communicate with it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn spawn_room<Q, N, R>(
    room_id: RoomId,
    join_code: JoinCode,
    host_id: UserId,
    config: ArenaConfig,
    timings: EngineTimings,
    registry: Arc<Mutex<RoomRegistry>>,
    questions_src: Arc<Q>,
    notifier: Arc<N>,
    rewards: Arc<R>,
) -> RoomHandle
where
    Q: QuestionSource,
    N: Notifier,
    R: RewardSink,
{
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    let actor = RoomActor {
        room_id,
        join_code: join_code.clone(),
        host_id,
        config,
        timings,
        status: RoomStatus::Waiting,
        players: Vec::new(),
        questions: Vec::new(),
        current_index: 0,
        question_started_at: None,
        created_at_ms: now_ms(),
        started_at_ms: None,
        ended_at_ms: None,
        registry,
        questions_src,
        notifier,
        rewards,
        receiver: rx,
        timer_sender: tx.downgrade(),
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, join_code, sender: tx }
}
