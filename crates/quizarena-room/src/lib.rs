//! Room lifecycle for Quizarena.
//!
//! Each arena room runs as an isolated Tokio task (actor model) that
//! owns all mutable room state: roster, question set, lifecycle status,
//! and per-player answers. Commands and timer callbacks arrive on one
//! channel, so every state transition goes through a single owner — the
//! race between "everyone answered" and "time ran out" is settled by a
//! conditional check on the phase each trigger expects.
//!
//! # Key types
//!
//! - [`ArenaManager`] — creates rooms, resolves join codes, routes players
//! - [`RoomHandle`] — send commands to a running room task
//! - [`QuestionSource`], [`Notifier`] — external collaborator seams
//! - [`ArenaEvent`] — everything the engine tells the outside world
//! - [`EngineTimings`] — countdown/reveal/lobby timer settings

mod event;
mod manager;
mod notify;
mod room;
mod source;
mod timings;

pub use event::{ArenaEvent, CancelReason, ScoreEntry};
pub use manager::ArenaManager;
pub use notify::Notifier;
pub use room::{RoomHandle, RoomInfo, SubmitReceipt};
pub use source::{QuestionSource, QuestionSourceError};
pub use timings::EngineTimings;
